use async_trait::async_trait;
use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, PaginatorTrait, QueryFilter,
    QueryOrder, QuerySelect, sea_query::Expr,
};

use crate::{
    ResultEngine, Status, Tag, TagFilter,
    listing::{PageRequest, Paged},
    tags,
};

use super::{TagRepository, contains_text, order_column};

trait ApplyTagFilters: QueryFilter + Sized {
    fn apply_tag_filters(self, filter: &TagFilter) -> Self;
}

impl<T> ApplyTagFilters for T
where
    T: QueryFilter + Sized,
{
    fn apply_tag_filters(mut self, filter: &TagFilter) -> Self {
        let status = filter.status.unwrap_or(Status::Active);
        self = self.filter(tags::Column::StatusId.eq(status.as_i32()));

        if let Some(id) = filter.id {
            self = self.filter(tags::Column::Id.eq(id));
        }
        if let Some(title) = &filter.title {
            self = self.filter(contains_text(tags::Column::Title, title));
        }

        self
    }
}

pub struct SeaOrmTags {
    db: DatabaseConnection,
}

impl SeaOrmTags {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

#[async_trait]
impl TagRepository for SeaOrmTags {
    async fn insert(&self, tag: &Tag) -> ResultEngine<Tag> {
        let model = tags::ActiveModel::from(tag).insert(&self.db).await?;
        Tag::try_from(model)
    }

    async fn update(&self, tag: &Tag) -> ResultEngine<Tag> {
        let model = tags::ActiveModel::from(tag).update(&self.db).await?;
        Tag::try_from(model)
    }

    async fn find_by_id(&self, id: i32, status: Option<Status>) -> ResultEngine<Option<Tag>> {
        let mut query = tags::Entity::find_by_id(id);
        if let Some(status) = status {
            query = query.filter(tags::Column::StatusId.eq(status.as_i32()));
        }
        query.one(&self.db).await?.map(Tag::try_from).transpose()
    }

    async fn find_by_ids(&self, ids: &[i32], status: Option<Status>) -> ResultEngine<Vec<Tag>> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }
        let mut query = tags::Entity::find().filter(tags::Column::Id.is_in(ids.iter().copied()));
        if let Some(status) = status {
            query = query.filter(tags::Column::StatusId.eq(status.as_i32()));
        }
        query
            .all(&self.db)
            .await?
            .into_iter()
            .map(Tag::try_from)
            .collect()
    }

    async fn find_by_title(&self, title: &str, status: Status) -> ResultEngine<Option<Tag>> {
        tags::Entity::find()
            .filter(tags::Column::Title.eq(title))
            .filter(tags::Column::StatusId.eq(status.as_i32()))
            .one(&self.db)
            .await?
            .map(Tag::try_from)
            .transpose()
    }

    async fn find_all(&self, filter: &TagFilter, page: &PageRequest) -> ResultEngine<Paged<Tag>> {
        let query = tags::Entity::find().apply_tag_filters(filter);
        let count = query.clone().count(&self.db).await?;
        let column: tags::Column = order_column(page.order_by)?;
        let items = query
            .order_by(column, page.direction.into())
            .offset(page.offset)
            .limit(page.limit)
            .all(&self.db)
            .await?
            .into_iter()
            .map(Tag::try_from)
            .collect::<ResultEngine<Vec<_>>>()?;

        Ok(Paged { items, count })
    }

    async fn soft_delete(&self, id: i32) -> ResultEngine<()> {
        let now = Utc::now();
        tags::Entity::update_many()
            .col_expr(tags::Column::StatusId, Expr::value(Status::Inactive.as_i32()))
            .col_expr(tags::Column::DeletedAt, Expr::value(now))
            .col_expr(tags::Column::UpdatedAt, Expr::value(now))
            .filter(tags::Column::Id.eq(id))
            .exec(&self.db)
            .await?;
        Ok(())
    }
}
