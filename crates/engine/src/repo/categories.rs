use async_trait::async_trait;
use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, PaginatorTrait, QueryFilter,
    QueryOrder, QuerySelect, sea_query::Expr,
};

use crate::{
    Category, CategoryFilter, ResultEngine, Status, categories,
    listing::{PageRequest, Paged},
};

use super::{CategoryRepository, contains_text, order_column, tag_list_contains};

trait ApplyCategoryFilters: QueryFilter + Sized {
    fn apply_category_filters(self, filter: &CategoryFilter) -> Self;
}

impl<T> ApplyCategoryFilters for T
where
    T: QueryFilter + Sized,
{
    fn apply_category_filters(mut self, filter: &CategoryFilter) -> Self {
        let status = filter.status.unwrap_or(Status::Active);
        self = self.filter(categories::Column::StatusId.eq(status.as_i32()));

        if let Some(id) = filter.id {
            self = self.filter(categories::Column::Id.eq(id));
        }
        if let Some(title) = &filter.title {
            self = self.filter(contains_text(categories::Column::Title, title));
        }
        if let Some(slug) = &filter.slug {
            self = self.filter(categories::Column::Slug.eq(slug.as_str()));
        }
        if let Some(color) = &filter.color {
            self = self.filter(categories::Column::Color.eq(color.as_str()));
        }
        for tag_id in &filter.tag_ids {
            self = self.filter(tag_list_contains(categories::Column::TagIds, *tag_id));
        }

        self
    }
}

pub struct SeaOrmCategories {
    db: DatabaseConnection,
}

impl SeaOrmCategories {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

#[async_trait]
impl CategoryRepository for SeaOrmCategories {
    async fn insert(&self, category: &Category) -> ResultEngine<Category> {
        let model = categories::ActiveModel::from(category)
            .insert(&self.db)
            .await?;
        Category::try_from(model)
    }

    async fn update(&self, category: &Category) -> ResultEngine<Category> {
        let model = categories::ActiveModel::from(category)
            .update(&self.db)
            .await?;
        Category::try_from(model)
    }

    async fn find_by_id(&self, id: i32, status: Option<Status>) -> ResultEngine<Option<Category>> {
        let mut query = categories::Entity::find_by_id(id);
        if let Some(status) = status {
            query = query.filter(categories::Column::StatusId.eq(status.as_i32()));
        }
        query
            .one(&self.db)
            .await?
            .map(Category::try_from)
            .transpose()
    }

    async fn find_by_ids(&self, ids: &[i32], status: Option<Status>) -> ResultEngine<Vec<Category>> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }
        let mut query =
            categories::Entity::find().filter(categories::Column::Id.is_in(ids.iter().copied()));
        if let Some(status) = status {
            query = query.filter(categories::Column::StatusId.eq(status.as_i32()));
        }
        query
            .all(&self.db)
            .await?
            .into_iter()
            .map(Category::try_from)
            .collect()
    }

    async fn find_by_slug(&self, slug: &str, status: Status) -> ResultEngine<Option<Category>> {
        categories::Entity::find()
            .filter(categories::Column::Slug.eq(slug))
            .filter(categories::Column::StatusId.eq(status.as_i32()))
            .one(&self.db)
            .await?
            .map(Category::try_from)
            .transpose()
    }

    async fn find_all(
        &self,
        filter: &CategoryFilter,
        page: &PageRequest,
    ) -> ResultEngine<Paged<Category>> {
        let query = categories::Entity::find().apply_category_filters(filter);
        let count = query.clone().count(&self.db).await?;
        let column: categories::Column = order_column(page.order_by)?;
        let items = query
            .order_by(column, page.direction.into())
            .offset(page.offset)
            .limit(page.limit)
            .all(&self.db)
            .await?
            .into_iter()
            .map(Category::try_from)
            .collect::<ResultEngine<Vec<_>>>()?;

        Ok(Paged { items, count })
    }

    async fn soft_delete(&self, id: i32) -> ResultEngine<()> {
        let now = Utc::now();
        categories::Entity::update_many()
            .col_expr(categories::Column::StatusId, Expr::value(Status::Inactive.as_i32()))
            .col_expr(categories::Column::DeletedAt, Expr::value(now))
            .col_expr(categories::Column::UpdatedAt, Expr::value(now))
            .filter(categories::Column::Id.eq(id))
            .exec(&self.db)
            .await?;
        Ok(())
    }
}
