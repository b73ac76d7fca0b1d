use async_trait::async_trait;
use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, DbErr, EntityTrait, PaginatorTrait,
    QueryFilter, QueryOrder, QuerySelect, SqlErr, sea_query::Expr,
};

use crate::{
    EngineError, ResultEngine, Status, User, UserFilter,
    listing::{PageRequest, Paged},
    users,
};

use super::{UserRepository, contains_text, order_column};

trait ApplyUserFilters: QueryFilter + Sized {
    fn apply_user_filters(self, filter: &UserFilter) -> Self;
}

impl<T> ApplyUserFilters for T
where
    T: QueryFilter + Sized,
{
    fn apply_user_filters(mut self, filter: &UserFilter) -> Self {
        let status = filter.status.unwrap_or(Status::Active);
        self = self.filter(users::Column::StatusId.eq(status.as_i32()));

        if let Some(id) = filter.id {
            self = self.filter(users::Column::Id.eq(id));
        }
        if let Some(username) = &filter.username {
            self = self.filter(contains_text(users::Column::Username, username));
        }
        if let Some(level) = filter.level {
            self = self.filter(users::Column::LevelManage.eq(level.as_i32()));
        }

        self
    }
}

/// The unique index on `username` backs the engine's duplicate check.
fn map_unique_violation(err: DbErr) -> EngineError {
    match err.sql_err() {
        Some(SqlErr::UniqueConstraintViolation(_)) => {
            EngineError::ExistingKey("username duplicate".to_string())
        }
        _ => EngineError::Database(err),
    }
}

pub struct SeaOrmUsers {
    db: DatabaseConnection,
}

impl SeaOrmUsers {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

#[async_trait]
impl UserRepository for SeaOrmUsers {
    async fn insert(&self, user: &User) -> ResultEngine<User> {
        let model = users::ActiveModel::from(user)
            .insert(&self.db)
            .await
            .map_err(map_unique_violation)?;
        User::try_from(model)
    }

    async fn update(&self, user: &User) -> ResultEngine<User> {
        let model = users::ActiveModel::from(user)
            .update(&self.db)
            .await
            .map_err(map_unique_violation)?;
        User::try_from(model)
    }

    async fn find_by_id(&self, id: i32, status: Option<Status>) -> ResultEngine<Option<User>> {
        let mut query = users::Entity::find_by_id(id);
        if let Some(status) = status {
            query = query.filter(users::Column::StatusId.eq(status.as_i32()));
        }
        query.one(&self.db).await?.map(User::try_from).transpose()
    }

    async fn find_by_username(
        &self,
        username: &str,
        status: Option<Status>,
    ) -> ResultEngine<Option<User>> {
        let mut query = users::Entity::find().filter(users::Column::Username.eq(username));
        if let Some(status) = status {
            query = query.filter(users::Column::StatusId.eq(status.as_i32()));
        }
        query.one(&self.db).await?.map(User::try_from).transpose()
    }

    async fn find_all(&self, filter: &UserFilter, page: &PageRequest) -> ResultEngine<Paged<User>> {
        let query = users::Entity::find().apply_user_filters(filter);
        let count = query.clone().count(&self.db).await?;
        let column: users::Column = order_column(page.order_by)?;
        let items = query
            .order_by(column, page.direction.into())
            .offset(page.offset)
            .limit(page.limit)
            .all(&self.db)
            .await?
            .into_iter()
            .map(User::try_from)
            .collect::<ResultEngine<Vec<_>>>()?;

        Ok(Paged { items, count })
    }

    async fn soft_delete(&self, id: i32) -> ResultEngine<()> {
        let now = Utc::now();
        users::Entity::update_many()
            .col_expr(users::Column::StatusId, Expr::value(Status::Inactive.as_i32()))
            .col_expr(users::Column::DeletedAt, Expr::value(now))
            .col_expr(users::Column::UpdatedAt, Expr::value(now))
            .filter(users::Column::Id.eq(id))
            .exec(&self.db)
            .await?;
        Ok(())
    }
}
