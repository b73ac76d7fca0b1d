//! Persistence ports.
//!
//! Each entity has a repository trait; the engine only talks to these traits.
//! The sea-orm implementations in the submodules are what
//! [`Repositories::sea_orm`] wires up.

use std::{str::FromStr, sync::Arc};

use async_trait::async_trait;
use sea_orm::{
    ColumnTrait, Condition, DatabaseConnection,
    sea_query::{Expr, Func, LikeExpr, SimpleExpr},
};

use crate::{
    Category, CategoryFilter, EngineError, Purchase, PurchaseFilter, ResultEngine, Status, Tag,
    TagFilter, User, UserFilter, UserToken,
    listing::{PageRequest, Paged},
};

mod categories;
mod purchases;
mod tags;
mod user_tokens;
mod users;

pub use categories::SeaOrmCategories;
pub use purchases::SeaOrmPurchases;
pub use tags::SeaOrmTags;
pub use user_tokens::SeaOrmUserTokens;
pub use users::SeaOrmUsers;

#[async_trait]
pub trait CategoryRepository: Send + Sync {
    async fn insert(&self, category: &Category) -> ResultEngine<Category>;
    async fn update(&self, category: &Category) -> ResultEngine<Category>;
    /// `status: None` matches any status.
    async fn find_by_id(&self, id: i32, status: Option<Status>) -> ResultEngine<Option<Category>>;
    async fn find_by_ids(&self, ids: &[i32], status: Option<Status>) -> ResultEngine<Vec<Category>>;
    async fn find_by_slug(&self, slug: &str, status: Status) -> ResultEngine<Option<Category>>;
    async fn find_all(
        &self,
        filter: &CategoryFilter,
        page: &PageRequest,
    ) -> ResultEngine<Paged<Category>>;
    async fn soft_delete(&self, id: i32) -> ResultEngine<()>;
}

#[async_trait]
pub trait TagRepository: Send + Sync {
    async fn insert(&self, tag: &Tag) -> ResultEngine<Tag>;
    async fn update(&self, tag: &Tag) -> ResultEngine<Tag>;
    async fn find_by_id(&self, id: i32, status: Option<Status>) -> ResultEngine<Option<Tag>>;
    async fn find_by_ids(&self, ids: &[i32], status: Option<Status>) -> ResultEngine<Vec<Tag>>;
    async fn find_by_title(&self, title: &str, status: Status) -> ResultEngine<Option<Tag>>;
    async fn find_all(&self, filter: &TagFilter, page: &PageRequest) -> ResultEngine<Paged<Tag>>;
    async fn soft_delete(&self, id: i32) -> ResultEngine<()>;
}

#[async_trait]
pub trait PurchaseRepository: Send + Sync {
    async fn insert(&self, purchase: &Purchase) -> ResultEngine<Purchase>;
    async fn update(&self, purchase: &Purchase) -> ResultEngine<Purchase>;
    async fn find_by_id(&self, id: i32, status: Option<Status>) -> ResultEngine<Option<Purchase>>;
    async fn find_all(
        &self,
        filter: &PurchaseFilter,
        page: &PageRequest,
    ) -> ResultEngine<Paged<Purchase>>;
    async fn soft_delete(&self, id: i32) -> ResultEngine<()>;
}

#[async_trait]
pub trait UserRepository: Send + Sync {
    async fn insert(&self, user: &User) -> ResultEngine<User>;
    async fn update(&self, user: &User) -> ResultEngine<User>;
    async fn find_by_id(&self, id: i32, status: Option<Status>) -> ResultEngine<Option<User>>;
    async fn find_by_username(
        &self,
        username: &str,
        status: Option<Status>,
    ) -> ResultEngine<Option<User>>;
    async fn find_all(&self, filter: &UserFilter, page: &PageRequest) -> ResultEngine<Paged<User>>;
    async fn soft_delete(&self, id: i32) -> ResultEngine<()>;
}

#[async_trait]
pub trait UserTokenRepository: Send + Sync {
    async fn insert(&self, token: &UserToken) -> ResultEngine<UserToken>;
    async fn find_by_token(&self, token: &str) -> ResultEngine<Option<UserToken>>;
    async fn delete(&self, id: i32) -> ResultEngine<()>;
}

/// The set of repositories an [`Engine`](crate::Engine) runs on.
#[derive(Clone)]
pub struct Repositories {
    pub categories: Arc<dyn CategoryRepository>,
    pub tags: Arc<dyn TagRepository>,
    pub purchases: Arc<dyn PurchaseRepository>,
    pub users: Arc<dyn UserRepository>,
    pub tokens: Arc<dyn UserTokenRepository>,
}

impl Repositories {
    pub fn sea_orm(db: DatabaseConnection) -> Self {
        Self {
            categories: Arc::new(SeaOrmCategories::new(db.clone())),
            tags: Arc::new(SeaOrmTags::new(db.clone())),
            purchases: Arc::new(SeaOrmPurchases::new(db.clone())),
            users: Arc::new(SeaOrmUsers::new(db.clone())),
            tokens: Arc::new(SeaOrmUserTokens::new(db)),
        }
    }
}

/// Resolve an already sanitized order-by name to an entity column.
fn order_column<C: FromStr>(name: &str) -> ResultEngine<C> {
    C::from_str(name)
        .map_err(|_| EngineError::InvalidInput(format!("unknown order column: {name}")))
}

/// Match a stored `"1,2,3"` list containing `id`.
fn tag_list_contains<C: ColumnTrait>(column: C, id: i32) -> Condition {
    Condition::any()
        .add(column.eq(id.to_string()))
        .add(column.starts_with(format!("{id},")))
        .add(column.ends_with(format!(",{id}")))
        .add(column.contains(format!(",{id},")))
}

/// Case-insensitive substring match. `%`, `_` and `\` in `needle` match
/// themselves.
fn contains_text<C: ColumnTrait>(column: C, needle: &str) -> SimpleExpr {
    Expr::expr(Func::lower(Expr::col((column.entity_name(), column))))
        .like(LikeExpr::new(like_pattern(needle)).escape('\\'))
}

fn like_pattern(needle: &str) -> String {
    let mut pattern = String::with_capacity(needle.len() + 2);
    pattern.push('%');
    for ch in needle.to_lowercase().chars() {
        if matches!(ch, '%' | '_' | '\\') {
            pattern.push('\\');
        }
        pattern.push(ch);
    }
    pattern.push('%');
    pattern
}
