use std::sync::Arc;

use chrono::Duration;
use sea_orm::DatabaseConnection;

use crate::{
    EngineError, ResultEngine,
    auth::{DEFAULT_TOKEN_TTL_DAYS, TokenSigner},
    repo::{
        CategoryRepository, PurchaseRepository, Repositories, TagRepository, UserRepository,
        UserTokenRepository,
    },
};

mod categories;
mod purchases;
mod tags;
mod users;

pub use categories::{CategoryDetail, CategoryPatch, NewCategory};
pub use purchases::{NewPurchase, PurchaseUpdate};
pub use tags::{NewTag, TagPatch};
pub use users::{NewUser, UserPatch};

/// Business operations over categories, tags, purchases and users.
///
/// Every request is served independently against the repositories; the
/// engine holds no mutable state of its own.
pub struct Engine {
    categories: Arc<dyn CategoryRepository>,
    tags: Arc<dyn TagRepository>,
    purchases: Arc<dyn PurchaseRepository>,
    users: Arc<dyn UserRepository>,
    tokens: Arc<dyn UserTokenRepository>,
    signer: TokenSigner,
}

impl Engine {
    /// Return a builder for `Engine`. Help to build the struct.
    pub fn builder() -> EngineBuilder {
        EngineBuilder::default()
    }
}

/// The builder for `Engine`
#[derive(Default)]
pub struct EngineBuilder {
    repositories: Option<Repositories>,
    token_secret: Option<Vec<u8>>,
    token_ttl: Option<Duration>,
}

impl EngineBuilder {
    /// Pass the required database; sea-orm repositories are built on it.
    pub fn database(mut self, db: DatabaseConnection) -> EngineBuilder {
        self.repositories = Some(Repositories::sea_orm(db));
        self
    }

    /// Use custom repositories instead of [`EngineBuilder::database`].
    pub fn repositories(mut self, repositories: Repositories) -> EngineBuilder {
        self.repositories = Some(repositories);
        self
    }

    /// HMAC secret bearer tokens are signed with.
    pub fn token_secret(mut self, secret: impl AsRef<[u8]>) -> EngineBuilder {
        self.token_secret = Some(secret.as_ref().to_vec());
        self
    }

    /// Lifetime of issued tokens, 30 days unless set.
    pub fn token_ttl(mut self, ttl: Duration) -> EngineBuilder {
        self.token_ttl = Some(ttl);
        self
    }

    /// Construct `Engine`
    pub async fn build(self) -> ResultEngine<Engine> {
        let repositories = self
            .repositories
            .ok_or_else(|| EngineError::InvalidInput("database is required".to_string()))?;
        let secret = self
            .token_secret
            .ok_or_else(|| EngineError::InvalidInput("token secret is required".to_string()))?;
        let ttl = self
            .token_ttl
            .unwrap_or_else(|| Duration::days(DEFAULT_TOKEN_TTL_DAYS));

        Ok(Engine {
            categories: repositories.categories,
            tags: repositories.tags,
            purchases: repositories.purchases,
            users: repositories.users,
            tokens: repositories.tokens,
            signer: TokenSigner::new(&secret, ttl)?,
        })
    }
}
