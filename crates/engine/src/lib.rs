//! Business core of the money tracker.
//!
//! Entities live next to their sea-orm models, persistence goes through the
//! traits in [`repo`], and [`Engine`] exposes the use cases the HTTP layer
//! calls.

pub use auth::{Claims, TokenSigner};
pub use categories::{Category, CategoryFilter};
pub use error::EngineError;
pub use listing::{PageParams, PageRequest, Paged, SortDirection};
pub use ops::{
    CategoryDetail, CategoryPatch, Engine, EngineBuilder, NewCategory, NewPurchase, NewTag,
    NewUser, PurchaseUpdate, TagPatch, UserPatch,
};
pub use purchases::{Purchase, PurchaseDetail, PurchaseFilter};
pub use repo::Repositories;
pub use status::Status;
pub use tags::{Tag, TagFilter};
pub use user_tokens::UserToken;
pub use users::{AuthenticatedUser, ManagementLevel, Session, User, UserFilter};

mod auth;
mod categories;
mod error;
mod listing;
mod ops;
mod purchases;
pub mod repo;
mod status;
mod tags;
mod user_tokens;
mod users;
mod util;

type ResultEngine<T> = Result<T, EngineError>;
