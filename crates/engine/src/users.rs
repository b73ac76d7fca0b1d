//! User accounts.
//!
//! Passwords are stored as Argon2 PHC strings, never in clear.

use chrono::{DateTime, Utc};
use sea_orm::{ActiveValue, entity::prelude::*};
use serde::{Deserialize, Serialize};

use crate::{EngineError, ResultEngine, Status};

pub const ORDERABLE_COLUMNS: &[&str] = &[
    "id",
    "username",
    "level_manage",
    "status_id",
    "created_at",
    "updated_at",
];

/// Coarse role gating protected routes.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ManagementLevel {
    Admin,
    #[default]
    User,
}

impl ManagementLevel {
    pub fn as_i32(self) -> i32 {
        match self {
            Self::Admin => 1,
            Self::User => 2,
        }
    }

    /// Zero counts as "not supplied".
    pub fn from_input(raw: Option<i32>) -> ResultEngine<Option<Self>> {
        match raw {
            None | Some(0) => Ok(None),
            Some(value) => Self::try_from(value).map(Some),
        }
    }
}

impl TryFrom<i32> for ManagementLevel {
    type Error = EngineError;

    fn try_from(value: i32) -> Result<Self, Self::Error> {
        match value {
            1 => Ok(Self::Admin),
            2 => Ok(Self::User),
            other => Err(EngineError::InvalidInput(format!(
                "invalid level_manage: {other}"
            ))),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct User {
    pub id: i32,
    pub username: String,
    pub password_hash: String,
    pub level: ManagementLevel,
    pub status: Status,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub deleted_at: Option<DateTime<Utc>>,
}

impl User {
    pub fn new(
        username: String,
        password_hash: String,
        level: ManagementLevel,
        status: Status,
    ) -> Self {
        let now = Utc::now();
        Self {
            id: 0,
            username,
            password_hash,
            level,
            status,
            created_at: now,
            updated_at: now,
            deleted_at: None,
        }
    }
}

/// The caller behind a verified bearer token.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AuthenticatedUser {
    pub id: i32,
    pub username: String,
    pub level: ManagementLevel,
}

/// Result of a successful login.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Session {
    pub token: String,
    pub level: ManagementLevel,
    pub user_id: i32,
}

#[derive(Clone, Debug, Default)]
pub struct UserFilter {
    pub id: Option<i32>,
    /// Substring match.
    pub username: Option<String>,
    pub level: Option<ManagementLevel>,
    /// `None` lists active users only.
    pub status: Option<Status>,
}

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "user")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    #[sea_orm(unique)]
    pub username: String,
    pub password: String,
    pub level_manage: i32,
    pub status_id: i32,
    pub created_at: DateTimeUtc,
    pub updated_at: DateTimeUtc,
    pub deleted_at: Option<DateTimeUtc>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::user_tokens::Entity")]
    Tokens,
}

impl Related<super::user_tokens::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Tokens.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl From<&User> for ActiveModel {
    fn from(user: &User) -> Self {
        Self {
            id: if user.id == 0 {
                ActiveValue::NotSet
            } else {
                ActiveValue::Set(user.id)
            },
            username: ActiveValue::Set(user.username.clone()),
            password: ActiveValue::Set(user.password_hash.clone()),
            level_manage: ActiveValue::Set(user.level.as_i32()),
            status_id: ActiveValue::Set(user.status.as_i32()),
            created_at: ActiveValue::Set(user.created_at),
            updated_at: ActiveValue::Set(user.updated_at),
            deleted_at: ActiveValue::Set(user.deleted_at),
        }
    }
}

impl TryFrom<Model> for User {
    type Error = EngineError;

    fn try_from(model: Model) -> Result<Self, Self::Error> {
        Ok(Self {
            id: model.id,
            username: model.username,
            password_hash: model.password,
            level: ManagementLevel::try_from(model.level_manage)?,
            status: Status::try_from(model.status_id)?,
            created_at: model.created_at,
            updated_at: model.updated_at,
            deleted_at: model.deleted_at,
        })
    }
}
