//! Issued bearer tokens. A token is only honoured while its row exists.

use chrono::{DateTime, Utc};
use sea_orm::{ActiveValue, entity::prelude::*};

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct UserToken {
    pub id: i32,
    pub user_id: i32,
    pub token: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl UserToken {
    pub fn new(user_id: i32, token: String) -> Self {
        let now = Utc::now();
        Self {
            id: 0,
            user_id,
            token,
            created_at: now,
            updated_at: now,
        }
    }
}

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "user_token")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub user_id: i32,
    #[sea_orm(column_type = "Text")]
    pub token: String,
    pub created_at: DateTimeUtc,
    pub updated_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::users::Entity",
        from = "Column::UserId",
        to = "super::users::Column::Id",
        on_update = "NoAction",
        on_delete = "Cascade"
    )]
    User,
}

impl Related<super::users::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::User.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl From<&UserToken> for ActiveModel {
    fn from(token: &UserToken) -> Self {
        Self {
            id: if token.id == 0 {
                ActiveValue::NotSet
            } else {
                ActiveValue::Set(token.id)
            },
            user_id: ActiveValue::Set(token.user_id),
            token: ActiveValue::Set(token.token.clone()),
            created_at: ActiveValue::Set(token.created_at),
            updated_at: ActiveValue::Set(token.updated_at),
        }
    }
}

impl From<Model> for UserToken {
    fn from(model: Model) -> Self {
        Self {
            id: model.id,
            user_id: model.user_id,
            token: model.token,
            created_at: model.created_at,
            updated_at: model.updated_at,
        }
    }
}
