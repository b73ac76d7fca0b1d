//! Tags label purchases and categories through a stored id list.

use chrono::{DateTime, Utc};
use sea_orm::{ActiveValue, entity::prelude::*};
use serde::{Deserialize, Serialize};

use crate::{EngineError, ResultEngine, Status, util::normalize_required_text};

pub const ORDERABLE_COLUMNS: &[&str] = &["id", "title", "status_id", "created_at", "updated_at"];

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Tag {
    pub id: i32,
    pub title: String,
    pub status: Status,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub deleted_at: Option<DateTime<Utc>>,
}

impl Tag {
    pub fn new(title: &str, status: Status) -> ResultEngine<Self> {
        let title = normalize_required_text(title, "title")?;
        let now = Utc::now();
        Ok(Self {
            id: 0,
            title,
            status,
            created_at: now,
            updated_at: now,
            deleted_at: None,
        })
    }
}

#[derive(Clone, Debug, Default)]
pub struct TagFilter {
    pub id: Option<i32>,
    /// Substring match.
    pub title: Option<String>,
    /// `None` lists active tags only.
    pub status: Option<Status>,
}

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "tag")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub title: String,
    pub status_id: i32,
    pub created_at: DateTimeUtc,
    pub updated_at: DateTimeUtc,
    pub deleted_at: Option<DateTimeUtc>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

impl From<&Tag> for ActiveModel {
    fn from(tag: &Tag) -> Self {
        Self {
            id: if tag.id == 0 {
                ActiveValue::NotSet
            } else {
                ActiveValue::Set(tag.id)
            },
            title: ActiveValue::Set(tag.title.clone()),
            status_id: ActiveValue::Set(tag.status.as_i32()),
            created_at: ActiveValue::Set(tag.created_at),
            updated_at: ActiveValue::Set(tag.updated_at),
            deleted_at: ActiveValue::Set(tag.deleted_at),
        }
    }
}

impl TryFrom<Model> for Tag {
    type Error = EngineError;

    fn try_from(model: Model) -> Result<Self, Self::Error> {
        Ok(Self {
            id: model.id,
            title: model.title,
            status: Status::try_from(model.status_id)?,
            created_at: model.created_at,
            updated_at: model.updated_at,
            deleted_at: model.deleted_at,
        })
    }
}

#[cfg(test)]
mod tests {
    use std::str::FromStr;

    use super::*;

    #[test]
    fn blank_title_is_rejected() {
        assert_eq!(
            Tag::new(" ", Status::Active),
            Err(EngineError::InvalidInput("title is required".to_string()))
        );
    }

    #[test]
    fn orderable_columns_exist() {
        for name in ORDERABLE_COLUMNS {
            assert!(Column::from_str(name).is_ok(), "{name}");
        }
    }
}
