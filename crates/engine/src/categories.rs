//! Categories group purchases.
//!
//! A category doubles as a purchase's sub-category; the hierarchy lives on the
//! purchase row, not here.

use chrono::{DateTime, Utc};
use sea_orm::{ActiveValue, entity::prelude::*};
use serde::{Deserialize, Serialize};

use crate::{
    EngineError, ResultEngine, Status,
    util::{decode_tag_ids, encode_tag_ids, normalize_required_text, slugify},
};

/// Columns a category listing may be ordered by.
pub const ORDERABLE_COLUMNS: &[&str] = &[
    "id",
    "title",
    "slug",
    "status_id",
    "color",
    "created_at",
    "updated_at",
];

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Category {
    pub id: i32,
    pub title: String,
    pub slug: String,
    pub status: Status,
    pub color: String,
    pub tag_ids: Vec<i32>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub deleted_at: Option<DateTime<Utc>>,
}

impl Category {
    /// Build a not yet persisted category, deriving its slug from `title`.
    pub fn new(title: &str, status: Status, color: String, tag_ids: Vec<i32>) -> ResultEngine<Self> {
        let title = normalize_required_text(title, "title")?;
        let slug = slugify(&title);
        if slug.is_empty() {
            return Err(EngineError::InvalidInput(format!(
                "title \"{title}\" does not produce a valid slug"
            )));
        }
        let now = Utc::now();
        Ok(Self {
            id: 0,
            title,
            slug,
            status,
            color,
            tag_ids,
            created_at: now,
            updated_at: now,
            deleted_at: None,
        })
    }

    /// Replace the title and re-derive the slug.
    pub fn retitle(&mut self, title: &str) -> ResultEngine<()> {
        let title = normalize_required_text(title, "title")?;
        let slug = slugify(&title);
        if slug.is_empty() {
            return Err(EngineError::InvalidInput(format!(
                "title \"{title}\" does not produce a valid slug"
            )));
        }
        self.title = title;
        self.slug = slug;
        Ok(())
    }
}

/// Listing filters. Absent fields do not constrain the result.
#[derive(Clone, Debug, Default)]
pub struct CategoryFilter {
    pub id: Option<i32>,
    /// Substring match.
    pub title: Option<String>,
    pub slug: Option<String>,
    pub color: Option<String>,
    /// `None` lists active categories only.
    pub status: Option<Status>,
    /// Every id must be present on the category.
    pub tag_ids: Vec<i32>,
}

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "category")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub title: String,
    pub slug: String,
    pub status_id: i32,
    pub color: String,
    pub tag_ids: String,
    pub created_at: DateTimeUtc,
    pub updated_at: DateTimeUtc,
    pub deleted_at: Option<DateTimeUtc>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

impl From<&Category> for ActiveModel {
    fn from(category: &Category) -> Self {
        Self {
            id: if category.id == 0 {
                ActiveValue::NotSet
            } else {
                ActiveValue::Set(category.id)
            },
            title: ActiveValue::Set(category.title.clone()),
            slug: ActiveValue::Set(category.slug.clone()),
            status_id: ActiveValue::Set(category.status.as_i32()),
            color: ActiveValue::Set(category.color.clone()),
            tag_ids: ActiveValue::Set(encode_tag_ids(&category.tag_ids)),
            created_at: ActiveValue::Set(category.created_at),
            updated_at: ActiveValue::Set(category.updated_at),
            deleted_at: ActiveValue::Set(category.deleted_at),
        }
    }
}

impl TryFrom<Model> for Category {
    type Error = EngineError;

    fn try_from(model: Model) -> Result<Self, Self::Error> {
        Ok(Self {
            id: model.id,
            title: model.title,
            slug: model.slug,
            status: Status::try_from(model.status_id)?,
            color: model.color,
            tag_ids: decode_tag_ids(&model.tag_ids),
            created_at: model.created_at,
            updated_at: model.updated_at,
            deleted_at: model.deleted_at,
        })
    }
}
