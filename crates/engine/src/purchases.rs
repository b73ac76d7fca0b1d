//! Purchase records.
//!
//! A purchase always belongs to a category and may carry a sub-category, a
//! tag list and a free-form JSON `details` object. Amounts are integer minor
//! units and never zero.

use chrono::{DateTime, Utc};
use sea_orm::{ActiveValue, entity::prelude::*};
use serde::{Deserialize, Serialize};

use crate::{
    Category, EngineError, ResultEngine, Status, Tag,
    util::{decode_tag_ids, encode_tag_ids},
};

pub const ORDERABLE_COLUMNS: &[&str] = &[
    "id",
    "date",
    "amount",
    "reason",
    "status_id",
    "color",
    "method",
    "note",
    "category_id",
    "sub_category_id",
    "created_at",
    "updated_at",
];

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Purchase {
    pub id: i32,
    pub date: DateTime<Utc>,
    pub amount: i64,
    pub reason: String,
    pub note: String,
    pub color: String,
    pub method: i16,
    pub status: Status,
    pub category_id: i32,
    pub sub_category_id: Option<i32>,
    pub tag_ids: Vec<i32>,
    pub details: Option<serde_json::Value>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub deleted_at: Option<DateTime<Utc>>,
}

pub(crate) fn validate_amount(amount: i64) -> ResultEngine<i64> {
    if amount == 0 {
        return Err(EngineError::InvalidInput(
            "amount must not be zero".to_string(),
        ));
    }
    Ok(amount)
}

impl Purchase {
    pub fn new(category_id: i32, date: DateTime<Utc>, amount: i64) -> ResultEngine<Self> {
        let amount = validate_amount(amount)?;
        let now = Utc::now();
        Ok(Self {
            id: 0,
            date,
            amount,
            reason: String::new(),
            note: String::new(),
            color: String::new(),
            method: 0,
            status: Status::Active,
            category_id,
            sub_category_id: None,
            tag_ids: Vec::new(),
            details: None,
            created_at: now,
            updated_at: now,
            deleted_at: None,
        })
    }
}

/// A purchase together with the records it references.
#[derive(Clone, Debug, PartialEq)]
pub struct PurchaseDetail {
    pub purchase: Purchase,
    /// `None` when the category has since been deactivated.
    pub category: Option<Category>,
    pub sub_category: Option<Category>,
    pub tags: Vec<Tag>,
}

#[derive(Clone, Debug, Default)]
pub struct PurchaseFilter {
    pub id: Option<i32>,
    pub category_id: Option<i32>,
    pub sub_category_id: Option<i32>,
    /// Substring match.
    pub reason: Option<String>,
    /// Substring match.
    pub note: Option<String>,
    pub color: Option<String>,
    pub method: Option<i16>,
    pub amount: Option<i64>,
    /// `None` lists active purchases only.
    pub status: Option<Status>,
    /// Every id must be present on the purchase.
    pub tag_ids: Vec<i32>,
}

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "purchase")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub date: DateTimeUtc,
    pub amount: i64,
    pub reason: String,
    pub status_id: i32,
    pub color: String,
    pub method: i16,
    pub tag_ids: String,
    pub note: String,
    pub category_id: i32,
    pub sub_category_id: Option<i32>,
    pub details: Option<Json>,
    pub created_at: DateTimeUtc,
    pub updated_at: DateTimeUtc,
    pub deleted_at: Option<DateTimeUtc>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::categories::Entity",
        from = "Column::CategoryId",
        to = "super::categories::Column::Id",
        on_update = "NoAction",
        on_delete = "NoAction"
    )]
    Category,
    #[sea_orm(
        belongs_to = "super::categories::Entity",
        from = "Column::SubCategoryId",
        to = "super::categories::Column::Id",
        on_update = "NoAction",
        on_delete = "NoAction"
    )]
    SubCategory,
}

impl Related<super::categories::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Category.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl From<&Purchase> for ActiveModel {
    fn from(purchase: &Purchase) -> Self {
        Self {
            id: if purchase.id == 0 {
                ActiveValue::NotSet
            } else {
                ActiveValue::Set(purchase.id)
            },
            date: ActiveValue::Set(purchase.date),
            amount: ActiveValue::Set(purchase.amount),
            reason: ActiveValue::Set(purchase.reason.clone()),
            status_id: ActiveValue::Set(purchase.status.as_i32()),
            color: ActiveValue::Set(purchase.color.clone()),
            method: ActiveValue::Set(purchase.method),
            tag_ids: ActiveValue::Set(encode_tag_ids(&purchase.tag_ids)),
            note: ActiveValue::Set(purchase.note.clone()),
            category_id: ActiveValue::Set(purchase.category_id),
            sub_category_id: ActiveValue::Set(purchase.sub_category_id),
            details: ActiveValue::Set(purchase.details.clone()),
            created_at: ActiveValue::Set(purchase.created_at),
            updated_at: ActiveValue::Set(purchase.updated_at),
            deleted_at: ActiveValue::Set(purchase.deleted_at),
        }
    }
}

impl TryFrom<Model> for Purchase {
    type Error = EngineError;

    fn try_from(model: Model) -> Result<Self, Self::Error> {
        Ok(Self {
            id: model.id,
            date: model.date,
            amount: model.amount,
            reason: model.reason,
            note: model.note,
            color: model.color,
            method: model.method,
            status: Status::try_from(model.status_id)?,
            category_id: model.category_id,
            sub_category_id: model.sub_category_id,
            tag_ids: decode_tag_ids(&model.tag_ids),
            details: model.details,
            created_at: model.created_at,
            updated_at: model.updated_at,
            deleted_at: model.deleted_at,
        })
    }
}
