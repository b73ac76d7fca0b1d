use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

pub mod envelope {
    use super::*;

    /// Success body shared by every endpoint.
    ///
    /// `count` is only present on listings and carries the number of rows
    /// matching the filters before pagination.
    #[derive(Debug, Serialize, Deserialize)]
    pub struct Envelope<T> {
        pub message: String,
        pub response: T,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        pub count: Option<u64>,
    }

    impl<T> Envelope<T> {
        pub fn new(message: impl Into<String>, response: T) -> Self {
            Self {
                message: message.into(),
                response,
                count: None,
            }
        }

        pub fn with_count(mut self, count: u64) -> Self {
            self.count = Some(count);
            self
        }
    }

    /// Failure body. `response` is always `null`.
    #[derive(Debug, Serialize, Deserialize)]
    pub struct ErrorBody {
        pub message: String,
        pub response: serde_json::Value,
        pub err: String,
    }

    impl ErrorBody {
        pub fn new(message: impl Into<String>, err: impl Into<String>) -> Self {
            Self {
                message: message.into(),
                response: serde_json::Value::Null,
                err: err.into(),
            }
        }
    }
}

/// Accepts RFC 3339 timestamps or bare `YYYY-MM-DD` dates (midnight UTC).
pub mod flexible_date {
    use chrono::{NaiveDate, NaiveTime};
    use serde::{Deserializer, de::Error};

    use super::*;

    pub fn parse(raw: &str) -> Option<DateTime<Utc>> {
        let raw = raw.trim();
        if let Ok(ts) = DateTime::parse_from_rfc3339(raw) {
            return Some(ts.with_timezone(&Utc));
        }
        NaiveDate::parse_from_str(raw, "%Y-%m-%d")
            .ok()
            .map(|date| date.and_time(NaiveTime::MIN).and_utc())
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<DateTime<Utc>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = String::deserialize(deserializer)?;
        parse(&raw).ok_or_else(|| D::Error::custom(format!("invalid date: {raw}")))
    }
}

pub mod tag {
    use super::*;

    #[derive(Debug, Serialize, Deserialize)]
    pub struct TagNew {
        pub title: String,
        pub status_id: Option<i32>,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct TagUpdate {
        pub id: i32,
        pub title: Option<String>,
        pub status_id: Option<i32>,
    }

    #[derive(Debug, Default, Serialize, Deserialize)]
    pub struct TagQuery {
        pub id: Option<i32>,
        pub title: Option<String>,
        pub status_id: Option<i32>,
        pub start: Option<i64>,
        pub limit: Option<i64>,
        pub order_by: Option<String>,
        pub sort: Option<String>,
    }

    #[derive(Clone, Debug, Serialize, Deserialize)]
    pub struct TagView {
        pub id: i32,
        pub title: String,
        pub status_id: i32,
        pub created_at: DateTime<Utc>,
    }
}

pub mod category {
    use super::*;
    use crate::tag::TagView;

    #[derive(Debug, Serialize, Deserialize)]
    pub struct CategoryNew {
        pub title: String,
        pub status_id: Option<i32>,
        pub color: Option<String>,
        /// Comma separated tag ids, e.g. `"1,2,3"`.
        pub tag_ids: Option<String>,
    }

    /// Partial update; blank strings and zero status leave the field alone.
    #[derive(Debug, Serialize, Deserialize)]
    pub struct CategoryUpdate {
        pub id: i32,
        pub title: Option<String>,
        pub status_id: Option<i32>,
        pub color: Option<String>,
        pub tag_ids: Option<String>,
    }

    #[derive(Debug, Default, Serialize, Deserialize)]
    pub struct CategoryQuery {
        pub id: Option<i32>,
        pub title: Option<String>,
        pub slug: Option<String>,
        pub color: Option<String>,
        pub status_id: Option<i32>,
        #[serde(rename = "tag_ids[]", default)]
        pub tag_ids: Vec<i32>,
        #[serde(rename = "tag_ids", default, skip_serializing_if = "Vec::is_empty")]
        pub plain_tag_ids: Vec<i32>,
        pub start: Option<i64>,
        pub limit: Option<i64>,
        pub order_by: Option<String>,
        pub sort: Option<String>,
    }

    impl CategoryQuery {
        /// Tag ids from both the `tag_ids[]` and `tag_ids` keys.
        pub fn tag_filter(&self) -> Vec<i32> {
            crate::merge_tag_ids(&self.tag_ids, &self.plain_tag_ids)
        }
    }

    #[derive(Clone, Debug, Serialize, Deserialize)]
    pub struct CategoryView {
        pub id: i32,
        pub title: String,
        pub slug: String,
        pub status_id: i32,
        pub color: String,
        pub tags: Vec<TagView>,
        pub created_at: DateTime<Utc>,
    }

    /// Category embedded in a purchase.
    #[derive(Clone, Debug, Serialize, Deserialize)]
    pub struct CategorySummary {
        pub id: i32,
        pub title: String,
        pub slug: String,
        pub status_id: i32,
        pub color: String,
        pub created_at: DateTime<Utc>,
    }
}

pub mod purchase {
    use super::*;
    use crate::{category::CategorySummary, tag::TagView};

    #[derive(Debug, Serialize, Deserialize)]
    pub struct PurchaseNew {
        pub category_id: i32,
        pub sub_category_id: Option<i32>,
        /// Comma separated tag ids, e.g. `"1,2,3"`.
        pub tag_ids: Option<String>,
        #[serde(deserialize_with = "crate::flexible_date::deserialize")]
        pub date: DateTime<Utc>,
        /// Minor currency units, never zero.
        pub amount: i64,
        pub reason: Option<String>,
        pub note: Option<String>,
        pub color: Option<String>,
        pub method: Option<i16>,
        pub status_id: Option<i32>,
        pub details: Option<serde_json::Value>,
    }

    /// Reason, status, references and details are partial. Date, amount,
    /// note, color and method always replace the stored values.
    #[derive(Debug, Serialize, Deserialize)]
    pub struct PurchaseUpdate {
        pub id: i32,
        pub category_id: Option<i32>,
        pub sub_category_id: Option<i32>,
        pub tag_ids: Option<String>,
        #[serde(deserialize_with = "crate::flexible_date::deserialize")]
        pub date: DateTime<Utc>,
        pub amount: i64,
        pub reason: Option<String>,
        pub note: Option<String>,
        pub color: Option<String>,
        pub method: Option<i16>,
        pub status_id: Option<i32>,
        pub details: Option<serde_json::Value>,
    }

    #[derive(Debug, Default, Serialize, Deserialize)]
    pub struct PurchaseQuery {
        pub id: Option<i32>,
        pub category_id: Option<i32>,
        pub sub_category_id: Option<i32>,
        pub reason: Option<String>,
        pub note: Option<String>,
        pub color: Option<String>,
        pub method: Option<i16>,
        pub amount: Option<i64>,
        pub status_id: Option<i32>,
        #[serde(rename = "tag_ids[]", default)]
        pub tag_ids: Vec<i32>,
        #[serde(rename = "tag_ids", default, skip_serializing_if = "Vec::is_empty")]
        pub plain_tag_ids: Vec<i32>,
        /// Adds `created_at` and `updated_at` to each item.
        pub other_fields: Option<bool>,
        pub start: Option<i64>,
        pub limit: Option<i64>,
        pub order_by: Option<String>,
        pub sort: Option<String>,
    }

    impl PurchaseQuery {
        /// Tag ids from both the `tag_ids[]` and `tag_ids` keys.
        pub fn tag_filter(&self) -> Vec<i32> {
            crate::merge_tag_ids(&self.tag_ids, &self.plain_tag_ids)
        }
    }

    #[derive(Clone, Debug, Serialize, Deserialize)]
    pub struct PurchaseView {
        pub id: i32,
        pub date: DateTime<Utc>,
        pub amount: i64,
        pub reason: String,
        pub note: String,
        pub color: String,
        pub method: i16,
        pub status_id: i32,
        pub category_id: i32,
        pub sub_category_id: Option<i32>,
        pub category: Option<CategorySummary>,
        pub sub_category: Option<CategorySummary>,
        pub tags: Vec<TagView>,
        pub details: Option<serde_json::Value>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        pub created_at: Option<DateTime<Utc>>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        pub updated_at: Option<DateTime<Utc>>,
    }
}

pub mod user {
    use super::*;

    #[derive(Debug, Serialize, Deserialize)]
    pub struct Credentials {
        pub username: String,
        pub password: String,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct LoginResponse {
        pub token: String,
        pub level_manage: i32,
        pub user_id: i32,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct UserUpdate {
        pub id: i32,
        pub username: Option<String>,
        pub password: Option<String>,
        pub level_manage: Option<i32>,
        pub status_id: Option<i32>,
    }

    #[derive(Debug, Default, Serialize, Deserialize)]
    pub struct UserQuery {
        pub id: Option<i32>,
        pub username: Option<String>,
        pub level_manage: Option<i32>,
        pub status_id: Option<i32>,
        pub start: Option<i64>,
        pub limit: Option<i64>,
        pub order_by: Option<String>,
        pub sort: Option<String>,
    }

    /// Public user shape, the password hash is never exposed.
    #[derive(Clone, Debug, Serialize, Deserialize)]
    pub struct UserView {
        pub id: i32,
        pub username: String,
        pub level_manage: i32,
        pub status_id: i32,
        pub created_at: DateTime<Utc>,
        pub updated_at: DateTime<Utc>,
    }
}

/// Join the two tag filter key forms, dropping repeats.
fn merge_tag_ids(bracketed: &[i32], plain: &[i32]) -> Vec<i32> {
    let mut ids = Vec::with_capacity(bracketed.len() + plain.len());
    for id in bracketed.iter().chain(plain) {
        if !ids.contains(id) {
            ids.push(*id);
        }
    }
    ids
}
