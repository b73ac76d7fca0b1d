use std::collections::HashMap;

use chrono::{DateTime, Utc};

use crate::{
    Category, EngineError, Purchase, PurchaseDetail, PurchaseFilter, ResultEngine, Status,
    listing::{PageParams, Paged},
    purchases::{self, validate_amount},
    util::normalize_optional_text,
};

use super::{Engine, tags::pick_tags};

#[derive(Clone, Debug)]
pub struct NewPurchase {
    pub category_id: i32,
    pub sub_category_id: Option<i32>,
    /// Comma-separated tag ids.
    pub tag_ids: Option<String>,
    pub date: DateTime<Utc>,
    pub amount: i64,
    pub reason: Option<String>,
    pub note: Option<String>,
    pub color: Option<String>,
    pub method: i16,
    pub status: Option<i32>,
    pub details: Option<serde_json::Value>,
}

/// Purchase update.
///
/// References, reason, status and details are partial. Amount, date, note,
/// color and method always replace the stored values.
#[derive(Clone, Debug)]
pub struct PurchaseUpdate {
    pub category_id: Option<i32>,
    pub sub_category_id: Option<i32>,
    pub tag_ids: Option<String>,
    pub reason: Option<String>,
    pub status: Option<i32>,
    pub details: Option<serde_json::Value>,
    pub date: DateTime<Utc>,
    pub amount: i64,
    pub note: String,
    pub color: String,
    pub method: i16,
}

fn non_null(details: Option<serde_json::Value>) -> Option<serde_json::Value> {
    details.filter(|value| !value.is_null())
}

impl Engine {
    pub async fn add_purchase(&self, input: NewPurchase) -> ResultEngine<PurchaseDetail> {
        let category = self
            .active_category(input.category_id, "category not found")
            .await?;
        let sub_category = match input.sub_category_id {
            Some(id) => Some(self.active_category(id, "sub category not found").await?),
            None => None,
        };
        let tags = match normalize_optional_text(input.tag_ids.as_deref()) {
            Some(raw) => self.resolve_tag_list(&raw).await?,
            None => Vec::new(),
        };

        let mut purchase = Purchase::new(category.id, input.date, input.amount)?;
        purchase.sub_category_id = sub_category.as_ref().map(|c| c.id);
        purchase.tag_ids = tags.iter().map(|tag| tag.id).collect();
        purchase.reason = normalize_optional_text(input.reason.as_deref()).unwrap_or_default();
        purchase.note = input.note.unwrap_or_default();
        purchase.color = normalize_optional_text(input.color.as_deref()).unwrap_or_default();
        purchase.method = input.method;
        purchase.status = Status::from_input(input.status)?.unwrap_or_default();
        purchase.details = non_null(input.details);

        let purchase = self.purchases.insert(&purchase).await?;
        tracing::debug!(purchase_id = purchase.id, category_id = category.id, "purchase created");
        Ok(PurchaseDetail {
            purchase,
            category: Some(category),
            sub_category,
            tags,
        })
    }

    /// Lists purchases with their active categories and tags attached.
    pub async fn list_purchases(
        &self,
        filter: &PurchaseFilter,
        page: &PageParams,
    ) -> ResultEngine<Paged<PurchaseDetail>> {
        let page = page.normalize(purchases::ORDERABLE_COLUMNS);
        let found = self.purchases.find_all(filter, &page).await?;

        let mut category_ids: Vec<i32> = found
            .items
            .iter()
            .flat_map(|p| std::iter::once(p.category_id).chain(p.sub_category_id))
            .collect();
        category_ids.sort_unstable();
        category_ids.dedup();
        let categories: HashMap<i32, Category> = self
            .categories
            .find_by_ids(&category_ids, Some(Status::Active))
            .await?
            .into_iter()
            .map(|category| (category.id, category))
            .collect();
        let tags = self
            .tags_by_id(found.items.iter().map(|p| p.tag_ids.as_slice()))
            .await?;

        Ok(found.map(|purchase| PurchaseDetail {
            category: categories.get(&purchase.category_id).cloned(),
            sub_category: purchase
                .sub_category_id
                .and_then(|id| categories.get(&id).cloned()),
            tags: pick_tags(&purchase.tag_ids, &tags),
            purchase,
        }))
    }

    pub async fn update_purchase(
        &self,
        id: i32,
        update: PurchaseUpdate,
    ) -> ResultEngine<PurchaseDetail> {
        let mut purchase = self
            .purchases
            .find_by_id(id, None)
            .await?
            .ok_or_else(|| EngineError::KeyNotFound("purchase not found".to_string()))?;

        if let Some(category_id) = update.category_id {
            purchase.category_id = self
                .active_category(category_id, "category not found")
                .await?
                .id;
        }
        if let Some(sub_category_id) = update.sub_category_id {
            purchase.sub_category_id = Some(
                self.active_category(sub_category_id, "sub category not found")
                    .await?
                    .id,
            );
        }
        if let Some(raw) = normalize_optional_text(update.tag_ids.as_deref()) {
            let tags = self.resolve_tag_list(&raw).await?;
            purchase.tag_ids = tags.iter().map(|tag| tag.id).collect();
        }
        if let Some(reason) = normalize_optional_text(update.reason.as_deref()) {
            purchase.reason = reason;
        }
        if let Some(status) = Status::from_input(update.status)? {
            purchase.status = status;
        }
        if purchase.status.is_active() {
            purchase.deleted_at = None;
        }
        if let Some(details) = non_null(update.details) {
            purchase.details = Some(details);
        }
        purchase.amount = validate_amount(update.amount)?;
        purchase.date = update.date;
        purchase.note = update.note;
        purchase.color = update.color.trim().to_string();
        purchase.method = update.method;

        purchase.updated_at = Utc::now();
        let purchase = self.purchases.update(&purchase).await?;
        self.purchase_detail(purchase).await
    }

    pub async fn remove_purchase(&self, id: i32) -> ResultEngine<()> {
        let purchase = self
            .purchases
            .find_by_id(id, Some(Status::Active))
            .await?
            .ok_or_else(|| EngineError::KeyNotFound("purchase not found".to_string()))?;
        self.purchases.soft_delete(purchase.id).await?;
        tracing::debug!(purchase_id = purchase.id, "purchase removed");
        Ok(())
    }

    async fn active_category(&self, id: i32, missing: &str) -> ResultEngine<Category> {
        self.categories
            .find_by_id(id, Some(Status::Active))
            .await?
            .ok_or_else(|| EngineError::KeyNotFound(missing.to_string()))
    }

    async fn purchase_detail(&self, purchase: Purchase) -> ResultEngine<PurchaseDetail> {
        let category = self
            .categories
            .find_by_id(purchase.category_id, Some(Status::Active))
            .await?;
        let sub_category = match purchase.sub_category_id {
            Some(id) => self.categories.find_by_id(id, Some(Status::Active)).await?,
            None => None,
        };
        let tags = self.tags_by_id([purchase.tag_ids.as_slice()]).await?;

        Ok(PurchaseDetail {
            category,
            sub_category,
            tags: pick_tags(&purchase.tag_ids, &tags),
            purchase,
        })
    }
}
