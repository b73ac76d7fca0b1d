use chrono::Utc;

use crate::{
    Category, CategoryFilter, EngineError, ResultEngine, Status, Tag, categories,
    listing::{PageParams, Paged},
    util::normalize_optional_text,
};

use super::{Engine, tags::pick_tags};

#[derive(Clone, Debug, Default)]
pub struct NewCategory {
    pub title: String,
    pub status: Option<i32>,
    pub color: Option<String>,
    /// Comma-separated tag ids.
    pub tag_ids: Option<String>,
}

/// Partial category update; blank or zero fields are left untouched.
#[derive(Clone, Debug, Default)]
pub struct CategoryPatch {
    pub title: Option<String>,
    pub status: Option<i32>,
    pub color: Option<String>,
    pub tag_ids: Option<String>,
}

/// A category with its tag list resolved.
#[derive(Clone, Debug, PartialEq)]
pub struct CategoryDetail {
    pub category: Category,
    pub tags: Vec<Tag>,
}

impl Engine {
    pub async fn add_category(&self, input: NewCategory) -> ResultEngine<CategoryDetail> {
        let status = Status::from_input(input.status)?.unwrap_or_default();
        let color = normalize_optional_text(input.color.as_deref()).unwrap_or_default();
        let mut category = Category::new(&input.title, status, color, Vec::new())?;
        self.ensure_slug_free(&category.slug, None).await?;

        let tags = match normalize_optional_text(input.tag_ids.as_deref()) {
            Some(raw) => self.resolve_tag_list(&raw).await?,
            None => Vec::new(),
        };
        category.tag_ids = tags.iter().map(|tag| tag.id).collect();

        let category = self.categories.insert(&category).await?;
        tracing::debug!(category_id = category.id, slug = %category.slug, "category created");
        Ok(CategoryDetail { category, tags })
    }

    pub async fn list_categories(
        &self,
        filter: &CategoryFilter,
        page: &PageParams,
    ) -> ResultEngine<Paged<CategoryDetail>> {
        let page = page.normalize(categories::ORDERABLE_COLUMNS);
        let found = self.categories.find_all(filter, &page).await?;
        let lookup = self
            .tags_by_id(found.items.iter().map(|c| c.tag_ids.as_slice()))
            .await?;

        Ok(found.map(|category| CategoryDetail {
            tags: pick_tags(&category.tag_ids, &lookup),
            category,
        }))
    }

    pub async fn update_category(
        &self,
        id: i32,
        patch: CategoryPatch,
    ) -> ResultEngine<CategoryDetail> {
        let mut category = self
            .categories
            .find_by_id(id, None)
            .await?
            .ok_or_else(|| EngineError::KeyNotFound("category not found".to_string()))?;
        let was_active = category.status.is_active();
        let previous_slug = category.slug.clone();

        if let Some(title) = normalize_optional_text(patch.title.as_deref()) {
            category.retitle(&title)?;
        }
        if let Some(status) = Status::from_input(patch.status)? {
            category.status = status;
        }
        if category.status.is_active() {
            category.deleted_at = None;
        }
        if let Some(color) = normalize_optional_text(patch.color.as_deref()) {
            category.color = color;
        }
        if let Some(raw) = normalize_optional_text(patch.tag_ids.as_deref()) {
            let tags = self.resolve_tag_list(&raw).await?;
            category.tag_ids = tags.iter().map(|tag| tag.id).collect();
        }
        if category.status.is_active() && (category.slug != previous_slug || !was_active) {
            self.ensure_slug_free(&category.slug, Some(category.id))
                .await?;
        }

        category.updated_at = Utc::now();
        let category = self.categories.update(&category).await?;
        let lookup = self.tags_by_id([category.tag_ids.as_slice()]).await?;
        Ok(CategoryDetail {
            tags: pick_tags(&category.tag_ids, &lookup),
            category,
        })
    }

    pub async fn remove_category(&self, id: i32) -> ResultEngine<()> {
        let category = self
            .categories
            .find_by_id(id, Some(Status::Active))
            .await?
            .ok_or_else(|| EngineError::KeyNotFound("category not found".to_string()))?;
        self.categories.soft_delete(category.id).await?;
        tracing::debug!(category_id = category.id, "category removed");
        Ok(())
    }

    async fn ensure_slug_free(&self, slug: &str, exclude: Option<i32>) -> ResultEngine<()> {
        match self.categories.find_by_slug(slug, Status::Active).await? {
            Some(existing) if Some(existing.id) != exclude => Err(EngineError::ExistingKey(
                format!("slug({slug}) duplicate"),
            )),
            _ => Ok(()),
        }
    }
}
