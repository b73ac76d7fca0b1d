use std::collections::HashMap;

use chrono::Utc;

use crate::{
    EngineError, ResultEngine, Status, Tag, TagFilter,
    listing::{PageParams, Paged},
    tags,
    util::{normalize_optional_text, parse_tag_ids},
};

use super::Engine;

#[derive(Clone, Debug, Default)]
pub struct NewTag {
    pub title: String,
    pub status: Option<i32>,
}

/// Partial tag update; blank or zero fields are left untouched.
#[derive(Clone, Debug, Default)]
pub struct TagPatch {
    pub title: Option<String>,
    pub status: Option<i32>,
}

impl Engine {
    pub async fn add_tag(&self, input: NewTag) -> ResultEngine<Tag> {
        let status = Status::from_input(input.status)?.unwrap_or_default();
        let tag = Tag::new(&input.title, status)?;
        self.ensure_tag_title_free(&tag.title, None).await?;

        let tag = self.tags.insert(&tag).await?;
        tracing::debug!(tag_id = tag.id, "tag created");
        Ok(tag)
    }

    /// Active tag by id.
    pub async fn tag(&self, id: i32) -> ResultEngine<Tag> {
        self.tags
            .find_by_id(id, Some(Status::Active))
            .await?
            .ok_or_else(|| EngineError::KeyNotFound("tag not found".to_string()))
    }

    pub async fn list_tags(&self, filter: &TagFilter, page: &PageParams) -> ResultEngine<Paged<Tag>> {
        let page = page.normalize(tags::ORDERABLE_COLUMNS);
        self.tags.find_all(filter, &page).await
    }

    pub async fn update_tag(&self, id: i32, patch: TagPatch) -> ResultEngine<Tag> {
        let mut tag = self
            .tags
            .find_by_id(id, None)
            .await?
            .ok_or_else(|| EngineError::KeyNotFound("tag not found".to_string()))?;
        let was_active = tag.status.is_active();
        let title_changed = match normalize_optional_text(patch.title.as_deref()) {
            Some(title) if title != tag.title => {
                tag.title = title;
                true
            }
            _ => false,
        };
        if let Some(status) = Status::from_input(patch.status)? {
            tag.status = status;
        }
        if tag.status.is_active() {
            tag.deleted_at = None;
        }
        if tag.status.is_active() && (title_changed || !was_active) {
            self.ensure_tag_title_free(&tag.title, Some(tag.id)).await?;
        }

        tag.updated_at = Utc::now();
        self.tags.update(&tag).await
    }

    pub async fn remove_tag(&self, id: i32) -> ResultEngine<()> {
        let tag = self.tag(id).await?;
        self.tags.soft_delete(tag.id).await?;
        tracing::debug!(tag_id = tag.id, "tag removed");
        Ok(())
    }

    async fn ensure_tag_title_free(&self, title: &str, exclude: Option<i32>) -> ResultEngine<()> {
        match self.tags.find_by_title(title, Status::Active).await? {
            Some(existing) if Some(existing.id) != exclude => {
                Err(EngineError::ExistingKey("tag duplicate".to_string()))
            }
            _ => Ok(()),
        }
    }

    /// Parse a client tag list and require every id to be an active tag.
    ///
    /// Tags come back in the order they were listed.
    pub(super) async fn resolve_tag_list(&self, raw: &str) -> ResultEngine<Vec<Tag>> {
        let ids = parse_tag_ids(raw)?;
        let mut found: HashMap<i32, Tag> = self
            .tags
            .find_by_ids(&ids, Some(Status::Active))
            .await?
            .into_iter()
            .map(|tag| (tag.id, tag))
            .collect();

        ids.into_iter()
            .map(|id| {
                found
                    .remove(&id)
                    .ok_or_else(|| EngineError::KeyNotFound(format!("tag not found: {id}")))
            })
            .collect()
    }

    /// Load every tag referenced by `lists`, whatever its status.
    pub(super) async fn tags_by_id<'a>(
        &self,
        lists: impl IntoIterator<Item = &'a [i32]>,
    ) -> ResultEngine<HashMap<i32, Tag>> {
        let mut ids: Vec<i32> = lists.into_iter().flatten().copied().collect();
        ids.sort_unstable();
        ids.dedup();
        Ok(self
            .tags
            .find_by_ids(&ids, None)
            .await?
            .into_iter()
            .map(|tag| (tag.id, tag))
            .collect())
    }
}

/// Pick the tags named by `ids` out of a lookup, skipping unknown ones.
pub(super) fn pick_tags(ids: &[i32], lookup: &HashMap<i32, Tag>) -> Vec<Tag> {
    ids.iter().filter_map(|id| lookup.get(id).cloned()).collect()
}
