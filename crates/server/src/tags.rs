use api_types::{
    envelope::Envelope,
    tag::{TagNew, TagQuery, TagUpdate, TagView},
};
use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};
use axum_extra::extract::{Query, WithRejection};
use engine::{NewTag, TagFilter, TagPatch};

use crate::{ServerError, page_params, server::ServerState, status_filter};

pub(crate) fn map_tag(tag: engine::Tag) -> TagView {
    TagView {
        id: tag.id,
        title: tag.title,
        status_id: tag.status.as_i32(),
        created_at: tag.created_at,
    }
}

pub async fn create(
    State(state): State<ServerState>,
    WithRejection(Json(payload), _): WithRejection<Json<TagNew>, ServerError>,
) -> Result<(StatusCode, Json<Envelope<TagView>>), ServerError> {
    let tag = state
        .engine
        .add_tag(NewTag {
            title: payload.title,
            status: payload.status_id,
        })
        .await?;
    Ok((StatusCode::CREATED, Json(Envelope::new("created", map_tag(tag)))))
}

pub async fn list(
    State(state): State<ServerState>,
    WithRejection(Query(query), _): WithRejection<Query<TagQuery>, ServerError>,
) -> Result<Json<Envelope<Vec<TagView>>>, ServerError> {
    let filter = TagFilter {
        id: query.id,
        title: query.title,
        status: status_filter(query.status_id)?,
    };
    let page = page_params(query.start, query.limit, query.order_by, query.sort);

    let page = state.engine.list_tags(&filter, &page).await?;
    let count = page.count;
    let items = page.items.into_iter().map(map_tag).collect();
    Ok(Json(Envelope::new("tags found", items).with_count(count)))
}

pub async fn update(
    State(state): State<ServerState>,
    WithRejection(Json(payload), _): WithRejection<Json<TagUpdate>, ServerError>,
) -> Result<Json<Envelope<TagView>>, ServerError> {
    let tag = state
        .engine
        .update_tag(
            payload.id,
            TagPatch {
                title: payload.title,
                status: payload.status_id,
            },
        )
        .await?;
    Ok(Json(Envelope::new("updated successfully", map_tag(tag))))
}

pub async fn remove(
    State(state): State<ServerState>,
    WithRejection(Path(id), _): WithRejection<Path<i32>, ServerError>,
) -> Result<Json<Envelope<i32>>, ServerError> {
    state.engine.remove_tag(id).await?;
    Ok(Json(Envelope::new("removed successfully", id)))
}
