//! Category endpoints, mounted under both `/admin` and `/system`.

use api_types::{
    category::{CategoryNew, CategoryQuery, CategorySummary, CategoryUpdate, CategoryView},
    envelope::Envelope,
};
use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};
use axum_extra::extract::{Query, WithRejection};
use engine::{CategoryDetail, CategoryFilter, CategoryPatch, NewCategory, Status};

use crate::{ServerError, page_params, server::ServerState, status_filter, tags::map_tag};

pub(crate) fn map_summary(category: engine::Category) -> CategorySummary {
    CategorySummary {
        id: category.id,
        title: category.title,
        slug: category.slug,
        status_id: category.status.as_i32(),
        color: category.color,
        created_at: category.created_at,
    }
}

fn map_category(detail: CategoryDetail) -> CategoryView {
    let category = detail.category;
    CategoryView {
        id: category.id,
        title: category.title,
        slug: category.slug,
        status_id: category.status.as_i32(),
        color: category.color,
        tags: detail.tags.into_iter().map(map_tag).collect(),
        created_at: category.created_at,
    }
}

fn split_query(query: CategoryQuery) -> Result<(CategoryFilter, engine::PageParams), ServerError> {
    let tag_ids = query.tag_filter();
    let filter = CategoryFilter {
        id: query.id,
        title: query.title,
        slug: query.slug,
        color: query.color,
        status: status_filter(query.status_id)?,
        tag_ids,
    };
    Ok((
        filter,
        page_params(query.start, query.limit, query.order_by, query.sort),
    ))
}

async fn respond_list(
    state: &ServerState,
    filter: CategoryFilter,
    page: engine::PageParams,
) -> Result<Json<Envelope<Vec<CategoryView>>>, ServerError> {
    let page = state.engine.list_categories(&filter, &page).await?;
    let count = page.count;
    let items = page.items.into_iter().map(map_category).collect();
    Ok(Json(Envelope::new("categories found", items).with_count(count)))
}

pub async fn create(
    State(state): State<ServerState>,
    WithRejection(Json(payload), _): WithRejection<Json<CategoryNew>, ServerError>,
) -> Result<(StatusCode, Json<Envelope<CategoryView>>), ServerError> {
    let detail = state
        .engine
        .add_category(NewCategory {
            title: payload.title,
            status: payload.status_id,
            color: payload.color,
            tag_ids: payload.tag_ids,
        })
        .await?;
    Ok((
        StatusCode::CREATED,
        Json(Envelope::new("created", map_category(detail))),
    ))
}

/// Admin listing, any status may be requested.
pub async fn list(
    State(state): State<ServerState>,
    WithRejection(Query(query), _): WithRejection<Query<CategoryQuery>, ServerError>,
) -> Result<Json<Envelope<Vec<CategoryView>>>, ServerError> {
    let (filter, page) = split_query(query)?;
    respond_list(&state, filter, page).await
}

/// Member listing, pinned to active categories.
pub async fn list_active(
    State(state): State<ServerState>,
    WithRejection(Query(query), _): WithRejection<Query<CategoryQuery>, ServerError>,
) -> Result<Json<Envelope<Vec<CategoryView>>>, ServerError> {
    let (mut filter, page) = split_query(query)?;
    filter.status = Some(Status::Active);
    respond_list(&state, filter, page).await
}

pub async fn update(
    State(state): State<ServerState>,
    WithRejection(Json(payload), _): WithRejection<Json<CategoryUpdate>, ServerError>,
) -> Result<Json<Envelope<CategoryView>>, ServerError> {
    let detail = state
        .engine
        .update_category(
            payload.id,
            CategoryPatch {
                title: payload.title,
                status: payload.status_id,
                color: payload.color,
                tag_ids: payload.tag_ids,
            },
        )
        .await?;
    Ok(Json(Envelope::new("updated successfully", map_category(detail))))
}

pub async fn remove(
    State(state): State<ServerState>,
    WithRejection(Path(id), _): WithRejection<Path<i32>, ServerError>,
) -> Result<Json<Envelope<i32>>, ServerError> {
    state.engine.remove_category(id).await?;
    Ok(Json(Envelope::new("removed successfully", id)))
}
