//! Purchase endpoints.

use api_types::{
    envelope::Envelope,
    purchase::{PurchaseNew, PurchaseQuery, PurchaseUpdate, PurchaseView},
};
use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};
use axum_extra::extract::{Query, WithRejection};
use engine::{NewPurchase, PurchaseDetail, PurchaseFilter};

use crate::{
    ServerError, categories::map_summary, page_params, server::ServerState, status_filter,
    tags::map_tag,
};

fn map_purchase(detail: PurchaseDetail, with_audit: bool) -> PurchaseView {
    let purchase = detail.purchase;
    PurchaseView {
        id: purchase.id,
        date: purchase.date,
        amount: purchase.amount,
        reason: purchase.reason,
        note: purchase.note,
        color: purchase.color,
        method: purchase.method,
        status_id: purchase.status.as_i32(),
        category_id: purchase.category_id,
        sub_category_id: purchase.sub_category_id,
        category: detail.category.map(map_summary),
        sub_category: detail.sub_category.map(map_summary),
        tags: detail.tags.into_iter().map(map_tag).collect(),
        details: purchase.details,
        created_at: with_audit.then_some(purchase.created_at),
        updated_at: with_audit.then_some(purchase.updated_at),
    }
}

pub async fn create(
    State(state): State<ServerState>,
    WithRejection(Json(payload), _): WithRejection<Json<PurchaseNew>, ServerError>,
) -> Result<(StatusCode, Json<Envelope<PurchaseView>>), ServerError> {
    let detail = state
        .engine
        .add_purchase(NewPurchase {
            category_id: payload.category_id,
            sub_category_id: payload.sub_category_id,
            tag_ids: payload.tag_ids,
            date: payload.date,
            amount: payload.amount,
            reason: payload.reason,
            note: payload.note,
            color: payload.color,
            method: payload.method.unwrap_or_default(),
            status: payload.status_id,
            details: payload.details,
        })
        .await?;
    Ok((
        StatusCode::CREATED,
        Json(Envelope::new("created", map_purchase(detail, false))),
    ))
}

pub async fn list(
    State(state): State<ServerState>,
    WithRejection(Query(query), _): WithRejection<Query<PurchaseQuery>, ServerError>,
) -> Result<Json<Envelope<Vec<PurchaseView>>>, ServerError> {
    let with_audit = query.other_fields.unwrap_or(false);
    let tag_ids = query.tag_filter();
    let filter = PurchaseFilter {
        id: query.id,
        category_id: query.category_id,
        sub_category_id: query.sub_category_id,
        reason: query.reason,
        note: query.note,
        color: query.color,
        method: query.method,
        amount: query.amount,
        status: status_filter(query.status_id)?,
        tag_ids,
    };
    let page = page_params(query.start, query.limit, query.order_by, query.sort);

    let page = state.engine.list_purchases(&filter, &page).await?;
    let count = page.count;
    let items = page
        .items
        .into_iter()
        .map(|detail| map_purchase(detail, with_audit))
        .collect();
    Ok(Json(Envelope::new("purchases found", items).with_count(count)))
}

pub async fn update(
    State(state): State<ServerState>,
    WithRejection(Json(payload), _): WithRejection<Json<PurchaseUpdate>, ServerError>,
) -> Result<Json<Envelope<PurchaseView>>, ServerError> {
    let detail = state
        .engine
        .update_purchase(
            payload.id,
            engine::PurchaseUpdate {
                category_id: payload.category_id,
                sub_category_id: payload.sub_category_id,
                tag_ids: payload.tag_ids,
                reason: payload.reason,
                status: payload.status_id,
                details: payload.details,
                date: payload.date,
                amount: payload.amount,
                note: payload.note.unwrap_or_default(),
                color: payload.color.unwrap_or_default(),
                method: payload.method.unwrap_or_default(),
            },
        )
        .await?;
    Ok(Json(Envelope::new(
        "updated successfully",
        map_purchase(detail, false),
    )))
}

pub async fn remove(
    State(state): State<ServerState>,
    WithRejection(Path(id), _): WithRejection<Path<i32>, ServerError>,
) -> Result<Json<Envelope<i32>>, ServerError> {
    state.engine.remove_purchase(id).await?;
    Ok(Json(Envelope::new("removed successfully", id)))
}
