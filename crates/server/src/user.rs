//! Authentication and user administration endpoints.

use api_types::{
    envelope::Envelope,
    user::{Credentials, LoginResponse, UserQuery, UserUpdate, UserView},
};
use axum::{
    Extension, Json,
    extract::{Path, State},
    http::StatusCode,
};
use axum_extra::extract::{Query, WithRejection};
use engine::{AuthenticatedUser, ManagementLevel, NewUser, Status, UserFilter, UserPatch};

use crate::{
    ServerError, page_params,
    server::{BearerToken, ServerState},
    status_filter,
};

fn map_user(user: engine::User) -> UserView {
    UserView {
        id: user.id,
        username: user.username,
        level_manage: user.level.as_i32(),
        status_id: user.status.as_i32(),
        created_at: user.created_at,
        updated_at: user.updated_at,
    }
}

/// Self-service registration, always a regular active user.
pub async fn signup(
    State(state): State<ServerState>,
    WithRejection(Json(payload), _): WithRejection<Json<Credentials>, ServerError>,
) -> Result<(StatusCode, Json<Envelope<UserView>>), ServerError> {
    let user = state
        .engine
        .add_user(NewUser {
            username: payload.username,
            password: payload.password,
            level: Some(ManagementLevel::User.as_i32()),
            status: Some(Status::Active.as_i32()),
        })
        .await?;
    Ok((
        StatusCode::CREATED,
        Json(Envelope::new("user registered successfully", map_user(user))),
    ))
}

pub async fn login(
    State(state): State<ServerState>,
    WithRejection(Json(payload), _): WithRejection<Json<Credentials>, ServerError>,
) -> Result<Json<Envelope<LoginResponse>>, ServerError> {
    let session = state
        .engine
        .login(&payload.username, &payload.password)
        .await?;
    Ok(Json(Envelope::new(
        "logged in",
        LoginResponse {
            token: session.token,
            level_manage: session.level.as_i32(),
            user_id: session.user_id,
        },
    )))
}

pub async fn logout(
    Extension(caller): Extension<AuthenticatedUser>,
    Extension(BearerToken(token)): Extension<BearerToken>,
    State(state): State<ServerState>,
) -> Result<Json<Envelope<i32>>, ServerError> {
    state.engine.logout(&token).await?;
    Ok(Json(Envelope::new("logged out", caller.id)))
}

pub async fn list(
    State(state): State<ServerState>,
    WithRejection(Query(query), _): WithRejection<Query<UserQuery>, ServerError>,
) -> Result<Json<Envelope<Vec<UserView>>>, ServerError> {
    let filter = UserFilter {
        id: query.id,
        username: query.username,
        level: query
            .level_manage
            .map(ManagementLevel::try_from)
            .transpose()?,
        status: status_filter(query.status_id)?,
    };
    let page = page_params(query.start, query.limit, query.order_by, query.sort);

    let page = state.engine.list_users(&filter, &page).await?;
    let count = page.count;
    let items = page.items.into_iter().map(map_user).collect();
    Ok(Json(Envelope::new("users found", items).with_count(count)))
}

pub async fn update(
    State(state): State<ServerState>,
    WithRejection(Json(payload), _): WithRejection<Json<UserUpdate>, ServerError>,
) -> Result<Json<Envelope<UserView>>, ServerError> {
    let user = state
        .engine
        .update_user(
            payload.id,
            UserPatch {
                username: payload.username,
                password: payload.password,
                level: payload.level_manage,
                status: payload.status_id,
            },
        )
        .await?;
    Ok(Json(Envelope::new("updated successfully", map_user(user))))
}

pub async fn remove(
    State(state): State<ServerState>,
    WithRejection(Path(id), _): WithRejection<Path<i32>, ServerError>,
) -> Result<Json<Envelope<i32>>, ServerError> {
    state.engine.remove_user(id).await?;
    Ok(Json(Envelope::new("removed successfully", id)))
}
