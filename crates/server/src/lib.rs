use api_types::envelope::ErrorBody;
use axum::{
    Json,
    extract::rejection::{JsonRejection, PathRejection},
    http::StatusCode,
    response::IntoResponse,
};
use axum_extra::extract::QueryRejection;
use engine::{EngineError, PageParams};

pub use server::{router, run, run_with_listener};

mod categories;
mod purchases;
mod server;
mod tags;
mod user;

#[derive(Debug)]
pub enum ServerError {
    Engine(EngineError),
    /// The request could not be decoded.
    Generic(String),
}

fn status_for_engine_error(err: &EngineError) -> StatusCode {
    match err {
        EngineError::InvalidInput(_) => StatusCode::BAD_REQUEST,
        EngineError::KeyNotFound(_) => StatusCode::NOT_FOUND,
        EngineError::ExistingKey(_) => StatusCode::CONFLICT,
        EngineError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
        EngineError::Forbidden(_) => StatusCode::FORBIDDEN,
        EngineError::Database(_) | EngineError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

fn message_for_engine_error(err: &EngineError) -> String {
    match err {
        EngineError::Database(db_err) => {
            tracing::error!("database error: {db_err}");
            "internal server error".to_string()
        }
        EngineError::Internal(reason) => {
            tracing::error!("internal error: {reason}");
            "internal server error".to_string()
        }
        other => other.to_string(),
    }
}

impl IntoResponse for ServerError {
    fn into_response(self) -> axum::response::Response {
        let (status, body) = match self {
            ServerError::Engine(err) => {
                let status = status_for_engine_error(&err);
                (status, ErrorBody::new(message_for_engine_error(&err), err.kind()))
            }
            ServerError::Generic(reason) => {
                tracing::warn!("rejected request: {reason}");
                (StatusCode::BAD_REQUEST, ErrorBody::new(reason, "invalid_input"))
            }
        };

        (status, Json(body)).into_response()
    }
}

impl From<EngineError> for ServerError {
    fn from(value: EngineError) -> Self {
        Self::Engine(value)
    }
}

impl From<JsonRejection> for ServerError {
    fn from(value: JsonRejection) -> Self {
        Self::Generic(value.body_text())
    }
}

impl From<QueryRejection> for ServerError {
    fn from(value: QueryRejection) -> Self {
        Self::Generic(value.to_string())
    }
}

impl From<PathRejection> for ServerError {
    fn from(value: PathRejection) -> Self {
        Self::Generic(value.body_text())
    }
}

/// Collect the paging fields every listing query carries.
fn page_params(
    start: Option<i64>,
    limit: Option<i64>,
    order_by: Option<String>,
    sort: Option<String>,
) -> PageParams {
    PageParams {
        start: start.unwrap_or_default(),
        limit: limit.unwrap_or_default(),
        order_by: order_by.unwrap_or_default(),
        sort: sort.unwrap_or_default(),
    }
}

/// An explicit `status_id` selects that status, none means active only.
fn status_filter(raw: Option<i32>) -> Result<Option<engine::Status>, ServerError> {
    raw.map(engine::Status::try_from)
        .transpose()
        .map_err(ServerError::from)
}
