use axum::{
    Router,
    extract::{Request, State},
    middleware::{self, Next},
    response::Response,
    routing::{delete, get, post},
};
use axum_extra::{
    TypedHeader,
    headers::{Authorization, authorization::Bearer},
    typed_header::TypedHeaderRejection,
};

use std::sync::Arc;

use crate::{ServerError, categories, purchases, tags, user};
use engine::{Engine, EngineError, ManagementLevel};

const ADMIN_ONLY: &[ManagementLevel] = &[ManagementLevel::Admin];
const MEMBERS: &[ManagementLevel] = &[ManagementLevel::Admin, ManagementLevel::User];

#[derive(Clone)]
pub struct ServerState {
    pub engine: Arc<Engine>,
}

/// Bearer token the current request was authorized with.
#[derive(Clone, Debug)]
pub struct BearerToken(pub String);

async fn authorize(
    state: &ServerState,
    header: Result<TypedHeader<Authorization<Bearer>>, TypedHeaderRejection>,
    allowed: &[ManagementLevel],
    mut request: Request,
    next: Next,
) -> Result<Response, ServerError> {
    let header = header.map_err(|rejection| {
        let reason = if rejection.is_missing() {
            "Authorization header missing"
        } else {
            "Authorization header format must be Bearer {token}"
        };
        tracing::debug!("auth gate: {reason}");
        EngineError::Unauthorized(reason.to_string())
    })?;
    let token = header.token().to_string();

    let caller = state.engine.authorize(&token, allowed).await?;
    tracing::debug!(user_id = caller.id, "auth gate passed");

    request.extensions_mut().insert(caller);
    request.extensions_mut().insert(BearerToken(token));
    Ok(next.run(request).await)
}

async fn admin_gate(
    State(state): State<ServerState>,
    header: Result<TypedHeader<Authorization<Bearer>>, TypedHeaderRejection>,
    request: Request,
    next: Next,
) -> Result<Response, ServerError> {
    authorize(&state, header, ADMIN_ONLY, request, next).await
}

async fn member_gate(
    State(state): State<ServerState>,
    header: Result<TypedHeader<Authorization<Bearer>>, TypedHeaderRejection>,
    request: Request,
    next: Next,
) -> Result<Response, ServerError> {
    authorize(&state, header, MEMBERS, request, next).await
}

fn auth_routes(state: &ServerState) -> Router<ServerState> {
    let gated = Router::new()
        .route("/logout", post(user::logout))
        .route_layer(middleware::from_fn_with_state(state.clone(), member_gate));

    Router::new()
        .route("/signup", post(user::signup))
        .route("/login", post(user::login))
        .merge(gated)
}

fn admin_routes(state: &ServerState) -> Router<ServerState> {
    Router::new()
        .route(
            "/category",
            post(categories::create)
                .get(categories::list)
                .put(categories::update),
        )
        .route("/category/{id}", delete(categories::remove))
        .route("/users", get(user::list).put(user::update))
        .route("/users/{id}", delete(user::remove))
        .route_layer(middleware::from_fn_with_state(state.clone(), admin_gate))
}

fn system_routes(state: &ServerState) -> Router<ServerState> {
    Router::new()
        .route(
            "/tag",
            post(tags::create).get(tags::list).put(tags::update),
        )
        .route("/tag/{id}", delete(tags::remove))
        .route(
            "/category",
            post(categories::create)
                .get(categories::list_active)
                .put(categories::update),
        )
        .route("/category/{id}", delete(categories::remove))
        .route(
            "/purchase",
            post(purchases::create)
                .get(purchases::list)
                .put(purchases::update),
        )
        .route("/purchase/{id}", delete(purchases::remove))
        .route_layer(middleware::from_fn_with_state(state.clone(), member_gate))
}

/// Build the `/api/v0` router around an engine.
pub fn router(engine: Arc<Engine>) -> Router {
    let state = ServerState { engine };

    Router::new()
        .nest("/api/v0/auth", auth_routes(&state))
        .nest("/api/v0/admin", admin_routes(&state))
        .nest("/api/v0/system", system_routes(&state))
        .with_state(state)
}

pub async fn run(engine: Engine, addr: &str) -> Result<(), std::io::Error> {
    let listener = tokio::net::TcpListener::bind(addr).await?;
    run_with_listener(engine, listener).await
}

pub async fn run_with_listener(
    engine: Engine,
    listener: tokio::net::TcpListener,
) -> Result<(), std::io::Error> {
    let addr = listener.local_addr()?;
    tracing::info!("Server listening on {}", addr);

    axum::serve(listener, router(Arc::new(engine))).await
}
