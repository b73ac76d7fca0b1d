use std::sync::Arc;

use axum::{
    Router,
    body::Body,
    http::{Method, Request, StatusCode, header},
};
use http_body_util::BodyExt;
use migration::MigratorTrait;
use sea_orm::Database;
use serde_json::{Value, json};
use tower::ServiceExt;

use engine::{Engine, NewUser};

const SECRET: &str = "router-secret-router-secret-router";

async fn app() -> (Router, Arc<Engine>) {
    let db = Database::connect("sqlite::memory:").await.unwrap();
    migration::Migrator::up(&db, None).await.unwrap();
    let engine = Arc::new(
        Engine::builder()
            .database(db)
            .token_secret(SECRET)
            .build()
            .await
            .unwrap(),
    );
    (server::router(engine.clone()), engine)
}

async fn send(
    app: &Router,
    method: Method,
    uri: &str,
    auth: Option<&str>,
    body: Option<Value>,
) -> (StatusCode, Value) {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(auth) = auth {
        builder = builder.header(header::AUTHORIZATION, auth);
    }
    let request = match body {
        Some(body) => builder
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };

    let res = app.clone().oneshot(request).await.unwrap();
    let status = res.status();
    let bytes = res.into_body().collect().await.unwrap().to_bytes();
    let json = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap_or(Value::Null)
    };
    (status, json)
}

async fn seed_admin(engine: &Engine) {
    engine
        .add_user(NewUser {
            username: "admin".to_string(),
            password: "admin-pass".to_string(),
            level: Some(1),
            status: None,
        })
        .await
        .unwrap();
}

async fn login(app: &Router, username: &str, password: &str) -> String {
    let (status, body) = send(
        app,
        Method::POST,
        "/api/v0/auth/login",
        None,
        Some(json!({"username": username, "password": password})),
    )
    .await;
    assert_eq!(status, StatusCode::OK, "{body}");
    format!("Bearer {}", body["response"]["token"].as_str().unwrap())
}

#[tokio::test]
async fn end_to_end_purchase_flow() {
    let (app, engine) = app().await;
    seed_admin(&engine).await;

    let (status, body) = send(
        &app,
        Method::POST,
        "/api/v0/auth/login",
        None,
        Some(json!({"username": "admin", "password": "admin-pass"})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "logged in");
    assert_eq!(body["response"]["level_manage"], 1);
    let token = body["response"]["token"].as_str().unwrap();
    assert!(!token.is_empty());
    let admin = format!("Bearer {token}");

    let (status, body) = send(
        &app,
        Method::POST,
        "/api/v0/admin/category",
        Some(&admin),
        Some(json!({"title": "Groceries"})),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["response"]["slug"], "groceries");
    assert_eq!(body["response"]["status_id"], 1);
    let category_id = body["response"]["id"].as_i64().unwrap();

    let (status, body) = send(
        &app,
        Method::POST,
        "/api/v0/system/purchase",
        Some(&admin),
        Some(json!({"category_id": category_id, "amount": 5000, "date": "2025-08-26"})),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED, "{body}");
    assert_eq!(body["response"]["category"]["title"], "Groceries");
    assert_eq!(body["response"]["tags"], json!([]));
    assert_eq!(body["response"]["date"], "2025-08-26T00:00:00Z");

    let (status, body) = send(
        &app,
        Method::GET,
        "/api/v0/system/purchase?tag_ids%5B%5D=999",
        Some(&admin),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["count"], 0);

    let (status, body) = send(
        &app,
        Method::GET,
        "/api/v0/system/purchase?other_fields=true",
        Some(&admin),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["count"], 1);
    assert!(body["response"][0]["created_at"].is_string());
}

#[tokio::test]
async fn gates_reject_missing_malformed_and_underprivileged() {
    let (app, _engine) = app().await;

    let (status, body) = send(
        &app,
        Method::POST,
        "/api/v0/auth/signup",
        None,
        Some(json!({"username": "alice", "password": "pw"})),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["response"]["level_manage"], 2);
    assert!(body["response"].get("password").is_none());

    let (status, body) = send(&app, Method::GET, "/api/v0/system/category", None, None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["message"], "Authorization header missing");
    assert_eq!(body["err"], "unauthorized");
    assert!(body["response"].is_null());

    let (status, body) = send(
        &app,
        Method::GET,
        "/api/v0/system/category",
        Some("Basic YWxpY2U6cHc="),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(
        body["message"],
        "Authorization header format must be Bearer {token}"
    );

    let alice = login(&app, "alice", "pw").await;
    let (status, _) = send(&app, Method::GET, "/api/v0/system/category", Some(&alice), None).await;
    assert_eq!(status, StatusCode::OK);

    let (status, body) = send(&app, Method::GET, "/api/v0/admin/users", Some(&alice), None).await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(body["err"], "forbidden");
}

#[tokio::test]
async fn logout_revokes_the_presented_token() {
    let (app, _engine) = app().await;
    send(
        &app,
        Method::POST,
        "/api/v0/auth/signup",
        None,
        Some(json!({"username": "bob", "password": "pw"})),
    )
    .await;
    let bob = login(&app, "bob", "pw").await;

    let (status, _) = send(&app, Method::POST, "/api/v0/auth/logout", Some(&bob), None).await;
    assert_eq!(status, StatusCode::OK);

    let (status, body) = send(&app, Method::GET, "/api/v0/system/tag", Some(&bob), None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["message"], "token has been revoked");
}

#[tokio::test]
async fn wrong_password_is_unauthorized() {
    let (app, engine) = app().await;
    seed_admin(&engine).await;

    let (status, body) = send(
        &app,
        Method::POST,
        "/api/v0/auth/login",
        None,
        Some(json!({"username": "admin", "password": "nope"})),
    )
    .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["message"], "invalid username or password");
}

#[tokio::test]
async fn decoding_failures_are_bad_requests() {
    let (app, engine) = app().await;
    seed_admin(&engine).await;
    let admin = login(&app, "admin", "admin-pass").await;

    let (status, body) = send(
        &app,
        Method::POST,
        "/api/v0/system/tag",
        Some(&admin),
        Some(json!({"nope": true})),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["err"], "invalid_input");

    let (status, _) = send(
        &app,
        Method::DELETE,
        "/api/v0/system/tag/abc",
        Some(&admin),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, _) = send(
        &app,
        Method::GET,
        "/api/v0/system/tag?status_id=7",
        Some(&admin),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn tag_lifecycle_over_http() {
    let (app, engine) = app().await;
    seed_admin(&engine).await;
    let admin = login(&app, "admin", "admin-pass").await;

    let (status, body) = send(
        &app,
        Method::POST,
        "/api/v0/system/tag",
        Some(&admin),
        Some(json!({"title": "weekly"})),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    let id = body["response"]["id"].as_i64().unwrap();

    let (status, body) = send(
        &app,
        Method::POST,
        "/api/v0/system/tag",
        Some(&admin),
        Some(json!({"title": "weekly"})),
    )
    .await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["message"], "tag duplicate");

    let (status, body) = send(
        &app,
        Method::PUT,
        "/api/v0/system/tag",
        Some(&admin),
        Some(json!({"id": id, "title": "monthly"})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["response"]["title"], "monthly");

    let uri = format!("/api/v0/system/tag/{id}");
    let (status, _) = send(&app, Method::DELETE, &uri, Some(&admin), None).await;
    assert_eq!(status, StatusCode::OK);
    let (status, _) = send(&app, Method::DELETE, &uri, Some(&admin), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (_, body) = send(
        &app,
        Method::GET,
        "/api/v0/system/tag?status_id=0",
        Some(&admin),
        None,
    )
    .await;
    assert_eq!(body["count"], 1);
}

#[tokio::test]
async fn member_category_listing_hides_inactive() {
    let (app, engine) = app().await;
    seed_admin(&engine).await;
    let admin = login(&app, "admin", "admin-pass").await;

    for title in ["Rent", "Fuel"] {
        send(
            &app,
            Method::POST,
            "/api/v0/admin/category",
            Some(&admin),
            Some(json!({"title": title})),
        )
        .await;
    }
    let (status, _) = send(
        &app,
        Method::DELETE,
        "/api/v0/admin/category/1",
        Some(&admin),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    let (_, body) = send(
        &app,
        Method::GET,
        "/api/v0/system/category?status_id=0",
        Some(&admin),
        None,
    )
    .await;
    assert_eq!(body["count"], 1);
    assert_eq!(body["response"][0]["title"], "Fuel");

    let (_, body) = send(
        &app,
        Method::GET,
        "/api/v0/admin/category?status_id=0",
        Some(&admin),
        None,
    )
    .await;
    assert_eq!(body["count"], 1);
    assert_eq!(body["response"][0]["title"], "Rent");
}

#[tokio::test]
async fn mixed_tag_key_forms_are_combined() {
    let (app, engine) = app().await;
    seed_admin(&engine).await;
    let admin = login(&app, "admin", "admin-pass").await;

    let mut tag_ids = Vec::new();
    for title in ["home", "monthly"] {
        let (status, body) = send(
            &app,
            Method::POST,
            "/api/v0/system/tag",
            Some(&admin),
            Some(json!({"title": title})),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED, "{body}");
        tag_ids.push(body["response"]["id"].as_i64().unwrap());
    }
    let (home, monthly) = (tag_ids[0], tag_ids[1]);

    for (title, tags) in [("Rent", format!("{home},{monthly}")), ("Plants", home.to_string())] {
        let (status, body) = send(
            &app,
            Method::POST,
            "/api/v0/admin/category",
            Some(&admin),
            Some(json!({"title": title, "tag_ids": tags})),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED, "{body}");
    }

    let uri = format!("/api/v0/admin/category?tag_ids%5B%5D={home}&tag_ids={monthly}");
    let (status, body) = send(&app, Method::GET, &uri, Some(&admin), None).await;
    assert_eq!(status, StatusCode::OK, "{body}");
    assert_eq!(body["count"], 1);
    assert_eq!(body["response"][0]["title"], "Rent");
}
