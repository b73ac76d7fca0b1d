#![allow(dead_code)]

use sea_orm::{Database, DatabaseConnection};

use engine::{Engine, NewCategory, NewTag, PageParams};
use migration::MigratorTrait;

pub const SECRET: &str = "test-secret-test-secret-test-secret";

pub async fn engine_with_db() -> (Engine, DatabaseConnection) {
    let db = Database::connect("sqlite::memory:").await.unwrap();
    migration::Migrator::up(&db, None).await.unwrap();
    let engine = Engine::builder()
        .database(db.clone())
        .token_secret(SECRET)
        .build()
        .await
        .unwrap();
    (engine, db)
}

pub async fn category(engine: &Engine, title: &str) -> i32 {
    engine
        .add_category(NewCategory {
            title: title.to_string(),
            ..Default::default()
        })
        .await
        .unwrap()
        .category
        .id
}

pub async fn tag(engine: &Engine, title: &str) -> i32 {
    engine
        .add_tag(NewTag {
            title: title.to_string(),
            status: None,
        })
        .await
        .unwrap()
        .id
}

pub fn first_page() -> PageParams {
    PageParams {
        start: 0,
        limit: 100,
        order_by: "id".to_string(),
        sort: "ASC".to_string(),
    }
}
