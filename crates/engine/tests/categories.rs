mod common;

use engine::{CategoryFilter, CategoryPatch, EngineError, NewCategory, PageParams, Status};

use common::{category, engine_with_db, first_page, tag};

#[tokio::test]
async fn add_category_derives_slug_and_defaults_active() {
    let (engine, _db) = engine_with_db().await;

    let detail = engine
        .add_category(NewCategory {
            title: "Groceries".to_string(),
            color: Some("#00ff00".to_string()),
            ..Default::default()
        })
        .await
        .unwrap();

    assert_eq!(detail.category.slug, "groceries");
    assert_eq!(detail.category.status, Status::Active);
    assert_eq!(detail.category.color, "#00ff00");
    assert!(detail.tags.is_empty());
}

#[tokio::test]
async fn duplicate_active_slug_is_rejected() {
    let (engine, _db) = engine_with_db().await;
    category(&engine, "Eating Out").await;

    let err = engine
        .add_category(NewCategory {
            title: "  eating_out ".to_string(),
            ..Default::default()
        })
        .await
        .unwrap_err();
    assert_eq!(
        err,
        EngineError::ExistingKey("slug(eating-out) duplicate".to_string())
    );
}

#[tokio::test]
async fn slug_is_reusable_after_soft_delete() {
    let (engine, _db) = engine_with_db().await;
    let first = category(&engine, "Rent").await;
    engine.remove_category(first).await.unwrap();

    let second = category(&engine, "Rent").await;
    assert_ne!(first, second);
}

#[tokio::test]
async fn removing_inactive_category_fails_and_keeps_status() {
    let (engine, _db) = engine_with_db().await;
    let id = category(&engine, "Travel").await;
    engine.remove_category(id).await.unwrap();

    let err = engine.remove_category(id).await.unwrap_err();
    assert_eq!(err, EngineError::KeyNotFound("category not found".to_string()));

    let inactive = engine
        .list_categories(
            &CategoryFilter {
                status: Some(Status::Inactive),
                ..Default::default()
            },
            &first_page(),
        )
        .await
        .unwrap();
    assert_eq!(inactive.count, 1);
    let removed = &inactive.items[0].category;
    assert_eq!(removed.status, Status::Inactive);
    assert!(removed.deleted_at.is_some());
}

#[tokio::test]
async fn update_retitles_and_rederives_slug() {
    let (engine, _db) = engine_with_db().await;
    let id = category(&engine, "Fun").await;

    let updated = engine
        .update_category(
            id,
            CategoryPatch {
                title: Some("Fun & Games".to_string()),
                color: Some("red".to_string()),
                ..Default::default()
            },
        )
        .await
        .unwrap();
    assert_eq!(updated.category.title, "Fun & Games");
    assert_eq!(updated.category.slug, "fun-games");
    assert_eq!(updated.category.color, "red");

    // Blank fields are left alone.
    let untouched = engine
        .update_category(
            id,
            CategoryPatch {
                title: Some(" ".to_string()),
                ..Default::default()
            },
        )
        .await
        .unwrap();
    assert_eq!(untouched.category.slug, "fun-games");
    assert_eq!(untouched.category.color, "red");
}

#[tokio::test]
async fn update_rejects_slug_owned_by_another_category() {
    let (engine, _db) = engine_with_db().await;
    category(&engine, "Health").await;
    let other = category(&engine, "Sport").await;

    let err = engine
        .update_category(
            other,
            CategoryPatch {
                title: Some("HEALTH".to_string()),
                ..Default::default()
            },
        )
        .await
        .unwrap_err();
    assert_eq!(err, EngineError::ExistingKey("slug(health) duplicate".to_string()));

    // Keeping its own slug is fine.
    engine
        .update_category(
            other,
            CategoryPatch {
                title: Some("sport".to_string()),
                ..Default::default()
            },
        )
        .await
        .unwrap();
}

#[tokio::test]
async fn reactivation_checks_slug_uniqueness() {
    let (engine, _db) = engine_with_db().await;
    let old = category(&engine, "Gifts").await;
    engine.remove_category(old).await.unwrap();
    category(&engine, "Gifts").await;

    let err = engine
        .update_category(
            old,
            CategoryPatch {
                status: Some(1),
                ..Default::default()
            },
        )
        .await
        .unwrap_err();
    assert!(matches!(err, EngineError::ExistingKey(_)));
}

#[tokio::test]
async fn reactivation_clears_deletion_time() {
    let (engine, _db) = engine_with_db().await;
    let id = category(&engine, "Hobbies").await;
    engine.remove_category(id).await.unwrap();

    let revived = engine
        .update_category(
            id,
            CategoryPatch {
                status: Some(1),
                ..Default::default()
            },
        )
        .await
        .unwrap();
    assert_eq!(revived.category.status, Status::Active);
    assert_eq!(revived.category.deleted_at, None);

    let listed = engine
        .list_categories(&CategoryFilter::default(), &first_page())
        .await
        .unwrap();
    assert_eq!(listed.count, 1);
    assert_eq!(listed.items[0].category.deleted_at, None);
}

#[tokio::test]
async fn update_cannot_deactivate() {
    let (engine, _db) = engine_with_db().await;
    let id = category(&engine, "Books").await;

    let updated = engine
        .update_category(
            id,
            CategoryPatch {
                status: Some(0),
                ..Default::default()
            },
        )
        .await
        .unwrap();
    assert_eq!(updated.category.status, Status::Active);

    let err = engine
        .update_category(
            id,
            CategoryPatch {
                status: Some(7),
                ..Default::default()
            },
        )
        .await
        .unwrap_err();
    assert!(matches!(err, EngineError::InvalidInput(_)));
}

#[tokio::test]
async fn unknown_tag_aborts_category_creation() {
    let (engine, _db) = engine_with_db().await;
    let known = tag(&engine, "monthly").await;

    let err = engine
        .add_category(NewCategory {
            title: "Bills".to_string(),
            tag_ids: Some(format!("{known},999")),
            ..Default::default()
        })
        .await
        .unwrap_err();
    assert_eq!(err, EngineError::KeyNotFound("tag not found: 999".to_string()));

    let all = engine
        .list_categories(&CategoryFilter::default(), &first_page())
        .await
        .unwrap();
    assert_eq!(all.count, 0);
}

#[tokio::test]
async fn categories_carry_resolved_tags() {
    let (engine, _db) = engine_with_db().await;
    let monthly = tag(&engine, "monthly").await;
    let fixed = tag(&engine, "fixed").await;

    engine
        .add_category(NewCategory {
            title: "Bills".to_string(),
            tag_ids: Some(format!("{fixed}, {monthly}")),
            ..Default::default()
        })
        .await
        .unwrap();
    category(&engine, "Other").await;

    let tagged = engine
        .list_categories(
            &CategoryFilter {
                tag_ids: vec![monthly],
                ..Default::default()
            },
            &first_page(),
        )
        .await
        .unwrap();
    assert_eq!(tagged.count, 1);
    let titles: Vec<_> = tagged.items[0].tags.iter().map(|t| t.title.as_str()).collect();
    assert_eq!(titles, vec!["fixed", "monthly"]);
}

#[tokio::test]
async fn listing_counts_before_paginating() {
    let (engine, _db) = engine_with_db().await;
    for title in ["Alpha", "Bravo", "Charlie", "Delta"] {
        category(&engine, title).await;
    }

    let page = engine
        .list_categories(
            &CategoryFilter::default(),
            &PageParams {
                start: 1,
                limit: 2,
                order_by: "title".to_string(),
                sort: "ASC".to_string(),
            },
        )
        .await
        .unwrap();
    assert_eq!(page.count, 4);
    let titles: Vec<_> = page.items.iter().map(|c| c.category.title.as_str()).collect();
    assert_eq!(titles, vec!["Bravo", "Charlie"]);

    // Bogus paging falls back to id DESC with 30 rows.
    let page = engine
        .list_categories(
            &CategoryFilter::default(),
            &PageParams {
                start: -4,
                limit: 0,
                order_by: "nope".to_string(),
                sort: "sideways".to_string(),
            },
        )
        .await
        .unwrap();
    assert_eq!(page.items.len(), 4);
    assert_eq!(page.items[0].category.title, "Delta");
}

#[tokio::test]
async fn listing_filters_by_title_and_slug() {
    let (engine, _db) = engine_with_db().await;
    category(&engine, "Home Repairs").await;
    category(&engine, "Home Office").await;
    category(&engine, "Car").await;

    let home = engine
        .list_categories(
            &CategoryFilter {
                title: Some("Home".to_string()),
                ..Default::default()
            },
            &first_page(),
        )
        .await
        .unwrap();
    assert_eq!(home.count, 2);

    let office = engine
        .list_categories(
            &CategoryFilter {
                slug: Some("home-office".to_string()),
                ..Default::default()
            },
            &first_page(),
        )
        .await
        .unwrap();
    assert_eq!(office.count, 1);
    assert_eq!(office.items[0].category.title, "Home Office");
}
