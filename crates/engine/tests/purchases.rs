mod common;

use chrono::{TimeZone, Utc};
use serde_json::json;

use engine::{
    Engine, EngineError, NewPurchase, PurchaseDetail, PurchaseFilter, PurchaseUpdate, Status,
};

use common::{category, engine_with_db, first_page, tag};

fn new_purchase(category_id: i32, amount: i64) -> NewPurchase {
    NewPurchase {
        category_id,
        sub_category_id: None,
        tag_ids: None,
        date: Utc.with_ymd_and_hms(2025, 3, 14, 12, 0, 0).unwrap(),
        amount,
        reason: None,
        note: None,
        color: None,
        method: 1,
        status: None,
        details: None,
    }
}

fn update_of(detail: &PurchaseDetail) -> PurchaseUpdate {
    PurchaseUpdate {
        category_id: None,
        sub_category_id: None,
        tag_ids: None,
        reason: None,
        status: None,
        details: None,
        date: detail.purchase.date,
        amount: detail.purchase.amount,
        note: detail.purchase.note.clone(),
        color: detail.purchase.color.clone(),
        method: detail.purchase.method,
    }
}

async fn count_all(engine: &Engine) -> u64 {
    let mut total = 0;
    for status in [Status::Active, Status::Inactive] {
        total += engine
            .list_purchases(
                &PurchaseFilter {
                    status: Some(status),
                    ..Default::default()
                },
                &first_page(),
            )
            .await
            .unwrap()
            .count;
    }
    total
}

#[tokio::test]
async fn add_purchase_embeds_category() {
    let (engine, _db) = engine_with_db().await;
    let groceries = category(&engine, "Groceries").await;

    let mut input = new_purchase(groceries, 5000);
    input.reason = Some("weekly shop".to_string());
    input.details = Some(json!({"store": "corner"}));
    let detail = engine.add_purchase(input).await.unwrap();

    assert_eq!(detail.purchase.amount, 5000);
    assert_eq!(detail.purchase.status, Status::Active);
    assert_eq!(detail.purchase.details, Some(json!({"store": "corner"})));
    assert_eq!(detail.category.as_ref().map(|c| c.id), Some(groceries));
    assert!(detail.sub_category.is_none());
    assert!(detail.tags.is_empty());
}

#[tokio::test]
async fn missing_category_fails_without_insert() {
    let (engine, _db) = engine_with_db().await;

    let err = engine.add_purchase(new_purchase(42, 100)).await.unwrap_err();
    assert_eq!(err, EngineError::KeyNotFound("category not found".to_string()));
    assert_eq!(count_all(&engine).await, 0);
}

#[tokio::test]
async fn inactive_category_is_not_resolvable() {
    let (engine, _db) = engine_with_db().await;
    let id = category(&engine, "Old").await;
    engine.remove_category(id).await.unwrap();

    let err = engine.add_purchase(new_purchase(id, 100)).await.unwrap_err();
    assert_eq!(err, EngineError::KeyNotFound("category not found".to_string()));
}

#[tokio::test]
async fn missing_sub_category_fails() {
    let (engine, _db) = engine_with_db().await;
    let id = category(&engine, "Food").await;

    let mut input = new_purchase(id, 100);
    input.sub_category_id = Some(999);
    let err = engine.add_purchase(input).await.unwrap_err();
    assert_eq!(err, EngineError::KeyNotFound("sub category not found".to_string()));
    assert_eq!(count_all(&engine).await, 0);
}

#[tokio::test]
async fn any_unknown_tag_aborts_the_write() {
    let (engine, _db) = engine_with_db().await;
    let id = category(&engine, "Food").await;
    let known = tag(&engine, "lunch").await;

    let mut input = new_purchase(id, 100);
    input.tag_ids = Some(format!("{known},77"));
    let err = engine.add_purchase(input).await.unwrap_err();
    assert_eq!(err, EngineError::KeyNotFound("tag not found: 77".to_string()));

    let mut input = new_purchase(id, 100);
    input.tag_ids = Some("1,x".to_string());
    let err = engine.add_purchase(input).await.unwrap_err();
    assert_eq!(err, EngineError::InvalidInput("invalid tag id: x".to_string()));

    assert_eq!(count_all(&engine).await, 0);
}

#[tokio::test]
async fn zero_amount_is_invalid() {
    let (engine, _db) = engine_with_db().await;
    let id = category(&engine, "Food").await;

    let err = engine.add_purchase(new_purchase(id, 0)).await.unwrap_err();
    assert!(matches!(err, EngineError::InvalidInput(_)));
}

#[tokio::test]
async fn tag_filter_matches_whole_ids() {
    let (engine, _db) = engine_with_db().await;
    let id = category(&engine, "Food").await;
    let mut tag_ids = Vec::new();
    for n in 1..=11 {
        tag_ids.push(tag(&engine, &format!("t{n}")).await);
    }
    let (one, eleven) = (tag_ids[0], tag_ids[10]);

    let mut input = new_purchase(id, 100);
    input.tag_ids = Some(eleven.to_string());
    engine.add_purchase(input).await.unwrap();

    let mut input = new_purchase(id, 200);
    input.tag_ids = Some(format!("{one},{eleven}"));
    let both = engine.add_purchase(input).await.unwrap();
    assert_eq!(both.tags.len(), 2);

    let with_one = engine
        .list_purchases(
            &PurchaseFilter {
                tag_ids: vec![one],
                ..Default::default()
            },
            &first_page(),
        )
        .await
        .unwrap();
    assert_eq!(with_one.count, 1);
    assert_eq!(with_one.items[0].purchase.id, both.purchase.id);

    let with_eleven = engine
        .list_purchases(
            &PurchaseFilter {
                tag_ids: vec![eleven],
                ..Default::default()
            },
            &first_page(),
        )
        .await
        .unwrap();
    assert_eq!(with_eleven.count, 2);

    let unknown = engine
        .list_purchases(
            &PurchaseFilter {
                tag_ids: vec![4242],
                ..Default::default()
            },
            &first_page(),
        )
        .await
        .unwrap();
    assert_eq!(unknown.count, 0);
}

#[tokio::test]
async fn listing_filters_and_loads_categories() {
    let (engine, _db) = engine_with_db().await;
    let food = category(&engine, "Food").await;
    let snacks = category(&engine, "Snacks").await;

    let mut input = new_purchase(food, 300);
    input.sub_category_id = Some(snacks);
    input.reason = Some("crisps at the station".to_string());
    engine.add_purchase(input).await.unwrap();
    engine.add_purchase(new_purchase(food, 900)).await.unwrap();

    let found = engine
        .list_purchases(
            &PurchaseFilter {
                reason: Some("station".to_string()),
                ..Default::default()
            },
            &first_page(),
        )
        .await
        .unwrap();
    assert_eq!(found.count, 1);
    let item = &found.items[0];
    assert_eq!(item.category.as_ref().map(|c| c.title.as_str()), Some("Food"));
    assert_eq!(
        item.sub_category.as_ref().map(|c| c.title.as_str()),
        Some("Snacks")
    );

    let by_amount = engine
        .list_purchases(
            &PurchaseFilter {
                amount: Some(900),
                category_id: Some(food),
                ..Default::default()
            },
            &first_page(),
        )
        .await
        .unwrap();
    assert_eq!(by_amount.count, 1);

    // A deactivated category is no longer embedded.
    engine.remove_category(snacks).await.unwrap();
    let found = engine
        .list_purchases(
            &PurchaseFilter {
                sub_category_id: Some(snacks),
                ..Default::default()
            },
            &first_page(),
        )
        .await
        .unwrap();
    assert_eq!(found.count, 1);
    assert!(found.items[0].sub_category.is_none());
}

#[tokio::test]
async fn update_overwrites_some_fields_and_patches_others() {
    let (engine, _db) = engine_with_db().await;
    let food = category(&engine, "Food").await;
    let travel = category(&engine, "Travel").await;

    let mut input = new_purchase(food, 300);
    input.reason = Some("lunch".to_string());
    input.note = Some("with colleagues".to_string());
    input.color = Some("blue".to_string());
    let created = engine.add_purchase(input).await.unwrap();

    let mut update = update_of(&created);
    update.category_id = Some(travel);
    update.amount = 450;
    update.note = String::new();
    update.color = String::new();
    let updated = engine
        .update_purchase(created.purchase.id, update)
        .await
        .unwrap();

    assert_eq!(updated.purchase.category_id, travel);
    assert_eq!(updated.category.as_ref().map(|c| c.id), Some(travel));
    assert_eq!(updated.purchase.amount, 450);
    // Reason is partial, note and color are replaced.
    assert_eq!(updated.purchase.reason, "lunch");
    assert_eq!(updated.purchase.note, "");
    assert_eq!(updated.purchase.color, "");

    let mut update = update_of(&updated);
    update.category_id = Some(999);
    let err = engine
        .update_purchase(created.purchase.id, update)
        .await
        .unwrap_err();
    assert_eq!(err, EngineError::KeyNotFound("category not found".to_string()));

    let err = engine
        .update_purchase(999, update_of(&updated))
        .await
        .unwrap_err();
    assert_eq!(err, EngineError::KeyNotFound("purchase not found".to_string()));
}

#[tokio::test]
async fn remove_soft_deletes_once() {
    let (engine, _db) = engine_with_db().await;
    let food = category(&engine, "Food").await;
    let created = engine.add_purchase(new_purchase(food, 10)).await.unwrap();

    engine.remove_purchase(created.purchase.id).await.unwrap();
    let err = engine
        .remove_purchase(created.purchase.id)
        .await
        .unwrap_err();
    assert_eq!(err, EngineError::KeyNotFound("purchase not found".to_string()));

    let removed = engine
        .list_purchases(
            &PurchaseFilter {
                status: Some(Status::Inactive),
                ..Default::default()
            },
            &first_page(),
        )
        .await
        .unwrap();
    assert_eq!(removed.count, 1);
    assert_eq!(removed.items[0].purchase.status, Status::Inactive);
    assert!(removed.items[0].purchase.deleted_at.is_some());
}
