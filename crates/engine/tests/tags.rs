mod common;

use engine::{EngineError, NewTag, Status, TagFilter, TagPatch};

use common::{engine_with_db, first_page, tag};

#[tokio::test]
async fn duplicate_active_title_is_rejected() {
    let (engine, _db) = engine_with_db().await;
    tag(&engine, "weekly").await;

    let err = engine
        .add_tag(NewTag {
            title: " weekly ".to_string(),
            status: None,
        })
        .await
        .unwrap_err();
    assert_eq!(err, EngineError::ExistingKey("tag duplicate".to_string()));
}

#[tokio::test]
async fn removed_title_can_be_reused() {
    let (engine, _db) = engine_with_db().await;
    let id = tag(&engine, "vacation").await;
    engine.remove_tag(id).await.unwrap();

    assert_eq!(
        engine.tag(id).await.unwrap_err(),
        EngineError::KeyNotFound("tag not found".to_string())
    );
    assert_eq!(
        engine.remove_tag(id).await.unwrap_err(),
        EngineError::KeyNotFound("tag not found".to_string())
    );
    tag(&engine, "vacation").await;
}

#[tokio::test]
async fn update_renames_and_checks_duplicates() {
    let (engine, _db) = engine_with_db().await;
    let a = tag(&engine, "a").await;
    tag(&engine, "b").await;

    let renamed = engine
        .update_tag(
            a,
            TagPatch {
                title: Some("c".to_string()),
                status: None,
            },
        )
        .await
        .unwrap();
    assert_eq!(renamed.title, "c");
    assert!(renamed.updated_at >= renamed.created_at);

    let err = engine
        .update_tag(
            a,
            TagPatch {
                title: Some("b".to_string()),
                status: None,
            },
        )
        .await
        .unwrap_err();
    assert_eq!(err, EngineError::ExistingKey("tag duplicate".to_string()));
}

#[tokio::test]
async fn update_can_reactivate() {
    let (engine, _db) = engine_with_db().await;
    let id = tag(&engine, "old").await;
    engine.remove_tag(id).await.unwrap();

    let revived = engine
        .update_tag(
            id,
            TagPatch {
                title: None,
                status: Some(1),
            },
        )
        .await
        .unwrap();
    assert_eq!(revived.status, Status::Active);
    assert_eq!(revived.deleted_at, None);
    let stored = engine.tag(id).await.unwrap();
    assert_eq!(stored.title, "old");
    assert_eq!(stored.deleted_at, None);
}

#[tokio::test]
async fn listing_filters_by_title_and_status() {
    let (engine, _db) = engine_with_db().await;
    tag(&engine, "food-fast").await;
    tag(&engine, "food-slow").await;
    let gone = tag(&engine, "food-gone").await;
    engine.remove_tag(gone).await.unwrap();

    let active = engine
        .list_tags(
            &TagFilter {
                title: Some("food".to_string()),
                ..Default::default()
            },
            &first_page(),
        )
        .await
        .unwrap();
    assert_eq!(active.count, 2);

    let inactive = engine
        .list_tags(
            &TagFilter {
                status: Some(Status::Inactive),
                ..Default::default()
            },
            &first_page(),
        )
        .await
        .unwrap();
    assert_eq!(inactive.count, 1);
    assert_eq!(inactive.items[0].id, gone);
}

#[tokio::test]
async fn title_filter_is_literal_and_ignores_case() {
    let (engine, _db) = engine_with_db().await;
    tag(&engine, "50% Off").await;
    tag(&engine, "500 off").await;
    tag(&engine, "gift_card").await;
    tag(&engine, "giftxcard").await;

    let by_title = |title: &str| TagFilter {
        title: Some(title.to_string()),
        ..Default::default()
    };

    let percent = engine.list_tags(&by_title("50%"), &first_page()).await.unwrap();
    assert_eq!(percent.count, 1);
    assert_eq!(percent.items[0].title, "50% Off");

    let underscore = engine.list_tags(&by_title("t_c"), &first_page()).await.unwrap();
    assert_eq!(underscore.count, 1);
    assert_eq!(underscore.items[0].title, "gift_card");

    let any_case = engine.list_tags(&by_title("OFF"), &first_page()).await.unwrap();
    assert_eq!(any_case.count, 2);
}
