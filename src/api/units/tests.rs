use axum::http::{Method, StatusCode};
use serde_json::json;
use tower::ServiceExt;

use crate::repositories;
use crate::test_support;

#[tokio::test]
async fn create_then_list_units() {
    let ctx = test_support::setup_test_context().await;

    let response = ctx
        .app
        .clone()
        .oneshot(test_support::json_request(
            Method::POST,
            "/api/v1/units",
            Some(json!({
                "title": "Basic Amharic",
                "order": "1",
                "description": "First steps",
                "isPublished": true
            })),
        ))
        .await
        .expect("create unit");

    let status = response.status();
    let created = test_support::read_json(response).await;
    assert_eq!(status, StatusCode::CREATED, "response: {created}");
    assert_eq!(created["success"], true);
    assert_eq!(created["data"]["order"], 1);
    assert_eq!(created["data"]["subUnitIds"], json!([]));
    let unit_id = created["data"]["id"].as_str().expect("unit id").to_string();
    assert!(unit_id.starts_with("unit-"));

    let response = ctx
        .app
        .clone()
        .oneshot(test_support::json_request(Method::GET, "/api/v1/units", None))
        .await
        .expect("list units");
    assert_eq!(response.status(), StatusCode::OK);
    let listed = test_support::read_json(response).await;
    let units = listed["data"].as_array().expect("units");
    assert_eq!(units.len(), 1);
    assert_eq!(units[0]["id"], unit_id);
    assert_eq!(units[0]["isPublished"], true);
}

#[tokio::test]
async fn create_unit_collects_every_field_error() {
    let ctx = test_support::setup_test_context().await;

    let response = ctx
        .app
        .clone()
        .oneshot(test_support::json_request(
            Method::POST,
            "/api/v1/units",
            Some(json!({ "title": "   ", "order": "0" })),
        ))
        .await
        .expect("create unit");

    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    let body = test_support::read_json(response).await;
    assert_eq!(body["success"], false);
    assert_eq!(body["errors"]["title"], "Title is required");
    assert_eq!(body["errors"]["order"], "Order must be a positive number");
    assert!(repositories::units::list(ctx.state.db()).await.is_empty());
}

#[tokio::test]
async fn fractional_or_null_order_is_a_field_error() {
    let ctx = test_support::setup_test_context().await;

    for order in [json!(1.5), json!(null)] {
        let response = ctx
            .app
            .clone()
            .oneshot(test_support::json_request(
                Method::POST,
                "/api/v1/units",
                Some(json!({ "title": " ", "order": order })),
            ))
            .await
            .expect("create unit");

        assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
        let body = test_support::read_json(response).await;
        assert_eq!(body["errors"]["title"], "Title is required");
        assert_eq!(body["errors"]["order"], "Order must be a positive number");
        let order_detail = body["details"]
            .as_array()
            .expect("details")
            .iter()
            .find(|detail| detail["field"] == "order")
            .expect("order detail");
        assert_eq!(order_detail["reason"], "not-positive");
    }

    let response = ctx
        .app
        .clone()
        .oneshot(test_support::json_request(
            Method::POST,
            "/api/v1/units",
            Some(json!({ "title": "Basic Amharic", "order": 2.0 })),
        ))
        .await
        .expect("create unit");
    assert_eq!(response.status(), StatusCode::CREATED);
    let body = test_support::read_json(response).await;
    assert_eq!(body["data"]["order"], 2);
}

#[tokio::test]
async fn null_clears_description_and_thumbnail() {
    let ctx = test_support::setup_test_context().await;
    let unit = test_support::insert_unit(ctx.state.db(), "Basic Amharic", 1).await;
    let uri = format!("/api/v1/units/{}", unit.id);

    let response = ctx
        .app
        .clone()
        .oneshot(test_support::json_request(
            Method::PATCH,
            &uri,
            Some(json!({ "description": "First steps", "thumbnailUrl": "https://cdn.test/a.png" })),
        ))
        .await
        .expect("set description");
    assert_eq!(response.status(), StatusCode::OK);

    let response = ctx
        .app
        .clone()
        .oneshot(test_support::json_request(Method::PATCH, &uri, Some(json!({ "title": "Amharic I" }))))
        .await
        .expect("rename unit");
    assert_eq!(response.status(), StatusCode::OK);
    let body = test_support::read_json(response).await;
    assert_eq!(body["data"]["description"], "First steps");

    let response = ctx
        .app
        .clone()
        .oneshot(test_support::json_request(
            Method::PATCH,
            &uri,
            Some(json!({ "description": null, "thumbnailUrl": "  " })),
        ))
        .await
        .expect("clear description");
    assert_eq!(response.status(), StatusCode::OK);

    let stored = repositories::units::fetch_one_by_id(ctx.state.db(), &unit.id).await.expect("unit");
    assert_eq!(stored.title, "Amharic I");
    assert_eq!(stored.description, None);
    assert_eq!(stored.thumbnail_url, None);
}

#[tokio::test]
async fn duplicate_unit_order_is_rejected() {
    let ctx = test_support::setup_test_context().await;
    let existing = test_support::insert_unit(ctx.state.db(), "Basic Amharic", 1).await;

    let response = ctx
        .app
        .clone()
        .oneshot(test_support::json_request(
            Method::POST,
            "/api/v1/units",
            Some(json!({ "title": "Numbers", "order": 1 })),
        ))
        .await
        .expect("create unit");

    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    let body = test_support::read_json(response).await;
    assert_eq!(body["errors"]["order"], "Order 1 is already used");
    assert_eq!(body["details"][0]["reason"], "duplicate");
    assert_eq!(body["details"][0]["conflictingId"], existing.id);
}

#[tokio::test]
async fn update_keeps_own_order_and_missing_unit_is_404() {
    let ctx = test_support::setup_test_context().await;
    let unit = test_support::insert_unit(ctx.state.db(), "Basic Amharic", 1).await;

    let response = ctx
        .app
        .clone()
        .oneshot(test_support::json_request(
            Method::PATCH,
            &format!("/api/v1/units/{}", unit.id),
            Some(json!({ "title": "Amharic Basics", "order": 1 })),
        ))
        .await
        .expect("update unit");
    assert_eq!(response.status(), StatusCode::OK);
    let updated = test_support::read_json(response).await;
    assert_eq!(updated["data"]["title"], "Amharic Basics");

    let response = ctx
        .app
        .clone()
        .oneshot(test_support::json_request(
            Method::PATCH,
            "/api/v1/units/unit-missing",
            Some(json!({ "title": "Ghost" })),
        ))
        .await
        .expect("update missing unit");
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    let units = repositories::units::list(ctx.state.db()).await;
    assert_eq!(units.len(), 1);
    assert_eq!(units[0].title, "Amharic Basics");
}

#[tokio::test]
async fn delete_restricts_unless_cascading() {
    let ctx = test_support::setup_test_context().await;
    let db = ctx.state.db();
    let (unit, _sub_unit, lesson) = test_support::insert_lesson_chain(db).await;
    test_support::insert_vocabulary(db, &lesson.id, "Hello", "ሰላም", 1).await;

    let response = ctx
        .app
        .clone()
        .oneshot(test_support::json_request(
            Method::DELETE,
            &format!("/api/v1/units/{}", unit.id),
            None,
        ))
        .await
        .expect("delete unit");
    assert_eq!(response.status(), StatusCode::CONFLICT);
    assert!(repositories::units::fetch_one_by_id(db, &unit.id).await.is_ok());

    let response = ctx
        .app
        .clone()
        .oneshot(test_support::json_request(
            Method::DELETE,
            &format!("/api/v1/units/{}?cascade=true", unit.id),
            None,
        ))
        .await
        .expect("cascade delete unit");
    assert_eq!(response.status(), StatusCode::OK);
    let body = test_support::read_json(response).await;
    assert_eq!(body["data"]["removed"], 4);

    let tables = db.read().await;
    assert_eq!(tables.units.len(), 0);
    assert_eq!(tables.sub_units.len(), 0);
    assert_eq!(tables.lessons.len(), 0);
    assert_eq!(tables.exercises.len(), 0);
}
