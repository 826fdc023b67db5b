use axum::http::{Method, StatusCode};
use serde_json::json;
use tower::ServiceExt;

use crate::repositories;
use crate::test_support;

#[tokio::test]
async fn created_sub_units_are_listed_in_unit_order() {
    let ctx = test_support::setup_test_context().await;
    let unit = test_support::insert_unit(ctx.state.db(), "Basic Amharic", 1).await;

    let mut created_ids = Vec::new();
    for (title, order) in [("Numbers", 2), ("Greetings and Introductions", 1)] {
        let response = ctx
            .app
            .clone()
            .oneshot(test_support::json_request(
                Method::POST,
                &format!("/api/v1/units/{}/sub-units", unit.id),
                Some(json!({
                    "unitId": unit.id,
                    "title": title,
                    "theme": "Everyday",
                    "order": order,
                    "estimatedTotalTime": 120
                })),
            ))
            .await
            .expect("create sub-unit");
        let status = response.status();
        let body = test_support::read_json(response).await;
        assert_eq!(status, StatusCode::CREATED, "response: {body}");
        assert_eq!(body["data"]["unitId"], unit.id);
        created_ids.push(body["data"]["id"].as_str().expect("sub-unit id").to_string());
    }

    let stored = repositories::units::fetch_one_by_id(ctx.state.db(), &unit.id).await.expect("unit");
    assert_eq!(stored.sub_unit_ids, vec![created_ids[1].clone(), created_ids[0].clone()]);

    let response = ctx
        .app
        .clone()
        .oneshot(test_support::json_request(
            Method::GET,
            &format!("/api/v1/units/{}/sub-units", unit.id),
            None,
        ))
        .await
        .expect("list sub-units");
    assert_eq!(response.status(), StatusCode::OK);
    let body = test_support::read_json(response).await;
    let mut titles: Vec<&str> = body["data"]
        .as_array()
        .expect("sub-units")
        .iter()
        .filter_map(|item| item["title"].as_str())
        .collect();
    titles.sort();
    assert_eq!(titles, vec!["Greetings and Introductions", "Numbers"]);
}

#[tokio::test]
async fn mismatched_parent_and_negative_time_are_reported_together() {
    let ctx = test_support::setup_test_context().await;
    let unit = test_support::insert_unit(ctx.state.db(), "Basic Amharic", 1).await;

    let response = ctx
        .app
        .clone()
        .oneshot(test_support::json_request(
            Method::POST,
            &format!("/api/v1/units/{}/sub-units", unit.id),
            Some(json!({
                "unitId": "unit-other",
                "title": "Greetings",
                "theme": "",
                "order": 1,
                "estimatedTotalTime": -5
            })),
        ))
        .await
        .expect("create sub-unit");

    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    let body = test_support::read_json(response).await;
    assert_eq!(body["errors"]["theme"], "Theme is required");
    assert_eq!(body["errors"]["estimatedTotalTime"], "Estimated total time must not be negative");
    let mismatch = body["details"]
        .as_array()
        .expect("details")
        .iter()
        .find(|detail| detail["field"] == "unitId")
        .expect("unitId detail");
    assert_eq!(mismatch["reason"], "mismatch");
    assert_eq!(mismatch["expected"], unit.id);
    assert!(repositories::sub_units::list_for_unit(ctx.state.db(), &unit.id).await.is_empty());
}

#[tokio::test]
async fn creating_under_missing_unit_is_404() {
    let ctx = test_support::setup_test_context().await;

    let response = ctx
        .app
        .clone()
        .oneshot(test_support::json_request(
            Method::POST,
            "/api/v1/units/unit-missing/sub-units",
            Some(json!({ "title": "Greetings", "theme": "Greetings", "order": 1 })),
        ))
        .await
        .expect("create sub-unit");

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    let body = test_support::read_json(response).await;
    assert_eq!(body["success"], false);
}

#[tokio::test]
async fn moving_a_sub_unit_to_another_unit_is_refused() {
    let ctx = test_support::setup_test_context().await;
    let db = ctx.state.db();
    let unit = test_support::insert_unit(db, "Basic Amharic", 1).await;
    let sub_unit = test_support::insert_sub_unit(db, &unit.id, "Greetings", 1).await;

    let response = ctx
        .app
        .clone()
        .oneshot(test_support::json_request(
            Method::PATCH,
            &format!("/api/v1/sub-units/{}", sub_unit.id),
            Some(json!({ "unitId": "unit-other", "title": "Moved" })),
        ))
        .await
        .expect("update sub-unit");

    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    let body = test_support::read_json(response).await;
    assert_eq!(body["details"][0]["reason"], "immutable");
    let stored = repositories::sub_units::fetch_one_by_id(db, &sub_unit.id).await.expect("sub-unit");
    assert_eq!(stored.title, "Greetings");
}
