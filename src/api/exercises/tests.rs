use axum::http::{Method, StatusCode};
use serde_json::{json, Value};
use tower::ServiceExt;

use crate::db::types::ExerciseContent;
use crate::repositories;
use crate::test_support::{self, TestContext};

async fn send(ctx: &TestContext, method: Method, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
    let response = ctx
        .app
        .clone()
        .oneshot(test_support::json_request(method, uri, body))
        .await
        .expect("response");
    let status = response.status();
    (status, test_support::read_json(response).await)
}

fn writing_payload(options: Value, correct_option_id: Value) -> Value {
    json!({
        "type": "writing",
        "order": 1,
        "instruction": "Pick the greeting",
        "content": {
            "displayText": "Hello",
            "options": options,
            "correctOptionId": correct_option_id
        }
    })
}

#[tokio::test]
async fn full_chain_creates_a_single_vocabulary_exercise() {
    let ctx = test_support::setup_test_context().await;

    let (status, unit) = send(
        &ctx,
        Method::POST,
        "/api/v1/units",
        Some(json!({ "title": "Basic Amharic", "order": 1 })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED, "response: {unit}");
    let unit_id = unit["data"]["id"].as_str().expect("unit id").to_string();

    let (status, sub_unit) = send(
        &ctx,
        Method::POST,
        &format!("/api/v1/units/{unit_id}/sub-units"),
        Some(json!({ "unitId": unit_id, "title": "Greetings", "theme": "Greetings", "order": 1 })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED, "response: {sub_unit}");
    let sub_unit_id = sub_unit["data"]["id"].as_str().expect("sub-unit id").to_string();

    let (status, lesson) = send(
        &ctx,
        Method::POST,
        &format!("/api/v1/sub-units/{sub_unit_id}/lessons"),
        Some(json!({ "subUnitId": sub_unit_id, "title": "Basics", "order": 1 })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED, "response: {lesson}");
    let lesson_id = lesson["data"]["id"].as_str().expect("lesson id").to_string();

    let (status, created) = send(
        &ctx,
        Method::POST,
        &format!("/api/v1/lessons/{lesson_id}/exercises"),
        Some(json!({
            "lessonId": lesson_id,
            "type": "vocabulary",
            "order": 1,
            "instruction": "Translate",
            "content": { "promptText": "Hello", "correctAnswer": "ሰላም" }
        })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED, "response: {created}");

    let (status, listed) =
        send(&ctx, Method::GET, &format!("/api/v1/lessons/{lesson_id}/exercises"), None).await;
    assert_eq!(status, StatusCode::OK);
    let exercises = listed["data"].as_array().expect("exercises");
    assert_eq!(exercises.len(), 1);
    let exercise = &exercises[0];
    assert_eq!(exercise["id"], created["data"]["id"]);
    assert_eq!(exercise["type"], "vocabulary");
    assert_eq!(exercise["instruction"], "Translate");
    assert_eq!(exercise["title"], "Translate");
    assert_eq!(exercise["unitId"], unit_id);
    assert_eq!(exercise["subUnitId"], sub_unit_id);
    assert_eq!(exercise["lessonId"], lesson_id);
    assert_eq!(exercise["content"], json!({ "promptText": "Hello", "correctAnswer": "ሰላም" }));
}

#[tokio::test]
async fn blank_writing_option_is_reported_by_position() {
    let ctx = test_support::setup_test_context().await;
    let (_unit, _sub_unit, lesson) = test_support::insert_lesson_chain(ctx.state.db()).await;

    let (status, body) = send(
        &ctx,
        Method::POST,
        &format!("/api/v1/lessons/{}/exercises", lesson.id),
        Some(writing_payload(json!([{ "id": 0, "text": "" }, { "id": 1, "text": "ሰላም" }]), json!(1))),
    )
    .await;

    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(body["errors"]["options[0].text"], "Option 1 text is required");
    assert!(body["errors"].get("correctOptionId").is_none());
    assert!(repositories::exercises::list_for_lesson(ctx.state.db(), &lesson.id).await.is_empty());
}

#[tokio::test]
async fn missing_type_and_instruction_fail_together() {
    let ctx = test_support::setup_test_context().await;
    let (_unit, _sub_unit, lesson) = test_support::insert_lesson_chain(ctx.state.db()).await;

    let (status, body) = send(
        &ctx,
        Method::POST,
        &format!("/api/v1/lessons/{}/exercises", lesson.id),
        Some(json!({ "order": "abc", "instruction": " " })),
    )
    .await;

    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(body["errors"]["type"], "Exercise type is required");
    assert_eq!(body["errors"]["instruction"], "Instruction is required");
    assert_eq!(body["errors"]["order"], "Order must be a positive number");
}

#[tokio::test]
async fn unsupported_type_is_reported_on_the_type_field() {
    let ctx = test_support::setup_test_context().await;
    let db = ctx.state.db();
    let (_unit, _sub_unit, lesson) = test_support::insert_lesson_chain(db).await;

    let (status, body) = send(
        &ctx,
        Method::POST,
        &format!("/api/v1/lessons/{}/exercises", lesson.id),
        Some(json!({ "type": "quiz", "order": 1, "instruction": " " })),
    )
    .await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(body["errors"]["type"], "Exercise type \"quiz\" is not supported");
    assert_eq!(body["errors"]["instruction"], "Instruction is required");

    let exercise = test_support::insert_vocabulary(db, &lesson.id, "Hello", "ሰላም", 1).await;
    let (status, body) = send(
        &ctx,
        Method::PATCH,
        &format!("/api/v1/exercises/{}", exercise.id),
        Some(json!({ "type": "quiz" })),
    )
    .await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(body["details"][0]["field"], "type");
    assert_eq!(body["details"][0]["reason"], "immutable");
    assert_eq!(repositories::exercises::list_for_lesson(db, &lesson.id).await.len(), 1);
}

#[tokio::test]
async fn writing_options_are_stored_and_can_be_removed() {
    let ctx = test_support::setup_test_context().await;
    let db = ctx.state.db();
    let (_unit, _sub_unit, lesson) = test_support::insert_lesson_chain(db).await;

    let (status, created) = send(
        &ctx,
        Method::POST,
        &format!("/api/v1/lessons/{}/exercises", lesson.id),
        Some(writing_payload(
            json!([{ "text": "ደህና ሁን" }, { "text": "ሰላም" }, { "text": "አመሰግናለሁ" }]),
            json!(1),
        )),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED, "response: {created}");
    assert_eq!(created["data"]["content"]["options"][2]["id"], 2);
    assert_eq!(created["data"]["content"]["correctOptionId"], 1);
    let exercise_id = created["data"]["id"].as_str().expect("exercise id").to_string();

    let (status, trimmed) =
        send(&ctx, Method::DELETE, &format!("/api/v1/exercises/{exercise_id}/options/0"), None)
            .await;
    assert_eq!(status, StatusCode::OK, "response: {trimmed}");
    assert_eq!(
        trimmed["data"]["content"]["options"],
        json!([{ "id": 0, "text": "ሰላም" }, { "id": 1, "text": "አመሰግናለሁ" }])
    );
    assert_eq!(trimmed["data"]["content"]["correctOptionId"], 0);

    let (status, _) =
        send(&ctx, Method::DELETE, &format!("/api/v1/exercises/{exercise_id}/options/0"), None)
            .await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);

    let (status, _) =
        send(&ctx, Method::DELETE, &format!("/api/v1/exercises/{exercise_id}/options/9"), None)
            .await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let stored = repositories::exercises::fetch_one_by_id(db, &exercise_id).await.expect("exercise");
    match stored.content {
        ExerciseContent::Writing(writing) => {
            assert_eq!(writing.options.len(), 2);
            assert_eq!(writing.correct_option_id, 0);
        }
        other => panic!("unexpected content: {other:?}"),
    }
}

#[tokio::test]
async fn vocabulary_has_no_options_to_remove() {
    let ctx = test_support::setup_test_context().await;
    let db = ctx.state.db();
    let (_unit, _sub_unit, lesson) = test_support::insert_lesson_chain(db).await;
    let exercise = test_support::insert_vocabulary(db, &lesson.id, "Hello", "ሰላም", 1).await;

    let (status, _) =
        send(&ctx, Method::DELETE, &format!("/api/v1/exercises/{}/options/0", exercise.id), None)
            .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn exercise_type_cannot_change_on_update() {
    let ctx = test_support::setup_test_context().await;
    let db = ctx.state.db();
    let (_unit, _sub_unit, lesson) = test_support::insert_lesson_chain(db).await;
    let exercise = test_support::insert_vocabulary(db, &lesson.id, "Hello", "ሰላም", 1).await;

    let (status, body) = send(
        &ctx,
        Method::PATCH,
        &format!("/api/v1/exercises/{}", exercise.id),
        Some(json!({ "type": "grammar", "instruction": "Changed" })),
    )
    .await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(body["details"][0]["field"], "type");
    assert_eq!(body["details"][0]["reason"], "immutable");

    let stored = repositories::exercises::fetch_one_by_id(db, &exercise.id).await.expect("exercise");
    assert_eq!(stored.instruction, "Translate the word");
}

#[tokio::test]
async fn update_replaces_content_and_clears_blank_hints() {
    let ctx = test_support::setup_test_context().await;
    let db = ctx.state.db();
    let (_unit, _sub_unit, lesson) = test_support::insert_lesson_chain(db).await;
    let exercise = test_support::insert_vocabulary(db, &lesson.id, "Hello", "ሰላም", 1).await;

    let (status, body) = send(
        &ctx,
        Method::PATCH,
        &format!("/api/v1/exercises/{}", exercise.id),
        Some(json!({
            "hints": "   ",
            "content": {
                "promptText": "Goodbye",
                "correctAnswer": "ደህና ሁን",
                "blocks": ["ደህና", "", "ሁን"],
                "referenceText": "ignored"
            }
        })),
    )
    .await;
    assert_eq!(status, StatusCode::OK, "response: {body}");
    assert!(body["data"].get("hints").is_none());
    assert_eq!(
        body["data"]["content"],
        json!({ "promptText": "Goodbye", "correctAnswer": "ደህና ሁን", "blocks": ["ደህና", "ሁን"] })
    );
}

#[tokio::test]
async fn form_view_expands_stored_content() {
    let ctx = test_support::setup_test_context().await;
    let db = ctx.state.db();
    let (_unit, _sub_unit, lesson) = test_support::insert_lesson_chain(db).await;
    let exercise = test_support::insert_vocabulary(db, &lesson.id, "Hello", "ሰላም", 1).await;

    let (status, body) =
        send(&ctx, Method::GET, &format!("/api/v1/exercises/{}/form", exercise.id), None).await;
    assert_eq!(status, StatusCode::OK);
    let form = &body["data"]["content"];
    assert_eq!(form["promptText"], "Hello");
    assert_eq!(form["correctAnswer"], "ሰላም");
    assert_eq!(form["referenceText"], "");
    assert_eq!(form["options"], json!([]));
    assert_eq!(form["correctOptionId"], Value::Null);
    assert_eq!(body["data"]["hints"], "");
}

#[tokio::test]
async fn reorder_assigns_positions_and_rejects_partial_lists() {
    let ctx = test_support::setup_test_context().await;
    let db = ctx.state.db();
    let (_unit, _sub_unit, lesson) = test_support::insert_lesson_chain(db).await;
    let first = test_support::insert_vocabulary(db, &lesson.id, "Hello", "ሰላም", 1).await;
    let second = test_support::insert_vocabulary(db, &lesson.id, "Thanks", "አመሰግናለሁ", 2).await;
    let third = test_support::insert_vocabulary(db, &lesson.id, "Goodbye", "ደህና ሁን", 3).await;

    let uri = format!("/api/v1/lessons/{}/exercises/reorder", lesson.id);
    let (status, body) = send(
        &ctx,
        Method::PUT,
        &uri,
        Some(json!({ "exerciseIds": [third.id, first.id, second.id] })),
    )
    .await;
    assert_eq!(status, StatusCode::OK, "response: {body}");

    let orders: Vec<(String, i32)> = repositories::exercises::list_for_lesson(db, &lesson.id)
        .await
        .into_iter()
        .map(|exercise| (exercise.id, exercise.order))
        .collect();
    assert!(orders.contains(&(third.id.clone(), 1)));
    assert!(orders.contains(&(first.id.clone(), 2)));
    assert!(orders.contains(&(second.id.clone(), 3)));

    let (status, body) =
        send(&ctx, Method::PUT, &uri, Some(json!({ "orderedIds": [first.id, "exercise-foreign"] })))
            .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    let error = body["error"].as_str().expect("error message");
    assert!(error.contains("exercise-foreign"));
    assert!(error.contains(&second.id));
    assert!(error.contains(&third.id));

    let unchanged = repositories::exercises::fetch_one_by_id(db, &first.id).await.expect("exercise");
    assert_eq!(unchanged.order, 2);
}

#[tokio::test]
async fn next_order_follows_the_highest_sibling() {
    let ctx = test_support::setup_test_context().await;
    let db = ctx.state.db();
    let (_unit, _sub_unit, lesson) = test_support::insert_lesson_chain(db).await;
    let uri = format!("/api/v1/lessons/{}/exercises/next-order", lesson.id);

    let (status, body) = send(&ctx, Method::GET, &uri, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["nextOrder"], 1);

    test_support::insert_vocabulary(db, &lesson.id, "Hello", "ሰላም", 4).await;
    let (_, body) = send(&ctx, Method::GET, &uri, None).await;
    assert_eq!(body["data"]["nextOrder"], 5);
}

#[tokio::test]
async fn draft_retype_clears_foreign_fields() {
    let ctx = test_support::setup_test_context().await;

    let (status, body) = send(
        &ctx,
        Method::POST,
        "/api/v1/exercises/draft",
        Some(json!({
            "type": "listening",
            "content": {
                "promptText": "Hello",
                "promptAudio": "blob:hello",
                "referenceText": "ref",
                "options": [{ "id": 0, "text": "" }],
                "correctOptionId": 0
            }
        })),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    let content = &body["data"]["content"];
    assert_eq!(body["data"]["type"], "listening");
    assert_eq!(content["promptText"], "");
    assert_eq!(content["referenceText"], "");
    assert_eq!(content["promptAudio"], "blob:hello");
    assert_eq!(content["options"], json!([{ "id": 0, "text": "" }]));
    assert_eq!(content["correctOptionId"], 0);
}
