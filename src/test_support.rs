use std::sync::{Arc, OnceLock};

use axum::{
    body::{to_bytes, Body},
    http::{header, Method, Request},
    Router,
};
use tokio::sync::{Mutex, OwnedMutexGuard};

use crate::api;
use crate::core::{config::Settings, state::AppState};
use crate::db::latency::Latency;
use crate::db::models::{Exercise, Lesson, SubUnit, Unit};
use crate::db::types::{ExerciseContent, PromptContent};
use crate::db::MemoryDb;
use crate::repositories;

const SCRUBBED_VARS: &[&str] = &[
    "STORE_LATENCY_MIN_MS",
    "STORE_LATENCY_MAX_MS",
    "STORE_SEED_DEMO",
    "DASHBOARD_FANOUT_CONCURRENCY",
    "DASHBOARD_RECENT_LIMIT",
    "API_V1_STR",
    "PROJECT_NAME",
    "CURRICULA_HOST",
    "CURRICULA_PORT",
    "BACKEND_CORS_ORIGINS",
    "CURRICULA_LOG_LEVEL",
    "CURRICULA_LOG_JSON",
    "ENVIRONMENT",
];

pub(crate) struct TestContext {
    pub(crate) state: AppState,
    pub(crate) app: Router,
    _guard: OwnedMutexGuard<()>,
}

pub(crate) async fn env_lock() -> OwnedMutexGuard<()> {
    static LOCK: OnceLock<Arc<Mutex<()>>> = OnceLock::new();
    let lock = LOCK.get_or_init(|| Arc::new(Mutex::new(()))).clone();
    lock.lock_owned().await
}

pub(crate) fn set_test_env() {
    std::env::set_var("CURRICULA_ENV", "test");
    std::env::set_var("PROMETHEUS_ENABLED", "0");
    for key in SCRUBBED_VARS {
        std::env::remove_var(key);
    }
}

pub(crate) async fn setup_test_context() -> TestContext {
    let guard = env_lock().await;
    set_test_env();

    let settings = Settings::load().expect("settings");
    let state = AppState::new(settings, MemoryDb::new(Latency::None));
    let app = api::router::router(state.clone());

    TestContext { state, app, _guard: guard }
}

pub(crate) async fn insert_unit(db: &MemoryDb, title: &str, order: i32) -> Unit {
    repositories::units::create(
        db,
        repositories::units::CreateUnit {
            title,
            order,
            description: None,
            thumbnail_url: None,
            is_published: false,
        },
    )
    .await
}

pub(crate) async fn insert_sub_unit(db: &MemoryDb, unit_id: &str, title: &str, order: i32) -> SubUnit {
    repositories::sub_units::create(
        db,
        repositories::sub_units::CreateSubUnit {
            unit_id,
            title,
            theme: "Greetings",
            order,
            estimated_total_time: 60,
        },
    )
    .await
    .expect("insert sub-unit")
}

pub(crate) async fn insert_lesson(db: &MemoryDb, sub_unit_id: &str, title: &str, order: i32) -> Lesson {
    repositories::lessons::create(
        db,
        repositories::lessons::CreateLesson {
            sub_unit_id,
            title,
            order,
            estimated_time: 15,
            objectives: Vec::new(),
        },
    )
    .await
    .expect("insert lesson")
}

pub(crate) async fn insert_vocabulary(
    db: &MemoryDb,
    lesson_id: &str,
    prompt: &str,
    answer: &str,
    order: i32,
) -> Exercise {
    repositories::exercises::create(
        db,
        repositories::exercises::CreateExercise {
            lesson_id,
            title: prompt,
            order,
            instruction: "Translate the word",
            hints: None,
            content: ExerciseContent::Vocabulary(PromptContent {
                prompt_text: prompt.to_string(),
                correct_answer: answer.to_string(),
                prompt_audio: None,
                blocks: Vec::new(),
            }),
        },
    )
    .await
    .expect("insert exercise")
}

/// Unit → sub-unit → lesson, each at order 1.
pub(crate) async fn insert_lesson_chain(db: &MemoryDb) -> (Unit, SubUnit, Lesson) {
    let unit = insert_unit(db, "Basic Amharic", 1).await;
    let sub_unit = insert_sub_unit(db, &unit.id, "Greetings and Introductions", 1).await;
    let lesson = insert_lesson(db, &sub_unit.id, "Basic Greetings", 1).await;
    (unit, sub_unit, lesson)
}

pub(crate) fn json_request(
    method: Method,
    uri: &str,
    body: Option<serde_json::Value>,
) -> Request<Body> {
    let builder = Request::builder().method(method).uri(uri);

    if let Some(body) = body {
        let bytes = serde_json::to_vec(&body).expect("serialize body");
        builder
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(bytes))
            .expect("request body")
    } else {
        builder.body(Body::empty()).expect("request body")
    }
}

pub(crate) async fn read_json(response: axum::response::Response<Body>) -> serde_json::Value {
    let body = to_bytes(response.into_body(), usize::MAX).await.expect("response body");
    serde_json::from_slice(&body).unwrap_or_else(|err| {
        let body_text = String::from_utf8_lossy(&body);
        panic!("json parse: {err}; body: {body_text}");
    })
}
