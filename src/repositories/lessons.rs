use crate::core::time::{now_after, primitive_now_utc};
use crate::db::models::Lesson;
use crate::db::{MemoryDb, Record};
use crate::repositories::{DeleteMode, StoreError};

const ENTITY: &str = "Lesson";

pub(crate) struct CreateLesson<'a> {
    pub(crate) sub_unit_id: &'a str,
    pub(crate) title: &'a str,
    pub(crate) order: i32,
    pub(crate) estimated_time: i32,
    pub(crate) objectives: Vec<String>,
}

#[derive(Default)]
pub(crate) struct UpdateLesson {
    pub(crate) title: Option<String>,
    pub(crate) order: Option<i32>,
    pub(crate) estimated_time: Option<i32>,
    pub(crate) objectives: Option<Vec<String>>,
}

pub(crate) async fn list_for_sub_unit(db: &MemoryDb, sub_unit_id: &str) -> Vec<Lesson> {
    db.begin(Lesson::COLLECTION, "list").await;
    db.read().await.lessons.select(|lesson| lesson.sub_unit_id == sub_unit_id)
}

pub(crate) async fn fetch_one_by_id(db: &MemoryDb, lesson_id: &str) -> Result<Lesson, StoreError> {
    db.begin(Lesson::COLLECTION, "get").await;
    db.read()
        .await
        .lessons
        .get(lesson_id)
        .cloned()
        .ok_or_else(|| StoreError::not_found(ENTITY, lesson_id))
}

/// The lesson's `unit_id` is taken from its sub-unit.
pub(crate) async fn create(db: &MemoryDb, params: CreateLesson<'_>) -> Result<Lesson, StoreError> {
    db.begin(Lesson::COLLECTION, "create").await;
    let mut tables = db.write().await;
    let unit_id = tables
        .sub_units
        .get(params.sub_unit_id)
        .map(|sub_unit| sub_unit.unit_id.clone())
        .ok_or_else(|| StoreError::not_found("SubUnit", params.sub_unit_id))?;

    let now = primitive_now_utc();
    let lesson = Lesson {
        id: tables.lessons.next_id(),
        unit_id,
        sub_unit_id: params.sub_unit_id.to_string(),
        title: params.title.to_string(),
        order: params.order,
        estimated_time: params.estimated_time,
        objectives: params.objectives,
        created_at: now,
        updated_at: now,
    };
    tables.lessons.insert(lesson.clone());

    Ok(lesson)
}

pub(crate) async fn update(
    db: &MemoryDb,
    lesson_id: &str,
    params: UpdateLesson,
) -> Result<Lesson, StoreError> {
    db.begin(Lesson::COLLECTION, "update").await;
    let mut tables = db.write().await;
    let lesson =
        tables.lessons.get_mut(lesson_id).ok_or_else(|| StoreError::not_found(ENTITY, lesson_id))?;

    if let Some(title) = params.title {
        lesson.title = title;
    }
    if let Some(order) = params.order {
        lesson.order = order;
    }
    if let Some(estimated_time) = params.estimated_time {
        lesson.estimated_time = estimated_time;
    }
    if let Some(objectives) = params.objectives {
        lesson.objectives = objectives;
    }
    lesson.updated_at = now_after(lesson.updated_at);

    Ok(lesson.clone())
}

pub(crate) async fn delete(
    db: &MemoryDb,
    lesson_id: &str,
    mode: DeleteMode,
) -> Result<usize, StoreError> {
    db.begin(Lesson::COLLECTION, "delete").await;
    let mut tables = db.write().await;
    if !tables.lessons.contains(lesson_id) {
        return Err(StoreError::not_found(ENTITY, lesson_id));
    }

    let children =
        tables.exercises.iter().filter(|exercise| exercise.lesson_id == lesson_id).count();
    if children > 0 && mode == DeleteMode::Restrict {
        return Err(StoreError::HasChildren {
            entity: ENTITY,
            id: lesson_id.to_string(),
            count: children,
            children: "exercises",
        });
    }

    Ok(tables.remove_lesson_tree(lesson_id))
}
