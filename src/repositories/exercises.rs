use std::collections::HashSet;

use crate::core::time::{now_after, primitive_now_utc};
use crate::db::models::Exercise;
use crate::db::types::ExerciseContent;
use crate::db::{MemoryDb, Record};
use crate::repositories::StoreError;

const ENTITY: &str = "Exercise";

pub(crate) struct CreateExercise<'a> {
    pub(crate) lesson_id: &'a str,
    pub(crate) title: &'a str,
    pub(crate) order: i32,
    pub(crate) instruction: &'a str,
    pub(crate) hints: Option<&'a str>,
    pub(crate) content: ExerciseContent,
}

#[derive(Default)]
pub(crate) struct UpdateExercise {
    pub(crate) title: Option<String>,
    pub(crate) order: Option<i32>,
    pub(crate) instruction: Option<String>,
    /// `Some(None)` clears the hints.
    pub(crate) hints: Option<Option<String>>,
    pub(crate) content: Option<ExerciseContent>,
}

pub(crate) async fn list_for_lesson(db: &MemoryDb, lesson_id: &str) -> Vec<Exercise> {
    db.begin(Exercise::COLLECTION, "list").await;
    db.read().await.exercises.select(|exercise| exercise.lesson_id == lesson_id)
}

pub(crate) async fn fetch_one_by_id(
    db: &MemoryDb,
    exercise_id: &str,
) -> Result<Exercise, StoreError> {
    db.begin(Exercise::COLLECTION, "get").await;
    db.read()
        .await
        .exercises
        .get(exercise_id)
        .cloned()
        .ok_or_else(|| StoreError::not_found(ENTITY, exercise_id))
}

/// `unit_id` and `sub_unit_id` are copied from the lesson.
pub(crate) async fn create(
    db: &MemoryDb,
    params: CreateExercise<'_>,
) -> Result<Exercise, StoreError> {
    db.begin(Exercise::COLLECTION, "create").await;
    let mut tables = db.write().await;
    let (unit_id, sub_unit_id) = tables
        .lessons
        .get(params.lesson_id)
        .map(|lesson| (lesson.unit_id.clone(), lesson.sub_unit_id.clone()))
        .ok_or_else(|| StoreError::not_found("Lesson", params.lesson_id))?;

    let now = primitive_now_utc();
    let exercise = Exercise {
        id: tables.exercises.next_id(),
        unit_id,
        sub_unit_id,
        lesson_id: params.lesson_id.to_string(),
        title: params.title.to_string(),
        order: params.order,
        instruction: params.instruction.to_string(),
        hints: params.hints.map(str::to_string),
        content: params.content,
        created_at: now,
        updated_at: now,
    };
    tables.exercises.insert(exercise.clone());

    Ok(exercise)
}

pub(crate) async fn update(
    db: &MemoryDb,
    exercise_id: &str,
    params: UpdateExercise,
) -> Result<Exercise, StoreError> {
    db.begin(Exercise::COLLECTION, "update").await;
    let mut tables = db.write().await;
    let exercise = tables
        .exercises
        .get_mut(exercise_id)
        .ok_or_else(|| StoreError::not_found(ENTITY, exercise_id))?;

    if let Some(content) = params.content.as_ref() {
        if content.exercise_type() != exercise.exercise_type() {
            return Err(StoreError::InvalidArgument {
                reason: format!(
                    "exercise type is fixed at {}, content is {}",
                    exercise.exercise_type().as_str(),
                    content.exercise_type().as_str()
                ),
                ids: vec![exercise_id.to_string()],
            });
        }
    }

    if let Some(title) = params.title {
        exercise.title = title;
    }
    if let Some(order) = params.order {
        exercise.order = order;
    }
    if let Some(instruction) = params.instruction {
        exercise.instruction = instruction;
    }
    if let Some(hints) = params.hints {
        exercise.hints = hints;
    }
    if let Some(content) = params.content {
        exercise.content = content;
    }
    exercise.updated_at = now_after(exercise.updated_at);

    Ok(exercise.clone())
}

pub(crate) async fn delete(db: &MemoryDb, exercise_id: &str) -> Result<usize, StoreError> {
    db.begin(Exercise::COLLECTION, "delete").await;
    let mut tables = db.write().await;
    tables
        .exercises
        .remove(exercise_id)
        .map(|_| 1)
        .ok_or_else(|| StoreError::not_found(ENTITY, exercise_id))
}

/// Assigns `order = position + 1` to each id. `ordered_ids` must be exactly the
/// lesson's current exercise ids, each once; otherwise nothing changes.
pub(crate) async fn reorder(
    db: &MemoryDb,
    lesson_id: &str,
    ordered_ids: &[String],
) -> Result<Vec<Exercise>, StoreError> {
    db.begin(Exercise::COLLECTION, "reorder").await;
    let mut tables = db.write().await;
    if !tables.lessons.contains(lesson_id) {
        return Err(StoreError::not_found("Lesson", lesson_id));
    }

    let current: HashSet<&str> = tables
        .exercises
        .iter()
        .filter(|exercise| exercise.lesson_id == lesson_id)
        .map(|exercise| exercise.id.as_str())
        .collect();

    let mut seen = HashSet::new();
    let mut unmatched: Vec<String> = ordered_ids
        .iter()
        .filter(|id| !current.contains(id.as_str()) || !seen.insert(id.as_str()))
        .cloned()
        .collect();
    let mut missing: Vec<String> = current
        .iter()
        .filter(|id| !seen.contains(*id))
        .map(|id| id.to_string())
        .collect();
    missing.sort();
    unmatched.extend(missing);

    if !unmatched.is_empty() {
        return Err(StoreError::InvalidArgument {
            reason: format!("exercise ids do not match lesson {lesson_id}"),
            ids: unmatched,
        });
    }

    let mut reordered = Vec::with_capacity(ordered_ids.len());
    for (position, exercise_id) in ordered_ids.iter().enumerate() {
        if let Some(exercise) = tables.exercises.get_mut(exercise_id) {
            exercise.order = position as i32 + 1;
            exercise.updated_at = now_after(exercise.updated_at);
            reordered.push(exercise.clone());
        }
    }

    Ok(reordered)
}
