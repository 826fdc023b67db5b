use std::future::Future;

use futures::{stream, StreamExt};
use time::PrimitiveDateTime;

use crate::core::time::format_primitive;
use crate::db::models::{Exercise, Lesson, SubUnit, Unit};
use crate::db::MemoryDb;
use crate::repositories;
use crate::schemas::dashboard::{
    ActivityAction, ActivityKind, ContentStats, ContentStatus, DashboardResponse, RecentActivity,
};

/// Walks the whole curriculum level by level. Child lists of one level are
/// fetched concurrently, at most `concurrency` at a time.
pub(crate) async fn build(
    db: &MemoryDb,
    concurrency: usize,
    recent_limit: usize,
) -> DashboardResponse {
    let units = repositories::units::list(db).await;

    let unit_ids = units.iter().map(|unit| unit.id.clone()).collect();
    let sub_units = fan_out(unit_ids, concurrency, move |unit_id| async move {
        repositories::sub_units::list_for_unit(db, &unit_id).await
    })
    .await;

    let sub_unit_ids = sub_units.iter().map(|sub_unit| sub_unit.id.clone()).collect();
    let lessons = fan_out(sub_unit_ids, concurrency, move |sub_unit_id| async move {
        repositories::lessons::list_for_sub_unit(db, &sub_unit_id).await
    })
    .await;

    let lesson_ids = lessons.iter().map(|lesson| lesson.id.clone()).collect();
    let exercises = fan_out(lesson_ids, concurrency, move |lesson_id| async move {
        repositories::exercises::list_for_lesson(db, &lesson_id).await
    })
    .await;

    tracing::debug!(
        units = units.len(),
        sub_units = sub_units.len(),
        lessons = lessons.len(),
        exercises = exercises.len(),
        "Dashboard gathered"
    );

    summarize(&units, &sub_units, &lessons, &exercises, recent_limit)
}

async fn fan_out<T, F, Fut>(parent_ids: Vec<String>, concurrency: usize, fetch: F) -> Vec<T>
where
    F: Fn(String) -> Fut,
    Fut: Future<Output = Vec<T>>,
{
    stream::iter(parent_ids)
        .map(fetch)
        .buffer_unordered(concurrency.max(1))
        .collect::<Vec<Vec<T>>>()
        .await
        .into_iter()
        .flatten()
        .collect()
}

pub(crate) fn summarize(
    units: &[Unit],
    sub_units: &[SubUnit],
    lessons: &[Lesson],
    exercises: &[Exercise],
    recent_limit: usize,
) -> DashboardResponse {
    let published = units.iter().filter(|unit| unit.is_published).count();

    let mut activity: Vec<(PrimitiveDateTime, RecentActivity)> = Vec::new();
    activity.extend(units.iter().map(|unit| {
        let action =
            if unit.is_published { ActivityAction::Published } else { ActivityAction::Updated };
        entry(&unit.id, &unit.title, ActivityKind::Unit, action, unit.updated_at)
    }));
    activity.extend(sub_units.iter().map(|sub_unit| {
        entry(
            &sub_unit.id,
            &sub_unit.title,
            ActivityKind::SubUnit,
            ActivityAction::Updated,
            sub_unit.updated_at,
        )
    }));
    activity.extend(lessons.iter().map(|lesson| {
        entry(&lesson.id, &lesson.title, ActivityKind::Lesson, ActivityAction::Updated, lesson.updated_at)
    }));
    activity.extend(exercises.iter().map(|exercise| {
        entry(
            &exercise.id,
            &exercise.title,
            ActivityKind::Exercise,
            ActivityAction::Updated,
            exercise.updated_at,
        )
    }));

    // Newest first; ties broken by id so the output is stable.
    activity.sort_by(|left, right| right.0.cmp(&left.0).then_with(|| left.1.id.cmp(&right.1.id)));
    activity.truncate(recent_limit);

    DashboardResponse {
        stats: ContentStats {
            units: units.len(),
            sub_units: sub_units.len(),
            lessons: lessons.len(),
            exercises: exercises.len(),
        },
        status: ContentStatus { published, draft: units.len() - published },
        recent_activity: activity.into_iter().map(|(_, activity)| activity).collect(),
    }
}

fn entry(
    id: &str,
    title: &str,
    kind: ActivityKind,
    action: ActivityAction,
    updated_at: PrimitiveDateTime,
) -> (PrimitiveDateTime, RecentActivity) {
    (
        updated_at,
        RecentActivity {
            id: id.to_string(),
            title: title.to_string(),
            kind,
            action,
            timestamp: format_primitive(updated_at),
        },
    )
}
