use crate::core::state::AppState;
use crate::db::types::{ExerciseContent, PromptContent};
use crate::repositories;

/// Seeds one consistent unit -> sub-unit -> lesson -> exercise chain for local
/// development. Does nothing when the store already has units.
pub(crate) async fn seed_demo_curriculum(state: &AppState) -> anyhow::Result<()> {
    let db = state.db();
    let _writes = db.lock_writes().await;

    if !repositories::units::list(db).await.is_empty() {
        tracing::info!("Store already has units; skipping demo curriculum");
        return Ok(());
    }

    let unit = repositories::units::create(
        db,
        repositories::units::CreateUnit {
            title: "Basic Amharic",
            order: 1,
            description: Some("Introduction to Amharic language"),
            thumbnail_url: None,
            is_published: true,
        },
    )
    .await;

    let sub_unit = repositories::sub_units::create(
        db,
        repositories::sub_units::CreateSubUnit {
            unit_id: &unit.id,
            title: "Greetings and Introductions",
            theme: "Greetings",
            order: 1,
            estimated_total_time: 120,
        },
    )
    .await?;

    let lesson = repositories::lessons::create(
        db,
        repositories::lessons::CreateLesson {
            sub_unit_id: &sub_unit.id,
            title: "Basic Greetings",
            order: 1,
            estimated_time: 30,
            objectives: vec![
                "Learn basic greetings".to_string(),
                "Practice pronunciation".to_string(),
            ],
        },
    )
    .await?;

    let exercise = repositories::exercises::create(
        db,
        repositories::exercises::CreateExercise {
            lesson_id: &lesson.id,
            title: "Hello and Goodbye",
            order: 1,
            instruction: "Translate the English greetings to Amharic",
            hints: Some("Remember the formal greeting"),
            content: ExerciseContent::Vocabulary(PromptContent {
                prompt_text: "Hello".to_string(),
                correct_answer: "ሰላም".to_string(),
                prompt_audio: None,
                blocks: Vec::new(),
            }),
        },
    )
    .await?;

    tracing::info!(
        unit_id = %unit.id,
        sub_unit_id = %sub_unit.id,
        lesson_id = %lesson.id,
        exercise_id = %exercise.id,
        "Seeded demo curriculum"
    );
    Ok(())
}
