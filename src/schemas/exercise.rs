use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::core::time::format_primitive;
use crate::db::types::{ExerciseContent, ExerciseOption, ExerciseType};
use crate::schemas::OrderInput;

/// Flat form state: every content field any exercise type can carry. Only the
/// fields belonging to the exercise's type are kept when it is saved.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub(crate) struct ExerciseForm {
    pub(crate) prompt_text: String,
    pub(crate) prompt_audio: String,
    pub(crate) reference_text: String,
    pub(crate) display_text: String,
    pub(crate) correct_answer: String,
    pub(crate) blocks: Vec<String>,
    pub(crate) options: Vec<ExerciseOption>,
    /// Position of the correct entry in `options`.
    pub(crate) correct_option_id: Option<u32>,
}

/// `type` as submitted. Unrecognised values are kept so they surface as a
/// field error on `type` rather than failing the whole body.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub(crate) enum TypeInput {
    Known(ExerciseType),
    Unknown(serde_json::Value),
}

impl TypeInput {
    pub(crate) fn known(&self) -> Option<ExerciseType> {
        match self {
            TypeInput::Known(exercise_type) => Some(*exercise_type),
            TypeInput::Unknown(_) => None,
        }
    }
}

#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub(crate) struct ExerciseCreate {
    #[serde(default)]
    pub(crate) unit_id: Option<String>,
    #[serde(default)]
    pub(crate) sub_unit_id: Option<String>,
    #[serde(default)]
    pub(crate) lesson_id: Option<String>,
    #[serde(default)]
    pub(crate) title: String,
    #[serde(default)]
    pub(crate) order: OrderInput,
    #[serde(default, rename = "type")]
    pub(crate) exercise_type: Option<TypeInput>,
    #[serde(default)]
    #[validate(custom(function = "crate::services::validation::not_blank"))]
    pub(crate) instruction: String,
    #[serde(default)]
    pub(crate) hints: Option<String>,
    #[serde(default)]
    pub(crate) content: ExerciseForm,
}

#[derive(Debug, Default, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub(crate) struct ExerciseUpdate {
    #[serde(default)]
    pub(crate) unit_id: Option<String>,
    #[serde(default)]
    pub(crate) sub_unit_id: Option<String>,
    #[serde(default)]
    pub(crate) lesson_id: Option<String>,
    #[serde(default)]
    pub(crate) title: Option<String>,
    #[serde(default)]
    pub(crate) order: Option<OrderInput>,
    #[serde(default, rename = "type")]
    pub(crate) exercise_type: Option<TypeInput>,
    #[serde(default)]
    #[validate(custom(function = "crate::services::validation::not_blank"))]
    pub(crate) instruction: Option<String>,
    #[serde(default)]
    pub(crate) hints: Option<String>,
    #[serde(default)]
    pub(crate) content: Option<ExerciseForm>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct ReorderRequest {
    #[serde(alias = "orderedIds")]
    pub(crate) exercise_ids: Vec<String>,
}

/// A form being edited before it is saved, possibly with a new type picked.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct ExerciseDraftRequest {
    #[serde(rename = "type")]
    pub(crate) exercise_type: ExerciseType,
    #[serde(default)]
    pub(crate) content: ExerciseForm,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct ExerciseDraftResponse {
    #[serde(rename = "type")]
    pub(crate) exercise_type: ExerciseType,
    pub(crate) content: ExerciseForm,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct ExerciseResponse {
    pub(crate) id: String,
    pub(crate) unit_id: String,
    pub(crate) sub_unit_id: String,
    pub(crate) lesson_id: String,
    pub(crate) title: String,
    pub(crate) order: i32,
    #[serde(rename = "type")]
    pub(crate) exercise_type: ExerciseType,
    pub(crate) instruction: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub(crate) hints: Option<String>,
    pub(crate) content: ExerciseContent,
    pub(crate) created_at: String,
    pub(crate) updated_at: String,
}

impl ExerciseResponse {
    pub(crate) fn from_db(exercise: crate::db::models::Exercise) -> Self {
        Self {
            exercise_type: exercise.exercise_type(),
            id: exercise.id,
            unit_id: exercise.unit_id,
            sub_unit_id: exercise.sub_unit_id,
            lesson_id: exercise.lesson_id,
            title: exercise.title,
            order: exercise.order,
            instruction: exercise.instruction,
            hints: exercise.hints,
            content: exercise.content,
            created_at: format_primitive(exercise.created_at),
            updated_at: format_primitive(exercise.updated_at),
        }
    }
}

/// Edit-screen view of an exercise: the stored content expanded to the flat form.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct ExerciseFormResponse {
    pub(crate) id: String,
    #[serde(rename = "type")]
    pub(crate) exercise_type: ExerciseType,
    pub(crate) title: String,
    pub(crate) order: i32,
    pub(crate) instruction: String,
    pub(crate) hints: String,
    pub(crate) content: ExerciseForm,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct NextOrderResponse {
    pub(crate) lesson_id: String,
    pub(crate) next_order: i32,
}
