use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::core::time::format_primitive;
use crate::schemas::OrderInput;

#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub(crate) struct LessonCreate {
    #[serde(default)]
    pub(crate) unit_id: Option<String>,
    #[serde(default)]
    pub(crate) sub_unit_id: Option<String>,
    #[serde(default)]
    #[validate(custom(function = "crate::services::validation::not_blank"))]
    pub(crate) title: String,
    #[serde(default)]
    pub(crate) order: OrderInput,
    #[serde(default)]
    #[validate(range(min = 0))]
    pub(crate) estimated_time: i32,
    #[serde(default)]
    pub(crate) objectives: Vec<String>,
}

#[derive(Debug, Default, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub(crate) struct LessonUpdate {
    #[serde(default)]
    pub(crate) unit_id: Option<String>,
    #[serde(default)]
    pub(crate) sub_unit_id: Option<String>,
    #[serde(default)]
    #[validate(custom(function = "crate::services::validation::not_blank"))]
    pub(crate) title: Option<String>,
    #[serde(default)]
    pub(crate) order: Option<OrderInput>,
    #[serde(default)]
    #[validate(range(min = 0))]
    pub(crate) estimated_time: Option<i32>,
    #[serde(default)]
    pub(crate) objectives: Option<Vec<String>>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct LessonResponse {
    pub(crate) id: String,
    pub(crate) unit_id: String,
    pub(crate) sub_unit_id: String,
    pub(crate) title: String,
    pub(crate) order: i32,
    pub(crate) estimated_time: i32,
    pub(crate) objectives: Vec<String>,
    pub(crate) created_at: String,
    pub(crate) updated_at: String,
}

impl LessonResponse {
    pub(crate) fn from_db(lesson: crate::db::models::Lesson) -> Self {
        Self {
            id: lesson.id,
            unit_id: lesson.unit_id,
            sub_unit_id: lesson.sub_unit_id,
            title: lesson.title,
            order: lesson.order,
            estimated_time: lesson.estimated_time,
            objectives: lesson.objectives,
            created_at: format_primitive(lesson.created_at),
            updated_at: format_primitive(lesson.updated_at),
        }
    }
}

/// Drops blank objectives, keeping the rest in order.
pub(crate) fn clean_objectives(objectives: Vec<String>) -> Vec<String> {
    objectives.into_iter().filter(|objective| !objective.trim().is_empty()).collect()
}
