use time::PrimitiveDateTime;

use crate::db::types::{ExerciseContent, ExerciseType};
use crate::db::Record;

#[derive(Debug, Clone, PartialEq)]
pub(crate) struct Unit {
    pub(crate) id: String,
    pub(crate) title: String,
    pub(crate) order: i32,
    pub(crate) description: Option<String>,
    pub(crate) thumbnail_url: Option<String>,
    pub(crate) is_published: bool,
    /// Child sub-unit ids, sorted by the sub-units' `order`. Maintained by storage.
    pub(crate) sub_unit_ids: Vec<String>,
    pub(crate) created_at: PrimitiveDateTime,
    pub(crate) updated_at: PrimitiveDateTime,
}

#[derive(Debug, Clone, PartialEq)]
pub(crate) struct SubUnit {
    pub(crate) id: String,
    pub(crate) unit_id: String,
    pub(crate) title: String,
    pub(crate) theme: String,
    pub(crate) order: i32,
    pub(crate) estimated_total_time: i32,
    pub(crate) created_at: PrimitiveDateTime,
    pub(crate) updated_at: PrimitiveDateTime,
}

#[derive(Debug, Clone, PartialEq)]
pub(crate) struct Lesson {
    pub(crate) id: String,
    pub(crate) unit_id: String,
    pub(crate) sub_unit_id: String,
    pub(crate) title: String,
    pub(crate) order: i32,
    pub(crate) estimated_time: i32,
    pub(crate) objectives: Vec<String>,
    pub(crate) created_at: PrimitiveDateTime,
    pub(crate) updated_at: PrimitiveDateTime,
}

#[derive(Debug, Clone, PartialEq)]
pub(crate) struct Exercise {
    pub(crate) id: String,
    pub(crate) unit_id: String,
    pub(crate) sub_unit_id: String,
    pub(crate) lesson_id: String,
    pub(crate) title: String,
    pub(crate) order: i32,
    pub(crate) instruction: String,
    pub(crate) hints: Option<String>,
    pub(crate) content: ExerciseContent,
    pub(crate) created_at: PrimitiveDateTime,
    pub(crate) updated_at: PrimitiveDateTime,
}

impl Exercise {
    pub(crate) fn exercise_type(&self) -> ExerciseType {
        self.content.exercise_type()
    }
}

macro_rules! impl_record {
    ($model:ty, $collection:literal, $prefix:literal) => {
        impl Record for $model {
            const COLLECTION: &'static str = $collection;
            const ID_PREFIX: &'static str = $prefix;

            fn id(&self) -> &str {
                &self.id
            }

            fn order(&self) -> i32 {
                self.order
            }
        }
    };
}

impl_record!(Unit, "units", "unit");
impl_record!(SubUnit, "sub_units", "subunit");
impl_record!(Lesson, "lessons", "lesson");
impl_record!(Exercise, "exercises", "exercise");
