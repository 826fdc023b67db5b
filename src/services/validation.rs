use std::collections::BTreeMap;

use serde::Serialize;
use thiserror::Error;
use validator::{Validate, ValidationError};

use crate::db::types::{ContentField, ExerciseType};
use crate::db::Record;
use crate::schemas::exercise::{ExerciseForm, TypeInput};
use crate::schemas::OrderInput;

/// Why a field was rejected. Serialised as `{"reason": "...", ...}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "reason", rename_all = "kebab-case")]
pub(crate) enum Violation {
    Required,
    NotPositive,
    Duplicate {
        #[serde(rename = "conflictingId")]
        conflicting_id: String,
    },
    OutOfRange,
    Mismatch {
        expected: String,
    },
    Immutable,
    UnknownOption,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub(crate) struct FieldError {
    pub(crate) field: String,
    #[serde(flatten)]
    pub(crate) violation: Violation,
    pub(crate) message: String,
}

/// Every failed check of one save attempt, at most one per field.
#[derive(Debug, Clone, Default, PartialEq, Eq, Error)]
#[error("{} field(s) failed validation", .errors.len())]
pub(crate) struct FieldErrors {
    errors: Vec<FieldError>,
}

impl FieldErrors {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    /// Records a failure unless `field` already has one.
    pub(crate) fn add(
        &mut self,
        field: impl Into<String>,
        violation: Violation,
        message: impl Into<String>,
    ) {
        let field = field.into();
        if self.get(&field).is_none() {
            self.errors.push(FieldError { field, violation, message: message.into() });
        }
    }

    pub(crate) fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }

    pub(crate) fn len(&self) -> usize {
        self.errors.len()
    }

    pub(crate) fn get(&self, field: &str) -> Option<&FieldError> {
        self.errors.iter().find(|error| error.field == field)
    }

    /// Field name to message, the shape forms render inline.
    pub(crate) fn messages(&self) -> BTreeMap<String, String> {
        self.errors.iter().map(|error| (error.field.clone(), error.message.clone())).collect()
    }

    pub(crate) fn into_details(self) -> Vec<FieldError> {
        self.errors
    }

    pub(crate) fn finish<T>(self, value: T) -> Result<T, FieldErrors> {
        if self.is_empty() {
            Ok(value)
        } else {
            Err(self)
        }
    }

    /// Like `finish`, for values the checks produce only when they pass.
    pub(crate) fn finish_with<T>(self, value: Option<T>) -> Result<T, FieldErrors> {
        match value {
            Some(value) if self.is_empty() => Ok(value),
            _ => Err(self),
        }
    }
}

pub(crate) fn not_blank(value: &str) -> Result<(), ValidationError> {
    if is_blank(value) {
        return Err(ValidationError::new("blank"));
    }
    Ok(())
}

pub(crate) fn is_blank(value: &str) -> bool {
    value.trim().is_empty()
}

/// Runs the derived checks of `payload` and folds their failures into `errors`.
pub(crate) fn collect<T: Validate>(payload: &T, errors: &mut FieldErrors) {
    let Err(report) = payload.validate() else {
        return;
    };

    let mut fields: Vec<_> = report.field_errors().into_iter().collect();
    fields.sort_by(|left, right| left.0.cmp(&right.0));
    for (field, failures) in fields {
        let key = camel_case(&field);
        for failure in failures.iter() {
            match &*failure.code {
                "blank" => errors.add(&key, Violation::Required, format!("{} is required", label(&key))),
                "range" => errors.add(
                    &key,
                    Violation::OutOfRange,
                    format!("{} must not be negative", label(&key)),
                ),
                other => errors.add(
                    &key,
                    Violation::OutOfRange,
                    format!("{} is invalid ({other})", label(&key)),
                ),
            }
        }
    }
}

pub(crate) fn check_order(input: &OrderInput, errors: &mut FieldErrors) -> Option<i32> {
    let order = input.parse();
    if order.is_none() {
        errors.add("order", Violation::NotPositive, "Order must be a positive number");
    }
    order
}

/// `order` must not be held by another sibling. `editing` is the id of the row
/// being updated, which may keep its own value.
pub(crate) fn check_unique_order<R: Record>(
    order: i32,
    siblings: &[R],
    editing: Option<&str>,
    errors: &mut FieldErrors,
) {
    let conflict = siblings
        .iter()
        .find(|sibling| sibling.order() == order && Some(sibling.id()) != editing);
    if let Some(conflict) = conflict {
        errors.add(
            "order",
            Violation::Duplicate { conflicting_id: conflict.id().to_string() },
            format!("Order {order} is already used"),
        );
    }
}

/// Parses `input` and checks it against the siblings in one go.
pub(crate) fn check_sibling_order<R: Record>(
    input: &OrderInput,
    siblings: &[R],
    editing: Option<&str>,
    errors: &mut FieldErrors,
) -> Option<i32> {
    let order = check_order(input, errors)?;
    check_unique_order(order, siblings, editing, errors);
    Some(order)
}

/// A parent id echoed by the client must name the parent the row is created under.
pub(crate) fn check_parent(
    field: &str,
    supplied: Option<&str>,
    expected: &str,
    errors: &mut FieldErrors,
) {
    if let Some(supplied) = supplied {
        if supplied != expected {
            errors.add(
                field,
                Violation::Mismatch { expected: expected.to_string() },
                format!("{} does not match the parent ({expected})", label(field)),
            );
        }
    }
}

/// Parent ids are fixed once a row exists.
pub(crate) fn check_unchanged(
    field: &str,
    supplied: Option<&str>,
    current: &str,
    errors: &mut FieldErrors,
) {
    if supplied.is_some_and(|supplied| supplied != current) {
        errors.add(field, Violation::Immutable, format!("{} cannot be changed", label(field)));
    }
}

pub(crate) fn require_type(
    exercise_type: Option<&TypeInput>,
    errors: &mut FieldErrors,
) -> Option<ExerciseType> {
    match exercise_type {
        None => errors.add("type", Violation::Required, "Exercise type is required"),
        Some(TypeInput::Unknown(value)) => errors.add(
            "type",
            Violation::Required,
            format!("Exercise type {value} is not supported"),
        ),
        Some(TypeInput::Known(_)) => {}
    }
    exercise_type.and_then(TypeInput::known)
}

pub(crate) fn check_type_unchanged(
    supplied: Option<&TypeInput>,
    existing: ExerciseType,
    errors: &mut FieldErrors,
) {
    if supplied.is_some_and(|supplied| supplied.known() != Some(existing)) {
        errors.add(
            "type",
            Violation::Immutable,
            format!("Exercise type is fixed as {}", existing.as_str()),
        );
    }
}

/// Type-conditional content checks: the required fields of `exercise_type`
/// must be present, every option must have text, and the correct option must
/// point at one of them.
pub(crate) fn check_exercise_content(
    exercise_type: ExerciseType,
    form: &ExerciseForm,
    errors: &mut FieldErrors,
) {
    for &field in exercise_type.required_fields() {
        match field {
            ContentField::Options => {
                if form.options.is_empty() {
                    errors.add(
                        field.as_str(),
                        Violation::Required,
                        "At least one option is required for this exercise type",
                    );
                }
                for (index, option) in form.options.iter().enumerate() {
                    if is_blank(&option.text) {
                        errors.add(
                            format!("options[{index}].text"),
                            Violation::Required,
                            format!("Option {} text is required", index + 1),
                        );
                    }
                }
            }
            ContentField::CorrectOptionId => {
                if form.correct_option_id.is_none() {
                    errors.add(
                        field.as_str(),
                        Violation::Required,
                        "Correct option is required for this exercise type",
                    );
                }
            }
            ContentField::Blocks => {}
            text_field => {
                if text_value(form, text_field).is_some_and(is_blank) {
                    errors.add(
                        text_field.as_str(),
                        Violation::Required,
                        format!("{} is required for this exercise type", label(text_field.as_str())),
                    );
                }
            }
        }
    }

    if !exercise_type.allows(ContentField::CorrectOptionId) {
        return;
    }
    let Some(position) = form.correct_option_id else {
        return;
    };
    let has_options = form.options.iter().any(|option| !is_blank(&option.text));
    let options_required = exercise_type.required_fields().contains(&ContentField::Options);
    if !has_options && !options_required {
        return;
    }
    let known = usize::try_from(position)
        .ok()
        .and_then(|position| form.options.get(position))
        .is_some_and(|option| !is_blank(&option.text));
    if !known {
        errors.add(
            ContentField::CorrectOptionId.as_str(),
            Violation::UnknownOption,
            format!("Correct option {position} is not one of the options"),
        );
    }
}

fn text_value(form: &ExerciseForm, field: ContentField) -> Option<&str> {
    match field {
        ContentField::PromptText => Some(&form.prompt_text),
        ContentField::PromptAudio => Some(&form.prompt_audio),
        ContentField::ReferenceText => Some(&form.reference_text),
        ContentField::DisplayText => Some(&form.display_text),
        ContentField::CorrectAnswer => Some(&form.correct_answer),
        ContentField::Blocks | ContentField::Options | ContentField::CorrectOptionId => None,
    }
}

/// Order to propose for a new sibling.
pub(crate) fn suggest_next_order(orders: impl IntoIterator<Item = i32>) -> i32 {
    orders.into_iter().max().map_or(1, |max| max.saturating_add(1))
}

fn camel_case(field: &str) -> String {
    let mut out = String::with_capacity(field.len());
    let mut upper = false;
    for ch in field.chars() {
        if ch == '_' {
            upper = true;
        } else if upper {
            out.extend(ch.to_uppercase());
            upper = false;
        } else {
            out.push(ch);
        }
    }
    out
}

/// `estimatedTime` -> `Estimated time`.
fn label(field: &str) -> String {
    let mut out = String::with_capacity(field.len() + 4);
    for (index, ch) in field.chars().enumerate() {
        if index == 0 {
            out.extend(ch.to_uppercase());
        } else if ch.is_uppercase() {
            out.push(' ');
            out.extend(ch.to_lowercase());
        } else {
            out.push(ch);
        }
    }
    out
}
