use std::collections::{BTreeMap, HashMap};

use serde::{Deserialize, Deserializer, Serialize};

use crate::repositories::DeleteMode;
use crate::services::validation::FieldError;

pub(crate) mod dashboard;
pub(crate) mod exercise;
pub(crate) mod lesson;
pub(crate) mod sub_unit;
pub(crate) mod unit;

/// Response envelope shared by every curriculum endpoint.
#[derive(Debug, Serialize)]
pub(crate) struct ApiResponse<T> {
    pub(crate) success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub(crate) data: Option<T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub(crate) error: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub(crate) message: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub(crate) errors: Option<BTreeMap<String, String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub(crate) details: Option<Vec<FieldError>>,
}

impl<T> ApiResponse<T> {
    pub(crate) fn ok(data: T) -> Self {
        Self { success: true, data: Some(data), error: None, message: None, errors: None, details: None }
    }

    pub(crate) fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = Some(message.into());
        self
    }
}

impl ApiResponse<()> {
    pub(crate) fn failure(error: impl Into<String>) -> Self {
        Self {
            success: false,
            data: None,
            error: Some(error.into()),
            message: None,
            errors: None,
            details: None,
        }
    }
}

/// `order` as the form submits it: a number, or the raw text of the input.
/// Anything else is kept so it can be reported as a field error.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub(crate) enum OrderInput {
    Number(i64),
    Float(f64),
    Text(String),
    Other(serde_json::Value),
}

impl Default for OrderInput {
    fn default() -> Self {
        OrderInput::Text(String::new())
    }
}

impl OrderInput {
    /// Integer value when it is at least 1 and fits the stored column.
    pub(crate) fn parse(&self) -> Option<i32> {
        let value = match self {
            OrderInput::Number(value) => *value,
            OrderInput::Float(value) if value.fract() == 0.0 => *value as i64,
            OrderInput::Float(_) | OrderInput::Other(_) => return None,
            OrderInput::Text(text) => text.trim().parse::<i64>().ok()?,
        };
        if value < 1 {
            return None;
        }
        i32::try_from(value).ok()
    }
}

/// For patch fields that can be cleared: absent is `None`, `null` is `Some(None)`.
pub(crate) fn nullable<'de, D, T>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Option::<T>::deserialize(deserializer).map(Some)
}

#[derive(Debug, Default, Deserialize)]
pub(crate) struct DeleteQuery {
    #[serde(default)]
    pub(crate) cascade: bool,
}

impl DeleteQuery {
    pub(crate) fn mode(&self) -> DeleteMode {
        if self.cascade {
            DeleteMode::Cascade
        } else {
            DeleteMode::Restrict
        }
    }
}

#[derive(Debug, Serialize)]
pub(crate) struct DeleteResponse {
    pub(crate) removed: usize,
}

#[derive(Debug, Serialize)]
pub(crate) struct HealthResponse {
    pub(crate) service: String,
    pub(crate) status: String,
    pub(crate) components: HashMap<String, String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct RootResponse {
    pub(crate) message: String,
    pub(crate) version: String,
    pub(crate) api_prefix: String,
}
