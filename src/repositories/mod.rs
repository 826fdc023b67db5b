pub(crate) mod exercises;
pub(crate) mod lessons;
pub(crate) mod sub_units;
pub(crate) mod units;

use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub(crate) enum StoreError {
    #[error("{entity} not found: {id}")]
    NotFound { entity: &'static str, id: String },
    #[error("{reason}: {}", .ids.join(", "))]
    InvalidArgument { reason: String, ids: Vec<String> },
    #[error("{entity} {id} still has {count} {children}")]
    HasChildren { entity: &'static str, id: String, count: usize, children: &'static str },
}

impl StoreError {
    pub(crate) fn not_found(entity: &'static str, id: &str) -> Self {
        Self::NotFound { entity, id: id.to_string() }
    }
}

/// What `delete` does when the row still has children.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub(crate) enum DeleteMode {
    #[default]
    Restrict,
    Cascade,
}
