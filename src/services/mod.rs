pub(crate) mod content_adapter;
pub(crate) mod dashboard;
pub(crate) mod validation;
