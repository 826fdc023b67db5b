pub(crate) mod dashboard;
pub(crate) mod errors;
pub(crate) mod exercises;
pub(crate) mod handlers;
pub(crate) mod lessons;
pub(crate) mod router;
pub(crate) mod sub_units;
pub(crate) mod units;
