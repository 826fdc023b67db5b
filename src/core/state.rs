use std::sync::Arc;

use crate::core::config::Settings;
use crate::db::MemoryDb;

#[derive(Clone)]
pub(crate) struct AppState {
    inner: Arc<InnerState>,
}

struct InnerState {
    settings: Settings,
    db: MemoryDb,
}

impl AppState {
    pub(crate) fn new(settings: Settings, db: MemoryDb) -> Self {
        Self { inner: Arc::new(InnerState { settings, db }) }
    }

    pub(crate) fn settings(&self) -> &Settings {
        &self.inner.settings
    }

    pub(crate) fn db(&self) -> &MemoryDb {
        &self.inner.db
    }
}
