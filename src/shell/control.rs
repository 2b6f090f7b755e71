// HamsterControl is the composition root handed to clients.
//
// Responsibilities
// - Resolve the configured storage backend through the registry and instantiate it.
// - Hold the library logger (discarding by default).
// - Forward the categories, activities and facts collections of the store.
//
// Construction either returns a usable controller or an error; nothing half built escapes.

use crate::modules::time_tracking::adapters::outbound::store::{
    ActivityManager, CategoryManager, FactManager, Store, StoreError,
};
use crate::shared::infrastructure::logging::{LibLogger, NullLogger};
use crate::shell::config::HamsterConfig;
use crate::shell::registry::{self, BackendRegistryEntry};
use std::fmt;
use std::sync::Arc;
use thiserror::Error;

pub const INVALID_STORAGE_MESSAGE: &str = "No or invalid storage specified.";

#[derive(Debug, Error)]
pub enum ControlError {
    #[error("configuration error: {0}")]
    Configuration(String),

    #[error("could not resolve backend `{backend}`: {reason}")]
    BackendResolution { backend: String, reason: String },

    #[error(transparent)]
    Store(#[from] StoreError),
}

pub struct HamsterControl {
    config: HamsterConfig,
    lib_logger: Arc<dyn LibLogger>,
    backend: &'static BackendRegistryEntry,
    store: Arc<dyn Store>,
}

impl HamsterControl {
    pub fn new(config: HamsterConfig) -> Result<Self, ControlError> {
        Self::with_logger(config, Arc::new(NullLogger::new()))
    }

    pub fn with_logger(
        config: HamsterConfig,
        lib_logger: Arc<dyn LibLogger>,
    ) -> Result<Self, ControlError> {
        let backend = resolve_backend(&config)?;
        let store = backend.backend.instantiate(&config)?;
        lib_logger.debug(&format!("using the {} store", backend.verbose_name));

        Ok(Self {
            config,
            lib_logger,
            backend,
            store,
        })
    }

    pub fn config(&self) -> &HamsterConfig {
        &self.config
    }

    pub fn lib_logger(&self) -> &Arc<dyn LibLogger> {
        &self.lib_logger
    }

    pub fn backend(&self) -> &'static BackendRegistryEntry {
        self.backend
    }

    pub fn store(&self) -> &Arc<dyn Store> {
        &self.store
    }

    pub fn categories(&self) -> Arc<dyn CategoryManager> {
        self.store.categories()
    }

    pub fn activities(&self) -> Arc<dyn ActivityManager> {
        self.store.activities()
    }

    pub fn facts(&self) -> Arc<dyn FactManager> {
        self.store.facts()
    }
}

impl fmt::Debug for HamsterControl {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HamsterControl")
            .field("config", &self.config)
            .field("lib_logger", &self.lib_logger.name())
            .field("backend", &self.backend)
            .finish_non_exhaustive()
    }
}

fn resolve_backend(config: &HamsterConfig) -> Result<&'static BackendRegistryEntry, ControlError> {
    config
        .store()
        .and_then(registry::lookup)
        .ok_or_else(|| ControlError::Configuration(INVALID_STORAGE_MESSAGE.to_string()))
}
