// Static table of the storage backends a controller can be configured with.
//
// Responsibilities
// - Map a configuration identifier to a backend variant.
// - Turn a backend variant into a live Store, or explain why this build cannot.

use crate::modules::time_tracking::adapters::outbound::store::Store;
use crate::shell::config::HamsterConfig;
use crate::shell::control::ControlError;
use std::sync::Arc;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StoreBackend {
    /// Relational store on SQLite, requires the `sql` feature.
    Sql,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BackendRegistryEntry {
    pub verbose_name: &'static str,
    pub backend: StoreBackend,
}

// "sqlalchemy" stays the identifier so existing hamster configuration files keep working.
pub static REGISTERED_BACKENDS: &[(&str, BackendRegistryEntry)] = &[(
    "sqlalchemy",
    BackendRegistryEntry {
        verbose_name: "SQLAlchemy",
        backend: StoreBackend::Sql,
    },
)];

pub fn lookup(identifier: &str) -> Option<&'static BackendRegistryEntry> {
    REGISTERED_BACKENDS
        .iter()
        .find(|(name, _)| *name == identifier)
        .map(|(_, entry)| entry)
}

impl StoreBackend {
    pub fn identifier(self) -> &'static str {
        REGISTERED_BACKENDS
            .iter()
            .find(|(_, entry)| entry.backend == self)
            .map(|(name, _)| *name)
            .unwrap_or("unknown")
    }

    /// Construct the backend with the configuration as its only input.
    /// Backend construction errors are passed through unchanged.
    pub fn instantiate(self, config: &HamsterConfig) -> Result<Arc<dyn Store>, ControlError> {
        match self {
            StoreBackend::Sql => instantiate_sql(config),
        }
    }
}

#[cfg(feature = "sql")]
fn instantiate_sql(config: &HamsterConfig) -> Result<Arc<dyn Store>, ControlError> {
    use crate::modules::time_tracking::adapters::outbound::sql_store::SqlStore;
    Ok(Arc::new(SqlStore::new(config)?))
}

#[cfg(not(feature = "sql"))]
fn instantiate_sql(_config: &HamsterConfig) -> Result<Arc<dyn Store>, ControlError> {
    Err(ControlError::BackendResolution {
        backend: StoreBackend::Sql.identifier().to_string(),
        reason: "built without the `sql` feature".to_string(),
    })
}
