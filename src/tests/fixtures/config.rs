// Shared configuration fixtures. Compiled into the crate only during tests.

use crate::shell::config::{HamsterConfig, STORE_KEY};

pub const SQL_STORE: &str = "sqlalchemy";

/// Selects the SQL backend on an in-memory database.
pub fn in_memory_config() -> HamsterConfig {
    HamsterConfig::new().with(STORE_KEY, SQL_STORE)
}

pub fn config_with_store(store: &str) -> HamsterConfig {
    HamsterConfig::new().with(STORE_KEY, store)
}
