// Configuration handed to the controller and, unchanged, to the selected backend.
//
// Keys
// - store: backend identifier looked up in the registry.
// - db_path: database location for the SQL backend, ":memory:" when absent.
// - anything else is carried through for the backend to interpret.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::ffi::OsString;

pub const STORE_KEY: &str = "store";
pub const DB_PATH_KEY: &str = "db_path";
pub const IN_MEMORY_DB_PATH: &str = ":memory:";

const ENV_PREFIX: &str = "HAMSTER_";

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct HamsterConfig(Map<String, Value>);

impl HamsterConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.insert(key, value);
        self
    }

    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<Value>) {
        self.0.insert(key.into(), value.into());
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key)
    }

    pub fn get_str(&self, key: &str) -> Option<&str> {
        self.get(key).and_then(Value::as_str)
    }

    pub fn store(&self) -> Option<&str> {
        self.get_str(STORE_KEY)
    }

    pub fn db_path(&self) -> &str {
        self.get_str(DB_PATH_KEY).unwrap_or(IN_MEMORY_DB_PATH)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Collect `HAMSTER_*` variables, e.g. `HAMSTER_DB_PATH` becomes `db_path`.
    pub fn from_vars<I, K, V>(vars: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: Into<String>,
    {
        let mut config = Self::new();
        for (key, value) in vars {
            if let Some(name) = key.as_ref().strip_prefix(ENV_PREFIX)
                && !name.is_empty()
            {
                config.insert(name.to_lowercase(), value.into());
            }
        }
        config
    }

    /// Like `from_vars`, skipping entries whose key or value is not valid UTF-8.
    pub fn from_os_vars<I>(vars: I) -> Self
    where
        I: IntoIterator<Item = (OsString, OsString)>,
    {
        Self::from_vars(vars.into_iter().filter_map(|(key, value)| {
            Some((key.into_string().ok()?, value.into_string().ok()?))
        }))
    }

    pub fn from_env() -> Self {
        Self::from_os_vars(std::env::vars_os())
    }
}

impl From<Map<String, Value>> for HamsterConfig {
    fn from(map: Map<String, Value>) -> Self {
        Self(map)
    }
}
