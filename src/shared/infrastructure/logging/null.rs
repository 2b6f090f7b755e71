use crate::shared::infrastructure::logging::{LibLogger, LogLevel};

/// Discards every record. Used when the caller does not inject a logger.
#[derive(Debug, Default, Clone, Copy)]
pub struct NullLogger;

impl NullLogger {
    pub fn new() -> Self {
        Self
    }
}

impl LibLogger for NullLogger {
    fn log(&self, _level: LogLevel, _message: &str) {}
}
