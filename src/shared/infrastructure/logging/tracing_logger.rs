// Forwards library records to `tracing` under the `hamsterlib::lib` target.
// Installing a subscriber stays the job of the embedding application.

use crate::shared::infrastructure::logging::{LibLogger, LogLevel};

#[derive(Debug, Default, Clone, Copy)]
pub struct TracingLogger;

impl TracingLogger {
    pub fn new() -> Self {
        Self
    }
}

impl LibLogger for TracingLogger {
    fn log(&self, level: LogLevel, message: &str) {
        match level {
            LogLevel::Debug => tracing::debug!(target: "hamsterlib::lib", "{message}"),
            LogLevel::Info => tracing::info!(target: "hamsterlib::lib", "{message}"),
            LogLevel::Warn => tracing::warn!(target: "hamsterlib::lib", "{message}"),
            LogLevel::Error => tracing::error!(target: "hamsterlib::lib", "{message}"),
        }
    }
}
