// Library logger capability.
//
// Purpose
// - Give the controller a diagnostics channel without ever configuring output destinations.
//
// Responsibilities
// - Define the LibLogger trait the controller logs through.
// - Default to NullLogger so nothing is emitted until the embedding application opts in.

pub mod null;
pub mod tracing_logger;

pub use null::NullLogger;
pub use tracing_logger::TracingLogger;

/// Channel name every library logger reports under.
pub const LIB_LOGGER_NAME: &str = "hamsterlib.lib";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogLevel {
    Debug,
    Info,
    Warn,
    Error,
}

pub trait LibLogger: Send + Sync {
    fn name(&self) -> &str {
        LIB_LOGGER_NAME
    }

    fn log(&self, level: LogLevel, message: &str);

    fn debug(&self, message: &str) {
        self.log(LogLevel::Debug, message);
    }

    fn info(&self, message: &str) {
        self.log(LogLevel::Info, message);
    }

    fn warn(&self, message: &str) {
        self.log(LogLevel::Warn, message);
    }

    fn error(&self, message: &str) {
        self.log(LogLevel::Error, message);
    }
}
