//! Logging for the screener.

mod logging;

pub use logging::{setup_logging, WorkerGuard};
