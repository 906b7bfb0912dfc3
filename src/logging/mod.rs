//! Logging and observability
//!
//! Structured logging through `tracing`:
//! - Human-readable console output on stderr
//! - Optional JSON file output with rotation
//! - Level from config, overridable with `RUST_LOG`

pub mod structured;

pub use structured::{init_logging, parse_log_level, LoggingGuard};
