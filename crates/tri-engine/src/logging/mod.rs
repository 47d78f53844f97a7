//! Logging utilities.
//!
//! Everything logs through the `log` facade; this module only decides which
//! backend receives the records.

mod init;

pub use init::{init_logging, LoggingConfig};
