//! Logging utilities.
//!
//! Centralizes logger initialization. Engine code only talks to the `log`
//! facade; `env_logger` is wired up here for binaries that want it, together
//! with the hand-off of wgpu backend records to graphics diagnostics.

mod init;

pub use init::{init_logging, LoggingConfig};
