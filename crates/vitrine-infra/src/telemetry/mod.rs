//! Telemetry initialization
//!
//! This module installs the process-wide tracing subscriber.

mod init_basic;

pub use init_basic::{init_telemetry, shutdown_telemetry};
