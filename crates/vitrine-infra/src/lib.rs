//! Vitrine Infrastructure Library
//!
//! Shared infrastructure for hosts of the attachment subsystem:
//! - Telemetry initialization (tracing subscriber)
//! - Error report formatting

#[cfg(feature = "observability-basic")]
pub mod telemetry;

pub mod error;

// Re-export commonly used types
#[cfg(feature = "observability-basic")]
pub use telemetry::{init_telemetry, shutdown_telemetry};

pub use error::ErrorResponse;
