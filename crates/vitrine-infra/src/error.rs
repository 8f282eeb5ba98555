//! Error report conversion
//!
//! [`ErrorResponse`] is the serialisable shape hosts print or send when an
//! [`AppError`] escapes to their boundary.

use serde::Serialize;
use vitrine_core::{AppError, ErrorMetadata};

/// Standard error report format
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
    pub code: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error_type: Option<String>,
    pub recoverable: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub suggested_action: Option<&'static str>,
}

impl ErrorResponse {
    /// Customer-safe report; internal details are only included outside production.
    pub fn from_app_error(err: &AppError, include_details: bool) -> Self {
        Self {
            error: err.client_message(),
            code: err.error_code(),
            details: include_details.then(|| err.detailed_message()),
            error_type: include_details.then(|| err.error_type().to_string()),
            recoverable: err.is_recoverable(),
            suggested_action: err.suggested_action(),
        }
    }
}
