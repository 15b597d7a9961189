//! Conversion of unsuccessful HTTP responses into crate errors.
//!
//! The backend reports failures as JSON bodies carrying a human-readable
//! `message` (Laravel style) or `error` field. That text is what the admin
//! sees in the feedback notification, so it is preserved verbatim.

use std::fmt;

use serde::Deserialize;

use crate::error::FloranetError;

/// API error with HTTP status information
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiError {
    /// HTTP status code, if available
    pub status: Option<reqwest::StatusCode>,
    /// Human-readable error message
    pub message: String,
}

#[derive(Deserialize)]
struct ErrorBody {
    #[serde(default)]
    message: Option<String>,
    #[serde(default)]
    error: Option<String>,
}

impl ApiError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            status: None,
            message: message.into(),
        }
    }

    /// Build an error from a non-2xx status and its raw body.
    pub fn from_body(status: reqwest::StatusCode, body: &str) -> Self {
        let message = serde_json::from_str::<ErrorBody>(body)
            .ok()
            .and_then(|b| b.message.or(b.error))
            .filter(|m| !m.trim().is_empty())
            .unwrap_or_else(|| format!("HTTP {}", status));

        Self {
            status: Some(status),
            message,
        }
    }

    pub fn is_not_found(&self) -> bool {
        self.status == Some(reqwest::StatusCode::NOT_FOUND)
    }
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl From<ApiError> for FloranetError {
    fn from(error: ApiError) -> Self {
        FloranetError::Api {
            status: error.status.map(|s| s.as_u16()),
            message: error.message,
        }
    }
}
