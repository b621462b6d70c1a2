//! Result and error types for the core library

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Core library error type
#[derive(Error, Debug)]
pub enum Error {
    #[error("Network error: {0}")]
    Network(String),

    /// Non-2xx response from the finance API. `message` is the server's own
    /// `message` field when the body carried one.
    #[error("API error (HTTP {status}){}", suffix(.message))]
    Api { status: u16, message: Option<String> },

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Not signed in")]
    Unauthenticated,

    #[error("Storage error: {0}")]
    Storage(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("{0}")]
    Other(String),
}

impl Error {
    /// Create a validation error
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    /// Create a storage error
    pub fn storage(msg: impl Into<String>) -> Self {
        Self::Storage(msg.into())
    }

    /// Create a configuration error
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    /// HTTP status of an API error
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Api { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// Message supplied by the server, if any
    pub fn server_message(&self) -> Option<&str> {
        match self {
            Self::Api { message, .. } => message.as_deref().filter(|m| !m.is_empty()),
            _ => None,
        }
    }

    /// Text to show the user: validation text as-is, otherwise the server's
    /// message, otherwise `fallback`.
    pub fn user_message(&self, fallback: &str) -> String {
        match self {
            Self::Validation(msg) => msg.clone(),
            _ => self
                .server_message()
                .map(str::to_string)
                .unwrap_or_else(|| fallback.to_string()),
        }
    }
}

fn suffix(message: &Option<String>) -> String {
    message
        .as_deref()
        .map(|m| format!(": {m}"))
        .unwrap_or_default()
}

/// Core library result type
pub type Result<T> = std::result::Result<T, Error>;

/// Success/failure envelope returned by the auth entry points.
///
/// Failures never escape as `Err`; they arrive here with a message that is
/// ready to be shown next to the form.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OperationResult<T> {
    pub success: bool,
    pub data: Option<T>,
    pub error: Option<String>,
    pub context: Option<HashMap<String, serde_json::Value>>,
}

impl<T> OperationResult<T> {
    /// Create a successful result
    pub fn ok(data: T) -> Self {
        Self {
            success: true,
            data: Some(data),
            error: None,
            context: None,
        }
    }

    /// Create a failed result
    pub fn fail(error: impl Into<String>) -> Self {
        Self {
            success: false,
            data: None,
            error: Some(error.into()),
            context: None,
        }
    }

    /// Create a failed result with context
    pub fn fail_with_context(
        error: impl Into<String>,
        context: HashMap<String, serde_json::Value>,
    ) -> Self {
        Self {
            success: false,
            data: None,
            error: Some(error.into()),
            context: Some(context),
        }
    }

    /// Map an error to a failed envelope, preferring the server's message
    pub fn from_error(err: &Error, fallback: &str) -> Self {
        let mut context = HashMap::new();
        if let Some(status) = err.status() {
            context.insert("status".to_string(), serde_json::Value::from(status));
        }
        if context.is_empty() {
            Self::fail(err.user_message(fallback))
        } else {
            Self::fail_with_context(err.user_message(fallback), context)
        }
    }

    /// Error message, or an empty string on success
    pub fn error_message(&self) -> &str {
        self.error.as_deref().unwrap_or("")
    }
}

impl<T> From<Result<T>> for OperationResult<T> {
    fn from(result: Result<T>) -> Self {
        match result {
            Ok(data) => Self::ok(data),
            Err(e) => Self::fail(e.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_operation_result_ok() {
        let result: OperationResult<i32> = OperationResult::ok(42);
        assert!(result.success);
        assert_eq!(result.data, Some(42));
        assert!(result.error.is_none());
    }

    #[test]
    fn test_operation_result_fail() {
        let result: OperationResult<i32> = OperationResult::fail("Something went wrong");
        assert!(!result.success);
        assert!(result.data.is_none());
        assert_eq!(result.error_message(), "Something went wrong");
    }

    #[test]
    fn test_user_message_prefers_server_text() {
        let err = Error::Api {
            status: 400,
            message: Some("Email sudah terdaftar".to_string()),
        };
        assert_eq!(err.user_message("fallback"), "Email sudah terdaftar");

        let err = Error::Api {
            status: 500,
            message: None,
        };
        assert_eq!(err.user_message("fallback"), "fallback");

        let err = Error::Network("connection refused".to_string());
        assert_eq!(err.user_message("fallback"), "fallback");
    }

    #[test]
    fn test_from_error_records_status() {
        let err = Error::Api {
            status: 401,
            message: Some("Password salah".to_string()),
        };
        let result: OperationResult<()> = OperationResult::from_error(&err, "fallback");
        assert!(!result.success);
        assert_eq!(result.error_message(), "Password salah");
        let context = result.context.unwrap();
        assert_eq!(context["status"], serde_json::json!(401));
    }

    #[test]
    fn test_api_error_display() {
        let err = Error::Api {
            status: 404,
            message: Some("Keluarga tidak ditemukan".to_string()),
        };
        assert_eq!(err.to_string(), "API error (HTTP 404): Keluarga tidak ditemukan");

        let err = Error::Api {
            status: 502,
            message: None,
        };
        assert_eq!(err.to_string(), "API error (HTTP 502)");
    }
}
