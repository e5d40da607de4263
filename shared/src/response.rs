//! Backend response envelope
//!
//! The ordering API wraps every payload the same way:
//! ```json
//! { "success": true, "data": { ... } }
//! ```
//! and reports failures (non-2xx) as:
//! ```json
//! { "success": false, "error": "Producto no encontrado" }
//! ```

use serde::{Deserialize, Serialize};

fn non_blank(m: &str) -> bool {
    !m.trim().is_empty()
}

/// Unified backend response structure
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiEnvelope<T> {
    /// Whether the backend considers the call successful
    #[serde(default)]
    pub success: bool,
    /// Response data (present on success)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    /// Error message (present on failure)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    /// Optional human-readable message
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl<T> ApiEnvelope<T> {
    /// Create a successful envelope
    pub fn ok(data: T) -> Self {
        Self {
            success: true,
            data: Some(data),
            error: None,
            message: None,
        }
    }

    /// Create a failed envelope
    pub fn error(message: impl Into<String>) -> Self {
        Self {
            success: false,
            data: None,
            error: Some(message.into()),
            message: None,
        }
    }

    /// Backend-reported failure message, if any
    ///
    /// `error` wins over `message` unless it is blank.
    pub fn error_message(&self) -> Option<&str> {
        self.error
            .as_deref()
            .filter(|m| non_blank(m))
            .or_else(|| self.message.as_deref().filter(|m| non_blank(m)))
    }
}

/// Error body as returned with non-2xx responses
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ErrorBody {
    #[serde(default)]
    pub error: Option<String>,
    #[serde(default)]
    pub message: Option<String>,
}

impl ErrorBody {
    /// Prefer `error`, then `message`; blank strings count as absent
    pub fn into_message(self) -> Option<String> {
        let Self { error, message } = self;
        error
            .filter(|m| non_blank(m))
            .or_else(|| message.filter(|m| non_blank(m)))
    }
}
