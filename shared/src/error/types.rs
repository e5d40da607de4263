//! Application error type

use super::codes::ErrorCode;
use serde_json::Value;
use std::collections::HashMap;
use thiserror::Error;

/// Application error with structured error code and details
///
/// Validation failures on the write path (empty cart, no table selected,
/// bad line index) are reported with this type. The UI shows `message` as a
/// transient notice and the state that produced it is left untouched.
#[derive(Debug, Clone, Error, PartialEq)]
#[error("{message}")]
pub struct AppError {
    /// The error code identifying the type of error
    pub code: ErrorCode,
    /// Human-readable error message
    pub message: String,
    /// Optional additional details (offending field, index, ...)
    pub details: Option<HashMap<String, Value>>,
}

impl AppError {
    /// Create a new error with the default message for the error code
    pub fn new(code: ErrorCode) -> Self {
        Self {
            message: code.message().to_string(),
            code,
            details: None,
        }
    }

    /// Create a new error with a custom message
    pub fn with_message(code: ErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
            details: None,
        }
    }

    /// Add a detail entry to this error
    pub fn with_detail(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.details
            .get_or_insert_with(HashMap::new)
            .insert(key.into(), value.into());
        self
    }

    // ==================== Convenience constructors ====================

    /// Create a not found error
    pub fn not_found(resource: impl Into<String>) -> Self {
        let r = resource.into();
        Self::with_message(ErrorCode::NotFound, format!("{} not found", r))
            .with_detail("resource", r)
    }

    /// No table/customer context is active
    pub fn no_active_table() -> Self {
        Self::new(ErrorCode::NoActiveTable)
    }

    /// Cart line index is out of range
    pub fn line_not_found(index: usize) -> Self {
        Self::new(ErrorCode::OrderItemNotFound).with_detail("index", index)
    }

    /// Cart has no lines
    pub fn empty_cart() -> Self {
        Self::new(ErrorCode::OrderEmpty)
    }
}

/// Type alias for Result with AppError
pub type AppResult<T> = Result<T, AppError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_app_error_new() {
        let err = AppError::new(ErrorCode::OrderEmpty);
        assert_eq!(err.code, ErrorCode::OrderEmpty);
        assert_eq!(err.message, "Cart is empty");
        assert!(err.details.is_none());
    }

    #[test]
    fn test_app_error_with_detail() {
        let err = AppError::new(ErrorCode::ValueOutOfRange)
            .with_detail("field", "quantity")
            .with_detail("value", "abc");

        assert_eq!(err.code, ErrorCode::ValueOutOfRange);
        let details = err.details.unwrap();
        assert_eq!(details.get("field").unwrap(), "quantity");
        assert_eq!(details.get("value").unwrap(), "abc");
    }

    #[test]
    fn test_app_error_convenience_constructors() {
        let err = AppError::not_found("Addition");
        assert_eq!(err.code, ErrorCode::NotFound);
        assert_eq!(err.message, "Addition not found");

        let err = AppError::line_not_found(3);
        assert_eq!(err.code, ErrorCode::OrderItemNotFound);
        assert_eq!(err.details.unwrap().get("index").unwrap(), 3);

        assert_eq!(AppError::no_active_table().code, ErrorCode::NoActiveTable);
        assert_eq!(AppError::empty_cart().code, ErrorCode::OrderEmpty);
    }

    #[test]
    fn test_app_error_display() {
        let err = AppError::with_message(ErrorCode::NotFound, "Pedido 7 no existe");
        assert_eq!(format!("{}", err), "Pedido 7 no existe");
    }
}
