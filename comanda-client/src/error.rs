//! Client error types

use shared::error::{AppError, ErrorCode};
use thiserror::Error;

/// Message used when the backend rejects a call without saying why
pub const GENERIC_BACKEND_ERROR: &str = "The server could not process the request";

/// Client error type
#[derive(Debug, Error)]
pub enum ClientError {
    /// HTTP request failed (connection, timeout, body decoding)
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Backend answered with a non-success status
    #[error("{message}")]
    Backend { status: u16, message: String },

    /// Base URL cannot carry path segments
    #[error("Invalid URL: {0}")]
    InvalidUrl(String),

    /// Serialization error
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Local storage error
    #[error("Storage error: {0}")]
    Io(#[from] std::io::Error),

    /// Validation or domain error raised before any request was made
    #[error(transparent)]
    App(#[from] AppError),
}

impl ClientError {
    /// Build a backend error, substituting the generic message when the
    /// backend did not provide one
    pub fn backend(status: u16, message: Option<String>) -> Self {
        Self::Backend {
            status,
            message: message.unwrap_or_else(|| GENERIC_BACKEND_ERROR.to_string()),
        }
    }

    /// Collapse into an [`AppError`] for display
    pub fn to_app_error(&self) -> AppError {
        match self {
            Self::App(err) => err.clone(),
            Self::Backend { status: 404, message } => {
                AppError::with_message(ErrorCode::NotFound, message.clone()).with_detail("status", 404)
            }
            Self::Backend { status, message } => {
                AppError::with_message(ErrorCode::OrderRejected, message.clone())
                    .with_detail("status", *status)
            }
            Self::Http(err) if err.is_timeout() => {
                AppError::with_message(ErrorCode::TimeoutError, err.to_string())
            }
            Self::Http(err) => AppError::with_message(ErrorCode::NetworkError, err.to_string()),
            Self::InvalidUrl(msg) => AppError::with_message(ErrorCode::InvalidFormat, msg.clone()),
            Self::Serialization(err) => AppError::with_message(ErrorCode::InvalidFormat, err.to_string()),
            Self::Io(err) => AppError::with_message(ErrorCode::StorageCorrupted, err.to_string()),
        }
    }
}

/// Result type for client operations
pub type ClientResult<T> = Result<T, ClientError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_backend_error_message() {
        let err = ClientError::backend(422, Some("Producto agotado".to_string()));
        assert_eq!(err.to_string(), "Producto agotado");

        let err = ClientError::backend(500, None);
        assert_eq!(err.to_string(), GENERIC_BACKEND_ERROR);

        let app = err.to_app_error();
        assert_eq!(app.code, ErrorCode::OrderRejected);
        assert_eq!(app.details.unwrap().get("status").unwrap(), 500);

        let app = ClientError::backend(404, Some("Pedido no encontrado".to_string())).to_app_error();
        assert_eq!(app.code, ErrorCode::NotFound);
        assert_eq!(app.message, "Pedido no encontrado");
    }

    #[test]
    fn test_app_error_passes_through() {
        let err = ClientError::from(AppError::empty_cart());
        assert_eq!(err.to_string(), "Cart is empty");
        assert_eq!(err.to_app_error().code, ErrorCode::OrderEmpty);
    }
}
