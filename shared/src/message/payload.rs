use crate::error::AppError;
use serde::{Deserialize, Serialize};
use std::fmt;

// ==================== Notification Level ====================

/// Notice level
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NotificationLevel {
    Info,
    Success,
    Warning,
    Error,
}

impl fmt::Display for NotificationLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Info => write!(f, "info"),
            Self::Success => write!(f, "success"),
            Self::Warning => write!(f, "warning"),
            Self::Error => write!(f, "error"),
        }
    }
}

// ==================== Notice ====================

/// Transient user-facing notice; rendering is up to the UI
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Notice {
    pub level: NotificationLevel,
    pub message: String,
}

impl Notice {
    pub fn new(level: NotificationLevel, message: impl Into<String>) -> Self {
        Self {
            level,
            message: message.into(),
        }
    }

    pub fn info(message: impl Into<String>) -> Self {
        Self::new(NotificationLevel::Info, message)
    }

    pub fn success(message: impl Into<String>) -> Self {
        Self::new(NotificationLevel::Success, message)
    }

    pub fn warning(message: impl Into<String>) -> Self {
        Self::new(NotificationLevel::Warning, message)
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self::new(NotificationLevel::Error, message)
    }
}

impl From<&AppError> for Notice {
    /// Input problems are warnings, everything else is an error
    fn from(err: &AppError) -> Self {
        let level = if err.code.category().is_user_facing() {
            NotificationLevel::Warning
        } else {
            NotificationLevel::Error
        };
        Self::new(level, err.message.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorCode;

    #[test]
    fn test_notice_from_app_error() {
        let notice = Notice::from(&AppError::no_active_table());
        assert_eq!(notice.level, NotificationLevel::Warning);
        assert_eq!(notice.message, ErrorCode::NoActiveTable.message());

        let notice = Notice::from(&AppError::new(ErrorCode::NetworkError));
        assert_eq!(notice.level, NotificationLevel::Error);
    }

    #[test]
    fn test_level_display() {
        assert_eq!(NotificationLevel::Success.to_string(), "success");
    }
}
