//! Unified error system for the ordering client
//!
//! - [`ErrorCode`]: numeric error codes grouped by domain
//! - [`ErrorCategory`]: classification derived from the code range
//! - [`AppError`]: error value carrying a code, a message and optional details
//!
//! # Error Code Ranges
//!
//! - 0xxx: General errors
//! - 4xxx: Order errors (cart, checkout, status changes)
//! - 6xxx: Product and upload errors
//! - 7xxx: Table errors
//! - 9xxx: System errors
//!
//! # Example
//!
//! ```
//! use shared::error::{AppError, ErrorCode};
//!
//! let err = AppError::new(ErrorCode::OrderEmpty);
//! assert_eq!(err.message, "Cart is empty");
//!
//! let err = AppError::not_found("Addition").with_detail("addition_index", 2);
//! assert_eq!(err.code, ErrorCode::NotFound);
//! ```

mod category;
mod codes;
mod types;

pub use category::ErrorCategory;
pub use codes::{ErrorCode, InvalidErrorCode};
pub use types::{AppError, AppResult};
