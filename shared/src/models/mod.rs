//! Data models
//!
//! Read-only shapes returned by the ordering API. Field names follow the
//! backend's JSON (Spanish) so they deserialize without renames.

pub mod category;
pub mod order;
pub mod product;

// Re-exports
pub use category::*;
pub use order::*;
pub use product::*;
