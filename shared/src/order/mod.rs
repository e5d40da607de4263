//! Order composition and status projection
//!
//! - [`submission`]: turns a cart plus table context into the payload for
//!   `POST /api/orders`
//! - [`status`]: maps backend status codes to display labels and back,
//!   filters and counts fetched orders

pub mod status;
pub mod submission;

// Re-exports
pub use status::{OrderStatus, OrderView, StatusCounts, StatusFilter};
pub use submission::{DeliveryDetails, OrderItem, OrderSubmission};
