//! Shared types for the Comanda ordering client
//!
//! Catalog, cart, order and status types used by the client crate and by
//! anything that renders or submits orders. Everything here is pure: no I/O,
//! no clocks except where a timestamp is explicitly requested.

pub mod cart;
pub mod catalog;
pub mod error;
pub mod message;
pub mod models;
pub mod order;
pub mod response;
pub mod util;

// Re-exports
pub use serde::{Deserialize, Serialize};

pub use cart::{Addition, Cart, CartChange, CartLine, SecondFlavor, TableContext, TableOrder};
pub use catalog::{Catalog, Recipe, RecipeId};
pub use error::{AppError, AppResult, ErrorCode};
pub use message::ShopMessage;
pub use order::{OrderItem, OrderStatus, OrderSubmission, OrderView, StatusCounts, StatusFilter};
