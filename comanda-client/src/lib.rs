//! Comanda Client - ordering client for the restaurant backend
//!
//! Wraps the REST API with typed calls and keeps the client-side state of an
//! ordering session: the cart per table, the order management board, the
//! delivery fee and the periodic refreshes.

pub mod catalog;
pub mod config;
pub mod delivery;
pub mod error;
pub mod http;
pub mod message;
pub mod orders;
pub mod poller;
pub mod session;

pub use catalog::CatalogService;
pub use config::ClientConfig;
pub use delivery::DeliveryPriceStore;
pub use error::{ClientError, ClientResult};
pub use http::{HttpClient, UploadKind, UploadedFile};
pub use message::MessageBus;
pub use orders::{NewOrderTracker, OrderBoard, RefreshTicket};
pub use poller::Poller;
pub use session::Session;

// Re-export shared types for convenience
pub use shared::{
    Addition, AppError, Cart, CartChange, CartLine, Catalog, OrderStatus, OrderSubmission,
    OrderView, Recipe, ShopMessage, StatusFilter, TableContext,
};
