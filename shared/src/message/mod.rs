//! Cross-context message types
//!
//! Messages exchanged between open views of the same client (admin panel,
//! order screen, delivery form). They are JSON objects tagged by `type`, the
//! same shape the admin panel posts when it changes the delivery fee:
//!
//! ```json
//! { "type": "actualizar_precio_domicilio", "precio": 3500 }
//! ```

use serde::{Deserialize, Serialize};

pub mod payload;
pub use payload::*;

/// Message carried on the in-process channel
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum ShopMessage {
    /// Delivery fee changed in another view
    #[serde(rename = "actualizar_precio_domicilio")]
    DeliveryPriceUpdated { precio: f64 },
    /// Pending orders appeared that were not there on the previous check
    #[serde(rename = "nuevos_pedidos")]
    NewOrders { ids: Vec<i64> },
    /// User-facing notice (toast)
    #[serde(rename = "aviso")]
    Notice(Notice),
}

impl ShopMessage {
    pub fn delivery_price(precio: f64) -> Self {
        Self::DeliveryPriceUpdated { precio }
    }

    /// Message type tag as it appears on the wire
    pub fn kind(&self) -> &'static str {
        match self {
            Self::DeliveryPriceUpdated { .. } => "actualizar_precio_domicilio",
            Self::NewOrders { .. } => "nuevos_pedidos",
            Self::Notice(_) => "aviso",
        }
    }
}
