//! Order Model

use crate::cart::money::{apply_discount, to_decimal, to_f64};
use crate::util::lenient;
use serde::{Deserialize, Serialize};

/// Order record as returned by `GET /api/orders` and `GET /api/orders/{id}`
///
/// `estado` is the raw backend status code; it is kept as a string so codes
/// the client does not know about survive a round trip unchanged.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct OrderRecord {
    pub id: i64,
    pub estado: String,
    #[serde(default, deserialize_with = "mesa_as_string")]
    pub mesa: Option<String>,
    #[serde(default)]
    pub tipo_pedido: Option<String>,
    #[serde(default)]
    pub cliente_nombre: Option<String>,
    #[serde(default)]
    pub telefono_cliente: Option<String>,
    #[serde(default)]
    pub direccion_entrega: Option<String>,
    #[serde(default)]
    pub items: Vec<OrderRecordItem>,
    #[serde(default, deserialize_with = "lenient::f64_or_zero")]
    pub total_precio: f64,
    #[serde(default, deserialize_with = "lenient::opt_f64")]
    pub total_con_descuento: Option<f64>,
    #[serde(default, deserialize_with = "lenient::opt_f64")]
    pub descuento_porcentaje: Option<f64>,
    #[serde(default)]
    pub fecha: String,
}

impl OrderRecord {
    /// Amount the customer actually pays
    ///
    /// `total_con_descuento` wins when the backend sent it; otherwise the
    /// discount percentage is applied to `total_precio`.
    pub fn effective_total(&self) -> f64 {
        if let Some(total) = self.total_con_descuento {
            return total;
        }
        match self.descuento_porcentaje {
            Some(percent) if percent > 0.0 => {
                to_f64(apply_discount(to_decimal(self.total_precio), to_decimal(percent)))
            }
            _ => self.total_precio,
        }
    }

    /// Delivery or to-go orders carry no table number
    pub fn is_delivery(&self) -> bool {
        self.tipo_pedido
            .as_deref()
            .is_some_and(|t| t.eq_ignore_ascii_case("domicilio"))
    }

    /// Total number of units across all items
    pub fn unit_count(&self) -> u32 {
        self.items.iter().map(|i| i.quantity).sum()
    }
}

/// One item of a stored order
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct OrderRecordItem {
    #[serde(default)]
    pub product_id: Option<i64>,
    #[serde(default)]
    pub size_id: Option<i64>,
    #[serde(default)]
    pub producto_nombre: Option<String>,
    #[serde(default)]
    pub tamano_nombre: Option<String>,
    #[serde(default = "default_quantity")]
    pub quantity: u32,
    #[serde(default, deserialize_with = "lenient::f64_or_zero")]
    pub unit_price: f64,
    #[serde(default)]
    pub additions: Vec<serde_json::Value>,
}

fn default_quantity() -> u32 {
    1
}

/// Tables arrive as numbers from some endpoints and as strings from others
fn mesa_as_string<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let value = Option::<serde_json::Value>::deserialize(deserializer)?;
    Ok(match value {
        Some(serde_json::Value::String(s)) => Some(s),
        Some(serde_json::Value::Number(n)) => Some(n.to_string()),
        _ => None,
    })
}
