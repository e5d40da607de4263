//! Product Model

use crate::util::lenient;
use serde::{Deserialize, Serialize};

/// Product entity as served by `/api/productos-publicos`
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Product {
    pub id: i64,
    pub nombre: String,
    #[serde(default)]
    pub descripcion: String,
    #[serde(default)]
    pub categoria_nombre: String,
    #[serde(default)]
    pub imagen_url: String,
    /// Price for products without size tiers
    #[serde(default, deserialize_with = "lenient::opt_f64")]
    pub precio_base: Option<f64>,
    /// Whether the product can be split into two flavors (half/half)
    #[serde(default)]
    pub permite_dos_sabores: bool,
    /// Size tiers; empty means the product is flat-priced
    #[serde(default, deserialize_with = "nullable_vec")]
    pub precios: Vec<Price>,
}

impl Product {
    /// Whether the product is priced per size tier
    pub fn is_size_priced(&self) -> bool {
        !self.precios.is_empty()
    }
}

/// Price tier of a product
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Price {
    pub id: i64,
    #[serde(default)]
    pub tamano_id: Option<i64>,
    #[serde(default)]
    pub tamano_nombre: Option<String>,
    /// Raw price as sent by the backend, number or decimal string
    #[serde(default)]
    pub precio: serde_json::Value,
}

impl Price {
    /// Price as a non-negative number; a string without a leading number is 0
    pub fn amount(&self) -> f64 {
        let parsed = match &self.precio {
            serde_json::Value::Number(n) => n.as_f64(),
            serde_json::Value::String(s) => lenient::parse_f64(s),
            _ => None,
        };
        parsed.filter(|v| *v >= 0.0).unwrap_or(0.0)
    }
}

/// `null` and missing both mean "no tiers"
fn nullable_vec<'de, D, T>(deserializer: D) -> Result<Vec<T>, D::Error>
where
    D: serde::Deserializer<'de>,
    T: Deserialize<'de>,
{
    Ok(Option::<Vec<T>>::deserialize(deserializer)?.unwrap_or_default())
}
