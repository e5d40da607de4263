//! Category Model

use serde::{Deserialize, Serialize};

/// Category entity as served by `/api/categorias-activas`
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Category {
    pub id: i64,
    pub nombre: String,
    #[serde(default)]
    pub descripcion: Option<String>,
    #[serde(default = "default_true")]
    pub activa: bool,
}

fn default_true() -> bool {
    true
}
