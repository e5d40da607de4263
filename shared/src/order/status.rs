//! Order status projection
//!
//! Backend status codes are lowercase Spanish words; the UI shows a fixed
//! label for each. Anything the client does not recognise passes through
//! unchanged in both directions.

use crate::models::OrderRecord;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// Known order status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OrderStatus {
    Pendiente,
    Preparando,
    Listo,
    Entregado,
    Cancelado,
}

impl OrderStatus {
    pub const ALL: [OrderStatus; 5] = [
        Self::Pendiente,
        Self::Preparando,
        Self::Listo,
        Self::Entregado,
        Self::Cancelado,
    ];

    /// Backend code
    pub const fn code(&self) -> &'static str {
        match self {
            Self::Pendiente => "pendiente",
            Self::Preparando => "preparando",
            Self::Listo => "listo",
            Self::Entregado => "entregado",
            Self::Cancelado => "cancelado",
        }
    }

    /// Display label
    pub const fn label(&self) -> &'static str {
        match self {
            Self::Pendiente => "Pendiente",
            Self::Preparando => "En Preparación",
            Self::Listo => "Listo",
            Self::Entregado => "Entregado",
            Self::Cancelado => "Cancelado",
        }
    }

    pub fn from_code(code: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|s| s.code() == code)
    }

    pub fn from_label(label: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|s| s.label() == label)
    }

    /// Final states accept no further transitions in the UI
    pub fn is_final(&self) -> bool {
        matches!(self, Self::Entregado | Self::Cancelado)
    }
}

impl fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Backend code → display label; unknown codes are returned as-is
pub fn to_display(code: &str) -> String {
    OrderStatus::from_code(code)
        .map(|s| s.label().to_string())
        .unwrap_or_else(|| code.to_string())
}

/// Display label → backend code; unknown labels are returned as-is
pub fn to_backend(label: &str) -> String {
    OrderStatus::from_label(label)
        .map(|s| s.code().to_string())
        .unwrap_or_else(|| label.to_string())
}

/// Order list filter state
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum StatusFilter {
    #[default]
    All,
    /// Exact match against the backend `estado`
    Code(String),
}

impl StatusFilter {
    /// `"all"` selects everything; any other value is a backend code
    pub fn parse(raw: &str) -> Self {
        if raw == "all" {
            Self::All
        } else {
            Self::Code(raw.to_string())
        }
    }

    pub fn matches(&self, order: &OrderRecord) -> bool {
        match self {
            Self::All => true,
            Self::Code(code) => order.estado == *code,
        }
    }

    /// Orders selected by this filter, in input order
    pub fn apply<'a>(&self, orders: &'a [OrderRecord]) -> Vec<&'a OrderRecord> {
        orders.iter().filter(|o| self.matches(o)).collect()
    }
}

impl fmt::Display for StatusFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::All => f.write_str("all"),
            Self::Code(code) => f.write_str(code),
        }
    }
}

/// Per-status badge counts
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct StatusCounts {
    pub total: usize,
    /// Keyed by backend code, unknown codes included
    pub by_code: BTreeMap<String, usize>,
}

impl StatusCounts {
    /// Count over the full, unfiltered list
    pub fn from_orders(orders: &[OrderRecord]) -> Self {
        let mut by_code = BTreeMap::new();
        for order in orders {
            *by_code.entry(order.estado.clone()).or_insert(0) += 1;
        }
        Self {
            total: orders.len(),
            by_code,
        }
    }

    pub fn get(&self, status: OrderStatus) -> usize {
        self.by_code.get(status.code()).copied().unwrap_or(0)
    }
}

/// Order record with its display label attached
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct OrderView {
    #[serde(flatten)]
    pub record: OrderRecord,
    /// Display label; never sent back to the backend
    pub status: String,
}

impl OrderView {
    pub fn project(record: OrderRecord) -> Self {
        let status = to_display(&record.estado);
        Self { record, status }
    }

    /// Backend code for a status change picked from a display label
    pub fn status_code_for(label: &str) -> String {
        to_backend(label)
    }
}
