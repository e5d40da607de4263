//! Table context and per-table order snapshot

use super::{Cart, CartLine};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Literal sent as `mesa` for orders that are not bound to a table
pub const TO_GO_SENTINEL: &str = "para-llevar";

/// Who the current order is for
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TableContext {
    /// Dine-in table number
    Table(u32),
    /// Counter / to-go order without a customer name
    ToGo,
    /// Delivery order, identified by the customer's name
    Customer(String),
}

impl TableContext {
    /// Interpret the raw value the UI holds for "current table"
    ///
    /// Digits are a table number, the to-go sentinel is a to-go order, and
    /// any other non-blank text is a customer name.
    pub fn parse(raw: &str) -> Option<Self> {
        let raw = raw.trim();
        if raw.is_empty() {
            return None;
        }
        if let Ok(number) = raw.parse::<u32>() {
            return Some(Self::Table(number));
        }
        if raw.eq_ignore_ascii_case(TO_GO_SENTINEL) {
            return Some(Self::ToGo);
        }
        Some(Self::Customer(raw.to_string()))
    }

    /// Value for the `mesa` field of an order submission
    pub fn mesa(&self) -> String {
        match self {
            Self::Table(number) => number.to_string(),
            Self::ToGo | Self::Customer(_) => TO_GO_SENTINEL.to_string(),
        }
    }

    /// Value for the `cliente_nombre` field of an order submission
    pub fn cliente_nombre(&self) -> &str {
        match self {
            Self::Customer(name) => name,
            Self::Table(_) | Self::ToGo => "",
        }
    }

    pub fn is_table(&self) -> bool {
        matches!(self, Self::Table(_))
    }
}

impl fmt::Display for TableContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Table(number) => write!(f, "Mesa {}", number),
            Self::ToGo => write!(f, "Para llevar"),
            Self::Customer(name) => write!(f, "Domicilio: {}", name),
        }
    }
}

/// Table order status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum TableOrderStatus {
    /// Started, nothing added yet (or everything removed)
    #[default]
    Empty,
    /// Has at least one line
    Active,
}

/// Per-table snapshot of the cart and its total
///
/// Lives only in memory for the duration of the session.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TableOrder {
    pub cart: Vec<CartLine>,
    pub status: TableOrderStatus,
    pub total: f64,
    /// Unix millis
    pub created_at: i64,
}

impl TableOrder {
    pub fn new(created_at: i64) -> Self {
        Self {
            cart: Vec::new(),
            status: TableOrderStatus::Empty,
            total: 0.0,
            created_at,
        }
    }

    /// Copy the cart's lines and a freshly computed total
    pub fn sync(&mut self, cart: &Cart) {
        self.cart = cart.lines().to_vec();
        self.total = cart.total();
        self.status = if cart.is_empty() {
            TableOrderStatus::Empty
        } else {
            TableOrderStatus::Active
        };
    }

    /// Rebuild a cart from this snapshot
    pub fn to_cart(&self) -> Cart {
        Cart::from_lines(self.cart.clone())
    }
}
