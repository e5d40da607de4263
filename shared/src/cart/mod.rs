//! Cart model
//!
//! An ordered list of [`CartLine`]s, at most one per recipe id. Lines come
//! either from a catalog [`Recipe`] (enriched with product/size ids and the
//! catalog sale price) or from a bare id the UI handed over, in which case
//! the ids are recovered with [`RecipeId::resolve_lossy`].
//!
//! Totals are never cached: [`Cart::total`] recomputes from the lines.

pub mod money;
mod table;

pub use table::{TableContext, TableOrder, TableOrderStatus, TO_GO_SENTINEL};

use crate::catalog::{Recipe, RecipeId};
use crate::error::{AppError, AppResult, ErrorCode};
use money::{cart_total, saturating_add, to_decimal, to_f64};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Add-on attached to a cart line (extra cheese, sauce, ...)
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Addition {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<i64>,
    pub name: String,
    #[serde(default)]
    pub price: f64,
}

impl Addition {
    pub fn new(name: impl Into<String>, price: f64) -> Self {
        Self {
            id: None,
            name: name.into(),
            price,
        }
    }
}

/// Second half of a two-flavor line
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SecondFlavor {
    pub recipe_id: String,
    pub name: String,
    pub price: f64,
}

/// One line of the in-progress order
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CartLine {
    /// Recipe id (`"5_12"` or `"7"`)
    pub id: String,
    pub name: String,
    /// Unit price including add-ons and second flavor
    pub price: f64,
    /// Always ≥ 1 while the line exists
    pub quantity: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub product_id: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub size_id: Option<i64>,
    /// Catalog price, present when the line was built from a recipe
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sale_price: Option<f64>,
    #[serde(default)]
    pub adicionales: Vec<Addition>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub second_flavor: Option<SecondFlavor>,
    #[serde(default)]
    pub permite_dos_sabores: bool,
    /// Prices as first added, before extras
    #[serde(skip)]
    base_price: Option<f64>,
    #[serde(skip)]
    base_sale_price: Option<f64>,
}

impl CartLine {
    /// Line without catalog enrichment, as supplied by an external caller
    pub fn new(id: impl Into<String>, name: impl Into<String>, price: f64, quantity: u32) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            price,
            quantity: quantity.max(1),
            product_id: None,
            size_id: None,
            sale_price: None,
            adicionales: Vec::new(),
            second_flavor: None,
            permite_dos_sabores: false,
            base_price: Some(price),
            base_sale_price: None,
        }
    }

    fn from_recipe(recipe: &Recipe, id: &str, name: &str, price: f64) -> Self {
        Self {
            id: id.to_string(),
            name: name.to_string(),
            price,
            quantity: 1,
            product_id: Some(recipe.key.product_id),
            size_id: recipe.key.size_id,
            sale_price: Some(recipe.sale_price),
            adicionales: Vec::new(),
            second_flavor: None,
            permite_dos_sabores: recipe.permite_dos_sabores,
            base_price: Some(price),
            base_sale_price: Some(recipe.sale_price),
        }
    }

    fn from_raw_id(id: &str, name: &str, price: f64) -> Self {
        let key = RecipeId::resolve_lossy(id);
        Self {
            id: id.to_string(),
            name: name.to_string(),
            price,
            quantity: 1,
            product_id: Some(key.product_id),
            size_id: key.size_id,
            sale_price: None,
            adicionales: Vec::new(),
            second_flavor: None,
            permite_dos_sabores: false,
            base_price: Some(price),
            base_sale_price: None,
        }
    }

    /// Product/size identity, when known
    pub fn recipe_id(&self) -> Option<RecipeId> {
        self.product_id.map(|p| RecipeId::new(p, self.size_id))
    }

    /// `price × quantity`
    pub fn line_total(&self) -> f64 {
        to_f64(money::line_total(self))
    }

    fn extras(&self) -> Decimal {
        self.adicionales
            .iter()
            .map(|a| to_decimal(a.price))
            .fold(Decimal::ZERO, saturating_add)
    }

    /// Remember the pre-extras prices before the first add-on/flavor change.
    /// Lines that were deserialized carry no base, so it is derived from the
    /// current price minus the current add-ons.
    fn capture_base(&mut self) {
        if self.base_price.is_some() {
            return;
        }
        let extras = self.extras();
        self.base_price = Some(to_f64(saturating_add(to_decimal(self.price), -extras)));
        self.base_sale_price = self
            .sale_price
            .map(|s| to_f64(saturating_add(to_decimal(s), -extras)));
    }

    /// Recompute prices from the base price, the second flavor (the dearer
    /// half sets the price) and the add-ons
    fn reprice(&mut self) {
        let extras = self.extras();
        let flavor = self
            .second_flavor
            .as_ref()
            .map(|f| to_decimal(f.price))
            .unwrap_or(Decimal::ZERO);

        let base = to_decimal(self.base_price.unwrap_or(self.price));
        self.price = to_f64(saturating_add(base.max(flavor), extras));
        self.sale_price = self
            .base_sale_price
            .map(|base| to_f64(saturating_add(to_decimal(base).max(flavor), extras)));
    }
}

/// Outcome of a cart mutation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CartChange {
    /// A new line was appended at `index`
    Added { index: usize },
    /// The quantity of the line at `index` changed
    QuantityChanged { index: usize, quantity: u32 },
    /// The line at `index` was removed and other lines remain
    Removed { index: usize },
    /// The last line was removed
    Emptied,
    /// Add-ons or flavors of the line at `index` changed
    LineUpdated { index: usize },
}

/// In-progress order
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Cart {
    lines: Vec<CartLine>,
}

impl Cart {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_lines(lines: Vec<CartLine>) -> Self {
        Self { lines }
    }

    pub fn lines(&self) -> &[CartLine] {
        &self.lines
    }

    pub fn len(&self) -> usize {
        self.lines.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// Total number of units
    pub fn item_count(&self) -> u32 {
        self.lines.iter().map(|l| l.quantity).sum()
    }

    /// Add one unit of `id`
    ///
    /// An existing line with the same id gets its quantity bumped; otherwise
    /// a new line is appended. `recipe` is the catalog entry for `id`, when
    /// the caller found one. A line already at [`money::MAX_QUANTITY`] or a price
    /// above [`money::MAX_PRICE`] is rejected and the cart stays as it was.
    pub fn add_line(
        &mut self,
        recipe: Option<&Recipe>,
        id: &str,
        name: &str,
        price: f64,
    ) -> AppResult<CartChange> {
        if let Some(index) = self.lines.iter().position(|l| l.id == id) {
            let line = &mut self.lines[index];
            let quantity = money::require_quantity_in_range(u64::from(line.quantity) + 1)?;
            line.quantity = quantity;
            return Ok(CartChange::QuantityChanged { index, quantity });
        }

        if price.is_nan() || price < 0.0 {
            tracing::warn!(id, price, "Invalid line price, charging 0");
        }
        let price = if price.is_nan() { 0.0 } else { price.max(0.0) };
        money::require_price_in_range(price, "price")?;
        let line = match recipe {
            Some(recipe) => CartLine::from_recipe(recipe, id, name, price),
            None => {
                tracing::debug!(id, "Recipe not in catalog, deriving ids from raw id");
                CartLine::from_raw_id(id, name, price)
            }
        };
        self.lines.push(line);
        Ok(CartChange::Added {
            index: self.lines.len() - 1,
        })
    }

    /// Set the quantity of a line; zero or less removes it
    pub fn update_quantity(&mut self, index: usize, quantity: i64) -> AppResult<CartChange> {
        if index >= self.lines.len() {
            return Err(AppError::line_not_found(index));
        }
        if quantity <= 0 {
            return self.remove_line(index);
        }
        let quantity = money::require_quantity_in_range(quantity.unsigned_abs())?;
        self.lines[index].quantity = quantity;
        Ok(CartChange::QuantityChanged { index, quantity })
    }

    /// Remove a line by position
    pub fn remove_line(&mut self, index: usize) -> AppResult<CartChange> {
        if index >= self.lines.len() {
            return Err(AppError::line_not_found(index));
        }
        self.lines.remove(index);
        if self.lines.is_empty() {
            Ok(CartChange::Emptied)
        } else {
            Ok(CartChange::Removed { index })
        }
    }

    /// Attach an add-on; its price is added to the line's unit price
    pub fn add_addition(&mut self, index: usize, addition: Addition) -> AppResult<CartChange> {
        let line = self
            .lines
            .get_mut(index)
            .ok_or_else(|| AppError::line_not_found(index))?;
        if !addition.price.is_finite() || addition.price < 0.0 {
            return Err(AppError::new(ErrorCode::ProductInvalidPrice)
                .with_detail("addition", addition.name));
        }
        money::require_price_in_range(addition.price, "addition")?;
        line.capture_base();
        line.adicionales.push(addition);
        line.reprice();
        Ok(CartChange::LineUpdated { index })
    }

    /// Drop an add-on by its position within the line
    pub fn remove_addition(&mut self, index: usize, addition_index: usize) -> AppResult<CartChange> {
        let line = self
            .lines
            .get_mut(index)
            .ok_or_else(|| AppError::line_not_found(index))?;
        if addition_index >= line.adicionales.len() {
            return Err(AppError::not_found("Addition").with_detail("addition_index", addition_index));
        }
        line.capture_base();
        line.adicionales.remove(addition_index);
        line.reprice();
        Ok(CartChange::LineUpdated { index })
    }

    /// Pick the second flavor of a two-flavor line
    ///
    /// Both the line's product and `flavor` must allow two flavors. The line
    /// is charged at the dearer of the two halves.
    pub fn set_second_flavor(&mut self, index: usize, flavor: &Recipe) -> AppResult<CartChange> {
        let line = self
            .lines
            .get_mut(index)
            .ok_or_else(|| AppError::line_not_found(index))?;
        if !line.permite_dos_sabores || !flavor.permite_dos_sabores {
            return Err(AppError::new(ErrorCode::SecondFlavorNotAllowed)
                .with_detail("recipe_id", flavor.id.clone()));
        }
        money::require_price_in_range(flavor.sale_price, "second_flavor")?;
        line.capture_base();
        line.second_flavor = Some(SecondFlavor {
            recipe_id: flavor.id.clone(),
            name: flavor.name.clone(),
            price: flavor.sale_price,
        });
        line.reprice();
        Ok(CartChange::LineUpdated { index })
    }

    pub fn clear_second_flavor(&mut self, index: usize) -> AppResult<CartChange> {
        let line = self
            .lines
            .get_mut(index)
            .ok_or_else(|| AppError::line_not_found(index))?;
        line.capture_base();
        line.second_flavor = None;
        line.reprice();
        Ok(CartChange::LineUpdated { index })
    }

    /// Σ price × quantity, 0 for an empty cart
    pub fn total(&self) -> f64 {
        to_f64(cart_total(&self.lines))
    }

    /// Total after a percentage discount (clamped to 0–100)
    pub fn total_with_discount(&self, percent: f64) -> f64 {
        to_f64(money::apply_discount(
            cart_total(&self.lines),
            to_decimal(percent),
        ))
    }

    pub fn clear(&mut self) {
        self.lines.clear();
    }
}
