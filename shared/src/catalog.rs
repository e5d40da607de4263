//! Catalog normalization
//!
//! Turns the backend's product list (flat-priced and size-priced products
//! mixed together) into one flat list of purchasable [`Recipe`]s, one per
//! product × price tier.

use crate::models::{Price, Product};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;

/// Size label used when a product or tier has none
pub const SINGLE_SIZE: &str = "única";

/// Separator between product id and price id in textual recipe ids
pub const ID_SEPARATOR: char = '_';

/// Product id substituted when nothing else resolves.
///
/// Kept for compatibility with the order API; an unresolved line is sent as
/// this product instead of being rejected.
pub const DEFAULT_PRODUCT_ID: i64 = 1;

/// Identity of a purchasable unit: a product, optionally narrowed to a
/// price tier. Rendered as `"{product_id}_{size_id}"` or `"{product_id}"`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RecipeId {
    pub product_id: i64,
    pub size_id: Option<i64>,
}

impl RecipeId {
    pub fn new(product_id: i64, size_id: Option<i64>) -> Self {
        Self {
            product_id,
            size_id,
        }
    }

    /// Strict parse of the textual form. `None` if either part is not an
    /// integer. A size of 0 means "no size".
    pub fn parse(raw: &str) -> Option<Self> {
        let raw = raw.trim();
        match raw.split_once(ID_SEPARATOR) {
            Some((product, size)) => {
                let product_id = product.trim().parse().ok()?;
                let size_id = size.trim().parse::<i64>().ok()?;
                Some(Self::new(product_id, Some(size_id).filter(|s| *s != 0)))
            }
            None => raw.parse().ok().map(|id| Self::new(id, None)),
        }
    }

    /// Lossy resolution for ids that arrive without catalog enrichment.
    ///
    /// Steps, each tried only if the previous one produced nothing:
    /// 1. split on `_` into product and size (size 0 or unparseable ⇒ none)
    /// 2. the whole id as a bare product id
    /// 3. [`DEFAULT_PRODUCT_ID`] with no size
    pub fn resolve_lossy(raw: &str) -> Self {
        let raw = raw.trim();
        if let Some((product, size)) = raw.split_once(ID_SEPARATOR) {
            if let Ok(product_id) = product.trim().parse::<i64>() {
                let size_id = size.trim().parse::<i64>().ok().filter(|s| *s != 0);
                return Self::new(product_id, size_id);
            }
        }
        if let Ok(product_id) = raw.parse::<i64>() {
            return Self::new(product_id, None);
        }
        tracing::warn!(
            raw_id = raw,
            fallback = DEFAULT_PRODUCT_ID,
            "Unresolvable product id, using default product"
        );
        Self::new(DEFAULT_PRODUCT_ID, None)
    }
}

impl fmt::Display for RecipeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.size_id {
            Some(size) => write!(f, "{}{}{}", self.product_id, ID_SEPARATOR, size),
            None => write!(f, "{}", self.product_id),
        }
    }
}

/// Normalized purchasable catalog entry
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Recipe {
    /// Textual id, `"{product_id}_{price_id}"` or `"{product_id}"`
    pub id: String,
    pub key: RecipeId,
    pub product_id: i64,
    pub name: String,
    pub description: String,
    pub size: String,
    /// Always finite and non-negative
    pub sale_price: f64,
    pub category: String,
    pub image_url: String,
    pub permite_dos_sabores: bool,
}

impl Recipe {
    fn from_tier(product: &Product, price: &Price) -> Self {
        let key = RecipeId::new(product.id, Some(price.id));
        let size = price
            .tamano_nombre
            .as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .unwrap_or(SINGLE_SIZE);
        Self::build(product, key, size.to_string(), price.amount())
    }

    fn from_flat(product: &Product) -> Self {
        let price = product
            .precio_base
            .filter(|p| p.is_finite() && *p >= 0.0)
            .unwrap_or(0.0);
        Self::build(
            product,
            RecipeId::new(product.id, None),
            SINGLE_SIZE.to_string(),
            price,
        )
    }

    fn build(product: &Product, key: RecipeId, size: String, sale_price: f64) -> Self {
        Self {
            id: key.to_string(),
            key,
            product_id: product.id,
            name: product.nombre.clone(),
            description: product.descripcion.clone(),
            size,
            sale_price,
            category: product.categoria_nombre.clone(),
            image_url: product.imagen_url.clone(),
            permite_dos_sabores: product.permite_dos_sabores,
        }
    }
}

/// Expand products into recipes, one per price tier (or one per flat product)
pub fn normalize(products: &[Product]) -> Vec<Recipe> {
    products
        .iter()
        .flat_map(|product| {
            if product.is_size_priced() {
                product
                    .precios
                    .iter()
                    .map(|price| Recipe::from_tier(product, price))
                    .collect::<Vec<_>>()
            } else {
                vec![Recipe::from_flat(product)]
            }
        })
        .collect()
}

/// Normalized catalog with id lookup
///
/// An empty catalog is a valid state (nothing to show, or the fetch failed).
#[derive(Debug, Clone, Default)]
pub struct Catalog {
    recipes: Vec<Recipe>,
    index: HashMap<String, usize>,
}

impl Catalog {
    pub fn from_products(products: &[Product]) -> Self {
        Self::from_recipes(normalize(products))
    }

    pub fn from_recipes(recipes: Vec<Recipe>) -> Self {
        let mut index = HashMap::with_capacity(recipes.len());
        for (pos, recipe) in recipes.iter().enumerate() {
            // First occurrence wins on duplicate ids
            index.entry(recipe.id.clone()).or_insert(pos);
        }
        Self { recipes, index }
    }

    pub fn get(&self, id: &str) -> Option<&Recipe> {
        self.index.get(id).map(|&pos| &self.recipes[pos])
    }

    pub fn recipes(&self) -> &[Recipe] {
        &self.recipes
    }

    pub fn len(&self) -> usize {
        self.recipes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.recipes.is_empty()
    }

    /// All tiers of one product, in catalog order
    pub fn tiers_of(&self, product_id: i64) -> Vec<&Recipe> {
        self.recipes
            .iter()
            .filter(|r| r.product_id == product_id)
            .collect()
    }

    /// Recipes grouped by category name, categories in first-seen order
    pub fn by_category(&self) -> Vec<(&str, Vec<&Recipe>)> {
        let mut groups: Vec<(&str, Vec<&Recipe>)> = Vec::new();
        for recipe in &self.recipes {
            match groups.iter_mut().find(|(name, _)| *name == recipe.category) {
                Some((_, list)) => list.push(recipe),
                None => groups.push((recipe.category.as_str(), vec![recipe])),
            }
        }
        groups
    }
}
