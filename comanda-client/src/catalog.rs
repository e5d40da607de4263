//! Catalog loading
//!
//! Fetch failures never reach the caller: the menu simply shows nothing and
//! the error is logged.

use crate::HttpClient;
use shared::models::Category;
use shared::Catalog;

/// Loads and normalizes the product catalog
#[derive(Debug, Clone)]
pub struct CatalogService {
    http: HttpClient,
}

impl CatalogService {
    pub fn new(http: HttpClient) -> Self {
        Self { http }
    }

    /// Public menu; empty on any failure
    pub async fn load(&self) -> Catalog {
        match self.http.fetch_public_products().await {
            Ok(products) => {
                let catalog = Catalog::from_products(&products);
                tracing::info!(
                    products = products.len(),
                    recipes = catalog.len(),
                    "Catalog loaded"
                );
                catalog
            }
            Err(e) => {
                tracing::error!(error = %e, "Failed to load catalog");
                Catalog::default()
            }
        }
    }

    /// Products of one type; empty on any failure
    pub async fn load_type(&self, tipo: &str) -> Catalog {
        match self.http.fetch_products_by_type(tipo).await {
            Ok(products) => Catalog::from_products(&products),
            Err(e) => {
                tracing::error!(tipo, error = %e, "Failed to load products by type");
                Catalog::default()
            }
        }
    }

    /// Active categories; empty on any failure
    pub async fn categories(&self) -> Vec<Category> {
        match self.http.fetch_active_categories().await {
            Ok(categories) => categories.into_iter().filter(|c| c.activa).collect(),
            Err(e) => {
                tracing::error!(error = %e, "Failed to load categories");
                Vec::new()
            }
        }
    }
}
