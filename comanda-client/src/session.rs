//! Ordering session
//!
//! Owns the active table context, the cart being composed for it and the
//! per-table snapshots. Every cart mutation goes through here so the
//! snapshot of the active table is re-synced in the same call.

use crate::{ClientResult, HttpClient};
use shared::cart::{Addition, Cart, CartChange, TableContext, TableOrder};
use shared::error::{AppError, AppResult, ErrorCode};
use shared::message::Notice;
use shared::models::OrderRecord;
use shared::order::{DeliveryDetails, OrderSubmission};
use shared::Catalog;
use std::collections::HashMap;

/// Ordering session state
#[derive(Debug, Default)]
pub struct Session {
    catalog: Catalog,
    active: Option<TableContext>,
    cart: Cart,
    table_orders: HashMap<TableContext, TableOrder>,
}

impl Session {
    pub fn new(catalog: Catalog) -> Self {
        Self {
            catalog,
            ..Self::default()
        }
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    /// Replace the catalog; lines already in carts keep their data
    pub fn set_catalog(&mut self, catalog: Catalog) {
        self.catalog = catalog;
    }

    pub fn active(&self) -> Option<&TableContext> {
        self.active.as_ref()
    }

    pub fn cart(&self) -> &Cart {
        &self.cart
    }

    pub fn table_order(&self, context: &TableContext) -> Option<&TableOrder> {
        self.table_orders.get(context)
    }

    /// Tables with an open snapshot
    pub fn open_tables(&self) -> impl Iterator<Item = (&TableContext, &TableOrder)> {
        self.table_orders.iter()
    }

    /// Make `context` the active table and load its cart
    ///
    /// The snapshot is created on first use.
    pub fn start_order(&mut self, context: TableContext) -> &TableOrder {
        let order = self
            .table_orders
            .entry(context.clone())
            .or_insert_with(|| TableOrder::new(shared::util::now_millis()));
        self.cart = order.to_cart();
        tracing::debug!(table = %context, lines = self.cart.len(), "Order started");
        self.active = Some(context);
        order
    }

    /// Same as [`Session::start_order`] from the raw UI value
    pub fn start_order_raw(&mut self, raw: &str) -> AppResult<&TableOrder> {
        let context = TableContext::parse(raw).ok_or_else(|| {
            AppError::new(ErrorCode::RequiredField).with_detail("field", "mesa")
        })?;
        Ok(self.start_order(context))
    }

    fn require_active(&self) -> AppResult<&TableContext> {
        self.active.as_ref().ok_or_else(AppError::no_active_table)
    }

    fn sync_active(&mut self) {
        if let Some(context) = &self.active {
            let order = self
                .table_orders
                .entry(context.clone())
                .or_insert_with(|| TableOrder::new(shared::util::now_millis()));
            order.sync(&self.cart);
        }
    }

    /// Add one unit of `recipe_id` to the active table's cart
    pub fn add_line(&mut self, recipe_id: &str, name: &str, price: f64) -> AppResult<CartChange> {
        self.require_active()?;
        let change = self
            .cart
            .add_line(self.catalog.get(recipe_id), recipe_id, name, price)?;
        self.sync_active();
        Ok(change)
    }

    /// Add one unit of a catalog recipe, using its name and price
    pub fn add_recipe(&mut self, recipe_id: &str) -> AppResult<CartChange> {
        self.require_active()?;
        let recipe = self.catalog.get(recipe_id).ok_or_else(|| {
            AppError::new(ErrorCode::ProductNotFound).with_detail("recipe_id", recipe_id)
        })?;
        let label = format!("{} ({})", recipe.name, recipe.size);
        let (id, price) = (recipe.id.clone(), recipe.sale_price);
        self.add_line(&id, &label, price)
    }

    pub fn update_quantity(&mut self, index: usize, quantity: i64) -> AppResult<CartChange> {
        self.require_active()?;
        let change = self.cart.update_quantity(index, quantity)?;
        self.sync_active();
        Ok(change)
    }

    pub fn remove_line(&mut self, index: usize) -> AppResult<CartChange> {
        self.require_active()?;
        let change = self.cart.remove_line(index)?;
        self.sync_active();
        Ok(change)
    }

    pub fn add_addition(&mut self, index: usize, addition: Addition) -> AppResult<CartChange> {
        self.require_active()?;
        let change = self.cart.add_addition(index, addition)?;
        self.sync_active();
        Ok(change)
    }

    pub fn remove_addition(&mut self, index: usize, addition_index: usize) -> AppResult<CartChange> {
        self.require_active()?;
        let change = self.cart.remove_addition(index, addition_index)?;
        self.sync_active();
        Ok(change)
    }

    /// Pick the second flavor of line `index` from the catalog
    pub fn set_second_flavor(&mut self, index: usize, flavor_id: &str) -> AppResult<CartChange> {
        self.require_active()?;
        let flavor = self.catalog.get(flavor_id).ok_or_else(|| {
            AppError::new(ErrorCode::ProductNotFound).with_detail("recipe_id", flavor_id)
        })?;
        let change = self.cart.set_second_flavor(index, flavor)?;
        self.sync_active();
        Ok(change)
    }

    pub fn clear_second_flavor(&mut self, index: usize) -> AppResult<CartChange> {
        self.require_active()?;
        let change = self.cart.clear_second_flavor(index)?;
        self.sync_active();
        Ok(change)
    }

    pub fn total(&self) -> f64 {
        self.cart.total()
    }

    pub fn total_with_discount(&self, percent: f64) -> f64 {
        self.cart.total_with_discount(percent)
    }

    /// Validate the cart and assemble the order payload
    pub fn prepare_submission(&self, delivery: Option<DeliveryDetails>) -> AppResult<OrderSubmission> {
        if self.cart.is_empty() {
            return Err(AppError::empty_cart());
        }
        let context = self.require_active()?;
        Ok(match delivery {
            Some(delivery) => OrderSubmission::build_delivery(&self.cart, context, delivery),
            None => OrderSubmission::build(&self.cart, context),
        })
    }

    /// Submit the active table's order
    ///
    /// On success the cart is emptied and the table's snapshot dropped. On
    /// failure nothing changes so the user can retry.
    pub async fn checkout(
        &mut self,
        http: &HttpClient,
        delivery: Option<DeliveryDetails>,
    ) -> ClientResult<Option<OrderRecord>> {
        let submission = self.prepare_submission(delivery)?;
        let created = match http.create_order(&submission).await {
            Ok(created) => created,
            Err(e) => {
                tracing::error!(mesa = %submission.mesa, error = %e, "Order submission failed");
                return Err(e);
            }
        };
        tracing::info!(
            mesa = %submission.mesa,
            items = submission.items.len(),
            total = submission.total_precio,
            order_id = ?created.as_ref().map(|o| o.id),
            "Order submitted"
        );
        self.complete_checkout();
        Ok(created)
    }

    fn complete_checkout(&mut self) {
        self.cart.clear();
        if let Some(context) = &self.active {
            self.table_orders.remove(context);
        }
    }
}

/// User-facing notice for a cart change, when the UI shows one
pub fn notice_for(change: &CartChange) -> Option<Notice> {
    match change {
        CartChange::Added { .. } => Some(Notice::success("Producto agregado")),
        CartChange::Emptied => Some(Notice::info("El carrito está vacío")),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use shared::models::Product;
    use shared::order::OrderItem;

    fn catalog() -> Catalog {
        let products: Vec<Product> = serde_json::from_value(serde_json::json!([
            {
                "id": 5,
                "nombre": "Pizza Hawaiana",
                "permite_dos_sabores": true,
                "precios": [
                    {"id": 12, "tamano_nombre": "Mediana", "precio": "32000"},
                    {"id": 13, "tamano_nombre": "Grande", "precio": "45000"}
                ]
            },
            {
                "id": 6,
                "nombre": "Pizza Pollo",
                "permite_dos_sabores": true,
                "precios": [{"id": 14, "tamano_nombre": "Mediana", "precio": "36000"}]
            },
            {"id": 9, "nombre": "Gaseosa", "precio_base": 4000}
        ]))
        .unwrap();
        Catalog::from_products(&products)
    }

    #[test]
    fn test_mutations_require_active_table() {
        let mut session = Session::new(catalog());
        let err = session.add_line("9", "Gaseosa", 4000.0).unwrap_err();
        assert_eq!(err.code, ErrorCode::NoActiveTable);
        assert!(session.cart().is_empty());
    }

    #[test]
    fn test_add_syncs_table_order() {
        let mut session = Session::new(catalog());
        session.start_order(TableContext::Table(4));
        session.add_line("5_12", "Pizza Hawaiana", 32000.0).unwrap();
        session.add_line("9", "Gaseosa", 4000.0).unwrap();
        session.add_line("9", "Gaseosa", 4000.0).unwrap();

        let order = session.table_order(&TableContext::Table(4)).unwrap();
        assert_eq!(order.cart.len(), 2);
        assert_eq!(order.total, 40000.0);
        assert_eq!(order.total, session.total());
    }

    #[test]
    fn test_switching_tables_keeps_carts() {
        let mut session = Session::new(catalog());
        session.start_order(TableContext::Table(1));
        session.add_recipe("9").unwrap();

        session.start_order_raw("para-llevar").unwrap();
        assert!(session.cart().is_empty());
        session.add_recipe("5_13").unwrap();

        session.start_order(TableContext::Table(1));
        assert_eq!(session.cart().len(), 1);
        assert_eq!(session.cart().lines()[0].id, "9");
        assert_eq!(session.open_tables().count(), 2);
    }

    #[test]
    fn test_start_order_raw_rejects_blank() {
        let mut session = Session::default();
        let err = session.start_order_raw("  ").unwrap_err();
        assert_eq!(err.code, ErrorCode::RequiredField);
        assert!(session.active().is_none());
    }

    #[test]
    fn test_remove_last_line_empties() {
        let mut session = Session::new(catalog());
        session.start_order(TableContext::Table(2));
        session.add_recipe("9").unwrap();
        let change = session.update_quantity(0, 0).unwrap();
        assert_eq!(change, CartChange::Emptied);
        assert!(notice_for(&change).is_some());

        let order = session.table_order(&TableContext::Table(2)).unwrap();
        assert!(order.cart.is_empty());
        assert_eq!(order.total, 0.0);
    }

    #[test]
    fn test_second_flavor_through_catalog() {
        let mut session = Session::new(catalog());
        session.start_order(TableContext::Table(3));
        session.add_recipe("5_12").unwrap();
        session.set_second_flavor(0, "6_14").unwrap();
        assert_eq!(session.total(), 36000.0);

        let err = session.set_second_flavor(0, "99").unwrap_err();
        assert_eq!(err.code, ErrorCode::ProductNotFound);
        let err = session.set_second_flavor(0, "9").unwrap_err();
        assert_eq!(err.code, ErrorCode::SecondFlavorNotAllowed);
    }

    #[test]
    fn test_prepare_submission() {
        let mut session = Session::new(catalog());
        assert_eq!(
            session.prepare_submission(None).unwrap_err().code,
            ErrorCode::OrderEmpty
        );

        session.start_order(TableContext::Table(7));
        session.add_recipe("5_12").unwrap();
        session
            .add_addition(0, Addition::new("Extra queso", 4000.0))
            .unwrap();

        let submission = session.prepare_submission(None).unwrap();
        assert_eq!(submission.mesa, "7");
        assert_eq!(submission.total_precio, 36000.0);
        assert_eq!(
            submission.items,
            vec![OrderItem {
                product_id: 5,
                size_id: Some(12),
                quantity: 1,
                unit_price: 36000.0,
                additions: vec![Addition::new("Extra queso", 4000.0)],
            }]
        );
    }

    #[test]
    fn test_prepare_delivery_submission() {
        let mut session = Session::new(catalog());
        session.start_order_raw("Ana Gómez").unwrap();
        session.add_recipe("9").unwrap();

        let submission = session
            .prepare_submission(Some(DeliveryDetails {
                telefono: Some("3001234567".to_string()),
                direccion: Some("Calle 10 # 5-20".to_string()),
                precio_domicilio: Some(3000.0),
            }))
            .unwrap();
        assert_eq!(submission.cliente_nombre, "Ana Gómez");
        assert_eq!(submission.mesa, "para-llevar");
        assert_eq!(submission.precio_domicilio, Some(3000.0));
        assert_eq!(submission.total_precio, 4000.0);
    }

    #[test]
    fn test_complete_checkout_drops_table_order() {
        let mut session = Session::new(catalog());
        session.start_order(TableContext::Table(8));
        session.add_recipe("9").unwrap();
        session.complete_checkout();
        assert!(session.cart().is_empty());
        assert!(session.table_order(&TableContext::Table(8)).is_none());
        assert_eq!(session.active(), Some(&TableContext::Table(8)));
    }
}
