//! Order submission payload

use crate::cart::{Addition, Cart, CartLine, TableContext};
use crate::catalog::RecipeId;
use serde::{Deserialize, Serialize};

/// Body of `POST /api/orders`
///
/// Built once at checkout from the cart and never modified afterwards.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct OrderSubmission {
    pub cliente_nombre: String,
    pub mesa: String,
    pub total_precio: f64,
    pub total_amount: f64,
    pub items: Vec<OrderItem>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub telefono_cliente: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub direccion_entrega: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub precio_domicilio: Option<f64>,
}

/// One item of an order submission
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct OrderItem {
    pub product_id: i64,
    /// Serialized as `null` when the product has no size tier
    pub size_id: Option<i64>,
    pub quantity: u32,
    pub unit_price: f64,
    pub additions: Vec<Addition>,
}

impl OrderItem {
    /// Map one cart line, resolving product/size ids
    ///
    /// Ids already on the line win. Otherwise the line's textual id goes
    /// through [`RecipeId::resolve_lossy`], which ends at the default
    /// product rather than failing.
    pub fn from_line(line: &CartLine) -> Self {
        let key = match line.product_id {
            Some(product_id) => RecipeId::new(product_id, line.size_id),
            None => RecipeId::resolve_lossy(&line.id),
        };
        Self {
            product_id: key.product_id,
            size_id: key.size_id,
            quantity: line.quantity,
            unit_price: line.sale_price.unwrap_or(line.price),
            additions: line.adicionales.clone(),
        }
    }
}

/// Contact data for delivery orders
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct DeliveryDetails {
    pub telefono: Option<String>,
    pub direccion: Option<String>,
    /// Delivery fee in effect when the order was placed
    pub precio_domicilio: Option<f64>,
}

impl OrderSubmission {
    /// Assemble the payload for `cart` ordered by `context`
    pub fn build(cart: &Cart, context: &TableContext) -> Self {
        let total = cart.total();
        Self {
            cliente_nombre: context.cliente_nombre().to_string(),
            mesa: context.mesa(),
            total_precio: total,
            total_amount: total,
            items: cart.lines().iter().map(OrderItem::from_line).collect(),
            telefono_cliente: None,
            direccion_entrega: None,
            precio_domicilio: None,
        }
    }

    /// Same as [`OrderSubmission::build`] plus delivery contact fields
    pub fn build_delivery(cart: &Cart, context: &TableContext, delivery: DeliveryDetails) -> Self {
        Self {
            telefono_cliente: delivery.telefono.filter(|t| !t.trim().is_empty()),
            direccion_entrega: delivery.direccion.filter(|d| !d.trim().is_empty()),
            precio_domicilio: delivery.precio_domicilio,
            ..Self::build(cart, context)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cart::TO_GO_SENTINEL;
    use crate::catalog::DEFAULT_PRODUCT_ID;

    fn cart_of(lines: Vec<CartLine>) -> Cart {
        Cart::from_lines(lines)
    }

    #[test]
    fn test_composite_id_resolves_product_and_size() {
        let item = OrderItem::from_line(&CartLine::new("5_12", "Hawaiana", 30000.0, 1));
        assert_eq!(item.product_id, 5);
        assert_eq!(item.size_id, Some(12));
        assert_eq!(item.unit_price, 30000.0);
        assert!(item.additions.is_empty());
    }

    #[test]
    fn test_bare_id_resolves_product_only() {
        let item = OrderItem::from_line(&CartLine::new("9", "Jugo", 8000.0, 1));
        assert_eq!(item.product_id, 9);
        assert_eq!(item.size_id, None);
    }

    #[test]
    fn test_zero_size_is_null() {
        let item = OrderItem::from_line(&CartLine::new("4_0", "Lasaña", 21000.0, 1));
        assert_eq!(item.product_id, 4);
        assert_eq!(item.size_id, None);
    }

    #[test]
    fn test_unresolvable_id_uses_default_product() {
        let item = OrderItem::from_line(&CartLine::new("combo", "Combo", 15000.0, 2));
        assert_eq!(item.product_id, DEFAULT_PRODUCT_ID);
        assert_eq!(item.size_id, None);
        assert_eq!(item.quantity, 2);
    }

    #[test]
    fn test_line_ids_take_precedence() {
        let mut line = CartLine::new("5_12", "Hawaiana", 30000.0, 1);
        line.product_id = Some(50);
        line.size_id = None;
        line.sale_price = Some(31000.0);
        let item = OrderItem::from_line(&line);
        assert_eq!(item.product_id, 50);
        assert_eq!(item.size_id, None);
        assert_eq!(item.unit_price, 31000.0);
    }

    #[test]
    fn test_build_for_table() {
        let mut cart = Cart::new();
        cart.add_line(None, "5_12", "Hawaiana", 30000.0).unwrap();
        cart.add_line(None, "5_12", "Hawaiana", 30000.0).unwrap();
        cart.add_line(None, "7", "Gaseosa", 8000.0).unwrap();

        let submission = OrderSubmission::build(&cart, &TableContext::Table(4));
        assert_eq!(submission.mesa, "4");
        assert_eq!(submission.cliente_nombre, "");
        assert_eq!(submission.total_precio, 68000.0);
        assert_eq!(submission.total_amount, 68000.0);
        assert_eq!(submission.items.len(), 2);
        assert_eq!(submission.items[0].quantity, 2);
    }

    #[test]
    fn test_build_for_customer() {
        let cart = cart_of(vec![CartLine::new("7", "Gaseosa", 8000.0, 1)]);
        let context = TableContext::Customer("Ana".to_string());
        let submission = OrderSubmission::build_delivery(
            &cart,
            &context,
            DeliveryDetails {
                telefono: Some("3001234567".to_string()),
                direccion: Some("  ".to_string()),
                precio_domicilio: Some(3000.0),
            },
        );
        assert_eq!(submission.mesa, TO_GO_SENTINEL);
        assert_eq!(submission.cliente_nombre, "Ana");
        assert_eq!(submission.telefono_cliente.as_deref(), Some("3001234567"));
        assert_eq!(submission.direccion_entrega, None);
        assert_eq!(submission.precio_domicilio, Some(3000.0));
    }

    #[test]
    fn test_serialized_shape() {
        let mut cart = Cart::new();
        cart.add_line(None, "9", "Jugo", 8000.0).unwrap();
        cart.add_addition(0, Addition::new("Hielo", 0.0)).unwrap();
        let json = serde_json::to_value(OrderSubmission::build(&cart, &TableContext::ToGo)).unwrap();

        assert_eq!(json["mesa"], TO_GO_SENTINEL);
        assert_eq!(json["items"][0]["size_id"], serde_json::Value::Null);
        assert_eq!(json["items"][0]["additions"][0]["name"], "Hielo");
        assert!(json.get("telefono_cliente").is_none());
    }
}
