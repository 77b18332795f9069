//! Wire types for the cart API.
//!
//! Snapshots are server-authoritative: the client decodes them, paints every
//! surface from them, and drops them. Nothing here is mutated locally.

use acadshop_core::{CartLineId, ProductId};
use rust_decimal::Decimal;
use serde::{Deserialize, Deserializer, Serialize};

// =============================================================================
// Snapshot Types
// =============================================================================

/// Full cart state as returned by `GET /api/cart` and by every mutation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CartSnapshot {
    /// Line items, in server order.
    #[serde(default)]
    pub items: Vec<CartLine>,
    /// Sum of line quantities.
    #[serde(default)]
    pub total_items: u32,
    /// Sum of line totals.
    pub subtotal: Decimal,
    /// Shipping charge.
    pub shipping: Decimal,
    /// Subtotal plus shipping.
    pub total: Decimal,
}

impl CartSnapshot {
    /// Whether the cart has no lines.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

/// A line item in the cart.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CartLine {
    /// Cart line ID (not the product ID).
    pub id: CartLineId,
    /// Product shown on this line.
    pub product: ProductRef,
    /// Quantity, always at least 1.
    pub quantity: u32,
    /// Selected size, if the product has sizes.
    pub size: Option<String>,
    /// Selected color, if the product has colors.
    pub color: Option<String>,
    /// Server-computed `price * quantity`.
    pub total_price: Decimal,
}

/// Product details embedded in a cart line.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProductRef {
    /// Product name.
    pub name: String,
    /// Image URL.
    pub image: Option<String>,
    /// Unit price.
    pub price: Decimal,
    /// Long description.
    #[serde(default, deserialize_with = "null_as_empty")]
    pub description: String,
    /// Short description, preferred over the truncated long one.
    #[serde(default)]
    pub short_description: Option<String>,
}

fn null_as_empty<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<String>::deserialize(deserializer)?.unwrap_or_default())
}

// =============================================================================
// Request Types
// =============================================================================

/// Body of `POST /api/cart/update`.
#[derive(Debug, Clone, Serialize)]
pub struct UpdateItemRequest {
    pub item_id: CartLineId,
    pub quantity: u32,
}

/// Body of `POST /api/cart/remove`.
#[derive(Debug, Clone, Serialize)]
pub struct RemoveItemRequest {
    pub item_id: CartLineId,
}

/// Add-to-cart form data, submitted form-encoded to the form's action.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AddToCartForm {
    pub product_id: ProductId,
    pub quantity: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub size: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_snapshot_decodes_server_payload() {
        let payload = json!({
            "items": [{
                "id": 7,
                "product": {
                    "id": 3,
                    "name": "Chuteira Pro",
                    "image": null,
                    "price": 199.9,
                    "description": "Chuteira de campo",
                    "category": "chuteiras"
                },
                "quantity": 2,
                "size": "42",
                "color": null,
                "total_price": 399.8
            }],
            "subtotal": 399.8,
            "shipping": 0,
            "total": 399.8,
            "total_items": 2,
            "session_id": "abc"
        });

        let snapshot: CartSnapshot = serde_json::from_value(payload).unwrap();
        assert_eq!(snapshot.total_items, 2);
        assert_eq!(snapshot.subtotal, Decimal::new(3998, 1));

        let line = snapshot.items.first().unwrap();
        assert_eq!(line.id, CartLineId::new(7));
        assert_eq!(line.product.price, Decimal::new(1999, 1));
        assert_eq!(line.product.short_description, None);
        assert_eq!(line.size.as_deref(), Some("42"));
    }

    #[test]
    fn test_null_description_decodes_as_empty() {
        let product: ProductRef = serde_json::from_value(json!({
            "name": "Meia",
            "image": "/static/meia.jpg",
            "price": 10,
            "description": null
        }))
        .unwrap();
        assert_eq!(product.description, "");
    }

    #[test]
    fn test_missing_total_items_defaults_to_zero() {
        let snapshot: CartSnapshot = serde_json::from_value(json!({
            "items": [],
            "subtotal": 0,
            "shipping": 15.9,
            "total": 15.9
        }))
        .unwrap();
        assert_eq!(snapshot.total_items, 0);
        assert!(snapshot.is_empty());
    }

    #[test]
    fn test_update_request_body_shape() {
        let body = UpdateItemRequest {
            item_id: CartLineId::new(7),
            quantity: 3,
        };
        assert_eq!(
            serde_json::to_value(&body).unwrap(),
            json!({"item_id": 7, "quantity": 3})
        );
    }
}
