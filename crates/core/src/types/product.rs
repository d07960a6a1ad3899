//! Catalog and stock records.
//!
//! These mirror the JSON served by the product catalog. Fields the cart does
//! not interpret are kept in [`Product::attributes`] so they survive a trip
//! through the cart and its persisted form unchanged.

use std::str::FromStr;

use rust_decimal::Decimal;
use rust_decimal::prelude::ToPrimitive;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Number, Value};

use super::id::ProductId;

// =============================================================================
// Price
// =============================================================================

/// A catalog price, kept exactly as the catalog sent it.
///
/// The raw JSON value is what gets persisted; [`Price::amount`] reads it as a
/// [`Decimal`] for totals. Numbers and numeric strings are understood.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Price(Value);

impl Price {
    /// The price as a decimal, if the raw value holds one.
    #[must_use]
    pub fn amount(&self) -> Option<Decimal> {
        match &self.0 {
            Value::Number(n) => parse_decimal(&n.to_string()),
            Value::String(s) => parse_decimal(s.trim()),
            _ => None,
        }
    }

    /// Whether the catalog sent no price at all.
    #[must_use]
    pub fn is_missing(&self) -> bool {
        self.0.is_null()
    }
}

impl From<Decimal> for Price {
    fn from(amount: Decimal) -> Self {
        Self(amount.to_f64().and_then(Number::from_f64).map_or(Value::Null, Value::Number))
    }
}

impl From<Value> for Price {
    fn from(raw: Value) -> Self {
        Self(raw)
    }
}

fn parse_decimal(raw: &str) -> Option<Decimal> {
    Decimal::from_str(raw)
        .or_else(|_| Decimal::from_scientific(raw))
        .ok()
}

// =============================================================================
// Product
// =============================================================================

/// A product as served by the catalog.
///
/// Only `id` is required. Display fields are optional and written back only
/// when present, so a record survives the cart unchanged.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Product {
    /// Catalog identifier.
    pub id: ProductId,
    /// Display title.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    /// Unit price in the store currency.
    #[serde(default, skip_serializing_if = "Price::is_missing")]
    pub price: Price,
    /// Image URL.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
    /// Any further fields, passed through untouched.
    #[serde(flatten)]
    pub attributes: Map<String, Value>,
}

impl Product {
    /// Create a product with no extra attributes.
    #[must_use]
    pub fn new(id: ProductId, title: impl Into<String>, price: Decimal, image: impl Into<String>) -> Self {
        Self {
            id,
            title: Some(title.into()),
            price: Price::from(price),
            image: Some(image.into()),
            attributes: Map::new(),
        }
    }

    /// Unit price for totals. A missing or unreadable price counts as zero.
    #[must_use]
    pub fn unit_price(&self) -> Decimal {
        self.price.amount().unwrap_or_default()
    }
}

// =============================================================================
// Stock
// =============================================================================

/// Remote availability for a product.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Stock {
    /// Product this record belongs to.
    pub id: ProductId,
    /// Maximum purchasable quantity.
    pub amount: u32,
}

impl Stock {
    #[must_use]
    pub const fn new(id: ProductId, amount: u32) -> Self {
        Self { id, amount }
    }

    /// Whether `requested` units can be bought.
    #[must_use]
    pub const fn covers(&self, requested: u32) -> bool {
        requested <= self.amount
    }
}

// =============================================================================
// CartItem
// =============================================================================

/// A product held in the cart, together with its quantity.
///
/// Serializes as one flat object: the product fields plus `amount`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CartItem {
    #[serde(flatten)]
    pub product: Product,
    /// Quantity in the cart. Always at least 1 while the entry exists.
    pub amount: u32,
}

impl CartItem {
    #[must_use]
    pub const fn new(product: Product, amount: u32) -> Self {
        Self { product, amount }
    }

    #[must_use]
    pub const fn id(&self) -> ProductId {
        self.product.id
    }

    /// Unit price times quantity.
    #[must_use]
    pub fn subtotal(&self) -> Decimal {
        self.product.unit_price() * Decimal::from(self.amount)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use rstest::rstest;
    use serde_json::json;

    use super::*;

    #[test]
    fn test_product_keeps_unknown_fields() {
        let raw = json!({
            "id": 1,
            "title": "Tênis de Caminhada Leve Confortável",
            "price": 179.9,
            "image": "https://example.com/shoe.jpg",
            "brand": "Rocket",
            "tags": ["running", "light"]
        });

        let product: Product = serde_json::from_value(raw.clone()).unwrap();
        assert_eq!(product.id, ProductId::new(1));
        assert_eq!(product.unit_price(), Decimal::new(1799, 1));
        assert_eq!(product.attributes.get("brand"), Some(&json!("Rocket")));

        assert_eq!(serde_json::to_value(&product).unwrap(), raw);
    }

    #[test]
    fn test_cart_item_serializes_flat() {
        let item = CartItem::new(
            Product::new(ProductId::new(2), "Sneaker", Decimal::new(1399, 1), "img.jpg"),
            3,
        );

        let value = serde_json::to_value(&item).unwrap();
        assert_eq!(
            value,
            json!({
                "id": 2,
                "title": "Sneaker",
                "price": 139.9,
                "image": "img.jpg",
                "amount": 3
            })
        );

        let back: CartItem = serde_json::from_value(value).unwrap();
        assert_eq!(back, item);
        assert!(back.product.attributes.is_empty());
    }

    #[test]
    fn test_cart_item_subtotal() {
        let item = CartItem::new(Product::new(ProductId::new(1), "Shoe", Decimal::new(105, 1), ""), 3);
        assert_eq!(item.subtotal(), Decimal::new(315, 1));
    }

    #[test]
    fn test_product_with_only_an_id() {
        let raw = json!({"id": 3, "title": "Shoe", "price": 179.9});

        let product: Product = serde_json::from_value(raw.clone()).unwrap();
        assert_eq!(product.image, None);
        assert_eq!(serde_json::to_value(&product).unwrap(), raw);

        let bare: Product = serde_json::from_value(json!({"id": 4})).unwrap();
        assert_eq!(bare.unit_price(), Decimal::ZERO);
        assert_eq!(serde_json::to_value(&bare).unwrap(), json!({"id": 4}));
    }

    #[test]
    fn test_string_price_is_written_back_as_string() {
        let raw = json!({"id": 1, "title": "Shoe", "price": "179.90", "image": ""});

        let product: Product = serde_json::from_value(raw.clone()).unwrap();
        assert_eq!(product.unit_price(), Decimal::new(17990, 2));
        assert_eq!(serde_json::to_value(&product).unwrap(), raw);
    }

    #[rstest]
    #[case(json!(179.9), Some(Decimal::new(1799, 1)))]
    #[case(json!(42), Some(Decimal::new(42, 0)))]
    #[case(json!(" 12.50 "), Some(Decimal::new(1250, 2)))]
    #[case(json!(1.5e2), Some(Decimal::new(150, 0)))]
    #[case(json!("free"), None)]
    #[case(json!(null), None)]
    #[case(json!([1]), None)]
    fn test_price_amount(#[case] raw: Value, #[case] expected: Option<Decimal>) {
        assert_eq!(Price::from(raw).amount(), expected);
    }

    #[test]
    fn test_stock_covers() {
        let stock = Stock::new(ProductId::new(1), 2);
        assert!(stock.covers(1));
        assert!(stock.covers(2));
        assert!(!stock.covers(3));
        assert!(!Stock::new(ProductId::new(1), 0).covers(1));
    }
}
