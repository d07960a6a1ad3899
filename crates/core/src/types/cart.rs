//! The cart value and its state transitions.
//!
//! A [`Cart`] is immutable in practice: every transition returns a new value
//! and leaves the receiver untouched. Entries keep the order in which they
//! were first added, and no two entries share an id.

use rust_decimal::Decimal;
use serde::{Deserialize, Deserializer, Serialize};

use super::id::ProductId;
use super::product::{CartItem, Product};

/// Ordered, id-unique list of cart entries.
///
/// Serializes as a plain JSON array of flat [`CartItem`] objects.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct Cart {
    items: Vec<CartItem>,
}

impl Cart {
    /// Create an empty cart.
    #[must_use]
    pub const fn new() -> Self {
        Self { items: Vec::new() }
    }

    /// Build a cart from raw entries.
    ///
    /// Entries with a zero amount are dropped and later duplicates of an id
    /// are discarded, so the result always upholds the cart invariants.
    #[must_use]
    pub fn from_items(items: impl IntoIterator<Item = CartItem>) -> Self {
        let mut cart = Self::new();
        for item in items {
            if item.amount == 0 || cart.contains(item.id()) {
                continue;
            }
            cart.items.push(item);
        }
        cart
    }

    // =========================================================================
    // Reads
    // =========================================================================

    /// Find the entry for `id`.
    #[must_use]
    pub fn find(&self, id: ProductId) -> Option<&CartItem> {
        self.items.iter().find(|item| item.id() == id)
    }

    #[must_use]
    pub fn contains(&self, id: ProductId) -> bool {
        self.find(id).is_some()
    }

    /// Quantity held for `id`, or 0 when absent.
    #[must_use]
    pub fn amount_of(&self, id: ProductId) -> u32 {
        self.find(id).map_or(0, |item| item.amount)
    }

    /// Number of distinct products.
    #[must_use]
    pub fn len(&self) -> usize {
        self.items.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &CartItem> {
        self.items.iter()
    }

    #[must_use]
    pub fn items(&self) -> &[CartItem] {
        &self.items
    }

    /// Total number of units across all entries.
    #[must_use]
    pub fn item_count(&self) -> u64 {
        self.items.iter().map(|item| u64::from(item.amount)).sum()
    }

    /// Sum of all entry subtotals.
    #[must_use]
    pub fn total(&self) -> Decimal {
        self.items.iter().map(CartItem::subtotal).sum()
    }

    // =========================================================================
    // Transitions
    // =========================================================================

    /// Replace the amount of the entry for `id`.
    ///
    /// Other entries and the order are untouched. When `id` is not in the
    /// cart the result equals `self`. A zero `amount` is not representable
    /// here; callers guard against it before asking for a new state.
    #[must_use]
    pub fn with_amount(&self, id: ProductId, amount: u32) -> Self {
        debug_assert!(amount > 0, "cart entries must hold at least one unit");
        Self {
            items: self
                .items
                .iter()
                .map(|item| {
                    if item.id() == id {
                        CartItem::new(item.product.clone(), amount)
                    } else {
                        item.clone()
                    }
                })
                .collect(),
        }
    }

    /// Append `product` with an amount of one.
    ///
    /// If the product is already present the cart is returned unchanged;
    /// use [`Cart::with_amount`] to grow an existing entry.
    #[must_use]
    pub fn with_appended(&self, product: Product) -> Self {
        if self.contains(product.id) {
            return self.clone();
        }
        let mut items = self.items.clone();
        items.push(CartItem::new(product, 1));
        Self { items }
    }

    /// Drop the entry for `id`, keeping the order of the rest.
    #[must_use]
    pub fn without(&self, id: ProductId) -> Self {
        Self {
            items: self
                .items
                .iter()
                .filter(|item| item.id() != id)
                .cloned()
                .collect(),
        }
    }
}

/// A persisted entry before its amount is checked.
#[derive(Deserialize)]
struct StoredItem {
    #[serde(flatten)]
    product: Product,
    amount: i64,
}

impl<'de> Deserialize<'de> for Cart {
    /// Entries whose amount is not a positive `u32` are dropped one by one;
    /// the rest of the cart is kept.
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let stored = Vec::<StoredItem>::deserialize(deserializer)?;
        Ok(Self::from_items(stored.into_iter().filter_map(|item| {
            let amount = u32::try_from(item.amount).ok()?;
            Some(CartItem::new(item.product, amount))
        })))
    }
}

impl<'a> IntoIterator for &'a Cart {
    type Item = &'a CartItem;
    type IntoIter = std::slice::Iter<'a, CartItem>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.iter()
    }
}
