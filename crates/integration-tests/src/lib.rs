//! Integration tests for the RocketShoes cart.
//!
//! # Running Tests
//!
//! ```bash
//! cargo test -p rocketshoes-integration-tests
//! ```
//!
//! # Test Categories
//!
//! - `cart_store` - Operation scenarios and failure handling
//! - `properties` - Invariants over random operation sequences
//! - `persistence` - Hydration and file-backed storage
//! - `overlapping_operations` - Behavior of operations started before others finish
//!
//! This library holds the test doubles shared by those suites.

#![cfg_attr(not(test), forbid(unsafe_code))]
#![allow(clippy::missing_panics_doc)]

use std::collections::{HashMap, HashSet};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use async_trait::async_trait;
use rust_decimal::Decimal;

use rocketshoes_cart::{
    CART_STORAGE_KEY, Cart, CartItem, Catalog, CatalogError, MemoryStorage, Notifier, Product,
    ProductId, Stock, Storage,
};

// =============================================================================
// Fixtures
// =============================================================================

/// A catalog product with a price derived from its id.
#[must_use]
pub fn product(id: i32) -> Product {
    Product::new(
        ProductId::new(id),
        format!("Shoe {id}"),
        Decimal::new(i64::from(id) * 1000 + 990, 2),
        format!("https://cdn.example.com/shoes/{id}.jpg"),
    )
}

/// A cart holding `product(id)` at each given amount, in order.
#[must_use]
pub fn cart_of(entries: &[(i32, u32)]) -> Cart {
    Cart::from_items(
        entries
            .iter()
            .map(|&(id, amount)| CartItem::new(product(id), amount)),
    )
}

/// Memory storage already holding `cart` under the cart key.
#[must_use]
pub fn seeded_storage(cart: &Cart) -> MemoryStorage {
    let blob = serde_json::to_string(cart).expect("cart serializes");
    MemoryStorage::with_entry(CART_STORAGE_KEY, blob)
}

/// The raw blob persisted under the cart key.
#[must_use]
pub fn persisted_blob(storage: &MemoryStorage) -> Option<String> {
    storage.get(CART_STORAGE_KEY).expect("memory storage reads")
}

/// The persisted cart, parsed.
#[must_use]
pub fn persisted_cart(storage: &MemoryStorage) -> Option<Cart> {
    persisted_blob(storage).map(|blob| serde_json::from_str(&blob).expect("persisted cart parses"))
}

// =============================================================================
// MockCatalog
// =============================================================================

/// Scriptable in-memory catalog.
///
/// Clones share state so a test can reconfigure stock while a store holds
/// the catalog. Unknown stock answers `Ok(None)`; unknown products answer
/// `NotFound`.
#[derive(Clone, Default)]
pub struct MockCatalog {
    state: Arc<Mutex<MockCatalogState>>,
}

#[derive(Default)]
struct MockCatalogState {
    stock: HashMap<ProductId, u32>,
    products: HashMap<ProductId, Product>,
    failing_stock: HashSet<ProductId>,
    failing_products: HashSet<ProductId>,
    stock_calls: usize,
    product_calls: usize,
    yield_on_call: bool,
}

impl MockCatalog {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `product(id)` with `amount` units of stock.
    #[must_use]
    pub fn with_item(self, id: i32, amount: u32) -> Self {
        self.set_stock(id, amount);
        self.lock().products.insert(ProductId::new(id), product(id));
        self
    }

    /// Make every lookup suspend once before answering.
    #[must_use]
    pub fn yielding(self) -> Self {
        self.lock().yield_on_call = true;
        self
    }

    pub fn set_stock(&self, id: i32, amount: u32) {
        self.lock().stock.insert(ProductId::new(id), amount);
    }

    pub fn remove_stock(&self, id: i32) {
        self.lock().stock.remove(&ProductId::new(id));
    }

    /// Answer lookups for `id` with `product`, whatever its own id.
    pub fn set_product(&self, id: i32, product: Product) {
        self.lock().products.insert(ProductId::new(id), product);
    }

    pub fn fail_stock(&self, id: i32) {
        self.lock().failing_stock.insert(ProductId::new(id));
    }

    pub fn fail_product(&self, id: i32) {
        self.lock().failing_products.insert(ProductId::new(id));
    }

    #[must_use]
    pub fn stock_calls(&self) -> usize {
        self.lock().stock_calls
    }

    #[must_use]
    pub fn product_calls(&self) -> usize {
        self.lock().product_calls
    }

    fn lock(&self) -> MutexGuard<'_, MockCatalogState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    async fn maybe_yield(&self) {
        let should_yield = self.lock().yield_on_call;
        if should_yield {
            tokio::task::yield_now().await;
        }
    }
}

#[async_trait]
impl Catalog for MockCatalog {
    async fn get_stock(&self, id: ProductId) -> Result<Option<Stock>, CatalogError> {
        self.maybe_yield().await;

        let mut state = self.lock();
        state.stock_calls += 1;
        if state.failing_stock.contains(&id) {
            return Err(CatalogError::Status(503));
        }
        Ok(state.stock.get(&id).map(|&amount| Stock::new(id, amount)))
    }

    async fn get_product(&self, id: ProductId) -> Result<Product, CatalogError> {
        self.maybe_yield().await;

        let mut state = self.lock();
        state.product_calls += 1;
        if state.failing_products.contains(&id) {
            return Err(CatalogError::Status(500));
        }
        state
            .products
            .get(&id)
            .cloned()
            .ok_or_else(|| CatalogError::NotFound(format!("product {id}")))
    }
}

// =============================================================================
// RecordingNotifier
// =============================================================================

/// Notifier that keeps every message it receives.
#[derive(Clone, Default)]
pub struct RecordingNotifier {
    messages: Arc<Mutex<Vec<String>>>,
}

impl RecordingNotifier {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// All messages received so far.
    #[must_use]
    pub fn messages(&self) -> Vec<String> {
        self.lock().clone()
    }

    /// Drain the received messages.
    #[must_use]
    pub fn take(&self) -> Vec<String> {
        std::mem::take(&mut *self.lock())
    }

    fn lock(&self) -> MutexGuard<'_, Vec<String>> {
        self.messages.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl Notifier for RecordingNotifier {
    fn error(&self, message: &str) {
        self.lock().push(message.to_string());
    }
}
