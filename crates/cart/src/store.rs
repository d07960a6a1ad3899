//! The cart store.
//!
//! [`CartStore`] owns the authoritative cart. Every mutation follows the
//! same shape:
//!
//! 1. snapshot the current cart
//! 2. validate against the catalog (may suspend)
//! 3. compute the next cart from the snapshot
//! 4. commit: write the serialized cart to storage, then publish it in memory
//!
//! Any failure before the commit completes leaves both copies untouched and
//! produces exactly one notification. Nothing is returned to the caller.
//!
//! # Overlapping operations
//!
//! The snapshot is taken when an operation starts. If a second operation
//! starts before the first has committed, both work from the same snapshot
//! and the later commit replaces the earlier one's result. Callers that need
//! both effects must await one operation before starting the next.

use std::sync::{Arc, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

use serde::{Deserialize, Serialize};
use tracing::{debug, instrument, warn};

use rocketshoes_core::{Cart, ProductId, Stock};

use crate::catalog::{Catalog, CatalogError};
use crate::error::{CartError, CartOperation};
use crate::notify::Notifier;
use crate::storage::Storage;

/// Storage key the cart is persisted under.
pub const CART_STORAGE_KEY: &str = "@RocketShoes:cart";

/// Request to set the quantity of a cart entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateProductAmount {
    pub product_id: ProductId,
    /// Requested quantity. Values of zero or less are ignored.
    pub amount: i32,
}

// =============================================================================
// CartStore
// =============================================================================

/// In-memory cart mirrored to durable storage.
///
/// Cheap to clone; clones share one cart. Construct one per session and hand
/// it to whatever needs it.
#[derive(Clone)]
pub struct CartStore {
    inner: Arc<CartStoreInner>,
}

struct CartStoreInner {
    catalog: Box<dyn Catalog>,
    storage: Box<dyn Storage>,
    notifier: Box<dyn Notifier>,
    cart: RwLock<Arc<Cart>>,
}

impl CartStore {
    /// Create a store, hydrating the cart from `storage`.
    ///
    /// A missing blob yields an empty cart. So does a blob that cannot be
    /// read or parsed; it stays in storage until the next commit replaces it.
    pub fn new(
        catalog: impl Catalog + 'static,
        storage: impl Storage + 'static,
        notifier: impl Notifier + 'static,
    ) -> Self {
        let cart = hydrate(&storage);

        Self {
            inner: Arc::new(CartStoreInner {
                catalog: Box::new(catalog),
                storage: Box::new(storage),
                notifier: Box::new(notifier),
                cart: RwLock::new(Arc::new(cart)),
            }),
        }
    }

    /// Current cart snapshot.
    #[must_use]
    pub fn cart(&self) -> Arc<Cart> {
        Arc::clone(&self.read())
    }

    // =========================================================================
    // Operations
    // =========================================================================

    /// Add one unit of `product_id`, creating the entry if needed.
    #[instrument(skip(self), fields(product_id = %product_id))]
    pub async fn add_product(&self, product_id: ProductId) {
        let result = self.try_add_product(product_id).await;
        self.settle(CartOperation::Add, result);
    }

    /// Remove the entry for `product_id` whatever its amount.
    #[instrument(skip(self), fields(product_id = %product_id))]
    pub fn remove_product(&self, product_id: ProductId) {
        let result = self.try_remove_product(product_id);
        self.settle(CartOperation::Remove, result);
    }

    /// Set the amount of an existing entry.
    ///
    /// Amounts of zero or less are ignored without a notification. An id that
    /// is not in the cart leaves the cart as it is; no entry is created.
    #[instrument(skip(self, update), fields(product_id = %update.product_id, amount = update.amount))]
    pub async fn update_product_amount(&self, update: UpdateProductAmount) {
        let Some(amount) = u32::try_from(update.amount).ok().filter(|&a| a > 0) else {
            debug!("Ignoring non-positive amount");
            return;
        };

        let result = self.try_update_product_amount(update.product_id, amount).await;
        self.settle(CartOperation::UpdateAmount, result);
    }

    async fn try_add_product(&self, product_id: ProductId) -> Result<(), CartError> {
        let cart = self.cart();
        let existing = cart.find(product_id).map(|item| item.amount);
        let desired = existing.map_or(1, |amount| amount.saturating_add(1));

        let stock = self.fetch_stock(product_id).await?;
        ensure_available(product_id, desired, stock)?;

        // Looked up on every add; the record is only stored for a new entry.
        let product = self
            .inner
            .catalog
            .get_product(product_id)
            .await
            .map_err(|source| CartError::ProductLookup { product_id, source })?;
        if product.id != product_id {
            return Err(CartError::ProductLookup {
                product_id,
                source: CatalogError::NotFound(format!(
                    "product {product_id} (catalog returned {})",
                    product.id
                )),
            });
        }

        let next = if existing.is_some() {
            cart.with_amount(product_id, desired)
        } else {
            cart.with_appended(product)
        };

        self.commit(next)
    }

    fn try_remove_product(&self, product_id: ProductId) -> Result<(), CartError> {
        let cart = self.cart();
        if !cart.contains(product_id) {
            return Err(CartError::EntryNotFound(product_id));
        }
        self.commit(cart.without(product_id))
    }

    async fn try_update_product_amount(
        &self,
        product_id: ProductId,
        amount: u32,
    ) -> Result<(), CartError> {
        let cart = self.cart();

        let stock = self.fetch_stock(product_id).await?;
        ensure_available(product_id, amount, stock)?;

        self.commit(cart.with_amount(product_id, amount))
    }

    // =========================================================================
    // Helpers
    // =========================================================================

    async fn fetch_stock(&self, product_id: ProductId) -> Result<Option<Stock>, CartError> {
        self.inner
            .catalog
            .get_stock(product_id)
            .await
            .map_err(|source| CartError::StockUnavailable { product_id, source })
    }

    /// Persist `next`, then publish it in memory.
    ///
    /// The write lock is held across both steps so readers never see a cart
    /// that storage does not hold. The storage write blocks while the lock is
    /// held; there is a single writer per store.
    fn commit(&self, next: Cart) -> Result<(), CartError> {
        let blob = serde_json::to_string(&next)?;

        let mut slot = self.write();
        self.inner.storage.set(CART_STORAGE_KEY, &blob)?;
        debug!(entries = next.len(), units = next.item_count(), "Cart committed");
        *slot = Arc::new(next);
        Ok(())
    }

    /// Convert an operation result into its single side effect.
    fn settle(&self, operation: CartOperation, result: Result<(), CartError>) {
        if let Err(error) = result {
            warn!(operation = %operation, error = %error, "Cart operation aborted");
            self.inner.notifier.error(operation.message_for(&error));
        }
    }

    fn read(&self) -> RwLockReadGuard<'_, Arc<Cart>> {
        self.inner.cart.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> RwLockWriteGuard<'_, Arc<Cart>> {
        self.inner.cart.write().unwrap_or_else(PoisonError::into_inner)
    }
}

impl std::fmt::Debug for CartStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CartStore")
            .field("cart", &*self.read())
            .finish_non_exhaustive()
    }
}

/// Check that `stock` covers `requested` units.
///
/// Missing stock covers nothing.
fn ensure_available(
    product_id: ProductId,
    requested: u32,
    stock: Option<Stock>,
) -> Result<(), CartError> {
    match stock {
        Some(stock) if stock.covers(requested) => Ok(()),
        _ => Err(CartError::InsufficientStock {
            product_id,
            requested,
            available: stock.map(|s| s.amount),
        }),
    }
}

/// Load the persisted cart, falling back to an empty one.
fn hydrate(storage: &impl Storage) -> Cart {
    match storage.get(CART_STORAGE_KEY) {
        Ok(Some(blob)) => match serde_json::from_str::<Cart>(&blob) {
            Ok(cart) => {
                debug!(entries = cart.len(), "Cart hydrated from storage");
                cart
            }
            Err(e) => {
                warn!(error = %e, "Persisted cart is unreadable, starting with an empty cart");
                Cart::new()
            }
        },
        Ok(None) => Cart::new(),
        Err(e) => {
            warn!(error = %e, "Cart storage is unreadable, starting with an empty cart");
            Cart::new()
        }
    }
}
