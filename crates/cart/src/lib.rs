//! RocketShoes cart library.
//!
//! Keeps the shopper's cart in memory, mirrors it to durable storage and
//! checks every quantity change against remote stock before applying it.
//!
//! # Architecture
//!
//! [`CartStore`] is the only stateful component. It talks to the outside
//! world through three capabilities, each a trait with shipped adapters:
//!
//! - [`Catalog`] - stock and product lookups ([`ApiClient`] over HTTP)
//! - [`Storage`] - string blobs by key ([`FileStorage`], [`MemoryStorage`])
//! - [`Notifier`] - user-facing failure messages ([`TracingNotifier`])
//!
//! # Example
//!
//! ```rust,ignore
//! use rocketshoes_cart::{ApiClient, CartConfig, CartStore, FileStorage, TracingNotifier};
//!
//! let config = CartConfig::from_env()?;
//! let store = CartStore::new(
//!     ApiClient::new(&config),
//!     FileStorage::new(&config.storage_path),
//!     TracingNotifier,
//! );
//!
//! store.add_product(ProductId::new(1)).await;
//! println!("{} items", store.cart().item_count());
//! ```

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod catalog;
pub mod config;
pub mod error;
pub mod notify;
pub mod storage;
pub mod store;

pub use catalog::{ApiClient, Catalog, CatalogError};
pub use config::{CartConfig, ConfigError};
pub use error::{CartError, CartOperation, OUT_OF_STOCK_MESSAGE};
pub use notify::{Notifier, TracingNotifier};
pub use storage::{FileStorage, MemoryStorage, Storage, StorageError};
pub use store::{CART_STORAGE_KEY, CartStore, UpdateProductAmount};

pub use rocketshoes_core::{Cart, CartItem, Product, ProductId, Stock};
