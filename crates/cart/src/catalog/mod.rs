//! Remote stock and product lookups.
//!
//! # Architecture
//!
//! - [`Catalog`] is the capability the cart store consumes
//! - [`ApiClient`] implements it against the REST catalog service
//! - Products are cached via `moka` (5 minute TTL); stock never is, so each
//!   mutation sees current availability
//!
//! # Endpoints
//!
//! - `GET /stock/{id}` - `{ "id": 1, "amount": 3 }`
//! - `GET /products/{id}` - `{ "id": 1, "title": ..., "price": ..., "image": ... }`

mod client;

pub use client::ApiClient;

use async_trait::async_trait;
use thiserror::Error;

use rocketshoes_core::{Product, ProductId, Stock};

/// Errors that can occur when talking to the catalog service.
#[derive(Debug, Error)]
pub enum CatalogError {
    /// HTTP request failed.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The service answered with a non-success status.
    #[error("unexpected status {0}")]
    Status(u16),

    /// Resource not found.
    #[error("Not found: {0}")]
    NotFound(String),

    /// JSON parsing failed.
    #[error("JSON parse error: {0}")]
    Parse(#[from] serde_json::Error),

    /// The request URL could not be built.
    #[error("invalid URL: {0}")]
    Url(#[from] url::ParseError),
}

/// Source of stock and product data.
///
/// Calls may suspend and may fail. Implementations apply no retries.
#[async_trait]
pub trait Catalog: Send + Sync {
    /// Fetch current availability for `id`.
    ///
    /// `Ok(None)` means the service answered but holds no usable stock record.
    async fn get_stock(&self, id: ProductId) -> Result<Option<Stock>, CatalogError>;

    /// Fetch the product record for `id`.
    async fn get_product(&self, id: ProductId) -> Result<Product, CatalogError>;
}
