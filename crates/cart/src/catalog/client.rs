//! REST catalog client implementation.
//!
//! Uses `reqwest` for HTTP. Caches product records using `moka` (5-minute
//! TTL). Stock is always fetched live.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use moka::future::Cache;
use serde::Deserialize;
use serde::de::DeserializeOwned;
use tracing::{debug, instrument};
use url::Url;

use rocketshoes_core::{Product, ProductId, Stock};

use super::{Catalog, CatalogError};
use crate::config::CartConfig;

// =============================================================================
// Wire Types
// =============================================================================

/// Stock record as served by `/stock/{id}`.
///
/// Both fields are optional on the wire; a record without a usable amount
/// is reported as "no stock" rather than as a parse failure.
#[derive(Debug, Deserialize)]
struct StockRecord {
    id: Option<ProductId>,
    amount: Option<i64>,
}

impl StockRecord {
    fn into_stock(self, requested: ProductId) -> Option<Stock> {
        if self.id.is_some_and(|id| id != requested) {
            tracing::warn!(
                requested = %requested,
                returned = ?self.id,
                "Stock record id does not match the requested product"
            );
            return None;
        }
        let amount = u32::try_from(self.amount?).ok()?;
        Some(Stock::new(requested, amount))
    }
}

// =============================================================================
// ApiClient
// =============================================================================

/// Client for the catalog REST API.
///
/// Cheap to clone; clones share the HTTP connection pool and product cache.
#[derive(Clone)]
pub struct ApiClient {
    inner: Arc<ApiClientInner>,
}

struct ApiClientInner {
    client: reqwest::Client,
    base_url: Url,
    products: Cache<ProductId, Product>,
}

impl ApiClient {
    /// Create a new catalog client.
    #[must_use]
    pub fn new(config: &CartConfig) -> Self {
        let products = Cache::builder()
            .max_capacity(1000)
            .time_to_live(Duration::from_secs(300)) // 5 minutes
            .build();

        Self {
            inner: Arc::new(ApiClientInner {
                client: reqwest::Client::new(),
                base_url: config.api_url.clone(),
                products,
            }),
        }
    }

    /// Build the URL for `{collection}/{id}` under the base URL.
    fn endpoint(&self, collection: &str, id: ProductId) -> Result<Url, CatalogError> {
        Ok(self.inner.base_url.join(&format!("{collection}/{id}"))?)
    }

    /// GET a resource, returning `None` on 404.
    async fn fetch_optional<T: DeserializeOwned>(&self, url: Url) -> Result<Option<T>, CatalogError> {
        let response = self.inner.client.get(url.clone()).send().await?;
        let status = response.status();

        if status == reqwest::StatusCode::NOT_FOUND {
            debug!(url = %url, "Catalog resource not found");
            return Ok(None);
        }

        if !status.is_success() {
            tracing::error!(
                status = %status,
                url = %url,
                "Catalog API returned non-success status"
            );
            return Err(CatalogError::Status(status.as_u16()));
        }

        // Read as text first for better error diagnostics
        let body = response.text().await?;
        match serde_json::from_str(&body) {
            Ok(value) => Ok(Some(value)),
            Err(e) => {
                tracing::error!(
                    error = %e,
                    body = %body.chars().take(500).collect::<String>(),
                    "Failed to parse catalog response"
                );
                Err(CatalogError::Parse(e))
            }
        }
    }

    // =========================================================================
    // Cache Management
    // =========================================================================

    /// Invalidate a cached product.
    pub async fn invalidate_product(&self, id: ProductId) {
        self.inner.products.invalidate(&id).await;
    }

    /// Invalidate all cached products.
    pub fn invalidate_all(&self) {
        self.inner.products.invalidate_all();
    }
}

#[async_trait]
impl Catalog for ApiClient {
    /// Fetch stock for a product. Never cached.
    #[instrument(skip(self), fields(product_id = %id))]
    async fn get_stock(&self, id: ProductId) -> Result<Option<Stock>, CatalogError> {
        let url = self.endpoint("stock", id)?;
        let record = self.fetch_optional::<StockRecord>(url).await?;
        Ok(record.and_then(|r| r.into_stock(id)))
    }

    /// Fetch a product record, served from cache when fresh.
    #[instrument(skip(self), fields(product_id = %id))]
    async fn get_product(&self, id: ProductId) -> Result<Product, CatalogError> {
        // Check cache
        if let Some(product) = self.inner.products.get(&id).await {
            debug!("Cache hit for product");
            return Ok(product);
        }

        let url = self.endpoint("products", id)?;
        let product = self
            .fetch_optional::<Product>(url)
            .await?
            .ok_or_else(|| CatalogError::NotFound(format!("product {id}")))?;

        self.inner.products.insert(id, product.clone()).await;

        Ok(product)
    }
}
