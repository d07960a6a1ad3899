//! Cart operation errors and their user-facing messages.
//!
//! Errors never leave a [`CartStore`](crate::CartStore) operation. Each one is
//! logged and turned into exactly one message for the shopper, chosen by
//! [`CartOperation::message_for`].

use thiserror::Error;

use rocketshoes_core::ProductId;

use crate::catalog::CatalogError;
use crate::storage::StorageError;

/// Message shown when the requested quantity exceeds availability.
pub const OUT_OF_STOCK_MESSAGE: &str = "requested quantity is out of stock";

/// Why a cart operation was aborted.
#[derive(Debug, Error)]
pub enum CartError {
    /// The stock lookup itself failed.
    #[error("stock lookup failed for product {product_id}: {source}")]
    StockUnavailable {
        product_id: ProductId,
        #[source]
        source: CatalogError,
    },

    /// Stock was fetched but does not cover the requested amount.
    #[error("insufficient stock for product {product_id}: requested {requested}, available {}", display_available(.available))]
    InsufficientStock {
        product_id: ProductId,
        requested: u32,
        available: Option<u32>,
    },

    /// The product record could not be fetched.
    #[error("product lookup failed for product {product_id}: {source}")]
    ProductLookup {
        product_id: ProductId,
        #[source]
        source: CatalogError,
    },

    /// The product is not in the cart.
    #[error("product {0} is not in the cart")]
    EntryNotFound(ProductId),

    /// The cart could not be written to storage.
    #[error("failed to persist cart: {0}")]
    Storage(#[from] StorageError),

    /// The cart could not be serialized.
    #[error("failed to serialize cart: {0}")]
    Serialize(#[from] serde_json::Error),
}

#[allow(clippy::ref_option)]
fn display_available(available: &Option<u32>) -> String {
    available.map_or_else(|| "none".to_string(), |amount| amount.to_string())
}

/// The mutating operations a cart supports.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CartOperation {
    Add,
    Remove,
    UpdateAmount,
}

impl CartOperation {
    /// Generic failure message for this operation.
    #[must_use]
    pub const fn failure_message(self) -> &'static str {
        match self {
            Self::Add => "error adding the product",
            Self::Remove => "error removing the product",
            Self::UpdateAmount => "error changing product quantity",
        }
    }

    /// The single message shown to the shopper when `error` aborts this operation.
    #[must_use]
    pub const fn message_for(self, error: &CartError) -> &'static str {
        match error {
            CartError::InsufficientStock { .. } => OUT_OF_STOCK_MESSAGE,
            _ => self.failure_message(),
        }
    }
}

impl std::fmt::Display for CartOperation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(match self {
            Self::Add => "add_product",
            Self::Remove => "remove_product",
            Self::UpdateAmount => "update_product_amount",
        })
    }
}

#[cfg(test)]
mod tests {
    use rstest::rstest;

    use super::*;

    fn insufficient() -> CartError {
        CartError::InsufficientStock {
            product_id: ProductId::new(1),
            requested: 2,
            available: Some(1),
        }
    }

    #[rstest]
    #[case(CartOperation::Add)]
    #[case(CartOperation::Remove)]
    #[case(CartOperation::UpdateAmount)]
    fn test_insufficient_stock_always_reports_out_of_stock(#[case] op: CartOperation) {
        assert_eq!(op.message_for(&insufficient()), OUT_OF_STOCK_MESSAGE);
    }

    #[rstest]
    #[case(CartOperation::Add, "error adding the product")]
    #[case(CartOperation::Remove, "error removing the product")]
    #[case(CartOperation::UpdateAmount, "error changing product quantity")]
    fn test_other_errors_report_operation_message(
        #[case] op: CartOperation,
        #[case] expected: &str,
    ) {
        let stock_failure = CartError::StockUnavailable {
            product_id: ProductId::new(1),
            source: CatalogError::Status(500),
        };
        assert_eq!(op.message_for(&stock_failure), expected);
        assert_eq!(
            op.message_for(&CartError::EntryNotFound(ProductId::new(1))),
            expected
        );
    }

    #[test]
    fn test_insufficient_stock_display() {
        assert_eq!(
            insufficient().to_string(),
            "insufficient stock for product 1: requested 2, available 1"
        );

        let missing = CartError::InsufficientStock {
            product_id: ProductId::new(4),
            requested: 1,
            available: None,
        };
        assert_eq!(
            missing.to_string(),
            "insufficient stock for product 4: requested 1, available none"
        );
    }

    #[test]
    fn test_operation_display() {
        assert_eq!(CartOperation::UpdateAmount.to_string(), "update_product_amount");
    }
}
