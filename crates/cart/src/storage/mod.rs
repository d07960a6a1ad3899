//! Durable key-value storage for serialized blobs.
//!
//! The cart is persisted as one string under one key. [`FileStorage`] keeps
//! blobs across restarts; [`MemoryStorage`] lives as long as the process.

mod file;
mod memory;

pub use file::FileStorage;
pub use memory::MemoryStorage;

use thiserror::Error;

/// Errors that can occur when reading or writing storage.
#[derive(Debug, Error)]
pub enum StorageError {
    /// Filesystem operation failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The backing file is not a valid storage document.
    #[error("corrupt storage file: {0}")]
    Parse(#[from] serde_json::Error),
}

/// Synchronous string storage keyed by name.
///
/// A single writer is assumed for the lifetime of the process.
pub trait Storage: Send + Sync {
    /// Read the blob stored under `key`.
    ///
    /// # Errors
    ///
    /// Returns an error if the medium cannot be read.
    fn get(&self, key: &str) -> Result<Option<String>, StorageError>;

    /// Replace the blob stored under `key`.
    ///
    /// # Errors
    ///
    /// Returns an error if the medium cannot be written. On error the
    /// previously stored blob is still in place.
    fn set(&self, key: &str, value: &str) -> Result<(), StorageError>;
}
