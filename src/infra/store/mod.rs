//! Model persistence.
//!
//! [`ModelStore`] is the key/value seam the trainer and predictor talk to.
//! [`FileModelStore`] implements it on a local directory with atomic replace.

mod file;

pub use file::FileModelStore;

use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("No model stored under '{0}'")]
    NotFound(String),

    #[error("Invalid model key '{0}'")]
    InvalidKey(String),

    #[error("Failed to read model file '{0}'")]
    Read(PathBuf, #[source] std::io::Error),

    #[error("Failed to write model file '{0}'")]
    Write(PathBuf, #[source] std::io::Error),
}

/// Stores serialized models by key (the pollutant name).
pub trait ModelStore: Send + Sync {
    /// Replaces whatever is stored under `key`. Readers see either the old
    /// bytes or the new ones, never a mix.
    fn put(&self, key: &str, bytes: &[u8]) -> Result<(), StoreError>;

    fn get(&self, key: &str) -> Result<Vec<u8>, StoreError>;
}
