//! Store error types.

use std::path::PathBuf;

use thiserror::Error;

/// Errors that can occur when reading or writing stored values.
#[derive(Debug, Error)]
pub enum StoreError {
    /// The key cannot be used as a storage name.
    #[error("invalid key {0:?}: use letters, digits, '.', '_' or '-' and don't start with '.'")]
    InvalidKey(String),

    /// Reading or writing the backing file failed.
    #[error("I/O error on {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Failure injected by a test store.
    #[error("simulated {0} failure")]
    Simulated(&'static str),
}

impl StoreError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        StoreError::Io {
            path: path.into(),
            source,
        }
    }
}
