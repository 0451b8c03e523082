//! marksheet-store — Key-value persistence adapters.
//!
//! Implements the `KeyValueStore` trait for a directory of files and for an
//! in-memory map, and loads the marksheet configuration that says where the
//! files live.

pub mod config;
pub mod error;
pub mod file;
pub mod memory;

pub use config::{load_config, MarksheetConfig};
pub use error::StoreError;
pub use file::FileStore;
pub use memory::MemoryStore;
