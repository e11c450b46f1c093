//! Platform abstraction layer
//!
//! Handles browser/native differences for:
//! - Key-value storage (LocalStorage on web, in-memory natively)

pub mod storage;

#[cfg(target_arch = "wasm32")]
pub use storage::LocalStorage;
pub use storage::{MemoryStorage, Storage, StorageError};
