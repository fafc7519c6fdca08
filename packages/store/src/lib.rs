//! Component persistence
//!
//! Stored markup is addressed by opaque random ids. `update` never creates
//! a record, so callers can tell an unknown id apart from a failed write.

mod debounce;
mod error;
mod file;
mod memory;

pub use debounce::{DebouncedWriter, SaveStatus, DEFAULT_DEBOUNCE};
pub use error::{StoreError, StoreResult};
pub use file::{FileStore, DEFAULT_STORE_PATH};
pub use memory::MemoryStore;

/// Persistence contract for stored components
pub trait ComponentStore: Send + Sync {
    /// Store `value` under a new id and return the id
    fn create(&self, value: &str) -> StoreResult<String>;

    /// `None` when no component has this id
    fn read(&self, id: &str) -> StoreResult<Option<String>>;

    /// Replace an existing component, `StoreError::NotFound` for unknown ids
    fn update(&self, id: &str, value: &str) -> StoreResult<()>;
}

pub(crate) fn new_id() -> String {
    uuid::Uuid::new_v4().to_string()
}
