use crate::error::{StoreError, StoreResult};
use crate::{new_id, ComponentStore};
use std::collections::HashMap;
use std::sync::Mutex;

/// Components held in memory for the lifetime of the process
#[derive(Default)]
pub struct MemoryStore {
    components: Mutex<HashMap<String, String>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl ComponentStore for MemoryStore {
    fn create(&self, value: &str) -> StoreResult<String> {
        let id = new_id();
        self.components
            .lock()
            .map_err(|_| StoreError::Poisoned)?
            .insert(id.clone(), value.to_string());
        Ok(id)
    }

    fn read(&self, id: &str) -> StoreResult<Option<String>> {
        let components = self.components.lock().map_err(|_| StoreError::Poisoned)?;
        Ok(components.get(id).cloned())
    }

    fn update(&self, id: &str, value: &str) -> StoreResult<()> {
        let mut components = self.components.lock().map_err(|_| StoreError::Poisoned)?;
        match components.get_mut(id) {
            Some(stored) => {
                *stored = value.to_string();
                Ok(())
            }
            None => Err(StoreError::NotFound(id.to_string())),
        }
    }
}
