use std::collections::BTreeMap;

use crate::dao::storage::{KeyValueStore, StorageError, StorageResult};

/// In-process store, optionally bounded to mimic a quota-limited browser storage.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    values: BTreeMap<String, String>,
    capacity: Option<u64>,
}

impl MemoryStore {
    /// Unbounded store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Store refusing writes once the total value size would exceed `capacity` bytes.
    pub fn with_capacity(capacity: u64) -> Self {
        Self {
            values: BTreeMap::new(),
            capacity: Some(capacity),
        }
    }

    fn used_without(&self, key: &str) -> u64 {
        self.values
            .iter()
            .filter(|(existing, _)| existing.as_str() != key)
            .map(|(_, value)| value.len() as u64)
            .sum()
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> StorageResult<Option<String>> {
        Ok(self.values.get(key).cloned())
    }

    fn set(&mut self, key: &str, value: &str) -> StorageResult<()> {
        if let Some(capacity) = self.capacity {
            let needed = self.used_without(key) + value.len() as u64;
            if needed > capacity {
                return Err(StorageError::QuotaExceeded {
                    key: key.to_owned(),
                    needed,
                    capacity,
                });
            }
        }
        self.values.insert(key.to_owned(), value.to_owned());
        Ok(())
    }

    fn remove(&mut self, key: &str) -> StorageResult<()> {
        self.values.remove(key);
        Ok(())
    }

    fn entries(&self) -> StorageResult<Vec<(String, usize)>> {
        Ok(self
            .values
            .iter()
            .map(|(key, value)| (key.clone(), value.len()))
            .collect())
    }
}
