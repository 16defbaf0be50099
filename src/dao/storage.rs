use std::io;

use thiserror::Error;

/// Result alias for storage operations.
pub type StorageResult<T> = Result<T, StorageError>;

/// Error raised by key-value backends regardless of where the bytes live.
#[derive(Debug, Error)]
pub enum StorageError {
    /// The backend could not read or write the key.
    #[error("storage I/O failed for key `{key}`")]
    Io {
        /// Key being accessed.
        key: String,
        /// Underlying filesystem error.
        #[source]
        source: io::Error,
    },
    /// Writing the value would exceed the backend capacity.
    #[error("storage quota exceeded writing `{key}` ({needed} bytes needed, capacity {capacity})")]
    QuotaExceeded {
        /// Key being written.
        key: String,
        /// Bytes the store would hold after the write.
        needed: u64,
        /// Configured capacity in bytes.
        capacity: u64,
    },
    /// The value could not be encoded before writing.
    #[error("failed to encode value for key `{key}`")]
    Encode {
        /// Key the value was meant for.
        key: String,
        /// Serializer error.
        #[source]
        source: serde_json::Error,
    },
}

impl StorageError {
    /// Construct an I/O error for `key`.
    pub fn io(key: impl Into<String>, source: io::Error) -> Self {
        StorageError::Io {
            key: key.into(),
            source,
        }
    }
}

/// Minimal string key-value interface the tracker needs from its environment.
pub trait KeyValueStore: Send {
    /// Read a value, `None` when the key is absent.
    fn get(&self, key: &str) -> StorageResult<Option<String>>;
    /// Create or overwrite a value.
    fn set(&mut self, key: &str, value: &str) -> StorageResult<()>;
    /// Delete a value; absent keys are not an error.
    fn remove(&mut self, key: &str) -> StorageResult<()>;
    /// Every stored key with the length of its value, used for usage accounting.
    fn entries(&self) -> StorageResult<Vec<(String, usize)>>;
}

impl<T: KeyValueStore + ?Sized> KeyValueStore for Box<T> {
    fn get(&self, key: &str) -> StorageResult<Option<String>> {
        (**self).get(key)
    }

    fn set(&mut self, key: &str, value: &str) -> StorageResult<()> {
        (**self).set(key, value)
    }

    fn remove(&mut self, key: &str) -> StorageResult<()> {
        (**self).remove(key)
    }

    fn entries(&self) -> StorageResult<Vec<(String, usize)>> {
        (**self).entries()
    }
}
