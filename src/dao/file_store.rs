//! Directory-backed key-value store: one `<key>.json` file per key.

use std::{
    fs,
    io::ErrorKind,
    path::{Path, PathBuf},
};

use tracing::debug;

use crate::dao::storage::{KeyValueStore, StorageError, StorageResult};

const EXTENSION: &str = "json";

/// Persists each key as a file inside a data directory.
#[derive(Debug, Clone)]
pub struct FileStore {
    root: PathBuf,
}

impl FileStore {
    /// Open (and create if needed) the data directory.
    pub fn open(root: impl Into<PathBuf>) -> StorageResult<Self> {
        let root = root.into();
        fs::create_dir_all(&root)
            .map_err(|source| StorageError::io(root.display().to_string(), source))?;
        debug!(path = %root.display(), "opened file store");
        Ok(Self { root })
    }

    /// Directory holding the files.
    pub fn root(&self) -> &Path {
        &self.root
    }

    fn path_for(&self, key: &str) -> PathBuf {
        let file_name: String = key
            .chars()
            .map(|c| {
                if c.is_ascii_alphanumeric() || c == '-' || c == '_' {
                    c
                } else {
                    '_'
                }
            })
            .collect();
        self.root.join(format!("{file_name}.{EXTENSION}"))
    }
}

impl KeyValueStore for FileStore {
    fn get(&self, key: &str) -> StorageResult<Option<String>> {
        match fs::read_to_string(self.path_for(key)) {
            Ok(contents) => Ok(Some(contents)),
            Err(err) if err.kind() == ErrorKind::NotFound => Ok(None),
            Err(err) => Err(StorageError::io(key, err)),
        }
    }

    fn set(&mut self, key: &str, value: &str) -> StorageResult<()> {
        let path = self.path_for(key);
        let staging = path.with_extension(format!("{EXTENSION}.tmp"));
        fs::write(&staging, value).map_err(|source| StorageError::io(key, source))?;
        fs::rename(&staging, &path).map_err(|source| StorageError::io(key, source))
    }

    fn remove(&mut self, key: &str) -> StorageResult<()> {
        match fs::remove_file(self.path_for(key)) {
            Ok(()) => Ok(()),
            Err(err) if err.kind() == ErrorKind::NotFound => Ok(()),
            Err(err) => Err(StorageError::io(key, err)),
        }
    }

    fn entries(&self) -> StorageResult<Vec<(String, usize)>> {
        let root = self.root.display().to_string();
        let dir =
            fs::read_dir(&self.root).map_err(|source| StorageError::io(root.clone(), source))?;

        let mut entries = Vec::new();
        for entry in dir {
            let entry = entry.map_err(|source| StorageError::io(root.clone(), source))?;
            let path = entry.path();
            if path.extension().and_then(|ext| ext.to_str()) != Some(EXTENSION) {
                continue;
            }
            let Some(key) = path.file_stem().and_then(|stem| stem.to_str()) else {
                continue;
            };
            let len = entry
                .metadata()
                .map_err(|source| StorageError::io(key, source))?
                .len();
            entries.push((key.to_owned(), len as usize));
        }
        entries.sort();
        Ok(entries)
    }
}
