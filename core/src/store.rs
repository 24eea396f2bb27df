//! Persistent key-value flags.
//!
//! The access gate is the only writer. The on-disk form is a flat JSON object,
//! replaced atomically (temp file in the same directory + rename) on every write.

use std::collections::BTreeMap;
use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use serde_json::Value;
use tempfile::NamedTempFile;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("failed to access {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("failed to serialize store: {0}")]
    Serialize(#[from] serde_json::Error),
}

pub trait KeyValueStore {
    /// Read a boolean flag. `Ok(None)` when the key is absent.
    fn get_flag(&self, key: &str) -> Result<Option<bool>, StoreError>;

    fn set_flag(&mut self, key: &str, value: bool) -> Result<(), StoreError>;
}

impl<S: KeyValueStore + ?Sized> KeyValueStore for Box<S> {
    fn get_flag(&self, key: &str) -> Result<Option<bool>, StoreError> {
        (**self).get_flag(key)
    }

    fn set_flag(&mut self, key: &str, value: bool) -> Result<(), StoreError> {
        (**self).set_flag(key, value)
    }
}

/// In-memory store. Nothing survives the process.
#[derive(Debug, Default, Clone)]
pub struct MemoryStore {
    values: BTreeMap<String, bool>,
}

impl MemoryStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

impl KeyValueStore for MemoryStore {
    fn get_flag(&self, key: &str) -> Result<Option<bool>, StoreError> {
        Ok(self.values.get(key).copied())
    }

    fn set_flag(&mut self, key: &str, value: bool) -> Result<(), StoreError> {
        self.values.insert(key.to_string(), value);
        Ok(())
    }
}

/// JSON file store.
///
/// A missing file reads as empty. A file that does not parse as a JSON object is
/// treated as empty (with a warning) and overwritten by the next write.
#[derive(Debug, Clone)]
pub struct JsonFileStore {
    path: PathBuf,
}

impl JsonFileStore {
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn read_all(&self) -> Result<BTreeMap<String, Value>, StoreError> {
        let content = match fs::read_to_string(&self.path) {
            Ok(content) => content,
            Err(err) if err.kind() == io::ErrorKind::NotFound => return Ok(BTreeMap::new()),
            Err(source) => {
                return Err(StoreError::Io {
                    path: self.path.clone(),
                    source,
                });
            }
        };

        match serde_json::from_str::<BTreeMap<String, Value>>(&content) {
            Ok(values) => Ok(values),
            Err(err) => {
                tracing::warn!(
                    path = %self.path.display(),
                    "Ignoring unreadable state file: {err}"
                );
                Ok(BTreeMap::new())
            }
        }
    }

    fn write_all(&self, values: &BTreeMap<String, Value>) -> Result<(), StoreError> {
        let bytes = serde_json::to_vec_pretty(values)?;
        atomic_write(&self.path, &bytes).map_err(|source| StoreError::Io {
            path: self.path.clone(),
            source,
        })
    }
}

impl KeyValueStore for JsonFileStore {
    fn get_flag(&self, key: &str) -> Result<Option<bool>, StoreError> {
        Ok(self.read_all()?.get(key).and_then(Value::as_bool))
    }

    fn set_flag(&mut self, key: &str, value: bool) -> Result<(), StoreError> {
        let mut values = self.read_all()?;
        values.insert(key.to_string(), Value::Bool(value));
        self.write_all(&values)
    }
}

fn atomic_write(path: &Path, bytes: &[u8]) -> io::Result<()> {
    let parent = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    fs::create_dir_all(parent)?;

    let mut tmp = NamedTempFile::new_in(parent)?;
    tmp.write_all(bytes)?;
    tmp.as_file().sync_all()?;
    tmp.persist(path).map_err(|err| err.error)?;
    tracing::debug!(path = %path.display(), "State persisted");
    Ok(())
}
