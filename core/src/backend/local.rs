// cartsync/src/backend/local.rs

//! # Local fallback store
//!
//! Key-value persistence used while nobody is signed in. Each item store keeps
//! its whole list under one fixed key as a JSON array.
//!
//! Two implementations ship with the crate:
//! - [`MemoryLocalStore`]: process memory, with an optional byte quota.
//! - [`FileLocalStore`]: one `<key>.json` file per key under a base directory.
//!
//! ```text
//! <base_dir>/
//! ├── shopping-cart.json
//! └── shopping-wishlist.json
//! ```

use crate::error::LocalStoreError;
use parking_lot::Mutex;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// Synchronous key-value persistence. Access never suspends.
pub trait LocalStore: Send + Sync {
  /// Returns `Ok(None)` if the key does not exist.
  fn get_snapshot(&self, key: &str) -> Result<Option<String>, LocalStoreError>;

  fn set_snapshot(&self, key: &str, value: &str) -> Result<(), LocalStoreError>;

  /// Returns `Ok(())` even if the key did not exist.
  fn delete_snapshot(&self, key: &str) -> Result<(), LocalStoreError>;
}

/// In-memory store shared by every clone.
#[derive(Clone, Debug, Default)]
pub struct MemoryLocalStore {
  entries: Arc<Mutex<HashMap<String, String>>>,
  quota_bytes: Option<usize>,
}

impl MemoryLocalStore {
  pub fn new() -> Self {
    Self::default()
  }

  /// Rejects any single write larger than `quota_bytes`, like a full browser quota.
  pub fn with_quota(quota_bytes: usize) -> Self {
    Self {
      entries: Arc::default(),
      quota_bytes: Some(quota_bytes),
    }
  }

  /// Raw access for tests and tooling.
  pub fn raw(&self, key: &str) -> Option<String> {
    self.entries.lock().get(key).cloned()
  }

  pub fn put_raw(&self, key: &str, value: impl Into<String>) {
    self.entries.lock().insert(key.to_string(), value.into());
  }
}

impl LocalStore for MemoryLocalStore {
  fn get_snapshot(&self, key: &str) -> Result<Option<String>, LocalStoreError> {
    Ok(self.entries.lock().get(key).cloned())
  }

  fn set_snapshot(&self, key: &str, value: &str) -> Result<(), LocalStoreError> {
    if let Some(limit) = self.quota_bytes {
      if value.len() > limit {
        return Err(LocalStoreError::QuotaExceeded {
          key: key.to_string(),
          attempted: value.len(),
          limit,
        });
      }
    }
    self.entries.lock().insert(key.to_string(), value.to_string());
    Ok(())
  }

  fn delete_snapshot(&self, key: &str) -> Result<(), LocalStoreError> {
    self.entries.lock().remove(key);
    Ok(())
  }
}

/// Filesystem-backed store for desktop builds and the demo shell.
#[derive(Clone, Debug)]
pub struct FileLocalStore {
  base: PathBuf,
}

impl FileLocalStore {
  pub fn new(base: impl Into<PathBuf>) -> Self {
    Self { base: base.into() }
  }

  pub fn base_dir(&self) -> &Path {
    &self.base
  }

  fn path_for(&self, key: &str) -> PathBuf {
    // Keys are fixed identifiers; anything else is flattened to stay inside `base`.
    let file_name: String = key
      .chars()
      .map(|c| if c.is_ascii_alphanumeric() || c == '-' || c == '_' { c } else { '_' })
      .collect();
    self.base.join(format!("{}.json", file_name))
  }
}

impl LocalStore for FileLocalStore {
  fn get_snapshot(&self, key: &str) -> Result<Option<String>, LocalStoreError> {
    match std::fs::read_to_string(self.path_for(key)) {
      Ok(content) => Ok(Some(content)),
      Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
      Err(source) => Err(LocalStoreError::Io {
        key: key.to_string(),
        source,
      }),
    }
  }

  fn set_snapshot(&self, key: &str, value: &str) -> Result<(), LocalStoreError> {
    let io_err = |source| LocalStoreError::Io {
      key: key.to_string(),
      source,
    };
    std::fs::create_dir_all(&self.base).map_err(io_err)?;
    std::fs::write(self.path_for(key), value).map_err(io_err)
  }

  fn delete_snapshot(&self, key: &str) -> Result<(), LocalStoreError> {
    match std::fs::remove_file(self.path_for(key)) {
      Ok(()) => Ok(()),
      Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
      Err(source) => Err(LocalStoreError::Io {
        key: key.to_string(),
        source,
      }),
    }
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn file_store_roundtrip_and_delete() {
    let dir = std::env::temp_dir().join(format!("cartsync_local_{}", uuid::Uuid::new_v4()));
    let store = FileLocalStore::new(dir.clone());

    assert_eq!(store.get_snapshot("shopping-cart").unwrap(), None);
    store.set_snapshot("shopping-cart", "[]").unwrap();

    // Re-open from the same directory
    let reopened = FileLocalStore::new(dir.clone());
    assert_eq!(reopened.get_snapshot("shopping-cart").unwrap().as_deref(), Some("[]"));

    reopened.delete_snapshot("shopping-cart").unwrap();
    reopened.delete_snapshot("shopping-cart").unwrap();
    assert_eq!(store.get_snapshot("shopping-cart").unwrap(), None);

    let _ = std::fs::remove_dir_all(&dir);
  }

  #[test]
  fn memory_store_enforces_quota() {
    let store = MemoryLocalStore::with_quota(4);
    assert!(store.set_snapshot("k", "[]").is_ok());
    assert!(matches!(
      store.set_snapshot("k", "[1,2,3]"),
      Err(LocalStoreError::QuotaExceeded { limit: 4, .. })
    ));
    assert_eq!(store.raw("k").as_deref(), Some("[]"));
  }
}
