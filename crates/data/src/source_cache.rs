//! Memoised file loads keyed by path and modification time.
//!
//! Re-reading an unchanged CSV on every request is wasted work; a cache entry
//! stays valid until the file's mtime changes. The cache is owned by whoever
//! drives the loads, never by the aggregation code.

use bizdash_core::Result;
use parking_lot::RwLock;
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::SystemTime;
use tracing::debug;

struct CachedSource<T> {
    modified: SystemTime,
    value: Arc<T>,
}

pub struct SourceCache<T> {
    entries: RwLock<HashMap<PathBuf, CachedSource<T>>>,
}

impl<T> Default for SourceCache<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> SourceCache<T> {
    #[must_use]
    pub fn new() -> Self {
        Self {
            entries: RwLock::new(HashMap::new()),
        }
    }

    /// Returns the cached value for `path`, calling `load` on a miss or when
    /// the file changed since it was cached.
    ///
    /// # Errors
    /// Returns an error if the file metadata cannot be read or `load` fails.
    /// A failed load leaves any previous entry for the path untouched.
    pub fn get_or_load<F>(&self, path: impl AsRef<Path>, load: F) -> Result<Arc<T>>
    where
        F: FnOnce(&Path) -> Result<T>,
    {
        let key = fs::canonicalize(path.as_ref())?;
        let modified = fs::metadata(&key)?.modified()?;

        if let Some(entry) = self.entries.read().get(&key) {
            if entry.modified == modified {
                debug!(path = %key.display(), "Source cache hit");
                return Ok(Arc::clone(&entry.value));
            }
        }

        debug!(path = %key.display(), "Source cache miss");
        let value = Arc::new(load(&key)?);
        self.entries.write().insert(
            key,
            CachedSource {
                modified,
                value: Arc::clone(&value),
            },
        );
        Ok(value)
    }

    /// Drops the entry for `path`. Returns true if one was present.
    pub fn invalidate(&self, path: impl AsRef<Path>) -> bool {
        let key = fs::canonicalize(path.as_ref()).unwrap_or_else(|_| path.as_ref().to_path_buf());
        self.entries.write().remove(&key).is_some()
    }

    pub fn clear(&self) {
        self.entries.write().clear();
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.read().len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.read().is_empty()
    }
}
