//! In-memory key-value store for testing.
//!
//! Provides [`MemoryKvs`] for unit testing repositories and services
//! without touching the filesystem.

use std::collections::HashMap;
use std::sync::RwLock;

use crate::kvs::{Kvs, KvsEntry, KvsError};

/// In-memory [`Kvs`] for tests.
///
/// Stores plain and secret values in separate maps. Use
/// [`fail_next_delete`](Self::fail_next_delete) to simulate a store that
/// rejects a delete, for exercising error propagation paths.
#[derive(Debug, Default)]
pub struct MemoryKvs {
    plain: RwLock<HashMap<String, String>>,
    secret: RwLock<HashMap<String, String>>,
    fail_deletes: RwLock<usize>,
}

impl MemoryKvs {
    /// Create a new empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Make the next `count` delete calls fail with an I/O error.
    pub fn fail_next_delete(&self, count: usize) {
        *self.fail_deletes.write().expect("lock poisoned") = count;
    }

    /// Number of plain entries currently stored.
    #[must_use]
    pub fn len(&self) -> usize {
        self.plain.read().expect("lock poisoned").len()
    }

    /// True when no plain entries are stored.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl Kvs for MemoryKvs {
    fn get(&self, key: &str) -> Result<Option<String>, KvsError> {
        Ok(self.plain.read().expect("lock poisoned").get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> Result<(), KvsError> {
        self.plain
            .write()
            .expect("lock poisoned")
            .insert(key.to_owned(), value.to_owned());
        Ok(())
    }

    fn get_secret(&self, key: &str) -> Result<Option<String>, KvsError> {
        Ok(self.secret.read().expect("lock poisoned").get(key).cloned())
    }

    fn set_secret(&self, key: &str, value: &str) -> Result<(), KvsError> {
        self.secret
            .write()
            .expect("lock poisoned")
            .insert(key.to_owned(), value.to_owned());
        Ok(())
    }

    fn delete(&self, key: &str) -> Result<(), KvsError> {
        let mut failures = self.fail_deletes.write().expect("lock poisoned");
        if *failures > 0 {
            *failures -= 1;
            return Err(KvsError::Io(std::io::Error::other("injected delete failure")));
        }
        self.plain.write().expect("lock poisoned").remove(key);
        Ok(())
    }

    fn query_prefix(&self, prefix: &str, limit: usize) -> Result<Vec<KvsEntry>, KvsError> {
        let plain = self.plain.read().expect("lock poisoned");
        let mut entries: Vec<KvsEntry> = plain
            .iter()
            .filter(|(key, _)| key.starts_with(prefix))
            .map(|(key, value)| KvsEntry {
                key: key.clone(),
                value: value.clone(),
            })
            .collect();
        entries.sort_by(|a, b| a.key.cmp(&b.key));
        entries.truncate(limit);
        Ok(entries)
    }
}
