//! Kvs trait and error type.
//!
//! The [`Kvs`] trait models the external key-value service the application
//! stores its records in: string keys, string values, per-key atomicity,
//! and a bounded begins-with query. Values containing credentials go through
//! the secret-grade methods, which backends must keep apart from plain
//! values.

/// One entry returned by a prefix query.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KvsEntry {
    /// Full storage key.
    pub key: String,
    /// Raw stored value.
    pub value: String,
}

/// Error from key-value store operations.
#[derive(Debug, thiserror::Error)]
pub enum KvsError {
    /// A storage key argument was empty or contained the delimiter.
    #[error("invalid storage key: {0}")]
    InvalidKey(String),

    /// A record failed validation before it reached the store.
    #[error("invalid record: {0}")]
    InvalidRecord(String),

    /// I/O error from the backing store.
    #[error("storage I/O error")]
    Io(#[from] std::io::Error),

    /// Value (de)serialization error.
    #[error("storage JSON error")]
    Json(#[from] serde_json::Error),
}

/// Key-value store abstraction.
///
/// Backends provide per-key atomicity for individual operations and keep
/// secret-grade values in a separate namespace from plain values. No
/// transactions, no ordering guarantees across keys.
pub trait Kvs: Send + Sync {
    /// Read a plain value.
    ///
    /// Returns `Ok(None)` when the key is absent.
    ///
    /// # Errors
    ///
    /// Returns [`KvsError`] if the backend fails to read.
    fn get(&self, key: &str) -> Result<Option<String>, KvsError>;

    /// Write a plain value, overwriting any existing entry.
    ///
    /// # Errors
    ///
    /// Returns [`KvsError`] if the backend fails to write.
    fn set(&self, key: &str, value: &str) -> Result<(), KvsError>;

    /// Read a secret-grade value.
    ///
    /// Returns `Ok(None)` when the key is absent.
    ///
    /// # Errors
    ///
    /// Returns [`KvsError`] if the backend fails to read.
    fn get_secret(&self, key: &str) -> Result<Option<String>, KvsError>;

    /// Write a secret-grade value, overwriting any existing entry.
    ///
    /// # Errors
    ///
    /// Returns [`KvsError`] if the backend fails to write.
    fn set_secret(&self, key: &str, value: &str) -> Result<(), KvsError>;

    /// Delete a plain value. Deleting an absent key is not an error.
    ///
    /// # Errors
    ///
    /// Returns [`KvsError`] if the backend fails to delete an existing entry.
    fn delete(&self, key: &str) -> Result<(), KvsError>;

    /// Return up to `limit` plain entries whose key begins with `prefix`,
    /// in no particular order.
    ///
    /// # Errors
    ///
    /// Returns [`KvsError`] if the backend fails to scan.
    fn query_prefix(&self, prefix: &str, limit: usize) -> Result<Vec<KvsEntry>, KvsError>;
}
