//! Extension trait for [`Kvs`] with typed convenience methods.

use serde::Serialize;
use serde::de::DeserializeOwned;
use tracing::warn;

use crate::kvs::{Kvs, KvsError};

/// Typed convenience methods for [`Kvs`].
///
/// Provides JSON accessors over the raw string trait so that:
///
/// - [`Kvs`] stays object-safe with no serde dependency
/// - Backends only handle raw values
/// - Callers get typed access via a blanket impl
///
/// Values that fail to deserialize read back as `None` (with a warning),
/// matching the repository contract that a malformed record is "not found"
/// rather than an error.
pub trait KvsExt: Kvs {
    /// Read and deserialize a plain JSON value.
    ///
    /// Returns `Ok(None)` when the key is absent or the stored value does
    /// not parse as `T`.
    ///
    /// # Errors
    ///
    /// Returns [`KvsError`] only for backend read failures.
    fn get_json<T: DeserializeOwned>(&self, key: &str) -> Result<Option<T>, KvsError> {
        let Some(raw) = self.get(key)? else {
            return Ok(None);
        };
        match serde_json::from_str(&raw) {
            Ok(value) => Ok(Some(value)),
            Err(e) => {
                warn!("discarding unparseable value at {key}: {e}");
                Ok(None)
            }
        }
    }

    /// Serialize and write a plain JSON value.
    ///
    /// # Errors
    ///
    /// Returns [`KvsError`] on serialization or backend write failure.
    fn set_json<T: Serialize>(&self, key: &str, value: &T) -> Result<(), KvsError> {
        self.set(key, &serde_json::to_string(value)?)
    }

    /// Read and deserialize a secret-grade JSON value.
    ///
    /// Same parse semantics as [`get_json`](Self::get_json).
    ///
    /// # Errors
    ///
    /// Returns [`KvsError`] only for backend read failures.
    fn get_secret_json<T: DeserializeOwned>(&self, key: &str) -> Result<Option<T>, KvsError> {
        let Some(raw) = self.get_secret(key)? else {
            return Ok(None);
        };
        match serde_json::from_str(&raw) {
            Ok(value) => Ok(Some(value)),
            Err(e) => {
                warn!("discarding unparseable secret value at {key}: {e}");
                Ok(None)
            }
        }
    }

    /// Serialize and write a secret-grade JSON value.
    ///
    /// # Errors
    ///
    /// Returns [`KvsError`] on serialization or backend write failure.
    fn set_secret_json<T: Serialize>(&self, key: &str, value: &T) -> Result<(), KvsError> {
        self.set_secret(key, &serde_json::to_string(value)?)
    }
}

impl<K: Kvs + ?Sized> KvsExt for K {}
