//! File-based key-value store.
//!
//! [`FileKvs`] stores one entry per file under a root directory:
//!
//! ```text
//! {root}/
//! +-- store/              # plain entries
//! |   +-- pageStorage-i1-a1
//! +-- secrets/            # secret-grade entries
//!     +-- settings-personal-abcd1234
//! ```
//!
//! Keys map directly to file names, which the repositories keep safe by
//! construction (composite keys never contain path separators). Secret
//! entries live in their own directory and are written with owner-only
//! permissions on unix.

use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use crate::kvs::{Kvs, KvsEntry, KvsError};

/// Plain entry directory name.
const STORE_DIR: &str = "store";

/// Secret entry directory name.
const SECRETS_DIR: &str = "secrets";

/// File-backed [`Kvs`] rooted at a directory on disk.
pub struct FileKvs {
    store: PathBuf,
    secrets: PathBuf,
}

impl FileKvs {
    /// Open (and create if needed) a file store rooted at `root`.
    ///
    /// # Errors
    ///
    /// Returns [`KvsError::Io`] if the store directories cannot be created.
    pub fn open(root: PathBuf) -> Result<Self, KvsError> {
        let store = root.join(STORE_DIR);
        let secrets = root.join(SECRETS_DIR);
        fs::create_dir_all(&store)?;
        fs::create_dir_all(&secrets)?;
        Ok(Self { store, secrets })
    }

    fn entry_path(dir: &Path, key: &str) -> Result<PathBuf, KvsError> {
        if key.is_empty() || key.contains(['/', '\\']) {
            return Err(KvsError::InvalidKey(format!(
                "key {key:?} is not a valid file store key"
            )));
        }
        Ok(dir.join(key))
    }

    fn read(dir: &Path, key: &str) -> Result<Option<String>, KvsError> {
        let path = Self::entry_path(dir, key)?;
        match fs::read_to_string(&path) {
            Ok(value) => Ok(Some(value)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }
}

impl Kvs for FileKvs {
    fn get(&self, key: &str) -> Result<Option<String>, KvsError> {
        Self::read(&self.store, key)
    }

    fn set(&self, key: &str, value: &str) -> Result<(), KvsError> {
        let path = Self::entry_path(&self.store, key)?;
        fs::write(path, value)?;
        Ok(())
    }

    fn get_secret(&self, key: &str) -> Result<Option<String>, KvsError> {
        Self::read(&self.secrets, key)
    }

    fn set_secret(&self, key: &str, value: &str) -> Result<(), KvsError> {
        let path = Self::entry_path(&self.secrets, key)?;
        fs::write(&path, value)?;
        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            fs::set_permissions(&path, fs::Permissions::from_mode(0o600))?;
        }
        Ok(())
    }

    fn delete(&self, key: &str) -> Result<(), KvsError> {
        let path = Self::entry_path(&self.store, key)?;
        match fs::remove_file(&path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => {
                tracing::error!("unable to delete store entry {key}: {e}");
                Err(e.into())
            }
        }
    }

    fn query_prefix(&self, prefix: &str, limit: usize) -> Result<Vec<KvsEntry>, KvsError> {
        let mut keys = Vec::new();
        for entry in fs::read_dir(&self.store)? {
            let entry = entry?;
            let name = entry.file_name().to_string_lossy().into_owned();
            if name.starts_with(prefix) {
                keys.push(name);
            }
        }

        // Deterministic scan order keeps paging stable.
        keys.sort();
        keys.truncate(limit);

        let mut entries = Vec::with_capacity(keys.len());
        for key in keys {
            if let Some(value) = Self::read(&self.store, &key)? {
                entries.push(KvsEntry { key, value });
            }
        }
        Ok(entries)
    }
}
