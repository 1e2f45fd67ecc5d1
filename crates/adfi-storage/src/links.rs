//! Page/attachment link records.
//!
//! A [`PageAttachmentLink`] ties a source Jira attachment to the Confluence
//! page created from it. The record exists so cleanup can find and delete
//! the page when the attachment or its issue goes away; it is deleted once
//! the remote page is confirmed gone.

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::ext::KvsExt;
use crate::key::build_key;
use crate::kvs::{Kvs, KvsError};

/// Key prefix for link records.
const KEY_PREFIX: &str = "pageStorage";

/// Page size for the per-issue prefix scan.
const SCAN_LIMIT: usize = 50;

/// Durable association between a source attachment and a created page.
///
/// All fields are non-empty strings free of the `-` key delimiter. The pair
/// (`issue_id`, `attachment_id`) addresses one storage slot; a repeated save
/// for the same pair overwrites it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PageAttachmentLink {
    /// Identifier of the owning issue.
    pub issue_id: String,
    /// Identifier of the source attachment.
    pub attachment_id: String,
    /// Identifier of the created destination page.
    pub page_id: String,
}

impl PageAttachmentLink {
    fn validate(&self) -> Result<(), KvsError> {
        for (field, value) in [
            ("issueId", &self.issue_id),
            ("attachmentId", &self.attachment_id),
            ("pageId", &self.page_id),
        ] {
            if value.is_empty() {
                return Err(KvsError::InvalidRecord(format!("{field} cannot be empty")));
            }
            if value.contains('-') {
                return Err(KvsError::InvalidRecord(format!(
                    "{field} cannot contain '-'"
                )));
            }
        }
        Ok(())
    }
}

/// Repository for [`PageAttachmentLink`] records.
///
/// Records live under `pageStorage-{issueId}-{attachmentId}`; all links of
/// one issue are found with a begins-with scan on `pageStorage-{issueId}`.
pub struct LinkRepository {
    store: Arc<dyn Kvs>,
}

impl LinkRepository {
    /// Create a repository over the given store.
    #[must_use]
    pub fn new(store: Arc<dyn Kvs>) -> Self {
        Self { store }
    }

    /// Store a link, overwriting any previous record for the same
    /// (issue, attachment) pair.
    ///
    /// # Errors
    ///
    /// Returns [`KvsError::InvalidRecord`] when a field is empty or contains
    /// the key delimiter (nothing is written), or a store error on write
    /// failure.
    pub fn save(&self, link: &PageAttachmentLink) -> Result<(), KvsError> {
        link.validate()?;
        let key = build_key(KEY_PREFIX, &[&link.issue_id, &link.attachment_id])?;

        self.store.set_json(&key, link)?;

        debug!("page link stored: {}", link.page_id);
        Ok(())
    }

    /// Look up the link for one (issue, attachment) pair.
    ///
    /// An absent key or an unparseable stored value both read back as
    /// `Ok(None)`.
    ///
    /// # Errors
    ///
    /// Returns [`KvsError::InvalidKey`] for invalid arguments, or a store
    /// error on read failure.
    pub fn get(
        &self,
        issue_id: &str,
        attachment_id: &str,
    ) -> Result<Option<PageAttachmentLink>, KvsError> {
        let key = build_key(KEY_PREFIX, &[issue_id, attachment_id])?;
        self.store.get_json(&key)
    }

    /// Delete the link record at `pageStorage-{issueId}-{pageId}`.
    ///
    /// # Errors
    ///
    /// Store failures are logged and propagated; a later identical event can
    /// retry the same delete.
    pub fn delete(&self, issue_id: &str, page_id: &str) -> Result<(), KvsError> {
        let key = build_key(KEY_PREFIX, &[issue_id, page_id])?;
        debug!("deleting store entry: {key}");

        self.store.delete(&key).inspect_err(|e| {
            tracing::error!("unable to delete store entry {key}: {e}");
        })
    }

    /// All links recorded for one issue, in no particular order.
    ///
    /// Scans at most 50 keys; entries that fail to parse are skipped with a
    /// warning. No matches is an empty vec, not an error.
    ///
    /// # Errors
    ///
    /// Returns [`KvsError::InvalidKey`] for an invalid issue id, or a store
    /// error on scan failure.
    pub fn get_all(&self, issue_id: &str) -> Result<Vec<PageAttachmentLink>, KvsError> {
        let prefix = build_key(KEY_PREFIX, &[issue_id])?;
        debug!("querying for page links with key: {prefix}");

        let entries = self.store.query_prefix(&prefix, SCAN_LIMIT)?;

        let mut links = Vec::with_capacity(entries.len());
        for entry in entries {
            match serde_json::from_str::<PageAttachmentLink>(&entry.value) {
                Ok(link) => links.push(link),
                Err(e) => warn!("skipping unparseable link at {}: {e}", entry.key),
            }
        }
        Ok(links)
    }
}
