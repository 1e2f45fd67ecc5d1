//! Best-effort teardown of imported artifacts.
//!
//! When a source attachment or issue goes away, every page created from it
//! and every comment this application left behind should go too. Cleanup is
//! best-effort by design: individual failures are tallied and logged, never
//! raised, and retry is driven by re-delivery of the triggering event.

use std::sync::Arc;

use tracing::{debug, error};

use adfi_confluence::ConfluenceError;
use adfi_jira::Comment;
use adfi_storage::{KvsError, LinkRepository};

use crate::clients::{CommentClient, PageClient};
use crate::settle::{Tally, settle_all};

/// Display name this application's comments carry.
pub const APP_DISPLAY_NAME: &str = "adf-importer";

/// Account type of application-authored comments.
pub const APP_ACCOUNT_TYPE: &str = "app";

/// Error from a single cleanup step.
#[derive(Debug, thiserror::Error)]
pub enum CleanupError {
    /// Remote page deletion failed.
    #[error("page deletion failed")]
    Page(#[from] ConfluenceError),

    /// Link record access failed.
    #[error("link record access failed")]
    Storage(#[from] KvsError),
}

/// Aggregate outcome of one full-issue cleanup.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CleanupReport {
    /// Page + link deletions.
    pub pages: Tally,
    /// Application-comment deletions.
    pub comments: Tally,
}

/// Removes pages, link records and application comments for an issue.
pub struct CleanupService {
    links: LinkRepository,
    pages: Arc<dyn PageClient>,
    comments: Arc<dyn CommentClient>,
}

impl CleanupService {
    /// Create a service over the given repository and clients.
    #[must_use]
    pub fn new(
        links: LinkRepository,
        pages: Arc<dyn PageClient>,
        comments: Arc<dyn CommentClient>,
    ) -> Self {
        Self {
            links,
            pages,
            comments,
        }
    }

    /// Remove the page created for one attachment, then its link record.
    ///
    /// No link is a no-op, not an error — deletion events race with other
    /// cleanup paths, and a page may never have been created for the
    /// attachment. The link record is deleted only after the page deletion
    /// succeeded, so a failed delete leaves the record behind for a retry
    /// triggered by a later identical event.
    ///
    /// # Errors
    ///
    /// Returns [`CleanupError`] when the page or link deletion fails.
    pub fn cleanup_one(&self, issue_id: &str, attachment_id: &str) -> Result<(), CleanupError> {
        debug!("Starting cleanup for issue {issue_id} and attachment {attachment_id}");

        let Some(link) = self.links.get(issue_id, attachment_id)? else {
            debug!("No cleanup required for attachment {attachment_id}");
            return Ok(());
        };

        self.pages.delete_page(&link.page_id)?;
        self.links.delete(issue_id, &link.page_id)?;
        Ok(())
    }

    /// Remove every page created for an issue and every comment this
    /// application authored on it.
    ///
    /// Page+link pairs are deleted independently and concurrently; one
    /// failure never aborts the others. The comment pass runs after the
    /// page pass and settles the same way. Both tallies are logged and
    /// returned — never raised, so the triggering event pipeline cannot be
    /// blocked by partial failure.
    pub fn cleanup_all(&self, issue_id: &str) -> CleanupReport {
        debug!("Starting cleanup for issue {issue_id}");

        let links = match self.links.get_all(issue_id) {
            Ok(links) => links,
            Err(e) => {
                error!("Unable to list page links for issue {issue_id}: {e}");
                Vec::new()
            }
        };

        let settled = settle_all(&links, |link| {
            self.cleanup_one(issue_id, &link.attachment_id)
        });
        let pages = settled.tally();
        for e in &settled.failed {
            debug!("Page cleanup failure for issue {issue_id}: {e}");
        }
        log_tally("pages", issue_id, pages);

        let comments = self.remove_app_comments(issue_id);

        CleanupReport { pages, comments }
    }

    /// Delete the comments this application previously left on the issue.
    fn remove_app_comments(&self, issue_id: &str) -> Tally {
        debug!("Removing comments for issue {issue_id}");

        let page = match self.comments.list_comments(issue_id) {
            Ok(page) => page,
            Err(e) => {
                error!("Unable to list comments for issue {issue_id}: {e}");
                return Tally::default();
            }
        };
        debug!("Retrieved {} comments", page.comments.len());

        let app_comments: Vec<&Comment> = page
            .comments
            .iter()
            .filter(|comment| {
                comment.author.account_type == APP_ACCOUNT_TYPE
                    && comment.author.display_name == APP_DISPLAY_NAME
            })
            .collect();
        debug!("Found {} comments to delete", app_comments.len());

        let settled = settle_all(app_comments, |comment| {
            self.comments.delete_comment(issue_id, &comment.id)
        });
        let tally = settled.tally();
        log_tally("comments", issue_id, tally);
        tally
    }
}

/// Log one settled pass, escalating to error when anything failed.
fn log_tally(what: &str, issue_id: &str, tally: Tally) {
    if tally.failed > 0 {
        error!(
            "Failed to clean up {} {what} for issue {issue_id}, successfully cleaned up {} {what}",
            tally.failed, tally.successful
        );
    } else {
        debug!(
            "Finished cleanup for issue {issue_id}, successfully cleaned up {} {what}",
            tally.successful
        );
    }
}
