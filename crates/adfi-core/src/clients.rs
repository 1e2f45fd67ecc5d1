//! Collaborator contracts consumed by the services.
//!
//! The services only need a sliver of what the REST clients expose. These
//! traits pin down that sliver so services can be exercised against
//! in-memory doubles, with impls wiring in the real clients. On top of the
//! contracts sits [`PageCreator`], the capability deciding where (and as
//! whom) a page gets created.

use std::sync::Arc;

use adfi_confluence::{
    ConfluenceClient, ConfluenceError, CreatePageRequest, CreatedPage, RemoteInstance,
};
use adfi_jira::{AttachmentMetadata, CommentPage, JiraClient, JiraError};

use crate::adf::AdfDocument;

/// Create/delete pages on the local Confluence instance.
pub trait PageClient: Send + Sync {
    /// Create a page.
    ///
    /// # Errors
    ///
    /// Returns [`ConfluenceError`] when the request fails or is rejected.
    fn create_page(&self, request: &CreatePageRequest) -> Result<CreatedPage, ConfluenceError>;

    /// Delete a page by id.
    ///
    /// # Errors
    ///
    /// Returns [`ConfluenceError`] when the request fails or is rejected.
    fn delete_page(&self, page_id: &str) -> Result<(), ConfluenceError>;
}

impl PageClient for ConfluenceClient {
    fn create_page(&self, request: &CreatePageRequest) -> Result<CreatedPage, ConfluenceError> {
        ConfluenceClient::create_page(self, request)
    }

    fn delete_page(&self, page_id: &str) -> Result<(), ConfluenceError> {
        ConfluenceClient::delete_page(self, page_id)
    }
}

/// List, create and delete comments on a Jira issue.
pub trait CommentClient: Send + Sync {
    /// List the comments on an issue.
    ///
    /// # Errors
    ///
    /// Returns [`JiraError`] when the request fails.
    fn list_comments(&self, issue_id: &str) -> Result<CommentPage, JiraError>;

    /// Create an internal (non-public) comment on an issue.
    ///
    /// # Errors
    ///
    /// Returns [`JiraError`] when the request fails.
    fn create_internal_comment(
        &self,
        issue_id: &str,
        body: &AdfDocument,
    ) -> Result<(), JiraError>;

    /// Delete one comment from an issue.
    ///
    /// # Errors
    ///
    /// Returns [`JiraError`] when the request fails.
    fn delete_comment(&self, issue_id: &str, comment_id: &str) -> Result<(), JiraError>;
}

impl CommentClient for JiraClient {
    fn list_comments(&self, issue_id: &str) -> Result<CommentPage, JiraError> {
        JiraClient::get_comments(self, issue_id)
    }

    fn create_internal_comment(&self, issue_id: &str, body: &AdfDocument) -> Result<(), JiraError> {
        JiraClient::create_internal_comment(self, issue_id, body)
    }

    fn delete_comment(&self, issue_id: &str, comment_id: &str) -> Result<(), JiraError> {
        JiraClient::delete_comment(self, issue_id, comment_id)
    }
}

/// Fetch attachment content and metadata.
pub trait AttachmentClient: Send + Sync {
    /// Raw attachment content as text.
    ///
    /// # Errors
    ///
    /// Returns [`JiraError`] when the request fails.
    fn content(&self, attachment_id: &str) -> Result<String, JiraError>;

    /// Attachment metadata.
    ///
    /// # Errors
    ///
    /// Returns [`JiraError`] when the request fails.
    fn metadata(&self, attachment_id: &str) -> Result<AttachmentMetadata, JiraError>;
}

impl AttachmentClient for JiraClient {
    fn content(&self, attachment_id: &str) -> Result<String, JiraError> {
        self.get_attachment_content(attachment_id)
    }

    fn metadata(&self, attachment_id: &str) -> Result<AttachmentMetadata, JiraError> {
        self.get_attachment_metadata(attachment_id)
    }
}

/// Where, and as whom, a page gets created.
///
/// Callers pick the variant explicitly: the local instance acting as the
/// application, or a remote instance acting as a specific user.
pub enum PageCreator {
    /// Local instance, authenticated as the application.
    Local(Arc<dyn PageClient>),
    /// Remote instance, authenticated as a user.
    Remote(RemoteInstance),
}

impl PageCreator {
    /// Create a page through the selected variant.
    ///
    /// # Errors
    ///
    /// Returns [`ConfluenceError`] when the request fails or the instance
    /// rejects the page.
    pub fn create_page(&self, request: &CreatePageRequest) -> Result<CreatedPage, ConfluenceError> {
        match self {
            Self::Local(client) => client.create_page(request),
            Self::Remote(remote) => remote.create_page(request),
        }
    }
}
