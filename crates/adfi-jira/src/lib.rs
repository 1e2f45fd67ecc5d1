//! Jira integration for adfi.
//!
//! Provides [`JiraClient`], a sync REST client for the two Jira resources
//! the importer touches:
//!
//! - attachments: content and metadata by id
//! - issue comments: list, create (internal-visibility), delete
//!
//! ```ignore
//! use adfi_jira::JiraClient;
//!
//! let client = JiraClient::new(
//!     "https://your-site.atlassian.net",
//!     "bot@example.com",
//!     "api-token",
//! );
//! let text = client.get_attachment_content("12345")?;
//! ```

mod auth;
mod client;
mod error;
mod types;

pub use client::JiraClient;
pub use error::JiraError;
pub use types::{AttachmentMetadata, Comment, CommentAuthor, CommentPage};
