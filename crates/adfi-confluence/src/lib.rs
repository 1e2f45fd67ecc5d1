//! Confluence integration for adfi.
//!
//! This crate provides the outbound Confluence surface:
//! - [`ConfluenceClient`]: REST API client for the local instance,
//!   authenticated as the application
//! - [`RemoteInstance`]: page creation on another instance with a user's
//!   stored credentials and body replacements
//!
//! # API Client
//!
//! ```ignore
//! use adfi_confluence::{ConfluenceClient, CreatePageRequest};
//!
//! let client = ConfluenceClient::new(
//!     "https://your-site.atlassian.net",
//!     "bot@example.com",
//!     "api-token",
//! );
//!
//! let page = client.create_page(&CreatePageRequest::new(
//!     "635502596",
//!     "notes.txt - PROJ-1 - 1700000000000",
//!     "<p>imported</p>",
//!     None,
//! ))?;
//! println!("Created page {}", page.id);
//! ```

mod auth;

// API client
mod client;
pub use client::ConfluenceClient;

// Remote page creation
mod creator;
pub use creator::RemoteInstance;

// Page titles
mod title;
pub use title::page_title;

// Types
mod types;
pub use types::{CreatePageRequest, CreatedPage, CreatedPageLinks, PageBody};

// Errors
pub mod error;
pub use error::ConfluenceError;
