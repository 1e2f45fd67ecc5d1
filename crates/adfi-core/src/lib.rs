//! Import and cleanup services for adfi.
//!
//! This crate holds the application logic between the event layer and the
//! REST clients:
//!
//! - [`ImportService`]: turns a Jira attachment into a Confluence page, a
//!   link record, and an internal Jira comment
//! - [`CleanupService`]: best-effort teardown of everything derived from an
//!   issue
//! - [`settle_all`]: the concurrent map-then-tally primitive both cleanup
//!   passes use
//! - [`PageValidator`]: storage-format gate for imported content
//!
//! The REST clients are consumed through the narrow [`PageClient`],
//! [`CommentClient`] and [`AttachmentClient`] contracts so services stay
//! testable without a network.

mod adf;
mod cleanup;
mod clients;
mod import;
mod settle;
mod validator;

pub use adf::AdfDocument;
pub use cleanup::{APP_ACCOUNT_TYPE, APP_DISPLAY_NAME, CleanupError, CleanupReport, CleanupService};
pub use clients::{AttachmentClient, CommentClient, PageClient, PageCreator};
pub use import::{ImportError, ImportService, IncomingAttachment, is_importable_mime};
pub use settle::{Settled, Tally, settle_all};
pub use validator::PageValidator;
