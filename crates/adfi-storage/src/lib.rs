//! Key-value storage for adfi.
//!
//! This crate provides the [`Kvs`] trait for abstracting the key-value
//! service that backs page links and settings, along with the repositories
//! built on top of it. The abstraction enables:
//!
//! - **Unit testing** without a real store ([`MemoryKvs`] behind the `mock`
//!   feature)
//! - **Backend flexibility** (file-based today, a managed service tomorrow)
//! - **Clean separation** between record semantics and I/O
//!
//! # Architecture
//!
//! - [`Kvs`] trait with plain and secret-grade get/set/delete plus a bounded
//!   prefix query
//! - [`FileKvs`] file-per-entry implementation
//! - [`KvsExt`] extension trait with typed JSON accessors
//! - [`LinkRepository`] for page/attachment link records
//! - [`SettingsRepository`] for the global space and personal settings
//!
//! # Example
//!
//! ```ignore
//! use std::sync::Arc;
//! use adfi_storage::{FileKvs, LinkRepository, PageAttachmentLink};
//!
//! let store = Arc::new(FileKvs::open("data".into())?);
//! let links = LinkRepository::new(store);
//! links.save(&PageAttachmentLink {
//!     issue_id: "10001".into(),
//!     attachment_id: "20001".into(),
//!     page_id: "30001".into(),
//! })?;
//! ```

mod ext;
mod file;
mod key;
mod kvs;
mod links;
#[cfg(any(test, feature = "mock"))]
mod memory;
mod settings;

pub use ext::KvsExt;
pub use file::FileKvs;
pub use key::build_key;
pub use kvs::{Kvs, KvsEntry, KvsError};
pub use links::{LinkRepository, PageAttachmentLink};
#[cfg(any(test, feature = "mock"))]
pub use memory::MemoryKvs;
pub use settings::{
    Authentication, PersonalSettings, Replacement, SettingsRepository, Space, SpaceHomepage,
    SpaceIcon, SpaceId, SpaceRef,
};
