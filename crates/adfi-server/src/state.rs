//! Application state.
//!
//! Shared state for all request handlers. Every collaborator is
//! constructed here and injected explicitly; nothing is a process-wide
//! singleton.

use std::sync::Arc;

use adfi_config::Config;
use adfi_confluence::ConfluenceClient;
use adfi_core::{AttachmentClient, CleanupService, CommentClient, ImportService, PageClient};
use adfi_jira::JiraClient;
use adfi_storage::{FileKvs, Kvs, LinkRepository, SettingsRepository};

use crate::ServeError;

/// Application state shared across all handlers.
pub(crate) struct AppState {
    /// Attachment import/export flows.
    pub(crate) import: ImportService,
    /// Issue teardown flows.
    pub(crate) cleanup: CleanupService,
    /// Settings records.
    pub(crate) settings: SettingsRepository,
    /// Confluence client, for the space search proxy.
    pub(crate) confluence: Arc<ConfluenceClient>,
}

impl AppState {
    /// Construct all clients, repositories and services from config.
    pub(crate) fn from_config(config: &Config) -> Result<Self, ServeError> {
        let jira_config = config.require_jira()?;
        let confluence_config = config.require_confluence()?;

        let jira = Arc::new(JiraClient::new(
            &jira_config.base_url,
            &jira_config.email,
            &jira_config.api_token,
        ));
        let confluence = Arc::new(ConfluenceClient::new(
            &confluence_config.base_url,
            &confluence_config.email,
            &confluence_config.api_token,
        ));

        let store: Arc<dyn Kvs> =
            Arc::new(FileKvs::open(config.storage_resolved.data_dir.clone())?);

        let import = ImportService::new(
            LinkRepository::new(Arc::clone(&store)),
            SettingsRepository::new(Arc::clone(&store)),
            Arc::clone(&jira) as Arc<dyn AttachmentClient>,
            Arc::clone(&confluence) as Arc<dyn PageClient>,
            Arc::clone(&jira) as Arc<dyn CommentClient>,
        );
        let cleanup = CleanupService::new(
            LinkRepository::new(Arc::clone(&store)),
            Arc::clone(&confluence) as Arc<dyn PageClient>,
            Arc::clone(&jira) as Arc<dyn CommentClient>,
        );

        Ok(Self {
            import,
            cleanup,
            settings: SettingsRepository::new(store),
            confluence,
        })
    }
}
