//! Attachment import and export flows.
//!
//! Three entry points create pages from attachments:
//!
//! - [`ImportService::import_attachment`]: event-driven; lands in the global
//!   default space, records a link for later cleanup, and leaves an
//!   internal comment on the issue
//! - [`ImportService::export_to_default_space`]: user-driven export to the
//!   global default space
//! - [`ImportService::export_to_personal_space`]: user-driven export to the
//!   user's configured (possibly remote) instance

use std::sync::Arc;
use std::time::{SystemTime, UNIX_EPOCH};

use tracing::{debug, info, warn};

use adfi_confluence::{
    ConfluenceError, CreatePageRequest, CreatedPage, RemoteInstance, page_title,
};
use adfi_jira::JiraError;
use adfi_storage::{KvsError, LinkRepository, PageAttachmentLink, SettingsRepository, Space};

use crate::adf::AdfDocument;
use crate::clients::{AttachmentClient, CommentClient, PageClient, PageCreator};
use crate::validator::PageValidator;

/// MIME types accepted by the event-driven import.
const IMPORTABLE_MIME_TYPES: [&str; 2] = ["text/plain", "binary/octet-stream"];

/// True when an attachment with this MIME type should be imported.
#[must_use]
pub fn is_importable_mime(mime_type: &str) -> bool {
    IMPORTABLE_MIME_TYPES.contains(&mime_type)
}

/// Attachment details carried by a creation event.
#[derive(Debug, Clone)]
pub struct IncomingAttachment {
    /// Attachment id.
    pub id: String,
    /// Owning issue id.
    pub issue_id: String,
    /// Original file name.
    pub file_name: String,
    /// Creation timestamp as reported by the event.
    pub create_date: String,
}

/// Error from an import or export flow.
///
/// These are raised to the immediate caller: event handlers log and discard
/// them, user-invoked exports surface them to the user.
#[derive(Debug, thiserror::Error)]
pub enum ImportError {
    /// No global default space has been configured.
    #[error("no global space setting found")]
    NoGlobalSpace,

    /// The user has no personal settings stored.
    #[error("no personal space settings found for user")]
    NoPersonalSettings,

    /// Attachment content did not validate as storage format.
    #[error("invalid document format")]
    InvalidFormat,

    /// Confluence call failed.
    #[error(transparent)]
    Confluence(#[from] ConfluenceError),

    /// Jira call failed.
    #[error(transparent)]
    Jira(#[from] JiraError),

    /// Link record could not be stored.
    #[error(transparent)]
    Storage(#[from] KvsError),
}

/// Creates pages from attachments and records what it created.
pub struct ImportService {
    links: LinkRepository,
    settings: SettingsRepository,
    attachments: Arc<dyn AttachmentClient>,
    pages: Arc<dyn PageClient>,
    comments: Arc<dyn CommentClient>,
}

impl ImportService {
    /// Create a service over the given repositories and clients.
    #[must_use]
    pub fn new(
        links: LinkRepository,
        settings: SettingsRepository,
        attachments: Arc<dyn AttachmentClient>,
        pages: Arc<dyn PageClient>,
        comments: Arc<dyn CommentClient>,
    ) -> Self {
        Self {
            links,
            settings,
            attachments,
            pages,
            comments,
        }
    }

    /// Import an attachment announced by a creation event.
    ///
    /// Creates a page in the global default space (nested under the space
    /// homepage when one is configured), records the page/attachment link,
    /// and leaves an internal comment on the issue pointing at the page.
    ///
    /// # Errors
    ///
    /// Returns [`ImportError`] when no global space is configured, the
    /// content is not storage format, or a remote call fails. Saving the
    /// link or creating the comment failing after the page exists also
    /// errors; the created page is not rolled back.
    pub fn import_attachment(
        &self,
        attachment: &IncomingAttachment,
    ) -> Result<CreatedPage, ImportError> {
        let space = self.require_global_space()?;

        let content = self.attachments.content(&attachment.id)?;

        if !PageValidator::StorageFormat.validate(&content) {
            info!("Ignoring attachment {}: invalid document format", attachment.id);
            return Err(ImportError::InvalidFormat);
        }

        let title = format!(
            "{} - {} - {}",
            attachment.file_name, attachment.issue_id, attachment.create_date
        );
        let parent_id = space.homepage.as_ref().map(|h| h.id.to_string());
        let request = CreatePageRequest::new(space.id.to_string(), title, content, parent_id);

        let creator = PageCreator::Local(Arc::clone(&self.pages));
        let page = creator.create_page(&request)?;
        info!(
            "Created page {} for attachment {}",
            page.id, attachment.id
        );

        self.links.save(&PageAttachmentLink {
            issue_id: attachment.issue_id.clone(),
            attachment_id: attachment.id.clone(),
            page_id: page.id.clone(),
        })?;

        let notice = AdfDocument::imported_notice(page.web_url().as_deref());
        self.comments
            .create_internal_comment(&attachment.issue_id, &notice)?;
        info!("Created comment for attachment {}", attachment.id);

        Ok(page)
    }

    /// Export one attachment to the global default space on user request.
    ///
    /// # Errors
    ///
    /// Returns [`ImportError`] when no global space is configured or a
    /// remote call fails; errors are surfaced to the requesting user.
    pub fn export_to_default_space(
        &self,
        attachment_id: &str,
        issue_key: Option<&str>,
    ) -> Result<CreatedPage, ImportError> {
        debug!("Exporting attachment {attachment_id} to the default space");

        let space = self.require_global_space()?;
        let (file_name, content) = self.fetch_attachment(attachment_id)?;

        let title = page_title(
            file_name.as_deref(),
            issue_key,
            Some(attachment_id),
            timestamp_ms(),
        );
        let request = CreatePageRequest::new(space.id.to_string(), title, content, None);

        let creator = PageCreator::Local(Arc::clone(&self.pages));
        Ok(creator.create_page(&request)?)
    }

    /// Export one attachment to the requesting user's personal space,
    /// which may live on a remote instance.
    ///
    /// # Errors
    ///
    /// Returns [`ImportError`] when the user has no personal settings or a
    /// remote call fails; errors are surfaced to the requesting user.
    pub fn export_to_personal_space(
        &self,
        account_id: &str,
        attachment_id: &str,
        issue_key: Option<&str>,
    ) -> Result<CreatedPage, ImportError> {
        debug!("Exporting attachment {attachment_id} to a personal space");

        let settings = self
            .settings
            .get_personal(account_id)?
            .ok_or(ImportError::NoPersonalSettings)?;

        let (file_name, content) = self.fetch_attachment(attachment_id)?;

        let title = page_title(
            file_name.as_deref(),
            issue_key,
            Some(attachment_id),
            timestamp_ms(),
        );
        let request = CreatePageRequest::new(settings.space.id.clone(), title, content, None);

        let creator = PageCreator::Remote(RemoteInstance::from_settings(&settings));
        Ok(creator.create_page(&request)?)
    }

    fn require_global_space(&self) -> Result<Space, ImportError> {
        self.settings
            .get_global()?
            .ok_or(ImportError::NoGlobalSpace)
    }

    /// Fetch content (required) and file name (best-effort) for an export.
    fn fetch_attachment(
        &self,
        attachment_id: &str,
    ) -> Result<(Option<String>, String), ImportError> {
        let file_name = match self.attachments.metadata(attachment_id) {
            Ok(metadata) => Some(metadata.filename),
            Err(e) => {
                warn!("Unable to fetch metadata for attachment {attachment_id}: {e}");
                None
            }
        };

        let content = self.attachments.content(attachment_id)?;

        // Exports run the Noop validator: the user asked for this specific
        // attachment, so format problems surface from Confluence instead.
        if !PageValidator::Noop.validate(&content) {
            return Err(ImportError::InvalidFormat);
        }

        Ok((file_name, content))
    }
}

/// Milliseconds since the Unix epoch.
fn timestamp_ms() -> u128 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis())
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;

    use pretty_assertions::assert_eq;

    use adfi_jira::AttachmentMetadata;
    use adfi_storage::{Kvs, KvsExt, MemoryKvs, SpaceHomepage, SpaceId};

    use super::*;

    /// Attachment double serving fixed content.
    struct FakeAttachments {
        content: String,
        metadata_fails: bool,
    }

    impl AttachmentClient for FakeAttachments {
        fn content(&self, _attachment_id: &str) -> Result<String, JiraError> {
            Ok(self.content.clone())
        }

        fn metadata(&self, attachment_id: &str) -> Result<AttachmentMetadata, JiraError> {
            if self.metadata_fails {
                return Err(JiraError::HttpResponse {
                    status: 404,
                    endpoint: "attachment".to_owned(),
                    body: "gone".to_owned(),
                });
            }
            Ok(AttachmentMetadata {
                id: attachment_id.parse().unwrap_or_default(),
                filename: "notes.txt".to_owned(),
                mime_type: "text/plain".to_owned(),
                created: None,
            })
        }
    }

    /// Page client double returning a canned page and capturing requests.
    #[derive(Default)]
    struct FakePages {
        requests: Mutex<Vec<CreatePageRequest>>,
    }

    impl PageClient for FakePages {
        fn create_page(&self, request: &CreatePageRequest) -> Result<CreatedPage, ConfluenceError> {
            self.requests.lock().unwrap().push(request.clone());
            Ok(CreatedPage {
                id: "30001".to_owned(),
                title: Some(request.title.clone()),
                space_id: Some(request.space_id.clone()),
                links: None,
            })
        }

        fn delete_page(&self, _page_id: &str) -> Result<(), ConfluenceError> {
            unreachable!("import never deletes pages")
        }
    }

    /// Comment client double recording created notices.
    #[derive(Default)]
    struct FakeComments {
        created: Mutex<Vec<String>>,
    }

    impl CommentClient for FakeComments {
        fn list_comments(&self, _issue_id: &str) -> Result<adfi_jira::CommentPage, JiraError> {
            unreachable!("import never lists comments")
        }

        fn create_internal_comment(
            &self,
            issue_id: &str,
            _body: &AdfDocument,
        ) -> Result<(), JiraError> {
            self.created.lock().unwrap().push(issue_id.to_owned());
            Ok(())
        }

        fn delete_comment(&self, _issue_id: &str, _comment_id: &str) -> Result<(), JiraError> {
            unreachable!("import never deletes comments")
        }
    }

    fn space(with_homepage: bool) -> Space {
        Space {
            id: SpaceId::Str("635502596".to_owned()),
            key: "IMP".to_owned(),
            name: "Imports".to_owned(),
            status: "current".to_owned(),
            icon: None,
            homepage: with_homepage.then(|| SpaceHomepage {
                id: SpaceId::Str("635503984".to_owned()),
            }),
        }
    }

    fn attachment() -> IncomingAttachment {
        IncomingAttachment {
            id: "20001".to_owned(),
            issue_id: "10001".to_owned(),
            file_name: "notes.txt".to_owned(),
            create_date: "2024-01-01T00:00:00Z".to_owned(),
        }
    }

    struct Fixture {
        store: Arc<MemoryKvs>,
        pages: Arc<FakePages>,
        comments: Arc<FakeComments>,
        service: ImportService,
    }

    fn fixture(content: &str) -> Fixture {
        let store = Arc::new(MemoryKvs::new());
        let pages = Arc::new(FakePages::default());
        let comments = Arc::new(FakeComments::default());

        let service = ImportService::new(
            LinkRepository::new(Arc::clone(&store) as Arc<dyn Kvs>),
            SettingsRepository::new(Arc::clone(&store) as Arc<dyn Kvs>),
            Arc::new(FakeAttachments {
                content: content.to_owned(),
                metadata_fails: false,
            }),
            Arc::clone(&pages) as Arc<dyn PageClient>,
            Arc::clone(&comments) as Arc<dyn CommentClient>,
        );

        Fixture {
            store,
            pages,
            comments,
            service,
        }
    }

    fn set_global(f: &Fixture, with_homepage: bool) {
        SettingsRepository::new(Arc::clone(&f.store) as Arc<dyn Kvs>)
            .save_global(&space(with_homepage))
            .unwrap();
    }

    #[test]
    fn test_import_creates_page_link_and_comment() {
        let f = fixture("<p>imported</p>");
        set_global(&f, true);

        let page = f.service.import_attachment(&attachment()).unwrap();
        assert_eq!(page.id, "30001");

        // Page request targeted the configured space under its homepage
        let requests = f.pages.requests.lock().unwrap();
        assert_eq!(requests.len(), 1);
        assert_eq!(requests[0].space_id, "635502596");
        assert_eq!(requests[0].parent_id.as_deref(), Some("635503984"));
        assert_eq!(
            requests[0].title,
            "notes.txt - 10001 - 2024-01-01T00:00:00Z"
        );
        drop(requests);

        // Link recorded under the composite key
        let link: PageAttachmentLink = f
            .store
            .get_json("pageStorage-10001-20001")
            .unwrap()
            .unwrap();
        assert_eq!(link.page_id, "30001");

        // Internal comment left on the issue
        assert_eq!(*f.comments.created.lock().unwrap(), vec!["10001"]);
    }

    #[test]
    fn test_import_without_global_space_fails_before_any_call() {
        let f = fixture("<p>imported</p>");

        let err = f.service.import_attachment(&attachment()).unwrap_err();
        assert!(matches!(err, ImportError::NoGlobalSpace));
        assert!(f.pages.requests.lock().unwrap().is_empty());
    }

    #[test]
    fn test_import_rejects_malformed_content() {
        let f = fixture("<p>unclosed<div></p>");
        set_global(&f, false);

        let err = f.service.import_attachment(&attachment()).unwrap_err();
        assert!(matches!(err, ImportError::InvalidFormat));
        assert!(f.pages.requests.lock().unwrap().is_empty());
        assert!(f.store.is_empty());
    }

    #[test]
    fn test_export_to_default_space_titles_with_issue_key() {
        let f = fixture("<p>exported</p>");
        set_global(&f, false);

        f.service
            .export_to_default_space("20001", Some("PROJ-1"))
            .unwrap();

        let requests = f.pages.requests.lock().unwrap();
        assert!(requests[0].title.starts_with("notes.txt - PROJ-1 - "));
        assert_eq!(requests[0].parent_id, None);
    }

    #[test]
    fn test_export_to_default_space_without_setting_fails() {
        let f = fixture("<p>exported</p>");
        assert!(matches!(
            f.service.export_to_default_space("20001", None),
            Err(ImportError::NoGlobalSpace)
        ));
    }

    #[test]
    fn test_export_tolerates_missing_metadata() {
        let store = Arc::new(MemoryKvs::new());
        let pages = Arc::new(FakePages::default());

        let service = ImportService::new(
            LinkRepository::new(Arc::clone(&store) as Arc<dyn Kvs>),
            SettingsRepository::new(Arc::clone(&store) as Arc<dyn Kvs>),
            Arc::new(FakeAttachments {
                content: "<p>x</p>".to_owned(),
                metadata_fails: true,
            }),
            Arc::clone(&pages) as Arc<dyn PageClient>,
            Arc::new(FakeComments::default()) as Arc<dyn CommentClient>,
        );
        SettingsRepository::new(Arc::clone(&store) as Arc<dyn Kvs>)
            .save_global(&space(false))
            .unwrap();

        service.export_to_default_space("20001", None).unwrap();

        // Falls back to the attachment id identifier
        let requests = pages.requests.lock().unwrap();
        assert!(requests[0].title.starts_with("Exported page - "));
    }

    #[test]
    fn test_export_to_personal_space_requires_settings() {
        let f = fixture("<p>x</p>");
        assert!(matches!(
            f.service
                .export_to_personal_space("1234567890", "20001", None),
            Err(ImportError::NoPersonalSettings)
        ));
    }

    #[test]
    fn test_importable_mime_gate() {
        assert!(is_importable_mime("text/plain"));
        assert!(is_importable_mime("binary/octet-stream"));
        assert!(!is_importable_mime("image/png"));
        assert!(!is_importable_mime("application/pdf"));
    }
}
