//! Jira webhook handlers.
//!
//! Each handler parses its event payload, decides applicability, and runs
//! the matching service call on the blocking pool. Nothing escapes the
//! handler boundary: malformed payloads and downstream failures are logged
//! and the response is `204 No Content` either way, leaving retry to the
//! event sender's re-delivery.

use std::sync::Arc;

use axum::body::Bytes;
use axum::extract::State;
use axum::http::StatusCode;
use serde::Deserialize;
use serde::de::DeserializeOwned;
use tracing::{debug, error, info, warn};

use adfi_core::{IncomingAttachment, is_importable_mime};

use crate::state::AppState;

/// Event type of attachment creation events.
const ATTACHMENT_CREATED: &str = "avi:jira:created:attachment";

/// Event type of attachment deletion events.
const ATTACHMENT_DELETED: &str = "avi:jira:deleted:attachment";

/// Event type of issue update events.
const ISSUE_UPDATED: &str = "avi:jira:updated:issue";

/// Event type of issue deletion events.
const ISSUE_DELETED: &str = "avi:jira:deleted:issue";

/// Status names treated as terminal for cleanup purposes.
const TERMINAL_STATUS_NAMES: [&str; 3] = ["Done", "Resolved", "Closed"];

/// Attachment details in an event payload.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct AttachmentPayload {
    pub(crate) id: String,
    pub(crate) issue_id: String,
    pub(crate) file_name: String,
    pub(crate) mime_type: String,
    pub(crate) create_date: String,
}

/// Issue details in an event payload.
#[derive(Debug, Deserialize)]
pub(crate) struct IssuePayload {
    pub(crate) id: String,
    pub(crate) key: String,
}

/// One changelog entry in an issue-updated payload.
#[derive(Debug, Deserialize)]
pub(crate) struct ChangelogItem {
    pub(crate) field: String,
    #[serde(rename = "fieldId", default)]
    pub(crate) field_id: Option<String>,
    #[serde(rename = "toString", default)]
    pub(crate) to_name: Option<String>,
}

/// Changelog in an issue-updated payload.
#[derive(Debug, Deserialize)]
pub(crate) struct ChangelogPayload {
    #[serde(default)]
    pub(crate) items: Vec<ChangelogItem>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct AttachmentCreatedEvent {
    event_type: String,
    attachment: AttachmentPayload,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct AttachmentDeletedEvent {
    event_type: String,
    attachment: AttachmentPayload,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct IssueUpdatedEvent {
    event_type: String,
    issue: IssuePayload,
    changelog: ChangelogPayload,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct IssueDeletedEvent {
    event_type: String,
    issue: IssuePayload,
}

/// Parse an event body, discarding payloads that don't validate.
fn parse_event<T: DeserializeOwned>(body: &Bytes) -> Option<T> {
    match serde_json::from_slice(body) {
        Ok(event) => Some(event),
        Err(e) => {
            warn!("Discarding malformed event payload: {e}");
            None
        }
    }
}

/// True when the received event type matches the expected one.
fn event_type_matches(received: &str, expected: &str) -> bool {
    // Event type casing has drifted between payload revisions
    // ("deleted:Attachment" vs "deleted:attachment"); accept both.
    if received.eq_ignore_ascii_case(expected) {
        true
    } else {
        warn!("Discarding event with unexpected type {received:?}");
        false
    }
}

/// True when a changelog item reports a transition into a terminal status.
pub(crate) fn is_terminal_transition(item: &ChangelogItem) -> bool {
    let field_matches = item.field.eq_ignore_ascii_case("status")
        || item.field.eq_ignore_ascii_case("resolution")
        || item
            .field_id
            .as_deref()
            .is_some_and(|id| id.eq_ignore_ascii_case("status"));

    field_matches
        && item.to_name.as_deref().is_some_and(|to| {
            TERMINAL_STATUS_NAMES
                .iter()
                .any(|name| name.eq_ignore_ascii_case(to))
        })
}

/// Handle POST /events/attachment-created.
pub(crate) async fn attachment_created(
    State(state): State<Arc<AppState>>,
    body: Bytes,
) -> StatusCode {
    let Some(event) = parse_event::<AttachmentCreatedEvent>(&body) else {
        return StatusCode::NO_CONTENT;
    };
    if !event_type_matches(&event.event_type, ATTACHMENT_CREATED) {
        return StatusCode::NO_CONTENT;
    }

    info!("Event received: {}", event.event_type);
    let attachment = event.attachment;

    if !is_importable_mime(&attachment.mime_type) {
        info!(
            "Ignoring attachment {} as it is not a text file",
            attachment.id
        );
        return StatusCode::NO_CONTENT;
    }

    let incoming = IncomingAttachment {
        id: attachment.id,
        issue_id: attachment.issue_id,
        file_name: attachment.file_name,
        create_date: attachment.create_date,
    };

    let result =
        tokio::task::spawn_blocking(move || state.import.import_attachment(&incoming)).await;
    match result {
        Ok(Ok(page)) => info!("Successfully created page {} from attachment", page.id),
        Ok(Err(e)) => error!("Unable to import attachment: {e}"),
        Err(e) => error!("Import task failed: {e}"),
    }

    StatusCode::NO_CONTENT
}

/// Handle POST /events/attachment-deleted.
pub(crate) async fn attachment_deleted(
    State(state): State<Arc<AppState>>,
    body: Bytes,
) -> StatusCode {
    let Some(event) = parse_event::<AttachmentDeletedEvent>(&body) else {
        return StatusCode::NO_CONTENT;
    };
    if !event_type_matches(&event.event_type, ATTACHMENT_DELETED) {
        return StatusCode::NO_CONTENT;
    }

    info!("Event received: {}", event.event_type);
    let attachment = event.attachment;

    let result = tokio::task::spawn_blocking(move || {
        state
            .cleanup
            .cleanup_one(&attachment.issue_id, &attachment.id)
    })
    .await;
    match result {
        Ok(Ok(())) => debug!("Attachment cleanup finished"),
        Ok(Err(e)) => error!("Error cleaning up attachment: {e}"),
        Err(e) => error!("Cleanup task failed: {e}"),
    }

    StatusCode::NO_CONTENT
}

/// Handle POST /events/issue-updated.
///
/// Runs full cleanup when the changelog reports a transition into a
/// terminal status; otherwise only logs the change.
pub(crate) async fn issue_updated(State(state): State<Arc<AppState>>, body: Bytes) -> StatusCode {
    let Some(event) = parse_event::<IssueUpdatedEvent>(&body) else {
        return StatusCode::NO_CONTENT;
    };
    if !event_type_matches(&event.event_type, ISSUE_UPDATED) {
        return StatusCode::NO_CONTENT;
    }

    info!("Event received: {} for issue {}", event.event_type, event.issue.key);

    if event.changelog.items.iter().any(is_terminal_transition) {
        let issue_id = event.issue.id;
        let result =
            tokio::task::spawn_blocking(move || state.cleanup.cleanup_all(&issue_id)).await;
        match result {
            Ok(report) => debug!("Issue cleanup finished: {report:?}"),
            Err(e) => error!("Cleanup task failed: {e}"),
        }
    } else {
        for item in &event.changelog.items {
            debug!(
                "Changed field {} to {:?}",
                item.field,
                item.to_name.as_deref()
            );
        }
    }

    StatusCode::NO_CONTENT
}

/// Handle POST /events/issue-deleted.
pub(crate) async fn issue_deleted(State(state): State<Arc<AppState>>, body: Bytes) -> StatusCode {
    let Some(event) = parse_event::<IssueDeletedEvent>(&body) else {
        return StatusCode::NO_CONTENT;
    };
    if !event_type_matches(&event.event_type, ISSUE_DELETED) {
        return StatusCode::NO_CONTENT;
    }

    info!("Event received: {} for issue {}", event.event_type, event.issue.key);

    let issue_id = event.issue.id;
    let result = tokio::task::spawn_blocking(move || state.cleanup.cleanup_all(&issue_id)).await;
    match result {
        Ok(report) => debug!("Issue cleanup finished: {report:?}"),
        Err(e) => error!("Cleanup task failed: {e}"),
    }

    StatusCode::NO_CONTENT
}
