//! Router construction.
//!
//! Builds the axum router with all routes and middleware.

use std::sync::Arc;

use axum::Router;
use axum::routing::{get, post};
use tower_http::trace::TraceLayer;

use crate::handlers::{events, export, settings, spaces};
use crate::state::AppState;

/// Create the application router.
///
/// # Arguments
///
/// * `state` - Shared application state
pub(crate) fn create_router(state: Arc<AppState>) -> Router {
    // Webhook routes: always answer 204, failures stay server-side
    let event_routes = Router::new()
        .route("/events/attachment-created", post(events::attachment_created))
        .route("/events/attachment-deleted", post(events::attachment_deleted))
        .route("/events/issue-updated", post(events::issue_updated))
        .route("/events/issue-deleted", post(events::issue_deleted));

    // Settings/export API: user-invoked, errors become HTTP statuses
    let api_routes = Router::new()
        .route(
            "/api/settings/global",
            get(settings::get_global).put(settings::put_global),
        )
        .route(
            "/api/settings/personal",
            get(settings::get_personal).put(settings::put_personal),
        )
        .route("/api/spaces", get(spaces::search))
        .route("/api/export/default", post(export::to_default_space))
        .route("/api/export/personal", post(export::to_personal_space));

    Router::new()
        .merge(event_routes)
        .merge(api_routes)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use axum::body::Body;
    use axum::http::{Request, StatusCode, header};
    use pretty_assertions::assert_eq;
    use tower::ServiceExt;

    use adfi_confluence::ConfluenceClient;
    use adfi_core::{
        AttachmentClient, CleanupService, CommentClient, ImportService, PageClient,
    };
    use adfi_jira::JiraClient;
    use adfi_storage::{FileKvs, Kvs, LinkRepository, SettingsRepository};

    use super::*;

    /// State wired to unreachable instances; only paths that never complete
    /// a remote call are exercised.
    fn test_router(tmp: &tempfile::TempDir) -> Router {
        let jira = Arc::new(JiraClient::new(
            "http://127.0.0.1:9",
            "bot@example.com",
            "token",
        ));
        let confluence = Arc::new(ConfluenceClient::new(
            "http://127.0.0.1:9",
            "bot@example.com",
            "token",
        ));
        let store: Arc<dyn Kvs> =
            Arc::new(FileKvs::open(tmp.path().join("data")).unwrap());

        let state = AppState {
            import: ImportService::new(
                LinkRepository::new(Arc::clone(&store)),
                SettingsRepository::new(Arc::clone(&store)),
                Arc::clone(&jira) as Arc<dyn AttachmentClient>,
                Arc::clone(&confluence) as Arc<dyn PageClient>,
                Arc::clone(&jira) as Arc<dyn CommentClient>,
            ),
            cleanup: CleanupService::new(
                LinkRepository::new(Arc::clone(&store)),
                Arc::clone(&confluence) as Arc<dyn PageClient>,
                Arc::clone(&jira) as Arc<dyn CommentClient>,
            ),
            settings: SettingsRepository::new(store),
            confluence,
        };

        create_router(Arc::new(state))
    }

    fn post_json(uri: &str, body: &str) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri(uri)
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_owned()))
            .unwrap()
    }

    async fn body_json(response: axum::response::Response) -> serde_json::Value {
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn test_malformed_webhook_payload_is_discarded() {
        let tmp = tempfile::TempDir::new().unwrap();
        let router = test_router(&tmp);

        let response = router
            .oneshot(post_json("/events/attachment-created", "not json at all"))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::NO_CONTENT);
    }

    #[tokio::test]
    async fn test_webhook_with_wrong_event_type_is_discarded() {
        let tmp = tempfile::TempDir::new().unwrap();
        let router = test_router(&tmp);

        let body = r#"{
            "eventType": "avi:jira:created:comment",
            "attachment": {"id": "1", "issueId": "2", "fileName": "a.txt",
                           "mimeType": "text/plain", "createDate": "2024-01-01"}
        }"#;
        let response = router
            .oneshot(post_json("/events/attachment-created", body))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::NO_CONTENT);
    }

    #[tokio::test]
    async fn test_non_text_attachment_is_ignored() {
        let tmp = tempfile::TempDir::new().unwrap();
        let router = test_router(&tmp);

        let body = r#"{
            "eventType": "avi:jira:created:attachment",
            "attachment": {"id": "1", "issueId": "2", "fileName": "a.png",
                           "mimeType": "image/png", "createDate": "2024-01-01"}
        }"#;
        let response = router
            .oneshot(post_json("/events/attachment-created", body))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::NO_CONTENT);
    }

    #[tokio::test]
    async fn test_downstream_failure_never_escapes_webhook() {
        let tmp = tempfile::TempDir::new().unwrap();
        let router = test_router(&tmp);

        // Valid deletion event; the issue has no links, cleanup is a no-op
        let body = r#"{
            "eventType": "avi:jira:deleted:Attachment",
            "attachment": {"id": "1", "issueId": "2", "fileName": "a.txt",
                           "mimeType": "text/plain", "createDate": "2024-01-01"}
        }"#;
        let response = router
            .oneshot(post_json("/events/attachment-deleted", body))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::NO_CONTENT);
    }

    #[tokio::test]
    async fn test_global_settings_round_trip() {
        let tmp = tempfile::TempDir::new().unwrap();
        let router = test_router(&tmp);

        let unset = router
            .clone()
            .oneshot(Request::get("/api/settings/global").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(unset.status(), StatusCode::OK);
        assert_eq!(body_json(unset).await, serde_json::Value::Null);

        let space = r#"{"id": "635502596", "key": "IMP", "name": "Imports", "status": "current"}"#;
        let saved = router
            .clone()
            .oneshot(
                Request::put("/api/settings/global")
                    .header(header::CONTENT_TYPE, "application/json")
                    .body(Body::from(space))
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(saved.status(), StatusCode::NO_CONTENT);

        let read = router
            .oneshot(Request::get("/api/settings/global").body(Body::empty()).unwrap())
            .await
            .unwrap();
        let json = body_json(read).await;
        assert_eq!(json["key"], "IMP");
        assert_eq!(json["name"], "Imports");
    }

    #[tokio::test]
    async fn test_personal_settings_require_account_header() {
        let tmp = tempfile::TempDir::new().unwrap();
        let router = test_router(&tmp);

        let response = router
            .oneshot(Request::get("/api/settings/personal").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_personal_settings_read_back_sanitized() {
        let tmp = tempfile::TempDir::new().unwrap();
        let router = test_router(&tmp);

        let settings = r#"{
            "targetInstance": "https://other.atlassian.net",
            "authentication": {"email": "a@b.com", "token": "super-secret"},
            "space": {"id": "9"}
        }"#;
        let saved = router
            .clone()
            .oneshot(
                Request::put("/api/settings/personal")
                    .header(header::CONTENT_TYPE, "application/json")
                    .header("x-account-id", "12345678")
                    .body(Body::from(settings))
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(saved.status(), StatusCode::NO_CONTENT);

        let read = router
            .oneshot(
                Request::get("/api/settings/personal")
                    .header("x-account-id", "12345678")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        let json = body_json(read).await;
        assert_eq!(json["authentication"]["email"], "a@b.com");
        // The token is never echoed back
        assert_eq!(json["authentication"]["token"], "");
    }

    #[tokio::test]
    async fn test_export_without_global_space_is_client_error() {
        let tmp = tempfile::TempDir::new().unwrap();
        let router = test_router(&tmp);

        let response = router
            .oneshot(post_json("/api/export/default", r#"{"attachmentId": "1"}"#))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);

        // The error body names the problem for the user
        let json = body_json(response).await;
        assert_eq!(json["error"], "no global space setting found");
    }
}
