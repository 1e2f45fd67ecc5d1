//! On-demand export endpoints.
//!
//! Unlike the webhook handlers, these are user-invoked: failures propagate
//! as HTTP statuses so the caller can show them.

use std::sync::Arc;

use axum::Json;
use axum::extract::State;
use axum::http::HeaderMap;
use serde::Deserialize;
use tracing::debug;

use adfi_confluence::CreatedPage;

use crate::error::ServerError;
use crate::handlers::account_id;
use crate::state::AppState;

/// Request body for export endpoints.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct ExportRequest {
    /// Attachment to export.
    attachment_id: String,
    /// Issue key, used for a readable page title when available.
    #[serde(default)]
    issue_key: Option<String>,
}

/// Handle POST /api/export/default.
pub(crate) async fn to_default_space(
    State(state): State<Arc<AppState>>,
    Json(request): Json<ExportRequest>,
) -> Result<Json<CreatedPage>, ServerError> {
    debug!("Exporting attachment {} to default space", request.attachment_id);

    let page = tokio::task::spawn_blocking(move || {
        state
            .import
            .export_to_default_space(&request.attachment_id, request.issue_key.as_deref())
    })
    .await??;

    Ok(Json(page))
}

/// Handle POST /api/export/personal.
pub(crate) async fn to_personal_space(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Json(request): Json<ExportRequest>,
) -> Result<Json<CreatedPage>, ServerError> {
    let account = account_id(&headers)?;
    debug!(
        "Exporting attachment {} to the personal space of {account}",
        request.attachment_id
    );

    let page = tokio::task::spawn_blocking(move || {
        state.import.export_to_personal_space(
            &account,
            &request.attachment_id,
            request.issue_key.as_deref(),
        )
    })
    .await??;

    Ok(Json(page))
}
