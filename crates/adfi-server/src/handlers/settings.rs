//! Settings API endpoints.
//!
//! Backs the configuration surface: the installation-wide default space
//! and per-user personal settings. Personal reads always return the
//! sanitized form — the stored token never leaves the backend.

use std::sync::Arc;

use axum::Json;
use axum::extract::State;
use axum::http::{HeaderMap, StatusCode};
use tracing::debug;

use adfi_storage::{PersonalSettings, Space};

use crate::error::ServerError;
use crate::handlers::account_id;
use crate::state::AppState;

/// Handle GET /api/settings/global.
pub(crate) async fn get_global(
    State(state): State<Arc<AppState>>,
) -> Result<Json<Option<Space>>, ServerError> {
    debug!("Getting global space setting");

    let space = tokio::task::spawn_blocking(move || state.settings.get_global()).await??;
    Ok(Json(space))
}

/// Handle PUT /api/settings/global.
pub(crate) async fn put_global(
    State(state): State<Arc<AppState>>,
    Json(space): Json<Space>,
) -> Result<StatusCode, ServerError> {
    debug!("Saving global space setting");

    tokio::task::spawn_blocking(move || state.settings.save_global(&space)).await??;

    debug!("Global space setting saved successfully");
    Ok(StatusCode::NO_CONTENT)
}

/// Handle GET /api/settings/personal.
pub(crate) async fn get_personal(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
) -> Result<Json<Option<PersonalSettings>>, ServerError> {
    let account = account_id(&headers)?;
    debug!("Getting personal space setting for account {account}");

    let settings =
        tokio::task::spawn_blocking(move || state.settings.get_personal(&account)).await??;

    Ok(Json(settings.map(|s| s.sanitized())))
}

/// Handle PUT /api/settings/personal.
pub(crate) async fn put_personal(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Json(settings): Json<PersonalSettings>,
) -> Result<StatusCode, ServerError> {
    let account = account_id(&headers)?;
    debug!("Saving personal space setting for account {account}");

    tokio::task::spawn_blocking(move || state.settings.save_personal(&account, &settings))
        .await??;

    debug!("Personal space setting saved successfully");
    Ok(StatusCode::NO_CONTENT)
}
