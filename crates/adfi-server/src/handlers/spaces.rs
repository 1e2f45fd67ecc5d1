//! Space search endpoint.
//!
//! Proxy for the settings UI's search-as-you-type space picker.

use std::sync::Arc;

use axum::Json;
use axum::extract::{Query, State};
use serde::Deserialize;
use tracing::debug;

use adfi_storage::Space;

use crate::error::ServerError;
use crate::state::AppState;

/// Result page size for space search.
const SEARCH_LIMIT: usize = 20;

/// Query parameters for GET /api/spaces.
#[derive(Debug, Deserialize)]
pub(crate) struct SearchParams {
    /// Title prefix to search for.
    title: String,
}

/// Handle GET /api/spaces?title=…
pub(crate) async fn search(
    State(state): State<Arc<AppState>>,
    Query(params): Query<SearchParams>,
) -> Result<Json<Vec<Space>>, ServerError> {
    debug!("Searching spaces by title {:?}", params.title);

    let spaces = tokio::task::spawn_blocking(move || {
        state.confluence.search_spaces(&params.title, SEARCH_LIMIT)
    })
    .await??;

    Ok(Json(spaces))
}
