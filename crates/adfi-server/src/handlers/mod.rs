//! Request handlers.

pub(crate) mod events;
pub(crate) mod export;
pub(crate) mod settings;
pub(crate) mod spaces;

use axum::http::HeaderMap;

use crate::error::ServerError;

/// Header carrying the acting user's account id on personal endpoints.
const ACCOUNT_ID_HEADER: &str = "x-account-id";

/// Extract and minimally validate the account id header.
pub(crate) fn account_id(headers: &HeaderMap) -> Result<String, ServerError> {
    let value = headers
        .get(ACCOUNT_ID_HEADER)
        .and_then(|v| v.to_str().ok())
        .map(str::trim)
        .unwrap_or_default();

    if value.is_empty() {
        return Err(ServerError::BadRequest(format!(
            "{ACCOUNT_ID_HEADER} header required"
        )));
    }
    Ok(value.to_owned())
}
