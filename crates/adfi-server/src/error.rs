//! Handler error type.

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde_json::json;

use adfi_confluence::ConfluenceError;
use adfi_core::ImportError;
use adfi_storage::KvsError;

/// Error from a user-invoked API handler.
///
/// Webhook handlers never construct one of these — their failures stay on
/// the server side of the event boundary. API handlers convert errors into
/// an HTTP status plus a JSON `{"error": …}` body.
#[derive(Debug, thiserror::Error)]
pub(crate) enum ServerError {
    /// The request was malformed (missing header, bad parameter).
    #[error("{0}")]
    BadRequest(String),

    /// An import/export flow failed.
    #[error(transparent)]
    Import(#[from] ImportError),

    /// A settings read/write failed.
    #[error(transparent)]
    Storage(#[from] KvsError),

    /// A Confluence call failed.
    #[error(transparent)]
    Confluence(#[from] ConfluenceError),

    /// A blocking task was cancelled or panicked.
    #[error("internal task failure")]
    Task(#[from] tokio::task::JoinError),
}

impl ServerError {
    fn status(&self) -> StatusCode {
        match self {
            Self::BadRequest(_) => StatusCode::BAD_REQUEST,
            Self::Import(e) => import_status(e),
            Self::Storage(e) => match e {
                KvsError::InvalidKey(_) | KvsError::InvalidRecord(_) => StatusCode::BAD_REQUEST,
                _ => StatusCode::INTERNAL_SERVER_ERROR,
            },
            Self::Confluence(e) => confluence_status(e),
            Self::Task(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

fn import_status(error: &ImportError) -> StatusCode {
    match error {
        ImportError::NoGlobalSpace
        | ImportError::NoPersonalSettings
        | ImportError::InvalidFormat => StatusCode::BAD_REQUEST,
        ImportError::Confluence(e) => confluence_status(e),
        ImportError::Jira(_) => StatusCode::BAD_GATEWAY,
        ImportError::Storage(_) => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

fn confluence_status(error: &ConfluenceError) -> StatusCode {
    match error {
        ConfluenceError::PageAlreadyExists => StatusCode::CONFLICT,
        _ => StatusCode::BAD_GATEWAY,
    }
}

impl IntoResponse for ServerError {
    fn into_response(self) -> Response {
        let status = self.status();
        tracing::error!("Request failed with {status}: {self}");
        (status, Json(json!({ "error": self.to_string() }))).into_response()
    }
}
