//! Page operations for the Confluence API.

use tracing::info;

use super::ConfluenceClient;
use crate::error::ConfluenceError;
use crate::types::{CreatePageRequest, CreatedPage, ErrorEnvelope};

impl ConfluenceClient {
    /// Create a page in the local instance.
    ///
    /// A structured "title already exists" failure is surfaced as
    /// [`ConfluenceError::PageAlreadyExists`]; other structured failures
    /// carry the joined error titles.
    pub fn create_page(&self, request: &CreatePageRequest) -> Result<CreatedPage, ConfluenceError> {
        let url = self.pages_url();

        info!("Creating page {:?} in space {}", request.title, request.space_id);

        let payload = serde_json::to_vec(request)?;

        let response = self
            .agent
            .post(&url)
            .header("Authorization", &self.auth_header)
            .header("Content-Type", "application/json")
            .header("Accept", "application/json")
            .send(&payload[..])?;

        let page = read_created_page(response)?;
        info!("Created page {}", page.id);
        Ok(page)
    }

    /// Delete a page by id.
    pub fn delete_page(&self, page_id: &str) -> Result<(), ConfluenceError> {
        let url = format!("{}/{}", self.pages_url(), page_id);

        info!("Deleting page {}", page_id);

        let response = self
            .agent
            .delete(&url)
            .header("Authorization", &self.auth_header)
            .call()?;

        let status = response.status().as_u16();
        if status >= 400 {
            let mut body_reader = response.into_body();
            let error_body = body_reader
                .read_to_string()
                .unwrap_or_else(|_| "(unable to read error body)".to_owned());
            return Err(ConfluenceError::HttpResponse {
                status,
                body: error_body,
            });
        }

        info!("Deleted page {}", page_id);
        Ok(())
    }
}

/// Decode a page-create response, mapping failures to typed errors.
pub(crate) fn read_created_page(
    response: ureq::http::Response<ureq::Body>,
) -> Result<CreatedPage, ConfluenceError> {
    let status = response.status().as_u16();
    let mut body_reader = response.into_body();

    if status >= 400 {
        let error_body = body_reader
            .read_to_string()
            .unwrap_or_else(|_| "(unable to read error body)".to_owned());
        return Err(map_create_failure(status, error_body));
    }

    Ok(body_reader.read_json()?)
}

/// Map a failed create response to the clearest available error.
fn map_create_failure(status: u16, body: String) -> ConfluenceError {
    match serde_json::from_str::<ErrorEnvelope>(&body) {
        Ok(envelope) => {
            if envelope
                .errors
                .iter()
                .any(|e| e.title.contains("already exist"))
            {
                ConfluenceError::PageAlreadyExists
            } else {
                let message = envelope
                    .errors
                    .iter()
                    .map(|e| e.title.as_str())
                    .collect::<Vec<_>>()
                    .join(", ");
                ConfluenceError::Api { status, message }
            }
        }
        Err(_) => ConfluenceError::HttpResponse { status, body },
    }
}
