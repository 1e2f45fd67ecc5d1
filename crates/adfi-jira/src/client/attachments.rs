//! Attachment operations for the Jira API.

use tracing::info;

use super::JiraClient;
use crate::error::JiraError;
use crate::types::AttachmentMetadata;

impl JiraClient {
    /// Fetch the raw content of an attachment as text.
    ///
    /// Jira redirects content requests to its media service; the agent
    /// follows the redirect and returns the final body.
    pub fn get_attachment_content(&self, attachment_id: &str) -> Result<String, JiraError> {
        let endpoint = format!("{}/attachment/content/{}", self.api_url(), attachment_id);

        info!("Fetching attachment {}", attachment_id);

        let response = self
            .agent
            .get(&endpoint)
            .header("Authorization", &self.auth_header)
            .call()?;

        let status = response.status().as_u16();
        let mut body_reader = response.into_body();

        if status >= 400 {
            let error_body = body_reader
                .read_to_string()
                .unwrap_or_else(|_| "(unable to read error body)".to_owned());
            return Err(JiraError::HttpResponse {
                status,
                endpoint,
                body: error_body,
            });
        }

        let content = body_reader.read_to_string().map_err(JiraError::HttpRequest)?;
        info!("Retrieved attachment {}", attachment_id);
        Ok(content)
    }

    /// Fetch attachment metadata (file name, mime type, creation time).
    pub fn get_attachment_metadata(
        &self,
        attachment_id: &str,
    ) -> Result<AttachmentMetadata, JiraError> {
        let endpoint = format!("{}/attachment/{}", self.api_url(), attachment_id);

        info!("Fetching attachment metadata {}", attachment_id);

        let response = self
            .agent
            .get(&endpoint)
            .header("Authorization", &self.auth_header)
            .header("Accept", "application/json")
            .call()?;

        let status = response.status().as_u16();
        let mut body_reader = response.into_body();

        if status >= 400 {
            let error_body = body_reader
                .read_to_string()
                .unwrap_or_else(|_| "(unable to read error body)".to_owned());
            return Err(JiraError::HttpResponse {
                status,
                endpoint,
                body: error_body,
            });
        }

        Ok(body_reader.read_json()?)
    }
}
