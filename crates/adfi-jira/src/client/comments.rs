//! Comment operations for the Jira API.

use serde::Serialize;
use serde_json::json;
use tracing::info;

use super::JiraClient;
use crate::error::JiraError;
use crate::types::CommentPage;

/// Comment property key marking service-desk visibility.
const VISIBILITY_PROPERTY: &str = "sd.public.comment";

impl JiraClient {
    /// List the comments on an issue.
    pub fn get_comments(&self, issue_id: &str) -> Result<CommentPage, JiraError> {
        let endpoint = format!("{}/issue/{}/comment", self.api_url(), issue_id);

        info!("Fetching comments for issue {}", issue_id);

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

        let page: CommentPage = body_reader.read_json()?;
        info!("Found {} comments on issue {}", page.comments.len(), issue_id);
        Ok(page)
    }

    /// Create a comment on an issue, flagged internal so it never shows on
    /// customer-facing portals.
    pub fn create_internal_comment<T: Serialize>(
        &self,
        issue_id: &str,
        body: &T,
    ) -> Result<(), JiraError> {
        let endpoint = format!("{}/issue/{}/comment", self.api_url(), issue_id);

        let payload = json!({
            "body": body,
            "properties": [
                {
                    "key": VISIBILITY_PROPERTY,
                    "value": { "internal": true },
                }
            ],
        });

        info!("Creating comment on issue {}", issue_id);

        let payload_bytes = serde_json::to_vec(&payload)?;

        let response = self
            .agent
            .post(&endpoint)
            .header("Authorization", &self.auth_header)
            .header("Content-Type", "application/json")
            .header("Accept", "application/json")
            .send(&payload_bytes[..])?;

        let status = response.status().as_u16();
        if status >= 400 {
            let mut body_reader = response.into_body();
            let error_body = body_reader
                .read_to_string()
                .unwrap_or_else(|_| "(unable to read error body)".to_owned());
            return Err(JiraError::HttpResponse {
                status,
                endpoint,
                body: error_body,
            });
        }

        info!("Created comment on issue {}", issue_id);
        Ok(())
    }

    /// Delete one comment from an issue.
    pub fn delete_comment(&self, issue_id: &str, comment_id: &str) -> Result<(), JiraError> {
        let endpoint = format!("{}/issue/{}/comment/{}", self.api_url(), issue_id, comment_id);

        info!("Deleting comment {} on issue {}", comment_id, issue_id);

        let response = self
            .agent
            .delete(&endpoint)
            .header("Authorization", &self.auth_header)
            .call()?;

        let status = response.status().as_u16();
        if status >= 400 {
            let mut body_reader = response.into_body();
            let error_body = body_reader
                .read_to_string()
                .unwrap_or_else(|_| "(unable to read error body)".to_owned());
            return Err(JiraError::HttpResponse {
                status,
                endpoint,
                body: error_body,
            });
        }

        info!("Deleted comment {} on issue {}", comment_id, issue_id);
        Ok(())
    }
}
