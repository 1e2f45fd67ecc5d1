//! Jira REST API client.
//!
//! Sync HTTP client for the Jira Cloud v3 REST API with basic auth.

mod attachments;
mod comments;

use std::time::Duration;

use ureq::Agent;

use crate::auth::basic_auth;

/// Default HTTP timeout in seconds.
const DEFAULT_TIMEOUT: u64 = 30;

/// Jira REST API client.
pub struct JiraClient {
    agent: Agent,
    base_url: String,
    auth_header: String,
}

impl JiraClient {
    /// Create a client for the instance at `base_url`, authenticating with
    /// the application's account email and API token.
    #[must_use]
    pub fn new(base_url: &str, email: &str, api_token: &str) -> Self {
        let agent = Agent::config_builder()
            .timeout_global(Some(Duration::from_secs(DEFAULT_TIMEOUT)))
            .http_status_as_error(false)
            .build()
            .into();

        Self {
            agent,
            base_url: base_url.trim_end_matches('/').to_owned(),
            auth_header: basic_auth(email, api_token),
        }
    }

    /// Base URL for the v3 REST API.
    fn api_url(&self) -> String {
        format!("{}/rest/api/3", self.base_url)
    }
}
