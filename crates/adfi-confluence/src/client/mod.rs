//! Confluence REST API client.
//!
//! Sync HTTP client for the Confluence Cloud REST API, authenticated as the
//! application with basic auth.

pub(crate) mod pages;
mod spaces;

use std::time::Duration;

use ureq::Agent;

use crate::auth::basic_auth;

/// Default HTTP timeout in seconds.
const DEFAULT_TIMEOUT: u64 = 30;

/// Confluence REST API client for the local instance.
pub struct ConfluenceClient {
    agent: Agent,
    base_url: String,
    auth_header: String,
}

impl ConfluenceClient {
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

    /// Base URL for the v2 pages resource.
    fn pages_url(&self) -> String {
        format!("{}/wiki/api/v2/pages", self.base_url)
    }
}
