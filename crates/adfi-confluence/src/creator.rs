//! Remote page creation with a user's stored credentials.
//!
//! On-demand exports can target a Confluence instance other than the local
//! one. [`RemoteInstance`] wraps that target: the user's configured base
//! URL, their basic-auth credentials, and the literal body replacements to
//! apply before send.

use std::time::Duration;

use tracing::debug;
use ureq::Agent;

use adfi_storage::{PersonalSettings, Replacement};

use crate::auth::basic_auth;
use crate::client::pages::read_created_page;
use crate::error::ConfluenceError;
use crate::types::{CreatePageRequest, CreatedPage};

/// Default HTTP timeout in seconds for remote instances.
const DEFAULT_TIMEOUT: u64 = 30;

/// A remote Confluence instance reachable with a user's stored credentials.
///
/// Body content is passed through the user's configured literal
/// replacements before send, adapting embedded macro and extension
/// identifiers that differ between instances.
pub struct RemoteInstance {
    agent: Agent,
    base_url: String,
    auth_header: String,
    replacements: Vec<Replacement>,
}

impl RemoteInstance {
    /// Build a remote instance handle from a user's personal settings.
    #[must_use]
    pub fn from_settings(settings: &PersonalSettings) -> Self {
        let agent = Agent::config_builder()
            .timeout_global(Some(Duration::from_secs(DEFAULT_TIMEOUT)))
            .http_status_as_error(false)
            .build()
            .into();

        Self {
            agent,
            base_url: settings.target_instance.trim_end_matches('/').to_owned(),
            auth_header: basic_auth(
                &settings.authentication.email,
                &settings.authentication.token,
            ),
            replacements: settings.replacements.clone().unwrap_or_default(),
        }
    }

    /// Create a page on the remote instance, applying the configured body
    /// replacements first.
    ///
    /// # Errors
    ///
    /// Returns [`ConfluenceError`] when the request fails or the instance
    /// rejects the page.
    pub fn create_page(&self, request: &CreatePageRequest) -> Result<CreatedPage, ConfluenceError> {
        let url = format!("{}/wiki/api/v2/pages", self.base_url);

        let mut request = request.clone();
        request.body.value = self.apply_replacements(&request.body.value);

        let payload = serde_json::to_vec(&request)?;

        let response = self
            .agent
            .post(&url)
            .header("Authorization", &self.auth_header)
            .header("Content-Type", "application/json")
            .header("Accept", "application/json")
            .send(&payload[..])?;

        read_created_page(response)
    }

    /// Apply every configured literal substitution to `value`.
    fn apply_replacements(&self, value: &str) -> String {
        let mut value = value.to_owned();
        for replacement in &self.replacements {
            debug!("Replacing {} with {}", replacement.from, replacement.to);
            value = value.replace(&replacement.from, &replacement.to);
        }
        value
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use adfi_storage::{Authentication, SpaceRef};

    use super::*;

    fn settings(replacements: Option<Vec<Replacement>>) -> PersonalSettings {
        PersonalSettings {
            target_instance: "https://other.atlassian.net/".to_owned(),
            authentication: Authentication {
                email: "a@b.com".to_owned(),
                token: "tok".to_owned(),
            },
            space: SpaceRef { id: "9".to_owned() },
            replacements,
        }
    }

    #[test]
    fn test_apply_replacements_rewrites_every_occurrence() {
        let remote = RemoteInstance::from_settings(&settings(Some(vec![
            Replacement {
                from: "app-id-111".to_owned(),
                to: "app-id-222".to_owned(),
            },
            Replacement {
                from: "env-a".to_owned(),
                to: "env-b".to_owned(),
            },
        ])));

        let body = "<macro app=\"app-id-111\" env=\"env-a\"/><macro app=\"app-id-111\"/>";
        assert_eq!(
            remote.apply_replacements(body),
            "<macro app=\"app-id-222\" env=\"env-b\"/><macro app=\"app-id-222\"/>"
        );
    }

    #[test]
    fn test_no_replacements_leaves_body_unchanged() {
        let remote = RemoteInstance::from_settings(&settings(None));
        assert_eq!(remote.apply_replacements("<p>as is</p>"), "<p>as is</p>");
    }

    #[test]
    fn test_base_url_trailing_slash_is_trimmed() {
        let remote = RemoteInstance::from_settings(&settings(None));
        assert_eq!(remote.base_url, "https://other.atlassian.net");
    }
}
