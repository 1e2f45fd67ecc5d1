//! Space search for the settings surface.

use serde::Deserialize;
use tracing::info;

use adfi_storage::Space;

use super::ConfluenceClient;
use crate::error::ConfluenceError;

/// Search response container.
#[derive(Debug, Deserialize)]
struct SpaceSearchResponse {
    results: Vec<SpaceSearchItem>,
}

/// One search hit.
#[derive(Debug, Deserialize)]
struct SpaceSearchItem {
    space: Space,
}

impl ConfluenceClient {
    /// Search spaces whose title starts with `title`, for the settings
    /// search-as-you-type picker.
    pub fn search_spaces(&self, title: &str, limit: usize) -> Result<Vec<Space>, ConfluenceError> {
        let url = format!("{}/wiki/rest/api/search", self.base_url);
        let cql = format!("type=space AND title~\"{title}*\"");

        info!("Searching spaces by title {title:?}");

        let response = self
            .agent
            .get(&url)
            .query("limit", limit.to_string())
            .query("expand", "space.homepage")
            .query("cql", &cql)
            .header("Authorization", &self.auth_header)
            .header("Accept", "application/json")
            .call()?;

        let status = response.status().as_u16();
        let mut body_reader = response.into_body();

        if status >= 400 {
            let error_body = body_reader
                .read_to_string()
                .unwrap_or_else(|_| "(unable to read error body)".to_owned());
            return Err(ConfluenceError::HttpResponse {
                status,
                body: error_body,
            });
        }

        let parsed: SpaceSearchResponse = body_reader.read_json()?;
        info!("Found {} spaces", parsed.results.len());
        Ok(parsed.results.into_iter().map(|item| item.space).collect())
    }
}
