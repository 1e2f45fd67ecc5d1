//! Confluence page types.

use serde::{Deserialize, Serialize};

/// Content representation for imported bodies.
const STORAGE_REPRESENTATION: &str = "storage";

/// Status assigned to created pages.
const CURRENT_STATUS: &str = "current";

/// Request body for creating a page (v2 pages resource).
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CreatePageRequest {
    /// Destination space id.
    pub space_id: String,
    /// Page status (always "current").
    pub status: String,
    /// Page title, unique within the space.
    pub title: String,
    /// Parent content id, when the page should nest under one.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub parent_id: Option<String>,
    /// Page body content.
    pub body: PageBody,
}

impl CreatePageRequest {
    /// Build a create request with storage-format body content.
    #[must_use]
    pub fn new(
        space_id: impl Into<String>,
        title: impl Into<String>,
        body_value: impl Into<String>,
        parent_id: Option<String>,
    ) -> Self {
        Self {
            space_id: space_id.into(),
            status: CURRENT_STATUS.to_owned(),
            title: title.into(),
            parent_id,
            body: PageBody {
                representation: STORAGE_REPRESENTATION.to_owned(),
                value: body_value.into(),
            },
        }
    }
}

/// Page body content.
#[derive(Debug, Clone, Serialize)]
pub struct PageBody {
    /// Content representation (always "storage").
    pub representation: String,
    /// Storage-format content.
    pub value: String,
}

/// Page returned by a successful create.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreatedPage {
    /// Page ID.
    pub id: String,
    /// Page title.
    #[serde(default)]
    pub title: Option<String>,
    /// Destination space id.
    #[serde(default)]
    pub space_id: Option<String>,
    /// Hypermedia links.
    #[serde(rename = "_links", default)]
    pub links: Option<CreatedPageLinks>,
}

impl CreatedPage {
    /// Web URL of the page, when the response carried both link parts.
    #[must_use]
    pub fn web_url(&self) -> Option<String> {
        let links = self.links.as_ref()?;
        match (&links.base, &links.webui) {
            (Some(base), Some(webui)) => Some(format!("{base}{webui}")),
            _ => None,
        }
    }
}

/// Hypermedia links on a created page.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreatedPageLinks {
    /// Instance base link.
    #[serde(default)]
    pub base: Option<String>,
    /// Web UI link.
    #[serde(default)]
    pub webui: Option<String>,
}

/// Structured error envelope returned by the v2 API.
#[derive(Debug, Deserialize)]
pub(crate) struct ErrorEnvelope {
    pub(crate) errors: Vec<ApiErrorItem>,
}

/// One error item inside the envelope.
#[derive(Debug, Deserialize)]
pub(crate) struct ApiErrorItem {
    #[allow(dead_code)]
    pub(crate) status: u16,
    #[allow(dead_code)]
    pub(crate) code: String,
    pub(crate) title: String,
    #[serde(default)]
    #[allow(dead_code)]
    pub(crate) detail: Option<String>,
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn test_create_request_json_shape() {
        let request = CreatePageRequest::new("123", "Title", "<p>x</p>", Some("456".to_owned()));
        let json = serde_json::to_value(&request).unwrap();

        assert_eq!(json["spaceId"], "123");
        assert_eq!(json["status"], "current");
        assert_eq!(json["parentId"], "456");
        assert_eq!(json["body"]["representation"], "storage");
        assert_eq!(json["body"]["value"], "<p>x</p>");
    }

    #[test]
    fn test_create_request_omits_absent_parent() {
        let request = CreatePageRequest::new("123", "Title", "<p>x</p>", None);
        let json = serde_json::to_value(&request).unwrap();
        assert!(json.get("parentId").is_none());
    }

    #[test]
    fn test_web_url_needs_both_parts() {
        let mut page: CreatedPage = serde_json::from_str(
            r#"{"id": "1", "_links": {"base": "https://x.atlassian.net/wiki", "webui": "/spaces/K/pages/1"}}"#,
        )
        .unwrap();
        assert_eq!(
            page.web_url().as_deref(),
            Some("https://x.atlassian.net/wiki/spaces/K/pages/1")
        );

        page.links = Some(CreatedPageLinks {
            base: None,
            webui: Some("/spaces/K/pages/1".to_owned()),
        });
        assert_eq!(page.web_url(), None);

        page.links = None;
        assert_eq!(page.web_url(), None);
    }
}
