//! Jira API types.

use serde::Deserialize;

/// Attachment metadata.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AttachmentMetadata {
    /// Attachment id.
    pub id: u64,
    /// Original file name.
    pub filename: String,
    /// MIME type reported by Jira.
    pub mime_type: String,
    /// Creation timestamp.
    #[serde(default)]
    pub created: Option<String>,
}

/// One issue comment.
#[derive(Debug, Clone, Deserialize)]
pub struct Comment {
    /// Comment id.
    pub id: String,
    /// Comment author.
    pub author: CommentAuthor,
}

/// Comment author identity.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CommentAuthor {
    /// Atlassian account id.
    pub account_id: String,
    /// Display name at the time of the comment.
    pub display_name: String,
    /// Account type ("atlassian", "app", ...).
    pub account_type: String,
}

/// One page of issue comments.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CommentPage {
    /// Offset of the first returned comment.
    pub start_at: u32,
    /// Page size cap.
    pub max_results: u32,
    /// Total comments on the issue.
    pub total: u32,
    /// Comments in this page.
    pub comments: Vec<Comment>,
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn test_comment_page_parses_api_shape() {
        let page: CommentPage = serde_json::from_str(
            r#"{
                "startAt": 0,
                "maxResults": 50,
                "total": 1,
                "comments": [{
                    "id": "77",
                    "author": {
                        "accountId": "5b10a2844c20165700ede21g",
                        "displayName": "adf-importer",
                        "accountType": "app"
                    },
                    "body": {}
                }]
            }"#,
        )
        .unwrap();

        assert_eq!(page.total, 1);
        assert_eq!(page.comments[0].id, "77");
        assert_eq!(page.comments[0].author.account_type, "app");
    }

    #[test]
    fn test_attachment_metadata_parses_api_shape() {
        let meta: AttachmentMetadata = serde_json::from_str(
            r#"{"id": 10001, "filename": "notes.txt", "mimeType": "text/plain",
                "created": "2024-01-01T00:00:00.000+0000"}"#,
        )
        .unwrap();

        assert_eq!(meta.id, 10001);
        assert_eq!(meta.filename, "notes.txt");
        assert_eq!(meta.mime_type, "text/plain");
    }
}
