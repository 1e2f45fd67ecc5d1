//! Minimal Atlassian Document Format model.
//!
//! Just enough ADF to write the comment the importer leaves on an issue: a
//! document with one paragraph, plain text, and optionally an inline card
//! pointing at the created page.

use serde::Serialize;
use uuid::Uuid;

/// Text of the notice comment.
const NOTICE_TEXT: &str = "ADF imported";

/// An ADF document.
#[derive(Debug, Clone, Serialize)]
pub struct AdfDocument {
    #[serde(rename = "type")]
    doc_type: &'static str,
    version: u8,
    content: Vec<AdfNode>,
}

/// One ADF content node.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "type")]
enum AdfNode {
    #[serde(rename = "paragraph")]
    Paragraph {
        attrs: ParagraphAttrs,
        content: Vec<AdfNode>,
    },
    #[serde(rename = "text")]
    Text { text: String },
    #[serde(rename = "inlineCard")]
    InlineCard { attrs: InlineCardAttrs },
}

/// Paragraph attributes.
#[derive(Debug, Clone, Serialize)]
struct ParagraphAttrs {
    #[serde(rename = "localId")]
    local_id: String,
}

/// Inline card attributes.
#[derive(Debug, Clone, Serialize)]
struct InlineCardAttrs {
    url: String,
}

impl AdfDocument {
    /// The "ADF imported" notice left as an issue comment.
    ///
    /// With a page URL the paragraph carries an inline card linking to the
    /// created page; without one it is a bare text notice.
    #[must_use]
    pub fn imported_notice(page_url: Option<&str>) -> Self {
        let content = match page_url {
            Some(url) => vec![
                AdfNode::Text {
                    text: format!("{NOTICE_TEXT}:"),
                },
                AdfNode::InlineCard {
                    attrs: InlineCardAttrs {
                        url: url.to_owned(),
                    },
                },
            ],
            None => vec![AdfNode::Text {
                text: NOTICE_TEXT.to_owned(),
            }],
        };

        Self {
            doc_type: "doc",
            version: 1,
            content: vec![AdfNode::Paragraph {
                attrs: ParagraphAttrs {
                    local_id: Uuid::new_v4().to_string(),
                },
                content,
            }],
        }
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn test_notice_with_url_carries_inline_card() {
        let doc = AdfDocument::imported_notice(Some("https://x.atlassian.net/wiki/pages/1"));
        let json = serde_json::to_value(&doc).unwrap();

        assert_eq!(json["type"], "doc");
        assert_eq!(json["version"], 1);

        let paragraph = &json["content"][0];
        assert_eq!(paragraph["type"], "paragraph");
        assert!(paragraph["attrs"]["localId"].is_string());

        assert_eq!(paragraph["content"][0]["type"], "text");
        assert_eq!(paragraph["content"][0]["text"], "ADF imported:");
        assert_eq!(paragraph["content"][1]["type"], "inlineCard");
        assert_eq!(
            paragraph["content"][1]["attrs"]["url"],
            "https://x.atlassian.net/wiki/pages/1"
        );
    }

    #[test]
    fn test_notice_without_url_is_plain_text() {
        let doc = AdfDocument::imported_notice(None);
        let json = serde_json::to_value(&doc).unwrap();

        let paragraph = &json["content"][0];
        assert_eq!(paragraph["content"].as_array().unwrap().len(), 1);
        assert_eq!(paragraph["content"][0]["text"], "ADF imported");
    }
}
