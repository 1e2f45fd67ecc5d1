//! Page content validation.
//!
//! Imported attachments are expected to already be Confluence storage
//! format. [`PageValidator::StorageFormat`] checks XML well-formedness
//! before a page is created from event-driven imports;
//! [`PageValidator::Noop`] waves user-initiated exports through.

use quick_xml::Reader;
use quick_xml::events::Event;
use tracing::{debug, error};

/// Gate deciding whether attachment content is acceptable page content.
#[derive(Debug, Clone, Copy)]
pub enum PageValidator {
    /// Accept only well-formed storage-format XML.
    StorageFormat,
    /// Accept anything.
    Noop,
}

impl PageValidator {
    /// True when `content` passes this validator. Rejections are logged,
    /// never raised.
    #[must_use]
    pub fn validate(&self, content: &str) -> bool {
        match self {
            Self::Noop => {
                debug!("Skipping page format validation");
                true
            }
            Self::StorageFormat => {
                debug!("Validating page format");
                validate_storage_format(content)
            }
        }
    }
}

/// Check XML well-formedness of storage-format content.
fn validate_storage_format(content: &str) -> bool {
    // Storage format is an XML fragment with multiple root nodes; wrap it
    // in a synthetic root so the parser accepts it.
    let wrapped = format!("<storage-root>{content}</storage-root>");

    let mut reader = Reader::from_str(&wrapped);
    loop {
        match reader.read_event() {
            Ok(Event::Eof) => return true,
            Ok(_) => {}
            Err(e) => {
                error!("Invalid document format, XML validation failed: {e}");
                return false;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_accepts_storage_format_fragment() {
        let content = "<p>hello</p><ac:structured-macro ac:name=\"toc\"/><p>bye</p>";
        assert!(PageValidator::StorageFormat.validate(content));
    }

    #[test]
    fn test_accepts_plain_text() {
        assert!(PageValidator::StorageFormat.validate("just words, no markup"));
    }

    #[test]
    fn test_rejects_mismatched_tags() {
        assert!(!PageValidator::StorageFormat.validate("<p>unclosed<div></p>"));
    }

    #[test]
    fn test_rejects_stray_close_tag() {
        assert!(!PageValidator::StorageFormat.validate("</p>"));
    }

    #[test]
    fn test_noop_accepts_anything() {
        assert!(PageValidator::Noop.validate("<p>unclosed<div></p>"));
    }
}
