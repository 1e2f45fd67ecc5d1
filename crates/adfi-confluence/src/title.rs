//! Page title construction.

/// Build a page title from the attachment file name and the best available
/// identifier.
///
/// The issue key is preferred over the attachment id because it is more
/// readable ("PROJ-123" vs "12345"). The timestamp keeps repeated exports
/// of the same file from colliding on the title-unique-per-space rule.
#[must_use]
pub fn page_title(
    file_name: Option<&str>,
    issue_key: Option<&str>,
    attachment_id: Option<&str>,
    timestamp_ms: u128,
) -> String {
    let identifier = issue_key.or(attachment_id);

    match (file_name, identifier) {
        (Some(file), Some(id)) => format!("{file} - {id} - {timestamp_ms}"),
        (Some(file), None) => format!("{file} - {timestamp_ms}"),
        _ => format!("Exported page - {timestamp_ms}"),
    }
}
