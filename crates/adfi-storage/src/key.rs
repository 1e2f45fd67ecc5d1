//! Composite storage key construction.
//!
//! Keys have the shape `prefix-component-component…`, joined with `-`.
//! Prefix queries rely on that shape ("all links of an issue" is a
//! begins-with scan on `pageStorage-{issueId}`), so a component containing
//! the delimiter would make scans ambiguous. Validation runs before any I/O.

use crate::kvs::KvsError;

/// Delimiter joining key components.
const DELIMITER: char = '-';

/// Build a composite storage key from a trusted prefix and validated
/// components.
///
/// # Errors
///
/// Returns [`KvsError::InvalidKey`] when any component is empty or contains
/// the `-` delimiter.
pub fn build_key(prefix: &str, components: &[&str]) -> Result<String, KvsError> {
    for component in components {
        if component.is_empty() {
            return Err(KvsError::InvalidKey(
                "key component cannot be empty".to_owned(),
            ));
        }
        if component.contains(DELIMITER) {
            return Err(KvsError::InvalidKey(format!(
                "key component {component:?} cannot contain '{DELIMITER}'"
            )));
        }
    }

    let mut key = prefix.to_owned();
    for component in components {
        key.push(DELIMITER);
        key.push_str(component);
    }
    Ok(key)
}
