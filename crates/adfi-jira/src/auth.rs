//! Basic auth header construction.

use base64::Engine;
use base64::prelude::BASE64_STANDARD;

/// Build an HTTP Basic `Authorization` header value from an email and API
/// token.
pub(crate) fn basic_auth(email: &str, token: &str) -> String {
    let encoded = BASE64_STANDARD.encode(format!("{email}:{token}"));
    format!("Basic {encoded}")
}
