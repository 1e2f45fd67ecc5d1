//! Basic auth header construction.

use base64::Engine;
use base64::prelude::BASE64_STANDARD;

/// Build an HTTP Basic `Authorization` header value from an email and API
/// token, the auth scheme Atlassian Cloud REST APIs accept.
pub(crate) fn basic_auth(email: &str, token: &str) -> String {
    let encoded = BASE64_STANDARD.encode(format!("{email}:{token}"));
    format!("Basic {encoded}")
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn test_basic_auth_encodes_email_and_token() {
        // base64("a@b.com:tok")
        assert_eq!(basic_auth("a@b.com", "tok"), "Basic YUBiLmNvbTp0b2s=");
    }
}
