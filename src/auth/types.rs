//! Auth value types
//!
//! Both types redact their secret in `Debug` output so they can be logged
//! with `{:?}` safely.

use crate::http::HttpClient;
use crate::types::AUTH_TOKEN_HEADER;

/// Static API token sent once to the login endpoint
#[derive(Clone, PartialEq, Eq)]
pub struct Credentials {
    api_token: String,
}

impl Credentials {
    /// Create credentials from an API token
    pub fn new(api_token: impl Into<String>) -> Self {
        Self {
            api_token: api_token.into(),
        }
    }

    /// The raw API token
    pub fn api_token(&self) -> &str {
        &self.api_token
    }
}

impl std::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credentials")
            .field("api_token", &"<redacted>")
            .finish()
    }
}

/// An established session
///
/// Immutable once created by [`login`](super::login). Every request made on
/// behalf of the session carries its token in the `x-auth-token` header.
#[derive(Clone, PartialEq, Eq)]
pub struct Session {
    auth_token: String,
}

impl Session {
    /// Wrap a session token returned by the login endpoint
    pub fn new(auth_token: impl Into<String>) -> Self {
        Self {
            auth_token: auth_token.into(),
        }
    }

    /// The raw session token
    pub fn auth_token(&self) -> &str {
        &self.auth_token
    }

    /// Derive an HTTP client that sends this session's token on every request
    pub fn authorize(&self, client: &HttpClient) -> HttpClient {
        client.with_default_header(AUTH_TOKEN_HEADER, self.auth_token.clone())
    }
}

impl std::fmt::Debug for Session {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Session")
            .field("auth_token", &"<redacted>")
            .finish()
    }
}

#[cfg(test)]
mod type_tests {
    use super::*;

    #[test]
    fn test_credentials_debug_redacts_token() {
        let creds = Credentials::new("366a220f-secret");
        let debug = format!("{creds:?}");
        assert!(!debug.contains("366a220f"));
        assert!(debug.contains("redacted"));
        assert_eq!(creds.api_token(), "366a220f-secret");
    }

    #[test]
    fn test_session_debug_redacts_token() {
        let session = Session::new("session-abc");
        assert!(!format!("{session:?}").contains("session-abc"));
    }
}
