//! Session bootstrap

use super::types::{Credentials, Session};
use crate::error::{Error, Result};
use crate::http::{HttpClient, RequestConfig};
use crate::types::{OptionStringExt, API_TOKEN_HEADER, AUTH_TOKEN_HEADER};
use tracing::{debug, info};

/// Log in with a static API token and return the established session
///
/// `client` must be configured with the API base URL
/// (`https://{target}/api/{version}`). A login rejected with a 4xx status, or
/// a response without a non-empty `x-auth-token` header, is an
/// [`Error::Auth`]; the caller must not continue unauthenticated.
pub async fn login(client: &HttpClient, credentials: &Credentials) -> Result<Session> {
    debug!("Posting to login endpoint");

    let config = RequestConfig::new().header(API_TOKEN_HEADER, credentials.api_token());
    let response = client
        .post_with_config("login", config)
        .await
        .map_err(|e| match e {
            Error::HttpStatus { status, body } if (400..500).contains(&status) => {
                Error::auth(format!("login rejected with status {status}: {body}"))
            }
            other => other,
        })?;

    let token = response
        .headers()
        .get(AUTH_TOKEN_HEADER)
        .and_then(|v| v.to_str().ok())
        .map(str::to_string)
        .none_if_empty()
        .ok_or_else(|| Error::auth(format!("{AUTH_TOKEN_HEADER} not found in login response headers")))?;

    info!("Session established");
    Ok(Session::new(token))
}
