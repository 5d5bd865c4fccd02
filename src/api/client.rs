//! Fleet API client
//!
//! [`FleetApi`] is the capability object for one authenticated session: it
//! owns an HTTP client that already carries the session token, and exposes
//! one method per API exchange.

use super::types::{ConnectionSpec, Fleet, FleetMember, HostSpec, VolumeSpec};
use crate::auth::{self, Session};
use crate::config::FleetConfig;
use crate::error::{Error, Result};
use crate::http::HttpClient;
use crate::pagination::{ContinuationTokenPaginator, PaginatedFetcher};
use crate::types::{JsonValue, StringMap, CONTEXT_NAMES_PARAM};
use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::{debug, info};
use url::Url;

/// Authenticated client for the fleet management API
#[derive(Debug)]
pub struct FleetApi {
    http: HttpClient,
    page_size: u32,
    max_pages: Option<u32>,
}

impl FleetApi {
    /// Wrap an HTTP client (configured with the API base URL) for a session
    pub fn new(http: &HttpClient, session: &Session, page_size: u32) -> Self {
        Self {
            http: session.authorize(http),
            page_size,
            max_pages: None,
        }
    }

    /// Validate the configuration, log in, and return a ready client
    pub async fn connect(config: &FleetConfig) -> Result<Self> {
        config.validate()?;
        let http = HttpClient::with_config(config.http_client_config()?)?;

        info!("Logging in to {}", config.target()?);
        let session = auth::login(&http, &config.credentials()?).await?;

        Ok(Self::new(&http, &session, config.page_size).with_max_pages(config.max_pages))
    }

    /// Fail collection fetches that run past `max` pages
    #[must_use]
    pub fn with_max_pages(mut self, max: u32) -> Self {
        self.max_pages = Some(max);
        self
    }

    // ========================================================================
    // Collections
    // ========================================================================

    /// All fleets visible to the session
    pub async fn list_fleets(&self) -> Result<Vec<Fleet>> {
        self.fetch_all("fleets", &StringMap::new()).await
    }

    /// The first fleet; an empty collection is an error
    pub async fn select_fleet(&self) -> Result<Fleet> {
        self.list_fleets()
            .await?
            .into_iter()
            .next()
            .ok_or_else(|| Error::empty_collection("fleets"))
    }

    /// Names of the arrays that belong to `fleet_name`
    pub async fn list_fleet_members(&self, fleet_name: &str) -> Result<Vec<String>> {
        let mut params = StringMap::new();
        params.insert("fleet_name".to_string(), fleet_name.to_string());

        let members: Vec<FleetMember> = self.fetch_all("fleets/members", &params).await?;
        Ok(members
            .into_iter()
            .map(|m| m.member.name)
            .collect())
    }

    /// Every volume on the given member arrays
    pub async fn list_volumes(&self, contexts: &[String]) -> Result<Vec<JsonValue>> {
        self.fetch_all("volumes", &context_filter(contexts)).await
    }

    /// Every host on the given member arrays
    pub async fn list_hosts(&self, contexts: &[String]) -> Result<Vec<JsonValue>> {
        self.fetch_all("hosts", &context_filter(contexts)).await
    }

    // ========================================================================
    // Writes
    // ========================================================================

    /// Create a host on a member array
    pub async fn create_host(&self, spec: &HostSpec) -> Result<JsonValue> {
        info!("Creating host {} on {}", spec.name, spec.context.name);
        self.write("hosts", "host", spec).await
    }

    /// Create a volume on a member array
    pub async fn create_volume(&self, spec: &VolumeSpec) -> Result<JsonValue> {
        info!(
            "Creating volume {} ({} bytes) on {}",
            spec.name, spec.provisioned, spec.context.name
        );
        self.write("volumes", "volume", spec).await
    }

    /// Connect a volume to a host on a member array
    pub async fn create_connection(&self, spec: &ConnectionSpec) -> Result<JsonValue> {
        info!(
            "Connecting volume {} to host {} on {}",
            spec.volume_name, spec.host_name, spec.context_name
        );
        self.write("connections", "connection", spec).await
    }

    // ========================================================================
    // Internals
    // ========================================================================

    async fn fetch_all<T: DeserializeOwned>(&self, path: &str, params: &StringMap) -> Result<Vec<T>> {
        let paginator = ContinuationTokenPaginator::new(self.page_size);
        let mut fetcher = PaginatedFetcher::new(&self.http, &paginator);
        if let Some(max) = self.max_pages {
            fetcher = fetcher.max_pages(max);
        }

        let records = fetcher.fetch_all_as(path, params).await?;
        debug!("{path}: {} records", records.len());
        Ok(records)
    }

    async fn write<T: Serialize>(&self, path: &str, resource: &str, payload: &T) -> Result<JsonValue> {
        let body = serde_json::to_value(payload)?;
        let response = self
            .http
            .post(path, body)
            .await
            .map_err(|e| classify_write_error(resource, e))?;

        let text = response.text().await?;
        if text.trim().is_empty() {
            return Ok(JsonValue::Null);
        }
        Ok(serde_json::from_str(&text)?)
    }
}

/// First member name that is not the target address itself
///
/// `target` may be written as a URL (`https://10.21.204.131:443`); only its
/// host is compared against member names.
pub fn select_member_array<'a>(members: &'a [String], target: &str) -> Result<&'a str> {
    let host = target_host(target);
    members
        .iter()
        .map(String::as_str)
        .find(|name| !name.eq_ignore_ascii_case(&host))
        .ok_or_else(|| Error::NoMemberArray {
            target: target.to_string(),
        })
}

/// Host part of a target address, without scheme, port, path or IPv6 brackets
fn target_host(target: &str) -> String {
    let target = target.trim();
    let url = if target.contains("://") {
        target.to_string()
    } else {
        format!("https://{target}")
    };

    Url::parse(&url)
        .ok()
        .and_then(|u| {
            u.host_str()
                .map(|h| h.trim_matches(|c: char| c == '[' || c == ']').to_string())
        })
        .unwrap_or_else(|| target.to_string())
}

/// `context_names` filter: member names joined with `,`
fn context_filter(contexts: &[String]) -> StringMap {
    let mut params = StringMap::new();
    if !contexts.is_empty() {
        params.insert(CONTEXT_NAMES_PARAM.to_string(), contexts.join(","));
    }
    params
}

/// Surface "already exists" rejections as conflicts
fn classify_write_error(resource: &str, err: Error) -> Error {
    match err {
        Error::HttpStatus { status: 409, body } => Error::conflict(resource, body),
        Error::HttpStatus { status: 400, body }
            if body.to_lowercase().contains("already exists") =>
        {
            Error::conflict(resource, body)
        }
        other => other,
    }
}
