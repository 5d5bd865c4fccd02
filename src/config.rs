//! Configuration for connecting to an array fleet
//!
//! Configuration comes from an optional YAML file, is then overridden by
//! command-line flags, and the API token may finally be taken from the
//! `FLEET_API_TOKEN` environment variable.
//!
//! ```yaml
//! target: 10.21.204.131
//! api_version: "2.45"
//! api_token: 366a220f-...
//! page_size: 10
//! max_pages: 10000
//! insecure_skip_tls_verify: false
//! http:
//!   timeout_secs: 30
//!   max_retries: 3
//!   backoff: exponential
//!   initial_backoff_ms: 100
//!   max_backoff_secs: 60
//! demo:
//!   host_name: demo-host-01
//!   host_iqn: iqn.2025-08.com.fleetdemo:host01
//!   volume_name: APIDemo-vol1
//!   volume_size_bytes: 10737418240
//! ```

use crate::api::Iqn;
use crate::auth::Credentials;
use crate::error::{Error, Result};
use crate::http::HttpClientConfig;
use crate::types::{BackoffType, OptionStringExt};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use std::time::Duration;
use url::Url;

/// Environment variable consulted for the API token
pub const TOKEN_ENV_VAR: &str = "FLEET_API_TOKEN";

// ============================================================================
// Top-Level Config
// ============================================================================

/// Complete fleet client configuration
#[derive(Clone, PartialEq, Serialize, Deserialize)]
pub struct FleetConfig {
    /// Array address (host, IP, or URL with explicit scheme)
    #[serde(default)]
    pub target: Option<String>,

    /// REST API version
    #[serde(default = "default_api_version")]
    pub api_version: String,

    /// Static API token used for login
    #[serde(default)]
    pub api_token: Option<String>,

    /// Records requested per page
    #[serde(default = "default_page_size")]
    pub page_size: u32,

    /// Upper bound on pages fetched for one collection
    #[serde(default = "default_max_pages")]
    pub max_pages: u32,

    /// Skip TLS certificate verification
    #[serde(default)]
    pub insecure_skip_tls_verify: bool,

    /// HTTP client settings
    #[serde(default)]
    pub http: HttpSettings,

    /// Values used by the demo workflow
    #[serde(default)]
    pub demo: DemoSettings,
}

fn default_api_version() -> String {
    "2.45".to_string()
}

fn default_page_size() -> u32 {
    10
}

fn default_max_pages() -> u32 {
    10_000
}

impl Default for FleetConfig {
    fn default() -> Self {
        Self {
            target: None,
            api_version: default_api_version(),
            api_token: None,
            page_size: default_page_size(),
            max_pages: default_max_pages(),
            insecure_skip_tls_verify: false,
            http: HttpSettings::default(),
            demo: DemoSettings::default(),
        }
    }
}

impl std::fmt::Debug for FleetConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FleetConfig")
            .field("target", &self.target)
            .field("api_version", &self.api_version)
            .field("api_token", &self.api_token.as_ref().map(|_| "<redacted>"))
            .field("page_size", &self.page_size)
            .field("max_pages", &self.max_pages)
            .field("insecure_skip_tls_verify", &self.insecure_skip_tls_verify)
            .field("http", &self.http)
            .field("demo", &self.demo)
            .finish()
    }
}

// ============================================================================
// HTTP Settings
// ============================================================================

/// HTTP client settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HttpSettings {
    /// Request timeout in seconds
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,

    /// Retries for transport failures and 5xx
    #[serde(default = "default_max_retries")]
    pub max_retries: u32,

    /// Retry delay growth
    #[serde(default)]
    pub backoff: BackoffType,

    /// Delay before the first retry, in milliseconds
    #[serde(default = "default_initial_backoff_ms")]
    pub initial_backoff_ms: u64,

    /// Cap on any retry delay, in seconds
    #[serde(default = "default_max_backoff_secs")]
    pub max_backoff_secs: u64,

    /// Optional client-side request rate cap
    #[serde(default)]
    pub requests_per_second: Option<u32>,
}

fn default_timeout_secs() -> u64 {
    30
}

fn default_max_retries() -> u32 {
    3
}

fn default_initial_backoff_ms() -> u64 {
    100
}

fn default_max_backoff_secs() -> u64 {
    60
}

impl Default for HttpSettings {
    fn default() -> Self {
        Self {
            timeout_secs: default_timeout_secs(),
            max_retries: default_max_retries(),
            backoff: BackoffType::default(),
            initial_backoff_ms: default_initial_backoff_ms(),
            max_backoff_secs: default_max_backoff_secs(),
            requests_per_second: None,
        }
    }
}

// ============================================================================
// Demo Settings
// ============================================================================

/// Names and sizes used by the end-to-end demo workflow
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DemoSettings {
    #[serde(default = "default_host_name")]
    pub host_name: String,

    #[serde(default = "default_host_iqn")]
    pub host_iqn: String,

    #[serde(default = "default_volume_name")]
    pub volume_name: String,

    /// Provisioned size in bytes
    #[serde(default = "default_volume_size")]
    pub volume_size_bytes: u64,
}

fn default_host_name() -> String {
    "demo-host-01".to_string()
}

fn default_host_iqn() -> String {
    "iqn.2025-08.com.fleetdemo:host01".to_string()
}

fn default_volume_name() -> String {
    "APIDemo-vol1".to_string()
}

fn default_volume_size() -> u64 {
    10 * 1024 * 1024 * 1024
}

impl Default for DemoSettings {
    fn default() -> Self {
        Self {
            host_name: default_host_name(),
            host_iqn: default_host_iqn(),
            volume_name: default_volume_name(),
            volume_size_bytes: default_volume_size(),
        }
    }
}

// ============================================================================
// Loading and Validation
// ============================================================================

impl FleetConfig {
    /// Load configuration from a YAML file
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path).map_err(|e| {
            Error::config(format!(
                "Failed to read config file '{}': {e}",
                path.display()
            ))
        })?;
        Self::from_yaml_str(&content)
    }

    /// Parse configuration from a YAML string
    pub fn from_yaml_str(yaml: &str) -> Result<Self> {
        serde_yaml::from_str(yaml)
            .map_err(|e| Error::config(format!("Failed to parse config YAML: {e}")))
    }

    /// Take the API token from `FLEET_API_TOKEN` if none is configured
    pub fn apply_env(&mut self) {
        self.fill_token(std::env::var(TOKEN_ENV_VAR).ok());
    }

    /// Use `fallback` as the API token if none is configured
    pub fn fill_token(&mut self, fallback: Option<String>) {
        if self.api_token.clone().none_if_empty().is_none() {
            self.api_token = fallback.none_if_empty();
        }
    }

    /// Check that the configuration can be used to connect
    pub fn validate(&self) -> Result<()> {
        self.base_url()?;
        self.credentials()?;

        if self.page_size == 0 {
            return Err(Error::invalid_value("page_size", "must be greater than zero"));
        }
        if self.max_pages == 0 {
            return Err(Error::invalid_value("max_pages", "must be greater than zero"));
        }
        if self.http.timeout_secs == 0 {
            return Err(Error::invalid_value(
                "http.timeout_secs",
                "must be greater than zero",
            ));
        }
        Iqn::parse(&self.demo.host_iqn)?;

        Ok(())
    }

    /// The configured target address
    pub fn target(&self) -> Result<&str> {
        self.target
            .as_deref()
            .map(str::trim)
            .filter(|t| !t.is_empty())
            .ok_or_else(|| Error::missing_field("target"))
    }

    /// Login credentials
    pub fn credentials(&self) -> Result<Credentials> {
        self.api_token
            .as_deref()
            .filter(|t| !t.is_empty())
            .map(Credentials::new)
            .ok_or_else(|| {
                Error::config(format!(
                    "Missing required config field: api_token (or set {TOKEN_ENV_VAR})"
                ))
            })
    }

    /// API base URL: `https://{target}/api/{version}`
    ///
    /// A target that already carries an `http://` or `https://` scheme keeps it.
    pub fn base_url(&self) -> Result<String> {
        let target = self.target()?.trim_end_matches('/');
        let version = self.api_version.trim();
        if version.is_empty() {
            return Err(Error::invalid_value("api_version", "must not be empty"));
        }

        let root = if target.starts_with("http://") || target.starts_with("https://") {
            target.to_string()
        } else {
            format!("https://{target}")
        };

        let url = format!("{root}/api/{version}");
        Url::parse(&url)?;
        Ok(url)
    }

    /// HTTP client configuration derived from these settings
    pub fn http_client_config(&self) -> Result<HttpClientConfig> {
        let mut builder = HttpClientConfig::builder()
            .base_url(self.base_url()?)
            .timeout(Duration::from_secs(self.http.timeout_secs))
            .max_retries(self.http.max_retries)
            .backoff(
                self.http.backoff,
                Duration::from_millis(self.http.initial_backoff_ms),
                Duration::from_secs(self.http.max_backoff_secs),
            )
            .danger_accept_invalid_certs(self.insecure_skip_tls_verify);

        if let Some(rps) = self.http.requests_per_second {
            builder = builder.rate_limit(rps);
        }

        Ok(builder.build())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::io::Write;

    fn valid() -> FleetConfig {
        FleetConfig {
            target: Some("10.21.204.131".to_string()),
            api_token: Some("token".to_string()),
            ..FleetConfig::default()
        }
    }

    #[test]
    fn test_defaults() {
        let config = FleetConfig::default();
        assert_eq!(config.api_version, "2.45");
        assert_eq!(config.page_size, 10);
        assert_eq!(config.max_pages, 10_000);
        assert!(!config.insecure_skip_tls_verify);
        assert_eq!(config.http.timeout_secs, 30);
        assert_eq!(config.http.max_retries, 3);
        assert_eq!(config.http.backoff, BackoffType::Exponential);
        assert_eq!(config.demo.volume_size_bytes, 10_737_418_240);
        assert_eq!(config.demo.host_iqn, "iqn.2025-08.com.fleetdemo:host01");
    }

    #[test]
    fn test_from_yaml_partial_uses_defaults() {
        let config = FleetConfig::from_yaml_str(
            r#"
target: array.example.com
api_token: abc
page_size: 50
max_pages: 20
http:
  max_retries: 1
  backoff: linear
demo:
  volume_name: other-vol
"#,
        )
        .unwrap();

        assert_eq!(config.target.as_deref(), Some("array.example.com"));
        assert_eq!(config.page_size, 50);
        assert_eq!(config.max_pages, 20);
        assert_eq!(config.http.max_retries, 1);
        assert_eq!(config.http.backoff, BackoffType::Linear);
        assert_eq!(config.http.initial_backoff_ms, 100);
        assert_eq!(config.http.timeout_secs, 30);
        assert_eq!(config.demo.volume_name, "other-vol");
        assert_eq!(config.demo.host_name, "demo-host-01");
        config.validate().unwrap();
    }

    #[test]
    fn test_from_yaml_invalid() {
        let err = FleetConfig::from_yaml_str("page_size: [1, 2]").unwrap_err();
        assert!(matches!(err, Error::Config { .. }));
    }

    #[test]
    fn test_load_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "target: 10.0.0.1\napi_token: t\ninsecure_skip_tls_verify: true").unwrap();

        let config = FleetConfig::load(file.path()).unwrap();
        assert_eq!(config.target.as_deref(), Some("10.0.0.1"));
        assert!(config.insecure_skip_tls_verify);
    }

    #[test]
    fn test_load_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let err = FleetConfig::load(dir.path().join("nope.yaml")).unwrap_err();
        assert!(err.to_string().contains("Failed to read config file"));
    }

    #[test]
    fn test_base_url() {
        assert_eq!(valid().base_url().unwrap(), "https://10.21.204.131/api/2.45");

        let mut config = valid();
        config.target = Some("http://127.0.0.1:8080/".to_string());
        config.api_version = "2.30".to_string();
        assert_eq!(config.base_url().unwrap(), "http://127.0.0.1:8080/api/2.30");
    }

    #[test]
    fn test_validate_missing_target() {
        let mut config = valid();
        config.target = Some("  ".to_string());
        let err = config.validate().unwrap_err();
        assert!(matches!(err, Error::MissingConfigField { ref field } if field == "target"));
    }

    #[test]
    fn test_validate_missing_token() {
        let mut config = valid();
        config.api_token = None;
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("api_token"));
        assert!(err.to_string().contains(TOKEN_ENV_VAR));
    }

    #[test]
    fn test_validate_zero_page_size() {
        let mut config = valid();
        config.page_size = 0;
        let err = config.validate().unwrap_err();
        assert!(matches!(err, Error::InvalidConfigValue { ref field, .. } if field == "page_size"));
    }

    #[test]
    fn test_validate_zero_max_pages() {
        let mut config = valid();
        config.max_pages = 0;
        let err = config.validate().unwrap_err();
        assert!(matches!(err, Error::InvalidConfigValue { ref field, .. } if field == "max_pages"));
    }

    #[test]
    fn test_validate_bad_demo_iqn() {
        let mut config = valid();
        config.demo.host_iqn = "not-an-iqn".to_string();
        assert!(matches!(
            config.validate().unwrap_err(),
            Error::InvalidIqn { .. }
        ));
    }

    #[test]
    fn test_fill_token() {
        let mut config = FleetConfig::default();
        config.fill_token(Some("from-env".to_string()));
        assert_eq!(config.api_token.as_deref(), Some("from-env"));

        // Configured token wins
        config.fill_token(Some("other".to_string()));
        assert_eq!(config.api_token.as_deref(), Some("from-env"));

        let mut config = FleetConfig::default();
        config.fill_token(Some(String::new()));
        assert!(config.api_token.is_none());
    }

    #[test]
    fn test_http_client_config() {
        let mut config = valid();
        config.insecure_skip_tls_verify = true;
        config.http.requests_per_second = Some(5);
        config.http.timeout_secs = 12;
        config.http.backoff = BackoffType::Constant;
        config.http.initial_backoff_ms = 250;
        config.http.max_backoff_secs = 5;

        let http = config.http_client_config().unwrap();
        assert_eq!(
            http.base_url.as_deref(),
            Some("https://10.21.204.131/api/2.45")
        );
        assert!(http.accept_invalid_certs);
        assert_eq!(http.timeout, Duration::from_secs(12));
        assert_eq!(http.rate_limit, Some(5));
        assert_eq!(http.backoff_type, BackoffType::Constant);
        assert_eq!(http.initial_backoff, Duration::from_millis(250));
        assert_eq!(http.max_backoff, Duration::from_secs(5));
    }

    #[test]
    fn test_debug_redacts_token() {
        let debug = format!("{:?}", valid());
        assert!(!debug.contains("\"token\""));
        assert!(debug.contains("<redacted>"));
    }
}
