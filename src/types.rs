//! Common types used throughout fleetkit
//!
//! This module contains shared type definitions, type aliases,
//! and utility types used across multiple modules.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

// ============================================================================
// Type Aliases
// ============================================================================

/// JSON value type (re-exported from serde_json)
pub type JsonValue = serde_json::Value;

/// JSON object type
pub type JsonObject = serde_json::Map<String, JsonValue>;

/// Generic key-value map with string keys and values
pub type StringMap = HashMap<String, String>;

// ============================================================================
// Header and Parameter Names
// ============================================================================

/// Header carrying the static API token on the login request
pub const API_TOKEN_HEADER: &str = "api-token";

/// Header carrying the session token returned by login
pub const AUTH_TOKEN_HEADER: &str = "x-auth-token";

/// Response header carrying the continuation token
pub const NEXT_TOKEN_HEADER: &str = "x-next-token";

/// Query parameter echoing the continuation token
pub const CONTINUATION_TOKEN_PARAM: &str = "continuation_token";

/// Query parameter bounding the page size
pub const LIMIT_PARAM: &str = "limit";

/// Query parameter filtering collections by fleet member
pub const CONTEXT_NAMES_PARAM: &str = "context_names";

// ============================================================================
// Backoff Type
// ============================================================================

/// Type of backoff for retries
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BackoffType {
    /// Constant delay between retries
    Constant,
    /// Linear increase in delay
    Linear,
    /// Exponential increase in delay
    #[default]
    Exponential,
}

// ============================================================================
// Utilities
// ============================================================================

/// Extension trait for Option<String> to handle empty strings
pub trait OptionStringExt {
    /// Returns None if the string is empty
    fn none_if_empty(self) -> Option<String>;
}

impl OptionStringExt for Option<String> {
    fn none_if_empty(self) -> Option<String> {
        self.filter(|s| !s.is_empty())
    }
}

impl OptionStringExt for String {
    fn none_if_empty(self) -> Option<String> {
        if self.is_empty() {
            None
        } else {
            Some(self)
        }
    }
}
