//! Fleet API record and payload types
//!
//! Read-side records keep any fields they do not name in `extra`, so
//! printing a record never loses information the array returned.
//! Write-side payloads serialise to the exact shapes the array expects.

use crate::error::{Error, Result};
use crate::types::JsonObject;
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

// ============================================================================
// Records
// ============================================================================

/// A fleet: a named grouping of arrays managed as a unit
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Fleet {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(flatten)]
    pub extra: JsonObject,
}

/// Name/id reference to another object
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Reference {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
}

/// One entry of `GET /fleets/members`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FleetMember {
    pub member: Reference,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fleet: Option<Reference>,
    #[serde(flatten)]
    pub extra: JsonObject,
}

impl FleetMember {
    /// The member array's name
    pub fn name(&self) -> &str {
        &self.member.name
    }
}

// ============================================================================
// IQN
// ============================================================================

/// Longest IQN allowed by RFC 3720
const MAX_IQN_LEN: usize = 223;

static IQN_PATTERN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"^iqn\.\d{4}-(0[1-9]|1[0-2])\.[a-z0-9]([a-z0-9-]*[a-z0-9])?(\.[a-z0-9]([a-z0-9-]*[a-z0-9])?)*(:[^\s]+)?$",
    )
    .unwrap_or_else(|e| panic!("IQN pattern must compile: {e}"))
});

/// An iSCSI Qualified Name, e.g. `iqn.2025-08.com.fleetdemo:host01`
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct Iqn(String);

impl Iqn {
    /// Parse and validate an IQN
    pub fn parse(value: &str) -> Result<Self> {
        let invalid = |message: &str| Error::InvalidIqn {
            value: value.to_string(),
            message: message.to_string(),
        };

        if value.len() > MAX_IQN_LEN {
            return Err(invalid("longer than 223 bytes"));
        }
        if !IQN_PATTERN.is_match(value) {
            return Err(invalid(
                "expected iqn.YYYY-MM.reversed.domain[:identifier] in lowercase",
            ));
        }

        Ok(Self(value.to_string()))
    }

    /// The IQN as a string slice
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl FromStr for Iqn {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

impl fmt::Display for Iqn {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

// ============================================================================
// Write Payloads
// ============================================================================

/// Target context of a write: the member array it applies to
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Context {
    pub name: String,
}

impl Context {
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }
}

/// `POST /hosts` payload
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct HostSpec {
    #[serde(rename = "names")]
    pub name: String,
    pub iqn: Vec<Iqn>,
    pub context: Context,
}

impl HostSpec {
    pub fn new(name: impl Into<String>, iqn: Iqn, member: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            iqn: vec![iqn],
            context: Context::new(member),
        }
    }
}

/// `POST /volumes` payload
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct VolumeSpec {
    #[serde(rename = "names")]
    pub name: String,
    /// Provisioned size in bytes
    pub provisioned: u64,
    pub context: Context,
}

impl VolumeSpec {
    pub fn new(name: impl Into<String>, provisioned: u64, member: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            provisioned,
            context: Context::new(member),
        }
    }
}

/// `POST /connections` payload
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ConnectionSpec {
    #[serde(rename = "volume_names")]
    pub volume_name: String,
    #[serde(rename = "context_names")]
    pub context_name: String,
    #[serde(rename = "host_names")]
    pub host_name: String,
}

impl ConnectionSpec {
    pub fn new(
        volume_name: impl Into<String>,
        host_name: impl Into<String>,
        member: impl Into<String>,
    ) -> Self {
        Self {
            volume_name: volume_name.into(),
            context_name: member.into(),
            host_name: host_name.into(),
        }
    }
}
