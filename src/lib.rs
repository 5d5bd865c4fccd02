// Allow common clippy pedantic lints that aren't critical for this codebase
#![allow(clippy::cast_possible_truncation)]
#![allow(clippy::cast_sign_loss)]
#![allow(clippy::cast_lossless)]
#![allow(clippy::too_many_lines)]
#![allow(clippy::unused_self)]
#![allow(clippy::must_use_candidate)]
#![allow(clippy::items_after_statements)]
#![allow(clippy::match_same_arms)]
#![allow(clippy::needless_pass_by_value)]

//! # fleetkit
//!
//! Client library and CLI for provisioning storage across an array fleet
//! through its REST API.
//!
//! ## Features
//!
//! - **Session bootstrap**: exchange a static API token for a session token
//! - **Continuation-token pagination**: follow `x-next-token` until exhausted
//! - **Fleet discovery**: fleets, member arrays, volumes and hosts
//! - **Provisioning**: create hosts, volumes and host/volume connections
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use fleetkit::{FleetApi, FleetConfig, Result};
//!
//! #[tokio::main]
//! async fn main() -> Result<()> {
//!     let mut config = FleetConfig::load("fleet.yaml")?;
//!     config.apply_env();
//!
//!     let api = FleetApi::connect(&config).await?;
//!     let fleet = api.select_fleet().await?;
//!     let members = api.list_fleet_members(&fleet.name).await?;
//!     let volumes = api.list_volumes(&members).await?;
//!     println!("{} volumes across {}", volumes.len(), fleet.name);
//!
//!     Ok(())
//! }
//! ```
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                         FleetApi                            │
//! │  fleets · members · volumes · hosts · create host/vol/conn  │
//! └─────────────────────────────────────────────────────────────┘
//!                               │
//! ┌──────────────┬──────────────┴───────┬───────────────────────┐
//! │     Auth     │      Pagination      │         HTTP          │
//! ├──────────────┼──────────────────────┼───────────────────────┤
//! │ login        │ x-next-token chain   │ Retry / Backoff       │
//! │ Session      │ limit                │ Rate Limit            │
//! │ x-auth-token │ repeated-token guard │ TLS opt-out (explicit)│
//! └──────────────┴──────────────────────┴───────────────────────┘
//! ```

#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::missing_panics_doc)]
#![allow(clippy::doc_markdown)]

// ============================================================================
// Module declarations
// ============================================================================

/// Error types
pub mod error;

/// Common types and type aliases
pub mod types;

/// Session bootstrap
pub mod auth;

/// HTTP client with retry and rate limiting
pub mod http;

/// Continuation-token pagination
pub mod pagination;

/// Fleet API operations and payloads
pub mod api;

/// Configuration loading and validation
pub mod config;

/// Command-line interface
pub mod cli;

// ============================================================================
// Re-exports
// ============================================================================

pub use error::{Error, Result};
pub use types::*;

pub use api::FleetApi;
pub use config::FleetConfig;

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Crate name
pub const NAME: &str = env!("CARGO_PKG_NAME");
