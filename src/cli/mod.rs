//! CLI module
//!
//! Command-line interface for provisioning against an array fleet.
//!
//! # Commands
//!
//! - `login` - Confirm the API token yields a session
//! - `fleets` / `members` - Discover the fleet and its arrays
//! - `volumes` / `hosts` - Inventory across member arrays
//! - `create-host` / `create-volume` / `connect` - Provision on a member array
//! - `demo` - Run the whole walkthrough

mod commands;
mod demo;
mod runner;

#[cfg(test)]
mod tests;

pub use commands::{Cli, Commands, OutputFormat};
pub use demo::{run_demo, DemoReport, StepOutcome};
pub use runner::Runner;
