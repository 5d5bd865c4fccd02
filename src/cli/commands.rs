//! CLI commands and argument parsing

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Fleet storage provisioning CLI
#[derive(Parser, Debug)]
#[command(name = "fleetkit")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Configuration file (YAML)
    #[arg(short = 'C', long, global = true)]
    pub config: Option<PathBuf>,

    /// Array address (overrides `target` in the config file)
    #[arg(short, long, global = true)]
    pub target: Option<String>,

    /// REST API version
    #[arg(long, global = true)]
    pub api_version: Option<String>,

    /// Static API token (falls back to FLEET_API_TOKEN)
    #[arg(long, global = true)]
    pub api_token: Option<String>,

    /// Records requested per page
    #[arg(long, global = true)]
    pub page_size: Option<u32>,

    /// Fail a listing that runs past this many pages
    #[arg(long, global = true)]
    pub max_pages: Option<u32>,

    /// Skip TLS certificate verification
    #[arg(short = 'k', long, global = true)]
    pub insecure: bool,

    /// Output format
    #[arg(short, long, global = true, default_value = "json")]
    pub format: OutputFormat,

    /// Verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

/// CLI subcommands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Log in and confirm a session token is issued
    Login,

    /// List fleets
    Fleets,

    /// List the member arrays of a fleet
    Members {
        /// Fleet name (defaults to the first fleet)
        #[arg(long)]
        fleet: Option<String>,
    },

    /// List volumes across member arrays
    Volumes {
        /// Member arrays to query (comma-separated, default = all members)
        #[arg(long, value_delimiter = ',')]
        contexts: Vec<String>,
    },

    /// List hosts across member arrays
    Hosts {
        /// Member arrays to query (comma-separated, default = all members)
        #[arg(long, value_delimiter = ',')]
        contexts: Vec<String>,
    },

    /// Create a host on a member array
    CreateHost {
        /// Host name
        #[arg(long)]
        name: String,

        /// Initiator IQN
        #[arg(long)]
        iqn: String,

        /// Member array (defaults to the first member other than the target)
        #[arg(long)]
        member: Option<String>,
    },

    /// Create a volume on a member array
    CreateVolume {
        /// Volume name
        #[arg(long)]
        name: String,

        /// Provisioned size in bytes
        #[arg(long)]
        size: u64,

        /// Member array (defaults to the first member other than the target)
        #[arg(long)]
        member: Option<String>,
    },

    /// Connect a volume to a host
    Connect {
        /// Volume name
        #[arg(long)]
        volume: String,

        /// Host name
        #[arg(long)]
        host: String,

        /// Member array (defaults to the first member other than the target)
        #[arg(long)]
        member: Option<String>,
    },

    /// Run the end-to-end provisioning walkthrough
    Demo,
}

/// Output format
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum OutputFormat {
    /// Compact JSON, one document per line
    Json,
    /// Indented JSON
    Pretty,
}
