//! CLI runner - executes commands

use crate::api::{select_member_array, ConnectionSpec, FleetApi, HostSpec, Iqn, VolumeSpec};
use crate::auth;
use crate::cli::commands::{Cli, Commands, OutputFormat};
use crate::cli::demo::run_demo;
use crate::config::FleetConfig;
use crate::error::{Error, Result, ResultExt};
use crate::http::HttpClient;
use serde::Serialize;
use serde_json::json;

/// CLI runner
pub struct Runner {
    cli: Cli,
}

impl Runner {
    /// Create a new runner
    pub fn new(cli: Cli) -> Self {
        Self { cli }
    }

    /// Run the CLI command
    pub async fn run(&self) -> Result<()> {
        let mut config = self.load_config()?;
        config.apply_env();

        match &self.cli.command {
            Commands::Login => self.login(&config).await,
            Commands::Fleets => {
                let api = FleetApi::connect(&config).await?;
                self.output(&api.list_fleets().await?)
            }
            Commands::Members { fleet } => {
                let api = FleetApi::connect(&config).await?;
                let fleet = match fleet {
                    Some(name) => name.clone(),
                    None => api.select_fleet().await?.name,
                };
                self.output(&json!({
                    "fleet": fleet,
                    "members": api.list_fleet_members(&fleet).await?,
                }))
            }
            Commands::Volumes { contexts } => {
                let api = FleetApi::connect(&config).await?;
                let contexts = resolve_contexts(&api, contexts).await?;
                self.output(&api.list_volumes(&contexts).await?)
            }
            Commands::Hosts { contexts } => {
                let api = FleetApi::connect(&config).await?;
                let contexts = resolve_contexts(&api, contexts).await?;
                self.output(&api.list_hosts(&contexts).await?)
            }
            Commands::CreateHost { name, iqn, member } => {
                let iqn = Iqn::parse(iqn).context("--iqn")?;
                let api = FleetApi::connect(&config).await?;
                let member = resolve_member(&api, &config, member.as_deref()).await?;
                self.output(&api.create_host(&HostSpec::new(name, iqn, member)).await?)
            }
            Commands::CreateVolume { name, size, member } => {
                let api = FleetApi::connect(&config).await?;
                let member = resolve_member(&api, &config, member.as_deref()).await?;
                self.output(
                    &api.create_volume(&VolumeSpec::new(name, *size, member))
                        .await?,
                )
            }
            Commands::Connect {
                volume,
                host,
                member,
            } => {
                let api = FleetApi::connect(&config).await?;
                let member = resolve_member(&api, &config, member.as_deref()).await?;
                self.output(
                    &api.create_connection(&ConnectionSpec::new(volume, host, member))
                        .await?,
                )
            }
            Commands::Demo => {
                let api = FleetApi::connect(&config).await?;
                let report = run_demo(&api, config.target()?, &config.demo).await?;
                self.output(&report)
            }
        }
    }

    /// Build the configuration: file, then command-line overrides
    pub fn load_config(&self) -> Result<FleetConfig> {
        let mut config = match &self.cli.config {
            Some(path) => FleetConfig::load(path)?,
            None => FleetConfig::default(),
        };

        if let Some(target) = &self.cli.target {
            config.target = Some(target.clone());
        }
        if let Some(version) = &self.cli.api_version {
            config.api_version = version.clone();
        }
        if let Some(token) = &self.cli.api_token {
            config.api_token = Some(token.clone());
        }
        if let Some(page_size) = self.cli.page_size {
            config.page_size = page_size;
        }
        if let Some(max_pages) = self.cli.max_pages {
            config.max_pages = max_pages;
        }
        if self.cli.insecure {
            config.insecure_skip_tls_verify = true;
        }

        Ok(config)
    }

    /// Log in and report success without printing the session token
    async fn login(&self, config: &FleetConfig) -> Result<()> {
        config.validate()?;
        let http = HttpClient::with_config(config.http_client_config()?)?;
        let session = auth::login(&http, &config.credentials()?).await?;

        self.output(&json!({
            "status": "authenticated",
            "target": config.target()?,
            "api_version": config.api_version,
            "session_token_length": session.auth_token().len(),
        }))
    }

    /// Write a result document to stdout
    fn output<T: Serialize + ?Sized>(&self, value: &T) -> Result<()> {
        let rendered = match self.cli.format {
            OutputFormat::Json => serde_json::to_string(value)?,
            OutputFormat::Pretty => serde_json::to_string_pretty(value)?,
        };
        println!("{rendered}");
        Ok(())
    }
}

/// Explicit contexts, or every member of the first fleet
async fn resolve_contexts(api: &FleetApi, contexts: &[String]) -> Result<Vec<String>> {
    if !contexts.is_empty() {
        return Ok(contexts.to_vec());
    }
    let fleet = api.select_fleet().await?;
    api.list_fleet_members(&fleet.name).await
}

/// Explicit member, or the first fleet member that is not the login target
async fn resolve_member(
    api: &FleetApi,
    config: &FleetConfig,
    member: Option<&str>,
) -> Result<String> {
    if let Some(member) = member {
        if member.trim().is_empty() {
            return Err(Error::invalid_value("member", "must not be empty"));
        }
        return Ok(member.to_string());
    }

    let fleet = api.select_fleet().await?;
    let members = api.list_fleet_members(&fleet.name).await?;
    Ok(select_member_array(&members, config.target()?)?.to_string())
}
