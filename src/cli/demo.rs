//! End-to-end provisioning walkthrough
//!
//! Logs in, discovers the fleet and its members, inventories volumes and
//! hosts, then provisions a host, a volume, and the connection between them
//! on the first member array that is not the login target.

use crate::api::{select_member_array, ConnectionSpec, FleetApi, HostSpec, Iqn, VolumeSpec};
use crate::config::DemoSettings;
use crate::error::{Result, ResultExt};
use crate::types::JsonValue;
use serde::Serialize;
use tracing::{info, warn};

/// What the walkthrough saw and did
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DemoReport {
    pub fleet: String,
    pub members: Vec<String>,
    pub volume_count: usize,
    pub host_count: usize,
    /// Full volume inventory across the members
    pub volumes: Vec<JsonValue>,
    /// Full host inventory across the members
    pub hosts: Vec<JsonValue>,
    pub member_array: String,
    pub host: StepOutcome,
    pub volume: StepOutcome,
    pub connection: StepOutcome,
}

/// Result of one create step
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum StepOutcome {
    Created { response: JsonValue },
    AlreadyExists { message: String },
}

/// Run the walkthrough against an authenticated session
///
/// `target` is the address used to log in; it is never chosen as the
/// member array for the create steps. Creates rejected because the object
/// already exists are reported, not treated as failures, so the walkthrough
/// can be re-run.
pub async fn run_demo(api: &FleetApi, target: &str, demo: &DemoSettings) -> Result<DemoReport> {
    let iqn = Iqn::parse(&demo.host_iqn).context("demo.host_iqn")?;

    let fleet = api.select_fleet().await?;
    info!("Fleet: {}", fleet.name);

    let members = api.list_fleet_members(&fleet.name).await?;
    info!("Members: {}", members.join(", "));

    let volumes = api.list_volumes(&members).await?;
    info!("{} volumes across the fleet", volumes.len());

    let hosts = api.list_hosts(&members).await?;
    info!("{} hosts across the fleet", hosts.len());

    let member_array = select_member_array(&members, target)?.to_string();
    info!("Provisioning on {member_array}");

    let host = step(
        api.create_host(&HostSpec::new(&demo.host_name, iqn, &member_array))
            .await,
    )?;
    let volume = step(
        api.create_volume(&VolumeSpec::new(
            &demo.volume_name,
            demo.volume_size_bytes,
            &member_array,
        ))
        .await,
    )?;
    let connection = step(
        api.create_connection(&ConnectionSpec::new(
            &demo.volume_name,
            &demo.host_name,
            &member_array,
        ))
        .await,
    )?;

    Ok(DemoReport {
        fleet: fleet.name,
        members,
        volume_count: volumes.len(),
        host_count: hosts.len(),
        volumes,
        hosts,
        member_array,
        host,
        volume,
        connection,
    })
}

fn step(result: Result<JsonValue>) -> Result<StepOutcome> {
    match result {
        Ok(response) => Ok(StepOutcome::Created { response }),
        Err(e) if e.is_conflict() => {
            warn!("{e}");
            Ok(StepOutcome::AlreadyExists {
                message: e.to_string(),
            })
        }
        Err(e) => Err(e),
    }
}
