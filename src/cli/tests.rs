//! Tests for the CLI module

use super::*;
use crate::api::FleetApi;
use crate::config::{DemoSettings, FleetConfig};
use crate::error::Error;
use clap::Parser;
use pretty_assertions::assert_eq;
use serde_json::json;
use std::io::Write;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

// ============================================================================
// Argument Parsing
// ============================================================================

#[test]
fn test_parse_global_flags() {
    let cli = Cli::try_parse_from([
        "fleetkit",
        "--target",
        "10.21.204.131",
        "--api-version",
        "2.30",
        "--page-size",
        "25",
        "--max-pages",
        "40",
        "-k",
        "--format",
        "pretty",
        "fleets",
    ])
    .unwrap();

    assert_eq!(cli.target.as_deref(), Some("10.21.204.131"));
    assert_eq!(cli.api_version.as_deref(), Some("2.30"));
    assert_eq!(cli.page_size, Some(25));
    assert_eq!(cli.max_pages, Some(40));
    assert!(cli.insecure);
    assert_eq!(cli.format, OutputFormat::Pretty);
    assert!(matches!(cli.command, Commands::Fleets));
}

#[test]
fn test_parse_contexts_comma_separated() {
    let cli = Cli::try_parse_from(["fleetkit", "volumes", "--contexts", "array-1,array-2"]).unwrap();

    match cli.command {
        Commands::Volumes { contexts } => {
            assert_eq!(contexts, vec!["array-1".to_string(), "array-2".to_string()]);
        }
        other => panic!("unexpected command: {other:?}"),
    }
}

#[test]
fn test_parse_create_volume() {
    let cli = Cli::try_parse_from([
        "fleetkit",
        "create-volume",
        "--name",
        "vol1",
        "--size",
        "10737418240",
        "--member",
        "array-2",
    ])
    .unwrap();

    match cli.command {
        Commands::CreateVolume { name, size, member } => {
            assert_eq!(name, "vol1");
            assert_eq!(size, 10_737_418_240);
            assert_eq!(member.as_deref(), Some("array-2"));
        }
        other => panic!("unexpected command: {other:?}"),
    }
}

#[test]
fn test_parse_rejects_unknown_format() {
    assert!(Cli::try_parse_from(["fleetkit", "--format", "parquet", "fleets"]).is_err());
}

#[test]
fn test_parse_requires_subcommand() {
    assert!(Cli::try_parse_from(["fleetkit"]).is_err());
}

// ============================================================================
// Config Assembly
// ============================================================================

#[test]
fn test_flags_override_config_file() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    writeln!(
        file,
        "target: from-file\napi_token: file-token\npage_size: 50\ndemo:\n  volume_name: file-vol"
    )
    .unwrap();
    let config_path = file.path().to_string_lossy().to_string();

    let cli = Cli::try_parse_from([
        "fleetkit",
        "--config",
        config_path.as_str(),
        "--target",
        "from-flag",
        "--insecure",
        "--max-pages",
        "3",
        "login",
    ])
    .unwrap();
    let config = Runner::new(cli).load_config().unwrap();

    assert_eq!(config.target.as_deref(), Some("from-flag"));
    assert_eq!(config.api_token.as_deref(), Some("file-token"));
    assert_eq!(config.page_size, 50);
    assert_eq!(config.max_pages, 3);
    assert!(config.insecure_skip_tls_verify);
    assert_eq!(config.demo.volume_name, "file-vol");
}

#[test]
fn test_load_config_without_file_uses_defaults() {
    let cli = Cli::try_parse_from(["fleetkit", "--api-token", "t", "demo"]).unwrap();
    let config = Runner::new(cli).load_config().unwrap();

    assert_eq!(config.api_version, "2.45");
    assert_eq!(config.api_token.as_deref(), Some("t"));
    assert_eq!(config.max_pages, 10_000);
    assert!(config.target.is_none());
    assert!(!config.insecure_skip_tls_verify);
}

#[test]
fn test_load_config_missing_file() {
    let cli = Cli::try_parse_from(["fleetkit", "--config", "/nonexistent/fleet.yaml", "login"])
        .unwrap();
    assert!(Runner::new(cli).load_config().is_err());
}

// ============================================================================
// Demo Workflow
// ============================================================================

const API: &str = "/api/2.45";

async fn mount_discovery(server: &MockServer, members: &[&str]) {
    let members: Vec<_> = members
        .iter()
        .map(|name| json!({"member": {"name": name}}))
        .collect();

    Mock::given(method("POST"))
        .and(path(format!("{API}/login")))
        .respond_with(ResponseTemplate::new(200).insert_header("x-auth-token", "s"))
        .mount(server)
        .await;
    Mock::given(method("GET"))
        .and(path(format!("{API}/fleets")))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "items": [{"name": "fleet-a"}]
        })))
        .mount(server)
        .await;
    Mock::given(method("GET"))
        .and(path(format!("{API}/fleets/members")))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"items": members})))
        .mount(server)
        .await;
    for resource in ["volumes", "hosts"] {
        Mock::given(method("GET"))
            .and(path(format!("{API}/{resource}")))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"items": []})))
            .mount(server)
            .await;
    }
}

async fn connect(server: &MockServer) -> FleetApi {
    let mut config = FleetConfig {
        target: Some(server.uri()),
        api_token: Some("t".to_string()),
        ..FleetConfig::default()
    };
    config.http.max_retries = 0;
    FleetApi::connect(&config).await.unwrap()
}

#[tokio::test]
async fn test_demo_tolerates_existing_objects() {
    let mock_server = MockServer::start().await;
    mount_discovery(&mock_server, &["array-1", "array-2"]).await;

    Mock::given(method("POST"))
        .and(path(format!("{API}/hosts")))
        .respond_with(ResponseTemplate::new(400).set_body_string("Host already exists."))
        .mount(&mock_server)
        .await;
    Mock::given(method("POST"))
        .and(path(format!("{API}/volumes")))
        .respond_with(ResponseTemplate::new(409).set_body_string("Volume already exists."))
        .mount(&mock_server)
        .await;
    Mock::given(method("POST"))
        .and(path(format!("{API}/connections")))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"items": [{}]})))
        .mount(&mock_server)
        .await;

    let api = connect(&mock_server).await;
    let report = run_demo(&api, "array-1", &DemoSettings::default())
        .await
        .unwrap();

    assert_eq!(report.member_array, "array-2");
    assert!(matches!(report.host, StepOutcome::AlreadyExists { .. }));
    assert!(matches!(report.volume, StepOutcome::AlreadyExists { .. }));
    assert!(matches!(report.connection, StepOutcome::Created { .. }));
}

#[tokio::test]
async fn test_demo_fails_on_other_write_errors() {
    let mock_server = MockServer::start().await;
    mount_discovery(&mock_server, &["array-1", "array-2"]).await;

    Mock::given(method("POST"))
        .and(path(format!("{API}/hosts")))
        .respond_with(ResponseTemplate::new(400).set_body_string("Invalid host name."))
        .mount(&mock_server)
        .await;

    let api = connect(&mock_server).await;
    let err = run_demo(&api, "array-1", &DemoSettings::default())
        .await
        .unwrap_err();

    assert!(matches!(err, Error::HttpStatus { status: 400, .. }));
}

#[tokio::test]
async fn test_demo_needs_a_member_other_than_target() {
    let mock_server = MockServer::start().await;
    mount_discovery(&mock_server, &["array-1"]).await;

    let api = connect(&mock_server).await;
    let err = run_demo(&api, "array-1", &DemoSettings::default())
        .await
        .unwrap_err();

    assert!(matches!(err, Error::NoMemberArray { ref target } if target == "array-1"));

    // Discovery ran but nothing was written
    let requests = mock_server.received_requests().await.unwrap();
    assert_eq!(
        requests.iter().filter(|r| r.method.as_str() == "POST").count(),
        1
    );
}

#[tokio::test]
async fn test_demo_skips_target_given_as_url() {
    let mock_server = MockServer::start().await;
    mount_discovery(&mock_server, &["127.0.0.1", "array-2"]).await;

    for resource in ["hosts", "volumes", "connections"] {
        Mock::given(method("POST"))
            .and(path(format!("{API}/{resource}")))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"items": [{}]})))
            .mount(&mock_server)
            .await;
    }

    let api = connect(&mock_server).await;
    // server.uri() is `http://127.0.0.1:<port>`
    let report = run_demo(&api, &mock_server.uri(), &DemoSettings::default())
        .await
        .unwrap();

    assert_eq!(report.member_array, "array-2");
}

#[tokio::test]
async fn test_demo_report_lists_inventory() {
    let mock_server = MockServer::start().await;

    // Mounted ahead of the empty discovery listings so they match first
    Mock::given(method("GET"))
        .and(path(format!("{API}/volumes")))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "items": [{"name": "vol-a"}, {"name": "vol-b"}]
        })))
        .mount(&mock_server)
        .await;
    Mock::given(method("GET"))
        .and(path(format!("{API}/hosts")))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "items": [{"name": "host-a"}]
        })))
        .mount(&mock_server)
        .await;
    mount_discovery(&mock_server, &["array-1", "array-2"]).await;
    for resource in ["hosts", "volumes", "connections"] {
        Mock::given(method("POST"))
            .and(path(format!("{API}/{resource}")))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"items": [{}]})))
            .mount(&mock_server)
            .await;
    }

    let api = connect(&mock_server).await;
    let report = run_demo(&api, "array-1", &DemoSettings::default())
        .await
        .unwrap();

    assert_eq!(report.volume_count, 2);
    assert_eq!(report.volumes, vec![json!({"name": "vol-a"}), json!({"name": "vol-b"})]);
    assert_eq!(report.host_count, 1);
    assert_eq!(report.hosts, vec![json!({"name": "host-a"})]);

    let rendered = serde_json::to_value(&report).unwrap();
    assert_eq!(rendered["volumes"][1]["name"], "vol-b");
    assert_eq!(rendered["hosts"][0]["name"], "host-a");
}

#[test]
fn test_step_outcome_serialization() {
    let created = StepOutcome::Created {
        response: json!({"items": []}),
    };
    assert_eq!(
        serde_json::to_value(&created).unwrap(),
        json!({"status": "created", "response": {"items": []}})
    );

    let existing = StepOutcome::AlreadyExists {
        message: "dup".to_string(),
    };
    assert_eq!(
        serde_json::to_value(&existing).unwrap(),
        json!({"status": "already_exists", "message": "dup"})
    );
}
