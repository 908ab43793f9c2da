//! CLI integration tests.
//!
//! These tests verify the CLI argument parsing and configuration loading.

use std::ffi::OsString;
use std::io::Write;
use std::path::PathBuf;
use std::process::{Command, ExitCode};
use tempfile::{NamedTempFile, TempDir};

use batch_ssh::app::{bootstrap, Startup};
use batch_ssh::cli::{parse_args_from, Args};
use batch_ssh::config::{Config, ConfigError};
use batch_ssh::{BatchSshError, ConnectionSpec, Credential};

fn args(args: &[&str]) -> Vec<OsString> {
    std::iter::once("batch-ssh")
        .chain(args.iter().copied())
        .map(OsString::from)
        .collect()
}

fn config_file(json: &str) -> NamedTempFile {
    let mut file = NamedTempFile::new().unwrap();
    file.write_all(json.as_bytes()).unwrap();
    file
}

// ============================================================================
// CLI Argument Tests
// ============================================================================

#[test]
fn test_cli_defaults() {
    let result = parse_args_from(args(&[])).unwrap();

    assert!(result.config.is_none());
    assert!(result.user.is_none());
    assert!(result.identity.is_none());
    assert!(result.settle_ms.is_none());
    assert!(!result.strip_ansi);
    assert!(!result.init);
}

#[test]
fn test_cli_full_options() {
    let result = parse_args_from(args(&[
        "-c",
        "/etc/batch-ssh/prod.json",
        "-u",
        "deploy",
        "-i",
        "/home/deploy/.ssh/id_ecdsa",
        "-s",
        "3000",
        "-l",
        "debug",
        "--strip-ansi",
    ]))
    .unwrap();

    assert_eq!(result.config_path(), PathBuf::from("/etc/batch-ssh/prod.json"));
    assert_eq!(result.user, Some("deploy".to_string()));
    assert_eq!(
        result.identity,
        Some(PathBuf::from("/home/deploy/.ssh/id_ecdsa"))
    );
    assert_eq!(result.settle_ms, Some(3000));
    assert_eq!(result.log_level, Some("debug".to_string()));
    assert!(result.strip_ansi);
}

#[test]
fn test_cli_invalid_settle() {
    let result = parse_args_from(args(&["-s", "-5"]));
    assert!(result.is_err());
}

#[test]
fn test_cli_rejects_positional_command() {
    let result = parse_args_from(args(&["uptime"]));
    assert!(result.is_err());
}

// ============================================================================
// Configuration Loading Tests
// ============================================================================

#[test]
fn test_config_from_json_file() {
    let file = config_file(
        r#"{
        "user": "ops",
        "servers": [
            {"host": "web-1", "port": 2201},
            {"host": "web-2"}
        ],
        "password": "s3cret",
        "read_chunk_size": 8192,
        "strip_ansi": true,
        "logging": {"level": "debug"}
    }"#,
    );

    let config = Config::from_file(file.path()).unwrap();

    assert_eq!(config.user, "ops");
    assert_eq!(
        config.servers,
        vec![
            ConnectionSpec::new("web-1").port(2201),
            ConnectionSpec::new("web-2"),
        ]
    );
    assert_eq!(config.read_chunk_size, 8192);
    assert!(config.strip_ansi);
    assert_eq!(config.logging.level, "debug");
    assert_eq!(
        config.credential(),
        Credential::Password {
            secret: "s3cret".into()
        }
    );
}

#[test]
fn test_config_priority_cli_over_file() {
    let file = config_file(
        r#"{
        "user": "ops",
        "servers": [{"host": "web-1"}],
        "password": "pw",
        "settle_delay_ms": 1000
    }"#,
    );

    let args = Args {
        config: Some(file.path().to_path_buf()),
        user: Some("admin".to_string()),
        identity: Some(PathBuf::from("/keys/admin")),
        settle_ms: Some(200),
        ..Args::default()
    };

    let config = Config::load(&args).unwrap();

    assert_eq!(config.user, "admin");
    assert_eq!(config.settle_delay_ms, 200);
    assert!(matches!(config.credential(), Credential::Key { .. }));
}

#[test]
fn test_config_load_missing_file() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("batch-ssh.json");
    let args = Args {
        config: Some(path.clone()),
        ..Args::default()
    };

    let err = Config::load(&args).unwrap_err();
    assert!(matches!(err, ConfigError::Missing(ref p) if *p == path));

    let fatal: BatchSshError = err.into();
    assert!(matches!(fatal, BatchSshError::ConfigMissing(_)));
}

#[test]
fn test_missing_config_template_flow() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("batch-ssh.json");

    Config::write_template(&path).unwrap();
    assert!(path.exists());

    let args = Args {
        config: Some(path.clone()),
        ..Args::default()
    };
    let config = Config::load(&args).unwrap();

    assert_eq!(config.user, "root");
    assert_eq!(config.servers.len(), 2);
    assert_eq!(config.private_key, "private");
}

#[test]
fn test_bootstrap_missing_config_writes_template_and_stops() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("batch-ssh.json");
    let args = Args {
        config: Some(path.clone()),
        ..Args::default()
    };
    let mut out = Vec::new();
    let mut err = Vec::new();

    let startup = bootstrap(&args, &mut out, &mut err);

    assert!(matches!(startup, Startup::Exit(code) if code == ExitCode::FAILURE));
    assert!(path.exists());
    let text = String::from_utf8(out).unwrap();
    assert!(text.contains("did not exist"));
    assert!(text.contains("Edit it and run batch-ssh again."));
    assert!(err.is_empty());

    // The written template is loadable on the next run.
    let startup = bootstrap(&args, &mut Vec::new(), &mut Vec::new());
    assert!(matches!(startup, Startup::Run(ref config) if config.servers.len() == 2));
}

#[test]
fn test_bootstrap_init_writes_template() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("fresh.json");
    let args = Args {
        config: Some(path.clone()),
        init: true,
        ..Args::default()
    };
    let mut out = Vec::new();

    let startup = bootstrap(&args, &mut out, &mut Vec::new());

    assert!(matches!(startup, Startup::Exit(code) if code == ExitCode::SUCCESS));
    assert!(path.exists());

    // A second --init refuses to overwrite.
    let mut err = Vec::new();
    let startup = bootstrap(&args, &mut Vec::new(), &mut err);
    assert!(matches!(startup, Startup::Exit(code) if code == ExitCode::FAILURE));
    assert!(!err.is_empty());
}

#[test]
fn test_bootstrap_invalid_config_reports_error() {
    let file = config_file(r#"{"user": "", "servers": [{"host": "a"}], "password": "pw"}"#);
    let args = Args {
        config: Some(file.path().to_path_buf()),
        ..Args::default()
    };
    let mut err = Vec::new();

    let startup = bootstrap(&args, &mut Vec::new(), &mut err);

    assert!(matches!(startup, Startup::Exit(code) if code == ExitCode::FAILURE));
    assert!(String::from_utf8(err).unwrap().starts_with("error: "));
}

#[test]
fn test_binary_missing_config_exits_before_connecting() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("x.json");

    let output = Command::new(env!("CARGO_BIN_EXE_batch-ssh"))
        .arg("-c")
        .arg(&path)
        .output()
        .unwrap();

    assert!(!output.status.success());
    assert!(path.exists());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("did not exist"));
    assert!(!stdout.contains("Connecting to"));
}

#[test]
fn test_config_load_rejects_invalid() {
    let file = config_file(r#"{"user": "ops", "servers": [], "password": "pw"}"#);
    let args = Args {
        config: Some(file.path().to_path_buf()),
        ..Args::default()
    };

    let err = Config::load(&args).unwrap_err();
    assert!(matches!(err, ConfigError::Invalid(_)));
}

// ============================================================================
// Configuration Serialization Tests
// ============================================================================

#[test]
fn test_config_roundtrip() {
    let original = Config::template();
    let json = serde_json::to_string(&original).unwrap();
    let loaded: Config = serde_json::from_str(&json).unwrap();

    assert_eq!(original.user, loaded.user);
    assert_eq!(original.servers, loaded.servers);
    assert_eq!(original.settle_delay_ms, loaded.settle_delay_ms);
}

#[test]
fn test_config_partial_deserialization() {
    let json = r#"{"servers": [{"host": "db"}]}"#;
    let config: Config = serde_json::from_str(json).unwrap();

    assert_eq!(config.servers[0].port, 22);
    assert_eq!(config.settle_delay_ms, 1000); // Default
    assert_eq!(config.read_chunk_size, 4096); // Default
    assert!(config.user.is_empty());
}
