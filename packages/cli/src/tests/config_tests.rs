use crate::config::{Config, ConfigError};
use pretty_assertions::assert_eq;
use rstest::rstest;
use serial_test::serial;
use std::env;
use std::net::{IpAddr, Ipv4Addr};
use std::path::PathBuf;

const VARS: &[&str] = &[
    "PORT",
    "HOST",
    "CORS_ORIGIN",
    "DATABASE_PATH",
    "DATABASE_MAX_CONNECTIONS",
    "METRICS_ENABLED",
    "AVAILABLE_TOOLS",
    "AVAILABLE_DEPLOYMENTS",
];

fn clear_env() {
    for var in VARS {
        env::remove_var(var);
    }
}

#[test]
#[serial]
fn test_config_from_env_defaults() {
    clear_env();

    let config = Config::from_env().unwrap();

    assert_eq!(config.port, 8000);
    assert_eq!(config.host, IpAddr::V4(Ipv4Addr::LOCALHOST));
    assert_eq!(config.cors_origin, "http://localhost:4000");
    assert_eq!(config.database_path, toolkit_core::default_database_path());
    assert_eq!(config.database_max_connections, 10);
    assert!(!config.metrics_enabled);
    assert!(config.available_tools.is_none());
    assert!(config.available_deployments.is_none());
}

#[test]
#[serial]
fn test_config_from_env_with_all_custom() {
    clear_env();
    env::set_var("PORT", "3000");
    env::set_var("HOST", "0.0.0.0");
    env::set_var("CORS_ORIGIN", "https://app.example.com");
    env::set_var("DATABASE_PATH", "/tmp/toolkit-test.db");
    env::set_var("DATABASE_MAX_CONNECTIONS", "4");
    env::set_var("METRICS_ENABLED", "TRUE");

    let config = Config::from_env().unwrap();

    assert_eq!(config.port, 3000);
    assert_eq!(config.socket_addr().to_string(), "0.0.0.0:3000");
    assert_eq!(config.cors_origin, "https://app.example.com");
    assert_eq!(config.database_path, PathBuf::from("/tmp/toolkit-test.db"));
    assert_eq!(config.storage_config().max_connections, 4);
    assert!(config.metrics_enabled);

    clear_env();
}

#[test]
#[serial]
fn test_allow_lists() {
    clear_env();
    env::set_var("AVAILABLE_TOOLS", "web_search, calculator,,");
    env::set_var("AVAILABLE_DEPLOYMENTS", " ");

    let config = Config::from_env().unwrap();

    assert_eq!(
        config.available_tools,
        Some(vec!["web_search".to_string(), "calculator".to_string()])
    );
    // Blank means unrestricted
    assert!(config.available_deployments.is_none());

    clear_env();
}

#[test]
#[serial]
fn test_cli_overrides() {
    clear_env();

    let config = Config::from_env()
        .unwrap()
        .with_port(Some(9000))
        .with_database_path(Some(PathBuf::from("/tmp/other.db")));
    assert_eq!(config.port, 9000);
    assert_eq!(config.database_path, PathBuf::from("/tmp/other.db"));

    let config = config.with_port(None).with_database_path(None);
    assert_eq!(config.port, 9000);
}

#[test]
#[serial]
fn test_config_port_zero() {
    clear_env();
    env::set_var("PORT", "0");

    let result = Config::from_env();

    assert!(matches!(result.unwrap_err(), ConfigError::PortOutOfRange(0)));

    clear_env();
}

#[rstest]
#[case("-1")]
#[case("65536")]
#[case("1.5")]
#[case("0x1234")]
#[serial]
fn test_invalid_port_formats(#[case] port_str: &str) {
    clear_env();
    env::set_var("PORT", port_str);

    let result = Config::from_env();

    assert!(matches!(result.unwrap_err(), ConfigError::InvalidPort(_)));

    clear_env();
}

#[rstest]
#[case("HOST", "localhost")]
#[case("DATABASE_MAX_CONNECTIONS", "0")]
#[case("DATABASE_MAX_CONNECTIONS", "many")]
#[case("METRICS_ENABLED", "yes")]
#[serial]
fn test_invalid_values(#[case] var: &str, #[case] value: &str) {
    clear_env();
    env::set_var(var, value);

    assert!(Config::from_env().is_err());

    clear_env();
}

#[test]
fn test_config_error_display() {
    let error = ConfigError::PortOutOfRange(0);
    assert_eq!(error.to_string(), "Port 0 is out of valid range (1-65535)");

    let error = ConfigError::InvalidValue {
        var: "METRICS_ENABLED",
        value: "yes".to_string(),
    };
    assert_eq!(error.to_string(), "Invalid value for METRICS_ENABLED: yes");
}
