// ABOUTME: Server configuration loaded from the environment
// ABOUTME: Port, bind address, CORS, database, metrics, and request allow-lists

use std::env;
use std::net::{IpAddr, SocketAddr};
use std::num::ParseIntError;
use std::path::PathBuf;

use thiserror::Error;
use toolkit_api::AgentValidator;
use toolkit_storage::StorageConfig;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Invalid port number: {0}")]
    InvalidPort(#[from] ParseIntError),
    #[error("Port {0} is out of valid range (1-65535)")]
    PortOutOfRange(u16),
    #[error("Invalid host address: {0}")]
    InvalidHost(String),
    #[error("Invalid value for {var}: {value}")]
    InvalidValue { var: &'static str, value: String },
}

#[derive(Debug, Clone)]
pub struct Config {
    pub port: u16,
    pub host: IpAddr,
    pub cors_origin: String,
    pub database_path: PathBuf,
    pub database_max_connections: u32,
    pub metrics_enabled: bool,
    pub available_tools: Option<Vec<String>>,
    pub available_deployments: Option<Vec<String>>,
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        let port_str = env::var("PORT").unwrap_or_else(|_| "8000".to_string());

        let port = port_str.parse::<u16>()?;

        // Validate port is in valid range
        if port == 0 {
            return Err(ConfigError::PortOutOfRange(port));
        }

        let host_str = env::var("HOST").unwrap_or_else(|_| "127.0.0.1".to_string());
        let host = host_str
            .parse::<IpAddr>()
            .map_err(|_| ConfigError::InvalidHost(host_str))?;

        let cors_origin =
            env::var("CORS_ORIGIN").unwrap_or_else(|_| "http://localhost:4000".to_string());

        let database_path = env::var("DATABASE_PATH")
            .map(PathBuf::from)
            .unwrap_or_else(|_| toolkit_core::default_database_path());

        let database_max_connections = match env::var("DATABASE_MAX_CONNECTIONS") {
            Ok(value) => match value.parse::<u32>() {
                Ok(n) if n > 0 => n,
                _ => {
                    return Err(ConfigError::InvalidValue {
                        var: "DATABASE_MAX_CONNECTIONS",
                        value,
                    })
                }
            },
            Err(_) => 10,
        };

        let metrics_enabled = match env::var("METRICS_ENABLED") {
            Ok(value) => value
                .trim()
                .to_lowercase()
                .parse::<bool>()
                .map_err(|_| ConfigError::InvalidValue {
                    var: "METRICS_ENABLED",
                    value,
                })?,
            Err(_) => false,
        };

        Ok(Config {
            port,
            host,
            cors_origin,
            database_path,
            database_max_connections,
            metrics_enabled,
            available_tools: parse_list("AVAILABLE_TOOLS"),
            available_deployments: parse_list("AVAILABLE_DEPLOYMENTS"),
        })
    }

    pub fn with_port(mut self, port: Option<u16>) -> Self {
        if let Some(port) = port {
            self.port = port;
        }
        self
    }

    pub fn with_database_path(mut self, path: Option<PathBuf>) -> Self {
        if let Some(path) = path {
            self.database_path = path;
        }
        self
    }

    pub fn socket_addr(&self) -> SocketAddr {
        SocketAddr::new(self.host, self.port)
    }

    pub fn storage_config(&self) -> StorageConfig {
        StorageConfig {
            max_connections: self.database_max_connections,
            ..StorageConfig::with_path(&self.database_path)
        }
    }

    /// Request validator honoring the configured allow-lists
    pub fn validator(&self) -> AgentValidator {
        let mut validator = AgentValidator::new();
        if let Some(tools) = &self.available_tools {
            validator = validator.with_available_tools(tools.iter().cloned());
        }
        if let Some(deployments) = &self.available_deployments {
            validator = validator.with_available_deployments(deployments.iter().cloned());
        }
        validator
    }
}

/// Comma-separated list; unset or blank means no restriction
fn parse_list(var: &str) -> Option<Vec<String>> {
    let items: Vec<String> = env::var(var)
        .ok()?
        .split(',')
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .collect();

    if items.is_empty() {
        None
    } else {
        Some(items)
    }
}
