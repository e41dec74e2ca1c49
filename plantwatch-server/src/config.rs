//! Server configuration module
//!
//! Loads configuration from environment variables with sensible defaults.

use std::net::SocketAddr;
use std::str::FromStr;
use std::time::Duration;

use plantwatch_core::{OpenAiConfig, PlantNetConfig};

/// Server configuration loaded from environment variables
#[derive(Debug, Clone)]
pub struct Config {
    /// Server port (default: 3000)
    pub port: u16,
    /// Server host (default: 127.0.0.1)
    pub host: [u8; 4],
    /// Allowed CORS origins, comma-separated (default: allow all in dev)
    pub allowed_origins: Option<Vec<String>>,
    /// Request body limit in MB (default: 50)
    pub body_limit_mb: usize,
    /// Maximum image size per upload in MB (default: 25)
    pub max_file_size_mb: usize,
    /// Request timeout in seconds (default: 30)
    pub timeout_secs: u64,
    /// PostgreSQL connection string; in-memory storage when unset
    pub database_url: Option<String>,
    /// Database connection pool maximum connections (default: 20)
    pub database_max_connections: u32,
    /// Database connection pool minimum connections (default: 2)
    pub database_min_connections: u32,
    /// Pl@ntNet API key; report creation is disabled when unset
    pub plantnet_api_key: Option<String>,
    pub plantnet_api_url: String,
    pub plantnet_project: String,
    /// OpenAI API key; report creation is disabled when unset
    pub openai_api_key: Option<String>,
    pub openai_api_url: String,
    pub openai_model: String,
    /// Timeout for each identification/classification call (default: 10)
    pub remote_timeout_secs: u64,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            port: 3000,
            host: [127, 0, 0, 1],
            allowed_origins: None, // None = allow all (dev mode)
            body_limit_mb: 50,
            max_file_size_mb: 25,
            timeout_secs: 30,
            database_url: None,
            database_max_connections: 20,
            database_min_connections: 2,
            plantnet_api_key: None,
            plantnet_api_url: plantwatch_core::identify::DEFAULT_API_URL.to_string(),
            plantnet_project: plantwatch_core::identify::DEFAULT_PROJECT.to_string(),
            openai_api_key: None,
            openai_api_url: plantwatch_core::classify::DEFAULT_API_URL.to_string(),
            openai_model: plantwatch_core::classify::DEFAULT_MODEL.to_string(),
            remote_timeout_secs: 10,
        }
    }
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Self {
        let defaults = Self::default();

        let host = std::env::var("HOST")
            .ok()
            .map(|h| {
                if h == "0.0.0.0" {
                    [0, 0, 0, 0]
                } else {
                    [127, 0, 0, 1]
                }
            })
            .unwrap_or(defaults.host);

        let allowed_origins = std::env::var("ALLOWED_ORIGINS").ok().map(|origins| {
            origins
                .split(',')
                .map(|s| s.trim().to_string())
                .filter(|s| !s.is_empty())
                .collect()
        });

        Self {
            port: parse_env("PORT", defaults.port),
            host,
            allowed_origins,
            body_limit_mb: parse_env("BODY_LIMIT_MB", defaults.body_limit_mb),
            max_file_size_mb: parse_env("MAX_FILE_SIZE_MB", defaults.max_file_size_mb),
            timeout_secs: parse_env("REQUEST_TIMEOUT_SECS", defaults.timeout_secs),
            database_url: non_empty_env("DATABASE_URL"),
            database_max_connections: parse_env(
                "DATABASE_MAX_CONNECTIONS",
                defaults.database_max_connections,
            ),
            database_min_connections: parse_env(
                "DATABASE_MIN_CONNECTIONS",
                defaults.database_min_connections,
            ),
            plantnet_api_key: non_empty_env("PLANTNET_API_KEY"),
            plantnet_api_url: non_empty_env("PLANTNET_API_URL")
                .unwrap_or(defaults.plantnet_api_url),
            plantnet_project: non_empty_env("PLANTNET_PROJECT")
                .unwrap_or(defaults.plantnet_project),
            openai_api_key: non_empty_env("OPENAI_API_KEY"),
            openai_api_url: non_empty_env("OPENAI_API_URL").unwrap_or(defaults.openai_api_url),
            openai_model: non_empty_env("OPENAI_MODEL").unwrap_or(defaults.openai_model),
            remote_timeout_secs: parse_env("REMOTE_TIMEOUT_SECS", defaults.remote_timeout_secs),
        }
    }

    /// Get socket address from config
    pub fn socket_addr(&self) -> SocketAddr {
        SocketAddr::from((self.host, self.port))
    }

    /// Maximum accepted image size in bytes
    pub fn max_file_size(&self) -> usize {
        self.max_file_size_mb * 1024 * 1024
    }

    /// Identification client settings, if an API key is configured
    pub fn plantnet_config(&self) -> Option<PlantNetConfig> {
        let api_key = self.plantnet_api_key.clone()?;
        Some(PlantNetConfig {
            api_url: self.plantnet_api_url.clone(),
            api_key,
            project: self.plantnet_project.clone(),
            timeout: Duration::from_secs(self.remote_timeout_secs),
            require_https: true,
        })
    }

    /// Classification client settings, if an API key is configured
    pub fn openai_config(&self) -> Option<OpenAiConfig> {
        let api_key = self.openai_api_key.clone()?;
        Some(OpenAiConfig {
            api_url: self.openai_api_url.clone(),
            api_key,
            model: self.openai_model.clone(),
            timeout: Duration::from_secs(self.remote_timeout_secs),
            require_https: true,
        })
    }
}

fn non_empty_env(name: &str) -> Option<String> {
    std::env::var(name)
        .ok()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

fn parse_env<T: FromStr>(name: &str, default: T) -> T {
    std::env::var(name)
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(default)
}
