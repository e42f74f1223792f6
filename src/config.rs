//! Application configuration
//!
//! Centralized configuration management with environment variable support
//! and sensible defaults.

use std::env;
use std::path::PathBuf;

/// Default request body limit for uploads (50 MiB)
pub const DEFAULT_MAX_UPLOAD_BYTES: usize = 50 * 1024 * 1024;

/// Application configuration
#[derive(Debug, Clone)]
pub struct Config {
    /// Server configuration
    pub server: ServerConfig,
    /// Upload storage configuration
    pub storage: StorageConfig,
    /// Cross-origin configuration
    pub cors: CorsConfig,
}

/// Server configuration
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Port to bind the server to
    pub port: u16,
    /// Host address to bind to
    pub host: String,
    /// Base URL clients use to reach this server, used to build `audioUrl`
    pub public_base_url: String,
}

/// Upload storage configuration
#[derive(Debug, Clone)]
pub struct StorageConfig {
    /// Directory uploaded audio files are written to and served from
    pub upload_dir: PathBuf,
    /// Maximum accepted request body size in bytes
    pub max_upload_bytes: usize,
}

/// Cross-origin configuration
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CorsConfig {
    /// Any origin may call the API
    AnyOrigin,
    /// Only the listed origins may call the API
    Origins(Vec<String>),
}

impl CorsConfig {
    /// Parse a comma-separated origin list; `*` or an empty list means any origin
    pub fn parse(raw: &str) -> Self {
        let origins: Vec<String> = raw
            .split(',')
            .map(str::trim)
            .filter(|o| !o.is_empty())
            .map(str::to_string)
            .collect();

        if origins.is_empty() || origins.iter().any(|o| o == "*") {
            CorsConfig::AnyOrigin
        } else {
            CorsConfig::Origins(origins)
        }
    }
}

impl Config {
    /// Load configuration from environment variables with defaults
    pub fn from_env() -> Self {
        let port = env::var("PORT")
            .ok()
            .and_then(|p| p.parse().ok())
            .unwrap_or(5000);

        let public_base_url = env::var("PUBLIC_BASE_URL")
            .unwrap_or_else(|_| format!("http://localhost:{}", port))
            .trim_end_matches('/')
            .to_string();

        Self {
            server: ServerConfig {
                port,
                host: env::var("HOST").unwrap_or_else(|_| "0.0.0.0".to_string()),
                public_base_url,
            },
            storage: StorageConfig {
                upload_dir: env::var_os("UPLOAD_DIR")
                    .map(PathBuf::from)
                    .unwrap_or_else(|| PathBuf::from("uploads")),
                max_upload_bytes: env::var("MAX_UPLOAD_BYTES")
                    .ok()
                    .and_then(|b| b.parse().ok())
                    .unwrap_or(DEFAULT_MAX_UPLOAD_BYTES),
            },
            cors: env::var("CORS_ALLOWED_ORIGINS")
                .map(|raw| CorsConfig::parse(&raw))
                .unwrap_or(CorsConfig::AnyOrigin),
        }
    }

    /// Get the server address as a string
    pub fn server_addr(&self) -> String {
        format!("{}:{}", self.server.host, self.server.port)
    }
}
