//! Server Configuration
//!
//! Configuration is read from environment variables with working defaults,
//! so the server starts with no setup at all. CLI flags override the
//! environment for the bind address. An unset or empty variable falls back
//! to its default; a set-but-unparseable one is a startup error rather than
//! a silent fallback.

use std::net::{IpAddr, Ipv4Addr};

/// Runtime configuration for the mock server
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Address to bind (HOST)
    pub host: IpAddr,

    /// Port to listen on (PORT)
    pub port: u16,

    /// Bearer token required on resource endpoints (SCIM_SERVER_TOKEN)
    pub token: String,

    /// Externally visible base URL for meta.location (SCIM_PUBLIC_URL)
    pub public_url: Option<String>,

    /// Per-request timeout in seconds; 0 disables (REQUEST_TIMEOUT_SECS)
    pub request_timeout_secs: u64,

    /// Maximum accepted request body size (BODY_LIMIT_BYTES)
    pub body_limit_bytes: usize,
}

fn default_host() -> IpAddr {
    IpAddr::V4(Ipv4Addr::UNSPECIFIED)
}

fn default_port() -> u16 {
    3000
}

fn default_token() -> String {
    "secret-token".to_string()
}

fn default_request_timeout_secs() -> u64 {
    30
}

fn default_body_limit_bytes() -> usize {
    50 * 1024 * 1024
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            token: default_token(),
            public_url: None,
            request_timeout_secs: default_request_timeout_secs(),
            body_limit_bytes: default_body_limit_bytes(),
        }
    }
}

impl ServerConfig {
    /// Load configuration from the environment
    pub fn from_env() -> Result<Self, ConfigError> {
        Ok(Self {
            host: parsed_env("HOST", default_host())?,
            port: parsed_env("PORT", default_port())?,
            token: string_env("SCIM_SERVER_TOKEN").unwrap_or_else(default_token),
            public_url: string_env("SCIM_PUBLIC_URL"),
            request_timeout_secs: parsed_env(
                "REQUEST_TIMEOUT_SECS",
                default_request_timeout_secs(),
            )?,
            body_limit_bytes: parsed_env("BODY_LIMIT_BYTES", default_body_limit_bytes())?,
        })
    }

    /// Base URL used to build meta.location values.
    ///
    /// Falls back to the local address when no public URL is configured,
    /// which is what clients on the same host expect from a test server.
    pub fn base_url(&self) -> String {
        match &self.public_url {
            Some(url) => url.trim_end_matches('/').to_string(),
            None => format!("http://localhost:{}", self.port),
        }
    }

    /// Emit warnings for settings that are fine locally but not beyond that.
    /// The token value itself is never logged.
    pub fn validate(&self) {
        if self.token == default_token() {
            tracing::warn!(
                "SCIM_SERVER_TOKEN is not set; using the well-known default token. \
                 Set SCIM_SERVER_TOKEN before exposing this server to anything shared."
            );
        }
    }
}

/// Read an env var as a string; unset or empty counts as absent
fn string_env(name: &str) -> Option<String> {
    match std::env::var(name) {
        Ok(value) if !value.trim().is_empty() => Some(value),
        _ => None,
    }
}

/// Read and parse an env var, falling back to a default when absent
fn parsed_env<T: std::str::FromStr>(name: &'static str, default: T) -> Result<T, ConfigError> {
    match string_env(name) {
        Some(raw) => raw
            .trim()
            .parse()
            .map_err(|_| ConfigError::InvalidValue { name, value: raw }),
        None => Ok(default),
    }
}

/// Configuration loading errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("invalid value for {name}: '{value}'")]
    InvalidValue { name: &'static str, value: String },
}
