//! Application configuration structures
//!
//! Loaded by `slotbook-infra`'s config loader from environment variables or
//! a JSON/TOML file.

use serde::{Deserialize, Serialize};

/// Top-level application configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    pub server: ServerConfig,
    pub database: DatabaseConfig,
    pub providers: ProvidersConfig,
}

/// HTTP server configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Socket address the API binds to, e.g. `127.0.0.1:8080`.
    pub bind_addr: String,
}

/// Database configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatabaseConfig {
    pub path: String,
    pub pool_size: u32,
}

/// OAuth client credentials per provider
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProvidersConfig {
    pub google: OAuthClientConfig,
    pub outlook: OutlookClientConfig,
    pub zoom: OAuthClientConfig,
}

/// Client id/secret pair registered with a provider
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OAuthClientConfig {
    pub client_id: String,
    pub client_secret: String,
}

/// Microsoft credentials additionally carry the directory tenant whose
/// endpoints the authorize/token URLs are scoped to.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OutlookClientConfig {
    pub client_id: String,
    pub client_secret: String,
    pub tenant_id: String,
}
