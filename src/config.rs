use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Main application configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// Server configuration
    #[serde(default)]
    pub server: ServerConfig,

    /// Full-text index connection
    #[serde(default)]
    pub index: IndexConfig,

    /// Response cache configuration
    #[serde(default)]
    pub cache: CacheConfig,

    /// Media asset URLs
    #[serde(default)]
    pub media: MediaConfig,

    /// Observability configuration
    #[serde(default)]
    pub observability: ObservabilityConfig,
}

impl Config {
    /// Load configuration from file and environment
    pub fn load() -> Result<Self, config::ConfigError> {
        let config_path =
            std::env::var("CONFIG_PATH").unwrap_or_else(|_| "config/default.toml".to_string());

        config::Config::builder()
            // Start with default values
            .add_source(config::File::from_str(
                include_str!("../config/default.toml"),
                config::FileFormat::Toml,
            ))
            // Override with config file if it exists
            .add_source(config::File::with_name(&config_path).required(false))
            // Override with environment variables (prefix: MEDIA_SEARCH_)
            .add_source(
                config::Environment::with_prefix("MEDIA_SEARCH")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?
            .try_deserialize()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// HTTP server host
    #[serde(default = "default_host")]
    pub host: String,

    /// HTTP server port
    #[serde(default = "default_http_port")]
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_http_port(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IndexConfig {
    /// Elasticsearch base URL
    #[serde(default = "default_index_url")]
    pub url: String,

    /// Index name
    #[serde(default = "default_index_name")]
    pub index: String,

    /// Basic auth user
    pub username: Option<String>,

    /// Basic auth password
    pub password: Option<String>,

    /// Hard deadline for a single index call (milliseconds)
    #[serde(default = "default_index_timeout_ms")]
    pub timeout_ms: u64,

    /// Accept self-signed certificates (development clusters only)
    #[serde(default)]
    pub accept_invalid_certs: bool,
}

impl IndexConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }
}

impl Default for IndexConfig {
    fn default() -> Self {
        Self {
            url: default_index_url(),
            index: default_index_name(),
            username: None,
            password: None,
            timeout_ms: default_index_timeout_ms(),
            accept_invalid_certs: false,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CacheConfig {
    /// Redis connection string; caching is disabled when unset
    pub redis_url: Option<String>,

    /// Connect timeout (milliseconds)
    #[serde(default = "default_connect_timeout_ms")]
    pub connect_timeout_ms: u64,

    /// Per-command timeout (milliseconds)
    #[serde(default = "default_command_timeout_ms")]
    pub command_timeout_ms: u64,

    /// Search response TTL (seconds)
    #[serde(default = "default_search_ttl")]
    pub search_ttl_secs: u64,

    /// Suggestion response TTL (seconds)
    #[serde(default = "default_suggest_ttl")]
    pub suggest_ttl_secs: u64,
}

impl CacheConfig {
    pub fn connect_timeout(&self) -> Duration {
        Duration::from_millis(self.connect_timeout_ms)
    }

    pub fn command_timeout(&self) -> Duration {
        Duration::from_millis(self.command_timeout_ms)
    }

    pub fn search_ttl(&self) -> Duration {
        Duration::from_secs(self.search_ttl_secs)
    }

    pub fn suggest_ttl(&self) -> Duration {
        Duration::from_secs(self.suggest_ttl_secs)
    }
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            redis_url: None,
            connect_timeout_ms: default_connect_timeout_ms(),
            command_timeout_ms: default_command_timeout_ms(),
            search_ttl_secs: default_search_ttl(),
            suggest_ttl_secs: default_suggest_ttl(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MediaConfig {
    /// Base URL thumbnails are served from
    #[serde(default = "default_media_base_url")]
    pub base_url: String,
}

impl Default for MediaConfig {
    fn default() -> Self {
        Self {
            base_url: default_media_base_url(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ObservabilityConfig {
    /// Log level
    #[serde(default = "default_log_level")]
    pub log_level: String,

    /// Enable JSON logging
    #[serde(default)]
    pub json_logs: bool,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: default_log_level(),
            json_logs: false,
        }
    }
}

// Default value functions
fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_http_port() -> u16 {
    8080
}

fn default_index_url() -> String {
    "http://localhost:9200".to_string()
}

fn default_index_name() -> String {
    "imago".to_string()
}

fn default_index_timeout_ms() -> u64 {
    4_000
}

fn default_connect_timeout_ms() -> u64 {
    800
}

fn default_command_timeout_ms() -> u64 {
    500
}

fn default_search_ttl() -> u64 {
    3600 // 1 hour
}

fn default_suggest_ttl() -> u64 {
    600
}

fn default_media_base_url() -> String {
    "https://www.imago-images.de".to_string()
}

fn default_log_level() -> String {
    "info".to_string()
}
