//! Configuration management for the copilot core
//!
//! Built-in defaults, overridden by an optional `config.toml` and then by
//! `COPILOT_`-prefixed environment variables
//! (e.g. `COPILOT_RATE_LIMIT__MAX_PER_MINUTE=10`).

use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;
use std::path::PathBuf;
use std::time::Duration;

/// Complete application configuration
#[derive(Debug, Deserialize, Clone)]
pub struct AppConfig {
    pub server: ServerSettings,
    pub rate_limit: RateLimitSettings,
    pub corpus: CorpusSettings,
}

/// Network front end
#[derive(Debug, Deserialize, Clone)]
pub struct ServerSettings {
    /// IP address to bind the request listener
    pub bind_address: String,

    /// Listener port; 0 picks an ephemeral port
    pub port: u16,

    /// Longest accepted request line
    pub max_request_bytes: usize,
}

/// Demo-mode request limits
#[derive(Debug, Deserialize, Clone)]
pub struct RateLimitSettings {
    /// Whether requests are rate limited at all
    pub enabled: bool,

    pub max_per_minute: u32,
    pub max_per_hour: u32,

    /// How often idle client buckets are dropped
    pub sweep_interval_secs: u64,
}

/// Source of the session records served as the corpus
#[derive(Debug, Deserialize, Clone)]
pub struct CorpusSettings {
    pub sessions_path: String,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            server: ServerSettings {
                bind_address: "127.0.0.1".to_string(),
                port: 8787,
                max_request_bytes: 16 * 1024,
            },
            rate_limit: RateLimitSettings {
                enabled: true,
                max_per_minute: 6,
                max_per_hour: 30,
                sweep_interval_secs: 300,
            },
            corpus: CorpusSettings {
                sessions_path: "data/sessions.json".to_string(),
            },
        }
    }
}

impl AppConfig {
    /// Load `config.toml` (if present) with environment overrides
    pub fn load() -> Result<Self, ConfigError> {
        Self::load_from("config")
    }

    /// Load from the given file stem (extension optional) with environment overrides
    pub fn load_from(config_path: &str) -> Result<Self, ConfigError> {
        let defaults = AppConfig::default();

        let settings = Config::builder()
            .set_default("server.bind_address", defaults.server.bind_address)?
            .set_default("server.port", i64::from(defaults.server.port))?
            .set_default(
                "server.max_request_bytes",
                defaults.server.max_request_bytes as i64,
            )?
            .set_default("rate_limit.enabled", defaults.rate_limit.enabled)?
            .set_default(
                "rate_limit.max_per_minute",
                i64::from(defaults.rate_limit.max_per_minute),
            )?
            .set_default(
                "rate_limit.max_per_hour",
                i64::from(defaults.rate_limit.max_per_hour),
            )?
            .set_default(
                "rate_limit.sweep_interval_secs",
                defaults.rate_limit.sweep_interval_secs as i64,
            )?
            .set_default("corpus.sessions_path", defaults.corpus.sessions_path)?
            .add_source(File::with_name(config_path).required(false))
            .add_source(
                Environment::with_prefix("COPILOT")
                    .prefix_separator("_")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        let config: AppConfig = settings.try_deserialize()?;
        config.validate()?;
        Ok(config)
    }

    /// Validation for all configuration values
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.server.bind_address.trim().is_empty() {
            return Err(ConfigError::Message(
                "bind_address cannot be empty".into(),
            ));
        }

        if self.server.max_request_bytes == 0 {
            return Err(ConfigError::Message(
                "max_request_bytes must be greater than 0".into(),
            ));
        }

        if self.rate_limit.max_per_minute == 0 {
            return Err(ConfigError::Message(
                "max_per_minute must be greater than 0".into(),
            ));
        }

        if self.rate_limit.max_per_hour == 0 {
            return Err(ConfigError::Message(
                "max_per_hour must be greater than 0".into(),
            ));
        }

        if self.rate_limit.sweep_interval_secs == 0 {
            return Err(ConfigError::Message(
                "sweep_interval_secs must be greater than 0".into(),
            ));
        }

        if self.corpus.sessions_path.trim().is_empty() {
            return Err(ConfigError::Message(
                "sessions_path cannot be empty".into(),
            ));
        }

        Ok(())
    }
}

impl ServerSettings {
    /// Bind address and port as a socket address string
    pub fn listen_socket(&self) -> String {
        format!("{}:{}", self.bind_address, self.port)
    }
}

impl RateLimitSettings {
    pub fn sweep_interval(&self) -> Duration {
        Duration::from_secs(self.sweep_interval_secs)
    }
}

impl CorpusSettings {
    pub fn sessions_path(&self) -> PathBuf {
        PathBuf::from(&self.sessions_path)
    }
}
