use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;
use std::env;

use crate::domain::recipient::DEFAULT_ADDRESS_FIELD;
use crate::domain::sender::DEFAULT_OUTBOX_CAPACITY;

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Settings {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub api: ApiConfig,
    #[serde(default)]
    pub dispatch: DispatchConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
    #[serde(default)]
    pub cors_origins: Vec<String>,
    /// Maximum accepted request body in bytes
    #[serde(default = "default_body_limit")]
    pub body_limit: usize,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ApiConfig {
    pub key: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct DispatchConfig {
    /// Recipients processed concurrently within one batch
    #[serde(default = "default_max_concurrent_recipients")]
    pub max_concurrent_recipients: usize,
    /// Ask the sender to report errors instead of swallowing them
    #[serde(default = "default_true")]
    pub return_errors: bool,
    /// Count do-not-contact recipients as send errors
    #[serde(default = "default_true")]
    pub dnc_as_error: bool,
    /// Profile field carrying the deliverable address
    #[serde(default = "default_address_field")]
    pub address_field: String,
    /// Messages the outbox keeps before dropping the oldest
    #[serde(default = "default_outbox_capacity")]
    pub outbox_capacity: usize,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    /// `pretty` or `json`
    #[serde(default = "default_log_format")]
    pub format: String,
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    8080
}

fn default_body_limit() -> usize {
    1024 * 1024 // 1 MiB
}

fn default_max_concurrent_recipients() -> usize {
    1
}

fn default_true() -> bool {
    true
}

fn default_address_field() -> String {
    DEFAULT_ADDRESS_FIELD.to_string()
}

fn default_outbox_capacity() -> usize {
    DEFAULT_OUTBOX_CAPACITY
}

fn default_log_format() -> String {
    "pretty".to_string()
}

impl Settings {
    pub fn new() -> Result<Self, ConfigError> {
        // Load .env file if exists
        let _ = dotenvy::dotenv();

        let run_mode = env::var("RUN_MODE").unwrap_or_else(|_| "development".into());

        let builder = Config::builder()
            .set_default("server.host", "0.0.0.0")?
            .set_default("server.port", 8080)?
            .set_default("dispatch.max_concurrent_recipients", 1)?
            .set_default("dispatch.return_errors", true)?
            .set_default("dispatch.dnc_as_error", true)?
            .set_default("dispatch.address_field", DEFAULT_ADDRESS_FIELD)?
            .set_default("dispatch.outbox_capacity", DEFAULT_OUTBOX_CAPACITY as u64)?
            .set_default("logging.format", "pretty")?
            .add_source(File::with_name("config/default").required(false))
            .add_source(File::with_name(&format!("config/{}", run_mode)).required(false))
            // SERVER__PORT, API__KEY, DISPATCH__MAX_CONCURRENT_RECIPIENTS, LOGGING__FORMAT, ...
            .add_source(
                Environment::default()
                    .separator("__")
                    .try_parsing(true)
                    .list_separator(",")
                    .with_list_parse_key("server.cors_origins"),
            );

        let settings: Settings = builder.build()?.try_deserialize()?;
        settings.validate()?;
        Ok(settings)
    }

    pub fn server_addr(&self) -> String {
        format!("{}:{}", self.server.host, self.server.port)
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.dispatch.max_concurrent_recipients == 0 {
            return Err(ConfigError::Message(
                "dispatch.max_concurrent_recipients must be at least 1".to_string(),
            ));
        }
        if self.dispatch.outbox_capacity == 0 {
            return Err(ConfigError::Message(
                "dispatch.outbox_capacity must be at least 1".to_string(),
            ));
        }
        if self.dispatch.address_field.trim().is_empty() {
            return Err(ConfigError::Message(
                "dispatch.address_field must not be empty".to_string(),
            ));
        }
        match self.logging.format.as_str() {
            "pretty" | "json" => Ok(()),
            other => Err(ConfigError::Message(format!(
                "logging.format must be 'pretty' or 'json', got '{}'",
                other
            ))),
        }
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            cors_origins: vec![],
            body_limit: default_body_limit(),
        }
    }
}

impl Default for DispatchConfig {
    fn default() -> Self {
        Self {
            max_concurrent_recipients: default_max_concurrent_recipients(),
            return_errors: true,
            dnc_as_error: true,
            address_field: default_address_field(),
            outbox_capacity: default_outbox_capacity(),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            format: default_log_format(),
        }
    }
}
