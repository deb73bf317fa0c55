mod settings;

pub use settings::{ApiConfig, DispatchConfig, LoggingConfig, ServerConfig, Settings};
