// Configuration module entry point
// Loads layered configuration and owns the shared application state

mod state;
mod types;

use config::builder::{ConfigBuilder, DefaultState};
use std::net::SocketAddr;

use crate::error::AppError;

// Re-export public types
pub use state::AppState;
pub use types::{
    Config, HttpConfig, LoggingConfig, PerformanceConfig, ServerConfig, SiteConfig,
    TemplatesConfig,
};

const ENV_PREFIX: &str = "RNX_DEMO";
const DEFAULT_RNX_SCRIPT_URL: &str = "https://cdn.jsdelivr.net/npm/rnxjs/dist/rnx.min.js";

impl Config {
    /// Layer defaults, the optional file at `config_path` (extension
    /// optional) and `RNX_DEMO__SECTION__KEY` environment variables
    pub fn load_from(config_path: &str) -> Result<Self, config::ConfigError> {
        with_defaults()?
            .add_source(config::File::with_name(config_path).required(false))
            .add_source(
                config::Environment::with_prefix(ENV_PREFIX)
                    .prefix_separator("__")
                    .separator("__"),
            )
            .build()?
            .try_deserialize()
    }

    /// Built-in defaults only, ignoring files and the environment
    pub fn defaults() -> Result<Self, config::ConfigError> {
        with_defaults()?.build()?.try_deserialize()
    }

    pub fn get_socket_addr(&self) -> Result<SocketAddr, AppError> {
        let addr = format!("{}:{}", self.server.host, self.server.port);
        addr.parse()
            .map_err(|source| AppError::Address { addr, source })
    }
}

fn with_defaults() -> Result<ConfigBuilder<DefaultState>, config::ConfigError> {
    config::Config::builder()
        .set_default("server.host", "127.0.0.1")?
        .set_default("server.port", 8080)?
        .set_default("server.backlog", 128)?
        .set_default("logging.level", "info")?
        .set_default("logging.access_log", true)?
        .set_default("logging.access_log_format", "combined")?
        .set_default("performance.keep_alive_timeout", 75)?
        .set_default("performance.read_timeout", 30)?
        .set_default("performance.write_timeout", 30)?
        .set_default("performance.shutdown_timeout", 10)?
        .set_default("http.server_name", "rnx-demo")?
        .set_default("http.enable_cors", false)?
        .set_default("http.max_body_size", 1_048_576)? // 1MB
        .set_default("http.append_slash", true)?
        .set_default("site.title", "rnxJS Examples")?
        .set_default("site.rnx_script_url", DEFAULT_RNX_SCRIPT_URL)
}
