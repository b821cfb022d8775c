//! Startup and runtime error type
//!
//! Per-request failures never surface here: they are logged and turned into
//! HTTP status responses by the router.

use std::net::AddrParseError;

#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("configuration error: {0}")]
    Config(#[from] config::ConfigError),

    #[error("invalid listen address '{addr}': {source}")]
    Address {
        addr: String,
        #[source]
        source: AddrParseError,
    },

    #[error("unknown log level '{0}' (expected error, warn, info or debug)")]
    LogLevel(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("template error: {0}")]
    Template(#[from] tera::Error),
}
