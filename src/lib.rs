//! rnxJS demonstration site
//!
//! Four server-rendered pages (reactive state, forms, components, plugins)
//! served over hyper, with Tera templates and a validated contact form.

pub mod config;
pub mod error;
pub mod forms;
pub mod handler;
pub mod http;
pub mod logger;
pub mod server;
pub mod templates;
pub mod views;

use std::sync::Arc;

pub use config::{AppState, Config};
pub use error::AppError;

/// Compile templates, bind the listener and serve until SIGINT/SIGTERM
pub async fn run(config: Config) -> Result<(), AppError> {
    let addr = config.get_socket_addr()?;
    let state = Arc::new(AppState::new(config)?);
    let listener = server::create_listener(addr, state.config.server.backlog)?;

    logger::log_server_start(&listener.local_addr()?, &state.config);

    let shutdown = Arc::new(server::Shutdown::new());
    server::start_signal_handler(Arc::clone(&shutdown));
    server::serve(listener, state, shutdown).await;
    Ok(())
}
