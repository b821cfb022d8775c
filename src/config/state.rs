// Application state module
// Read-only state shared by every connection

use tera::Tera;

use super::types::Config;
use crate::error::AppError;
use crate::templates;

/// Application state
///
/// Built once at startup and handed to connections behind an `Arc`.
/// Nothing in here is mutated after construction.
pub struct AppState {
    pub config: Config,
    pub templates: Tera,
}

impl AppState {
    /// Create `AppState`, compiling the templates selected by the configuration
    pub fn new(config: Config) -> Result<Self, AppError> {
        let templates = templates::load(config.templates.dir.as_deref())?;
        Ok(Self { config, templates })
    }
}
