use pdf_sidebyside_core::{AppConfig, Composer};

/// Global application state
///
/// Read-only after startup: requests share the configuration and the
/// (stateless) composer, nothing else.
pub struct AppState {
    pub config: AppConfig,
    pub composer: Composer,
}

impl AppState {
    pub fn new(config: AppConfig) -> Self {
        let composer = Composer::new(config.compose_options());
        Self { config, composer }
    }
}
