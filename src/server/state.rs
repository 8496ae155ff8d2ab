use std::sync::Arc;

use crate::builder::RecipeAnalyzer;
use crate::config::AppConfig;

#[derive(Clone)]
pub struct AppState {
    pub config: Arc<AppConfig>,
    pub analyzer: Arc<RecipeAnalyzer>,
}

impl AppState {
    pub fn new(config: AppConfig, analyzer: RecipeAnalyzer) -> Self {
        Self {
            config: Arc::new(config),
            analyzer: Arc::new(analyzer),
        }
    }

    pub fn debug(&self) -> bool {
        self.config.server.debug
    }
}
