use crate::application::llm::LlmService;
use crate::application::translation::TranslationService;
use crate::domain::error::AppError;
use crate::domain::traits::LlmGateway;
use crate::infrastructure::config::Config;
use std::sync::Arc;

#[derive(Clone)]
pub struct AppState {
    pub translator: Arc<TranslationService>,
    pub config: Arc<Config>,
}

impl AppState {
    /// Build the gateway from configuration; fails fast if the provider client cannot be created
    pub fn new(config: Config) -> Result<Self, AppError> {
        let llm = LlmService::from_config(&config.llm)?;
        Ok(Self::with_gateway(config, Arc::new(llm)))
    }

    /// Assemble state around an existing gateway (used by tests)
    pub fn with_gateway(config: Config, llm: Arc<dyn LlmGateway>) -> Self {
        Self {
            translator: Arc::new(TranslationService::new(llm)),
            config: Arc::new(config),
        }
    }
}
