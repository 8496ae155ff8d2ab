use crate::config::{AiConfig, ProviderConfig};
use crate::providers::{GoogleProvider, OpenAIProvider, ProviderError, VisionProvider};
use std::sync::Arc;

pub struct ProviderFactory;

impl ProviderFactory {
    /// Create a provider instance from configuration
    pub fn create(
        provider_name: &str,
        config: &ProviderConfig,
    ) -> Result<Arc<dyn VisionProvider>, ProviderError> {
        // Validate that provider is enabled
        if !config.enabled {
            return Err(ProviderError::ProviderDisabled(provider_name.to_string()));
        }

        match provider_name {
            "google" => Ok(Arc::new(GoogleProvider::new(config)?)),
            "openai" => Ok(Arc::new(OpenAIProvider::new(config)?)),
            _ => Err(Self::unknown(provider_name)),
        }
    }

    /// Create a configured provider by name
    pub fn get_provider(
        config: &AiConfig,
        provider_name: &str,
    ) -> Result<Arc<dyn VisionProvider>, ProviderError> {
        let provider_config = config
            .providers
            .get(provider_name)
            .ok_or_else(|| Self::unknown(provider_name))?;

        Self::create(provider_name, provider_config)
    }

    /// Get the default provider from configuration
    pub fn get_default_provider(config: &AiConfig) -> Result<Arc<dyn VisionProvider>, ProviderError> {
        Self::get_provider(config, &config.default_provider)
    }

    /// List all available provider names
    pub fn available_providers() -> Vec<&'static str> {
        vec!["google", "openai"]
    }

    fn unknown(provider_name: &str) -> ProviderError {
        ProviderError::UnknownProvider(format!(
            "{} (available: {})",
            provider_name,
            Self::available_providers().join(", ")
        ))
    }
}
