mod factory;
mod google;
mod open_ai;
mod prompt;
mod retry;

pub use factory::ProviderFactory;
pub use google::GoogleProvider;
pub use open_ai::OpenAIProvider;
pub use prompt::{build_prompt, PANTRY_STAPLES, PROMPT_VERSION, SYSTEM_PROMPT, USER_PROMPT};
pub use retry::{
    invoke, retry_with_timeout, AttemptOutcome, InvocationAttempt, RetryExhausted, RetryPolicy,
};

use async_trait::async_trait;
use thiserror::Error;

use crate::admission::ImagePayload;

/// Errors raised by a single provider call or while constructing a provider
#[derive(Error, Debug)]
pub enum ProviderError {
    #[error("Request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("API error ({status}): {body}")]
    Api { status: u16, body: String },

    #[error("Failed to extract content from {0} response")]
    MissingContent(&'static str),

    #[error("Empty response from model")]
    EmptyResponse,

    #[error("Request blocked by the model: {0}")]
    Blocked(String),

    #[error("{0} not found in config or environment")]
    MissingApiKey(&'static str),

    #[error("Unknown provider: {0}")]
    UnknownProvider(String),

    #[error("Provider '{0}' is not enabled in configuration")]
    ProviderDisabled(String),
}

/// Unified trait for all multimodal model providers
#[async_trait]
pub trait VisionProvider: Send + Sync {
    /// Get the provider name (e.g., "google", "openai")
    fn provider_name(&self) -> &str;

    /// Model identifier the provider sends requests to
    fn model(&self) -> &str;

    /// Send the prompt together with the image and return the model's raw text
    async fn generate(&self, prompt: &str, image: &ImagePayload) -> Result<String, ProviderError>;
}
