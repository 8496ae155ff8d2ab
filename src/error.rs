use thiserror::Error;

use crate::providers::ProviderError;

/// Errors that can occur while analyzing a photo
#[derive(Error, Debug)]
pub enum AnalysisError {
    /// The uploaded bytes are not a decodable image
    #[error("Invalid image format: {0}")]
    InvalidImage(String),

    /// Every attempt to reach the model failed or timed out
    #[error("Analysis service unavailable after {attempts} attempt(s): {cause}")]
    RemoteUnavailable { attempts: u32, cause: String },

    /// A provider could not be constructed
    #[error("Provider error: {0}")]
    ProviderError(#[from] ProviderError),

    /// Builder configuration error
    #[error("Builder error: {0}")]
    BuilderError(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    ConfigError(#[from] config::ConfigError),

    /// A blocking image task panicked or was cancelled
    #[error("Background task failed: {0}")]
    TaskError(#[from] tokio::task::JoinError),
}
