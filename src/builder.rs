use std::sync::Arc;
use std::time::Duration;

use crate::admission::AdmissionPolicy;
use crate::config::AppConfig;
use crate::error::AnalysisError;
use crate::model::AnalysisResult;
use crate::pipelines;
use crate::providers::{ProviderFactory, RetryPolicy, VisionProvider};

/// Analyzes food photos with a configured provider.
///
/// Holds only read-only configuration and a shared provider handle, so one
/// instance can serve any number of concurrent requests.
pub struct RecipeAnalyzer {
    provider: Arc<dyn VisionProvider>,
    retry: RetryPolicy,
    admission: AdmissionPolicy,
}

impl RecipeAnalyzer {
    /// Creates a new builder for configuring an analyzer
    ///
    /// # Example
    /// ```
    /// use ai_recipes::RecipeAnalyzer;
    ///
    /// let builder = RecipeAnalyzer::builder();
    /// ```
    pub fn builder() -> RecipeAnalyzerBuilder {
        RecipeAnalyzerBuilder::default()
    }

    /// Build an analyzer from loaded configuration, using the default provider
    /// unless `provider_name` is given.
    pub fn from_config(
        config: &AppConfig,
        provider_name: Option<&str>,
    ) -> Result<Self, AnalysisError> {
        let provider = match provider_name {
            Some(name) => ProviderFactory::get_provider(&config.ai, name)?,
            None => ProviderFactory::get_default_provider(&config.ai)?,
        };

        Ok(Self {
            provider,
            retry: config.ai.retry_policy(),
            admission: config.image.admission_policy(),
        })
    }

    /// Analyze raw upload bytes.
    ///
    /// # Errors
    /// - [`AnalysisError::InvalidImage`] when the bytes are not a supported image
    /// - [`AnalysisError::RemoteUnavailable`] when every model attempt failed
    pub async fn analyze(&self, image_bytes: Vec<u8>) -> Result<AnalysisResult, AnalysisError> {
        pipelines::image::process(
            self.provider.as_ref(),
            &self.retry,
            self.admission,
            image_bytes,
        )
        .await
    }

    pub fn provider_name(&self) -> &str {
        self.provider.provider_name()
    }

    pub fn model(&self) -> &str {
        self.provider.model()
    }

    pub fn retry_policy(&self) -> &RetryPolicy {
        &self.retry
    }

    pub fn admission_policy(&self) -> &AdmissionPolicy {
        &self.admission
    }
}

/// Builder for configuring a [`RecipeAnalyzer`]
#[derive(Default)]
pub struct RecipeAnalyzerBuilder {
    provider: Option<Arc<dyn VisionProvider>>,
    timeout: Option<Duration>,
    max_attempts: Option<u32>,
    backoff_unit: Option<Duration>,
    admission: Option<AdmissionPolicy>,
}

impl RecipeAnalyzerBuilder {
    /// Set the provider that receives the photo
    pub fn provider(mut self, provider: Arc<dyn VisionProvider>) -> Self {
        self.provider = Some(provider);
        self
    }

    /// Set the timeout for each model attempt
    ///
    /// # Example
    /// ```
    /// use ai_recipes::RecipeAnalyzer;
    /// use std::time::Duration;
    ///
    /// let builder = RecipeAnalyzer::builder().timeout(Duration::from_secs(30));
    /// ```
    pub fn timeout(mut self, duration: Duration) -> Self {
        self.timeout = Some(duration);
        self
    }

    /// Set the total number of model attempts (values below 1 become 1)
    pub fn max_attempts(mut self, attempts: u32) -> Self {
        self.max_attempts = Some(attempts);
        self
    }

    /// Set the first backoff delay; later delays double it
    pub fn backoff_unit(mut self, unit: Duration) -> Self {
        self.backoff_unit = Some(unit);
        self
    }

    /// Set the image admission limits
    pub fn admission(mut self, policy: AdmissionPolicy) -> Self {
        self.admission = Some(policy);
        self
    }

    /// Build the analyzer
    ///
    /// # Errors
    /// Returns [`AnalysisError::BuilderError`] if no provider was set
    pub fn build(self) -> Result<RecipeAnalyzer, AnalysisError> {
        let provider = self.provider.ok_or_else(|| {
            AnalysisError::BuilderError(
                "No provider specified. Use .provider() or RecipeAnalyzer::from_config()"
                    .to_string(),
            )
        })?;

        let defaults = RetryPolicy::default();
        let retry = RetryPolicy::new(
            self.timeout.unwrap_or(defaults.timeout),
            self.max_attempts.unwrap_or(defaults.max_attempts),
            self.backoff_unit.unwrap_or(defaults.backoff_unit),
        );

        Ok(RecipeAnalyzer {
            provider,
            retry,
            admission: self.admission.unwrap_or_default(),
        })
    }
}
