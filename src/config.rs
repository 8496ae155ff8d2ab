use config::{Config, ConfigError, Environment, File};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::time::Duration;

use crate::admission::AdmissionPolicy;
use crate::providers::RetryPolicy;

const DEFAULT_GOOGLE_MODEL: &str = "gemini-2.0-flash-exp";

/// Main application configuration
#[derive(Debug, Deserialize, Clone, Default)]
pub struct AppConfig {
    /// HTTP listener and CORS settings
    #[serde(default)]
    pub server: ServerConfig,
    /// Upload admission limits applied before the pipeline runs
    #[serde(default)]
    pub upload: UploadConfig,
    /// Model providers and invocation behavior
    #[serde(default)]
    pub ai: AiConfig,
    /// Image normalization before transmission
    #[serde(default)]
    pub image: ImageConfig,
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
    /// Enables debug endpoints and error details in responses
    #[serde(default)]
    pub debug: bool,
    #[serde(default = "default_allowed_origins")]
    pub allowed_origins: Vec<String>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            debug: false,
            allowed_origins: default_allowed_origins(),
        }
    }
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct UploadConfig {
    #[serde(default = "default_max_file_size_mb")]
    pub max_file_size_mb: usize,
    #[serde(default = "default_allowed_file_types")]
    pub allowed_file_types: Vec<String>,
}

impl Default for UploadConfig {
    fn default() -> Self {
        Self {
            max_file_size_mb: default_max_file_size_mb(),
            allowed_file_types: default_allowed_file_types(),
        }
    }
}

impl UploadConfig {
    pub fn max_file_size_bytes(&self) -> usize {
        self.max_file_size_mb * 1024 * 1024
    }

    pub fn is_allowed_type(&self, content_type: &str) -> bool {
        self.allowed_file_types
            .iter()
            .any(|allowed| allowed.eq_ignore_ascii_case(content_type.trim()))
    }
}

/// Model provider configuration
#[derive(Debug, Deserialize, Clone)]
pub struct AiConfig {
    /// Provider used when none is requested explicitly
    #[serde(default = "default_provider")]
    pub default_provider: String,
    /// Map of provider name to provider configuration
    #[serde(default = "default_providers")]
    pub providers: HashMap<String, ProviderConfig>,
    /// Per-attempt timeout in seconds
    #[serde(default = "default_timeout")]
    pub timeout: u64,
    /// Total number of attempts per analysis, including the first one
    #[serde(default = "default_max_attempts")]
    pub max_attempts: u32,
    /// Base backoff delay in milliseconds, doubled after every failed attempt
    #[serde(default = "default_backoff_ms")]
    pub backoff_ms: u64,
}

impl Default for AiConfig {
    fn default() -> Self {
        Self {
            default_provider: default_provider(),
            providers: default_providers(),
            timeout: default_timeout(),
            max_attempts: default_max_attempts(),
            backoff_ms: default_backoff_ms(),
        }
    }
}

impl AiConfig {
    pub fn retry_policy(&self) -> RetryPolicy {
        RetryPolicy::new(
            Duration::from_secs(self.timeout),
            self.max_attempts,
            Duration::from_millis(self.backoff_ms),
        )
    }

    /// Model identifier of the default provider, if it is configured
    pub fn default_model(&self) -> Option<&str> {
        self.providers
            .get(&self.default_provider)
            .map(|provider| provider.model.as_str())
    }
}

/// Configuration for a specific model provider
#[derive(Debug, Deserialize, Clone)]
pub struct ProviderConfig {
    /// Whether this provider is enabled
    #[serde(default = "default_enabled")]
    pub enabled: bool,
    /// Model identifier (e.g., "gemini-2.0-flash-exp", "gpt-4o")
    pub model: String,
    /// Temperature for generation (0.0-1.0)
    #[serde(default = "default_temperature")]
    pub temperature: f32,
    /// Maximum tokens to generate
    #[serde(default = "default_max_tokens")]
    pub max_tokens: u32,
    /// API key for authentication (can also be set via environment variable)
    pub api_key: Option<String>,
    /// Base URL for API endpoint (for custom or proxy endpoints)
    pub base_url: Option<String>,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ImageConfig {
    /// Uploads larger than this are downsampled before transmission
    #[serde(default = "default_resize_threshold_bytes")]
    pub resize_threshold_bytes: usize,
    #[serde(default = "default_max_dimension")]
    pub max_dimension: u32,
}

impl Default for ImageConfig {
    fn default() -> Self {
        Self {
            resize_threshold_bytes: default_resize_threshold_bytes(),
            max_dimension: default_max_dimension(),
        }
    }
}

impl ImageConfig {
    pub fn admission_policy(&self) -> AdmissionPolicy {
        AdmissionPolicy {
            resize_threshold_bytes: self.resize_threshold_bytes,
            max_dimension: self.max_dimension,
        }
    }
}

// Default value functions
fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    8000
}

fn default_allowed_origins() -> Vec<String> {
    vec![
        "http://localhost:3000".to_string(),
        "http://127.0.0.1:3000".to_string(),
    ]
}

fn default_max_file_size_mb() -> usize {
    10
}

fn default_allowed_file_types() -> Vec<String> {
    vec![
        "image/jpeg".to_string(),
        "image/jpg".to_string(),
        "image/png".to_string(),
        "image/webp".to_string(),
    ]
}

fn default_provider() -> String {
    "google".to_string()
}

fn default_providers() -> HashMap<String, ProviderConfig> {
    let mut providers = HashMap::new();
    providers.insert(
        "google".to_string(),
        ProviderConfig {
            enabled: true,
            model: DEFAULT_GOOGLE_MODEL.to_string(),
            temperature: default_temperature(),
            max_tokens: default_max_tokens(),
            api_key: None,
            base_url: None,
        },
    );
    providers
}

fn default_enabled() -> bool {
    true
}

fn default_temperature() -> f32 {
    0.4
}

fn default_max_tokens() -> u32 {
    2048
}

fn default_timeout() -> u64 {
    30
}

fn default_max_attempts() -> u32 {
    3
}

fn default_backoff_ms() -> u64 {
    1000
}

fn default_resize_threshold_bytes() -> usize {
    4 * 1024 * 1024
}

fn default_max_dimension() -> u32 {
    1024
}

impl AppConfig {
    /// Load configuration from file and environment variables
    ///
    /// Configuration is loaded with the following priority (highest to lowest):
    /// 1. Environment variables with AI_RECIPES__ prefix
    /// 2. config.toml file in current directory
    /// 3. Default values
    ///
    /// Environment variable format: AI_RECIPES__AI__PROVIDERS__GOOGLE__API_KEY
    pub fn load() -> Result<Self, ConfigError> {
        let config = load_config()?;
        config.validate()?;
        Ok(config)
    }

    /// Reject settings the pipeline cannot run with
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.ai.max_attempts == 0 {
            return Err(ConfigError::Message(
                "ai.max_attempts must be at least 1".to_string(),
            ));
        }
        if self.ai.timeout == 0 {
            return Err(ConfigError::Message(
                "ai.timeout must be greater than zero".to_string(),
            ));
        }
        if self.upload.allowed_file_types.is_empty() {
            return Err(ConfigError::Message(
                "upload.allowed_file_types must not be empty".to_string(),
            ));
        }
        if self.upload.max_file_size_mb == 0 {
            return Err(ConfigError::Message(
                "upload.max_file_size_mb must be greater than zero".to_string(),
            ));
        }
        Ok(())
    }
}

/// Load configuration from file and environment variables without validating it
pub fn load_config() -> Result<AppConfig, ConfigError> {
    load_config_with(environment())
}

fn environment() -> Environment {
    // Use double underscore for nested: AI_RECIPES__SERVER__PORT
    Environment::with_prefix("AI_RECIPES")
        .separator("__")
        .list_separator(",")
        .with_list_parse_key("server.allowed_origins")
        .with_list_parse_key("upload.allowed_file_types")
        .try_parsing(true)
}

fn load_config_with(environment: Environment) -> Result<AppConfig, ConfigError> {
    let settings = Config::builder()
        // Built-in provider, so env vars such as AI_RECIPES__AI__PROVIDERS__GOOGLE__API_KEY
        // extend it instead of replacing the whole provider map
        .set_default("ai.providers.google.enabled", true)?
        .set_default("ai.providers.google.model", DEFAULT_GOOGLE_MODEL)?
        // Optional config file (can be missing)
        .add_source(File::with_name("config").required(false))
        .add_source(environment)
        .build()?;

    settings.try_deserialize()
}
