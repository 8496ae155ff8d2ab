use crate::admission::ImagePayload;
use crate::config::ProviderConfig;
use crate::providers::{ProviderError, VisionProvider};
use async_trait::async_trait;
use log::debug;
use reqwest::Client;
use serde_json::{json, Value};

pub struct OpenAIProvider {
    client: Client,
    api_key: String,
    base_url: String,
    model: String,
    temperature: f32,
    max_tokens: u32,
}

impl OpenAIProvider {
    /// Create a new OpenAI provider from configuration
    pub fn new(config: &ProviderConfig) -> Result<Self, ProviderError> {
        // Try config first, then fall back to environment variable
        let api_key = config
            .api_key
            .clone()
            .or_else(|| std::env::var("OPENAI_API_KEY").ok())
            .ok_or(ProviderError::MissingApiKey("OPENAI_API_KEY"))?;

        let base_url = config
            .base_url
            .clone()
            .unwrap_or_else(|| "https://api.openai.com".to_string());

        Ok(OpenAIProvider {
            client: Client::new(),
            api_key,
            base_url,
            model: config.model.clone(),
            temperature: config.temperature,
            max_tokens: config.max_tokens,
        })
    }
}

#[async_trait]
impl VisionProvider for OpenAIProvider {
    fn provider_name(&self) -> &str {
        "openai"
    }

    fn model(&self) -> &str {
        &self.model
    }

    async fn generate(&self, prompt: &str, image: &ImagePayload) -> Result<String, ProviderError> {
        let response = self
            .client
            .post(format!("{}/v1/chat/completions", self.base_url))
            .header("Authorization", format!("Bearer {}", self.api_key))
            .json(&json!({
                "model": self.model,
                "messages": [{
                    "role": "user",
                    "content": [
                        { "type": "text", "text": prompt },
                        { "type": "image_url", "image_url": { "url": image.to_data_url() } }
                    ]
                }],
                "temperature": self.temperature,
                "max_tokens": self.max_tokens
            }))
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status().as_u16();
            let body = response.text().await?;
            return Err(ProviderError::Api { status, body });
        }

        let response_body: Value = response.json().await?;
        debug!("{:?}", response_body);

        let content = response_body["choices"][0]["message"]["content"]
            .as_str()
            .ok_or(ProviderError::MissingContent("OpenAI"))?
            .to_string();

        Ok(content)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mockito::{Matcher, Server};

    fn test_config(base_url: String) -> ProviderConfig {
        ProviderConfig {
            enabled: true,
            model: "gpt-4o".to_string(),
            temperature: 0.4,
            max_tokens: 2048,
            api_key: Some("fake_api_key".to_string()),
            base_url: Some(base_url),
        }
    }

    fn test_image() -> ImagePayload {
        ImagePayload {
            mime_type: "image/jpeg".to_string(),
            data: vec![1, 2, 3],
        }
    }

    #[tokio::test]
    async fn test_generate() {
        let mut server = Server::new_async().await;
        let mock = server
            .mock("POST", "/v1/chat/completions")
            .match_header("authorization", "Bearer fake_api_key")
            .match_body(Matcher::Regex("data:image/jpeg;base64,AQID".to_string()))
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(
                r#"{
                    "choices": [{
                        "message": {
                            "content": "{\"ingredients\": [{\"name\": \"tomato\", \"category\": \"vegetable\"}], \"recipes\": []}"
                        }
                    }]
                }"#,
            )
            .create_async()
            .await;

        let provider = OpenAIProvider::new(&test_config(server.url())).unwrap();
        let result = provider.generate("find food", &test_image()).await.unwrap();

        assert!(result.contains("tomato"));
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_generate_api_error() {
        let mut server = Server::new_async().await;
        let mock = server
            .mock("POST", "/v1/chat/completions")
            .with_status(400)
            .with_header("content-type", "application/json")
            .with_body(r#"{"error": "Invalid request"}"#)
            .create_async()
            .await;

        let provider = OpenAIProvider::new(&test_config(server.url())).unwrap();
        let result = provider.generate("find food", &test_image()).await;

        assert!(matches!(result, Err(ProviderError::Api { status: 400, .. })));
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_provider_name() {
        let provider = OpenAIProvider::new(&test_config("http://localhost".to_string())).unwrap();
        assert_eq!(provider.provider_name(), "openai");
    }
}
