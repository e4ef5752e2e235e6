//! OpenAI-compatible provider implementation

use super::convert::{from_openai_response, to_openai_request};
use super::types::{OpenAIConfig, OpenAIResponse, GROQ_BASE_URL};
use crate::error::{Error, Result};
use crate::provider::Provider;
use crate::types::{GenerateRequest, GenerateResponse, Headers};
use async_trait::async_trait;
use reqwest::Client;

/// Chat completions over the OpenAI wire format.
///
/// The same implementation serves Groq, which exposes an OpenAI-compatible API.
pub struct OpenAIProvider {
    id: String,
    config: OpenAIConfig,
    client: Client,
}

impl OpenAIProvider {
    /// Environment variable for the OpenAI API key
    pub const API_KEY_ENV: &'static str = "OPENAI_API_KEY";
    /// Environment variable for the Groq API key
    pub const GROQ_API_KEY_ENV: &'static str = "GROQ_API_KEY";

    /// Create a new OpenAI provider
    pub fn new(config: OpenAIConfig) -> Result<Self> {
        Self::with_id("openai", config)
    }

    /// Create a provider registered under a custom id (e.g. `"groq"`)
    pub fn with_id(id: impl Into<String>, config: OpenAIConfig) -> Result<Self> {
        let id = id.into();
        if config.api_key.is_empty() {
            return Err(Error::MissingApiKey(id));
        }

        Ok(Self {
            id,
            config,
            client: Client::new(),
        })
    }

    /// Create an OpenAI provider from `OPENAI_API_KEY` (and optional `OPENAI_BASE_URL`)
    pub fn from_env() -> Result<Self> {
        let api_key = std::env::var(Self::API_KEY_ENV)
            .map_err(|_| Error::MissingApiKey("openai".to_string()))?;

        let mut config = OpenAIConfig::new(api_key);
        if let Ok(base_url) = std::env::var("OPENAI_BASE_URL") {
            config = config.with_base_url(base_url);
        }
        Self::new(config)
    }

    /// Create a Groq provider from `GROQ_API_KEY` (and optional `GROQ_BASE_URL`)
    pub fn groq_from_env() -> Result<Self> {
        let api_key = std::env::var(Self::GROQ_API_KEY_ENV)
            .map_err(|_| Error::MissingApiKey("groq".to_string()))?;

        let base_url = std::env::var("GROQ_BASE_URL").unwrap_or_else(|_| GROQ_BASE_URL.to_string());
        Self::with_id("groq", OpenAIConfig::new(api_key).with_base_url(base_url))
    }

    pub fn base_url(&self) -> &str {
        &self.config.base_url
    }

    async fn send(&self, request: GenerateRequest) -> Result<GenerateResponse> {
        let url = format!("{}/chat/completions", self.config.base_url);
        let openai_req = to_openai_request(&request)?;
        let headers = self.build_headers(request.options.headers.as_ref());

        let response = self
            .client
            .post(&url)
            .headers(headers.to_reqwest_headers())
            .json(&openai_req)
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let error_text = response.text().await.unwrap_or_default();
            return Err(Error::provider_error(format!(
                "{} API error {}: {}",
                self.id, status, error_text
            )));
        }

        let openai_resp: OpenAIResponse = response.json().await?;
        tracing::debug!(
            provider = %self.id,
            response.id = ?openai_resp.id,
            response.model = ?openai_resp.model,
            "chat completion received"
        );
        Ok(from_openai_response(openai_resp))
    }
}

#[async_trait]
impl Provider for OpenAIProvider {
    fn provider_id(&self) -> &str {
        &self.id
    }

    fn build_headers(&self, custom_headers: Option<&Headers>) -> Headers {
        let mut headers = Headers::new();

        headers.insert("Authorization", format!("Bearer {}", self.config.api_key));
        headers.insert("Content-Type", "application/json");

        if let Some(ref org_id) = self.config.organization_id {
            headers.insert("OpenAI-Organization", org_id);
        }

        if let Some(custom) = custom_headers {
            headers.merge_with(custom);
        }

        headers
    }

    async fn generate(&self, request: GenerateRequest) -> Result<GenerateResponse> {
        self.send(request).await
    }
}
