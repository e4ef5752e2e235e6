//! Generation configuration

use std::str::FromStr;
use std::sync::Arc;
use std::time::Duration;

use prep_llms::{OpenAIProvider, Provider};

use crate::error::{GenerationError, Result};

pub const DEFAULT_MODEL: &str = "llama-3.1-8b-instant";
pub const DEFAULT_OPENAI_MODEL: &str = "gpt-4o-mini";
pub const DEFAULT_MAX_TOKENS: u32 = 2000;
pub const DEFAULT_TEMPERATURE: f32 = 0.1;

/// Completion backend selection
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LlmProvider {
    #[default]
    Groq,
    OpenAI,
}

impl LlmProvider {
    pub fn as_str(&self) -> &'static str {
        match self {
            LlmProvider::Groq => "groq",
            LlmProvider::OpenAI => "openai",
        }
    }

    fn default_model(&self) -> &'static str {
        match self {
            LlmProvider::Groq => DEFAULT_MODEL,
            LlmProvider::OpenAI => DEFAULT_OPENAI_MODEL,
        }
    }
}

impl FromStr for LlmProvider {
    type Err = ();

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "groq" => Ok(LlmProvider::Groq),
            "openai" => Ok(LlmProvider::OpenAI),
            _ => Err(()),
        }
    }
}

impl std::fmt::Display for LlmProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Settings for the completion calls made by [`InterviewGenerator`](crate::InterviewGenerator).
#[derive(Debug, Clone, PartialEq)]
pub struct AiConfig {
    pub provider: LlmProvider,
    pub model: String,
    /// Upper bound on generated tokens per call
    pub max_tokens: u32,
    /// Sampling temperature; kept low for near-deterministic JSON
    pub temperature: f32,
    /// Abort a completion call after this long (None = wait indefinitely)
    pub timeout: Option<Duration>,
}

impl Default for AiConfig {
    fn default() -> Self {
        Self {
            provider: LlmProvider::default(),
            model: DEFAULT_MODEL.to_string(),
            max_tokens: DEFAULT_MAX_TOKENS,
            temperature: DEFAULT_TEMPERATURE,
            timeout: None,
        }
    }
}

impl AiConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    /// Switch provider. A model still at the previous provider's default follows the switch.
    pub fn with_provider(mut self, provider: LlmProvider) -> Self {
        if self.model == self.provider.default_model() {
            self.model = provider.default_model().to_string();
        }
        self.provider = provider;
        self
    }

    pub fn with_max_tokens(mut self, max_tokens: u32) -> Self {
        self.max_tokens = max_tokens;
        self
    }

    pub fn with_temperature(mut self, temperature: f32) -> Self {
        self.temperature = temperature;
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Load configuration from environment variables
    pub fn from_env() -> Self {
        let mut config = Self::new();

        if let Ok(provider_str) = std::env::var("PREP_PROVIDER") {
            if let Ok(provider) = provider_str.parse::<LlmProvider>() {
                config = config.with_provider(provider);
            }
        } else if std::env::var(OpenAIProvider::GROQ_API_KEY_ENV).is_err()
            && std::env::var(OpenAIProvider::API_KEY_ENV).is_ok()
        {
            config = config.with_provider(LlmProvider::OpenAI);
        }

        if let Ok(model) = std::env::var("PREP_MODEL") {
            config.model = model;
        }

        if let Ok(max_tokens) = std::env::var("PREP_MAX_TOKENS") {
            if let Ok(val) = max_tokens.parse::<u32>() {
                config.max_tokens = val;
            }
        }

        if let Ok(temperature) = std::env::var("PREP_TEMPERATURE") {
            if let Ok(val) = temperature.parse::<f32>() {
                config.temperature = val;
            }
        }

        if let Ok(timeout) = std::env::var("PREP_TIMEOUT_SECS") {
            if let Ok(val) = timeout.parse::<u64>() {
                config.timeout = Some(Duration::from_secs(val));
            }
        }

        config
    }

    /// Construct the provider named by this config from its API key env var.
    pub fn build_provider(&self) -> Result<Arc<dyn Provider>> {
        let provider = match self.provider {
            LlmProvider::Groq => OpenAIProvider::groq_from_env(),
            LlmProvider::OpenAI => OpenAIProvider::from_env(),
        }
        .map_err(|e| GenerationError::UpstreamUnavailable(e.to_string()))?;
        Ok(Arc::new(provider))
    }
}
