use async_trait::async_trait;

use crate::error::Result;
use crate::types::{GenerateRequest, GenerateResponse, Headers};

/// A chat completion backend.
///
/// Implementations are shared across concurrent requests behind an `Arc`, so
/// they must hold no per-request mutable state.
#[async_trait]
pub trait Provider: Send + Sync {
    /// Stable identifier, e.g. `"openai"` or `"groq"`.
    fn provider_id(&self) -> &str;

    /// Headers sent with every request, merged with any request-level headers.
    fn build_headers(&self, custom_headers: Option<&Headers>) -> Headers;

    /// Run a single non-streaming completion.
    async fn generate(&self, request: GenerateRequest) -> Result<GenerateResponse>;
}
