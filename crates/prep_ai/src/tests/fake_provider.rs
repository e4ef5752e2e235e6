use std::sync::Mutex;
use std::time::Duration;

use async_trait::async_trait;
use prep_llms::{
    Error, FinishReason, GenerateRequest, GenerateResponse, Headers, Provider, Result,
};

/// Canned behaviour for one `generate` call
pub(crate) enum Reply {
    Text(String),
    Truncated(String),
    NoContent,
    Fail,
    Hang,
}

/// Provider double that replays a fixed reply and records requests.
pub(crate) struct FakeProvider {
    reply: Reply,
    requests: Mutex<Vec<GenerateRequest>>,
}

impl FakeProvider {
    pub(crate) fn new(reply: Reply) -> Self {
        Self {
            reply,
            requests: Mutex::new(Vec::new()),
        }
    }

    pub(crate) fn text(raw: &str) -> Self {
        Self::new(Reply::Text(raw.to_string()))
    }

    pub(crate) fn requests(&self) -> Vec<GenerateRequest> {
        self.requests.lock().unwrap().clone()
    }
}

#[async_trait]
impl Provider for FakeProvider {
    fn provider_id(&self) -> &str {
        "fake"
    }

    fn build_headers(&self, _custom_headers: Option<&Headers>) -> Headers {
        Headers::new()
    }

    async fn generate(&self, request: GenerateRequest) -> Result<GenerateResponse> {
        self.requests.lock().unwrap().push(request);
        match &self.reply {
            Reply::Text(raw) => Ok(GenerateResponse::text(raw.clone())),
            Reply::Truncated(raw) => Ok(GenerateResponse {
                content: Some(raw.clone()),
                finish_reason: Some(FinishReason::Length),
                usage: None,
            }),
            Reply::NoContent => Ok(GenerateResponse::default()),
            Reply::Fail => Err(Error::provider_error("groq API error 401: invalid key")),
            Reply::Hang => {
                tokio::time::sleep(Duration::from_secs(60)).await;
                Ok(GenerateResponse::text("{}"))
            }
        }
    }
}
