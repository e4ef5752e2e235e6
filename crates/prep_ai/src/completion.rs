//! Completion call: one system instruction plus one user prompt, JSON-object mode.

use std::time::Instant;

use prep_llms::{GenerateRequest, Message, Provider, ResponseFormat};
use prep_observability::record_duration;

use crate::config::AiConfig;
use crate::error::{GenerationError, Result};
use crate::prompt::SYSTEM_INSTRUCTION;

/// Build the request sent for `prompt` under `config`.
pub(crate) fn completion_request(config: &AiConfig, prompt: String) -> GenerateRequest {
    GenerateRequest::new(
        config.model.clone(),
        vec![Message::system(SYSTEM_INSTRUCTION), Message::user(prompt)],
    )
    .with_response_format(ResponseFormat::JsonObject)
    .with_max_tokens(config.max_tokens)
    .with_temperature(config.temperature)
}

/// Run one completion and return the raw model text.
///
/// Any provider failure (including the configured timeout) becomes
/// `UpstreamUnavailable`; a response without content becomes `UpstreamEmpty`.
pub(crate) async fn complete_json(
    provider: &dyn Provider,
    config: &AiConfig,
    prompt: String,
) -> Result<String> {
    let request = completion_request(config, prompt);
    tracing::debug!(
        provider = provider.provider_id(),
        model = %request.model,
        max_tokens = config.max_tokens,
        "sending completion request"
    );

    let start = Instant::now();
    let outcome = match config.timeout {
        Some(limit) => tokio::time::timeout(limit, provider.generate(request))
            .await
            .map_err(|_| {
                GenerationError::UpstreamUnavailable(format!(
                    "completion timed out after {}s",
                    limit.as_secs()
                ))
            })?,
        None => provider.generate(request).await,
    };
    record_duration("completion.duration_ms", start.elapsed());

    let response = outcome?;
    if response.is_truncated() {
        tracing::warn!(
            max_tokens = config.max_tokens,
            "completion stopped at the token limit; output may be truncated"
        );
    }

    let raw = response.content.ok_or(GenerationError::UpstreamEmpty)?;
    tracing::debug!(raw.len = raw.len(), raw.text = %raw, "completion received");
    Ok(raw)
}
