//! Conversion between unified types and OpenAI types

use super::types::{OpenAIMessage, OpenAIRequest, OpenAIResponse};
use crate::error::{Error, Result};
use crate::types::{
    FinishReason, GenerateRequest, GenerateResponse, Message, ResponseFormat, Usage,
};
use serde_json::json;

/// Convert unified request to OpenAI request
pub fn to_openai_request(req: &GenerateRequest) -> Result<OpenAIRequest> {
    if req.messages.is_empty() {
        return Err(Error::invalid_request("at least one message is required"));
    }

    let response_format = match req.options.response_format {
        ResponseFormat::Text => None,
        ResponseFormat::JsonObject => Some(json!({ "type": "json_object" })),
    };

    Ok(OpenAIRequest {
        model: req.model.clone(),
        messages: req.messages.iter().map(to_openai_message).collect(),
        temperature: req.options.temperature,
        max_tokens: req.options.max_tokens,
        response_format,
    })
}

fn to_openai_message(msg: &Message) -> OpenAIMessage {
    OpenAIMessage {
        role: msg.role.as_str().to_string(),
        content: Some(msg.content.clone()),
    }
}

/// Convert OpenAI response to unified response. Only the first choice is used.
pub fn from_openai_response(resp: OpenAIResponse) -> GenerateResponse {
    let usage = resp.usage.map(|u| Usage {
        prompt_tokens: u.prompt_tokens,
        completion_tokens: u.completion_tokens,
        total_tokens: u.total_tokens,
    });

    let Some(choice) = resp.choices.into_iter().next() else {
        return GenerateResponse {
            content: None,
            finish_reason: None,
            usage,
        };
    };

    GenerateResponse {
        content: choice.message.content,
        finish_reason: choice.finish_reason.as_deref().map(FinishReason::from_api),
        usage,
    }
}
