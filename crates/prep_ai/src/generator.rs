//! Generation orchestrators: prompt, complete, recover, validate.

use std::sync::Arc;

use prep_llms::Provider;
use prep_observability::{generation_span, record_error};
use tracing::Instrument;

use crate::completion::complete_json;
use crate::config::AiConfig;
use crate::error::{GenerationError, Result};
use crate::parse::parse_response;
use crate::prompt::{build_explanation_prompt, build_question_prompt};
use crate::types::{Explanation, ExplanationRequest, GenerationRequest, QaPair};
use crate::validate::{validate_explanation_object, validate_question_array};

/// Entry point for question and explanation generation.
///
/// Holds no per-request state; clone it or share it behind an `Arc` across
/// concurrent requests. Each call makes exactly one completion request and
/// never retries on its own.
#[derive(Clone)]
pub struct InterviewGenerator {
    provider: Arc<dyn Provider>,
    config: AiConfig,
}

impl InterviewGenerator {
    pub fn new(provider: Arc<dyn Provider>, config: AiConfig) -> Self {
        Self { provider, config }
    }

    /// Build a generator for the provider named in `config`, reading its API key from the environment.
    pub fn from_config(config: AiConfig) -> Result<Self> {
        let provider = config.build_provider()?;
        Ok(Self::new(provider, config))
    }

    pub fn config(&self) -> &AiConfig {
        &self.config
    }

    pub fn provider_id(&self) -> &str {
        self.provider.provider_id()
    }

    /// Generate question/answer pairs for `request`.
    ///
    /// The result may hold fewer pairs than requested, or none: malformed
    /// entries are dropped rather than failing the call.
    pub async fn generate_questions(&self, request: &GenerationRequest) -> Result<Vec<QaPair>> {
        let span = generation_span!("questions", self.config.model.as_str());
        async {
            let outcome = self.run_questions(request).await;
            if let Err(err) = &outcome {
                record_error(err);
            }
            outcome
        }
        .instrument(span)
        .await
    }

    async fn run_questions(&self, request: &GenerationRequest) -> Result<Vec<QaPair>> {
        request.validate()?;

        let prompt = build_question_prompt(
            &request.role,
            request.experience_years,
            &request.topics,
            request.question_count,
        );
        let raw = complete_json(self.provider.as_ref(), &self.config, prompt).await?;

        let Some(value) = parse_response(&raw) else {
            tracing::error!(raw.text = %raw, "failed to parse AI JSON");
            return Err(GenerationError::UnparseableResponse { raw_text: raw });
        };

        let pairs = validate_question_array(&value);
        if pairs.len() != request.question_count as usize {
            tracing::warn!(
                requested = request.question_count,
                received = pairs.len(),
                "question count differs from request"
            );
        }
        tracing::info!(count = pairs.len(), "generated interview questions");
        Ok(pairs)
    }

    /// Generate a titled markdown explanation for `request.question`.
    pub async fn generate_explanation(&self, request: &ExplanationRequest) -> Result<Explanation> {
        let span = generation_span!("explanation", self.config.model.as_str());
        async {
            let outcome = self.run_explanation(request).await;
            if let Err(err) = &outcome {
                record_error(err);
            }
            outcome
        }
        .instrument(span)
        .await
    }

    async fn run_explanation(&self, request: &ExplanationRequest) -> Result<Explanation> {
        request.validate()?;

        let prompt = build_explanation_prompt(&request.question);
        let raw = complete_json(self.provider.as_ref(), &self.config, prompt).await?;

        let Some(value) = parse_response(&raw) else {
            tracing::error!(raw.text = %raw, "failed to parse AI explanation JSON");
            return Err(GenerationError::UnparseableResponse { raw_text: raw });
        };

        match validate_explanation_object(&value) {
            Ok(explanation) => {
                tracing::info!(title = %explanation.title, "generated concept explanation");
                Ok(explanation)
            }
            Err(shape) => Err(GenerationError::InvalidResponseShape {
                reason: shape.to_string(),
                raw_text: raw,
            }),
        }
    }

    /// `generate_questions` with positional arguments.
    pub async fn questions(
        &self,
        role: &str,
        experience_years: f32,
        topics: &str,
        question_count: u32,
    ) -> Result<Vec<QaPair>> {
        self.generate_questions(&GenerationRequest::new(
            role,
            experience_years,
            topics,
            question_count,
        ))
        .await
    }

    /// `generate_explanation` for a bare question string.
    pub async fn explain(&self, question: &str) -> Result<Explanation> {
        self.generate_explanation(&ExplanationRequest::new(question))
            .await
    }
}

impl std::fmt::Debug for InterviewGenerator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("InterviewGenerator")
            .field("provider", &self.provider.provider_id())
            .field("config", &self.config)
            .finish()
    }
}
