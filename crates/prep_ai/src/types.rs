//! Request and domain types

use serde::{Deserialize, Serialize};

use crate::error::{GenerationError, Result};

/// Parameters for one question-generation call.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerationRequest {
    pub role: String,
    pub experience_years: f32,
    pub topics: String,
    pub question_count: u32,
}

impl GenerationRequest {
    pub fn new(
        role: impl Into<String>,
        experience_years: f32,
        topics: impl Into<String>,
        question_count: u32,
    ) -> Self {
        Self {
            role: role.into(),
            experience_years,
            topics: topics.into(),
            question_count,
        }
    }

    /// Reject requests with missing fields or a zero count.
    pub fn validate(&self) -> Result<()> {
        if self.role.trim().is_empty() {
            return Err(GenerationError::InvalidRequest("role is required".into()));
        }
        if self.topics.trim().is_empty() {
            return Err(GenerationError::InvalidRequest("topics are required".into()));
        }
        if !self.experience_years.is_finite() || self.experience_years < 0.0 {
            return Err(GenerationError::InvalidRequest(format!(
                "experience must be a non-negative number of years, got {}",
                self.experience_years
            )));
        }
        if self.question_count == 0 {
            return Err(GenerationError::InvalidRequest(
                "question count must be greater than zero".into(),
            ));
        }
        Ok(())
    }
}

/// Parameters for one concept-explanation call.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExplanationRequest {
    pub question: String,
}

impl ExplanationRequest {
    pub fn new(question: impl Into<String>) -> Self {
        Self {
            question: question.into(),
        }
    }

    pub fn validate(&self) -> Result<()> {
        if self.question.trim().is_empty() {
            return Err(GenerationError::InvalidRequest("question is required".into()));
        }
        Ok(())
    }
}

/// One interview question with its model-generated answer. Both fields are non-empty.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QaPair {
    pub question: String,
    pub answer: String,
}

/// A concept explanation. `explanation` is markdown and may contain fenced code blocks.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Explanation {
    pub title: String,
    pub explanation: String,
}
