//! prep-ai: interview question and concept explanation generation.
//!
//! The pipeline for both flows is the same:
//!
//! ```text
//! request ─► prompt ─► Provider::generate ─► parse_response ─► validate ─► QaPair / Explanation
//! ```
//!
//! Model output is not trusted to honour the JSON contract. [`parse_response`]
//! runs a fallback chain (fence stripping, strict parse, boundary extraction,
//! string repair) and reports `None` instead of failing; the validators then
//! keep only entries with the expected shape.

mod completion;
mod config;
mod error;
mod generator;
mod parse;
mod prompt;
mod types;
mod validate;

#[cfg(test)]
mod tests;

pub use config::{AiConfig, LlmProvider};
pub use error::{GenerationError, Result, ShapeError};
pub use generator::InterviewGenerator;
pub use parse::parse_response;
pub use prompt::{build_explanation_prompt, build_question_prompt, SYSTEM_INSTRUCTION};
pub use types::{Explanation, ExplanationRequest, GenerationRequest, QaPair};
pub use validate::{validate_explanation_object, validate_question_array};
