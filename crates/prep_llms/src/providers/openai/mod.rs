//! OpenAI-compatible provider module (OpenAI, Groq)

mod convert;
mod provider;
mod types;

pub use provider::OpenAIProvider;
pub use types::OpenAIConfig;
