//! prep_llms: chat completion client for the interview-prep generators.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────┐
//! │              dyn Provider                   │
//! │    generate(GenerateRequest) -> Response    │
//! │                     │                       │
//! │          ┌──────────┴──────────┐            │
//! │          ▼                     ▼            │
//! │   ┌─────────────┐      ┌─────────────┐      │
//! │   │   OpenAI    │      │    Groq     │      │
//! │   │ (api.openai)│      │ (OpenAI API)│      │
//! │   └─────────────┘      └─────────────┘      │
//! └─────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//!
//! ```rust,no_run
//! use prep_llms::{GenerateRequest, Message, OpenAIProvider, Provider, ResponseFormat};
//!
//! # async fn run() -> prep_llms::Result<()> {
//! let provider = OpenAIProvider::groq_from_env()?;
//! let request = GenerateRequest::new(
//!     "llama-3.1-8b-instant",
//!     vec![Message::system("Reply in JSON."), Message::user("Say hi")],
//! )
//! .with_response_format(ResponseFormat::JsonObject);
//! let response = provider.generate(request).await?;
//! println!("{:?}", response.content);
//! # Ok(())
//! # }
//! ```

pub mod error;
pub mod provider;
pub mod providers;
pub mod types;

#[cfg(all(test, feature = "openai"))]
mod tests;

pub use error::{Error, Result};
pub use provider::Provider;

#[cfg(feature = "openai")]
pub use providers::openai::{OpenAIConfig, OpenAIProvider};

pub use types::{
    FinishReason, GenerateOptions, GenerateRequest, GenerateResponse, Headers, Message,
    ResponseFormat, Role, Usage,
};
