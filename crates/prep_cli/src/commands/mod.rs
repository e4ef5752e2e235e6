//! Command dispatch.

pub mod explain;
pub mod parse;
pub mod questions;

use std::time::Duration;

use anyhow::{anyhow, Result};
use prep_ai::{AiConfig, InterviewGenerator, LlmProvider};

use crate::cli::{Cli, Command, ModelArgs};

pub async fn handle(cli: Cli) -> Result<()> {
    match cli.command {
        Command::Questions {
            role,
            experience,
            topics,
            count,
        } => {
            let generator = build_generator(&cli.model)?;
            questions::handle(&generator, &role, experience, &topics, count).await
        }
        Command::Explain { question } => {
            let generator = build_generator(&cli.model)?;
            explain::handle(&generator, &question).await
        }
        Command::Parse { file, shape } => parse::handle(file.as_deref(), shape),
    }
}

/// Environment settings with command-line overrides applied on top.
fn resolve_config(args: &ModelArgs) -> Result<AiConfig> {
    let mut config = AiConfig::from_env();
    if let Some(name) = &args.provider {
        let provider: LlmProvider = name
            .parse()
            .map_err(|_| anyhow!("Unknown provider '{name}' (expected groq or openai)"))?;
        config = config.with_provider(provider);
    }
    if let Some(model) = &args.model {
        config = config.with_model(model.clone());
    }
    if let Some(max_tokens) = args.max_tokens {
        config = config.with_max_tokens(max_tokens);
    }
    if let Some(secs) = args.timeout {
        config = config.with_timeout(Duration::from_secs(secs));
    }
    Ok(config)
}

fn build_generator(args: &ModelArgs) -> Result<InterviewGenerator> {
    let config = resolve_config(args)?;
    Ok(InterviewGenerator::from_config(config)?)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unknown_provider_rejected() {
        let args = ModelArgs {
            provider: Some("bedrock".to_string()),
            ..Default::default()
        };
        let err = resolve_config(&args).unwrap_err();
        assert!(err.to_string().contains("bedrock"));
    }

    #[test]
    fn test_overrides_applied() {
        let args = ModelArgs {
            provider: None,
            model: Some("llama-3.3-70b-versatile".to_string()),
            max_tokens: Some(512),
            timeout: Some(30),
        };
        let config = resolve_config(&args).unwrap();
        assert_eq!(config.model, "llama-3.3-70b-versatile");
        assert_eq!(config.max_tokens, 512);
        assert_eq!(config.timeout, Some(Duration::from_secs(30)));
    }
}
