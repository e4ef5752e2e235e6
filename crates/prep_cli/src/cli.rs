//! CLI argument definitions using clap derive macros.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};

/// Generate interview questions and concept explanations with an LLM
#[derive(Parser)]
#[command(name = "prep", about, version, propagate_version = true)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Enable verbose output (debug logs, raw model text on failure)
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Output format: text (human-readable) or json (machine-readable)
    #[arg(short, long, global = true, default_value = "text")]
    pub output: OutputFormat,

    #[command(flatten)]
    pub model: ModelArgs,
}

#[derive(Clone, Copy, Debug, Default, ValueEnum)]
pub enum OutputFormat {
    /// Colored terminal output for humans
    #[default]
    Text,
    /// Structured JSON for machine consumption
    Json,
}

/// Overrides for the completion settings read from the environment
#[derive(Args, Debug, Clone, Default)]
pub struct ModelArgs {
    /// Provider to use (groq, openai). Uses PREP_PROVIDER env if not set.
    #[arg(long, global = true)]
    pub provider: Option<String>,
    /// Model to use (e.g. llama-3.1-8b-instant). Uses PREP_MODEL env if not set.
    #[arg(long, global = true)]
    pub model: Option<String>,
    /// Maximum tokens for the model response (default: 2000)
    #[arg(long, global = true)]
    pub max_tokens: Option<u32>,
    /// Give up on the completion call after this many seconds
    #[arg(long, global = true)]
    pub timeout: Option<u64>,
}

#[derive(Subcommand)]
pub enum Command {
    /// Generate interview questions with answers
    Questions {
        /// Target role (e.g. "Frontend Developer")
        #[arg(short, long)]
        role: String,
        /// Candidate experience in years
        #[arg(short, long)]
        experience: f32,
        /// Topics to focus on (comma separated)
        #[arg(short, long)]
        topics: String,
        /// Number of questions to generate
        #[arg(short = 'n', long, default_value_t = 10)]
        count: u32,
    },
    /// Explain the concept behind an interview question
    Explain {
        /// The question to explain
        #[arg(short, long)]
        question: String,
    },
    /// Run the recovery parser on saved model output (no model call)
    Parse {
        /// File holding the raw model text (default: stdin)
        #[arg(short, long)]
        file: Option<PathBuf>,
        /// Expected shape of the recovered value
        #[arg(short, long, default_value = "questions")]
        shape: Shape,
    },
}

#[derive(Clone, Copy, Debug, ValueEnum)]
pub enum Shape {
    /// Array of {question, answer}
    Questions,
    /// Object {title, explanation}
    Explanation,
}
