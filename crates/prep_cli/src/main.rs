//! CLI entry point for the interview-prep generators.

mod cli;
mod commands;
mod output;

use std::path::Path;

use clap::Parser;
use prep_ai::GenerationError;
use prep_observability::ObservabilityConfig;

use crate::cli::Cli;

/// Load environment files: `~/.prep/env`, then the nearest `.env` walking up
/// from the current directory. Variables already set are never overridden.
fn load_prep_env() {
    if let Some(home) = dirs::home_dir() {
        let config_path = home.join(".prep").join("env");
        if config_path.exists() {
            let _ = dotenvy::from_path(&config_path);
        }
    }
    if let Ok(cwd) = std::env::current_dir() {
        let mut dir: &Path = &cwd;
        for _ in 0..32 {
            let env_file = dir.join(".env");
            if env_file.exists() {
                let _ = dotenvy::from_path(&env_file);
                break;
            }
            match dir.parent() {
                Some(parent) => dir = parent,
                None => break,
            }
        }
    }
}

fn init_tracing(verbose: bool) {
    let mut config = ObservabilityConfig::from_env().with_version(env!("CARGO_PKG_VERSION"));
    if config.service_name == ObservabilityConfig::default().service_name {
        config.service_name = "prep-cli".to_string();
    }
    if verbose {
        config = config.with_log_level("debug");
    } else if config.log_level.is_none() {
        config = config.with_log_level("warn");
    }
    if let Err(e) = prep_observability::init(config) {
        output::warning(&format!("tracing disabled: {e}"));
    }
}

#[tokio::main]
async fn main() {
    load_prep_env();
    let cli = Cli::parse();
    output::init(cli.output);
    init_tracing(cli.verbose);

    let verbose = cli.verbose;
    let result = commands::handle(cli).await;
    prep_observability::shutdown();

    if let Err(e) = result {
        match e.downcast_ref::<GenerationError>() {
            Some(err) => output::generation_error(err, verbose),
            None => output::error(&e.to_string()),
        }
        std::process::exit(1);
    }
}
