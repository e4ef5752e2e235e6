//! `prep parse`: run saved model output through recovery and validation offline.

use std::io::Read;
use std::path::Path;

use anyhow::{Context, Result};
use prep_ai::{parse_response, validate_explanation_object, validate_question_array, GenerationError};

use crate::cli::Shape;
use crate::output;

pub fn handle(file: Option<&Path>, shape: Shape) -> Result<()> {
    let raw = read_input(file)?;

    let Some(value) = parse_response(&raw) else {
        return Err(GenerationError::UnparseableResponse { raw_text: raw }.into());
    };
    output::dim("recovered JSON:");
    output::json_pretty(&value);

    match shape {
        Shape::Questions => {
            let pairs = validate_question_array(&value);
            output::questions(&pairs);
        }
        Shape::Explanation => match validate_explanation_object(&value) {
            Ok(explanation) => output::explanation(&explanation),
            Err(shape) => {
                return Err(GenerationError::InvalidResponseShape {
                    reason: shape.to_string(),
                    raw_text: raw,
                }
                .into())
            }
        },
    }
    Ok(())
}

fn read_input(file: Option<&Path>) -> Result<String> {
    match file {
        Some(path) => std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read {}", path.display())),
        None => {
            let mut buf = String::new();
            std::io::stdin()
                .read_to_string(&mut buf)
                .context("Failed to read stdin")?;
            Ok(buf)
        }
    }
}
