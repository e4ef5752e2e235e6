//! `prep questions`

use anyhow::Result;
use prep_ai::InterviewGenerator;

use crate::output;

pub async fn handle(
    generator: &InterviewGenerator,
    role: &str,
    experience: f32,
    topics: &str,
    count: u32,
) -> Result<()> {
    output::header(&format!("{role} · {experience} years · {topics}"));
    output::kv("model", &generator.config().model);

    let spinner = output::spinner(&format!("Generating {count} questions..."));
    match generator.questions(role, experience, topics, count).await {
        Ok(pairs) => {
            output::spinner_success(&spinner, &format!("{} questions", pairs.len()));
            if pairs.len() != count as usize {
                output::warning(&format!(
                    "requested {count} questions, model returned {} usable",
                    pairs.len()
                ));
            }
            output::questions(&pairs);
            Ok(())
        }
        Err(e) => {
            output::spinner_clear(&spinner);
            Err(e.into())
        }
    }
}
