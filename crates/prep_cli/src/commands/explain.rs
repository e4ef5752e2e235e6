//! `prep explain`

use anyhow::Result;
use prep_ai::InterviewGenerator;

use crate::output;

pub async fn handle(generator: &InterviewGenerator, question: &str) -> Result<()> {
    output::kv("model", &generator.config().model);

    let spinner = output::spinner("Explaining...");
    match generator.explain(question).await {
        Ok(explanation) => {
            output::spinner_success(&spinner, "done");
            output::explanation(&explanation);
            Ok(())
        }
        Err(e) => {
            output::spinner_clear(&spinner);
            Err(e.into())
        }
    }
}
