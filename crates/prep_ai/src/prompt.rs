//! Prompt builder for question generation and concept explanations.

/// System message sent with every completion.
pub const SYSTEM_INSTRUCTION: &str = "You are a technical educator. You must always respond with a single, valid JSON object. Do not include any text outside the JSON.";

const QUESTION_FORMAT: &str = r#"Format the output as a valid JSON array only, following this structure:

[
  {
    "question": "Question text here?",
    "answer": "Answer text here. If code is included, use \n for new lines."
  }
]

Strict Rules:
1. Return ONLY valid JSON.
2. No extra text before or after the JSON.
3. No markdown formatting, no triple backticks around the JSON.
4. Use double quotes only.
5. No trailing commas.
6. Escape every line break inside a string value as \n; never put a literal newline inside a string.
7. Code examples must be plain text inside the answer, using \n for line breaks.
8. Do not include any numbering or bullet points inside the JSON array.

Output Example:
[
  {
    "question": "What is React?",
    "answer": "React is a JavaScript library for building user interfaces.\nIt allows creating reusable components and managing state efficiently."
  }
]"#;

const EXPLANATION_FORMAT: &str = r#"Return a single JSON object with exactly these keys:
1. "title": A short string.
2. "explanation": A long string containing markdown.

Rules for the "explanation" field:
- Use markdown for headings (###) and lists.
- For code blocks, use triple backticks and the language name inside the string.
- IMPORTANT: You must escape all newlines as \n.
- IMPORTANT: You must escape all double quotes inside the text as \" to avoid breaking the JSON string.
- Do not wrap the JSON in markdown code fences.
- Do not add any text before or after the JSON.

Example Structure:
{
  "title": "Example Title",
  "explanation": "Line one.\n\n### Heading\n\n```jsx\nconst x = \"hello\";\n```"
}"#;

/// Prompt asking for exactly `question_count` question/answer pairs.
pub fn build_question_prompt(
    role: &str,
    experience_years: f32,
    topics: &str,
    question_count: u32,
) -> String {
    let mut parts = Vec::new();
    parts.push("You are an AI trained to generate technical interview questions and answers.\n".to_string());
    parts.push("Task:".to_string());
    parts.push(format!("- Role: {}", role.trim()));
    parts.push(format!("- Candidate Experience: {} years", experience_years));
    parts.push(format!("- Focus Topics: {}", topics.trim()));
    parts.push(format!(
        "- Generate exactly {} interview questions.",
        question_count
    ));
    parts.push("- For each question, provide a detailed, beginner-friendly answer.".to_string());
    parts.push(
        "- If the answer requires a code example, include it as plain text inside the answer.\n"
            .to_string(),
    );
    parts.push(QUESTION_FORMAT.to_string());
    parts.join("\n")
}

/// Prompt asking for a `{title, explanation}` object explaining `question`.
pub fn build_explanation_prompt(question: &str) -> String {
    format!(
        "Task: Explain \"{}\" for a beginner developer.\n\n{}",
        question.trim(),
        EXPLANATION_FORMAT
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_question_prompt_interpolates_parameters() {
        let prompt = build_question_prompt("Frontend Developer", 2.0, "React, CSS", 7);
        assert!(prompt.contains("- Role: Frontend Developer"));
        assert!(prompt.contains("- Candidate Experience: 2 years"));
        assert!(prompt.contains("- Focus Topics: React, CSS"));
        assert!(prompt.contains("Generate exactly 7 interview questions."));
    }

    #[test]
    fn test_question_prompt_states_json_contract() {
        let prompt = build_question_prompt("SRE", 5.5, "Linux", 3);
        assert!(prompt.contains("5.5 years"));
        assert!(prompt.contains("\"question\""));
        assert!(prompt.contains("\"answer\""));
        assert!(prompt.contains("No markdown formatting, no triple backticks"));
        assert!(prompt.contains("No extra text before or after the JSON."));
        assert!(prompt.contains(r"\n"));
    }

    #[test]
    fn test_explanation_prompt() {
        let prompt = build_explanation_prompt("  What is a closure?  ");
        assert!(prompt.starts_with("Task: Explain \"What is a closure?\" for a beginner developer."));
        assert!(prompt.contains("\"title\""));
        assert!(prompt.contains("\"explanation\""));
        assert!(prompt.contains(r#"escape all double quotes inside the text as \""#));
        assert!(prompt.contains("Do not wrap the JSON in markdown code fences."));
    }

    #[test]
    fn test_prompts_are_deterministic() {
        assert_eq!(
            build_question_prompt("a", 1.0, "b", 2),
            build_question_prompt("a", 1.0, "b", 2)
        );
        assert_eq!(build_explanation_prompt("q"), build_explanation_prompt("q"));
    }
}
