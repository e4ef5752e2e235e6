//! Shape validation of recovered model output.
//!
//! Models drift on key names, so each field is read from an ordered list of
//! candidate keys. The first candidate holding a string wins; later keys are
//! only consulted when earlier ones are absent or not strings.

use serde_json::{Map, Value};

use crate::error::ShapeError;
use crate::types::{Explanation, QaPair};

const QUESTION_KEYS: &[&str] = &["question", "questionText"];
const ANSWER_KEYS: &[&str] = &["answer", "answerText"];
const TITLE_KEYS: &[&str] = &["title"];
const EXPLANATION_KEYS: &[&str] = &["explanation"];

/// Field that may wrap the question array when the model is forced into object mode.
const QUESTIONS_WRAPPER_KEY: &str = "questions";

/// String held by the first of `keys` whose value is a string.
fn first_string<'a>(object: &'a Map<String, Value>, keys: &[&str]) -> Option<&'a str> {
    keys.iter()
        .find_map(|key| object.get(*key).and_then(Value::as_str))
}

/// `first_string`, rejecting blank text. A blank `question` does not fall
/// back to `questionText`.
fn first_text<'a>(object: &'a Map<String, Value>, keys: &[&str]) -> Option<&'a str> {
    first_string(object, keys).filter(|text| !text.trim().is_empty())
}

/// Locate the question array: the value itself, or the array held by an
/// object wrapper (`{"questions": [...]}` or an object with exactly one array field).
fn question_items(value: &Value) -> Option<&Vec<Value>> {
    match value {
        Value::Array(items) => Some(items),
        Value::Object(object) => {
            if let Some(Value::Array(items)) = object.get(QUESTIONS_WRAPPER_KEY) {
                return Some(items);
            }
            let mut arrays = object.values().filter_map(Value::as_array);
            match (arrays.next(), arrays.next()) {
                (Some(items), None) => Some(items),
                _ => None,
            }
        }
        _ => None,
    }
}

/// Extract the well-formed question/answer pairs from `value`, in order.
///
/// Entries without usable question and answer text are dropped. A value that
/// holds no question array yields an empty list.
pub fn validate_question_array(value: &Value) -> Vec<QaPair> {
    let Some(items) = question_items(value) else {
        tracing::warn!("model output holds no question array");
        return Vec::new();
    };

    let pairs: Vec<QaPair> = items
        .iter()
        .filter_map(Value::as_object)
        .filter_map(|entry| {
            let question = first_text(entry, QUESTION_KEYS)?;
            let answer = first_text(entry, ANSWER_KEYS)?;
            Some(QaPair {
                question: question.to_string(),
                answer: answer.to_string(),
            })
        })
        .collect();

    if pairs.len() < items.len() {
        tracing::warn!(
            received = items.len(),
            kept = pairs.len(),
            "dropped malformed question entries"
        );
    }
    pairs
}

/// Read a `{title, explanation}` object. Both fields must be strings; empty
/// strings are passed through.
pub fn validate_explanation_object(value: &Value) -> Result<Explanation, ShapeError> {
    let object = value.as_object().ok_or(ShapeError::NotAnObject)?;
    let title = first_string(object, TITLE_KEYS).ok_or(ShapeError::MissingField("title"))?;
    let explanation =
        first_string(object, EXPLANATION_KEYS).ok_or(ShapeError::MissingField("explanation"))?;

    Ok(Explanation {
        title: title.to_string(),
        explanation: explanation.to_string(),
    })
}
