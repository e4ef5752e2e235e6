//! Recovery parser: turn model output into a JSON value despite contract violations.
//!
//! Stages, stopping at the first success:
//! 1. strip a surrounding ```` ```json ```` fence
//! 2. strict parse of the cleaned text
//! 3. cut the raw text down to its outermost `{ … }` (or `[{ … }]`) span
//! 4. re-escape the content of known text fields inside that span
//! 5. strict parse of the repaired span
//!
//! Repair only rewrites characters between the opening and closing quote of a
//! recognised field value. Keys, braces, colons and commas are copied verbatim.

use lazy_static::lazy_static;
use regex::Regex;
use serde_json::Value;

lazy_static! {
    // Opening of a text field value: `"answer": "`
    static ref TEXT_FIELD: Regex = Regex::new(
        r#""(?:explanation|title|question|questionText|answer|answerText)"\s*:\s*""#
    )
    .unwrap();

    // What may follow the closing quote of a field value
    static ref VALUE_END: Regex = Regex::new(
        r#"^\s*(?:[}\]]|,\s*(?:"[A-Za-z_][A-Za-z0-9_]*"\s*:|\{))"#
    )
    .unwrap();
}

/// Dead ends tolerated while searching for the closing quotes of one response.
const MAX_REPAIR_ATTEMPTS: usize = 256;

/// Parse model output into a JSON object or array.
///
/// Returns `None` when nothing could be recovered; never panics on malformed
/// input. Scalars (`42`, `"text"`) are not considered a usable value.
pub fn parse_response(raw: &str) -> Option<Value> {
    let cleaned = strip_fences(raw);
    if let Some(value) = parse_structured(cleaned) {
        return Some(value);
    }

    let span = extract_json_span(raw)?;
    let value = repair_text_fields(span);
    if value.is_some() {
        tracing::debug!(raw.len = raw.len(), "recovered model output after repair");
    }
    value
}

fn parse_structured(text: &str) -> Option<Value> {
    serde_json::from_str::<Value>(text)
        .ok()
        .filter(|v| v.is_object() || v.is_array())
}

/// Trim whitespace and drop a leading ```` ```json ```` (or bare ```` ``` ````)
/// fence and a trailing ```` ``` ````.
fn strip_fences(raw: &str) -> &str {
    let mut text = raw.trim();
    if let Some(rest) = text.strip_prefix("```") {
        let rest = match rest.get(..4) {
            Some(tag) if tag.eq_ignore_ascii_case("json") => &rest[4..],
            _ => rest,
        };
        text = rest.trim_start();
    }
    if let Some(rest) = text.strip_suffix("```") {
        text = rest.trim_end();
    }
    text
}

/// Slice from the first `{` to the last `}` of `raw`, widened to an enclosing
/// `[` … `]` when only whitespace separates them.
fn extract_json_span(raw: &str) -> Option<&str> {
    let start = raw.find('{')?;
    let end = raw.rfind('}')?;
    if end < start {
        return None;
    }

    let before = raw[..start].trim_end();
    let after = raw[end + 1..].trim_start();
    if before.ends_with('[') && after.starts_with(']') {
        let open = before.len() - 1;
        let close = raw.len() - after.len();
        return Some(&raw[open..=close]);
    }
    Some(&raw[start..=end])
}

/// Re-escape the content of every recognised text field in `span` and parse
/// the result.
///
/// A field value may contain text that looks like its own closing quote (a
/// code sample such as `{ name: "Ann" }`), so every plausible closing quote is
/// a candidate. Candidates are tried in order, depth first, and a choice is
/// abandoned as soon as the repaired prefix stops being valid JSON.
fn repair_text_fields(span: &str) -> Option<Value> {
    let mut out = String::with_capacity(span.len() + 16);
    let mut attempts = 0;
    repair_from(span, 0, &mut out, &mut attempts)
}

fn repair_from(span: &str, cursor: usize, out: &mut String, attempts: &mut usize) -> Option<Value> {
    if *attempts >= MAX_REPAIR_ATTEMPTS {
        return None;
    }
    let mark = out.len();

    let Some(field) = TEXT_FIELD.find_at(span, cursor) else {
        out.push_str(&span[cursor..]);
        let value = parse_structured(out);
        out.truncate(mark);
        if value.is_none() {
            *attempts += 1;
        }
        return value;
    };

    let value_start = field.end();
    out.push_str(&span[cursor..value_start]);
    if !is_viable_prefix(out) {
        out.truncate(mark);
        *attempts += 1;
        return None;
    }

    let ends = value_end_candidates(span, value_start);
    if ends.is_empty() {
        out.push_str(&span[value_start..]);
        let value = parse_structured(out);
        out.truncate(mark);
        if value.is_none() {
            *attempts += 1;
        }
        return value;
    }

    let content_mark = out.len();
    let mut recovered = None;
    for end in ends {
        out.truncate(content_mark);
        out.push_str(&escape_string_content(&span[value_start..end]));
        // The closing quote is copied with the next chunk
        recovered = repair_from(span, end, out, attempts);
        if recovered.is_some() || *attempts >= MAX_REPAIR_ATTEMPTS {
            break;
        }
    }
    out.truncate(mark);
    recovered
}

/// Whether `prefix` can still be extended into a valid JSON document.
fn is_viable_prefix(prefix: &str) -> bool {
    serde_json::from_str::<Value>(prefix)
        .err()
        .is_some_and(|e| e.is_eof())
}

/// Indices of the quotes that may close the value starting at `start`: each
/// unescaped `"` followed by a structural continuation (`}`, `]`, `, "key":`
/// or `, {`).
fn value_end_candidates(span: &str, start: usize) -> Vec<usize> {
    let mut ends = Vec::new();
    let mut escaped = false;
    for (offset, byte) in span.as_bytes()[start..].iter().enumerate() {
        match byte {
            b'\\' => escaped = !escaped,
            b'"' if !escaped => {
                let i = start + offset;
                if VALUE_END.is_match(&span[i + 1..]) {
                    ends.push(i);
                }
            }
            _ => escaped = false,
        }
    }
    ends
}

/// Escape raw string content so it is valid inside a JSON string literal.
///
/// Valid escape sequences already present are kept as-is, so content that was
/// correctly escaped passes through unchanged.
fn escape_string_content(content: &str) -> String {
    let mut out = String::with_capacity(content.len() + 8);
    let mut chars = content.char_indices().peekable();

    while let Some((i, c)) = chars.next() {
        match c {
            '\\' => {
                let rest = &content[i + 1..];
                if is_valid_escape(rest) {
                    out.push('\\');
                    if let Some((_, next)) = chars.next() {
                        out.push(next);
                    }
                } else {
                    out.push_str("\\\\");
                }
            }
            '"' => out.push_str("\\\""),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            c if (c as u32) < 0x20 => out.push_str(&format!("\\u{:04x}", c as u32)),
            c => out.push(c),
        }
    }
    out
}

/// Whether the text following a backslash forms a JSON escape sequence.
fn is_valid_escape(rest: &str) -> bool {
    let mut chars = rest.chars();
    match chars.next() {
        Some('"' | '\\' | '/' | 'b' | 'f' | 'n' | 'r' | 't') => true,
        Some('u') => {
            let hex: Vec<char> = chars.take(4).collect();
            hex.len() == 4 && hex.iter().all(|c| c.is_ascii_hexdigit())
        }
        _ => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_compliant_array() {
        let raw = r#"[{"question":"Q1","answer":"A1"},{"question":"Q2","answer":"A2"}]"#;
        assert_eq!(
            parse_response(raw),
            Some(json!([
                {"question": "Q1", "answer": "A1"},
                {"question": "Q2", "answer": "A2"}
            ]))
        );
    }

    #[test]
    fn test_fence_is_transparent() {
        let inner = r#"{"title":"Closures","explanation":"A function with its scope."}"#;
        let fenced = format!("```json\n{inner}\n```");
        let upper = format!("  ```JSON {inner}```  ");
        let bare = format!("```\n{inner}\n```");
        let expected = parse_response(inner);
        assert!(expected.is_some());
        assert_eq!(parse_response(&fenced), expected);
        assert_eq!(parse_response(&upper), expected);
        assert_eq!(parse_response(&bare), expected);
    }

    #[test]
    fn test_prose_around_object() {
        let raw = "Sure! Here is your JSON:\n{\"title\":\"T\",\"explanation\":\"E\"}\nHope it helps.";
        assert_eq!(
            parse_response(raw),
            Some(json!({"title": "T", "explanation": "E"}))
        );
    }

    #[test]
    fn test_repairs_unescaped_newlines_and_quotes_in_explanation() {
        let raw = "{\"title\":\"Closures\",\"explanation\":\"Line one.\nLine \"two\"\"}";
        let value = parse_response(raw).expect("repairable");
        assert_eq!(value["title"], "Closures");
        assert_eq!(value["explanation"], "Line one.\nLine \"two\"");
    }

    #[test]
    fn test_repair_preserves_markdown_code_block() {
        let explanation = "### Closures\n\n```js\nconst greet = (name) => \"hi \" + name;\n```\r\nDone.";
        let raw = format!(
            "```json\n{{\n  \"title\": \"Closures\",\n  \"explanation\": \"{explanation}\"\n}}\n```"
        );
        let value = parse_response(&raw).expect("repairable");
        assert_eq!(value["explanation"], explanation);
    }

    #[test]
    fn test_repair_code_block_with_object_literal() {
        let explanation = "### Objects\n```js\nconst user = { name: \"Ann\" };\n```\nDone.";
        let raw = format!("{{\"title\":\"Objects\",\"explanation\":\"{explanation}\"}}");
        let value = parse_response(&raw).expect("repairable");
        assert_eq!(value["title"], "Objects");
        assert_eq!(value["explanation"], explanation);
    }

    #[test]
    fn test_repair_code_block_with_json_literal() {
        let explanation = "Payload:\n```json\n{\"name\": \"Ann\", \"age\": 3}\n```\nDone.";
        let raw = format!("{{\"title\":\"JSON\",\"explanation\":\"{explanation}\"}}");
        let value = parse_response(&raw).expect("repairable");
        assert_eq!(value["explanation"], explanation);
    }

    #[test]
    fn test_repair_answer_with_braces_before_next_entry() {
        let raw = "[{\"question\":\"Q1\",\"answer\":\"Use {\"a\": \"b\"} here\"},{\"question\":\"Q2\",\"answer\":\"A2\"}]";
        let value = parse_response(raw).expect("repairable");
        assert_eq!(
            value,
            json!([
                {"question": "Q1", "answer": "Use {\"a\": \"b\"} here"},
                {"question": "Q2", "answer": "A2"}
            ])
        );
    }

    #[test]
    fn test_repair_many_entries() {
        let entries: Vec<String> = (1..=30)
            .map(|i| format!("{{\"question\":\"Why \"{i}\"?\",\"answer\":\"Line\n{i}\"}}"))
            .collect();
        let raw = format!("[{}]", entries.join(","));
        let value = parse_response(&raw).expect("repairable");
        assert_eq!(value.as_array().map(Vec::len), Some(30));
        assert_eq!(value[29]["question"], "Why \"30\"?");
        assert_eq!(value[29]["answer"], "Line\n30");
    }

    #[test]
    fn test_repair_keeps_existing_escapes() {
        let raw = "{\"title\":\"T\",\"explanation\":\"already \\\"quoted\\\" and\nraw \"quoted\" text\"}";
        let value = parse_response(raw).expect("repairable");
        assert_eq!(value["explanation"], "already \"quoted\" and\nraw \"quoted\" text");
    }

    #[test]
    fn test_repair_doubles_invalid_backslash() {
        let raw = "{\"title\":\"Regex\",\"explanation\":\"Use \\d+ to match\ndigits\"}";
        let value = parse_response(raw).expect("repairable");
        assert_eq!(value["explanation"], "Use \\d+ to match\ndigits");
    }

    #[test]
    fn test_repairs_question_array() {
        let raw = "[\n  {\"question\": \"What does \"this\" mean?\", \"answer\": \"It depends\non the call site.\"},\n  {\"question\": \"Q2\", \"answer\": \"A2\"}\n]";
        let value = parse_response(raw).expect("repairable");
        assert_eq!(
            value,
            json!([
                {"question": "What does \"this\" mean?", "answer": "It depends\non the call site."},
                {"question": "Q2", "answer": "A2"}
            ])
        );
    }

    #[test]
    fn test_repair_leaves_other_fields_untouched() {
        let raw = "{\"title\":\"T\",\"difficulty\":3,\"explanation\":\"a\nb\"}";
        let value = parse_response(raw).expect("repairable");
        assert_eq!(value["difficulty"], 3);
        assert_eq!(value["explanation"], "a\nb");
    }

    #[test]
    fn test_no_brace_is_unrecoverable() {
        assert_eq!(parse_response("I cannot help with that."), None);
        assert_eq!(parse_response("[1, 2"), None);
    }

    #[test]
    fn test_empty_input_is_unrecoverable() {
        assert_eq!(parse_response(""), None);
        assert_eq!(parse_response("   \n"), None);
    }

    #[test]
    fn test_scalar_is_not_a_value() {
        assert_eq!(parse_response("42"), None);
        assert_eq!(parse_response("\"just text\""), None);
    }

    #[test]
    fn test_closing_brace_before_opening() {
        assert_eq!(parse_response("} nothing here {"), None);
    }

    #[test]
    fn test_truncated_output_is_unrecoverable() {
        let raw = "{\"title\":\"Closures\",\"explanation\":\"A closure is a function that";
        assert_eq!(parse_response(raw), None);
    }

    #[test]
    fn test_parse_is_idempotent() {
        let raw = "{\"title\":\"Closures\",\"explanation\":\"Line one.\nLine \"two\"\"}";
        assert_eq!(parse_response(raw), parse_response(raw));
    }

    #[test]
    fn test_strip_fences() {
        assert_eq!(strip_fences("```json\n{}\n```"), "{}");
        assert_eq!(strip_fences("```Json{}"), "{}");
        assert_eq!(strip_fences("  {} "), "{}");
        assert_eq!(strip_fences("```"), "");
    }

    #[test]
    fn test_extract_json_span() {
        assert_eq!(extract_json_span("x {\"a\":1} y"), Some("{\"a\":1}"));
        assert_eq!(extract_json_span("x [ {\"a\":1} ] y"), Some("[ {\"a\":1} ]"));
        assert_eq!(extract_json_span("no braces"), None);
        assert_eq!(extract_json_span("only { open"), None);
    }

    #[test]
    fn test_escape_string_content() {
        assert_eq!(escape_string_content("a\nb"), "a\\nb");
        assert_eq!(escape_string_content("say \"hi\""), "say \\\"hi\\\"");
        assert_eq!(escape_string_content("ok \\\" kept"), "ok \\\" kept");
        assert_eq!(escape_string_content("tab\there"), "tab\\there");
        assert_eq!(escape_string_content("\\u00e9"), "\\u00e9");
        assert_eq!(escape_string_content("\\uZZ"), "\\\\uZZ");
        assert_eq!(escape_string_content("trailing \\"), "trailing \\\\");
    }
}
