//! Terminal output helpers. Styled text for humans, structured JSON for machines.
//!
//! Uses:
//! - `console` for colors (respects NO_COLOR, auto-disables when piped)
//! - `comfy-table` for question listings
//! - `indicatif` for the spinner shown while the model is working

use std::sync::atomic::{AtomicBool, Ordering};

use comfy_table::{presets::UTF8_FULL, Attribute, Cell, Color, ContentArrangement, Table};
use console::style;
use indicatif::{ProgressBar, ProgressStyle};
use prep_ai::{Explanation, GenerationError, QaPair};
use serde::Serialize;
use serde_json::Value as JsonValue;

use crate::cli::OutputFormat;

// ── Global format flag ─────────────────────────────────────────────

static JSON_MODE: AtomicBool = AtomicBool::new(false);

pub fn init(format: OutputFormat) {
    if matches!(format, OutputFormat::Json) {
        JSON_MODE.store(true, Ordering::Relaxed);
    }
}

fn is_json() -> bool {
    JSON_MODE.load(Ordering::Relaxed)
}

// ── JSON envelope ──────────────────────────────────────────────────

#[derive(Serialize)]
struct Msg<'a> {
    level: &'a str,
    message: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    data: Option<&'a JsonValue>,
}

fn envelope(level: &str, message: &str, data: Option<&JsonValue>) -> String {
    let msg = Msg {
        level,
        message,
        data,
    };
    serde_json::to_string(&msg)
        .unwrap_or_else(|_| format!("{{\"level\":\"{level}\",\"message\":\"{message}\"}}"))
}

fn emit_json(level: &str, message: &str, data: Option<&JsonValue>) {
    println!("{}", envelope(level, message, data));
}

// ── Messages ───────────────────────────────────────────────────────

pub fn header(text: &str) {
    if is_json() {
        emit_json("info", text, None);
    } else {
        println!("{}", style(text).bold().cyan());
    }
}

pub fn error(text: &str) {
    if is_json() {
        eprintln!("{}", envelope("error", text, None));
    } else {
        eprintln!("{} {}", style("✗").red(), style(text).bright());
    }
}

pub fn warning(text: &str) {
    if is_json() {
        emit_json("warning", text, None);
    } else {
        eprintln!("{} {}", style("!").yellow(), style(text).bright());
    }
}

pub fn dim(text: &str) {
    if !is_json() {
        println!("{}", style(text).dim());
    }
}

/// Print a key-value pair with styled key.
pub fn kv(key: &str, value: &str) {
    if is_json() {
        let data = serde_json::json!({ key: value });
        emit_json("info", key, Some(&data));
    } else {
        println!("  {} {}", style(key).cyan().bold(), value);
    }
}

/// Report a failed generation with its stage and, when available, the raw model text.
///
/// JSON mode always carries the raw text; text mode prints it only with `--verbose`.
pub fn generation_error(err: &GenerationError, verbose: bool) {
    if is_json() {
        let data = serde_json::json!({
            "stage": err.stage(),
            "retryable": err.is_retryable(),
            "rawText": err.raw_text(),
        });
        eprintln!("{}", envelope("error", &err.to_string(), Some(&data)));
        return;
    }

    eprintln!("{} {}", style("✗").red(), style(err.to_string()).bright());
    eprintln!(
        "  {} {}{}",
        style("stage").cyan().bold(),
        err.stage(),
        if err.is_retryable() {
            style(" (retryable)").dim().to_string()
        } else {
            String::new()
        }
    );
    match err.raw_text() {
        Some(raw) if verbose => {
            eprintln!("{}", style("── raw model output ──").dim());
            eprintln!("{raw}");
        }
        Some(_) => eprintln!("{}", style("  rerun with --verbose to see the raw model output").dim()),
        None => {}
    }
}

// ── Results ────────────────────────────────────────────────────────

/// Print generated question/answer pairs (JSON mode emits the array).
pub fn questions(pairs: &[QaPair]) {
    if is_json() {
        let data = serde_json::to_value(pairs).unwrap_or(JsonValue::Null);
        emit_json("data", "questions", Some(&data));
        return;
    }

    let mut table = table();
    table.set_header(vec![
        Cell::new("#").fg(Color::Cyan).add_attribute(Attribute::Bold),
        Cell::new("Question")
            .fg(Color::Cyan)
            .add_attribute(Attribute::Bold),
        Cell::new("Answer").fg(Color::Cyan).add_attribute(Attribute::Bold),
    ]);
    for (i, pair) in pairs.iter().enumerate() {
        table.add_row(vec![
            Cell::new(i + 1),
            Cell::new(&pair.question).fg(Color::Green),
            Cell::new(&pair.answer),
        ]);
    }
    println!("{table}");
}

/// Print an explanation: bold title, then the markdown body as-is.
pub fn explanation(explanation: &Explanation) {
    if is_json() {
        let data = serde_json::to_value(explanation).unwrap_or(JsonValue::Null);
        emit_json("data", "explanation", Some(&data));
    } else {
        println!("{}", style(&explanation.title).bold().green());
        println!();
        println!("{}", explanation.explanation);
    }
}

/// Print a recovered JSON value.
pub fn json_pretty(value: &JsonValue) {
    if is_json() {
        emit_json("data", "", Some(value));
    } else {
        let formatted = serde_json::to_string_pretty(value).unwrap_or_else(|_| value.to_string());
        println!("{formatted}");
    }
}

fn table() -> Table {
    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic);
    table
}

// ── Spinners ───────────────────────────────────────────────────────

/// Create a spinner for the completion call. Hidden in JSON mode.
pub fn spinner(message: &str) -> ProgressBar {
    if is_json() {
        return ProgressBar::hidden();
    }
    let spinner = ProgressBar::new_spinner();
    if let Ok(template) = ProgressStyle::default_spinner().template("{spinner:.cyan} {msg}") {
        spinner.set_style(template);
    }
    spinner.set_message(message.to_string());
    spinner.enable_steady_tick(std::time::Duration::from_millis(80));
    spinner
}

/// Finish spinner with success message.
pub fn spinner_success(spinner: &ProgressBar, message: &str) {
    spinner.finish_and_clear();
    if !is_json() {
        println!("{} {}", style("✓").green(), message);
    }
}

/// Clear the spinner after a failure; the error itself is reported by the caller.
pub fn spinner_clear(spinner: &ProgressBar) {
    spinner.finish_and_clear();
}
