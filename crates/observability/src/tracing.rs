//! Span helpers for the generation pipeline

/// Create a span around one generation request
///
/// # Example
///
/// ```rust
/// use prep_observability::generation_span;
///
/// let span = generation_span!("questions", "llama-3.1-8b-instant");
/// let _guard = span.enter();
/// ```
#[macro_export]
macro_rules! generation_span {
    ($kind:expr, $model:expr) => {
        tracing::info_span!(
            "generation",
            generation.kind = $kind,
            llm.model = $model,
            completion.duration_ms = tracing::field::Empty,
            error = tracing::field::Empty,
            error.message = tracing::field::Empty,
        )
    };
}

/// Record an error on the current span and log it
///
/// The span must declare `error` and `error.message` fields for them to be
/// recorded (see [`generation_span!`]).
pub fn record_error<E: std::error::Error>(error: &E) {
    let span = tracing::Span::current();
    span.record("error", true);
    span.record("error.message", error.to_string());
    tracing::error!(error = %error, "Operation failed");
}

/// Record a duration in milliseconds on the current span
///
/// # Example
///
/// ```rust
/// use prep_observability::record_duration;
/// use std::time::Instant;
///
/// let start = Instant::now();
/// record_duration("completion.duration_ms", start.elapsed());
/// ```
pub fn record_duration(key: &str, duration: std::time::Duration) {
    let span = tracing::Span::current();
    span.record(key, duration.as_millis() as u64);
}
