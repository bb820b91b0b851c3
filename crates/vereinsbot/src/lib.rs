pub mod errors;
pub mod intent;
pub mod poll;
pub mod prompt;
pub mod providers;
pub mod retry;

/// Reply substituted whenever the upstream service returns no usable text.
pub const NO_ANSWER_FALLBACK: &str = "Keine Antwort verfügbar.";
