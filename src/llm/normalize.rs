//! Formatting gate and output normalization.
//!
//! Two small rules the pipeline applies around the formatter call:
//!
//! * [`should_skip_formatting`] — a short transcript with no filler words
//!   gains nothing from an LLM round-trip; skip it and save the latency.
//! * [`normalize_output`] — LLMs like to answer in paragraphs; chat inputs
//!   treat Enter as submit.  `single_line` output collapses all whitespace.

use crate::config::{LlmConfig, OutputFormat};

/// Filler fragments whose presence forces the transcript through the
/// formatter even when it is short.
const FILLERS: &[&str] = &["um", "uh", "er ", "ah ", "hmm", "you know", "i mean"];

// ---------------------------------------------------------------------------
// should_skip_formatting
// ---------------------------------------------------------------------------

/// Returns `true` when `raw` should bypass the formatter: the skip-short
/// option is on, the transcript is at or under the character threshold, and
/// it contains no filler words.
pub fn should_skip_formatting(raw: &str, config: &LlmConfig) -> bool {
    if !config.skip_short {
        return false;
    }
    if raw.chars().count() > config.skip_short_max_chars {
        return false;
    }

    let lowered = raw.to_lowercase();
    !FILLERS.iter().any(|f| lowered.contains(f))
}

// ---------------------------------------------------------------------------
// normalize_output
// ---------------------------------------------------------------------------

/// Apply the configured whitespace policy to formatter output.
///
/// * `SingleLine` — every whitespace run (spaces, tabs, newlines) becomes a
///   single space.
/// * `MultiLine` — trimmed but otherwise untouched.
pub fn normalize_output(text: &str, format: OutputFormat) -> String {
    match format {
        OutputFormat::SingleLine => text.split_whitespace().collect::<Vec<_>>().join(" "),
        OutputFormat::MultiLine => text.trim().to_string(),
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
