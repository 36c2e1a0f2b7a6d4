//! Transcript post-processing.
//!
//! Whisper occasionally emits looping hallucinations on silence or produces
//! far more text than a short clip could plausibly contain.  Rather than
//! insert garbage into the user's focused window, such transcripts are
//! discarded — the session aborts with an empty transcript and the user just
//! presses the key again.
//!
//! Word replacements let users fix systematic mis-hearings
//! (`"react" → "React"`) without involving the LLM stage.

use std::collections::BTreeMap;

/// Char-per-second rate above which a short clip's transcript is rejected.
const MAX_CHARS_PER_SEC: f32 = 20.0;

/// Clips at or above this length skip the rate check; long recordings can
/// legitimately be dense.
const RATE_CHECK_MAX_SECS: f32 = 3.0;

/// Minimum number of repetitions for the loop detector to fire.
const MIN_REPETITIONS: usize = 3;

// ---------------------------------------------------------------------------
// apply_replacements
// ---------------------------------------------------------------------------

/// Apply configured literal substring replacements, in key order.
pub fn apply_replacements(text: &str, replacements: &BTreeMap<String, String>) -> String {
    let mut out = text.to_string();
    for (from, to) in replacements {
        if !from.is_empty() {
            out = out.replace(from.as_str(), to);
        }
    }
    out
}

// ---------------------------------------------------------------------------
// is_implausible
// ---------------------------------------------------------------------------

/// Returns `true` when `text` looks like a hallucination for a clip of
/// `audio_secs` seconds: a short phrase looped three or more times, or an
/// impossible character rate on a short clip.
pub fn is_implausible(text: &str, audio_secs: f32) -> bool {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return false;
    }

    if is_looped_phrase(trimmed) {
        return true;
    }

    if audio_secs > 0.0 && audio_secs < RATE_CHECK_MAX_SECS {
        let rate = trimmed.chars().count() as f32 / audio_secs;
        if rate > MAX_CHARS_PER_SEC {
            return true;
        }
    }

    false
}

/// Whole-string loop detector: `true` when the text is exactly one phrase
/// repeated [`MIN_REPETITIONS`] or more times ("okay okay okay ").
fn is_looped_phrase(text: &str) -> bool {
    let chars: Vec<char> = text.chars().collect();
    let len = chars.len();

    for period in 1..=len / MIN_REPETITIONS {
        if len % period != 0 {
            continue;
        }
        let repeats = len / period;
        if repeats < MIN_REPETITIONS {
            continue;
        }
        if chars.chunks(period).all(|c| c == &chars[..period]) {
            return true;
        }
    }
    false
}

// ---------------------------------------------------------------------------
// clean_transcript
// ---------------------------------------------------------------------------

/// Full cleanup pass applied to raw engine output: trim, discard implausible
/// transcripts, then apply word replacements.  Returns `""` for discarded
/// transcripts.
pub fn clean_transcript(
    raw: &str,
    audio_secs: f32,
    replacements: &BTreeMap<String, String>,
) -> String {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return String::new();
    }

    if is_implausible(trimmed, audio_secs) {
        log::warn!(
            "discarding implausible transcript ({} chars for {audio_secs:.1}s of audio)",
            trimmed.chars().count()
        );
        return String::new();
    }

    apply_replacements(trimmed, replacements)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    fn no_replacements() -> BTreeMap<String, String> {
        BTreeMap::new()
    }

    // ---- apply_replacements ------------------------------------------------

    #[test]
    fn replacements_apply_in_order() {
        let mut map = BTreeMap::new();
        map.insert("react".to_string(), "React".to_string());
        map.insert("jason".to_string(), "JSON".to_string());

        let out = apply_replacements("parse the jason with react", &map);
        assert_eq!(out, "parse the JSON with React");
    }

    #[test]
    fn empty_replacement_key_is_ignored() {
        let mut map = BTreeMap::new();
        map.insert(String::new(), "x".to_string());
        assert_eq!(apply_replacements("abc", &map), "abc");
    }

    // ---- is_implausible ----------------------------------------------------

    #[test]
    fn normal_text_passes() {
        assert!(!is_implausible("hello there", 2.0));
    }

    #[test]
    fn triple_repetition_is_flagged() {
        assert!(is_implausible("okayokayokay", 3.0));
    }

    #[test]
    fn double_repetition_passes() {
        // Two repeats is normal speech ("yes yes").
        assert!(!is_implausible("yesyes", 1.0));
    }

    #[test]
    fn high_char_rate_on_short_clip_is_flagged() {
        // 50 chars in 2 s = 25 chars/s.
        let text = "a".repeat(49) + "b";
        assert!(is_implausible(&text, 2.0));
    }

    #[test]
    fn rate_check_skipped_for_long_clips() {
        let text = "w".repeat(200) + "x";
        assert!(!is_implausible(&text, 5.0));
    }

    #[test]
    fn modest_rate_passes() {
        // 12 chars in 2 s = 6 chars/s.
        assert!(!is_implausible("good morning", 2.0));
    }

    // ---- clean_transcript --------------------------------------------------

    #[test]
    fn clean_trims_and_replaces() {
        let mut map = BTreeMap::new();
        map.insert("kubernetes".to_string(), "Kubernetes".to_string());
        let out = clean_transcript("  deploy to kubernetes \n", 4.0, &map);
        assert_eq!(out, "deploy to Kubernetes");
    }

    #[test]
    fn clean_discards_looped_output() {
        assert_eq!(
            clean_transcript("thank you.thank you.thank you.", 1.5, &no_replacements()),
            ""
        );
    }

    #[test]
    fn clean_empty_is_empty() {
        assert_eq!(clean_transcript("   ", 1.0, &no_replacements()), "");
    }
}
