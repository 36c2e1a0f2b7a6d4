//! One recording-to-insertion attempt.
//!
//! A [`Session`] is created when a press is accepted, threaded through every
//! stage, and finalised with exactly one [`SessionOutcome`] before it is
//! logged and dropped.  Session ids come from a monotonically increasing
//! counter so log lines from interleaved timers can always be attributed.

use std::time::Instant;

use crate::pipeline::runner::PipelineError;

// ---------------------------------------------------------------------------
// AbortReason
// ---------------------------------------------------------------------------

/// Why a session ended early without being an error.
#[derive(Debug)]
pub enum AbortReason {
    /// The captured audio was shorter than the configured minimum.
    TooShort { secs: f32 },
    /// The engine produced no usable text (silence, or cleanup discarded a
    /// hallucination).
    EmptyTranscript,
}

impl std::fmt::Display for AbortReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AbortReason::TooShort { secs } => {
                write!(f, "recording too short ({secs:.2}s)")
            }
            AbortReason::EmptyTranscript => write!(f, "empty transcript"),
        }
    }
}

// ---------------------------------------------------------------------------
// SessionOutcome
// ---------------------------------------------------------------------------

/// Terminal result of one session.
#[derive(Debug)]
pub enum SessionOutcome {
    /// The final text reached the focused application.
    Inserted,
    /// The session ended early, by design rather than by failure.
    Aborted(AbortReason),
    /// A stage failed; the session is over but the process keeps running.
    Failed(PipelineError),
}

// ---------------------------------------------------------------------------
// Session
// ---------------------------------------------------------------------------

/// State carried through one press-to-insertion attempt.
#[derive(Debug)]
pub struct Session {
    /// Process-unique id, for log attribution and stale-timer detection.
    pub id: u64,
    /// When the press was accepted.
    pub started_at: Instant,
    /// Whether `MediaCoordinator::engage()` reported an actual pause.
    pub media_engaged: bool,
    /// Transcript as returned by the STT engine.
    pub raw_transcript: Option<String>,
    /// Transcript after LLM formatting and normalization, when that ran.
    pub formatted_transcript: Option<String>,
    /// Terminal outcome, set exactly once by the session worker.
    pub outcome: Option<SessionOutcome>,
}

impl Session {
    /// Start a new session record.
    pub fn begin(id: u64) -> Self {
        Self {
            id,
            started_at: Instant::now(),
            media_engaged: false,
            raw_transcript: None,
            formatted_transcript: None,
            outcome: None,
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn begin_starts_blank() {
        let session = Session::begin(7);
        assert_eq!(session.id, 7);
        assert!(!session.media_engaged);
        assert!(session.raw_transcript.is_none());
        assert!(session.formatted_transcript.is_none());
        assert!(session.outcome.is_none());
    }

    #[test]
    fn abort_reasons_render() {
        let short = AbortReason::TooShort { secs: 0.12 };
        assert!(short.to_string().contains("0.12"));
        assert_eq!(AbortReason::EmptyTranscript.to_string(), "empty transcript");
    }
}
