//! Pipeline state machine values and the events that drive it.
//!
//! [`PipelineState`] is the single process-wide mutual-exclusion gate: there
//! is exactly one instance, behind [`SharedPipelineState`], and every
//! transition is made while holding its lock.  The listener thread never
//! touches it directly — it sends [`PipelineEvent`]s into the orchestrator's
//! channel, which serialises all transitions on one task.

use std::sync::{Arc, Mutex};

// ---------------------------------------------------------------------------
// PipelineState
// ---------------------------------------------------------------------------

/// States of the push-to-talk pipeline.
///
/// ```text
/// Idle ──press──▶ Recording ──release / max-duration──▶ Processing
///   ▲                                                       │
///   └────────────────── worker complete ────────────────────┘
/// any state ──shutdown──▶ ShuttingDown (terminal)
/// ```
///
/// A press in any state but `Idle` is dropped; that guard is what makes a
/// second concurrent session impossible.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PipelineState {
    /// Waiting for the trigger key.
    Idle,
    /// Capture is armed and accumulating microphone audio.
    Recording,
    /// A session worker is running the post-capture stages.
    Processing,
    /// Shutdown has begun; no new session may start.
    ShuttingDown,
}

impl PipelineState {
    /// Short label for log lines.
    pub fn label(&self) -> &'static str {
        match self {
            PipelineState::Idle => "idle",
            PipelineState::Recording => "recording",
            PipelineState::Processing => "processing",
            PipelineState::ShuttingDown => "shutting down",
        }
    }
}

impl Default for PipelineState {
    fn default() -> Self {
        PipelineState::Idle
    }
}

// ---------------------------------------------------------------------------
// SharedPipelineState
// ---------------------------------------------------------------------------

/// Thread-safe handle to the one [`PipelineState`] instance.
///
/// Cheap to clone.  Lock only for the state check/flip itself — never across
/// an `.await` or any stage work.
pub type SharedPipelineState = Arc<Mutex<PipelineState>>;

/// Construct a fresh gate in the `Idle` state.
pub fn new_shared_state() -> SharedPipelineState {
    Arc::new(Mutex::new(PipelineState::Idle))
}

// ---------------------------------------------------------------------------
// PipelineEvent
// ---------------------------------------------------------------------------

/// Everything that can happen to the orchestrator, serialised through one
/// mpsc channel so ordering is exactly delivery order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PipelineEvent {
    /// The trigger key went down.
    Pressed,
    /// The trigger key came up.
    Released,
    /// The max-duration timer for session `session_id` fired.  Carries the
    /// id so a timer outliving its session is recognised as stale.
    MaxDurationElapsed { session_id: u64 },
    /// Begin the shutdown sequence.
    Shutdown,
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_state_is_idle() {
        assert_eq!(PipelineState::default(), PipelineState::Idle);
    }

    #[test]
    fn labels_are_distinct() {
        let states = [
            PipelineState::Idle,
            PipelineState::Recording,
            PipelineState::Processing,
            PipelineState::ShuttingDown,
        ];
        for (i, a) in states.iter().enumerate() {
            for b in &states[i + 1..] {
                assert_ne!(a.label(), b.label());
            }
        }
    }

    #[test]
    fn shared_state_is_send_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<SharedPipelineState>();
    }

    #[test]
    fn shared_state_clone_observes_mutation() {
        let state = new_shared_state();
        let observer = Arc::clone(&state);

        *state.lock().unwrap() = PipelineState::Recording;
        assert_eq!(*observer.lock().unwrap(), PipelineState::Recording);
    }
}
