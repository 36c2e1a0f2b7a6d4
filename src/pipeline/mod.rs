//! Pipeline orchestrator — the state machine driving press → record →
//! transcribe → format → insert.
//!
//! # Architecture
//!
//! ```text
//! hotkey thread ──Pressed/Released──┐
//! timer task ──MaxDurationElapsed──►│ PipelineEvent (mpsc)
//! ctrl-c task ──Shutdown────────────┘
//!        │
//!        ▼
//! PipelineOrchestrator::run()   ← async tokio task, never blocks on stages
//!        │
//!        ├─ Pressed   (Idle only)      → start capture, engage media,
//!        │                               arm max-duration timer → Recording
//!        └─ Released / MaxDuration     → Processing, spawn session worker:
//!              stop capture → transcribe → [format] → insert
//!              └─ always: release media, log outcome, Processing → Idle
//! ```
//!
//! Exactly one session is ever in flight: a press while the state is not
//! `Idle` is dropped, which is the whole re-entrancy story.  Blocking stage
//! work runs under `spawn_blocking` with per-stage timeouts; the event loop
//! itself only flips state and spawns.
//!
//! Shutdown from any state waits for the in-flight worker (bounded by
//! `shutdown_timeout_secs`) so a session in progress drains instead of dying
//! mid-paste.

pub mod runner;
pub mod session;
pub mod state;

// ---------------------------------------------------------------------------
// Public re-exports
// ---------------------------------------------------------------------------

pub use runner::{PipelineError, PipelineOrchestrator};
pub use session::{AbortReason, Session, SessionOutcome};
pub use state::{new_shared_state, PipelineEvent, PipelineState, SharedPipelineState};
