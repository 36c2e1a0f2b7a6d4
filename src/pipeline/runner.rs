//! The pipeline orchestrator: event loop, session worker, shutdown.
//!
//! [`PipelineOrchestrator::run`] consumes [`PipelineEvent`]s from a single
//! mpsc channel.  Press/release handling is state-check-and-dispatch only;
//! every blocking stage (capture stop, whisper inference, clipboard paste)
//! runs on the session worker task under `spawn_blocking`, bounded by the
//! per-stage timeouts from config.  The hotkey thread is therefore never
//! blocked by pipeline work and a lost release event is covered by the
//! max-duration timer.
//!
//! Error containment follows one rule: nothing that happens inside a session
//! escapes the session.  Stage failures become the session's outcome, the
//! media coordinator is released on every path, and the state returns to
//! `Idle` so the next press starts clean.

use std::sync::Arc;
use std::time::Duration;

use thiserror::Error;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;

use crate::audio::CaptureSource;
use crate::config::AppConfig;
use crate::insert::TextInserter;
use crate::llm::{normalize_output, should_skip_formatting, TextFormatter};
use crate::media::MediaCoordinator;
use crate::stt::SttEngine;

use super::session::{AbortReason, Session, SessionOutcome};
use super::state::{new_shared_state, PipelineEvent, PipelineState, SharedPipelineState};

// ---------------------------------------------------------------------------
// PipelineError
// ---------------------------------------------------------------------------

/// Errors surfaced by pipeline stages and shutdown.
///
/// Formatting has no variant here: formatter failures are recovered locally
/// by falling back to the raw transcript and never become a session outcome.
#[derive(Debug, Error)]
pub enum PipelineError {
    /// Starting or stopping the capture source failed.
    #[error("capture failed: {0}")]
    Capture(String),

    /// The STT engine failed or exceeded its timeout.
    #[error("transcription failed: {0}")]
    Transcription(String),

    /// Delivering the final text failed.
    #[error("insertion failed: {0}")]
    Insertion(String),

    /// The in-flight worker did not finish within the shutdown timeout.
    #[error("shutdown timed out after {0:?} with a session still in flight")]
    ShutdownTimeout(Duration),
}

// ---------------------------------------------------------------------------
// PipelineOrchestrator
// ---------------------------------------------------------------------------

/// Owns the state machine and wires the collaborators together.
///
/// Create with [`PipelineOrchestrator::new`], then `run` it inside the tokio
/// runtime.  All collaborators are trait objects so tests drive the full
/// state machine with mocks.
pub struct PipelineOrchestrator {
    state: SharedPipelineState,
    recorder: Arc<dyn CaptureSource>,
    stt: Arc<dyn SttEngine>,
    formatter: Arc<dyn TextFormatter>,
    inserter: Arc<dyn TextInserter>,
    media: Arc<dyn MediaCoordinator>,
    config: AppConfig,
    /// Weak handle to the event channel, used to arm max-duration timers.
    /// Weak so the orchestrator never keeps its own inbox alive: when every
    /// real sender is gone the loop drains out through shutdown.
    events: mpsc::WeakSender<PipelineEvent>,
    /// The session currently in `Recording`, if any.
    current: Option<Session>,
    /// Handle of the most recently dispatched worker, joined at shutdown.
    worker: Option<JoinHandle<()>>,
    next_session_id: u64,
}

impl PipelineOrchestrator {
    /// Create a new orchestrator in the `Idle` state.
    ///
    /// `events` must be the sender half of the channel whose receiver is
    /// later passed to [`run`](Self::run) — the orchestrator uses it to
    /// deliver its own max-duration timer events.
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        config: AppConfig,
        recorder: Arc<dyn CaptureSource>,
        stt: Arc<dyn SttEngine>,
        formatter: Arc<dyn TextFormatter>,
        inserter: Arc<dyn TextInserter>,
        media: Arc<dyn MediaCoordinator>,
        events: &mpsc::Sender<PipelineEvent>,
    ) -> Self {
        Self {
            state: new_shared_state(),
            recorder,
            stt,
            formatter,
            inserter,
            media,
            config,
            events: events.downgrade(),
            current: None,
            worker: None,
            next_session_id: 0,
        }
    }

    /// Observer handle to the pipeline state (read by tests and status
    /// logging; the orchestrator is the only writer).
    pub fn state(&self) -> SharedPipelineState {
        Arc::clone(&self.state)
    }

    // -----------------------------------------------------------------------
    // Event loop
    // -----------------------------------------------------------------------

    /// Run until a `Shutdown` event arrives (or the channel closes, which is
    /// treated the same).  Returns `Err` only for a shutdown timeout.
    pub async fn run(
        mut self,
        mut inbox: mpsc::Receiver<PipelineEvent>,
    ) -> Result<(), PipelineError> {
        while let Some(event) = inbox.recv().await {
            match event {
                PipelineEvent::Pressed => self.on_pressed(),
                PipelineEvent::Released => self.on_released(),
                PipelineEvent::MaxDurationElapsed { session_id } => {
                    self.on_max_duration(session_id)
                }
                PipelineEvent::Shutdown => return self.shutdown().await,
            }
        }

        log::info!("event channel closed, shutting down");
        self.shutdown().await
    }

    // -----------------------------------------------------------------------
    // Transitions
    // -----------------------------------------------------------------------

    /// `Idle → Recording`.  A press in any other state is dropped.
    fn on_pressed(&mut self) {
        {
            let mut state = self.state.lock().unwrap();
            if *state != PipelineState::Idle {
                log::debug!("press ignored: pipeline is {}", state.label());
                return;
            }
            *state = PipelineState::Recording;
        }

        self.next_session_id += 1;
        let id = self.next_session_id;

        if let Err(e) = self.recorder.start() {
            log::error!("session {id}: could not start capture: {e}");
            *self.state.lock().unwrap() = PipelineState::Idle;
            return;
        }

        let mut session = Session::begin(id);
        session.media_engaged = self.media.engage();
        log::info!(
            "session {id}: recording (max {:.0}s)",
            self.config.audio.max_duration_secs
        );
        self.current = Some(session);

        // Arm the max-duration timer.  It delivers through the same channel
        // as key events, so release-vs-timer races resolve to whichever is
        // dequeued first; the loser sees the state has moved on.
        let events = self.events.clone();
        let max = self.config.audio.max_duration();
        tokio::spawn(async move {
            tokio::time::sleep(max).await;
            if let Some(tx) = events.upgrade() {
                let _ = tx
                    .send(PipelineEvent::MaxDurationElapsed { session_id: id })
                    .await;
            }
        });
    }

    /// `Recording → Processing` on key release.
    fn on_released(&mut self) {
        if !self.begin_processing() {
            log::debug!("release ignored: no recording in progress");
            return;
        }
        self.dispatch_worker();
    }

    /// `Recording → Processing` when the max-duration timer fires, behaving
    /// exactly like a manual release.  Stale timers (a different session, or
    /// a session that already moved on) are no-ops.
    fn on_max_duration(&mut self, session_id: u64) {
        if self.current.as_ref().map(|s| s.id) != Some(session_id) {
            return;
        }
        if !self.begin_processing() {
            return;
        }
        log::info!("session {session_id}: max duration reached, stopping");
        self.dispatch_worker();
    }

    /// Flip `Recording → Processing`; returns whether the transition ran.
    fn begin_processing(&self) -> bool {
        let mut state = self.state.lock().unwrap();
        if *state != PipelineState::Recording {
            return false;
        }
        *state = PipelineState::Processing;
        true
    }

    /// Hand the current session to a worker task.  The event loop returns to
    /// `recv` immediately; the worker owns the rest of the session.
    fn dispatch_worker(&mut self) {
        let Some(session) = self.current.take() else {
            // State said Recording but no session exists; recover the gate.
            *self.state.lock().unwrap() = PipelineState::Idle;
            return;
        };

        let worker = SessionWorker {
            state: Arc::clone(&self.state),
            recorder: Arc::clone(&self.recorder),
            stt: Arc::clone(&self.stt),
            formatter: Arc::clone(&self.formatter),
            inserter: Arc::clone(&self.inserter),
            media: Arc::clone(&self.media),
            config: self.config.clone(),
        };
        self.worker = Some(tokio::spawn(worker.run(session)));
    }

    // -----------------------------------------------------------------------
    // Shutdown
    // -----------------------------------------------------------------------

    /// Cross-cutting transition to `ShuttingDown`.
    ///
    /// A worker in flight is allowed to drain, bounded by the configured
    /// shutdown timeout.  A recording with no worker yet is discarded: its
    /// capture is stopped and the media coordinator released.
    async fn shutdown(&mut self) -> Result<(), PipelineError> {
        let prior = {
            let mut state = self.state.lock().unwrap();
            let prior = *state;
            *state = PipelineState::ShuttingDown;
            prior
        };
        log::info!("shutting down (pipeline was {})", prior.label());

        match prior {
            PipelineState::Recording => {
                if let Some(session) = self.current.take() {
                    log::info!("session {}: discarded at shutdown", session.id);
                }
                if let Err(e) = self.recorder.stop() {
                    log::warn!("could not stop capture at shutdown: {e}");
                }
                self.media.release();
                Ok(())
            }
            PipelineState::Processing => {
                let Some(worker) = self.worker.take() else {
                    return Ok(());
                };
                let limit = self.config.shutdown_timeout();
                match tokio::time::timeout(limit, worker).await {
                    Ok(_) => {
                        log::info!("in-flight session drained");
                        Ok(())
                    }
                    Err(_) => {
                        log::error!(
                            "worker did not finish within {limit:?}; abandoning session"
                        );
                        Err(PipelineError::ShutdownTimeout(limit))
                    }
                }
            }
            _ => Ok(()),
        }
    }
}

// ---------------------------------------------------------------------------
// SessionWorker
// ---------------------------------------------------------------------------

/// Everything one session worker needs, cloned out of the orchestrator so
/// the event loop keeps running while the worker executes.
struct SessionWorker {
    state: SharedPipelineState,
    recorder: Arc<dyn CaptureSource>,
    stt: Arc<dyn SttEngine>,
    formatter: Arc<dyn TextFormatter>,
    inserter: Arc<dyn TextInserter>,
    media: Arc<dyn MediaCoordinator>,
    config: AppConfig,
}

impl SessionWorker {
    /// Run the post-capture stages, then the cleanup path.
    ///
    /// Cleanup (media release, outcome logging, `Processing → Idle`) runs
    /// whatever the stages produced — success, abort, or failure.
    async fn run(self, mut session: Session) {
        let id = session.id;
        let outcome = self.run_stages(&mut session).await;

        // Idempotent, and owed whenever engage() paused something; calling
        // it unconditionally keeps every exit path identical.
        self.media.release();

        match &outcome {
            SessionOutcome::Inserted => {
                let chars = session
                    .formatted_transcript
                    .as_deref()
                    .or(session.raw_transcript.as_deref())
                    .map(|t| t.chars().count())
                    .unwrap_or(0);
                log::info!(
                    "session {id}: inserted {chars} chars in {:.1}s",
                    session.started_at.elapsed().as_secs_f32()
                );
            }
            SessionOutcome::Aborted(reason) => {
                log::info!("session {id}: aborted ({reason})");
            }
            SessionOutcome::Failed(e) => {
                log::error!("session {id}: {e}");
            }
        }
        session.outcome = Some(outcome);

        let mut state = self.state.lock().unwrap();
        if *state == PipelineState::Processing {
            *state = PipelineState::Idle;
        }
    }

    /// The ordered stages.  Each early return is a terminal outcome; no
    /// stage starts before the previous one's result is in.
    async fn run_stages(&self, session: &mut Session) -> SessionOutcome {
        let id = session.id;

        // ── 1. Stop capture ──────────────────────────────────────────────
        let recorder = Arc::clone(&self.recorder);
        let audio = match tokio::task::spawn_blocking(move || recorder.stop()).await {
            Ok(Ok(audio)) => audio,
            Ok(Err(e)) => {
                return SessionOutcome::Failed(PipelineError::Capture(e.to_string()));
            }
            Err(e) => {
                return SessionOutcome::Failed(PipelineError::Capture(e.to_string()));
            }
        };

        let secs = audio.len() as f32 / self.config.audio.sample_rate as f32;
        if audio.len() < self.config.audio.min_samples() {
            return SessionOutcome::Aborted(AbortReason::TooShort { secs });
        }
        log::info!("session {id}: {secs:.1}s of audio ({} samples)", audio.len());

        // ── 2. Transcribe ────────────────────────────────────────────────
        let stt = Arc::clone(&self.stt);
        let inference = tokio::task::spawn_blocking(move || stt.transcribe(&audio));

        let raw = match tokio::time::timeout(self.config.stt.timeout(), inference).await {
            Err(_) => {
                return SessionOutcome::Failed(PipelineError::Transcription(format!(
                    "timed out after {:.0}s",
                    self.config.stt.timeout_secs
                )));
            }
            Ok(Err(e)) => {
                return SessionOutcome::Failed(PipelineError::Transcription(e.to_string()));
            }
            Ok(Ok(Err(e))) => {
                return SessionOutcome::Failed(PipelineError::Transcription(e.to_string()));
            }
            Ok(Ok(Ok(text))) => text.trim().to_string(),
        };

        if raw.is_empty() {
            return SessionOutcome::Aborted(AbortReason::EmptyTranscript);
        }
        log::debug!("session {id}: transcript: {raw}");
        session.raw_transcript = Some(raw.clone());

        // ── 3. Format (enhancement only — every failure falls back) ──────
        let final_text = if self.config.llm.enabled
            && !should_skip_formatting(&raw, &self.config.llm)
        {
            match tokio::time::timeout(self.config.llm.timeout(), self.formatter.format(&raw))
                .await
            {
                Ok(Ok(formatted)) => {
                    let normalized =
                        normalize_output(&formatted, self.config.llm.output_format);
                    if normalized.is_empty() {
                        log::warn!("session {id}: formatter returned nothing, using raw text");
                        raw.clone()
                    } else {
                        log::debug!("session {id}: formatted: {normalized}");
                        session.formatted_transcript = Some(normalized.clone());
                        normalized
                    }
                }
                Ok(Err(e)) => {
                    log::warn!("session {id}: formatting failed ({e}), using raw text");
                    raw.clone()
                }
                Err(_) => {
                    log::warn!("session {id}: formatting timed out, using raw text");
                    raw.clone()
                }
            }
        } else {
            raw.clone()
        };

        // ── 4. Insert ────────────────────────────────────────────────────
        let inserter = Arc::clone(&self.inserter);
        let text = final_text.clone();
        match tokio::task::spawn_blocking(move || inserter.insert(&text)).await {
            Ok(Ok(())) => SessionOutcome::Inserted,
            Ok(Err(e)) => SessionOutcome::Failed(PipelineError::Insertion(e.to_string())),
            Err(e) => SessionOutcome::Failed(PipelineError::Insertion(e.to_string())),
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
