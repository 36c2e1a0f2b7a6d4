//! The capture source consumed by the pipeline orchestrator.
//!
//! [`MicRecorder`] owns an armed/disarmed sample buffer shared with a feeder
//! thread.  The cpal stream runs continuously; [`MicRecorder::start`] clears
//! the buffer and arms it, [`MicRecorder::stop`] disarms it and moves the
//! samples out.  `stop` is idempotent — calling it when not recording yields
//! an empty buffer rather than an error, which the orchestrator treats as
//! "nothing captured".

use std::sync::mpsc;
use std::sync::{Arc, Mutex};
use std::thread;

use super::capture::{AudioChunk, CaptureError};
use super::resample::{downmix_to_mono, resample};

// ---------------------------------------------------------------------------
// CaptureSource
// ---------------------------------------------------------------------------

/// Capability interface between the orchestrator and the microphone.
///
/// Implementations must be `Send + Sync`; `start` runs on the orchestrator's
/// event loop and must be fast, `stop` runs on the session worker.
pub trait CaptureSource: Send + Sync {
    /// Begin accumulating audio for a new session.
    fn start(&self) -> Result<(), CaptureError>;

    /// Stop accumulating and return everything captured since `start`.
    ///
    /// Safe to call when not recording: returns an empty buffer.
    fn stop(&self) -> Result<Vec<f32>, CaptureError>;
}

// ---------------------------------------------------------------------------
// MicRecorder
// ---------------------------------------------------------------------------

struct RecorderShared {
    armed: bool,
    samples: Vec<f32>,
}

/// Production [`CaptureSource`] fed by the cpal stream.
///
/// Holds only the shared buffer; the cpal [`StreamHandle`] stays with the
/// caller (`cpal::Stream` is not `Send`, so it cannot live inside a value
/// shared across threads).
///
/// [`StreamHandle`]: super::capture::StreamHandle
pub struct MicRecorder {
    shared: Arc<Mutex<RecorderShared>>,
    /// Hard cap on buffered samples (`sample_rate × max_duration_secs`).
    max_samples: usize,
}

impl MicRecorder {
    /// Create a recorder whose buffer is capped at `max_samples`.
    pub fn new(max_samples: usize) -> Self {
        Self {
            shared: Arc::new(Mutex::new(RecorderShared {
                armed: false,
                samples: Vec::new(),
            })),
            max_samples,
        }
    }

    /// Spawn the feeder thread: drains cpal chunks from `rx`, downmixes and
    /// resamples them to `target_rate` mono, and appends to the session
    /// buffer while it is armed.
    ///
    /// The thread exits when the chunk sender (the cpal stream) is dropped.
    pub fn spawn_feeder(
        &self,
        rx: mpsc::Receiver<AudioChunk>,
        source_rate: u32,
        channels: u16,
        target_rate: u32,
    ) -> thread::JoinHandle<()> {
        let shared = Arc::clone(&self.shared);
        let max_samples = self.max_samples;

        thread::Builder::new()
            .name("audio-feeder".into())
            .spawn(move || {
                while let Ok(chunk) = rx.recv() {
                    // Cheap pre-check so disarmed chunks skip the resampler.
                    {
                        let Ok(state) = shared.lock() else { return };
                        if !state.armed {
                            continue;
                        }
                    }

                    let mono = downmix_to_mono(&chunk.samples, channels);
                    let converted = resample(&mono, source_rate, target_rate);

                    let Ok(mut state) = shared.lock() else { return };
                    if !state.armed {
                        continue;
                    }
                    let room = max_samples.saturating_sub(state.samples.len());
                    if room == 0 {
                        // Buffer is full; the orchestrator's max-duration
                        // timer will stop the session.
                        continue;
                    }
                    let take = room.min(converted.len());
                    state.samples.extend_from_slice(&converted[..take]);
                }
            })
            .unwrap_or_else(|e| panic!("failed to spawn audio-feeder thread: {e}"))
    }
}

impl CaptureSource for MicRecorder {
    fn start(&self) -> Result<(), CaptureError> {
        let mut state = self.shared.lock().map_err(|_| CaptureError::Poisoned)?;
        if state.armed {
            return Ok(());
        }
        state.samples.clear();
        state.armed = true;
        log::debug!("recorder armed (cap {} samples)", self.max_samples);
        Ok(())
    }

    fn stop(&self) -> Result<Vec<f32>, CaptureError> {
        let mut state = self.shared.lock().map_err(|_| CaptureError::Poisoned)?;
        state.armed = false;
        Ok(std::mem::take(&mut state.samples))
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
