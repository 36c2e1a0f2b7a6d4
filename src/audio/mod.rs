//! Audio capture — microphone stream → downmix/resample → armed session buffer.
//!
//! # Pipeline
//!
//! ```text
//! Microphone → cpal callback → AudioChunk (mpsc) → feeder thread
//!           → downmix_to_mono → resample → MicRecorder buffer (when armed)
//! ```
//!
//! The cpal stream stays open for the lifetime of the process; recording
//! on/off is a flag on [`MicRecorder`] so the OS microphone resource is never
//! repeatedly acquired and released.  The pipeline orchestrator talks to the
//! recorder only through the [`CaptureSource`] trait.

pub mod capture;
pub mod recorder;
pub mod resample;

pub use capture::{AudioCapture, AudioChunk, CaptureError, StreamHandle};
pub use recorder::{CaptureSource, MicRecorder};
pub use resample::{downmix_to_mono, resample};
