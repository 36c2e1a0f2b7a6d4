//! STT (Speech-to-Text) engine module.
//!
//! [`SttEngine`] is the capability interface the pipeline calls; which
//! concrete engine backs it is decided once at startup, never inside the
//! orchestrator.  [`WhisperStt`] is the production implementation wrapping a
//! whisper.cpp context via `whisper-rs`.
//!
//! Transcripts pass through [`cleanup`] before leaving the engine: configured
//! word replacements are applied and obviously bogus output (looped phrases,
//! impossible character rates on short clips) is discarded.

pub mod cleanup;
pub mod engine;

pub use cleanup::{apply_replacements, clean_transcript, is_implausible};
pub use engine::{SttEngine, SttError, WhisperStt};
