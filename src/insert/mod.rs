//! Text insertion — clipboard-based paste into the focused window.
//!
//! # Overview
//!
//! Simulating individual keystrokes breaks on non-ASCII text and IME layouts,
//! so insertion goes through the clipboard:
//!
//! 1. **Snapshot** the current clipboard content (when restore is enabled).
//! 2. **Set** the final text into the clipboard.
//! 3. **Paste** via the simulated OS paste chord after a configurable delay.
//! 4. **Restore** the snapshot (best-effort).
//!
//! The clipboard is a process-wide shared resource; the pipeline's
//! re-entrancy gate guarantees only one insertion is ever in flight.

pub mod clipboard;
pub mod keyboard;

pub use clipboard::{restore_clipboard, save_clipboard, set_clipboard};
pub use keyboard::simulate_paste;

use std::time::Duration;

use thiserror::Error;

use crate::config::InsertionConfig;

/// Milliseconds the target app gets to complete the paste before the
/// snapshot is restored over the clipboard.
const RESTORE_SETTLE_MS: u64 = 100;

// ---------------------------------------------------------------------------
// InsertError
// ---------------------------------------------------------------------------

/// All errors that can surface during text insertion.
#[derive(Debug, Error)]
pub enum InsertError {
    /// Could not open or read the system clipboard.
    #[error("cannot access clipboard: {0}")]
    ClipboardAccess(String),

    /// Could not write text to the system clipboard.
    #[error("cannot set clipboard text: {0}")]
    ClipboardSet(String),

    /// Could not simulate the paste chord.
    #[error("cannot simulate key press: {0}")]
    KeySimulation(String),
}

// ---------------------------------------------------------------------------
// TextInserter
// ---------------------------------------------------------------------------

/// Capability interface the pipeline worker uses to deliver the final text.
pub trait TextInserter: Send + Sync {
    /// Insert `text` into the focused application.
    fn insert(&self, text: &str) -> Result<(), InsertError>;
}

// ---------------------------------------------------------------------------
// ClipboardInserter
// ---------------------------------------------------------------------------

/// Production [`TextInserter`] implementing the snapshot → set → paste →
/// restore sequence.
#[derive(Debug, Clone)]
pub struct ClipboardInserter {
    pre_paste_delay: Duration,
    restore_clipboard: bool,
}

impl ClipboardInserter {
    /// Build an inserter from the insertion config snapshot.
    pub fn from_config(config: &InsertionConfig) -> Self {
        Self {
            pre_paste_delay: Duration::from_millis(config.pre_paste_delay_ms),
            restore_clipboard: config.restore_clipboard,
        }
    }
}

impl TextInserter for ClipboardInserter {
    fn insert(&self, text: &str) -> Result<(), InsertError> {
        if text.is_empty() {
            log::warn!("empty text, skipping insertion");
            return Ok(());
        }

        let snapshot = if self.restore_clipboard {
            Some(save_clipboard()?)
        } else {
            None
        };

        set_clipboard(text)?;

        // Give the clipboard manager time to flush before the target reads it.
        std::thread::sleep(self.pre_paste_delay);

        simulate_paste()?;

        if let Some(saved) = snapshot {
            std::thread::sleep(Duration::from_millis(RESTORE_SETTLE_MS));
            // Best-effort: a failed restore must not fail the session.
            if let Err(e) = restore_clipboard(saved) {
                log::warn!("clipboard restore failed: {e}");
            }
        }

        log::info!("inserted {} chars via clipboard paste", text.chars().count());
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn from_config_picks_up_options() {
        let inserter = ClipboardInserter::from_config(&InsertionConfig {
            pre_paste_delay_ms: 75,
            restore_clipboard: false,
        });
        assert_eq!(inserter.pre_paste_delay, Duration::from_millis(75));
        assert!(!inserter.restore_clipboard);
    }

    #[test]
    fn inserter_is_object_safe() {
        let inserter: Box<dyn TextInserter> =
            Box::new(ClipboardInserter::from_config(&InsertionConfig::default()));
        drop(inserter);
    }

    #[test]
    fn empty_text_is_a_noop_ok() {
        // Must not touch the clipboard at all, so it is safe in CI.
        let inserter = ClipboardInserter::from_config(&InsertionConfig::default());
        assert!(inserter.insert("").is_ok());
    }
}
