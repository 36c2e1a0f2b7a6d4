//! Media pause/resume bracketing the recording window.
//!
//! Recording over your own speakers feeds the music straight back into the
//! transcript, so the pipeline can send a play/pause media key when recording
//! starts and send it again once the session finishes.
//!
//! The contract is deliberately forgiving: [`MediaCoordinator::engage`]
//! reports whether it actually paused something, and
//! [`MediaCoordinator::release`] is idempotent — safe to call when nothing
//! was paused, and called unconditionally on the pipeline's cleanup path so
//! playback is never left paused.

use std::sync::atomic::{AtomicBool, Ordering};

use enigo::{Direction, Enigo, Key, Keyboard, Settings};

use crate::config::MediaConfig;

// ---------------------------------------------------------------------------
// MediaCoordinator
// ---------------------------------------------------------------------------

/// Capability interface for the pause/resume side effect.
pub trait MediaCoordinator: Send + Sync {
    /// Pause external playback if configured to.  Returns whether a pause
    /// was actually issued (and therefore whether a resume is owed).
    fn engage(&self) -> bool;

    /// Resume playback if an engage is outstanding.  Idempotent; never
    /// propagates errors.
    fn release(&self);
}

// ---------------------------------------------------------------------------
// MediaKeys
// ---------------------------------------------------------------------------

/// Production [`MediaCoordinator`] toggling playback with the OS media
/// play/pause key.
///
/// The same key both pauses and resumes, so the `engaged` flag is the only
/// thing standing between "resume" and "accidentally start playback" — it is
/// flipped before the resume key is sent and release bails out early when no
/// engage is outstanding.
pub struct MediaKeys {
    enabled: bool,
    engaged: AtomicBool,
}

impl MediaKeys {
    /// Build from the media config snapshot.
    pub fn from_config(config: &MediaConfig) -> Self {
        Self {
            enabled: config.enabled,
            engaged: AtomicBool::new(false),
        }
    }

    fn toggle_play_pause() -> Result<(), String> {
        let mut enigo = Enigo::new(&Settings::default()).map_err(|e| e.to_string())?;
        enigo
            .key(Key::MediaPlayPause, Direction::Click)
            .map_err(|e| e.to_string())
    }
}

impl MediaCoordinator for MediaKeys {
    fn engage(&self) -> bool {
        if !self.enabled {
            return false;
        }
        match Self::toggle_play_pause() {
            Ok(()) => {
                log::info!("media paused for recording");
                self.engaged.store(true, Ordering::SeqCst);
                true
            }
            Err(e) => {
                log::warn!("media pause failed, continuing: {e}");
                false
            }
        }
    }

    fn release(&self) {
        if !self.enabled {
            return;
        }
        if !self.engaged.swap(false, Ordering::SeqCst) {
            return;
        }
        if let Err(e) = Self::toggle_play_pause() {
            log::warn!("media resume failed, continuing: {e}");
        } else {
            log::info!("media playback resumed");
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
    fn disabled_engage_is_noop() {
        let media = MediaKeys::from_config(&MediaConfig { enabled: false });
        assert!(!media.engage());
        assert!(!media.engaged.load(Ordering::SeqCst));
    }

    #[test]
    fn disabled_release_is_noop() {
        let media = MediaKeys::from_config(&MediaConfig { enabled: false });
        media.engaged.store(true, Ordering::SeqCst);
        media.release();
        // Disabled coordinator never touches the flag.
        assert!(media.engaged.load(Ordering::SeqCst));
    }

    #[test]
    fn release_without_engage_does_not_toggle() {
        // With no outstanding engage, release must bail before reaching the
        // key-send path (which would start playback on a real system).  The
        // flag check happens first, so this is observable via the flag.
        let media = MediaKeys::from_config(&MediaConfig { enabled: true });
        assert!(!media.engaged.load(Ordering::SeqCst));
        media.release();
        assert!(!media.engaged.load(Ordering::SeqCst));
    }

    #[test]
    fn coordinator_is_object_safe() {
        let media: Box<dyn MediaCoordinator> =
            Box::new(MediaKeys::from_config(&MediaConfig::default()));
        media.release();
    }
}
