//! Dedicated OS-thread trigger listener using `rdev::listen`.
//!
//! `rdev::listen` is a blocking call with no graceful shutdown API: the
//! thread stays parked in the OS event loop until the process exits.
//! Dropping the [`HotkeyListener`] sets a stop flag so the callback silently
//! discards further events — rdev holds no resources needing explicit
//! cleanup, so that is all shutdown requires.

use std::sync::{
    atomic::{AtomicBool, Ordering},
    Arc,
};

use tokio::sync::mpsc;

use crate::pipeline::PipelineEvent;

// ---------------------------------------------------------------------------
// HotkeyListener
// ---------------------------------------------------------------------------

/// Handle to a running trigger-listener thread.
///
/// Construct with [`HotkeyListener::start`]; drop to stop forwarding events.
pub struct HotkeyListener {
    /// Shared stop flag — set `true` on [`Drop`].
    stop: Arc<AtomicBool>,
    /// Kept so the thread is not detached prematurely; never joined because
    /// `rdev::listen` never returns.
    _thread: std::thread::JoinHandle<()>,
}

impl HotkeyListener {
    /// Spawn the listener thread watching `key`, forwarding
    /// [`PipelineEvent::Pressed`] / [`PipelineEvent::Released`] on `tx`.
    ///
    /// Holding a key makes the OS auto-repeat press events; an internal
    /// held-flag collapses them to a single press per physical hold.
    ///
    /// # Panics
    ///
    /// Panics if the OS refuses to create the thread.
    pub fn start(key: rdev::Key, tx: mpsc::Sender<PipelineEvent>) -> Self {
        let stop = Arc::new(AtomicBool::new(false));
        let stop_flag = Arc::clone(&stop);

        let thread = std::thread::Builder::new()
            .name("hotkey-listener".into())
            .spawn(move || {
                let held = AtomicBool::new(false);

                let result = rdev::listen(move |event| {
                    if stop_flag.load(Ordering::Relaxed) {
                        return;
                    }

                    match event.event_type {
                        rdev::EventType::KeyPress(k) if k == key => {
                            // OS auto-repeat delivers this continuously while
                            // the key is held; only the first one counts.
                            if !held.swap(true, Ordering::Relaxed) {
                                let _ = tx.blocking_send(PipelineEvent::Pressed);
                            }
                        }
                        rdev::EventType::KeyRelease(k) if k == key => {
                            if held.swap(false, Ordering::Relaxed) {
                                let _ = tx.blocking_send(PipelineEvent::Released);
                            }
                        }
                        _ => {}
                    }
                });

                if let Err(e) = result {
                    log::error!("hotkey-listener: rdev::listen exited with error: {e:?}");
                }
            })
            .unwrap_or_else(|e| panic!("failed to spawn hotkey-listener thread: {e}"));

        Self {
            stop,
            _thread: thread,
        }
    }
}

impl Drop for HotkeyListener {
    /// Set the stop flag so the rdev callback stops forwarding events.  The
    /// OS thread stays blocked inside `rdev::listen` until process exit.
    fn drop(&mut self) {
        self.stop.store(true, Ordering::Relaxed);
    }
}
