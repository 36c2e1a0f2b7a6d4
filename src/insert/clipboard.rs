//! Clipboard snapshot / restore helpers backed by the `arboard` crate.
//!
//! Each function opens a short-lived [`arboard::Clipboard`] handle rather
//! than sharing one across calls: `arboard::Clipboard` is not `Send` on all
//! platforms and the handle is cheap to create.

use arboard::Clipboard;

use super::InsertError;

// ---------------------------------------------------------------------------
// Public API
// ---------------------------------------------------------------------------

/// Capture the current clipboard plain-text content.
///
/// Returns `Ok(None)` when the clipboard is empty or contains non-text data
/// (e.g. an image) — that is not an error, there is simply nothing to put
/// back later.
///
/// # Errors
///
/// Returns [`InsertError::ClipboardAccess`] if the OS clipboard cannot be
/// opened.
pub fn save_clipboard() -> Result<Option<String>, InsertError> {
    let mut clipboard = open_clipboard()?;
    // `get_text` errors on empty or non-text content — both become None.
    Ok(clipboard.get_text().ok())
}

/// Write `text` into the system clipboard, replacing whatever was there.
///
/// # Errors
///
/// Returns [`InsertError::ClipboardAccess`] if the clipboard cannot be
/// opened, or [`InsertError::ClipboardSet`] if writing fails.
pub fn set_clipboard(text: &str) -> Result<(), InsertError> {
    let mut clipboard = open_clipboard()?;
    clipboard
        .set_text(text)
        .map_err(|e| InsertError::ClipboardSet(e.to_string()))
}

/// Restore the clipboard to a previously saved value.
///
/// * `Some(text)` — writes `text` back to the clipboard.
/// * `None` — nothing was saved; returns `Ok(())` without touching the
///   clipboard.
pub fn restore_clipboard(saved: Option<String>) -> Result<(), InsertError> {
    match saved {
        Some(text) => set_clipboard(&text),
        None => Ok(()),
    }
}

// ---------------------------------------------------------------------------
// Private helpers
// ---------------------------------------------------------------------------

fn open_clipboard() -> Result<Clipboard, InsertError> {
    Clipboard::new().map_err(|e| InsertError::ClipboardAccess(e.to_string()))
}
