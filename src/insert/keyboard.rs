//! Paste-chord simulation backed by the `enigo` crate.
//!
//! | Platform | Shortcut |
//! |----------|----------|
//! | macOS    | ⌘V (Meta + V) |
//! | Windows  | Ctrl+V |
//! | Linux    | Ctrl+V |

use enigo::{Direction, Enigo, Key, Keyboard, Settings};

use super::InsertError;

/// Simulate the system paste shortcut in the currently focused window.
///
/// A new [`Enigo`] instance is created per call because `Enigo` is not
/// `Send` and the handle is cheap to construct.
///
/// # Errors
///
/// Returns [`InsertError::KeySimulation`] if the enigo backend cannot be
/// initialised or any key event fails to be delivered.
pub fn simulate_paste() -> Result<(), InsertError> {
    let mut enigo =
        Enigo::new(&Settings::default()).map_err(|e| InsertError::KeySimulation(e.to_string()))?;

    #[cfg(target_os = "macos")]
    let modifier = Key::Meta;
    #[cfg(not(target_os = "macos"))]
    let modifier = Key::Control;

    enigo
        .key(modifier, Direction::Press)
        .map_err(|e| InsertError::KeySimulation(e.to_string()))?;
    let pressed = enigo.key(Key::Unicode('v'), Direction::Click);
    // Always release the modifier, even if the V click failed — a stuck
    // Ctrl/⌘ key is worse than a failed paste.
    let released = enigo.key(modifier, Direction::Release);

    pressed.map_err(|e| InsertError::KeySimulation(e.to_string()))?;
    released.map_err(|e| InsertError::KeySimulation(e.to_string()))?;

    Ok(())
}
