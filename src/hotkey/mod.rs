//! Global push-to-talk listener, backed by `rdev`.
//!
//! `rdev::listen()` is a blocking OS-level call that never returns while the
//! process is alive, so it runs on a dedicated OS thread owned by
//! [`HotkeyListener`].  The thread forwards trigger press/release events into
//! the pipeline's event channel with `blocking_send`; it never runs pipeline
//! work itself.
//!
//! Holding a key makes the OS deliver repeated press events; the listener
//! collapses them so the pipeline sees exactly one press per physical hold.

pub mod listener;

pub use listener::HotkeyListener;

// ---------------------------------------------------------------------------
// parse_key
// ---------------------------------------------------------------------------

/// Parse a trigger-key name from config into an [`rdev::Key`].
///
/// Supports F1–F12, modifier keys (good push-to-talk triggers because they
/// type nothing on their own), common named keys, and single ASCII letters.
/// Returns `None` for unrecognised names so callers can report the bad
/// config value.
///
/// # Examples
///
/// ```
/// use whisperkey::hotkey::parse_key;
///
/// assert_eq!(parse_key("RightAlt"), Some(rdev::Key::AltGr));
/// assert_eq!(parse_key("F9"),       Some(rdev::Key::F9));
/// assert_eq!(parse_key("a"),        Some(rdev::Key::KeyA));
/// assert_eq!(parse_key("bogus"),    None);
/// ```
pub fn parse_key(name: &str) -> Option<rdev::Key> {
    use rdev::Key;

    let key = match name {
        // Function keys
        "F1" => Key::F1,
        "F2" => Key::F2,
        "F3" => Key::F3,
        "F4" => Key::F4,
        "F5" => Key::F5,
        "F6" => Key::F6,
        "F7" => Key::F7,
        "F8" => Key::F8,
        "F9" => Key::F9,
        "F10" => Key::F10,
        "F11" => Key::F11,
        "F12" => Key::F12,

        // Modifiers — rdev calls the right Alt key AltGr.
        "LeftAlt" | "Alt" => Key::Alt,
        "RightAlt" | "AltGr" => Key::AltGr,
        "LeftCtrl" | "ControlLeft" => Key::ControlLeft,
        "RightCtrl" | "ControlRight" => Key::ControlRight,
        "LeftShift" | "ShiftLeft" => Key::ShiftLeft,
        "RightShift" | "ShiftRight" => Key::ShiftRight,

        // Named keys
        "Escape" | "Esc" => Key::Escape,
        "Space" => Key::Space,
        "Tab" => Key::Tab,
        "CapsLock" => Key::CapsLock,
        "Home" => Key::Home,
        "End" => Key::End,
        "PageUp" => Key::PageUp,
        "PageDown" => Key::PageDown,
        "Pause" => Key::Pause,

        // Single ASCII letters, case-insensitive
        _ => return parse_letter(name),
    };

    Some(key)
}

fn parse_letter(name: &str) -> Option<rdev::Key> {
    use rdev::Key;

    let mut chars = name.chars();
    let c = chars.next()?.to_ascii_lowercase();
    if chars.next().is_some() {
        return None;
    }

    let key = match c {
        'a' => Key::KeyA,
        'b' => Key::KeyB,
        'c' => Key::KeyC,
        'd' => Key::KeyD,
        'e' => Key::KeyE,
        'f' => Key::KeyF,
        'g' => Key::KeyG,
        'h' => Key::KeyH,
        'i' => Key::KeyI,
        'j' => Key::KeyJ,
        'k' => Key::KeyK,
        'l' => Key::KeyL,
        'm' => Key::KeyM,
        'n' => Key::KeyN,
        'o' => Key::KeyO,
        'p' => Key::KeyP,
        'q' => Key::KeyQ,
        'r' => Key::KeyR,
        's' => Key::KeyS,
        't' => Key::KeyT,
        'u' => Key::KeyU,
        'v' => Key::KeyV,
        'w' => Key::KeyW,
        'x' => Key::KeyX,
        'y' => Key::KeyY,
        'z' => Key::KeyZ,
        _ => return None,
    };

    Some(key)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_function_keys() {
        assert_eq!(parse_key("F1"), Some(rdev::Key::F1));
        assert_eq!(parse_key("F9"), Some(rdev::Key::F9));
        assert_eq!(parse_key("F12"), Some(rdev::Key::F12));
    }

    #[test]
    fn parse_modifier_aliases() {
        assert_eq!(parse_key("RightAlt"), Some(rdev::Key::AltGr));
        assert_eq!(parse_key("AltGr"), Some(rdev::Key::AltGr));
        assert_eq!(parse_key("LeftAlt"), Some(rdev::Key::Alt));
        assert_eq!(parse_key("RightCtrl"), Some(rdev::Key::ControlRight));
    }

    #[test]
    fn parse_letters_case_insensitive() {
        assert_eq!(parse_key("a"), Some(rdev::Key::KeyA));
        assert_eq!(parse_key("A"), Some(rdev::Key::KeyA));
        assert_eq!(parse_key("Z"), Some(rdev::Key::KeyZ));
    }

    #[test]
    fn parse_unknown_returns_none() {
        assert_eq!(parse_key("bogus"), None);
        assert_eq!(parse_key(""), None);
        assert_eq!(parse_key("Ctrl+V"), None);
    }
}
