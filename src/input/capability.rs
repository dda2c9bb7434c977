use std::fmt;

use evdev::KeyCode;
use serde::{Deserialize, Serialize};

/// Keyboard keys that can be emitted by the virtual keyboard. Names follow
/// the capability names used in input profiles (e.g. `KeyLeftMeta`).
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Deserialize, Serialize)]
pub enum Keyboard {
    KeyUp,
    KeyDown,
    KeyLeft,
    KeyRight,
    KeyLeftMeta,
    KeySpace,
    KeyEsc,
    KeyLeftCtrl,
    KeyLeftAlt,
    KeyLeftShift,
    KeyEnter,
    KeyTab,
    KeyBackspace,
    KeyA,
    KeyC,
    KeyV,
    KeyX,
    KeyZ,
}

impl Keyboard {
    /// Returns the evdev key code emitted for this key
    pub fn key_code(&self) -> KeyCode {
        match self {
            Keyboard::KeyUp => KeyCode::KEY_UP,
            Keyboard::KeyDown => KeyCode::KEY_DOWN,
            Keyboard::KeyLeft => KeyCode::KEY_LEFT,
            Keyboard::KeyRight => KeyCode::KEY_RIGHT,
            Keyboard::KeyLeftMeta => KeyCode::KEY_LEFTMETA,
            Keyboard::KeySpace => KeyCode::KEY_SPACE,
            Keyboard::KeyEsc => KeyCode::KEY_ESC,
            Keyboard::KeyLeftCtrl => KeyCode::KEY_LEFTCTRL,
            Keyboard::KeyLeftAlt => KeyCode::KEY_LEFTALT,
            Keyboard::KeyLeftShift => KeyCode::KEY_LEFTSHIFT,
            Keyboard::KeyEnter => KeyCode::KEY_ENTER,
            Keyboard::KeyTab => KeyCode::KEY_TAB,
            Keyboard::KeyBackspace => KeyCode::KEY_BACKSPACE,
            Keyboard::KeyA => KeyCode::KEY_A,
            Keyboard::KeyC => KeyCode::KEY_C,
            Keyboard::KeyV => KeyCode::KEY_V,
            Keyboard::KeyX => KeyCode::KEY_X,
            Keyboard::KeyZ => KeyCode::KEY_Z,
        }
    }
}

impl fmt::Display for Keyboard {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}", self)
    }
}

/// Buttons of the virtual mouse
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum MouseButton {
    Left,
    Right,
    Middle,
}

impl MouseButton {
    /// Returns the evdev key code emitted for this button
    pub fn key_code(&self) -> KeyCode {
        match self {
            MouseButton::Left => KeyCode::BTN_LEFT,
            MouseButton::Right => KeyCode::BTN_RIGHT,
            MouseButton::Middle => KeyCode::BTN_MIDDLE,
        }
    }
}

/// Any discrete output that can be held down by the synthesizer
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Capability {
    Keyboard(Keyboard),
    Mouse(MouseButton),
}

impl fmt::Display for Capability {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Capability::Keyboard(key) => write!(f, "Keyboard:{key}"),
            Capability::Mouse(button) => write!(f, "Mouse:{button:?}"),
        }
    }
}
