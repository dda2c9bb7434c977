use crate::input::capability::{Keyboard, MouseButton};
use crate::input::source::OutputError;

pub mod keyboard;
pub mod mouse;

/// A [PointerTarget] is any virtual device that can move a pointer, scroll,
/// and press mouse buttons.
pub trait PointerTarget {
    /// Move the pointer by the given relative delta
    fn move_by(&mut self, x: i32, y: i32) -> Result<(), OutputError>;

    /// Scroll by the given number of wheel units on each axis
    fn scroll(&mut self, horizontal: i32, vertical: i32) -> Result<(), OutputError>;

    /// Press or release the given mouse button
    fn button(&mut self, button: MouseButton, pressed: bool) -> Result<(), OutputError>;
}

/// A [KeyTarget] is any virtual device that can press keyboard keys
pub trait KeyTarget {
    /// Press or release the given key
    fn key(&mut self, key: Keyboard, pressed: bool) -> Result<(), OutputError>;
}
