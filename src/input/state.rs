use std::collections::BTreeMap;

use tokio::sync::watch;

use crate::config::InputProfile;
use crate::input::capability::Keyboard;

/// The semantic state of the controller derived from the latest raw
/// snapshot. This is the only state shared between the input pipeline and
/// the output synthesizer.
#[derive(Debug, Clone, PartialEq)]
pub struct ControlState {
    /// Pointer stick deflection, each component in [-1, 1]
    pub movement: (f64, f64),
    /// Signed scroll pulses per second for the horizontal and vertical axes
    pub scroll: (i32, i32),
    /// Pointer speed; never below the profile's base speed
    pub speed_multiplier: f64,
    /// Held state of every declared key. All declared keys are always present.
    pub keys: BTreeMap<Keyboard, bool>,
    pub left_button: bool,
    pub right_button: bool,
    pub stick_chord_left: bool,
    pub stick_chord_right: bool,
}

impl ControlState {
    /// Returns the state of a controller at rest for the given profile
    pub fn idle(profile: &InputProfile) -> Self {
        Self {
            movement: (0.0, 0.0),
            scroll: (0, 0),
            speed_multiplier: profile.speed.base,
            keys: profile
                .declared_keys()
                .into_iter()
                .map(|key| (key, false))
                .collect(),
            left_button: false,
            right_button: false,
            stick_chord_left: false,
            stick_chord_right: false,
        }
    }

    /// Returns true if the given key is declared and held
    pub fn is_key_held(&self, key: Keyboard) -> bool {
        self.keys.get(&key).copied().unwrap_or(false)
    }

    /// Returns true if both stick presses of the enable chord are held
    pub fn toggle_requested(&self) -> bool {
        self.stick_chord_left && self.stick_chord_right
    }
}

/// Create a new shared control state starting at the given state. Every
/// publish swaps in a complete [ControlState], so readers can never observe
/// a partially updated record.
pub fn channel(initial: ControlState) -> (StatePublisher, StateReader) {
    let (tx, rx) = watch::channel(initial);
    (StatePublisher { tx }, StateReader { rx })
}

/// Write side of the shared control state, owned by the input pipeline
#[derive(Debug)]
pub struct StatePublisher {
    tx: watch::Sender<ControlState>,
}

impl StatePublisher {
    /// Replace the shared state with the given state
    pub fn publish(&self, state: ControlState) {
        self.tx.send_replace(state);
    }
}

/// Read side of the shared control state
#[derive(Debug, Clone)]
pub struct StateReader {
    rx: watch::Receiver<ControlState>,
}

impl StateReader {
    /// Returns a copy of the latest published state. Never waits for a new
    /// state to be published.
    pub fn snapshot(&self) -> ControlState {
        self.rx.borrow().clone()
    }

    /// Returns true once the publisher has been dropped, meaning the state
    /// will never be updated again.
    pub fn is_closed(&self) -> bool {
        self.rx.has_changed().is_err()
    }
}
