use std::collections::BTreeSet;

use crate::config::{InputProfile, ProfileError};
use crate::input::capability::Keyboard;
use crate::input::source::RawSnapshot;
use crate::input::state::ControlState;

/// Full scale of a raw snapshot axis
const AXIS_SCALE: f64 = 32768.0;

/// Translates raw snapshots into a [ControlState] using an [InputProfile]
#[derive(Debug, Clone)]
pub struct ControlMapper {
    profile: InputProfile,
    declared_keys: BTreeSet<Keyboard>,
}

impl ControlMapper {
    /// Create a new mapper for a device with the given number of axes. The
    /// profile is validated here so that a bad profile is rejected before
    /// any loop starts.
    pub fn new(profile: InputProfile, axis_count: usize) -> Result<Self, ProfileError> {
        profile.validate(axis_count)?;
        let declared_keys = profile.declared_keys();
        Ok(Self {
            profile,
            declared_keys,
        })
    }

    pub fn profile(&self) -> &InputProfile {
        &self.profile
    }

    /// Returns the state before any snapshot has been read
    pub fn idle(&self) -> ControlState {
        ControlState::idle(&self.profile)
    }

    /// Map the given raw snapshot into a control state. This is a pure
    /// function of the snapshot and the profile.
    pub fn map(&self, raw: &RawSnapshot) -> ControlState {
        let profile = &self.profile;

        let movement = (
            normalize_axis(raw.axis(profile.movement.x)),
            normalize_axis(raw.axis(profile.movement.y)),
        );
        let speed_multiplier = speed_multiplier(
            profile.speed.base,
            normalize_axis(raw.axis(profile.speed.axis)),
        );
        let scroll = (
            scroll_pulses(raw.axis(profile.scroll.x), profile.scroll_divisor),
            scroll_pulses(raw.axis(profile.scroll.y), profile.scroll_divisor),
        );

        let mut keys = self
            .declared_keys
            .iter()
            .map(|key| (*key, false))
            .collect::<std::collections::BTreeMap<_, _>>();
        for binding in profile.keys.iter() {
            if raw.is_pressed(binding.mask) {
                keys.insert(binding.key, true);
            }
        }

        // D-pad axes drive the arrow keys
        let dpad_x = raw.axis(profile.dpad.x);
        let dpad_y = raw.axis(profile.dpad.y);
        let arrows = [
            (Keyboard::KeyLeft, dpad_x < 0),
            (Keyboard::KeyRight, dpad_x > 0),
            (Keyboard::KeyUp, dpad_y < 0),
            (Keyboard::KeyDown, dpad_y > 0),
        ];
        for (key, held) in arrows {
            if let Some(value) = keys.get_mut(&key) {
                *value |= held;
            }
        }

        ControlState {
            movement,
            scroll,
            speed_multiplier,
            keys,
            left_button: raw.is_pressed(profile.mouse.left),
            right_button: raw.is_pressed(profile.mouse.right),
            stick_chord_left: raw.is_pressed(profile.toggle.left),
            stick_chord_right: raw.is_pressed(profile.toggle.right),
        }
    }
}

/// Normalize a signed 16-bit axis value into [-1, 1]
pub fn normalize_axis(value: i32) -> f64 {
    (value as f64 / AXIS_SCALE).clamp(-1.0, 1.0)
}

/// Pointer speed for the given normalized trigger value. Only a positive
/// trigger reading raises the speed; it never drops below `base`.
pub fn speed_multiplier(base: f64, trigger: f64) -> f64 {
    if trigger > 0.0 {
        base + base * trigger
    } else {
        base
    }
}

/// Scroll pulses per second for the given axis value, truncated toward zero
pub fn scroll_pulses(value: i32, divisor: i32) -> i32 {
    value.checked_div(divisor).unwrap_or(0)
}
