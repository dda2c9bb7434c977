#[cfg(test)]
pub mod evdev_test;

pub mod gamepad;
pub mod rumble;

use std::path::{Path, PathBuf};

use evdev::{AbsoluteAxisCode, Device, KeyCode};

/// An attachable event device that looks like a gamepad
#[derive(Debug, Clone, PartialEq)]
pub struct GamepadInfo {
    pub name: String,
    pub path: PathBuf,
    pub axis_count: usize,
    pub button_count: usize,
    pub force_feedback: bool,
}

/// Returns all event devices (e.g. /dev/input/event12) that advertise
/// joystick axes and gamepad buttons, sorted by event number.
pub fn list_gamepads() -> Vec<GamepadInfo> {
    let mut gamepads: Vec<GamepadInfo> = evdev::enumerate()
        .filter_map(|(path, device)| {
            log::trace!("Found event device: {path:?}");
            if !is_gamepad(&device) {
                return None;
            }
            Some(GamepadInfo {
                name: device.name().unwrap_or("Unknown").to_string(),
                path,
                axis_count: gamepad::axis_order(&device).len(),
                button_count: gamepad::button_order(&device).len(),
                force_feedback: rumble::supports_rumble(&device),
            })
        })
        .collect();
    sort_gamepads(&mut gamepads);
    gamepads
}

/// Sort gamepads by the number of their event node so that event2 comes
/// before event10. Paths without a number go last.
pub fn sort_gamepads(gamepads: &mut [GamepadInfo]) {
    gamepads.sort_by(|a, b| {
        let a_key = (event_number(&a.path).unwrap_or(u32::MAX), &a.path);
        let b_key = (event_number(&b.path).unwrap_or(u32::MAX), &b.path);
        a_key.cmp(&b_key)
    });
}

/// Returns N for a path like /dev/input/eventN
pub fn event_number(path: &Path) -> Option<u32> {
    path.file_name()?
        .to_str()?
        .strip_prefix("event")?
        .parse()
        .ok()
}

/// Returns true if the device has stick axes and at least one gamepad or
/// joystick button.
fn is_gamepad(device: &Device) -> bool {
    let Some(axes) = device.supported_absolute_axes() else {
        return false;
    };
    if !axes.contains(AbsoluteAxisCode::ABS_X) || !axes.contains(AbsoluteAxisCode::ABS_Y) {
        return false;
    }
    let Some(keys) = device.supported_keys() else {
        return false;
    };
    keys.iter().any(|key| {
        (KeyCode::BTN_TRIGGER.0..KeyCode::BTN_TOOL_PEN.0).contains(&key.0)
            || (KeyCode::BTN_TRIGGER_HAPPY1.0..=KeyCode::BTN_TRIGGER_HAPPY40.0).contains(&key.0)
    })
}

/// Rescale a raw axis value from its [min, max] range into the signed
/// 16-bit range used by raw snapshots.
pub fn normalize_axis(value: i32, min: i32, max: i32) -> i32 {
    if max <= min {
        return 0;
    }
    let value = value.clamp(min, max);
    let range = max as f64 - min as f64;
    let scaled = (value as f64 - min as f64) / range * 65534.0 - 32767.0;
    scaled.round() as i32
}
