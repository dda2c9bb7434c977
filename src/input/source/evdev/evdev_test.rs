use std::path::{Path, PathBuf};

use evdev::KeyCode;

use crate::input::source::evdev::{
    event_number, gamepad::sort_buttons, normalize_axis, sort_gamepads, GamepadInfo,
};

#[test]
fn test_normalize_stick_axis() {
    assert_eq!(normalize_axis(-32768, -32768, 32767), -32767);
    assert_eq!(normalize_axis(0, -32768, 32767), 0);
    assert_eq!(normalize_axis(32767, -32768, 32767), 32767);
    assert_eq!(normalize_axis(16384, -32768, 32767), 16384);
}

#[test]
fn test_normalize_trigger_axis() {
    // Released triggers rest at the bottom of the range
    assert_eq!(normalize_axis(0, 0, 255), -32767);
    assert_eq!(normalize_axis(255, 0, 255), 32767);
    assert!(normalize_axis(128, 0, 255) > 0);
}

#[test]
fn test_normalize_hat_axis() {
    assert_eq!(normalize_axis(-1, -1, 1), -32767);
    assert_eq!(normalize_axis(0, -1, 1), 0);
    assert_eq!(normalize_axis(1, -1, 1), 32767);
}

#[test]
fn test_normalize_degenerate_range() {
    assert_eq!(normalize_axis(5, 3, 3), 0);
    assert_eq!(normalize_axis(400, 0, 255), 32767);
}

#[test]
fn test_joystick_button_order() {
    let keys = vec![
        KeyCode::BTN_THUMBR,
        KeyCode::KEY_RECORD,
        KeyCode::BTN_SOUTH,
        KeyCode::BTN_MODE,
        KeyCode::BTN_EAST,
    ];
    let ordered = sort_buttons(keys);
    assert_eq!(
        ordered,
        vec![
            KeyCode::BTN_SOUTH,
            KeyCode::BTN_EAST,
            KeyCode::BTN_MODE,
            KeyCode::BTN_THUMBR,
            KeyCode::KEY_RECORD,
        ]
    );
}

#[test]
fn test_button_order_is_truncated_to_mask_width() {
    let keys: Vec<KeyCode> = (0..40).map(|i| KeyCode(KeyCode::BTN_TRIGGER_HAPPY1.0 + i)).collect();
    assert_eq!(sort_buttons(keys).len(), 32);
}

fn gamepad_at(path: &str) -> GamepadInfo {
    GamepadInfo {
        name: "Test Pad".to_string(),
        path: PathBuf::from(path),
        axis_count: 8,
        button_count: 11,
        force_feedback: false,
    }
}

#[test]
fn test_event_number() {
    assert_eq!(event_number(Path::new("/dev/input/event2")), Some(2));
    assert_eq!(event_number(Path::new("/dev/input/event10")), Some(10));
    assert_eq!(event_number(Path::new("/dev/input/js0")), None);
    assert_eq!(event_number(Path::new("/dev/input/eventX")), None);
}

#[test]
fn test_gamepads_sorted_by_event_number() {
    let mut gamepads = vec![
        gamepad_at("/dev/input/event10"),
        gamepad_at("/dev/input/by-id/pad"),
        gamepad_at("/dev/input/event2"),
        gamepad_at("/dev/input/event1"),
    ];
    sort_gamepads(&mut gamepads);
    let paths: Vec<String> = gamepads
        .iter()
        .map(|gamepad| gamepad.path.display().to_string())
        .collect();
    assert_eq!(
        paths,
        vec![
            "/dev/input/event1",
            "/dev/input/event2",
            "/dev/input/event10",
            "/dev/input/by-id/pad",
        ]
    );
}
