use std::error::Error;

use evdev::{
    uinput::{VirtualDevice, VirtualDeviceBuilder},
    AttributeSet, EventType, InputEvent, KeyCode, RelativeAxisCode, SynchronizationCode,
    SynchronizationEvent,
};

use crate::input::capability::MouseButton;
use crate::input::source::OutputError;

use super::PointerTarget;

/// Name of the virtual pointer device
pub const MOUSE_NAME: &str = "padmouse Mouse";

/// Virtual mouse created through uinput
pub struct MouseDevice {
    device: VirtualDevice,
}

impl MouseDevice {
    pub fn new() -> Result<Self, Box<dyn Error + Send + Sync>> {
        let device = create_virtual_device()?;
        log::info!("Created virtual mouse: {MOUSE_NAME}");
        Ok(Self { device })
    }

    /// Write the given events followed by a sync report
    fn emit(&mut self, events: &[InputEvent]) -> Result<(), OutputError> {
        if events.is_empty() {
            return Ok(());
        }
        self.device.emit(events)?;
        self.device
            .emit(&[SynchronizationEvent::new(SynchronizationCode::SYN_REPORT, 0).into()])?;
        Ok(())
    }
}

impl PointerTarget for MouseDevice {
    fn move_by(&mut self, x: i32, y: i32) -> Result<(), OutputError> {
        let events = relative_events(&[(RelativeAxisCode::REL_X, x), (RelativeAxisCode::REL_Y, y)]);
        self.emit(&events)
    }

    fn scroll(&mut self, horizontal: i32, vertical: i32) -> Result<(), OutputError> {
        let events = relative_events(&[
            (RelativeAxisCode::REL_HWHEEL, horizontal),
            (RelativeAxisCode::REL_WHEEL, vertical),
        ]);
        self.emit(&events)
    }

    fn button(&mut self, button: MouseButton, pressed: bool) -> Result<(), OutputError> {
        let event = InputEvent::new(EventType::KEY.0, button.key_code().0, pressed as i32);
        self.emit(&[event])
    }
}

impl std::fmt::Debug for MouseDevice {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MouseDevice").field("name", &MOUSE_NAME).finish()
    }
}

/// Build relative events for every non-zero value
fn relative_events(values: &[(RelativeAxisCode, i32)]) -> Vec<InputEvent> {
    values
        .iter()
        .filter(|(_, value)| *value != 0)
        .map(|(axis, value)| InputEvent::new(EventType::RELATIVE.0, axis.0, *value))
        .collect()
}

/// Create the virtual device to emulate
fn create_virtual_device() -> Result<VirtualDevice, Box<dyn Error + Send + Sync>> {
    let buttons = AttributeSet::from_iter([KeyCode::BTN_LEFT, KeyCode::BTN_RIGHT, KeyCode::BTN_MIDDLE]);
    let device = VirtualDeviceBuilder::new()?
        .name(MOUSE_NAME)
        .with_relative_axes(&AttributeSet::from_iter([
            RelativeAxisCode::REL_X,
            RelativeAxisCode::REL_Y,
            RelativeAxisCode::REL_WHEEL,
            RelativeAxisCode::REL_HWHEEL,
        ]))?
        .with_keys(&buttons)?
        .build()?;

    Ok(device)
}
