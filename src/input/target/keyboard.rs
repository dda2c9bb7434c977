use std::{collections::BTreeSet, error::Error};

use evdev::{
    uinput::{VirtualDevice, VirtualDeviceBuilder},
    AttributeSet, EventType, InputEvent, KeyCode, SynchronizationCode, SynchronizationEvent,
};

use crate::input::capability::Keyboard;
use crate::input::source::OutputError;

use super::KeyTarget;

/// Name of the virtual keyboard device
pub const KEYBOARD_NAME: &str = "padmouse Keyboard";

/// Virtual keyboard created through uinput. Only the keys the device was
/// created with can be emitted.
pub struct KeyboardDevice {
    device: VirtualDevice,
    keys: BTreeSet<Keyboard>,
}

impl KeyboardDevice {
    /// Create a virtual keyboard that declares exactly the given keys
    pub fn new(keys: &BTreeSet<Keyboard>) -> Result<Self, Box<dyn Error + Send + Sync>> {
        let mut codes = AttributeSet::<KeyCode>::new();
        for key in keys.iter() {
            codes.insert(key.key_code());
        }

        let device = VirtualDeviceBuilder::new()?
            .name(KEYBOARD_NAME)
            .with_keys(&codes)?
            .build()?;
        log::info!("Created virtual keyboard: {KEYBOARD_NAME} with {} keys", keys.len());

        Ok(Self {
            device,
            keys: keys.clone(),
        })
    }
}

impl KeyTarget for KeyboardDevice {
    fn key(&mut self, key: Keyboard, pressed: bool) -> Result<(), OutputError> {
        if !self.keys.contains(&key) {
            return Err(OutputError::NotSupported(key.to_string()));
        }
        let event = InputEvent::new(EventType::KEY.0, key.key_code().0, pressed as i32);
        self.device.emit(&[event])?;
        self.device
            .emit(&[SynchronizationEvent::new(SynchronizationCode::SYN_REPORT, 0).into()])?;
        Ok(())
    }
}

impl std::fmt::Debug for KeyboardDevice {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("KeyboardDevice")
            .field("name", &KEYBOARD_NAME)
            .field("keys", &self.keys)
            .finish()
    }
}
