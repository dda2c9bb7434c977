use std::fmt::Debug;
use std::{collections::HashMap, error::Error, path::Path};

use evdev::{AbsInfo, AbsoluteAxisCode, Device, KeyCode};

use crate::input::source::{InputError, RawSnapshot, SourceInputDevice};

use super::normalize_axis;

/// Button bitmasks are 32 bits wide
const MAX_BUTTONS: usize = 32;

/// Source device implementation for evdev gamepads. Snapshots are laid out
/// the way the Linux joystick API reports them so that profiles written for
/// /dev/input/js* devices keep their axis indices and button bits.
pub struct GamepadEventDevice {
    device: Device,
    path: String,
    axes: Vec<AbsoluteAxisCode>,
    buttons: Vec<KeyCode>,
}

impl GamepadEventDevice {
    /// Open the gamepad at the given event device path
    pub fn new<P: AsRef<Path>>(path: P) -> Result<Self, Box<dyn Error + Send + Sync>> {
        let path = path.as_ref();
        log::debug!("Opening device at: {}", path.display());
        let device = Device::open(path)?;

        let axes = axis_order(&device);
        let buttons = button_order(&device);
        if axes.is_empty() {
            return Err(format!("Device '{}' has no absolute axes", path.display()).into());
        }
        log::debug!("Found axes: {:?}", axes);
        log::debug!("Found buttons: {:?}", buttons);

        Ok(Self {
            device,
            path: path.display().to_string(),
            axes,
            buttons,
        })
    }

    /// Returns the name the device advertises
    pub fn name(&self) -> String {
        self.device.name().unwrap_or("Unknown").to_string()
    }

    /// Returns the path to the event device
    pub fn path(&self) -> &str {
        self.path.as_str()
    }
}

impl SourceInputDevice for GamepadEventDevice {
    /// Sample the current axis values and button states of the device
    fn read(&mut self) -> Result<RawSnapshot, InputError> {
        let info: HashMap<AbsoluteAxisCode, AbsInfo> = self.device.get_absinfo()?.collect();
        let axes = self
            .axes
            .iter()
            .map(|axis| {
                let Some(info) = info.get(axis) else {
                    return Err(InputError::DeviceError(format!(
                        "Axis {axis:?} is no longer reported by {}",
                        self.path
                    )));
                };
                Ok(normalize_axis(info.value(), info.minimum(), info.maximum()))
            })
            .collect::<Result<Vec<i32>, InputError>>()?;

        let keys = self.device.get_key_state()?;
        let buttons = self
            .buttons
            .iter()
            .enumerate()
            .filter(|(_, key)| keys.contains(**key))
            .fold(0u32, |mask, (bit, _)| mask | (1 << bit));

        let snapshot = RawSnapshot::new(axes, buttons);
        log::trace!("Read snapshot: {:?}", snapshot);
        Ok(snapshot)
    }

    fn axis_count(&self) -> usize {
        self.axes.len()
    }
}

impl Debug for GamepadEventDevice {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GamepadEventDevice")
            .field("path", &self.path)
            .field("axes", &self.axes)
            .field("buttons", &self.buttons)
            .finish()
    }
}

/// Returns the absolute axes of the device in ascending code order
pub fn axis_order(device: &Device) -> Vec<AbsoluteAxisCode> {
    let Some(axes) = device.supported_absolute_axes() else {
        return vec![];
    };
    let mut axes: Vec<AbsoluteAxisCode> = axes.iter().collect();
    axes.sort_by_key(|axis| axis.0);
    axes
}

/// Returns the buttons of the device in the order the joystick API assigns
/// button numbers: codes starting at BTN_MISC first, then any lower codes.
pub fn button_order(device: &Device) -> Vec<KeyCode> {
    let Some(keys) = device.supported_keys() else {
        return vec![];
    };
    let keys: Vec<KeyCode> = keys.iter().collect();
    sort_buttons(keys)
}

/// Order the given key codes joystick-style and truncate to the number of
/// bits in a button mask.
pub fn sort_buttons(mut keys: Vec<KeyCode>) -> Vec<KeyCode> {
    keys.sort_by_key(|key| (key.0 < KeyCode::BTN_0.0, key.0));
    keys.truncate(MAX_BUTTONS);
    keys
}
