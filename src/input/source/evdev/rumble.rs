use std::{error::Error, path::Path, time::Duration};

use evdev::{Device, FFEffect, FFEffectCode, FFEffectData, FFEffectKind, FFReplay, FFTrigger};

use crate::input::source::{OutputError, SourceOutputDevice};

/// Force feedback output for an evdev gamepad. The event node is opened a
/// second time so rumble requests never contend with the input poller.
pub struct RumbleDevice {
    device: Device,
    effect: Option<FFEffect>,
    supported: bool,
}

impl RumbleDevice {
    /// Open the event device at the given path for force feedback
    pub fn new<P: AsRef<Path>>(path: P) -> Result<Self, Box<dyn Error + Send + Sync>> {
        let path = path.as_ref();
        log::debug!("Opening device for force feedback at: {}", path.display());
        let device = Device::open(path)?;
        let supported = supports_rumble(&device);
        if !supported {
            log::info!("Device '{}' does not support rumble", path.display());
        }
        Ok(Self {
            device,
            effect: None,
            supported,
        })
    }

    /// Returns true if the device can play rumble effects
    pub fn is_supported(&self) -> bool {
        self.supported
    }
}

impl SourceOutputDevice for RumbleDevice {
    fn rumble(&mut self, strong: u16, weak: u16, duration: Duration) -> Result<(), OutputError> {
        if !self.supported {
            log::trace!("Device does not support FF events");
            return Ok(());
        }

        let length = duration.as_millis().min(u16::MAX as u128) as u16;
        let effect_data = rumble_effect(strong, weak, length);

        // Upload the effect the first time and update it afterwards
        if let Some(effect) = self.effect.as_mut() {
            log::trace!("Updating effect data");
            effect.update(effect_data)?;
        } else {
            log::trace!("Uploading FF effect data");
            self.effect = Some(self.device.upload_ff_effect(effect_data)?);
        }
        let Some(effect) = self.effect.as_mut() else {
            return Err(OutputError::DeviceError(
                "force feedback effect was not uploaded".to_string(),
            ));
        };

        log::trace!("Playing effect with data: {:?}", effect_data);
        effect.play(1)?;

        Ok(())
    }
}

/// Returns true if the device advertises FF_RUMBLE
pub fn supports_rumble(device: &Device) -> bool {
    device
        .supported_ff()
        .map(|ff| ff.contains(FFEffectCode::FF_RUMBLE))
        .unwrap_or(false)
}

fn rumble_effect(strong: u16, weak: u16, length: u16) -> FFEffectData {
    FFEffectData {
        direction: 0,
        trigger: FFTrigger {
            button: 0,
            interval: 0,
        },
        replay: FFReplay { length, delay: 0 },
        kind: FFEffectKind::Rumble {
            strong_magnitude: strong,
            weak_magnitude: weak,
        },
    }
}
