
use std::{collections::BTreeSet, io, path::Path, time::Duration};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::input::capability::Keyboard;

/// Path to the profiles installed with the package
pub const PROFILE_DIR: &str = "/usr/share/padmouse/profiles";

/// Upper bound for every timing value in a profile (one hour)
pub const MAX_INTERVAL_MS: u64 = 3_600_000;

/// Represents all possible errors loading an [InputProfile]
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("Could not read: {0}")]
    IoError(#[from] io::Error),
    #[error("Unable to deserialize: {0}")]
    DeserializeError(#[from] serde_yaml::Error),
}

/// Errors found while validating an [InputProfile] against a device
#[derive(Debug, Error, PartialEq)]
pub enum ProfileError {
    #[error("{name} axis index {index} is out of range for a device with {count} axes")]
    AxisOutOfRange {
        name: &'static str,
        index: usize,
        count: usize,
    },
    #[error("{0} button mask must not be zero")]
    EmptyMask(String),
    #[error("scroll divisor must not be zero")]
    ZeroScrollDivisor,
    #[error("base speed must be greater than zero, got {0}")]
    InvalidBaseSpeed(f64),
    #[error("{0} must be greater than zero")]
    ZeroInterval(&'static str),
    #[error("{name} must be at most {max_ms} ms, got {value_ms} ms")]
    IntervalTooLong {
        name: &'static str,
        value_ms: u64,
        max_ms: u64,
    },
    #[error("haptics key {0} is not bound to any button")]
    UndeclaredHapticsKey(Keyboard),
}

/// A pair of axis indices into a raw snapshot
#[derive(Debug, Deserialize, Serialize, Clone, Copy, PartialEq)]
#[serde(rename_all = "snake_case")]
pub struct AxisPair {
    pub x: usize,
    pub y: usize,
}

/// Analog trigger used to speed up the pointer
#[derive(Debug, Deserialize, Serialize, Clone, Copy, PartialEq)]
#[serde(rename_all = "snake_case")]
pub struct SpeedConfig {
    /// Axis index of the trigger
    pub axis: usize,
    /// Pointer speed in pixels per output tick at full stick deflection.
    /// A fully pressed trigger doubles it.
    pub base: f64,
}

/// Button masks for a pair of buttons (left/right)
#[derive(Debug, Deserialize, Serialize, Clone, Copy, PartialEq)]
#[serde(rename_all = "snake_case")]
pub struct ButtonPair {
    pub left: u32,
    pub right: u32,
}

/// Binds a button mask to a keyboard key. The key is held while every bit
/// of the mask is set.
#[derive(Debug, Deserialize, Serialize, Clone, Copy, PartialEq)]
#[serde(rename_all = "snake_case")]
pub struct KeyBinding {
    pub mask: u32,
    pub key: Keyboard,
}

/// One-shot rumble played when the given key is first pressed
#[derive(Debug, Deserialize, Serialize, Clone, Copy, PartialEq)]
#[serde(rename_all = "snake_case")]
pub struct HapticsConfig {
    pub key: Keyboard,
    pub strong: u16,
    pub weak: u16,
    pub duration_ms: u16,
}

impl HapticsConfig {
    pub fn duration(&self) -> Duration {
        Duration::from_millis(self.duration_ms as u64)
    }
}

/// Loop cadences used by the poller and the output synthesizer
#[derive(Debug, Deserialize, Serialize, Clone, Copy, PartialEq)]
#[serde(rename_all = "snake_case")]
pub struct TimingConfig {
    pub poll_interval_ms: u64,
    pub output_interval_ms: u64,
    pub toggle_cooldown_ms: u64,
    pub disabled_interval_ms: u64,
}

impl TimingConfig {
    pub fn poll_interval(&self) -> Duration {
        Duration::from_millis(self.poll_interval_ms)
    }

    pub fn output_interval(&self) -> Duration {
        Duration::from_millis(self.output_interval_ms)
    }

    pub fn toggle_cooldown(&self) -> Duration {
        Duration::from_millis(self.toggle_cooldown_ms)
    }

    pub fn disabled_interval(&self) -> Duration {
        Duration::from_millis(self.disabled_interval_ms)
    }
}

impl Default for TimingConfig {
    fn default() -> Self {
        Self {
            poll_interval_ms: 10,
            output_interval_ms: 10,
            toggle_cooldown_ms: 500,
            disabled_interval_ms: 100,
        }
    }
}

/// An [InputProfile] describes how a controller layout is translated into
/// pointer and keyboard output. Axis indices refer to positions in a raw
/// snapshot and masks refer to bits of its button bitmask.
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
#[serde(rename_all = "snake_case")]
pub struct InputProfile {
    pub version: u32,
    pub kind: String,
    pub name: String,
    pub description: Option<String>,
    pub movement: AxisPair,
    pub scroll: AxisPair,
    pub scroll_divisor: i32,
    pub speed: SpeedConfig,
    pub dpad: AxisPair,
    pub mouse: ButtonPair,
    pub toggle: ButtonPair,
    pub keys: Vec<KeyBinding>,
    pub haptics: Option<HapticsConfig>,
    #[serde(default)]
    pub timing: TimingConfig,
}

impl Default for InputProfile {
    /// Layout of an Xbox 360 style controller as reported by the joystick API
    fn default() -> Self {
        Self {
            version: 1,
            kind: "InputProfile".to_string(),
            name: "Xbox 360".to_string(),
            description: Some(
                "Left stick moves the pointer, right stick scrolls, right trigger speeds up"
                    .to_string(),
            ),
            movement: AxisPair { x: 0, y: 1 },
            scroll: AxisPair { x: 3, y: 4 },
            scroll_divisor: 5000,
            speed: SpeedConfig { axis: 5, base: 5.0 },
            dpad: AxisPair { x: 6, y: 7 },
            mouse: ButtonPair {
                left: 16,
                right: 32,
            },
            toggle: ButtonPair {
                left: 512,
                right: 1024,
            },
            keys: vec![
                KeyBinding {
                    mask: 1,
                    key: Keyboard::KeySpace,
                },
                KeyBinding {
                    mask: 2,
                    key: Keyboard::KeyV,
                },
                KeyBinding {
                    mask: 4,
                    key: Keyboard::KeyC,
                },
                KeyBinding {
                    mask: 8,
                    key: Keyboard::KeyEnter,
                },
                KeyBinding {
                    mask: 64,
                    key: Keyboard::KeyLeftCtrl,
                },
                KeyBinding {
                    mask: 128,
                    key: Keyboard::KeyEsc,
                },
                KeyBinding {
                    mask: 256,
                    key: Keyboard::KeyLeftMeta,
                },
            ],
            haptics: Some(HapticsConfig {
                key: Keyboard::KeyLeftMeta,
                strong: 0x8000,
                weak: 0x8000,
                duration_ms: 100,
            }),
            timing: TimingConfig::default(),
        }
    }
}

impl InputProfile {
    /// Load an [InputProfile] from the given YAML string
    pub fn from_yaml(content: String) -> Result<InputProfile, LoadError> {
        let profile: InputProfile = serde_yaml::from_str(content.as_str())?;
        Ok(profile)
    }

    /// Load an [InputProfile] from the given YAML file
    pub fn from_yaml_file<P: AsRef<Path>>(path: P) -> Result<InputProfile, LoadError> {
        let file = std::fs::File::open(path)?;
        let profile: InputProfile = serde_yaml::from_reader(file)?;
        Ok(profile)
    }

    /// Serialize the profile into YAML
    pub fn to_yaml(&self) -> Result<String, serde_yaml::Error> {
        serde_yaml::to_string(self)
    }

    /// Returns the fixed set of keys the virtual keyboard must declare: the
    /// arrow keys driven by the d-pad plus every bound key.
    pub fn declared_keys(&self) -> BTreeSet<Keyboard> {
        let mut keys = BTreeSet::from([
            Keyboard::KeyUp,
            Keyboard::KeyDown,
            Keyboard::KeyLeft,
            Keyboard::KeyRight,
        ]);
        keys.extend(self.keys.iter().map(|binding| binding.key));
        keys
    }

    /// Validate the profile for a device that reports `axis_count` axes.
    pub fn validate(&self, axis_count: usize) -> Result<(), ProfileError> {
        let axes = [
            ("movement x", self.movement.x),
            ("movement y", self.movement.y),
            ("scroll x", self.scroll.x),
            ("scroll y", self.scroll.y),
            ("speed", self.speed.axis),
            ("dpad x", self.dpad.x),
            ("dpad y", self.dpad.y),
        ];
        for (name, index) in axes {
            if index >= axis_count {
                return Err(ProfileError::AxisOutOfRange {
                    name,
                    index,
                    count: axis_count,
                });
            }
        }

        let masks = [
            ("mouse left".to_string(), self.mouse.left),
            ("mouse right".to_string(), self.mouse.right),
            ("toggle left".to_string(), self.toggle.left),
            ("toggle right".to_string(), self.toggle.right),
        ];
        let bindings = self
            .keys
            .iter()
            .map(|binding| (binding.key.to_string(), binding.mask));
        for (name, mask) in masks.into_iter().chain(bindings) {
            if mask == 0 {
                return Err(ProfileError::EmptyMask(name));
            }
        }

        if self.scroll_divisor == 0 {
            return Err(ProfileError::ZeroScrollDivisor);
        }
        if self.speed.base.is_nan() || self.speed.base <= 0.0 {
            return Err(ProfileError::InvalidBaseSpeed(self.speed.base));
        }

        let intervals = [
            ("poll interval", self.timing.poll_interval_ms),
            ("output interval", self.timing.output_interval_ms),
            ("toggle cooldown", self.timing.toggle_cooldown_ms),
            ("disabled interval", self.timing.disabled_interval_ms),
        ];
        for (name, value) in intervals {
            if value == 0 {
                return Err(ProfileError::ZeroInterval(name));
            }
            if value > MAX_INTERVAL_MS {
                return Err(ProfileError::IntervalTooLong {
                    name,
                    value_ms: value,
                    max_ms: MAX_INTERVAL_MS,
                });
            }
        }

        if let Some(haptics) = self.haptics.as_ref() {
            if !self.declared_keys().contains(&haptics.key) {
                return Err(ProfileError::UndeclaredHapticsKey(haptics.key));
            }
        }

        Ok(())
    }
}
