pub mod evdev;

use std::{io, time::Duration};

use thiserror::Error;

/// Possible errors while reading from a source device
#[derive(Error, Debug)]
pub enum InputError {
    #[error("failed to read device state: {0}")]
    IoError(#[from] io::Error),
    #[error("error occurred running device: {0}")]
    DeviceError(String),
}

/// Possible errors while writing output to a device
#[derive(Error, Debug)]
pub enum OutputError {
    #[error("failed to write to device: {0}")]
    IoError(#[from] io::Error),
    #[error("capability is not supported by the device: {0}")]
    NotSupported(String),
    #[error("error occurred running device: {0}")]
    DeviceError(String),
}

/// A [RawSnapshot] is one sampled read of every axis value and the button
/// bitmask of a controller. Axis values are in the signed 16-bit range and
/// bit `i` of `buttons` is set while the `i`-th button is held.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RawSnapshot {
    pub axes: Vec<i32>,
    pub buttons: u32,
}

impl RawSnapshot {
    pub fn new(axes: Vec<i32>, buttons: u32) -> Self {
        Self { axes, buttons }
    }

    /// Returns the value of the axis at the given index, or zero if the
    /// device has no such axis.
    pub fn axis(&self, index: usize) -> i32 {
        self.axes.get(index).copied().unwrap_or_default()
    }

    /// Returns true if every bit of the given mask is set
    pub fn is_pressed(&self, mask: u32) -> bool {
        self.buttons & mask == mask
    }
}

/// A [SourceInputDevice] is a physical controller that can be sampled for
/// its current state.
pub trait SourceInputDevice {
    /// Read the current state of the device. An error means the device can
    /// no longer be read (e.g. it was unplugged).
    fn read(&mut self) -> Result<RawSnapshot, InputError>;

    /// Number of axes present in every snapshot from this device
    fn axis_count(&self) -> usize;
}

/// A [SourceOutputDevice] accepts output events that flow back to the
/// physical device, such as force feedback.
pub trait SourceOutputDevice {
    /// Play a rumble effect with the given motor magnitudes for the given
    /// duration.
    fn rumble(&mut self, strong: u16, weak: u16, duration: Duration) -> Result<(), OutputError>;
}
