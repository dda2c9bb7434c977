//! Scripted sources and recording targets for exercising the pipeline
//! without real devices.
use std::collections::VecDeque;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use crate::input::capability::{Keyboard, MouseButton};
use crate::input::source::{
    InputError, OutputError, RawSnapshot, SourceInputDevice, SourceOutputDevice,
};
use crate::input::target::{KeyTarget, PointerTarget};

/// Every output a recording target received
#[derive(Debug, Clone, PartialEq)]
pub enum Emitted {
    Move(i32, i32),
    Scroll(i32, i32),
    Button(MouseButton, bool),
    Key(Keyboard, bool),
    Rumble(u16, u16, Duration),
}

/// Shared log of emitted outputs
#[derive(Debug, Clone, Default)]
pub struct Recorder {
    events: Arc<Mutex<Vec<Emitted>>>,
}

impl Recorder {
    pub fn new() -> Self {
        Self::default()
    }

    fn push(&self, event: Emitted) {
        self.events.lock().unwrap().push(event);
    }

    /// Returns all recorded outputs
    pub fn events(&self) -> Vec<Emitted> {
        self.events.lock().unwrap().clone()
    }

    /// Returns and clears all recorded outputs
    pub fn take(&self) -> Vec<Emitted> {
        std::mem::take(&mut *self.events.lock().unwrap())
    }

    pub fn pointer(&self) -> RecordingPointer {
        RecordingPointer {
            recorder: self.clone(),
        }
    }

    pub fn keyboard(&self) -> RecordingKeyboard {
        RecordingKeyboard {
            recorder: self.clone(),
            rejected: None,
        }
    }

    pub fn haptics(&self) -> RecordingHaptics {
        RecordingHaptics {
            recorder: self.clone(),
        }
    }
}

#[derive(Debug)]
pub struct RecordingPointer {
    recorder: Recorder,
}

impl PointerTarget for RecordingPointer {
    fn move_by(&mut self, x: i32, y: i32) -> Result<(), OutputError> {
        self.recorder.push(Emitted::Move(x, y));
        Ok(())
    }

    fn scroll(&mut self, horizontal: i32, vertical: i32) -> Result<(), OutputError> {
        self.recorder.push(Emitted::Scroll(horizontal, vertical));
        Ok(())
    }

    fn button(&mut self, button: MouseButton, pressed: bool) -> Result<(), OutputError> {
        self.recorder.push(Emitted::Button(button, pressed));
        Ok(())
    }
}

#[derive(Debug)]
pub struct RecordingKeyboard {
    recorder: Recorder,
    rejected: Option<Keyboard>,
}

impl RecordingKeyboard {
    /// Fail every write of the given key without recording it
    pub fn rejecting(mut self, key: Keyboard) -> Self {
        self.rejected = Some(key);
        self
    }
}

impl KeyTarget for RecordingKeyboard {
    fn key(&mut self, key: Keyboard, pressed: bool) -> Result<(), OutputError> {
        if self.rejected == Some(key) {
            return Err(OutputError::NotSupported(key.to_string()));
        }
        self.recorder.push(Emitted::Key(key, pressed));
        Ok(())
    }
}

#[derive(Debug)]
pub struct RecordingHaptics {
    recorder: Recorder,
}

impl SourceOutputDevice for RecordingHaptics {
    fn rumble(&mut self, strong: u16, weak: u16, duration: Duration) -> Result<(), OutputError> {
        self.recorder.push(Emitted::Rumble(strong, weak, duration));
        Ok(())
    }
}

/// Source device that replays a fixed list of snapshots, then keeps
/// returning the last one. Once the script is exhausted and `unplug` was
/// set, reads fail as if the device was removed.
#[derive(Debug)]
pub struct ScriptedSource {
    script: VecDeque<RawSnapshot>,
    last: RawSnapshot,
    axis_count: usize,
    unplug: bool,
    reads: Arc<Mutex<usize>>,
}

impl ScriptedSource {
    pub fn new(axis_count: usize, script: Vec<RawSnapshot>) -> Self {
        Self {
            script: script.into(),
            last: RawSnapshot::new(vec![0; axis_count], 0),
            axis_count,
            unplug: false,
            reads: Arc::new(Mutex::new(0)),
        }
    }

    /// Fail reads once the script runs out
    pub fn unplug_after_script(mut self) -> Self {
        self.unplug = true;
        self
    }

    /// Shared counter of successful reads
    pub fn read_count(&self) -> Arc<Mutex<usize>> {
        self.reads.clone()
    }
}

impl SourceInputDevice for ScriptedSource {
    fn read(&mut self) -> Result<RawSnapshot, InputError> {
        match self.script.pop_front() {
            Some(snapshot) => self.last = snapshot,
            None if self.unplug => {
                return Err(InputError::DeviceError("device unplugged".to_string()));
            }
            None => (),
        }
        *self.reads.lock().unwrap() += 1;
        Ok(self.last.clone())
    }

    fn axis_count(&self) -> usize {
        self.axis_count
    }
}

/// A snapshot of an Xbox 360 pad at rest with the given buttons held
pub fn buttons(mask: u32) -> RawSnapshot {
    RawSnapshot::new(vec![0; 8], mask)
}

/// A snapshot of an Xbox 360 pad with the given axis deflected
pub fn axis(index: usize, value: i32) -> RawSnapshot {
    let mut snapshot = RawSnapshot::new(vec![0; 8], 0);
    snapshot.axes[index] = value;
    snapshot
}
