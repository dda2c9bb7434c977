use std::collections::BTreeSet;
use std::time::{Duration, Instant};

use tokio_util::sync::CancellationToken;

use crate::config::{HapticsConfig, InputProfile, TimingConfig, MAX_INTERVAL_MS};
use crate::input::capability::{Capability, MouseButton};
use crate::input::source::SourceOutputDevice;
use crate::input::state::{ControlState, StateReader};
use crate::input::target::{KeyTarget, PointerTarget};

/// Longest toggle cooldown an [Instant] is advanced by
const MAX_COOLDOWN: Duration = Duration::from_millis(MAX_INTERVAL_MS);

/// Mouse button outcome for the held state of the left and right buttons.
/// Holding both at once is a middle click and suppresses left and right.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ButtonChord {
    Middle,
    LeftOnly,
    RightOnly,
    None,
}

impl ButtonChord {
    pub fn classify(left: bool, right: bool) -> Self {
        match (left, right) {
            (true, true) => ButtonChord::Middle,
            (true, false) => ButtonChord::LeftOnly,
            (false, true) => ButtonChord::RightOnly,
            (false, false) => ButtonChord::None,
        }
    }
}

/// Result of a single synthesizer tick
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TickOutcome {
    /// Output was emitted for the current state
    Emitted,
    /// The enable chord flipped emulation on or off
    Toggled { enabled: bool },
    /// A toggle happened recently and processing is suspended
    CoolingDown,
    /// Emulation is off; nothing was emitted
    Disabled,
}

/// Turns the shared [ControlState] into virtual pointer, keyboard and
/// haptic output on a fixed tick. Every press it emits is tracked so that
/// all held outputs can be released when it stops.
pub struct Synthesizer<P: PointerTarget, K: KeyTarget, H: SourceOutputDevice> {
    pointer: P,
    keyboard: K,
    haptics: Option<H>,
    haptics_config: Option<HapticsConfig>,
    haptics_armed: bool,
    timing: TimingConfig,
    enabled: bool,
    cooldown_until: Option<Instant>,
    last_scroll: (Option<Instant>, Option<Instant>),
    held: BTreeSet<Capability>,
}

impl<P: PointerTarget, K: KeyTarget, H: SourceOutputDevice> Synthesizer<P, K, H> {
    /// Create a new synthesizer. Emulation starts enabled.
    pub fn new(pointer: P, keyboard: K, haptics: Option<H>, profile: &InputProfile) -> Self {
        Self {
            pointer,
            keyboard,
            haptics,
            haptics_config: profile.haptics,
            haptics_armed: true,
            timing: profile.timing,
            enabled: true,
            cooldown_until: None,
            last_scroll: (None, None),
            held: BTreeSet::new(),
        }
    }

    /// Returns whether emulation is currently enabled
    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    /// Returns the outputs that are currently pressed
    pub fn held(&self) -> &BTreeSet<Capability> {
        &self.held
    }

    /// Run the output loop until cancelled or until the shared state is no
    /// longer being updated. All held outputs are released before this
    /// returns.
    pub async fn run(mut self, reader: StateReader, token: CancellationToken) {
        log::debug!(
            "Started output synthesizer every {:?}",
            self.timing.output_interval()
        );
        loop {
            if reader.is_closed() {
                log::warn!("Control state is no longer updated. Stopping output.");
                break;
            }

            let state = reader.snapshot();
            let outcome = self.tick(Instant::now(), &state);
            let delay = self.delay_after(outcome);

            tokio::select! {
                _ = token.cancelled() => {
                    log::debug!("Output synthesizer cancelled");
                    break;
                }
                _ = tokio::time::sleep(delay) => {}
            }
        }
        log::debug!(
            "Output synthesizer stopped with emulation {}",
            if self.is_enabled() { "enabled" } else { "disabled" }
        );
        self.release_all();
    }

    /// Process one tick of output for the given state
    pub fn tick(&mut self, now: Instant, state: &ControlState) -> TickOutcome {
        if let Some(until) = self.cooldown_until {
            if now < until {
                return TickOutcome::CoolingDown;
            }
            self.cooldown_until = None;
        }

        if state.toggle_requested() {
            self.enabled = !self.enabled;
            // Held outputs stay as they are while disabled
            self.cooldown_until = now
                .checked_add(self.timing.toggle_cooldown())
                .or_else(|| now.checked_add(MAX_COOLDOWN));
            log::info!(
                "Emulation {}",
                if self.enabled { "enabled" } else { "disabled" }
            );
            return TickOutcome::Toggled {
                enabled: self.enabled,
            };
        }

        if !self.enabled {
            return TickOutcome::Disabled;
        }

        self.emit_buttons(state);
        self.emit_keys(state);
        self.emit_motion(state);
        self.emit_scroll(now, state);

        TickOutcome::Emitted
    }

    /// Release every output this synthesizer has pressed
    pub fn release_all(&mut self) {
        if self.held.is_empty() {
            return;
        }
        log::debug!("Releasing held outputs: {:?}", self.held());
        let held = std::mem::take(&mut self.held);
        for capability in held {
            let result = match capability {
                Capability::Keyboard(key) => self.keyboard.key(key, false),
                Capability::Mouse(button) => self.pointer.button(button, false),
            };
            if let Err(e) = result {
                log::warn!("Failed to release {capability}: {e}");
            }
        }
    }

    /// How long to wait before the next tick
    fn delay_after(&self, outcome: TickOutcome) -> Duration {
        match outcome {
            TickOutcome::Toggled { .. } => self.timing.toggle_cooldown(),
            TickOutcome::Disabled => self.timing.disabled_interval(),
            TickOutcome::Emitted | TickOutcome::CoolingDown => self.timing.output_interval(),
        }
    }

    fn emit_buttons(&mut self, state: &ControlState) {
        match ButtonChord::classify(state.left_button, state.right_button) {
            ButtonChord::Middle => self.set_button(MouseButton::Middle, true),
            chord => {
                self.set_button(MouseButton::Middle, false);
                self.set_button(MouseButton::Left, chord == ButtonChord::LeftOnly);
                self.set_button(MouseButton::Right, chord == ButtonChord::RightOnly);
            }
        }
    }

    fn set_button(&mut self, button: MouseButton, pressed: bool) {
        if let Err(e) = self.pointer.button(button, pressed) {
            log::warn!("Failed to set mouse button {button:?} to {pressed}: {e}");
        }
        self.track(Capability::Mouse(button), pressed);
    }

    fn emit_keys(&mut self, state: &ControlState) {
        for (key, held) in state.keys.iter() {
            if let Err(e) = self.keyboard.key(*key, *held) {
                log::warn!("Failed to set key {key} to {held}: {e}");
            }
            self.track(Capability::Keyboard(*key), *held);
        }
        self.update_haptics(state);
    }

    /// Rumble once per press of the haptics key
    fn update_haptics(&mut self, state: &ControlState) {
        let Some(config) = self.haptics_config else {
            return;
        };
        let key = config.key;
        if !state.is_key_held(key) {
            self.haptics_armed = true;
            return;
        }
        if !self.haptics_armed {
            return;
        }
        self.haptics_armed = false;

        let Some(haptics) = self.haptics.as_mut() else {
            return;
        };
        log::debug!("Playing rumble for {key}");
        if let Err(e) = haptics.rumble(config.strong, config.weak, config.duration()) {
            log::warn!("Failed to play rumble: {e}");
        }
    }

    fn emit_motion(&mut self, state: &ControlState) {
        let (x, y) = pointer_delta(state.movement, state.speed_multiplier);
        if let Err(e) = self.pointer.move_by(x, y) {
            log::warn!("Failed to move pointer: {e}");
        }
    }

    fn emit_scroll(&mut self, now: Instant, state: &ControlState) {
        let (horizontal, vertical) = state.scroll;

        if scroll_due(now, self.last_scroll.0, horizontal) {
            if let Err(e) = self.pointer.scroll(horizontal.signum(), 0) {
                log::warn!("Failed to scroll horizontally: {e}");
            }
            self.last_scroll.0 = Some(now);
        }

        // Pushing the stick up scrolls up, which is a positive wheel value
        if scroll_due(now, self.last_scroll.1, vertical) {
            if let Err(e) = self.pointer.scroll(0, -vertical.signum()) {
                log::warn!("Failed to scroll vertically: {e}");
            }
            self.last_scroll.1 = Some(now);
        }
    }

    fn track(&mut self, capability: Capability, pressed: bool) {
        if pressed {
            self.held.insert(capability);
        } else {
            self.held.remove(&capability);
        }
    }
}

impl<P: PointerTarget, K: KeyTarget, H: SourceOutputDevice> Drop for Synthesizer<P, K, H> {
    fn drop(&mut self) {
        self.release_all();
    }
}

/// Pointer delta for one tick, rounded to the nearest integer
pub fn pointer_delta(movement: (f64, f64), speed: f64) -> (i32, i32) {
    (
        (movement.0 * speed).round() as i32,
        (movement.1 * speed).round() as i32,
    )
}

/// Returns true if a scroll unit should be emitted on an axis scrolling at
/// `pulses` units per second that last scrolled at `last`.
pub fn scroll_due(now: Instant, last: Option<Instant>, pulses: i32) -> bool {
    if pulses == 0 {
        return false;
    }
    let interval = Duration::from_secs(1) / pulses.unsigned_abs();
    match last {
        None => true,
        Some(last) => now.saturating_duration_since(last) > interval,
    }
}
