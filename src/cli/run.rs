use std::error::Error;
use std::path::PathBuf;

use tabled::settings::{Panel, Style};
use tabled::{Table, Tabled};
use tokio_util::sync::CancellationToken;

use crate::config::{InputProfile, ProfileError};
use crate::input::manager::Manager;
use crate::input::poller::PollerExit;
use crate::input::source::evdev::{gamepad::GamepadEventDevice, rumble::RumbleDevice};
use crate::input::source::SourceInputDevice;
use crate::input::target::{keyboard::KeyboardDevice, mouse::MouseDevice};

use super::device::prompt_device;
use super::profile::load_profile;

/// Button names for each bit of an Xbox 360 style button mask
const BUTTON_NAMES: [&str; 11] = [
    "A",
    "B",
    "X",
    "Y",
    "LB",
    "RB",
    "Select",
    "Start",
    "Guide",
    "Left Stick",
    "Right Stick",
];

#[derive(Tabled)]
struct ControlRow {
    #[tabled(rename = "Input")]
    input: String,
    #[tabled(rename = "Output")]
    output: String,
}

pub async fn handle_run(
    device: Option<PathBuf>,
    profile: Option<PathBuf>,
) -> Result<(), Box<dyn Error + Send + Sync>> {
    let profile = load_profile(profile)?;
    let path = match device {
        Some(path) => path,
        None => prompt_device()?,
    };

    let source = GamepadEventDevice::new(&path)?;
    log::info!("Using gamepad '{}' at {}", source.name(), source.path());
    check_profile(&profile, &source)?;

    let haptics = match profile.haptics {
        Some(_) => match RumbleDevice::new(&path) {
            Ok(device) if device.is_supported() => Some(device),
            Ok(_) => None,
            Err(e) => {
                log::warn!("Unable to open gamepad for rumble: {e}");
                None
            }
        },
        None => None,
    };

    let pointer = MouseDevice::new()?;
    let keyboard = KeyboardDevice::new(&profile.declared_keys())?;

    println!("{}", legend(&profile));

    // Setup CTRL+C handler
    let token = CancellationToken::new();
    let shutdown = token.clone();
    tokio::spawn(async move {
        if let Err(e) = tokio::signal::ctrl_c().await {
            log::error!("Unable to listen for shutdown signal: {e}");
        }
        log::info!("Shutting down");
        shutdown.cancel();
    });

    let manager = Manager::new(profile);
    match manager.run(source, haptics, pointer, keyboard, token).await? {
        PollerExit::ReadFailed(e) => Err(format!("Gamepad stopped responding: {e}").into()),
        PollerExit::Cancelled | PollerExit::ReceiverClosed => Ok(()),
    }
}

/// Check the profile against the opened gamepad before any virtual device
/// is created
pub fn check_profile<S: SourceInputDevice>(
    profile: &InputProfile,
    source: &S,
) -> Result<(), ProfileError> {
    profile.validate(source.axis_count()).inspect_err(|e| {
        log::error!("Profile '{}' does not fit this gamepad: {e}", profile.name);
    })
}

/// Returns a human readable name for the buttons in the given mask
pub fn mask_name(mask: u32) -> String {
    (0..u32::BITS)
        .filter(|bit| mask & (1 << bit) != 0)
        .map(|bit| match BUTTON_NAMES.get(bit as usize) {
            Some(name) => name.to_string(),
            None => format!("Button {bit}"),
        })
        .collect::<Vec<String>>()
        .join(" + ")
}

/// Build a table describing what every control does with the given profile
pub fn legend(profile: &InputProfile) -> Table {
    let mut rows = vec![
        ControlRow {
            input: format!("Axes {} / {}", profile.movement.x, profile.movement.y),
            output: "Move pointer".to_string(),
        },
        ControlRow {
            input: format!("Axis {}", profile.speed.axis),
            output: "Pointer speed".to_string(),
        },
        ControlRow {
            input: format!("Axes {} / {}", profile.scroll.x, profile.scroll.y),
            output: "Scroll".to_string(),
        },
        ControlRow {
            input: format!("Axes {} / {}", profile.dpad.x, profile.dpad.y),
            output: "Arrow keys".to_string(),
        },
        ControlRow {
            input: mask_name(profile.mouse.left),
            output: "Left click".to_string(),
        },
        ControlRow {
            input: mask_name(profile.mouse.right),
            output: "Right click".to_string(),
        },
        ControlRow {
            input: format!(
                "{} + {}",
                mask_name(profile.mouse.left),
                mask_name(profile.mouse.right)
            ),
            output: "Middle click".to_string(),
        },
    ];
    rows.extend(profile.keys.iter().map(|binding| ControlRow {
        input: mask_name(binding.mask),
        output: binding.key.to_string(),
    }));
    rows.push(ControlRow {
        input: format!(
            "{} + {}",
            mask_name(profile.toggle.left),
            mask_name(profile.toggle.right)
        ),
        output: "Enable / disable".to_string(),
    });

    let mut table = Table::new(rows);
    table
        .with(Style::modern_rounded())
        .with(Panel::header(profile.name.clone()));
    table
}
