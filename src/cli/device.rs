use std::error::Error;
use std::io::{self, BufRead, Write};
use std::path::PathBuf;

use tabled::settings::{Panel, Style};
use tabled::{Table, Tabled};

use crate::input::source::evdev::{list_gamepads, GamepadInfo};

#[derive(Tabled)]
struct GamepadRow {
    #[tabled(rename = "Index")]
    index: usize,
    #[tabled(rename = "Path")]
    path: String,
    #[tabled(rename = "Name")]
    name: String,
    #[tabled(rename = "Axes")]
    axes: usize,
    #[tabled(rename = "Buttons")]
    buttons: usize,
    #[tabled(rename = "Rumble")]
    rumble: bool,
}

fn gamepad_table(gamepads: &[GamepadInfo]) -> Table {
    let rows = gamepads.iter().enumerate().map(|(index, gamepad)| GamepadRow {
        index,
        path: gamepad.path.display().to_string(),
        name: gamepad.name.clone(),
        axes: gamepad.axis_count,
        buttons: gamepad.button_count,
        rumble: gamepad.force_feedback,
    });
    let mut table = Table::new(rows);
    table
        .with(Style::modern_rounded())
        .with(Panel::header("Gamepads"));
    table
}

pub fn handle_devices() -> Result<(), Box<dyn Error + Send + Sync>> {
    let gamepads = list_gamepads();
    let count = gamepads.len();
    println!("{}", gamepad_table(&gamepads));
    println!("Found {count} gamepad(s)");
    Ok(())
}

/// Ask the user which attached gamepad to use
pub fn prompt_device() -> Result<PathBuf, Box<dyn Error + Send + Sync>> {
    let gamepads = list_gamepads();
    if gamepads.is_empty() {
        return Err("No gamepads found. Is the controller plugged in?".into());
    }
    println!("{}", gamepad_table(&gamepads));

    let stdin = io::stdin();
    let mut input = stdin.lock();
    loop {
        print!("Select a gamepad [0-{}]: ", gamepads.len() - 1);
        io::stdout().flush()?;

        let mut line = String::new();
        if input.read_line(&mut line)? == 0 {
            return Err("No gamepad selected".into());
        }
        match parse_selection(line.trim(), gamepads.len()) {
            Some(index) => return Ok(gamepads[index].path.clone()),
            None => println!("Invalid selection: '{}'", line.trim()),
        }
    }
}

/// Parse a selected index, returning None if it is not a valid choice
pub fn parse_selection(input: &str, count: usize) -> Option<usize> {
    input.parse::<usize>().ok().filter(|index| *index < count)
}
