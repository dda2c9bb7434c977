#[cfg(test)]
pub mod cli_test;

pub mod device;
pub mod profile;
pub mod run;

use std::error::Error;
use std::path::PathBuf;

use clap::{Parser, Subcommand};
use device::handle_devices;
use profile::handle_profile;
use run::handle_run;

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
pub struct Args {
    #[command(subcommand)]
    pub cmd: Option<Commands>,
}

#[derive(Subcommand, Debug, Clone)]
pub enum Commands {
    /// Control the mouse and keyboard with a gamepad (default)
    Run {
        /// Path to the gamepad event device (e.g. /dev/input/event12). If
        /// omitted, the attached gamepads are listed to choose from.
        #[arg(long, short)]
        device: Option<PathBuf>,
        /// Path to an input profile to use instead of the built-in one
        #[arg(long, short)]
        profile: Option<PathBuf>,
    },
    /// List attached gamepads
    Devices,
    /// Print an input profile as YAML
    Profile {
        /// Path to an input profile to validate and print
        #[arg(long, short)]
        profile: Option<PathBuf>,
    },
}

pub async fn main_cli(args: Args) -> Result<(), Box<dyn Error + Send + Sync>> {
    let cmd = args.cmd.unwrap_or(Commands::Run {
        device: None,
        profile: None,
    });

    match cmd {
        Commands::Run { device, profile } => handle_run(device, profile).await?,
        Commands::Devices => handle_devices()?,
        Commands::Profile { profile } => handle_profile(profile)?,
    }

    Ok(())
}
