use clap::Parser;

use crate::cli::device::parse_selection;
use crate::cli::run::{legend, mask_name};
use crate::cli::{Args, Commands};
use crate::config::InputProfile;

#[test]
fn test_run_is_default_command() {
    let args = Args::parse_from(["padmouse"]);
    assert!(args.cmd.is_none());

    let args = Args::parse_from(["padmouse", "run", "--device", "/dev/input/event3"]);
    match args.cmd {
        Some(Commands::Run { device, profile }) => {
            assert_eq!(device, Some("/dev/input/event3".into()));
            assert_eq!(profile, None);
        }
        other => panic!("unexpected command: {other:?}"),
    }
}

#[test]
fn test_parse_selection() {
    assert_eq!(parse_selection("0", 2), Some(0));
    assert_eq!(parse_selection("1", 2), Some(1));
    assert_eq!(parse_selection("2", 2), None);
    assert_eq!(parse_selection("-1", 2), None);
    assert_eq!(parse_selection("one", 2), None);
}

#[test]
fn test_mask_name() {
    assert_eq!(mask_name(1), "A");
    assert_eq!(mask_name(512 | 1024), "Left Stick + Right Stick");
    assert_eq!(mask_name(1 << 12), "Button 12");
}

#[test]
fn test_legend_lists_bindings() {
    let legend = legend(&InputProfile::default()).to_string();
    assert!(legend.contains("Xbox 360"));
    assert!(legend.contains("KeyLeftMeta"));
    assert!(legend.contains("Guide"));
    assert!(legend.contains("Enable / disable"));
}

#[test]
fn test_resolve_profile_path_keeps_explicit_paths() {
    use std::path::PathBuf;

    use crate::cli::profile::resolve_profile_path;

    let path = PathBuf::from("./rootfs/usr/share/padmouse/profiles/xbox360.yaml");
    assert_eq!(resolve_profile_path(path.clone()), path);
    let missing = PathBuf::from("some/dir/missing.yaml");
    assert_eq!(resolve_profile_path(missing.clone()), missing);
}

#[test]
fn test_check_profile_against_gamepad() {
    use crate::cli::run::check_profile;
    use crate::config::ProfileError;
    use crate::input::testing::ScriptedSource;

    let profile = InputProfile::default();
    assert_eq!(check_profile(&profile, &ScriptedSource::new(8, vec![])), Ok(()));
    assert_eq!(
        check_profile(&profile, &ScriptedSource::new(4, vec![])),
        Err(ProfileError::AxisOutOfRange {
            name: "scroll y",
            index: 4,
            count: 4
        })
    );
}
