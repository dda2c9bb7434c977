use std::{
    error::Error,
    path::{Path, PathBuf},
};

use crate::config::{InputProfile, PROFILE_DIR};

/// Resolve a profile argument. Bare names (e.g. `xbox360`) refer to the
/// profiles installed in [PROFILE_DIR].
pub fn resolve_profile_path(path: PathBuf) -> PathBuf {
    if path.exists() || path.components().count() > 1 {
        return path;
    }
    let mut installed = Path::new(PROFILE_DIR).join(&path);
    if installed.extension().is_none() {
        installed.set_extension("yaml");
    }
    if installed.exists() {
        return installed;
    }
    path
}

/// Load the input profile at the given path, or the built-in profile
pub fn load_profile(path: Option<PathBuf>) -> Result<InputProfile, Box<dyn Error + Send + Sync>> {
    let Some(path) = path else {
        log::debug!("Using built-in input profile");
        return Ok(InputProfile::default());
    };
    let path = resolve_profile_path(path);
    log::debug!("Loading input profile: {}", path.display());
    let profile = InputProfile::from_yaml_file(&path)
        .map_err(|e| format!("Unable to load profile '{}': {e}", path.display()))?;
    Ok(profile)
}

pub fn handle_profile(path: Option<PathBuf>) -> Result<(), Box<dyn Error + Send + Sync>> {
    let profile = load_profile(path)?;
    // Axis indices can only be checked against a real device
    profile.validate(usize::MAX)?;
    print!("{}", profile.to_yaml()?);
    Ok(())
}
