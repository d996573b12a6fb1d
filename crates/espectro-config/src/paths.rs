//! Platform-specific configuration paths.
//!
//! | Platform | Config directory |
//! |----------|------------------|
//! | Linux | `~/.config/espectro/` |
//! | macOS | `~/Library/Application Support/espectro/` |
//! | Windows | `%APPDATA%\espectro\` |
//!
//! Profiles saved by the user live in a `profiles/` subdirectory.

use std::fs;
use std::path::{Path, PathBuf};

use crate::error::ConfigError;

/// Application name used for directory paths.
pub const APP_NAME: &str = "espectro";

/// File name searched for by [`find_config`].
pub const CONFIG_FILE: &str = "espectro.toml";

/// Profile file extension.
pub const PROFILE_EXTENSION: &str = "toml";

/// User configuration directory, `.` when the platform has none.
pub fn user_config_dir() -> PathBuf {
    dirs::config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(APP_NAME)
}

/// Path of the user-level `espectro.toml`.
pub fn user_config_file() -> PathBuf {
    user_config_dir().join(CONFIG_FILE)
}

/// Directory holding user-saved profiles.
pub fn user_profiles_dir() -> PathBuf {
    user_config_dir().join("profiles")
}

/// Create the user profiles directory if needed and return it.
pub fn ensure_user_profiles_dir() -> Result<PathBuf, ConfigError> {
    let dir = user_profiles_dir();
    fs::create_dir_all(&dir).map_err(|e| ConfigError::create_dir(&dir, e))?;
    Ok(dir)
}

/// Locate the active configuration file.
///
/// Looks for `./espectro.toml` first, then the user configuration
/// directory. Returns `None` when neither exists.
pub fn find_config() -> Option<PathBuf> {
    find_config_in(Path::new("."), &user_config_dir())
}

/// [`find_config`] with explicit search roots.
pub fn find_config_in(working_dir: &Path, user_dir: &Path) -> Option<PathBuf> {
    [working_dir.join(CONFIG_FILE), user_dir.join(CONFIG_FILE)]
        .into_iter()
        .find(|path| path.is_file())
}

/// Resolve a profile name or path to an existing file.
///
/// A name containing a path separator or ending in `.toml` is treated as a
/// path. Otherwise the user profiles directory is searched for
/// `<name>.toml`.
pub fn find_profile(name: &str) -> Option<PathBuf> {
    find_profile_in(name, &user_profiles_dir())
}

/// [`find_profile`] with an explicit profiles directory.
pub fn find_profile_in(name: &str, profiles_dir: &Path) -> Option<PathBuf> {
    let as_path = Path::new(name);
    if name.contains(std::path::MAIN_SEPARATOR)
        || name.contains('/')
        || as_path.extension().is_some_and(|ext| ext == PROFILE_EXTENSION)
    {
        return as_path.is_file().then(|| as_path.to_path_buf());
    }

    let path = profiles_dir.join(format!("{name}.{PROFILE_EXTENSION}"));
    path.is_file().then_some(path)
}

/// Names of the `.toml` files in `dir`, sorted. Missing directories yield
/// an empty list.
pub fn list_profiles_in(dir: &Path) -> Vec<String> {
    let Ok(entries) = fs::read_dir(dir) else {
        return Vec::new();
    };
    let mut names: Vec<String> = entries
        .filter_map(|entry| entry.ok())
        .map(|entry| entry.path())
        .filter(|path| path.extension().is_some_and(|ext| ext == PROFILE_EXTENSION))
        .filter_map(|path| path.file_stem().map(|s| s.to_string_lossy().into_owned()))
        .collect();
    names.sort();
    names
}

/// Names of the profiles in the user profiles directory.
pub fn list_user_profiles() -> Vec<String> {
    list_profiles_in(&user_profiles_dir())
}
