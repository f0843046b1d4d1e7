use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use tracing::warn;

use super::{ActionsFile, Config, NamedAction};

/// Returns the config directory: `~/.config/winmover/`.
pub fn config_dir() -> Option<PathBuf> {
    dirs::home_dir().map(|h| h.join(".config").join("winmover"))
}

/// Returns the config file path: `~/.config/winmover/config.toml`.
pub fn config_path() -> Option<PathBuf> {
    config_dir().map(|d| d.join("config.toml"))
}

/// Returns the stored actions path: `~/.config/winmover/actions.toml`.
pub fn actions_path() -> Option<PathBuf> {
    config_dir().map(|d| d.join("actions.toml"))
}

/// Returns the log directory: `~/.config/winmover/logs/`.
pub fn logs_dir() -> Option<PathBuf> {
    config_dir().map(|d| d.join("logs"))
}

/// Returns where the elevated runner bundle is written.
pub fn runner_bundle_path() -> Option<PathBuf> {
    config_dir().map(|d| d.join("runner.toml"))
}

/// Reads a file, mapping "not found" to `None`.
fn read(path: &Path) -> Result<Option<String>, String> {
    match std::fs::read_to_string(path) {
        Ok(content) => Ok(Some(content)),
        Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
        Err(e) => Err(format!("{}: {e}", path.display())),
    }
}

/// Tries to load and parse a config file.
///
/// Returns `Ok(None)` when the file does not exist.
pub fn try_load_from(path: &Path) -> Result<Option<Config>, String> {
    let Some(content) = read(path)? else {
        return Ok(None);
    };
    let mut config: Config =
        toml::from_str(&content).map_err(|e| format!("{}: {e}", path.display()))?;
    config.validate();
    Ok(Some(config))
}

/// Loads the configuration from disk, falling back to defaults.
///
/// After loading, values are clamped to safe ranges via [`Config::validate`].
pub fn load() -> Config {
    load_or_default(config_path(), try_load_from, Config::default)
}

/// Tries to load and parse an actions file.
pub fn try_load_actions_from(path: &Path) -> Result<Option<Vec<NamedAction>>, String> {
    let Some(content) = read(path)? else {
        return Ok(None);
    };
    let file: ActionsFile =
        toml::from_str(&content).map_err(|e| format!("{}: {e}", path.display()))?;
    Ok(Some(
        file.action
            .into_iter()
            .map(|mut a| {
                a.settings = a.settings.normalized();
                a
            })
            .collect(),
    ))
}

/// Loads stored actions from `~/.config/winmover/actions.toml`.
pub fn load_actions() -> Vec<NamedAction> {
    load_or_default(actions_path(), try_load_actions_from, Vec::new)
}

/// Loads a config value from disk, falling back to defaults.
///
/// Missing files silently return defaults; other errors are logged.
fn load_or_default<T>(
    path: Option<PathBuf>,
    try_load: impl FnOnce(&Path) -> Result<Option<T>, String>,
    default: impl Fn() -> T,
) -> T {
    let Some(path) = path else {
        warn!("could not determine home directory, using defaults");
        return default();
    };
    match try_load(&path) {
        Ok(Some(val)) => val,
        Ok(None) => default(),
        Err(e) => {
            warn!("{e}");
            default()
        }
    }
}
