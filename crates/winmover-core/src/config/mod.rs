mod loader;
pub mod template;

use serde::{Deserialize, Serialize};

use crate::ActionSettings;
use crate::log::LogConfig;

pub use loader::{
    actions_path, config_dir, config_path, load, load_actions, logs_dir, runner_bundle_path,
    try_load_actions_from, try_load_from,
};

/// Top-level configuration for winmover.
///
/// Loaded from `~/.config/winmover/config.toml`. Missing sections
/// fall back to defaults thanks to `#[serde(default)]`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub log: LogConfig,
    pub retry: RetryConfig,
}

/// Retry timer settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RetryConfig {
    /// Seconds between retries while a target has not appeared.
    pub interval_secs: u64,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self { interval_secs: 5 }
    }
}

impl Config {
    /// Clamps values to safe ranges.
    pub fn validate(&mut self) {
        self.retry.interval_secs = self.retry.interval_secs.clamp(1, 60);
    }
}

/// A stored action that can be replayed by name.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NamedAction {
    pub name: String,
    #[serde(flatten)]
    pub settings: ActionSettings,
}

/// Wrapper for deserializing the actions file.
///
/// The file contains a top-level `[[action]]` array of tables.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub(crate) struct ActionsFile {
    #[serde(default)]
    action: Vec<NamedAction>,
}

/// Finds a stored action by name, case-insensitively.
pub fn find_action<'a>(actions: &'a [NamedAction], name: &str) -> Option<&'a NamedAction> {
    actions.iter().find(|a| a.name.eq_ignore_ascii_case(name))
}

#[cfg(test)]
mod tests;
