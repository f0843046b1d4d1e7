use std::fs;

use super::template::{generate_actions, generate_config};
use super::*;
use crate::{ActionKind, PinMode, PinScope};
use crate::orchestrator::Destination;

#[test]
fn default_config_has_expected_values() {
    // Arrange / Act
    let config = Config::default();

    // Assert
    assert!(!config.log.enabled);
    assert_eq!(config.log.level, "info");
    assert_eq!(config.retry.interval_secs, 5);
}

#[test]
fn partial_toml_uses_defaults_for_missing_sections() {
    // Arrange
    let toml_str = "[log]\nenabled = true\n";

    // Act
    let config: Config = toml::from_str(toml_str).unwrap();

    // Assert
    assert!(config.log.enabled);
    assert_eq!(config.retry.interval_secs, 5);
}

#[test]
fn validate_clamps_retry_interval() {
    // Arrange
    let mut config = Config {
        retry: RetryConfig { interval_secs: 0 },
        ..Default::default()
    };

    // Act
    config.validate();

    // Assert
    assert_eq!(config.retry.interval_secs, 1);
}

#[test]
fn missing_file_loads_as_none() {
    // Arrange
    let dir = tempfile::tempdir().unwrap();

    // Act
    let result = try_load_from(&dir.path().join("config.toml"));

    // Assert
    assert!(matches!(result, Ok(None)));
}

#[test]
fn malformed_file_reports_the_path() {
    // Arrange
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("config.toml");
    fs::write(&path, "[retry\ninterval_secs = ").unwrap();

    // Act
    let result = try_load_from(&path);

    // Assert
    let err = result.unwrap_err();
    assert!(err.contains("config.toml"));
}

#[test]
fn loaded_config_is_validated() {
    // Arrange
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("config.toml");
    fs::write(&path, "[retry]\ninterval_secs = 600\n").unwrap();

    // Act
    let config = try_load_from(&path).unwrap().unwrap();

    // Assert
    assert_eq!(config.retry.interval_secs, 60);
}

#[test]
fn generated_config_parses_to_defaults() {
    // Arrange
    let content = generate_config();

    // Act
    let config: Config = toml::from_str(&content).unwrap();

    // Assert
    assert_eq!(config.retry.interval_secs, RetryConfig::default().interval_secs);
    assert_eq!(config.log.level, "info");
}

#[test]
fn generated_actions_parse_and_normalize() {
    // Arrange
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("actions.toml");
    fs::write(&path, generate_actions()).unwrap();

    // Act
    let actions = try_load_actions_from(&path).unwrap().unwrap();

    // Assert
    assert_eq!(actions.len(), 3);
    assert_eq!(actions[1].settings.kind, ActionKind::Desktop);
    let pin = find_action(&actions, "PIN-FOCUSED").unwrap();
    let job = pin.settings.job().unwrap();
    assert!(job.target.use_foreground_window());
    assert_eq!(
        job.destination,
        Destination::Pin {
            mode: PinMode::Toggle,
            scope: PinScope::Window
        }
    );
}

#[test]
fn stored_action_settings_keep_defaults_for_omitted_keys() {
    // Arrange
    let toml_str = "[[action]]\nname = \"a\"\napplicationName = \"calc\"\n";

    // Act
    let file: ActionsFile = toml::from_str(toml_str).unwrap();

    // Assert
    let settings = &file.action[0].settings;
    assert_eq!(settings.application_name, "calc");
    assert_eq!(settings.retry_attempts, "12");
    assert_eq!(settings.width, "1500");
}
