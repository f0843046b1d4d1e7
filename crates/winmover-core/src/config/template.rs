/// Generates the default `config.toml` contents with explanatory comments.
///
/// Used by `winmover init` to create a starter file.
pub fn generate_config() -> String {
    r##"# winmover configuration
# Location: ~/.config/winmover/config.toml

[log]
# Write a log file to ~/.config/winmover/logs/winmover.log.
enabled = false
# Minimum level: "debug", "info", "warn" or "error".
level = "info"

[retry]
# Seconds between retries while a target process has not started (1 to 60).
interval_secs = 5
"##
    .to_string()
}

/// Generates a starter `actions.toml` with one example of each kind.
pub fn generate_actions() -> String {
    r##"# winmover stored actions
# Location: ~/.config/winmover/actions.toml
# Run one with: winmover run <name>
# List monitor keys with: winmover debug monitors

[[action]]
name = "notepad-right"
kind = "move"
applicationName = "notepad"
# Unique monitor key: friendly|serial|instance.
screen = ""
xPosition = "0"
yPosition = "0"
resizeWindow = true
noResize = false
height = "900"
width = "1500"
retryAttempts = "12"

[[action]]
name = "slack-to-chat"
kind = "desktop"
applicationName = "slack"
# First desktop whose name contains this text (case-insensitive).
desktopName = "Chat"
retryAttempts = "12"

[[action]]
name = "pin-focused"
kind = "pin"
appSpecific = false
appCurrent = true
modePinToggle = true
pinScope = "window"
retryAttempts = "0"
"##
    .to_string()
}
