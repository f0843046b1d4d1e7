//! Persisted action settings as sent by the host.
//!
//! Numeric fields arrive as strings and are parsed when a job is built,
//! so a bad value is reported as a configuration error at trigger time
//! rather than rejecting the whole payload.

use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::orchestrator::{Destination, Job};
use crate::{ConfigError, PinMode, PinScope, ResizeMode, TargetSpec, TransformRequest};

/// Which kind of destination an action drives.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ActionKind {
    #[default]
    Move,
    Desktop,
    Pin,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ActionSettings {
    pub kind: ActionKind,

    pub application_name: String,
    pub app_specific: bool,
    pub app_current: bool,
    pub filter_location: bool,
    pub location_filter: String,
    pub filter_title: bool,
    pub title_filter: String,
    pub retry_attempts: String,

    pub screen: String,
    pub screen_friendly_name: bool,
    pub x_position: String,
    pub y_position: String,
    pub height: String,
    pub width: String,
    pub no_resize: bool,
    pub resize_window: bool,
    pub maximize_window: bool,
    pub minimize_window: bool,
    pub only_topmost: bool,
    pub topmost_window: bool,
    pub move_admin_window: bool,

    pub desktop_name: String,

    pub mode_pin: bool,
    pub mode_unpin: bool,
    pub mode_pin_toggle: bool,
    pub pin_scope: PinScope,
}

impl Default for ActionSettings {
    fn default() -> Self {
        Self {
            kind: ActionKind::Move,
            application_name: String::new(),
            app_specific: true,
            app_current: false,
            filter_location: false,
            location_filter: String::new(),
            filter_title: false,
            title_filter: String::new(),
            retry_attempts: "12".into(),
            screen: String::new(),
            screen_friendly_name: true,
            x_position: "0".into(),
            y_position: "0".into(),
            height: "900".into(),
            width: "1500".into(),
            no_resize: true,
            resize_window: false,
            maximize_window: false,
            minimize_window: false,
            only_topmost: false,
            topmost_window: false,
            move_admin_window: false,
            desktop_name: String::new(),
            mode_pin: true,
            mode_unpin: false,
            mode_pin_toggle: false,
            pin_scope: PinScope::Application,
        }
    }
}

impl ActionSettings {
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str::<Self>(json).map(Self::normalized)
    }

    pub fn from_toml(content: &str) -> Result<Self, toml::de::Error> {
        toml::from_str::<Self>(content).map(Self::normalized)
    }

    /// Applies the consistency rules between related settings.
    pub fn normalized(mut self) -> Self {
        if !self.app_specific && !self.app_current {
            self.app_specific = true;
        }
        if self.only_topmost {
            self.topmost_window = true;
        }
        if self.move_admin_window {
            self.retry_attempts = "0".into();
        }
        if self.retry_attempts.trim().parse::<u32>().is_err() {
            warn!("invalid retryAttempts {:?}, retries disabled", self.retry_attempts);
            self.retry_attempts = "0".into();
        }
        self
    }

    /// Retry budget; unparseable values disable retries.
    pub fn retry_attempts(&self) -> u32 {
        if self.move_admin_window {
            return 0;
        }
        self.retry_attempts.trim().parse().unwrap_or(0)
    }

    pub fn target(&self) -> Result<TargetSpec, ConfigError> {
        if !self.app_specific && self.app_current {
            return Ok(TargetSpec::foreground());
        }

        let name = self.application_name.trim();
        if name.is_empty() {
            return Err(ConfigError::MissingApplication);
        }

        let mut spec = TargetSpec::process(name);
        if self.filter_location && !self.location_filter.is_empty() {
            spec = spec.with_location(self.location_filter.clone());
        }
        if self.filter_title && !self.title_filter.is_empty() {
            spec = spec.with_title(self.title_filter.clone());
        }
        Ok(spec)
    }

    /// Builds the transform from position, resize and topmost fields.
    pub fn transform_request(&self) -> Result<TransformRequest, ConfigError> {
        let x = parse_number("xPosition", &self.x_position)?;
        let y = parse_number("yPosition", &self.y_position)?;

        let resize_mode = if self.resize_window {
            ResizeMode::ResizeTo {
                height: parse_number("height", &self.height)?,
                width: parse_number("width", &self.width)?,
            }
        } else if self.maximize_window {
            ResizeMode::Maximize
        } else if self.minimize_window {
            ResizeMode::Minimize
        } else if self.only_topmost {
            ResizeMode::OnlyTopmost
        } else {
            ResizeMode::NoResize
        };

        Ok(TransformRequest {
            destination_point: (x, y),
            resize_mode,
            make_topmost: self.topmost_window || self.only_topmost,
        })
    }

    pub fn pin_mode(&self) -> PinMode {
        if self.mode_pin_toggle {
            PinMode::Toggle
        } else if self.mode_unpin {
            PinMode::Unpin
        } else {
            PinMode::Pin
        }
    }

    pub fn destination(&self) -> Result<Destination, ConfigError> {
        match self.kind {
            ActionKind::Move => {
                let key = self.screen.trim();
                if key.is_empty() {
                    return Err(ConfigError::MissingScreen);
                }
                Ok(Destination::Screen {
                    key: key.to_string(),
                    request: self.transform_request()?,
                })
            }
            ActionKind::Desktop => {
                let name = self.desktop_name.trim();
                if name.is_empty() {
                    return Err(ConfigError::MissingDesktop);
                }
                Ok(Destination::Desktop {
                    name: name.to_string(),
                })
            }
            ActionKind::Pin => Ok(Destination::Pin {
                mode: self.pin_mode(),
                scope: self.pin_scope,
            }),
        }
    }

    /// Builds a validated job ready for the orchestrator.
    pub fn job(&self) -> Result<Job, ConfigError> {
        // Destination first: a missing screen is reported before a missing app.
        let destination = self.destination()?;
        let job = Job {
            target: self.target()?,
            destination,
        };
        job.validate()?;
        Ok(job)
    }
}

fn parse_number(field: &'static str, value: &str) -> Result<i32, ConfigError> {
    let value = value.trim();
    if value.is_empty() {
        return Err(ConfigError::MissingField { field });
    }
    value.parse().map_err(|_| ConfigError::InvalidNumber {
        field,
        value: value.to_string(),
    })
}

#[cfg(test)]
#[path = "settings_tests.rs"]
mod tests;
