//! Resolve targets, resolve the destination, transform every match.

use std::fmt;
use std::sync::Arc;

use tracing::{error, info, warn};

use crate::desktop::{PinMode, PinScope};
use crate::{
    ActionError, ConfigError, ProcessWindowLocator, ResizeMode, RetryScheduler, ScreenResolver,
    TargetSpec, TransformRequest, VirtualDesktopController, WindowTransformer,
};

/// Where matched windows go.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Destination {
    /// Move to a monitor identified by its unique key.
    Screen {
        key: String,
        request: TransformRequest,
    },
    /// Move to the first virtual desktop whose name contains `name`.
    Desktop { name: String },
    /// Pin or unpin across all virtual desktops.
    Pin { mode: PinMode, scope: PinScope },
}

/// One triggered action: what to target and what to do with it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Job {
    pub target: TargetSpec,
    pub destination: Destination,
}

impl Job {
    /// Retry identity: the same target sent to the same kind of
    /// destination shares one retry slot.
    pub fn key(&self) -> String {
        let kind = match &self.destination {
            Destination::Screen { key, .. } => format!("screen:{key}"),
            Destination::Desktop { name } => format!("desktop:{name}"),
            Destination::Pin { .. } => "pin".to_string(),
        };
        format!("{kind}/{}", self.target.key())
    }

    /// Rejects jobs that cannot run, before any OS interaction.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.target.app_specific
            && self
                .target
                .process_name
                .as_deref()
                .is_none_or(|n| n.trim().is_empty())
        {
            return Err(ConfigError::MissingApplication);
        }
        match &self.destination {
            Destination::Screen { key, request } => {
                if key.trim().is_empty() {
                    return Err(ConfigError::MissingScreen);
                }
                if let ResizeMode::ResizeTo { height, width } = request.resize_mode {
                    if height <= 0 {
                        return Err(ConfigError::NonPositive {
                            field: "height",
                            value: height,
                        });
                    }
                    if width <= 0 {
                        return Err(ConfigError::NonPositive {
                            field: "width",
                            value: width,
                        });
                    }
                }
            }
            Destination::Desktop { name } if name.trim().is_empty() => {
                return Err(ConfigError::MissingDesktop);
            }
            _ => {}
        }
        Ok(())
    }
}

impl fmt::Display for Job {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.destination {
            Destination::Screen { key, request } => {
                write!(f, "{} -> screen {key:?} ({request})", self.target)
            }
            Destination::Desktop { name } => write!(f, "{} -> desktop {name:?}", self.target),
            Destination::Pin { mode, scope } => {
                write!(f, "{} -> {mode:?} {scope:?}", self.target)
            }
        }
    }
}

/// The services a resolution pass needs, shared with retry timers.
struct Engine {
    locator: ProcessWindowLocator,
    transformer: WindowTransformer,
    screens: ScreenResolver,
    desktops: VirtualDesktopController,
}

impl Engine {
    /// Runs one resolve-and-transform pass.
    ///
    /// Returns how many windows were successfully affected. Per-window
    /// failures are logged and do not stop the batch.
    fn run(&self, job: &Job) -> Result<usize, ActionError> {
        job.validate()?;
        info!("running {job}");

        match &job.destination {
            Destination::Screen { key, request } => {
                let screen = self
                    .screens
                    .resolve_screen(key)
                    .ok_or_else(|| ActionError::ScreenNotFound(key.clone()))?;
                let matches = self.locator.locate(&job.target);
                let moved = matches
                    .matched
                    .iter()
                    .filter(|&&window| {
                        match self.transformer.apply(window, screen.work_area, request) {
                            Ok(()) => true,
                            Err(e) => {
                                error!("failed to transform {window}: {e}");
                                false
                            }
                        }
                    })
                    .count();
                info!("moved {moved} windows to {}", screen.device_name);
                Ok(moved)
            }
            Destination::Desktop { name } => {
                let index = match self.desktops.find_desktop_by_name(name) {
                    Ok(Some(index)) => index,
                    Ok(None) => return Err(ActionError::DesktopNotFound(name.clone())),
                    Err(e) => {
                        error!("virtual desktop lookup failed: {e}");
                        return Ok(0);
                    }
                };
                let matches = self.locator.locate(&job.target);
                let moved = matches
                    .matched
                    .iter()
                    .filter(
                        |&&window| match self.desktops.move_window_to_desktop(window, index) {
                            Ok(()) => true,
                            Err(e) => {
                                error!("failed to move {window} to desktop {index}: {e}");
                                false
                            }
                        },
                    )
                    .count();
                info!("moved {moved} windows to desktop {index}");
                Ok(moved)
            }
            Destination::Pin { mode, scope } => {
                let matches = self.locator.locate(&job.target);
                let pinned = matches
                    .matched
                    .iter()
                    .filter(
                        |&&window| match self.desktops.apply_pin(window, *mode, *scope) {
                            Ok(_) => true,
                            Err(e) => {
                                error!("failed to change pin state of {window}: {e}");
                                false
                            }
                        },
                    )
                    .count();
                Ok(pinned)
            }
        }
    }
}

/// Entry point for triggered actions.
///
/// Owns the engine services and the retry scheduler; constructed once by
/// the host and shared by every trigger.
pub struct MoveOrchestrator {
    engine: Arc<Engine>,
    retry: RetryScheduler,
}

impl MoveOrchestrator {
    pub fn new(
        locator: ProcessWindowLocator,
        transformer: WindowTransformer,
        screens: ScreenResolver,
        desktops: VirtualDesktopController,
        retry: RetryScheduler,
    ) -> Self {
        Self {
            engine: Arc::new(Engine {
                locator,
                transformer,
                screens,
                desktops,
            }),
            retry,
        }
    }

    pub fn locator(&self) -> &ProcessWindowLocator {
        &self.engine.locator
    }

    pub fn transformer(&self) -> &WindowTransformer {
        &self.engine.transformer
    }

    pub fn screens(&self) -> &ScreenResolver {
        &self.engine.screens
    }

    pub fn desktops(&self) -> &VirtualDesktopController {
        &self.engine.desktops
    }

    /// Runs a single pass with no retry.
    pub fn invoke(&self, job: &Job) -> Result<usize, ActionError> {
        self.engine.run(job)
    }

    /// Runs a pass and applies the retry policy.
    ///
    /// A match cancels any pending retry for the job. No match starts a
    /// retry timer with `retry_attempts` budget unless one is already
    /// pending. Errors (bad settings, missing destination) are returned
    /// for the host to alert on and never start a retry.
    pub fn trigger(&self, job: &Job, retry_attempts: u32) -> Result<usize, ActionError> {
        let matched = self.engine.run(job)?;
        let key = job.key();

        if matched > 0 {
            self.retry.cancel(&key);
            return Ok(matched);
        }

        let engine = self.engine.clone();
        let retry_job = job.clone();
        let scheduled = self.retry.schedule(&key, retry_attempts, move || {
            engine.run(&retry_job).unwrap_or_else(|e| {
                warn!("retry of {retry_job} failed: {e}");
                0
            })
        });
        if scheduled {
            info!(
                "no windows matched {}; retrying every {:?}",
                job.target,
                self.retry.interval()
            );
        }
        Ok(0)
    }

    pub fn is_retry_pending(&self, job: &Job) -> bool {
        self.retry.is_scheduled(&job.key())
    }

    pub fn cancel_retry(&self, job: &Job) -> bool {
        self.retry.cancel(&job.key())
    }

    /// Blocks until the job has no pending retry.
    pub fn wait(&self, job: &Job) {
        self.retry.wait(&job.key());
    }
}

#[cfg(test)]
#[path = "orchestrator_tests.rs"]
mod tests;
