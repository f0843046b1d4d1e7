//! Headless single-shot execution from a file.
//!
//! An elevated copy of the process cannot receive the original trigger,
//! so the trigger is written to a flat TOML bundle and the elevated
//! process replays it once with retries disabled.

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{error, info};

use crate::orchestrator::{Destination, Job};
use crate::{ActionError, ConfigError, MoveOrchestrator, ResizeMode, TargetSpec, TransformRequest};

#[derive(Debug, Error)]
pub enum RunnerError {
    #[error("{}: {source}", path.display())]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("invalid runner bundle: {0}")]
    Parse(#[from] toml::de::Error),
    #[error("could not serialize runner bundle: {0}")]
    Serialize(#[from] toml::ser::Error),
    #[error("only screen moves can be replayed from a bundle")]
    UnsupportedDestination,
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error(transparent)]
    Action(#[from] ActionError),
}

/// How the bundle encodes the resize mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BundleResize {
    #[default]
    None,
    Resize,
    Maximize,
    Minimize,
    OnlyTopmost,
}

/// A screen move flattened to plain keys.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct RunnerBundle {
    pub app_specific: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub process_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub location_filter: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title_filter: Option<String>,
    pub screen: String,
    pub x: i32,
    pub y: i32,
    pub resize: BundleResize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub height: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub width: Option<i32>,
    pub make_topmost: bool,
}

impl RunnerBundle {
    pub fn from_job(job: &Job) -> Result<Self, RunnerError> {
        let Destination::Screen { key, request } = &job.destination else {
            return Err(RunnerError::UnsupportedDestination);
        };
        let (resize, height, width) = match request.resize_mode {
            ResizeMode::NoResize => (BundleResize::None, None, None),
            ResizeMode::Maximize => (BundleResize::Maximize, None, None),
            ResizeMode::Minimize => (BundleResize::Minimize, None, None),
            ResizeMode::OnlyTopmost => (BundleResize::OnlyTopmost, None, None),
            ResizeMode::ResizeTo { height, width } => {
                (BundleResize::Resize, Some(height), Some(width))
            }
        };
        Ok(Self {
            app_specific: job.target.app_specific,
            process_name: job.target.process_name.clone(),
            location_filter: job.target.location_filter.clone(),
            title_filter: job.target.title_filter.clone(),
            screen: key.clone(),
            x: request.destination_point.0,
            y: request.destination_point.1,
            resize,
            height,
            width,
            make_topmost: request.make_topmost,
        })
    }

    pub fn to_job(&self) -> Result<Job, ConfigError> {
        let resize_mode = match self.resize {
            BundleResize::None => ResizeMode::NoResize,
            BundleResize::Maximize => ResizeMode::Maximize,
            BundleResize::Minimize => ResizeMode::Minimize,
            BundleResize::OnlyTopmost => ResizeMode::OnlyTopmost,
            BundleResize::Resize => ResizeMode::ResizeTo {
                height: self
                    .height
                    .ok_or(ConfigError::MissingField { field: "height" })?,
                width: self
                    .width
                    .ok_or(ConfigError::MissingField { field: "width" })?,
            },
        };
        let job = Job {
            target: TargetSpec {
                app_specific: self.app_specific,
                process_name: self.process_name.clone(),
                location_filter: self.location_filter.clone(),
                title_filter: self.title_filter.clone(),
            },
            destination: Destination::Screen {
                key: self.screen.clone(),
                request: TransformRequest {
                    destination_point: (self.x, self.y),
                    resize_mode,
                    make_topmost: self.make_topmost,
                },
            },
        };
        job.validate()?;
        Ok(job)
    }

    pub fn read(path: &Path) -> Result<Self, RunnerError> {
        let content = fs::read_to_string(path).map_err(|source| RunnerError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Ok(toml::from_str(&content)?)
    }

    pub fn write(&self, path: &Path) -> Result<(), RunnerError> {
        let content = toml::to_string(self)?;
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).map_err(|source| RunnerError::Io {
                path: parent.to_path_buf(),
                source,
            })?;
        }
        fs::write(path, content).map_err(|source| RunnerError::Io {
            path: path.to_path_buf(),
            source,
        })
    }
}

/// Replays a bundle once, with no retry.
///
/// Nothing is applied unless the whole bundle is valid.
pub fn run_file(path: &Path, orchestrator: &MoveOrchestrator) -> Result<usize, RunnerError> {
    let bundle = RunnerBundle::read(path).inspect_err(|e| error!("runner: {e}"))?;
    let job = bundle.to_job().inspect_err(|e| error!("runner: {e}"))?;
    info!("runner moving {job}");
    let moved = orchestrator
        .invoke(&job)
        .inspect_err(|e| error!("runner: {e}"))?;
    Ok(moved)
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::fakes::{
        FakeDesktopBackend, FakeMonitorSource, FakeProcess, FakeProcessSource, FakeWindowOps,
        monitor,
    };
    use crate::{
        ProcessWindowLocator, Rect, RetryScheduler, ScreenResolver, VirtualDesktopController,
        WindowTransformer,
    };

    fn notepad_job() -> Job {
        Job {
            target: TargetSpec::process("notepad").with_title("Untitled"),
            destination: Destination::Screen {
                key: "DELL|ABC123|DISPLAY\\DEL\\1".into(),
                request: TransformRequest {
                    destination_point: (10, 20),
                    resize_mode: ResizeMode::ResizeTo {
                        height: 900,
                        width: 1500,
                    },
                    make_topmost: true,
                },
            },
        }
    }

    fn orchestrator(windows: Arc<FakeWindowOps>) -> MoveOrchestrator {
        let processes = Arc::new(FakeProcessSource::with(vec![FakeProcess::new(
            4,
            "notepad",
            Some(7),
            "C:\\Windows\\notepad.exe",
            "Untitled - Notepad",
        )]));
        let monitors = Arc::new(FakeMonitorSource::with(vec![(
            monitor("DELL", "ABC123", "DISPLAY\\DEL\\1", "\\\\.\\DISPLAY2"),
            Rect::new(1920, 0, 2560, 1400),
        )]));
        MoveOrchestrator::new(
            ProcessWindowLocator::new(processes),
            WindowTransformer::new(windows),
            ScreenResolver::new(monitors),
            VirtualDesktopController::new(Arc::new(FakeDesktopBackend::default())),
            RetryScheduler::default(),
        )
    }

    #[test]
    fn bundle_written_to_disk_replays_the_same_job() {
        // Arrange
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("runner.toml");
        let job = notepad_job();

        // Act
        RunnerBundle::from_job(&job).unwrap().write(&path).unwrap();
        let replayed = RunnerBundle::read(&path).unwrap().to_job().unwrap();

        // Assert
        assert_eq!(replayed, job);
    }

    #[test]
    fn bundle_is_a_flat_document() {
        // Arrange
        let bundle = RunnerBundle::from_job(&notepad_job()).unwrap();

        // Act
        let content = toml::to_string(&bundle).unwrap();

        // Assert
        assert!(content.contains("process_name = \"notepad\""));
        assert!(content.contains("resize = \"resize\""));
        assert!(!content.contains('['));
    }

    #[test]
    fn desktop_jobs_cannot_be_bundled() {
        // Arrange
        let job = Job {
            target: TargetSpec::process("notepad"),
            destination: Destination::Desktop {
                name: "Work".into(),
            },
        };

        // Act
        let result = RunnerBundle::from_job(&job);

        // Assert
        assert!(matches!(result, Err(RunnerError::UnsupportedDestination)));
    }

    #[test]
    fn resize_without_size_is_rejected() {
        // Arrange
        let bundle = RunnerBundle {
            app_specific: true,
            process_name: Some("notepad".into()),
            screen: "\\\\.\\DISPLAY1".into(),
            resize: BundleResize::Resize,
            height: Some(900),
            ..RunnerBundle::default()
        };

        // Act
        let result = bundle.to_job();

        // Assert
        assert_eq!(result, Err(ConfigError::MissingField { field: "width" }));
    }

    #[test]
    fn run_file_moves_the_window_once() {
        // Arrange
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("runner.toml");
        RunnerBundle::from_job(&notepad_job())
            .unwrap()
            .write(&path)
            .unwrap();
        let windows = Arc::new(FakeWindowOps::default());
        windows.add(7, Rect::new(0, 0, 640, 480), 3);

        // Act
        let moved = run_file(&path, &orchestrator(windows.clone())).unwrap();

        // Assert
        assert_eq!(moved, 1);
        assert_eq!(windows.window(7).normal, Rect::new(1930, 20, 1500, 900));
    }

    #[test]
    fn missing_bundle_applies_nothing() {
        // Arrange
        let dir = tempfile::tempdir().unwrap();
        let windows = Arc::new(FakeWindowOps::default());
        windows.add(7, Rect::new(0, 0, 640, 480), 3);

        // Act
        let result = run_file(&dir.path().join("absent.toml"), &orchestrator(windows.clone()));

        // Assert
        assert!(matches!(result, Err(RunnerError::Io { .. })));
        assert!(windows.calls().is_empty());
    }

    #[test]
    fn malformed_bundle_applies_nothing() {
        // Arrange
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("runner.toml");
        fs::write(&path, "x = \"left\"\nscreen = 3\n").unwrap();
        let windows = Arc::new(FakeWindowOps::default());

        // Act
        let result = run_file(&path, &orchestrator(windows.clone()));

        // Assert
        assert!(matches!(result, Err(RunnerError::Parse(_))));
        assert!(windows.calls().is_empty());
    }
}
