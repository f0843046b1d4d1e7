pub mod debug;
pub mod desktop;
pub mod init;
pub mod invoke;
pub mod move_window;
pub mod pin;
pub mod run;

use std::process;

use clap::Args;
use tracing::info;
use winmover_core::config::{self, Config};
use winmover_core::log::{self, LogGuard};
use winmover_core::monitor::UNIQUE_KEY_DELIMITER;
use winmover_core::orchestrator::Destination;
use winmover_core::{ActionSettings, Job, MoveOrchestrator, RunnerBundle, TargetSpec};

/// Target selection shared by the triggering commands.
#[derive(Args)]
pub struct TargetArgs {
    /// Process name without extension; omit to target the focused window
    #[arg(long)]
    process: Option<String>,
    /// Only windows whose executable path contains this text (case-insensitive)
    #[arg(long, requires = "process")]
    location: Option<String>,
    /// Only windows whose title contains this text (case-sensitive)
    #[arg(long, requires = "process")]
    title: Option<String>,
    /// Retries, 5 seconds apart by default, while no window matches
    #[arg(long, default_value_t = 12)]
    retry: u32,
}

impl TargetArgs {
    pub fn target(&self) -> TargetSpec {
        let Some(name) = &self.process else {
            return TargetSpec::foreground();
        };
        let mut spec = TargetSpec::process(name.clone());
        if let Some(location) = &self.location {
            spec = spec.with_location(location.clone());
        }
        if let Some(title) = &self.title {
            spec = spec.with_title(title.clone());
        }
        spec
    }
}

/// Everything a command needs: configuration, logging and the engine.
pub struct Context {
    pub config: Config,
    pub orchestrator: MoveOrchestrator,
    _log: LogGuard,
}

impl Context {
    /// Loads configuration, installs logging and wires the platform.
    ///
    /// Exits with an error on platforms without a window backend.
    pub fn load() -> Self {
        let config = config::load();
        let log = log::init(&config.log);
        let Some(orchestrator) = platform_orchestrator(&config) else {
            eprintln!("Error: winmover only runs on Windows.");
            process::exit(1);
        };
        Self {
            config,
            orchestrator,
            _log: log,
        }
    }
}

#[cfg(windows)]
fn platform_orchestrator(config: &Config) -> Option<MoveOrchestrator> {
    use std::time::Duration;

    winmover_windows::dpi::enable_dpi_awareness();
    Some(winmover_windows::orchestrator(Duration::from_secs(
        config.retry.interval_secs,
    )))
}

#[cfg(not(windows))]
fn platform_orchestrator(_config: &Config) -> Option<MoveOrchestrator> {
    None
}

/// Triggers a job and blocks while its retry is pending.
pub fn trigger(ctx: &Context, job: &Job, retry_attempts: u32) {
    match ctx.orchestrator.trigger(job, retry_attempts) {
        Ok(0) if ctx.orchestrator.is_retry_pending(job) => {
            println!(
                "No matching window yet; retrying every {}s ({retry_attempts} attempts).",
                ctx.config.retry.interval_secs
            );
            ctx.orchestrator.wait(job);
        }
        Ok(0) => println!("No matching window."),
        Ok(count) => println!("Applied to {count} window(s)."),
        Err(e) => fail(e),
    }
}

/// Runs a host settings object: migrates a legacy screen key, then either
/// triggers in-process or relaunches elevated.
pub fn run_settings(ctx: &Context, mut settings: ActionSettings) {
    migrate_screen_key(ctx, &mut settings);
    let job = settings.job().unwrap_or_else(|e| fail(e));
    if settings.move_admin_window {
        relaunch_elevated(ctx, &job);
    } else {
        trigger(ctx, &job, settings.retry_attempts());
    }
}

fn migrate_screen_key(ctx: &Context, settings: &mut ActionSettings) {
    let key = settings.screen.trim();
    if key.is_empty() || key.contains(UNIQUE_KEY_DELIMITER) {
        return;
    }
    // A legacy key that no longer matches a monitor is cleared, which
    // then reports "screen not specified".
    settings.screen = ctx
        .orchestrator
        .screens()
        .migrate_legacy_key(key)
        .unwrap_or_default();
}

/// Writes the job to the runner bundle and relaunches this binary
/// elevated to replay it. Retries are never scheduled for elevated runs.
pub fn relaunch_elevated(ctx: &Context, job: &Job) {
    if let Destination::Screen { key, .. } = &job.destination
        && ctx.orchestrator.screens().resolve_screen(key).is_none()
    {
        fail(format!("could not find screen {key:?}"));
    }

    let Some(path) = config::runner_bundle_path() else {
        fail("could not determine home directory");
    };
    let bundle = RunnerBundle::from_job(job).unwrap_or_else(|e| fail(e));
    if let Err(e) = bundle.write(&path) {
        fail(e);
    }
    info!("wrote runner bundle to {}", path.display());
    elevate(&path);
}

#[cfg(windows)]
fn elevate(path: &std::path::Path) {
    let path = path.to_string_lossy();
    match winmover_windows::elevate::relaunch_elevated(&["run-file", &path]) {
        Ok(()) => println!("Started elevated runner."),
        Err(e) => fail(e),
    }
}

#[cfg(not(windows))]
fn elevate(_path: &std::path::Path) {
    fail("elevated relaunch is only available on Windows");
}

/// Prints an error and exits with a failure code.
pub fn fail(e: impl std::fmt::Display) -> ! {
    eprintln!("Error: {e}");
    process::exit(1);
}
