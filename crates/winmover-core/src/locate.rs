//! Resolving a [`TargetSpec`] into concrete window handles.

use std::sync::Arc;

use tracing::{debug, error, info, warn};

use crate::{Rect, TargetSpec, WindowHandle, WindowOps, WindowResult};

/// A running process as seen by the locator.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProcessInfo {
    pub pid: u32,
    /// Image name without extension.
    pub name: String,
    /// The process's primary top-level window, `None` for background
    /// and console processes.
    pub main_window: Option<WindowHandle>,
}

/// OS process and window queries used by the locator.
pub trait ProcessSource: Send + Sync {
    /// Returns the window that currently has user focus, if any.
    fn foreground_window(&self) -> Option<WindowHandle>;

    /// Returns every process whose image name matches `name` using the
    /// OS naming convention.
    fn processes_by_name(&self, name: &str) -> WindowResult<Vec<ProcessInfo>>;

    /// Returns every running process.
    fn all_processes(&self) -> WindowResult<Vec<ProcessInfo>>;

    /// Returns the full executable path of a process.
    fn executable_path(&self, pid: u32) -> WindowResult<String>;

    /// Returns the title of a window.
    fn window_title(&self, window: WindowHandle) -> WindowResult<String>;
}

/// Outcome of a resolution pass.
///
/// `matched.len()` is the affected-window count reported to the caller.
/// `total_candidates` counts every process with the requested name,
/// including those without a main window, and is diagnostic only.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MatchResult {
    pub total_candidates: usize,
    pub matched: Vec<WindowHandle>,
}

impl MatchResult {
    pub fn count(&self) -> usize {
        self.matched.len()
    }
}

/// Finds the windows a [`TargetSpec`] refers to.
#[derive(Clone)]
pub struct ProcessWindowLocator {
    source: Arc<dyn ProcessSource>,
}

impl ProcessWindowLocator {
    pub fn new(source: Arc<dyn ProcessSource>) -> Self {
        Self { source }
    }

    /// Resolves `spec` into the set of matching main windows.
    ///
    /// Never fails: a process that cannot be inspected is logged and
    /// skipped, and "no such process" is the normal `{0, []}` outcome.
    pub fn locate(&self, spec: &TargetSpec) -> MatchResult {
        if spec.use_foreground_window() {
            let matched: Vec<WindowHandle> = self.source.foreground_window().into_iter().collect();
            if matched.is_empty() {
                warn!("no foreground window to target");
            }
            return MatchResult {
                total_candidates: 1,
                matched,
            };
        }

        let Some(name) = non_empty(&spec.process_name) else {
            warn!("locate called without a process name");
            return MatchResult::default();
        };

        let processes = match self.source.processes_by_name(name) {
            Ok(p) => p,
            Err(e) => {
                error!("failed to enumerate processes named {name}: {e}");
                return MatchResult::default();
            }
        };

        let mut result = MatchResult::default();
        for process in processes {
            result.total_candidates += 1;
            let Some(window) = process.main_window else {
                continue;
            };
            debug!("found {name} (pid {}) with handle {window}", process.pid);

            if let Some(filter) = non_empty(&spec.location_filter)
                && !self.location_matches(&process, filter)
            {
                continue;
            }

            if let Some(filter) = non_empty(&spec.title_filter)
                && !self.title_matches(window, filter)
            {
                continue;
            }

            result.matched.push(window);
        }

        info!(
            "iterated through {} {name} processes, matched {}",
            result.total_candidates,
            result.count()
        );
        result
    }

    /// Returns the bounds of the first visible main window of `name`.
    ///
    /// Used to prefill position and size settings from a live window.
    pub fn window_rect(&self, name: &str, ops: &dyn WindowOps) -> Option<Rect> {
        let processes = match self.source.processes_by_name(name) {
            Ok(p) => p,
            Err(e) => {
                error!("failed to enumerate processes named {name}: {e}");
                return None;
            }
        };

        processes
            .iter()
            .filter_map(|p| p.main_window)
            .find_map(|window| match ops.rect(window) {
                Ok(rect) if rect.height > 0 => Some(rect),
                Ok(_) => None,
                Err(e) => {
                    warn!("failed to read bounds of {window}: {e}");
                    None
                }
            })
    }

    /// Returns the sorted, de-duplicated names of all running processes.
    pub fn application_names(&self) -> Vec<String> {
        let mut names: Vec<String> = match self.source.all_processes() {
            Ok(p) => p.into_iter().map(|p| p.name).collect(),
            Err(e) => {
                error!("failed to enumerate processes: {e}");
                return Vec::new();
            }
        };
        names.sort_by_key(|n| n.to_lowercase());
        names.dedup();
        names
    }

    /// Lists every process that has a main window, with its title.
    pub fn main_windows(&self) -> Vec<(ProcessInfo, String)> {
        let processes = match self.source.all_processes() {
            Ok(p) => p,
            Err(e) => {
                error!("failed to enumerate processes: {e}");
                return Vec::new();
            }
        };
        let mut windows: Vec<(ProcessInfo, String)> = processes
            .into_iter()
            .filter_map(|p| {
                let window = p.main_window?;
                let title = self.source.window_title(window).unwrap_or_default();
                Some((p, title))
            })
            .collect();
        windows.sort_by_key(|(p, _)| (p.name.to_lowercase(), p.pid));
        windows
    }

    fn location_matches(&self, process: &ProcessInfo, filter: &str) -> bool {
        match self.source.executable_path(process.pid) {
            Ok(path) if path.to_lowercase().contains(&filter.to_lowercase()) => true,
            Ok(path) => {
                info!(
                    "skipped {} (pid {}): location {path:?} does not contain {filter:?}",
                    process.name, process.pid
                );
                false
            }
            Err(e) => {
                warn!(
                    "skipped {} (pid {}): cannot read executable path: {e}",
                    process.name, process.pid
                );
                false
            }
        }
    }

    fn title_matches(&self, window: WindowHandle, filter: &str) -> bool {
        match self.source.window_title(window) {
            Ok(title) if title.contains(filter) => true,
            Ok(title) => {
                info!("skipped {window}: title {title:?} does not contain {filter:?}");
                false
            }
            Err(e) => {
                warn!("skipped {window}: cannot read title: {e}");
                false
            }
        }
    }
}

fn non_empty(value: &Option<String>) -> Option<&str> {
    value.as_deref().filter(|s| !s.is_empty())
}

#[cfg(test)]
#[path = "locate_tests.rs"]
mod tests;
