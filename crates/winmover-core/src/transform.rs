//! Applying a geometry and visibility transform to a single window.

use std::fmt;
use std::sync::Arc;

use tracing::{debug, info, warn};

use crate::{Rect, ShowCommand, WindowHandle, WindowOps, WindowResult};

/// How the window's size and display state change.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ResizeMode {
    /// Move only, keep the current size.
    #[default]
    NoResize,
    Maximize,
    Minimize,
    /// Move and resize to the given size in pixels.
    ResizeTo { height: i32, width: i32 },
    /// Leave position and size alone; only change stacking.
    OnlyTopmost,
}

/// A requested transform, relative to the destination monitor's work area.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct TransformRequest {
    /// Offset from the work-area origin.
    pub destination_point: (i32, i32),
    pub resize_mode: ResizeMode,
    /// Run the forced-foreground escalation after the transform.
    pub make_topmost: bool,
}

impl fmt::Display for TransformRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let (x, y) = self.destination_point;
        write!(
            f,
            "position {x},{y} resize {:?} topmost {}",
            self.resize_mode, self.make_topmost
        )
    }
}

/// Moves, resizes and re-stacks windows through a [`WindowOps`] backend.
#[derive(Clone)]
pub struct WindowTransformer {
    ops: Arc<dyn WindowOps>,
}

impl WindowTransformer {
    pub fn new(ops: Arc<dyn WindowOps>) -> Self {
        Self { ops }
    }

    pub fn ops(&self) -> &dyn WindowOps {
        self.ops.as_ref()
    }

    /// Applies `request` to `window`, placing it inside `work_area`.
    ///
    /// The geometry and display-state steps report failure (the window
    /// was not transformed). Focus steps are best-effort: their failures
    /// are logged and never returned.
    pub fn apply(
        &self,
        window: WindowHandle,
        work_area: Rect,
        request: &TransformRequest,
    ) -> WindowResult<()> {
        let mode = request.resize_mode;

        // Restoring first lets a repeated maximize visibly re-apply.
        if !matches!(mode, ResizeMode::Minimize | ResizeMode::OnlyTopmost) {
            self.ops.show(window, ShowCommand::Normal)?;
        }

        if mode != ResizeMode::OnlyTopmost {
            let (x, y) = work_area.offset(request.destination_point.0, request.destination_point.1);
            let size = match mode {
                ResizeMode::ResizeTo { height, width } => Some((width, height)),
                _ => None,
            };
            debug!("positioning {window} at {x},{y} size {size:?}");
            self.ops.set_position(window, x, y, size)?;
        }

        match mode {
            ResizeMode::Maximize => self.ops.show(window, ShowCommand::Maximize)?,
            ResizeMode::Minimize => self.ops.show(window, ShowCommand::Minimize)?,
            _ => {}
        }

        if let Err(e) = self.ops.set_foreground(window) {
            info!("could not bring {window} to the foreground: {e}");
        }

        if request.make_topmost {
            self.force_foreground(window);
        }

        Ok(())
    }

    /// Best-effort focus steal that works around the foreground lock.
    ///
    /// Racy against user input and other processes; never fails.
    pub fn force_foreground(&self, window: WindowHandle) {
        best_effort("unlock foreground", self.ops.unlock_foreground());

        let current = self.ops.foreground_window();
        if let Some(current) = current
            && current != window
        {
            let ours = self.ops.current_thread();
            let theirs = self.ops.window_thread(current);
            if let Some(theirs) = theirs {
                best_effort("attach input", self.ops.attach_input(theirs, ours, true));
            }

            best_effort("unlock foreground", self.ops.unlock_foreground());
            best_effort("bring to top", self.ops.bring_to_top(window));
            let show = if self.ops.is_minimized(window) {
                ShowCommand::Normal
            } else {
                ShowCommand::Show
            };
            best_effort("show", self.ops.show(window, show));
            best_effort("set focus", self.ops.set_focus(window));

            if let Some(theirs) = theirs {
                best_effort("detach input", self.ops.attach_input(theirs, ours, false));
            }
        }

        best_effort("set foreground", self.ops.set_foreground(window));
        best_effort("set focus", self.ops.set_focus(window));
    }
}

fn best_effort(step: &str, result: WindowResult<()>) {
    if let Err(e) = result {
        warn!("forced foreground: {step} failed: {e}");
    }
}

#[cfg(test)]
#[path = "transform_tests.rs"]
mod tests;
