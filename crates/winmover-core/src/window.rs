use std::fmt;

use crate::{Rect, WindowResult};

/// Opaque identifier of a top-level OS window.
///
/// Stored as a pointer-sized integer so the engine never depends on a
/// platform crate. The OS owns the window; a handle may become invalid
/// at any moment, and every operation on it must tolerate that.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct WindowHandle(pub usize);

impl WindowHandle {
    pub fn raw(self) -> usize {
        self.0
    }
}

impl fmt::Display for WindowHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "0x{:X}", self.0)
    }
}

/// Display-state requests understood by [`WindowOps::show`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShowCommand {
    /// Restore to the normal (non-minimized, non-maximized) state.
    Normal,
    Maximize,
    Minimize,
    /// Show in the current state.
    Show,
}

/// Window-manager primitives needed by the transformer.
///
/// Each platform crate provides one implementation. Queries return plain
/// values (an invalid handle simply reads as "not minimized", "no thread");
/// commands return a [`WindowResult`] so callers decide which failures
/// are fatal.
pub trait WindowOps: Send + Sync {
    /// Returns the window that currently has user focus, if any.
    fn foreground_window(&self) -> Option<WindowHandle>;

    /// Changes the window's display state.
    fn show(&self, window: WindowHandle, command: ShowCommand) -> WindowResult<()>;

    /// Moves the window's top-left corner to `(x, y)`, optionally resizing
    /// it, in one geometry update that keeps the Z-order untouched.
    fn set_position(
        &self,
        window: WindowHandle,
        x: i32,
        y: i32,
        size: Option<(i32, i32)>,
    ) -> WindowResult<()>;

    /// Returns the window's outer bounds.
    fn rect(&self, window: WindowHandle) -> WindowResult<Rect>;

    fn is_minimized(&self, window: WindowHandle) -> bool;

    fn is_maximized(&self, window: WindowHandle) -> bool;

    fn set_foreground(&self, window: WindowHandle) -> WindowResult<()>;

    fn bring_to_top(&self, window: WindowHandle) -> WindowResult<()>;

    fn set_focus(&self, window: WindowHandle) -> WindowResult<()>;

    /// Lifts the foreground lock so this process may change focus.
    fn unlock_foreground(&self) -> WindowResult<()>;

    /// Returns the id of the thread that created the window.
    fn window_thread(&self, window: WindowHandle) -> Option<u32>;

    /// Returns the id of the calling thread.
    fn current_thread(&self) -> u32;

    /// Attaches or detaches the input queues of two threads.
    fn attach_input(&self, from: u32, to: u32, attach: bool) -> WindowResult<()>;
}
