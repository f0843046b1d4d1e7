use std::ffi::c_void;

use tracing::debug;
use windows::Win32::Foundation::{HWND, RECT};
use windows::Win32::System::Threading::{AttachThreadInput, GetCurrentThreadId};
use windows::Win32::UI::Input::KeyboardAndMouse::SetFocus;
use windows::Win32::UI::WindowsAndMessaging::{
    ASFW_ANY, AllowSetForegroundWindow, BringWindowToTop, GetForegroundWindow, GetWindowRect,
    GetWindowThreadProcessId, IsIconic, IsWindow, IsZoomed, LSFW_UNLOCK,
    LockSetForegroundWindow, SET_WINDOW_POS_FLAGS, SW_MAXIMIZE, SW_MINIMIZE, SW_SHOW, SW_SHOWNORMAL,
    SWP_NOSIZE, SWP_NOZORDER, SWP_SHOWWINDOW, SetForegroundWindow, SetWindowPos, ShowWindow,
};
use winmover_core::{InteropError, Rect, ShowCommand, WindowHandle, WindowOps, WindowResult};

/// Converts an engine handle into a Win32 `HWND`.
pub fn hwnd(window: WindowHandle) -> HWND {
    HWND(window.raw() as *mut c_void)
}

/// Converts a Win32 `HWND` into an engine handle, `None` for null.
pub fn handle(hwnd: HWND) -> Option<WindowHandle> {
    (!hwnd.is_invalid()).then(|| WindowHandle(hwnd.0 as usize))
}

/// `SetWindowPos` flags for a move. A hidden window is shown by the move;
/// the size is kept unless one is given.
fn position_flags(resize: bool) -> SET_WINDOW_POS_FLAGS {
    let flags = SWP_NOZORDER | SWP_SHOWWINDOW;
    if resize { flags } else { flags | SWP_NOSIZE }
}

/// Fails with `InvalidHandle` when the window no longer exists.
fn live(window: WindowHandle) -> WindowResult<HWND> {
    let hwnd = hwnd(window);
    // SAFETY: IsWindow only reads the window table.
    if unsafe { IsWindow(Some(hwnd)) }.as_bool() {
        Ok(hwnd)
    } else {
        Err(InteropError::InvalidHandle(window.raw()))
    }
}

/// [`WindowOps`] over user32.
#[derive(Debug, Default, Clone, Copy)]
pub struct Win32WindowOps;

impl WindowOps for Win32WindowOps {
    fn foreground_window(&self) -> Option<WindowHandle> {
        // SAFETY: GetForegroundWindow has no preconditions.
        handle(unsafe { GetForegroundWindow() })
    }

    fn show(&self, window: WindowHandle, command: ShowCommand) -> WindowResult<()> {
        let hwnd = live(window)?;
        let cmd = match command {
            ShowCommand::Normal => SW_SHOWNORMAL,
            ShowCommand::Maximize => SW_MAXIMIZE,
            ShowCommand::Minimize => SW_MINIMIZE,
            ShowCommand::Show => SW_SHOW,
        };
        // The return value is the previous visibility, not an error.
        // SAFETY: hwnd was validated above; a race with destruction is
        // harmless, ShowWindow then does nothing.
        let _ = unsafe { ShowWindow(hwnd, cmd) };
        Ok(())
    }

    fn set_position(
        &self,
        window: WindowHandle,
        x: i32,
        y: i32,
        size: Option<(i32, i32)>,
    ) -> WindowResult<()> {
        let hwnd = live(window)?;
        let flags = position_flags(size.is_some());
        let (cx, cy) = size.unwrap_or((0, 0));
        debug!("SetWindowPos {window} {x},{y} {cx}x{cy} flags {:#X}", flags.0);
        // SAFETY: SetWindowPos with a valid HWND is safe.
        unsafe { SetWindowPos(hwnd, None, x, y, cx, cy, flags) }
            .map_err(|e| InteropError::os("SetWindowPos", e))
    }

    fn rect(&self, window: WindowHandle) -> WindowResult<Rect> {
        let hwnd = live(window)?;
        let mut rc = RECT::default();
        // SAFETY: rc is a valid out pointer for the duration of the call.
        unsafe { GetWindowRect(hwnd, &mut rc) }.map_err(|e| InteropError::os("GetWindowRect", e))?;
        Ok(Rect::from_edges(rc.left, rc.top, rc.right, rc.bottom))
    }

    fn is_minimized(&self, window: WindowHandle) -> bool {
        // SAFETY: IsIconic is a read-only query; invalid handles read as false.
        unsafe { IsIconic(hwnd(window)) }.as_bool()
    }

    fn is_maximized(&self, window: WindowHandle) -> bool {
        // SAFETY: IsZoomed is a read-only query; invalid handles read as false.
        unsafe { IsZoomed(hwnd(window)) }.as_bool()
    }

    fn set_foreground(&self, window: WindowHandle) -> WindowResult<()> {
        let hwnd = live(window)?;
        // SAFETY: SetForegroundWindow is safe to call with a valid HWND.
        if unsafe { SetForegroundWindow(hwnd) }.as_bool() {
            Ok(())
        } else {
            Err(InteropError::os("SetForegroundWindow", "request denied"))
        }
    }

    fn bring_to_top(&self, window: WindowHandle) -> WindowResult<()> {
        let hwnd = live(window)?;
        // SAFETY: BringWindowToTop is safe to call with a valid HWND.
        unsafe { BringWindowToTop(hwnd) }.map_err(|e| InteropError::os("BringWindowToTop", e))
    }

    fn set_focus(&self, window: WindowHandle) -> WindowResult<()> {
        let hwnd = live(window)?;
        // SAFETY: SetFocus only succeeds for windows attached to our input
        // queue and otherwise returns an error.
        unsafe { SetFocus(Some(hwnd)) }
            .map(|_| ())
            .map_err(|e| InteropError::os("SetFocus", e))
    }

    fn unlock_foreground(&self) -> WindowResult<()> {
        // SAFETY: both calls only change this process's foreground rights.
        unsafe {
            LockSetForegroundWindow(LSFW_UNLOCK)
                .map_err(|e| InteropError::os("LockSetForegroundWindow", e))?;
            AllowSetForegroundWindow(ASFW_ANY)
                .map_err(|e| InteropError::os("AllowSetForegroundWindow", e))
        }
    }

    fn window_thread(&self, window: WindowHandle) -> Option<u32> {
        // SAFETY: passing None for the pid out pointer is allowed.
        let thread = unsafe { GetWindowThreadProcessId(hwnd(window), None) };
        (thread != 0).then_some(thread)
    }

    fn current_thread(&self) -> u32 {
        // SAFETY: no preconditions.
        unsafe { GetCurrentThreadId() }
    }

    fn attach_input(&self, from: u32, to: u32, attach: bool) -> WindowResult<()> {
        // SAFETY: AttachThreadInput validates both thread ids.
        if unsafe { AttachThreadInput(from, to, attach) }.as_bool() {
            Ok(())
        } else {
            Err(InteropError::os(
                "AttachThreadInput",
                format!("{from} -> {to} (attach {attach})"),
            ))
        }
    }
}

/// Returns the id of the process that owns `window`, `None` if it is gone.
pub fn window_process(window: WindowHandle) -> Option<u32> {
    let mut pid = 0u32;
    // SAFETY: pid is a valid out pointer for the duration of the call.
    unsafe { GetWindowThreadProcessId(hwnd(window), Some(&mut pid as *mut u32)) };
    (pid != 0).then_some(pid)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn move_shows_the_window_without_changing_z_order() {
        // Act
        let flags = position_flags(true);

        // Assert
        assert!(flags.contains(SWP_SHOWWINDOW));
        assert!(flags.contains(SWP_NOZORDER));
        assert!(!flags.contains(SWP_NOSIZE));
    }

    #[test]
    fn move_without_size_keeps_current_size() {
        // Act
        let flags = position_flags(false);

        // Assert
        assert!(flags.contains(SWP_NOSIZE | SWP_SHOWWINDOW));
    }
}
