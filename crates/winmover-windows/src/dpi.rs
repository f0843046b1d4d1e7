use windows::Win32::UI::HiDpi::{
    DPI_AWARENESS_CONTEXT_PER_MONITOR_AWARE_V2, SetProcessDpiAwarenessContext,
};

/// Declares this process as per-monitor DPI aware (V2).
///
/// Work areas and window rects are then reported in physical pixels for
/// every monitor, so a position stored against one monitor lands at the
/// same pixel offset on another with a different scale factor.
///
/// Call once at startup before any other Win32 call.
pub fn enable_dpi_awareness() {
    // SAFETY: safe to call once at startup. Fails harmlessly when the
    // awareness was already set by a manifest.
    unsafe {
        let _ = SetProcessDpiAwarenessContext(DPI_AWARENESS_CONTEXT_PER_MONITOR_AWARE_V2);
    }
}
