use std::collections::HashMap;
use std::mem;

use tracing::debug;
use windows::Win32::Foundation::{CloseHandle, HANDLE, HWND, LPARAM};
use windows::Win32::System::Diagnostics::ToolHelp::{
    CreateToolhelp32Snapshot, PROCESSENTRY32W, Process32FirstW, Process32NextW, TH32CS_SNAPPROCESS,
};
use windows::Win32::System::Threading::{
    OpenProcess, PROCESS_NAME_WIN32, PROCESS_QUERY_LIMITED_INFORMATION, QueryFullProcessImageNameW,
};
use windows::Win32::UI::WindowsAndMessaging::{
    EnumWindows, GW_OWNER, GetWindow, GetWindowTextLengthW, GetWindowTextW,
    GetWindowThreadProcessId, IsWindowVisible,
};
use windows::core::{BOOL, PWSTR};
use winmover_core::{InteropError, ProcessInfo, ProcessSource, WindowHandle, WindowResult};

use crate::window::{handle, hwnd};

/// [`ProcessSource`] over a ToolHelp snapshot and `EnumWindows`.
#[derive(Debug, Default, Clone, Copy)]
pub struct Win32ProcessSource;

impl ProcessSource for Win32ProcessSource {
    fn foreground_window(&self) -> Option<WindowHandle> {
        use winmover_core::WindowOps;
        crate::window::Win32WindowOps.foreground_window()
    }

    fn processes_by_name(&self, name: &str) -> WindowResult<Vec<ProcessInfo>> {
        let mut processes = self.all_processes()?;
        processes.retain(|p| p.name.eq_ignore_ascii_case(name));
        Ok(processes)
    }

    fn all_processes(&self) -> WindowResult<Vec<ProcessInfo>> {
        let main_windows = main_windows()?;
        let processes = snapshot()?
            .into_iter()
            .map(|(pid, name)| ProcessInfo {
                pid,
                name,
                main_window: main_windows.get(&pid).copied(),
            })
            .collect();
        Ok(processes)
    }

    fn executable_path(&self, pid: u32) -> WindowResult<String> {
        // SAFETY: OpenProcess with the least-privilege query right. Fails
        // with access denied for elevated processes when we are not.
        let process = unsafe { OpenProcess(PROCESS_QUERY_LIMITED_INFORMATION, false, pid) }
            .map_err(|e| InteropError::os("OpenProcess", e))?;
        let path = image_name(process);
        // SAFETY: we own the handle opened above.
        unsafe {
            let _ = CloseHandle(process);
        }
        path
    }

    fn window_title(&self, window: WindowHandle) -> WindowResult<String> {
        let hwnd = hwnd(window);
        // SAFETY: GetWindowTextLengthW and GetWindowTextW read window text
        // into a buffer we own.
        unsafe {
            let length = GetWindowTextLengthW(hwnd);
            if length == 0 {
                return Ok(String::new());
            }
            // +1 for the null terminator that Windows requires
            let mut buffer = vec![0u16; (length + 1) as usize];
            let copied = GetWindowTextW(hwnd, &mut buffer);
            Ok(String::from_utf16_lossy(&buffer[..copied as usize]))
        }
    }
}

fn image_name(process: HANDLE) -> WindowResult<String> {
    let mut buffer = [0u16; 1024];
    let mut size = buffer.len() as u32;
    // SAFETY: buffer and size describe a writable UTF-16 buffer.
    unsafe {
        QueryFullProcessImageNameW(
            process,
            PROCESS_NAME_WIN32,
            PWSTR(buffer.as_mut_ptr()),
            &mut size,
        )
    }
    .map_err(|e| InteropError::os("QueryFullProcessImageNameW", e))?;
    Ok(String::from_utf16_lossy(&buffer[..size as usize]))
}

/// Lists `(pid, name)` for every running process.
///
/// Names are image names without the `.exe` extension.
fn snapshot() -> WindowResult<Vec<(u32, String)>> {
    // SAFETY: a process snapshot has no preconditions; we close it below.
    let snapshot = unsafe { CreateToolhelp32Snapshot(TH32CS_SNAPPROCESS, 0) }
        .map_err(|e| InteropError::os("CreateToolhelp32Snapshot", e))?;

    let mut entry = PROCESSENTRY32W {
        dwSize: mem::size_of::<PROCESSENTRY32W>() as u32,
        ..Default::default()
    };
    let mut processes = Vec::new();

    // SAFETY: entry.dwSize is set as the API requires; the snapshot
    // handle stays open for the whole walk.
    unsafe {
        let mut next = Process32FirstW(snapshot, &mut entry);
        while next.is_ok() {
            processes.push((entry.th32ProcessID, process_name(&entry.szExeFile)));
            next = Process32NextW(snapshot, &mut entry);
        }
        let _ = CloseHandle(snapshot);
    }

    debug!("snapshot found {} processes", processes.len());
    Ok(processes)
}

fn process_name(exe_file: &[u16]) -> String {
    let len = exe_file.iter().position(|&c| c == 0).unwrap_or(exe_file.len());
    let name = String::from_utf16_lossy(&exe_file[..len]);
    match name.len().checked_sub(4) {
        Some(stem) if name.is_char_boundary(stem) && name[stem..].eq_ignore_ascii_case(".exe") => {
            name[..stem].to_string()
        }
        _ => name,
    }
}

/// Maps each process id to its main window.
///
/// The main window is the first visible, unowned top-level window in
/// Z-order, the same window the shell would activate for the process.
fn main_windows() -> WindowResult<HashMap<u32, WindowHandle>> {
    let mut windows: HashMap<u32, WindowHandle> = HashMap::new();
    // SAFETY: EnumWindows runs synchronously, so the map outlives every
    // callback that receives a pointer to it.
    unsafe {
        EnumWindows(
            Some(main_window_callback),
            LPARAM(&mut windows as *mut _ as isize),
        )
    }
    .map_err(|e| InteropError::os("EnumWindows", e))?;
    Ok(windows)
}

/// Returns the main window of one process.
pub fn main_window(pid: u32) -> Option<WindowHandle> {
    main_windows().ok()?.get(&pid).copied()
}

unsafe extern "system" fn main_window_callback(hwnd: HWND, lparam: LPARAM) -> BOOL {
    // SAFETY: lparam is the map pointer passed by main_windows().
    let windows = unsafe { &mut *(lparam.0 as *mut HashMap<u32, WindowHandle>) };

    // SAFETY: read-only queries on a window handed to us by EnumWindows.
    unsafe {
        if !IsWindowVisible(hwnd).as_bool() {
            return BOOL(1);
        }
        if GetWindow(hwnd, GW_OWNER).is_ok_and(|owner| !owner.is_invalid()) {
            return BOOL(1);
        }
        let mut pid = 0u32;
        GetWindowThreadProcessId(hwnd, Some(&mut pid as *mut u32));
        if let Some(window) = handle(hwnd) {
            windows.entry(pid).or_insert(window);
        }
    }

    BOOL(1)
}
