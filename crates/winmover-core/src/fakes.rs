//! In-memory stand-ins for the platform capability traits.

use std::collections::HashMap;
use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};

use crate::{
    InteropError, MonitorDescriptor, MonitorSource, ProcessInfo, ProcessSource, Rect, ShowCommand,
    VirtualDesktopBackend, WindowHandle, WindowOps, WindowResult,
};

// -- processes --

#[derive(Clone)]
pub struct FakeProcess {
    pub info: ProcessInfo,
    /// `None` simulates an elevated process whose path cannot be read.
    pub path: Option<String>,
    pub title: String,
}

impl FakeProcess {
    pub fn new(pid: u32, name: &str, window: Option<usize>, path: &str, title: &str) -> Self {
        Self {
            info: ProcessInfo {
                pid,
                name: name.into(),
                main_window: window.map(WindowHandle),
            },
            path: Some(path.into()),
            title: title.into(),
        }
    }
}

#[derive(Default)]
pub struct FakeProcessSource {
    pub foreground: Mutex<Option<WindowHandle>>,
    pub processes: Mutex<Vec<FakeProcess>>,
}

impl FakeProcessSource {
    pub fn with(processes: Vec<FakeProcess>) -> Self {
        Self {
            foreground: Mutex::new(None),
            processes: Mutex::new(processes),
        }
    }

    pub fn spawn(&self, process: FakeProcess) {
        self.processes.lock().unwrap().push(process);
    }
}

impl ProcessSource for FakeProcessSource {
    fn foreground_window(&self) -> Option<WindowHandle> {
        *self.foreground.lock().unwrap()
    }

    fn processes_by_name(&self, name: &str) -> WindowResult<Vec<ProcessInfo>> {
        Ok(self
            .processes
            .lock()
            .unwrap()
            .iter()
            .filter(|p| p.info.name.eq_ignore_ascii_case(name))
            .map(|p| p.info.clone())
            .collect())
    }

    fn all_processes(&self) -> WindowResult<Vec<ProcessInfo>> {
        Ok(self
            .processes
            .lock()
            .unwrap()
            .iter()
            .map(|p| p.info.clone())
            .collect())
    }

    fn executable_path(&self, pid: u32) -> WindowResult<String> {
        self.processes
            .lock()
            .unwrap()
            .iter()
            .find(|p| p.info.pid == pid)
            .and_then(|p| p.path.clone())
            .ok_or_else(|| InteropError::os("OpenProcess", "access denied"))
    }

    fn window_title(&self, window: WindowHandle) -> WindowResult<String> {
        self.processes
            .lock()
            .unwrap()
            .iter()
            .find(|p| p.info.main_window == Some(window))
            .map(|p| p.title.clone())
            .ok_or(InteropError::InvalidHandle(window.0))
    }
}

// -- windows --

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FakeState {
    Normal,
    Maximized,
    Minimized,
}

#[derive(Debug, Clone)]
pub struct FakeWindow {
    pub normal: Rect,
    pub state: FakeState,
    pub thread: u32,
}

#[derive(Default)]
pub struct FakeWindowOps {
    pub windows: Mutex<HashMap<WindowHandle, FakeWindow>>,
    pub foreground: Mutex<Option<WindowHandle>>,
    pub calls: Mutex<Vec<String>>,
    /// Bounds every window takes when maximized.
    pub maximized_bounds: Rect,
    /// When set, every focus-related call fails.
    pub deny_focus: bool,
}

impl FakeWindowOps {
    pub fn new(maximized_bounds: Rect) -> Self {
        Self {
            maximized_bounds,
            ..Default::default()
        }
    }

    pub fn add(&self, handle: usize, rect: Rect, thread: u32) {
        self.windows.lock().unwrap().insert(
            WindowHandle(handle),
            FakeWindow {
                normal: rect,
                state: FakeState::Normal,
                thread,
            },
        );
    }

    pub fn window(&self, handle: usize) -> FakeWindow {
        self.windows.lock().unwrap()[&WindowHandle(handle)].clone()
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }

    fn record(&self, call: String) {
        self.calls.lock().unwrap().push(call);
    }

    fn with_window<T>(
        &self,
        window: WindowHandle,
        f: impl FnOnce(&mut FakeWindow) -> T,
    ) -> WindowResult<T> {
        let mut windows = self.windows.lock().unwrap();
        let entry = windows
            .get_mut(&window)
            .ok_or(InteropError::InvalidHandle(window.0))?;
        Ok(f(entry))
    }

    fn focus_call(&self, name: &str, window: Option<WindowHandle>) -> WindowResult<()> {
        match window {
            Some(w) => self.record(format!("{name} {w}")),
            None => self.record(name.to_string()),
        }
        if self.deny_focus {
            return Err(InteropError::os("focus", "denied"));
        }
        if let Some(w) = window {
            self.with_window(w, |_| ())?;
        }
        Ok(())
    }
}

impl WindowOps for FakeWindowOps {
    fn foreground_window(&self) -> Option<WindowHandle> {
        *self.foreground.lock().unwrap()
    }

    fn show(&self, window: WindowHandle, command: ShowCommand) -> WindowResult<()> {
        self.record(format!("show {window} {command:?}"));
        self.with_window(window, |w| {
            w.state = match command {
                ShowCommand::Normal => FakeState::Normal,
                ShowCommand::Maximize => FakeState::Maximized,
                ShowCommand::Minimize => FakeState::Minimized,
                ShowCommand::Show => w.state,
            };
        })
    }

    fn set_position(
        &self,
        window: WindowHandle,
        x: i32,
        y: i32,
        size: Option<(i32, i32)>,
    ) -> WindowResult<()> {
        self.record(format!("set_position {window} {x},{y} {size:?}"));
        self.with_window(window, |w| {
            w.normal.x = x;
            w.normal.y = y;
            if let Some((width, height)) = size {
                w.normal.width = width;
                w.normal.height = height;
            }
        })
    }

    fn rect(&self, window: WindowHandle) -> WindowResult<Rect> {
        let bounds = self.maximized_bounds;
        self.with_window(window, |w| match w.state {
            FakeState::Maximized => bounds,
            _ => w.normal,
        })
    }

    fn is_minimized(&self, window: WindowHandle) -> bool {
        self.with_window(window, |w| w.state == FakeState::Minimized)
            .unwrap_or(false)
    }

    fn is_maximized(&self, window: WindowHandle) -> bool {
        self.with_window(window, |w| w.state == FakeState::Maximized)
            .unwrap_or(false)
    }

    fn set_foreground(&self, window: WindowHandle) -> WindowResult<()> {
        self.focus_call("set_foreground", Some(window))?;
        *self.foreground.lock().unwrap() = Some(window);
        Ok(())
    }

    fn bring_to_top(&self, window: WindowHandle) -> WindowResult<()> {
        self.focus_call("bring_to_top", Some(window))
    }

    fn set_focus(&self, window: WindowHandle) -> WindowResult<()> {
        self.focus_call("set_focus", Some(window))
    }

    fn unlock_foreground(&self) -> WindowResult<()> {
        self.focus_call("unlock_foreground", None)
    }

    fn window_thread(&self, window: WindowHandle) -> Option<u32> {
        self.with_window(window, |w| w.thread).ok()
    }

    fn current_thread(&self) -> u32 {
        1
    }

    fn attach_input(&self, from: u32, to: u32, attach: bool) -> WindowResult<()> {
        self.record(format!("attach_input {from}->{to} {attach}"));
        Ok(())
    }
}

// -- monitors --

#[derive(Default)]
pub struct FakeMonitorSource {
    pub monitors: Mutex<Vec<(MonitorDescriptor, Rect)>>,
    pub enumerations: AtomicUsize,
}

impl FakeMonitorSource {
    pub fn with(monitors: Vec<(MonitorDescriptor, Rect)>) -> Self {
        Self {
            monitors: Mutex::new(monitors),
            enumerations: AtomicUsize::new(0),
        }
    }

    pub fn replace(&self, monitors: Vec<(MonitorDescriptor, Rect)>) {
        *self.monitors.lock().unwrap() = monitors;
    }

    pub fn enumerations(&self) -> usize {
        self.enumerations.load(Ordering::SeqCst)
    }
}

impl MonitorSource for FakeMonitorSource {
    fn monitors(&self) -> WindowResult<Vec<MonitorDescriptor>> {
        self.enumerations.fetch_add(1, Ordering::SeqCst);
        Ok(self
            .monitors
            .lock()
            .unwrap()
            .iter()
            .map(|(d, _)| d.clone())
            .collect())
    }

    fn work_area(&self, device_name: &str) -> Option<Rect> {
        self.monitors
            .lock()
            .unwrap()
            .iter()
            .find(|(d, _)| d.device_name == device_name)
            .map(|(_, r)| *r)
    }
}

pub fn monitor(friendly: &str, serial: &str, instance: &str, device: &str) -> MonitorDescriptor {
    MonitorDescriptor {
        friendly_name: friendly.into(),
        serial_number: serial.into(),
        instance_name: instance.into(),
        device_name: device.into(),
    }
}

// -- virtual desktops --

#[derive(Default)]
pub struct FakeDesktopBackend {
    /// Persisted name per desktop, `None` when unnamed.
    pub names: Mutex<Vec<Option<String>>>,
    pub placement: Mutex<HashMap<WindowHandle, usize>>,
    pub pinned_windows: Mutex<Vec<WindowHandle>>,
    pub pinned_apps: Mutex<Vec<WindowHandle>>,
    pub pin_calls: AtomicUsize,
    /// When set, every call fails like a broken shell interface.
    pub broken: bool,
}

impl FakeDesktopBackend {
    pub fn with_names(names: &[Option<&str>]) -> Self {
        Self {
            names: Mutex::new(names.iter().map(|n| n.map(String::from)).collect()),
            ..Default::default()
        }
    }

    fn check(&self) -> WindowResult<()> {
        if self.broken {
            return Err(InteropError::Com {
                step: "ImmersiveShell",
                hresult: 0x8000_4002_u32 as i32,
            });
        }
        Ok(())
    }
}

impl VirtualDesktopBackend for FakeDesktopBackend {
    fn desktop_count(&self) -> WindowResult<usize> {
        self.check()?;
        Ok(self.names.lock().unwrap().len())
    }

    fn desktop_name(&self, index: usize) -> WindowResult<Option<String>> {
        self.check()?;
        let names = self.names.lock().unwrap();
        names
            .get(index)
            .cloned()
            .ok_or(InteropError::DesktopOutOfRange {
                index,
                count: names.len(),
            })
    }

    fn move_window(&self, window: WindowHandle, index: usize) -> WindowResult<()> {
        self.check()?;
        self.placement.lock().unwrap().insert(window, index);
        Ok(())
    }

    fn is_window_pinned(&self, window: WindowHandle) -> WindowResult<bool> {
        self.check()?;
        Ok(self.pinned_windows.lock().unwrap().contains(&window))
    }

    fn pin_window(&self, window: WindowHandle) -> WindowResult<()> {
        self.check()?;
        self.pin_calls.fetch_add(1, Ordering::SeqCst);
        self.pinned_windows.lock().unwrap().push(window);
        Ok(())
    }

    fn unpin_window(&self, window: WindowHandle) -> WindowResult<()> {
        self.check()?;
        self.pin_calls.fetch_add(1, Ordering::SeqCst);
        self.pinned_windows.lock().unwrap().retain(|w| *w != window);
        Ok(())
    }

    fn is_app_pinned(&self, window: WindowHandle) -> WindowResult<bool> {
        self.check()?;
        Ok(self.pinned_apps.lock().unwrap().contains(&window))
    }

    fn pin_app(&self, window: WindowHandle) -> WindowResult<()> {
        self.check()?;
        self.pin_calls.fetch_add(1, Ordering::SeqCst);
        self.pinned_apps.lock().unwrap().push(window);
        Ok(())
    }

    fn unpin_app(&self, window: WindowHandle) -> WindowResult<()> {
        self.check()?;
        self.pin_calls.fetch_add(1, Ordering::SeqCst);
        self.pinned_apps.lock().unwrap().retain(|w| *w != window);
        Ok(())
    }
}
