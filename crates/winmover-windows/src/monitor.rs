use std::mem;

use tracing::{debug, warn};
use windows::Win32::Foundation::{LPARAM, RECT};
use windows::Win32::Graphics::Gdi::{
    DISPLAY_DEVICEW, EnumDisplayDevicesW, EnumDisplayMonitors, GetMonitorInfoW, HDC, HMONITOR,
    MONITORINFO, MONITORINFOEXW,
};
use windows::core::{BOOL, PCWSTR};
use winmover_core::{InteropError, MonitorDescriptor, MonitorSource, Rect, WindowResult};

/// Ask `EnumDisplayDevicesW` for the device interface path in `DeviceID`.
const EDD_GET_DEVICE_INTERFACE_NAME: u32 = 1;

/// One attached display as reported by GDI.
struct Display {
    device_name: String,
    work_area: Rect,
}

/// [`MonitorSource`] over GDI monitor and display-device enumeration.
#[derive(Debug, Default, Clone, Copy)]
pub struct Win32MonitorSource;

impl MonitorSource for Win32MonitorSource {
    fn monitors(&self) -> WindowResult<Vec<MonitorDescriptor>> {
        let monitors = displays()?
            .into_iter()
            .map(|display| describe(&display.device_name))
            .collect();
        Ok(monitors)
    }

    fn work_area(&self, device_name: &str) -> Option<Rect> {
        match displays() {
            Ok(displays) => displays
                .into_iter()
                .find(|d| d.device_name == device_name)
                .map(|d| d.work_area),
            Err(e) => {
                warn!("failed to enumerate displays: {e}");
                None
            }
        }
    }
}

fn displays() -> WindowResult<Vec<Display>> {
    let mut handles: Vec<HMONITOR> = Vec::new();
    // SAFETY: EnumDisplayMonitors runs synchronously; the Vec outlives
    // every callback that receives a pointer to it.
    let ok = unsafe {
        EnumDisplayMonitors(
            None,
            None,
            Some(monitor_callback),
            LPARAM(&mut handles as *mut _ as isize),
        )
    };
    if !ok.as_bool() {
        return Err(InteropError::os("EnumDisplayMonitors", "enumeration failed"));
    }

    let mut displays = Vec::with_capacity(handles.len());
    for monitor in handles {
        let mut info = MONITORINFOEXW {
            monitorInfo: MONITORINFO {
                cbSize: mem::size_of::<MONITORINFOEXW>() as u32,
                ..Default::default()
            },
            ..Default::default()
        };
        // SAFETY: cbSize announces the extended struct, so GDI also
        // fills szDevice.
        let ok = unsafe { GetMonitorInfoW(monitor, &mut info.monitorInfo) };
        if !ok.as_bool() {
            warn!("GetMonitorInfoW failed for monitor {:?}", monitor.0);
            continue;
        }
        let rc = info.monitorInfo.rcWork;
        displays.push(Display {
            device_name: from_wide(&info.szDevice),
            work_area: Rect::from_edges(rc.left, rc.top, rc.right, rc.bottom),
        });
    }
    Ok(displays)
}

unsafe extern "system" fn monitor_callback(
    monitor: HMONITOR,
    _hdc: HDC,
    _rect: *mut RECT,
    lparam: LPARAM,
) -> BOOL {
    // SAFETY: lparam is the Vec pointer passed by displays().
    let handles = unsafe { &mut *(lparam.0 as *mut Vec<HMONITOR>) };
    handles.push(monitor);
    BOOL(1)
}

/// Reads the monitor attached to a display adapter output.
///
/// The friendly name is the monitor's device string. The instance name is
/// its device interface path, whose third `#` segment is the per-device
/// instance id used as the serial.
///
/// The serial is derived from the instance name, not read from EDID;
/// `EnumDisplayDevicesW` exposes no hardware serial.
fn describe(device_name: &str) -> MonitorDescriptor {
    let adapter: Vec<u16> = device_name.encode_utf16().chain(Some(0)).collect();
    let mut device = DISPLAY_DEVICEW {
        cb: mem::size_of::<DISPLAY_DEVICEW>() as u32,
        ..Default::default()
    };
    // SAFETY: adapter is null-terminated and outlives the call; cb is set.
    let found = unsafe {
        EnumDisplayDevicesW(
            PCWSTR(adapter.as_ptr()),
            0,
            &mut device,
            EDD_GET_DEVICE_INTERFACE_NAME,
        )
    };

    if !found.as_bool() {
        debug!("no monitor attached to {device_name}");
        return MonitorDescriptor {
            friendly_name: device_name.to_string(),
            serial_number: String::new(),
            instance_name: String::new(),
            device_name: device_name.to_string(),
        };
    }

    let instance_name = from_wide(&device.DeviceID);
    MonitorDescriptor {
        friendly_name: from_wide(&device.DeviceString),
        serial_number: serial_from_interface(&instance_name),
        instance_name,
        device_name: device_name.to_string(),
    }
}

/// Extracts the instance segment from `\\?\DISPLAY#DEL41A8#5&2d1f&0&UID4353#{guid}`.
fn serial_from_interface(path: &str) -> String {
    path.split('#').nth(2).unwrap_or_default().to_string()
}

fn from_wide(buffer: &[u16]) -> String {
    let len = buffer.iter().position(|&c| c == 0).unwrap_or(buffer.len());
    String::from_utf16_lossy(&buffer[..len])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn serial_is_the_instance_segment_of_the_interface_path() {
        // Arrange
        let path = r"\\?\DISPLAY#DEL41A8#5&2d1f4d0&0&UID4353#{e6f07b5f-ee97-4a90-b076-33f57bf4eaa7}";

        // Act
        let serial = serial_from_interface(path);

        // Assert
        assert_eq!(serial, "5&2d1f4d0&0&UID4353");
    }

    #[test]
    fn malformed_interface_path_has_no_serial() {
        assert_eq!(serial_from_interface("DISPLAY1"), "");
    }
}
