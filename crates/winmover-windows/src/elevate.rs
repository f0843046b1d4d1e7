use tracing::info;
use windows::Win32::UI::Shell::ShellExecuteW;
use windows::Win32::UI::WindowsAndMessaging::SW_HIDE;
use windows::core::{HSTRING, PCWSTR, w};
use winmover_core::{InteropError, WindowResult};

/// `ShellExecuteW` reports success with a value greater than this.
const SHELL_EXECUTE_MIN_SUCCESS: isize = 32;

/// Relaunches the current executable with administrator rights.
///
/// Shows the UAC prompt and returns once the elevated process has been
/// started; it does not wait for it to finish.
pub fn relaunch_elevated(args: &[&str]) -> WindowResult<()> {
    let exe = std::env::current_exe().map_err(|e| InteropError::os("current_exe", e))?;
    let params = args
        .iter()
        .map(|a| quote(a))
        .collect::<Vec<_>>()
        .join(" ");
    info!("relaunching elevated: {} {params}", exe.display());

    let file = HSTRING::from(exe.as_os_str());
    let params = HSTRING::from(params);
    // SAFETY: every string outlives the call.
    let result = unsafe {
        ShellExecuteW(
            None,
            w!("runas"),
            &file,
            &params,
            PCWSTR::null(),
            SW_HIDE,
        )
    };

    if result.0 as isize <= SHELL_EXECUTE_MIN_SUCCESS {
        return Err(InteropError::os(
            "ShellExecuteW",
            format!("runas failed with code {}", result.0 as isize),
        ));
    }
    Ok(())
}

/// Quotes an argument for the Windows command line when needed.
fn quote(arg: &str) -> String {
    if !arg.is_empty() && !arg.contains([' ', '\t', '"']) {
        return arg.to_string();
    }
    format!("\"{}\"", arg.replace('"', "\\\""))
}
