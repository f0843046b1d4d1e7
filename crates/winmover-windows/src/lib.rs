//! Win32 adapters for the winmover engine.
//!
//! Every module is compiled on Windows only; elsewhere the crate is empty
//! and the CLI reports that the platform is unsupported.

/// ImmersiveShell virtual desktop backend.
#[cfg(windows)]
pub mod com;

/// Per-monitor DPI awareness.
#[cfg(windows)]
pub mod dpi;

/// Relaunching this executable with administrator rights.
#[cfg(windows)]
pub mod elevate;

/// Monitor enumeration and work areas.
#[cfg(windows)]
pub mod monitor;

/// Process snapshots, main windows, executable paths.
#[cfg(windows)]
pub mod process;

/// Virtual desktop names persisted by Explorer.
#[cfg(windows)]
mod registry;

/// Window manipulation primitives.
#[cfg(windows)]
pub mod window;

#[cfg(windows)]
mod platform;

#[cfg(windows)]
pub use platform::orchestrator;
