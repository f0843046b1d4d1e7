//! Error types shared by the engine and the platform adapters.

use thiserror::Error;

/// Result type for every OS interop call.
pub type WindowResult<T> = Result<T, InteropError>;

/// An OS call or undocumented shell interface rejected a request.
///
/// Interop errors are always caught by the engine, logged with context,
/// and treated as "no effect for this window".
#[derive(Debug, Error)]
pub enum InteropError {
    #[error("{call} failed: {detail}")]
    Os { call: &'static str, detail: String },
    #[error("window handle 0x{0:X} is no longer valid")]
    InvalidHandle(usize),
    #[error("shell interface {step} unavailable (HRESULT 0x{hresult:08X})")]
    Com { step: &'static str, hresult: i32 },
    #[error("virtual desktop index {index} out of range (count {count})")]
    DesktopOutOfRange { index: usize, count: usize },
    #[error("not supported on this platform")]
    Unsupported,
}

impl InteropError {
    /// Shorthand for a failed OS call.
    pub fn os(call: &'static str, detail: impl ToString) -> Self {
        Self::Os {
            call,
            detail: detail.to_string(),
        }
    }
}

/// Invalid or incomplete settings, detected before any OS interaction.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("application not specified")]
    MissingApplication,
    #[error("screen not specified")]
    MissingScreen,
    #[error("virtual desktop name not specified")]
    MissingDesktop,
    #[error("{field} not specified")]
    MissingField { field: &'static str },
    #[error("invalid {field}: {value:?}")]
    InvalidNumber { field: &'static str, value: String },
    #[error("{field} must be positive, got {value}")]
    NonPositive { field: &'static str, value: i32 },
}

/// What a triggered action reports back to its host.
///
/// Every variant is user-visible (the host shows an alert); a plain
/// "no window matched yet" outcome is `Ok(0)`, not an error.
#[derive(Debug, Error)]
pub enum ActionError {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error("could not find screen {0:?}")]
    ScreenNotFound(String),
    #[error("virtual desktop {0:?} does not exist")]
    DesktopNotFound(String),
    #[error(transparent)]
    Interop(#[from] InteropError),
}
