pub mod config;
pub mod desktop;
pub mod error;
pub mod locate;
pub mod log;
pub mod monitor;
pub mod orchestrator;
pub mod rect;
pub mod retry;
pub mod runner;
pub mod settings;
pub mod target;
pub mod transform;
pub mod window;

pub use desktop::{PinMode, PinScope, VirtualDesktopBackend, VirtualDesktopController};
pub use error::{ActionError, ConfigError, InteropError, WindowResult};
pub use locate::{MatchResult, ProcessInfo, ProcessSource, ProcessWindowLocator};
pub use monitor::{MonitorDescriptor, MonitorSource, ScreenResolver};
pub use orchestrator::{Destination, Job, MoveOrchestrator};
pub use rect::Rect;
pub use retry::RetryScheduler;
pub use runner::{RunnerBundle, RunnerError};
pub use settings::{ActionKind, ActionSettings};
pub use target::TargetSpec;
pub use transform::{ResizeMode, TransformRequest, WindowTransformer};
pub use window::{ShowCommand, WindowHandle, WindowOps};

#[cfg(test)]
pub(crate) mod fakes;
