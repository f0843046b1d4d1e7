use std::sync::Arc;
use std::time::Duration;

use winmover_core::{
    MoveOrchestrator, ProcessWindowLocator, RetryScheduler, ScreenResolver,
    VirtualDesktopController, WindowTransformer,
};

use crate::com::ShellDesktopBackend;
use crate::monitor::Win32MonitorSource;
use crate::process::Win32ProcessSource;
use crate::window::Win32WindowOps;

/// Wires the Win32 adapters into an orchestrator.
pub fn orchestrator(retry_interval: Duration) -> MoveOrchestrator {
    MoveOrchestrator::new(
        ProcessWindowLocator::new(Arc::new(Win32ProcessSource)),
        WindowTransformer::new(Arc::new(Win32WindowOps)),
        ScreenResolver::new(Arc::new(Win32MonitorSource)),
        VirtualDesktopController::new(Arc::new(ShellDesktopBackend)),
        RetryScheduler::new(retry_interval),
    )
}
