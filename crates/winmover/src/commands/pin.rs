use clap::Args;
use winmover_core::orchestrator::Destination;
use winmover_core::{Job, PinMode, PinScope};

use super::{Context, TargetArgs, fail};

#[derive(Args)]
pub struct PinArgs {
    /// Unpin instead of pin
    #[arg(long, conflicts_with = "toggle")]
    unpin: bool,
    /// Flip the current pin state
    #[arg(long)]
    toggle: bool,
    /// Pin every window of the application, not just the matched window
    #[arg(long)]
    app: bool,
    #[command(flatten)]
    target: TargetArgs,
}

impl PinArgs {
    fn destination(&self) -> Destination {
        let mode = if self.toggle {
            PinMode::Toggle
        } else if self.unpin {
            PinMode::Unpin
        } else {
            PinMode::Pin
        };
        let scope = if self.app {
            PinScope::Application
        } else {
            PinScope::Window
        };
        Destination::Pin { mode, scope }
    }
}

pub fn execute(args: &PinArgs) {
    let ctx = Context::load();
    let job = Job {
        target: args.target.target(),
        destination: args.destination(),
    };
    if let Err(e) = job.validate() {
        fail(e);
    }
    super::trigger(&ctx, &job, args.target.retry);
}
