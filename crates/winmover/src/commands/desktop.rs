use clap::Args;
use winmover_core::Job;
use winmover_core::orchestrator::Destination;

use super::{Context, TargetArgs, fail};

#[derive(Args)]
pub struct DesktopArgs {
    /// Part of the destination desktop's name (case-insensitive)
    #[arg(long)]
    name: String,
    #[command(flatten)]
    target: TargetArgs,
}

pub fn execute(args: &DesktopArgs) {
    let ctx = Context::load();
    let job = Job {
        target: args.target.target(),
        destination: Destination::Desktop {
            name: args.name.clone(),
        },
    };
    if let Err(e) = job.validate() {
        fail(e);
    }
    super::trigger(&ctx, &job, args.target.retry);
}
