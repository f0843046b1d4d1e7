use clap::Args;
use winmover_core::orchestrator::Destination;
use winmover_core::{Job, ResizeMode, TransformRequest};

use super::{Context, TargetArgs, fail};

#[derive(Args)]
pub struct MoveArgs {
    /// Monitor key as printed by `winmover debug monitors`
    #[arg(long)]
    screen: String,
    #[command(flatten)]
    target: TargetArgs,
    /// Horizontal offset from the monitor's work area
    #[arg(long, default_value_t = 0, allow_negative_numbers = true)]
    x: i32,
    /// Vertical offset from the monitor's work area
    #[arg(long, default_value_t = 0, allow_negative_numbers = true)]
    y: i32,
    /// Resize to WIDTHxHEIGHT pixels
    #[arg(long, value_name = "WxH", value_parser = parse_size,
          conflicts_with_all = ["maximize", "minimize", "only_topmost"])]
    resize: Option<(i32, i32)>,
    /// Maximize on the destination monitor
    #[arg(long, conflicts_with_all = ["minimize", "only_topmost"])]
    maximize: bool,
    /// Minimize after moving
    #[arg(long, conflicts_with = "only_topmost")]
    minimize: bool,
    /// Leave position and size alone and only bring the window forward
    #[arg(long)]
    only_topmost: bool,
    /// Bring the window to the foreground after moving
    #[arg(long)]
    topmost: bool,
    /// Relaunch elevated to move windows of administrator processes
    #[arg(long)]
    elevated: bool,
}

impl MoveArgs {
    fn job(&self) -> Job {
        let resize_mode = match self.resize {
            Some((width, height)) => ResizeMode::ResizeTo { height, width },
            None if self.maximize => ResizeMode::Maximize,
            None if self.minimize => ResizeMode::Minimize,
            None if self.only_topmost => ResizeMode::OnlyTopmost,
            None => ResizeMode::NoResize,
        };
        Job {
            target: self.target.target(),
            destination: Destination::Screen {
                key: self.screen.clone(),
                request: TransformRequest {
                    destination_point: (self.x, self.y),
                    resize_mode,
                    make_topmost: self.topmost || self.only_topmost,
                },
            },
        }
    }
}

pub fn execute(args: &MoveArgs) {
    let ctx = Context::load();
    let job = args.job();
    if let Err(e) = job.validate() {
        fail(e);
    }

    if args.elevated {
        super::relaunch_elevated(&ctx, &job);
    } else {
        super::trigger(&ctx, &job, args.target.retry);
    }
}

fn parse_size(value: &str) -> Result<(i32, i32), String> {
    let (width, height) = value
        .split_once(['x', 'X'])
        .ok_or_else(|| format!("expected WIDTHxHEIGHT, got {value:?}"))?;
    let parse = |s: &str| {
        s.trim()
            .parse::<i32>()
            .map_err(|_| format!("invalid number {s:?} in {value:?}"))
    };
    Ok((parse(width)?, parse(height)?))
}
