use clap::{Args, ValueEnum};
use winmover_core::{ActionKind, ActionSettings};

use super::{Context, fail};

#[derive(Clone, Copy, ValueEnum)]
pub enum Kind {
    Move,
    Desktop,
    Pin,
}

impl From<Kind> for ActionKind {
    fn from(kind: Kind) -> Self {
        match kind {
            Kind::Move => ActionKind::Move,
            Kind::Desktop => ActionKind::Desktop,
            Kind::Pin => ActionKind::Pin,
        }
    }
}

#[derive(Args)]
pub struct InvokeArgs {
    /// Action settings as a JSON object with camelCase keys
    #[arg(long)]
    settings_json: String,
    /// Override the action kind named in the settings
    #[arg(long, value_enum)]
    kind: Option<Kind>,
}

/// Runs an action exactly as a host plugin would trigger it.
pub fn execute(args: &InvokeArgs) {
    let mut settings = ActionSettings::from_json(&args.settings_json)
        .unwrap_or_else(|e| fail(format!("invalid settings: {e}")));
    if let Some(kind) = args.kind {
        settings.kind = kind.into();
    }
    let ctx = Context::load();
    super::run_settings(&ctx, settings);
}
