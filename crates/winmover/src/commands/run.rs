use std::path::Path;

use winmover_core::config;
use winmover_core::runner;

use super::{Context, fail};

/// Runs a named action from `actions.toml`.
pub fn execute(name: &str) {
    let actions = config::load_actions();
    let Some(action) = config::find_action(&actions, name) else {
        let known: Vec<&str> = actions.iter().map(|a| a.name.as_str()).collect();
        if known.is_empty() {
            fail(format!("no action named {name:?}; run `winmover init` to create actions.toml"));
        }
        fail(format!("no action named {name:?} (known: {})", known.join(", ")));
    };

    let ctx = Context::load();
    super::run_settings(&ctx, action.settings.clone());
}

/// Replays a runner bundle once, without retries.
pub fn execute_file(path: &Path) {
    let ctx = Context::load();
    match runner::run_file(path, &ctx.orchestrator) {
        Ok(count) => println!("Applied to {count} window(s)."),
        Err(e) => fail(e),
    }
}
