use crate::commands::{Context, fail};

/// Prints the bounds of a process's main window, the values a move
/// action needs to reproduce its current placement.
pub fn execute(process: &str) {
    let ctx = Context::load();
    let orchestrator = &ctx.orchestrator;
    let Some(rect) = orchestrator
        .locator()
        .window_rect(process, orchestrator.transformer().ops())
    else {
        fail(format!("no visible window found for {process:?}"));
    };
    println!("x: {}", rect.x);
    println!("y: {}", rect.y);
    println!("width: {}", rect.width);
    println!("height: {}", rect.height);
}
