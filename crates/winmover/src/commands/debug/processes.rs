use crate::commands::Context;

pub fn execute() {
    let ctx = Context::load();
    let names = ctx.orchestrator.locator().application_names();
    for name in &names {
        println!("{name}");
    }
    println!("\n{} applications found", names.len());
}
