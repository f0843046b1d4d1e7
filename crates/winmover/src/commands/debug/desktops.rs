use crate::commands::Context;

pub fn execute() {
    let ctx = Context::load();
    let names = ctx.orchestrator.desktops().desktop_names_or_empty();
    for (index, name) in names.iter().enumerate() {
        println!("{:>3}  {name}", index + 1);
    }
    println!("\n{} desktops found", names.len());
}
