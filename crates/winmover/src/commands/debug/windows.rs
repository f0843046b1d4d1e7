use comfy_table::presets::UTF8_FULL;
use comfy_table::{Cell, CellAlignment, ContentArrangement, Table};

use crate::commands::Context;

pub fn execute() {
    let ctx = Context::load();
    let windows = ctx.orchestrator.locator().main_windows();

    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_header(vec![
            Cell::new("PID").set_alignment(CellAlignment::Right),
            Cell::new("Process"),
            Cell::new("Window"),
            Cell::new("Title"),
        ]);

    for (process, title) in &windows {
        let window = process
            .main_window
            .map(|w| w.to_string())
            .unwrap_or_default();
        table.add_row(vec![
            Cell::new(process.pid).set_alignment(CellAlignment::Right),
            Cell::new(&process.name),
            Cell::new(window),
            Cell::new(title),
        ]);
    }

    println!("{table}");
    println!("\n{} windows found", windows.len());
}
