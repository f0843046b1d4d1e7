use comfy_table::presets::UTF8_FULL;
use comfy_table::{Cell, ContentArrangement, Table};

use crate::commands::Context;

pub fn execute(friendly: bool) {
    let ctx = Context::load();
    let screens = ctx.orchestrator.screens();
    let entries = screens.screens(friendly);

    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_header(vec![
            Cell::new("Monitor"),
            Cell::new("Device"),
            Cell::new("Key"),
            Cell::new("Work area"),
        ]);

    for entry in &entries {
        let work_area = screens
            .resolve_screen(&entry.unique_key)
            .map(|s| {
                let r = s.work_area;
                format!("{}x{} at {},{}", r.width, r.height, r.x, r.y)
            })
            .unwrap_or_default();
        table.add_row(vec![
            Cell::new(&entry.label),
            Cell::new(&entry.device_name),
            Cell::new(&entry.unique_key),
            Cell::new(work_area),
        ]);
    }

    println!("{table}");
    println!("\n{} monitors found", entries.len());
}
