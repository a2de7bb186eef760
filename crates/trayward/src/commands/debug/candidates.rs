use comfy_table::presets::UTF8_FULL;
use comfy_table::{Cell, CellAlignment, ContentArrangement, Table};

use trayward_core::ACCEPT_SCORE_THRESHOLD;

use crate::commands::platform;

/// Ranks the windows that would be considered for `name` right now.
///
/// Launch and novelty signals do not apply, so scores match what a
/// hide of an already running app would see.
pub fn execute(name: &str) {
    let config = crate::commands::load_config(false);
    let app = crate::commands::find_app_or_exit(&config, name);

    let ranked = platform::service().preview_candidates(app);

    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_header(vec![
            Cell::new("#").set_alignment(CellAlignment::Right),
            Cell::new("Score").set_alignment(CellAlignment::Right),
            Cell::new("HWND"),
            Cell::new("Target"),
            Cell::new("Process"),
            Cell::new("Title"),
            Cell::new("Acts"),
        ]);

    for (rank, entry) in ranked.iter().enumerate() {
        let window = &entry.candidate.window;
        let accepted = entry.candidate.score >= ACCEPT_SCORE_THRESHOLD;
        table.add_row(vec![
            Cell::new(rank + 1).set_alignment(CellAlignment::Right),
            Cell::new(entry.candidate.score).set_alignment(CellAlignment::Right),
            Cell::new(format!("0x{:X}", window.handle)),
            Cell::new(format!("0x{:X}", entry.target)),
            Cell::new(&window.process_name),
            Cell::new(&window.title),
            Cell::new(if accepted { "yes" } else { "no" }),
        ]);
    }

    println!("{table}");
    println!(
        "\n{} candidates for {} (threshold {ACCEPT_SCORE_THRESHOLD})",
        ranked.len(),
        app.name
    );
}
