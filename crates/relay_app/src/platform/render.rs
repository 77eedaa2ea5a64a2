//! Terminal rendering of the item table.

use relay_core::{AppViewModel, ItemStatus};

pub fn status_label(status: ItemStatus) -> &'static str {
    match status {
        ItemStatus::Unprocessed => "unprocessed",
        ItemStatus::Pending => "pending",
        ItemStatus::Processed => "processed",
        ItemStatus::Error => "error",
    }
}

pub fn render_table(view: &AppViewModel) {
    println!();
    println!(
        "{:<36} {:<12} {:>10}  {}",
        "File", "Status", "Line items", "Detail"
    );
    for row in &view.rows {
        let detail = row
            .error
            .clone()
            .or_else(|| {
                row.primary.as_ref().and_then(|primary| {
                    primary
                        .get("Total")
                        .and_then(|value| value.as_str())
                        .map(|total| format!("total {total}"))
                })
            })
            .unwrap_or_default();
        println!(
            "{:<36} {:<12} {:>10}  {}",
            truncate(&row.display_name, 36),
            status_label(row.status),
            row.line_item_count,
            detail
        );
    }
    if view.active_jobs > 0 {
        println!("({} job(s) in flight)", view.active_jobs);
    }
}

pub fn render_summary(view: &AppViewModel) {
    let processed = view
        .rows
        .iter()
        .filter(|row| row.status == ItemStatus::Processed)
        .count();
    let failed = view
        .rows
        .iter()
        .filter(|row| row.status == ItemStatus::Error)
        .count();
    println!(
        "\n{processed} processed, {failed} failed, {} total",
        view.rows.len()
    );
}

fn truncate(name: &str, max: usize) -> String {
    if name.chars().count() <= max {
        name.to_string()
    } else {
        let mut shortened: String = name.chars().take(max - 1).collect();
        shortened.push('…');
        shortened
    }
}
