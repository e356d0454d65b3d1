//! CSV export of the rows currently on screen.

use chrono::NaiveDate;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use tracing::info;

use crate::models::InventoryItem;

pub const CSV_HEADERS: [&str; 7] = [
    "SKU",
    "Name",
    "Category",
    "Stock",
    "Min Stock",
    "Location",
    "Total Value",
];

fn quoted(field: &str) -> String {
    format!("\"{}\"", field.replace('"', "\"\""))
}

/// CSV text for `rows`, or `None` when there is nothing to export.
pub fn inventory_csv(rows: &[&InventoryItem]) -> Option<String> {
    if rows.is_empty() {
        return None;
    }
    let mut lines = Vec::with_capacity(rows.len() + 1);
    lines.push(CSV_HEADERS.join(","));
    for item in rows {
        lines.push(
            [
                quoted(&item.sku),
                quoted(&item.name),
                quoted(&item.category),
                item.stock.to_string(),
                item.min_stock.to_string(),
                quoted(&item.location),
                quoted(&item.total_value),
            ]
            .join(","),
        );
    }
    Some(lines.join("\n"))
}

pub fn export_file_name(date: NaiveDate) -> String {
    format!("inventory_export_{}.csv", date.format("%Y-%m-%d"))
}

/// Write the export into `dir`. Returns the file path, or `None` (and writes
/// nothing) when `rows` is empty.
pub fn write_inventory_export(
    rows: &[&InventoryItem],
    dir: &Path,
    date: NaiveDate,
) -> io::Result<Option<PathBuf>> {
    let Some(csv) = inventory_csv(rows) else {
        return Ok(None);
    };
    fs::create_dir_all(dir)?;
    let path = dir.join(export_file_name(date));
    fs::write(&path, csv)?;
    info!(rows = rows.len(), path = %path.display(), "inventory exported");
    Ok(Some(path))
}
