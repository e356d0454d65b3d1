//! `voltstock inventory`: the inventory table.

use anyhow::{bail, Context as _};
use clap::{Args, Subcommand};
use std::path::PathBuf;

use super::{cancel_on_interrupt, confirm, print_json, render_table, show_notice, Context};
use crate::editor::ItemForm;
use crate::format::currency;
use crate::models::InventoryItem;
use crate::table::bulk::BulkEditForm;
use crate::table::{InventoryColumn, SortState};
use crate::views::inventory::Dialog;
use crate::views::InventoryView;

#[derive(Subcommand, Debug)]
pub enum InventoryCommand {
    /// Show the table, optionally searched and sorted.
    List(TableArgs),
    /// Add an item.
    Add(NewItemArgs),
    /// Edit an item; fields not given keep their current value.
    Edit(EditItemArgs),
    /// Delete an item after confirmation.
    Delete {
        sku: String,
        /// Do not ask for confirmation.
        #[arg(short, long)]
        yes: bool,
    },
    /// Apply the same change to every item matching the search.
    Bulk(BulkArgs),
    /// Write the visible rows to inventory_export_<date>.csv.
    Export {
        #[command(flatten)]
        table: TableArgs,
        /// Directory to write the file into.
        #[arg(long, default_value = ".")]
        dir: PathBuf,
    },
}

#[derive(Args, Debug, Default)]
pub struct TableArgs {
    /// Case-insensitive search over name, SKU and category.
    #[arg(short, long, default_value = "")]
    pub query: String,

    /// Header click; repeat to cycle (`--sort stock --sort stock` is descending).
    #[arg(long = "sort", value_name = "COLUMN")]
    pub sort: Vec<InventoryColumn>,
}

#[derive(Args, Debug, Default)]
pub struct NewItemArgs {
    #[arg(long)]
    pub name: String,
    #[arg(long, default_value = "")]
    pub category: String,
    #[arg(long, default_value = "")]
    pub stock: String,
    #[arg(long, default_value = "")]
    pub min_stock: String,
    #[arg(long, default_value = "")]
    pub location: String,
    #[arg(long, default_value = "")]
    pub unit_price: String,
}

#[derive(Args, Debug, Default)]
pub struct EditItemArgs {
    pub sku: String,
    #[arg(long)]
    pub name: Option<String>,
    #[arg(long)]
    pub category: Option<String>,
    #[arg(long)]
    pub stock: Option<String>,
    #[arg(long)]
    pub min_stock: Option<String>,
    #[arg(long)]
    pub location: Option<String>,
    #[arg(long)]
    pub unit_price: Option<String>,
}

#[derive(Args, Debug, Default)]
pub struct BulkArgs {
    /// Search selecting the target items; empty targets everything.
    #[arg(short, long, default_value = "")]
    pub query: String,
    #[arg(long)]
    pub name: Option<String>,
    #[arg(long)]
    pub category: Option<String>,
    #[arg(long)]
    pub stock: Option<String>,
    #[arg(long)]
    pub min_stock: Option<String>,
    #[arg(long)]
    pub location: Option<String>,
}

impl BulkArgs {
    fn form(&self) -> BulkEditForm {
        BulkEditForm {
            name: self.name.clone().unwrap_or_default(),
            category: self.category.clone().unwrap_or_default(),
            stock: self.stock.clone().unwrap_or_default(),
            min_stock: self.min_stock.clone().unwrap_or_default(),
            location: self.location.clone().unwrap_or_default(),
        }
    }
}

fn apply_table(view: &InventoryView, table: &TableArgs) {
    view.set_query(table.query.as_str());
    for column in &table.sort {
        view.click_column(*column);
    }
}

async fn open(ctx: &Context) -> anyhow::Result<InventoryView> {
    let view = InventoryView::new(ctx.remote.clone());
    cancel_on_interrupt(view.cancellation());
    view.mount().await.context("Failed to load inventory")?;
    Ok(view)
}

pub async fn run(cmd: InventoryCommand, ctx: &Context) -> anyhow::Result<()> {
    let view = open(ctx).await?;
    match cmd {
        InventoryCommand::List(table) => {
            apply_table(&view, &table);
            let rows = view.visible();
            if ctx.json {
                return print_json(&rows);
            }
            println!("{}", render_inventory(&rows, &view.sort_state()));
            println!("{} of {} items", rows.len(), view.items().len());
        }
        InventoryCommand::Add(args) => {
            view.open_add();
            view.edit_dialog(|dialog| {
                if let Dialog::Add(form) = dialog {
                    *form = ItemForm {
                        name: args.name,
                        category: args.category,
                        stock: args.stock,
                        min_stock: args.min_stock,
                        location: args.location,
                        unit_price: args.unit_price,
                    };
                }
            });
            view.submit_dialog().await.context("Error adding item")?;
            println!("Item added ({} items)", view.items().len());
        }
        InventoryCommand::Edit(args) => {
            view.open_edit(&args.sku)?;
            view.edit_dialog(|dialog| {
                if let Dialog::Edit(session) = dialog {
                    let form = &mut session.form;
                    let fields = [
                        (&mut form.name, args.name),
                        (&mut form.category, args.category),
                        (&mut form.stock, args.stock),
                        (&mut form.min_stock, args.min_stock),
                        (&mut form.location, args.location),
                        (&mut form.unit_price, args.unit_price),
                    ];
                    for (slot, value) in fields {
                        if let Some(value) = value {
                            *slot = value;
                        }
                    }
                }
            });
            view.submit_dialog().await.context("Error updating item")?;
            println!("Item {} updated", args.sku);
        }
        InventoryCommand::Delete { sku, yes } => {
            let prompt = view.request_delete(&sku)?;
            if !confirm(&format!("Delete item {sku}?"), yes).await? {
                println!("Cancelled");
                return Ok(());
            }
            view.delete_item(prompt.confirm())
                .await
                .context("Error deleting item")?;
            println!("Item {sku} deleted");
        }
        InventoryCommand::Bulk(args) => {
            view.set_query(args.query.as_str());
            let targets = view
                .bulk_update(&args.form())
                .await
                .context("Error during bulk update")?;
            println!("Updated {targets} items");
        }
        InventoryCommand::Export { table, dir } => {
            apply_table(&view, &table);
            let today = chrono::Local::now().date_naive();
            match view.export_to(&dir, today).context("Failed to write export")? {
                Some(path) => println!("Exported to {}", path.display()),
                None => bail!("Nothing to export"),
            }
        }
    }
    show_notice(view.notice());
    Ok(())
}

/// Rows as the inventory table shows them. Low-stock rows are flagged with
/// `!` and the sorted column header carries its direction arrow.
pub fn render_inventory(rows: &[InventoryItem], sort: &SortState<InventoryColumn>) -> String {
    const COLUMNS: [(InventoryColumn, &str); 7] = [
        (InventoryColumn::Sku, "SKU"),
        (InventoryColumn::Name, "Name"),
        (InventoryColumn::Category, "Category"),
        (InventoryColumn::Stock, "Stock"),
        (InventoryColumn::MinStock, "Min Stock"),
        (InventoryColumn::Location, "Location"),
        (InventoryColumn::TotalValue, "Total Value"),
    ];
    let mut headers = vec![String::new()];
    headers.extend(
        COLUMNS
            .iter()
            .map(|(column, label)| format!("{label} {}", sort.column_state(*column).indicator())),
    );
    let body: Vec<Vec<String>> = rows
        .iter()
        .map(|item| {
            vec![
                if item.is_low_stock() { "!" } else { "" }.to_string(),
                item.sku.clone(),
                item.name.clone(),
                item.category.clone(),
                item.stock.to_string(),
                item.min_stock.to_string(),
                item.location.clone(),
                if item.total_value.is_empty() {
                    currency(0.0)
                } else {
                    item.total_value.clone()
                },
            ]
        })
        .collect();
    render_table(&headers, &body)
}
