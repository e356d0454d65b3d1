//! `voltstock logs`: inbound and outbound movement logs.

use anyhow::Context as _;
use clap::Args;
use serde_json::json;

use super::{cancel_on_interrupt, print_json, render_table, Context};
use crate::format::currency;
use crate::models::{LogDirection, LogItem};
use crate::table::{LogColumn, SortState};
use crate::views::LogsView;

#[derive(Args, Debug, Default)]
pub struct LogsArgs {
    /// Show one tab only (`inbound` or `outbound`).
    pub direction: Option<LogDirection>,

    /// Case-insensitive search over item, id and source/customer.
    #[arg(short, long, default_value = "")]
    pub query: String,

    /// Header click, repeatable. The sort is shared by both tabs.
    #[arg(long = "sort", value_name = "COLUMN")]
    pub sort: Vec<LogColumn>,
}

pub async fn run(args: LogsArgs, ctx: &Context) -> anyhow::Result<()> {
    let view = LogsView::new(ctx.remote.clone());
    cancel_on_interrupt(view.cancellation());
    view.reload().await.context("Failed to load movement logs")?;

    view.set_query(args.query.as_str());
    for column in &args.sort {
        view.click_column(*column);
    }

    let directions = match args.direction {
        Some(direction) => vec![direction],
        None => vec![LogDirection::Inbound, LogDirection::Outbound],
    };
    let stats = view.stats();

    if ctx.json {
        let mut out = json!({ "stats": stats });
        for direction in &directions {
            out[direction.as_path()] = json!(view.visible(*direction));
        }
        return print_json(&out);
    }

    println!(
        "Inbound (30d): {}    Outbound (30d): {}",
        currency(stats.total_inbound_30d),
        currency(stats.total_outbound_30d)
    );
    for direction in directions {
        println!();
        println!("{direction}");
        println!("{}", render_logs(&view.visible(direction), &view.sort_state()));
    }
    Ok(())
}

pub fn render_logs(rows: &[LogItem], sort: &SortState<LogColumn>) -> String {
    const COLUMNS: [(LogColumn, &str); 8] = [
        (LogColumn::Date, "Date"),
        (LogColumn::Id, "ID"),
        (LogColumn::Item, "Item"),
        (LogColumn::Quantity, "Qty"),
        (LogColumn::Value, "Value"),
        (LogColumn::SourceCustomer, "Source/Customer"),
        (LogColumn::Responsible, "Responsible"),
        (LogColumn::TotalValue, "Total"),
    ];
    let headers: Vec<String> = COLUMNS
        .iter()
        .map(|(column, label)| format!("{label} {}", sort.column_state(*column).indicator()))
        .collect();
    let body: Vec<Vec<String>> = rows
        .iter()
        .map(|log| {
            vec![
                log.date.clone(),
                log.id.clone(),
                log.item.clone(),
                log.quantity.to_string(),
                currency(log.value),
                log.source_customer.clone(),
                log.responsible.clone(),
                currency(log.total_value),
            ]
        })
        .collect();
    render_table(&headers, &body)
}
