//! `voltstock dashboard`: headline metrics.

use anyhow::{anyhow, Context as _};
use serde_json::json;

use super::{cancel_on_interrupt, print_json, render_table, Context};
use crate::models::ChartPoint;
use crate::views::dashboard::MetricCard;
use crate::views::DashboardView;

pub async fn run(ctx: &Context) -> anyhow::Result<()> {
    let view = DashboardView::new(ctx.remote.clone());
    cancel_on_interrupt(view.cancellation());
    view.reload()
        .await
        .context("Failed to load dashboard metrics")?;
    let cards = view
        .metrics()
        .ok_or_else(|| anyhow!("Error loading dashboard."))?;

    if ctx.json {
        return print_json(&json!({ "metrics": cards, "chart": view.chart() }));
    }
    println!("{}", render_cards(&cards));
    let chart = view.chart();
    if !chart.is_empty() {
        println!();
        println!("{}", render_chart(&chart));
    }
    Ok(())
}

pub fn render_cards(cards: &[MetricCard]) -> String {
    cards
        .iter()
        .map(|card| {
            let marker = if card.alert { " (!)" } else { "" };
            match &card.subtitle {
                Some(subtitle) => format!("{}: {}{marker}  {subtitle}", card.title, card.value),
                None => format!("{}: {}{marker}", card.title, card.value),
            }
        })
        .collect::<Vec<_>>()
        .join("\n")
}

fn render_chart(points: &[ChartPoint]) -> String {
    let headers: Vec<String> = ["Day", "Inbound", "Outbound"].map(String::from).to_vec();
    let body: Vec<Vec<String>> = points
        .iter()
        .map(|p| vec![p.day.clone(), p.inbound.to_string(), p.outbound.to_string()])
        .collect();
    render_table(&headers, &body)
}
