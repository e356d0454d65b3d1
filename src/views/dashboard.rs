//! Dashboard screen: headline metrics and the 7-day movement chart.

use serde::Serialize;
use std::sync::{Arc, Mutex};
use tokio_util::sync::CancellationToken;

use super::{lock, log_read_failure, until_dismount, LoadingFlag, ViewError};
use crate::format::{currency, percent};
use crate::models::{ChartPoint, DashboardSummary};
use crate::remote::InventoryRemote;

/// One headline card.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MetricCard {
    pub title: &'static str,
    pub value: String,
    pub subtitle: Option<String>,
    /// Rendered with the warning style.
    pub alert: bool,
}

impl MetricCard {
    fn new(title: &'static str, value: String) -> Self {
        Self {
            title,
            value,
            subtitle: None,
            alert: false,
        }
    }

    fn with_subtitle(mut self, subtitle: impl Into<String>) -> Self {
        self.subtitle = Some(subtitle.into());
        self
    }
}

pub fn metric_cards(summary: &DashboardSummary) -> Vec<MetricCard> {
    let mut low_stock = MetricCard::new("Low Stock Alerts", summary.low_stock_count.to_string())
        .with_subtitle("items needing reorder");
    low_stock.alert = summary.low_stock_count > 0;
    vec![
        MetricCard::new("Total Inventory Value", currency(summary.total_inventory_value)),
        low_stock,
        MetricCard::new("Orders Pending Shipment", summary.pending_orders.to_string())
            .with_subtitle("orders"),
        MetricCard::new("Monthly Turnover Rate", percent(summary.turnover_rate)),
        MetricCard::new("Top Selling Item", summary.top_selling_item.clone())
            .with_subtitle(format!("{} units sold (30d)", summary.top_selling_qty)),
        MetricCard::new("Value Shipped (MTD)", currency(summary.mtd_shipped_value)),
    ]
}

pub struct DashboardView {
    remote: Arc<dyn InventoryRemote>,
    summary: Mutex<Option<DashboardSummary>>,
    loading: LoadingFlag,
    cancel: CancellationToken,
}

impl DashboardView {
    pub fn new(remote: Arc<dyn InventoryRemote>) -> Self {
        Self {
            remote,
            summary: Mutex::new(None),
            loading: LoadingFlag::default(),
            cancel: CancellationToken::new(),
        }
    }

    pub async fn reload(&self) -> Result<(), ViewError> {
        let _loading = self.loading.start();
        match until_dismount(&self.cancel, self.remote.dashboard()).await {
            Ok(summary) => {
                *lock(&self.summary) = Some(summary);
                Ok(())
            }
            Err(e) => {
                log_read_failure("dashboard", &e);
                Err(e.into())
            }
        }
    }

    /// Token cancelled on dismount; cancelling it directly abandons in-flight
    /// fetches without resetting view state.
    pub fn cancellation(&self) -> CancellationToken {
        self.cancel.clone()
    }

    pub fn dismount(&self) {
        self.cancel.cancel();
    }

    pub fn is_loading(&self) -> bool {
        self.loading.is_set()
    }

    /// Last summary fetched; `None` until a load succeeds.
    pub fn summary(&self) -> Option<DashboardSummary> {
        lock(&self.summary).clone()
    }

    /// Cards for the last summary, `None` when there is nothing to show.
    pub fn metrics(&self) -> Option<Vec<MetricCard>> {
        lock(&self.summary).as_ref().map(metric_cards)
    }

    pub fn chart(&self) -> Vec<ChartPoint> {
        lock(&self.summary)
            .as_ref()
            .map(|s| s.chart_data.clone())
            .unwrap_or_default()
    }
}
