//! Movement logs screen: 30-day totals plus inbound and outbound tabs that
//! share one search box and one sort state.

use std::sync::{Arc, Mutex};
use tokio_util::sync::CancellationToken;
use tracing::debug;

use super::{lock, log_read_failure, until_dismount, LoadingFlag, ViewError};
use crate::models::{LogDirection, LogItem, SummaryStats};
use crate::remote::InventoryRemote;
use crate::table::{ColumnSort, LogColumn, SortState, TableState};

#[derive(Debug, Default)]
struct Snapshot {
    stats: SummaryStats,
    inbound: Vec<LogItem>,
    outbound: Vec<LogItem>,
}

pub struct LogsView {
    remote: Arc<dyn InventoryRemote>,
    data: Mutex<Snapshot>,
    table: Mutex<TableState<LogColumn>>,
    loading: LoadingFlag,
    cancel: CancellationToken,
}

impl LogsView {
    pub fn new(remote: Arc<dyn InventoryRemote>) -> Self {
        Self {
            remote,
            data: Mutex::new(Snapshot::default()),
            table: Mutex::new(TableState::default()),
            loading: LoadingFlag::default(),
            cancel: CancellationToken::new(),
        }
    }

    /// Fetch stats and both logs together. All three land or none do.
    pub async fn reload(&self) -> Result<(), ViewError> {
        let _loading = self.loading.start();
        let fetch = async {
            tokio::try_join!(
                self.remote.stats(),
                self.remote.logs(LogDirection::Inbound),
                self.remote.logs(LogDirection::Outbound),
            )
        };
        match until_dismount(&self.cancel, fetch).await {
            Ok((stats, inbound, outbound)) => {
                debug!(
                    inbound = inbound.len(),
                    outbound = outbound.len(),
                    "movement logs reloaded"
                );
                *lock(&self.data) = Snapshot {
                    stats,
                    inbound,
                    outbound,
                };
                Ok(())
            }
            Err(e) => {
                log_read_failure("logs", &e);
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
        lock(&self.table).reset();
    }

    pub fn is_loading(&self) -> bool {
        self.loading.is_set()
    }

    /// Totals for the summary cards; zeros until the first successful load.
    pub fn stats(&self) -> SummaryStats {
        lock(&self.data).stats
    }

    /// Filtered and sorted rows of one tab.
    pub fn visible(&self, direction: LogDirection) -> Vec<LogItem> {
        let data = lock(&self.data);
        let table = lock(&self.table);
        let rows = match direction {
            LogDirection::Inbound => &data.inbound,
            LogDirection::Outbound => &data.outbound,
        };
        table.visible(rows).into_iter().cloned().collect()
    }

    pub fn set_query(&self, query: impl Into<String>) {
        lock(&self.table).query = query.into();
    }

    pub fn click_column(&self, column: LogColumn) {
        lock(&self.table).sort.click(column);
    }

    pub fn sort_state(&self) -> SortState<LogColumn> {
        lock(&self.table).sort
    }

    pub fn column_sort(&self, column: LogColumn) -> ColumnSort {
        lock(&self.table).sort.column_state(column)
    }
}
