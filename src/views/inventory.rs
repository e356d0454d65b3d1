//! Inventory screen: searchable, sortable item table with add, edit, delete,
//! bulk adjust and CSV export.
//!
//! Writes never touch the local collection. Every accepted write is followed
//! by a full reload from the service, and a failed write leaves the
//! collection exactly as it was.

use chrono::NaiveDate;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use super::{lock, log_read_failure, until_dismount, LoadingFlag, Notice, SubmitFlag, ViewError};
use crate::api::ApiError;
use crate::editor::{ConfirmedDelete, DeletePrompt, EditSession, ItemForm};
use crate::models::InventoryItem;
use crate::remote::InventoryRemote;
use crate::table::bulk::{plan_bulk_update, BulkEditForm, BulkPlanError};
use crate::table::export::{inventory_csv, write_inventory_export};
use crate::table::{ColumnSort, InventoryColumn, SortState, TableState};

/// The dialog currently open over the table, with its form contents.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum Dialog {
    #[default]
    Closed,
    Add(ItemForm),
    Edit(EditSession),
    Bulk(BulkEditForm),
}

pub struct InventoryView {
    remote: Arc<dyn InventoryRemote>,
    items: Mutex<Vec<InventoryItem>>,
    table: Mutex<TableState<InventoryColumn>>,
    dialog: Mutex<Dialog>,
    notice: Notice,
    loading: LoadingFlag,
    submitting: SubmitFlag,
    cancel: CancellationToken,
}

impl InventoryView {
    pub fn new(remote: Arc<dyn InventoryRemote>) -> Self {
        Self {
            remote,
            items: Mutex::new(Vec::new()),
            table: Mutex::new(TableState::default()),
            dialog: Mutex::new(Dialog::Closed),
            notice: Notice::default(),
            loading: LoadingFlag::default(),
            submitting: SubmitFlag::default(),
            cancel: CancellationToken::new(),
        }
    }

    // -----------------------------------------------------------------------
    // Lifecycle and fetch
    // -----------------------------------------------------------------------

    pub async fn mount(&self) -> Result<usize, ViewError> {
        self.reload().await
    }

    /// Token cancelled on dismount; cancelling it directly abandons in-flight
    /// fetches without resetting view state.
    pub fn cancellation(&self) -> CancellationToken {
        self.cancel.clone()
    }

    /// Tear the view down: in-flight fetches are abandoned and the search,
    /// sort and dialog state is dropped. A write already sent runs to
    /// completion but leaves no notice and triggers no reload.
    pub fn dismount(&self) {
        self.cancel.cancel();
        lock(&self.table).reset();
        *lock(&self.dialog) = Dialog::Closed;
    }

    pub fn is_dismounted(&self) -> bool {
        self.cancel.is_cancelled()
    }

    /// Replace the collection with a fresh listing. On failure the previous
    /// collection stays on screen.
    pub async fn reload(&self) -> Result<usize, ViewError> {
        let _loading = self.loading.start();
        match until_dismount(&self.cancel, self.remote.list_inventory()).await {
            Ok(items) => {
                let count = items.len();
                *lock(&self.items) = items;
                debug!(count, "inventory reloaded");
                Ok(count)
            }
            Err(e) => {
                log_read_failure("inventory", &e);
                Err(e.into())
            }
        }
    }

    /// Write-then-reload: a rejected write raises `failure` as the notice; an
    /// accepted one is followed by a reload whose own failure is reported
    /// separately without undoing the write.
    async fn after_write(
        &self,
        action: &str,
        failure: &str,
        result: Result<(), ApiError>,
    ) -> Result<(), ViewError> {
        if let Err(e) = result {
            warn!(action, error = %e, "inventory write failed");
            if !self.is_dismounted() {
                self.notice.raise(format!("{failure}: {e}"));
            }
            return Err(e.into());
        }
        if self.is_dismounted() {
            info!(action, "inventory write accepted after dismount");
            return Ok(());
        }
        info!(action, "inventory write accepted, reloading");
        if let Err(e) = self.reload().await {
            if !e.is_cancelled() {
                self.notice
                    .raise(format!("Saved, but the inventory could not be refreshed: {e}"));
            }
        }
        Ok(())
    }

    // -----------------------------------------------------------------------
    // Read side
    // -----------------------------------------------------------------------

    /// The collection as last fetched, unfiltered and unsorted.
    pub fn items(&self) -> Vec<InventoryItem> {
        lock(&self.items).clone()
    }

    /// Rows as the table shows them: filtered, then sorted.
    pub fn visible(&self) -> Vec<InventoryItem> {
        let items = lock(&self.items);
        let table = lock(&self.table);
        table.visible(&items).into_iter().cloned().collect()
    }

    /// Rows passing the search filter, in collection order.
    pub fn filtered(&self) -> Vec<InventoryItem> {
        let items = lock(&self.items);
        let table = lock(&self.table);
        table.filtered(&items).into_iter().cloned().collect()
    }

    pub fn filtered_count(&self) -> usize {
        let items = lock(&self.items);
        let table = lock(&self.table);
        table.filtered(&items).len()
    }

    pub fn find(&self, sku: &str) -> Option<InventoryItem> {
        lock(&self.items).iter().find(|i| i.sku == sku).cloned()
    }

    pub fn is_loading(&self) -> bool {
        self.loading.is_set()
    }

    pub fn is_submitting(&self) -> bool {
        self.submitting.is_set()
    }

    pub fn notice(&self) -> Option<String> {
        self.notice.get()
    }

    pub fn dismiss_notice(&self) {
        self.notice.dismiss();
    }

    // -----------------------------------------------------------------------
    // Search and sort
    // -----------------------------------------------------------------------

    pub fn set_query(&self, query: impl Into<String>) {
        lock(&self.table).query = query.into();
    }

    pub fn query(&self) -> String {
        lock(&self.table).query.clone()
    }

    /// Header click on `column`.
    pub fn click_column(&self, column: InventoryColumn) {
        lock(&self.table).sort.click(column);
    }

    pub fn sort_state(&self) -> SortState<InventoryColumn> {
        lock(&self.table).sort
    }

    pub fn column_sort(&self, column: InventoryColumn) -> ColumnSort {
        lock(&self.table).sort.column_state(column)
    }

    // -----------------------------------------------------------------------
    // Dialogs
    // -----------------------------------------------------------------------

    pub fn dialog(&self) -> Dialog {
        lock(&self.dialog).clone()
    }

    pub fn open_add(&self) {
        *lock(&self.dialog) = Dialog::Add(ItemForm::default());
    }

    /// Open the edit dialog pre-filled from the row as it is right now.
    pub fn open_edit(&self, sku: &str) -> Result<EditSession, ViewError> {
        let item = self
            .find(sku)
            .ok_or_else(|| ViewError::UnknownRecord(sku.to_string()))?;
        let session = EditSession::open(&item);
        *lock(&self.dialog) = Dialog::Edit(session.clone());
        Ok(session)
    }

    /// Open bulk adjust over the filtered rows; refused when nothing matches.
    pub fn open_bulk(&self) -> Result<usize, ViewError> {
        let count = self.filtered_count();
        if count == 0 {
            return Err(BulkPlanError::EmptySelection.into());
        }
        *lock(&self.dialog) = Dialog::Bulk(BulkEditForm::default());
        Ok(count)
    }

    /// Edit the open dialog's form in place.
    pub fn edit_dialog(&self, edit: impl FnOnce(&mut Dialog)) {
        edit(&mut *lock(&self.dialog));
    }

    pub fn close_dialog(&self) {
        *lock(&self.dialog) = Dialog::Closed;
    }

    /// Submit whichever dialog is open. It closes on success and stays open
    /// (with a notice) on failure.
    pub async fn submit_dialog(&self) -> Result<(), ViewError> {
        let result = match self.dialog() {
            Dialog::Closed => return Err(ViewError::NoDialog),
            Dialog::Add(form) => self.create_item(&form).await,
            Dialog::Edit(session) => self.update_item(&session).await,
            Dialog::Bulk(form) => self.bulk_update(&form).await.map(|_| ()),
        };
        if result.is_ok() {
            self.close_dialog();
        }
        result
    }

    // -----------------------------------------------------------------------
    // Writes
    // -----------------------------------------------------------------------

    pub async fn create_item(&self, form: &ItemForm) -> Result<(), ViewError> {
        let _submitting = self.submitting.try_start()?;
        let payload = form.to_payload();
        let result = self.remote.create_item(&payload).await;
        self.after_write("create", "Error adding item", result).await
    }

    pub async fn update_item(&self, session: &EditSession) -> Result<(), ViewError> {
        let _submitting = self.submitting.try_start()?;
        let payload = session.form.to_payload();
        let result = self.remote.update_item(&session.sku, &payload).await;
        self.after_write("update", "Error updating item", result).await
    }

    /// Apply `form` to every row passing the filter at this moment. Returns
    /// the number of targeted rows.
    pub async fn bulk_update(&self, form: &BulkEditForm) -> Result<usize, ViewError> {
        let _submitting = self.submitting.try_start()?;
        let payload = {
            let items = lock(&self.items);
            let table = lock(&self.table);
            plan_bulk_update(form, &table.filtered(&items))?
        };
        let targets = payload.skus.len();
        debug!(targets, "bulk update planned");
        let result = self.remote.bulk_update(&payload).await;
        self.after_write("bulk_update", "Error during bulk update", result)
            .await
            .map(|()| targets)
    }

    /// First half of a delete: ask before sending anything.
    pub fn request_delete(&self, sku: &str) -> Result<DeletePrompt, ViewError> {
        if self.find(sku).is_none() {
            return Err(ViewError::UnknownRecord(sku.to_string()));
        }
        Ok(DeletePrompt::new(sku))
    }

    pub async fn delete_item(&self, confirmed: ConfirmedDelete) -> Result<(), ViewError> {
        let _submitting = self.submitting.try_start()?;
        let result = self.remote.delete_item(confirmed.id()).await;
        self.after_write("delete", "Error deleting item", result).await
    }

    // -----------------------------------------------------------------------
    // Export
    // -----------------------------------------------------------------------

    /// CSV of the visible rows, `None` when the table is empty.
    pub fn export_csv(&self) -> Option<String> {
        let items = lock(&self.items);
        let table = lock(&self.table);
        inventory_csv(&table.visible(&items))
    }

    pub fn export_to(&self, dir: &Path, date: NaiveDate) -> io::Result<Option<PathBuf>> {
        let items = lock(&self.items);
        let table = lock(&self.table);
        write_inventory_export(&table.visible(&items), dir, date)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{item, offline, FakeRemote};
    use serde_json::json;

    fn two_items() -> Vec<InventoryItem> {
        vec![
            item("A", "Widget", "Parts", 5, 10),
            item("B", "Gadget", "Tools", 20, 5),
        ]
    }

    async fn mounted(fake: &Arc<FakeRemote>) -> InventoryView {
        let view = InventoryView::new(fake.clone());
        view.mount().await.unwrap();
        view
    }

    fn skus(rows: &[InventoryItem]) -> Vec<&str> {
        rows.iter().map(|r| r.sku.as_str()).collect()
    }

    #[tokio::test]
    async fn sort_cycle_over_fetched_collection() {
        let fake = FakeRemote::with_items(two_items());
        let view = mounted(&fake).await;
        assert_eq!(skus(&view.visible()), vec!["A", "B"]);

        view.click_column(InventoryColumn::Stock);
        assert_eq!(skus(&view.visible()), vec!["A", "B"]);
        view.click_column(InventoryColumn::Stock);
        assert_eq!(skus(&view.visible()), vec!["B", "A"]);
        assert_eq!(view.column_sort(InventoryColumn::Stock), ColumnSort::Descending);
        view.click_column(InventoryColumn::Stock);
        assert_eq!(skus(&view.visible()), vec!["A", "B"]);
        assert!(view.sort_state().is_unsorted());
    }

    #[tokio::test]
    async fn create_reloads_instead_of_patching() {
        let fake = FakeRemote::with_items(two_items());
        let view = mounted(&fake).await;
        view.open_add();
        view.edit_dialog(|d| {
            if let Dialog::Add(form) = d {
                form.name = "Sprocket".into();
                form.category = "Parts".into();
                form.stock = "abc".into();
                form.location = "B-2".into();
            }
        });
        view.submit_dialog().await.unwrap();

        assert_eq!(view.dialog(), Dialog::Closed);
        assert_eq!(view.items().len(), 3);
        assert_eq!(fake.state().item_payloads[0].stock, 0);
        assert_eq!(
            fake.calls(),
            vec!["list_inventory", "create_item", "list_inventory"]
        );
    }

    #[tokio::test]
    async fn failed_create_keeps_dialog_and_collection() {
        let fake = FakeRemote::with_items(two_items());
        let view = mounted(&fake).await;
        fake.fail("create_item", 1, offline());
        view.open_add();

        let err = view.submit_dialog().await.unwrap_err();
        assert!(matches!(err, ViewError::Api(ApiError::Transport(_))));
        assert!(matches!(view.dialog(), Dialog::Add(_)));
        assert_eq!(view.items(), two_items());
        assert!(view.notice().unwrap().starts_with("Error adding item"));
        assert_eq!(fake.count("list_inventory"), 1);
        assert!(!view.is_submitting());
    }

    #[tokio::test]
    async fn bulk_targets_filtered_rows_with_null_overrides() {
        let fake = FakeRemote::with_items(two_items());
        let view = mounted(&fake).await;
        assert_eq!(view.open_bulk().unwrap(), 2);
        view.edit_dialog(|d| {
            if let Dialog::Bulk(form) = d {
                form.stock = "50".into();
            }
        });
        view.submit_dialog().await.unwrap();

        let payload = fake.state().bulk_payloads[0].clone();
        assert_eq!(
            serde_json::to_value(&payload).unwrap(),
            json!({
                "skus": ["A", "B"],
                "name": null,
                "category": null,
                "location": null,
                "stock": 50,
                "minStock": null
            })
        );
        assert!(view.items().iter().all(|i| i.stock == 50));
        assert_eq!(view.items()[0].name, "Widget");
    }

    #[tokio::test]
    async fn bulk_scope_is_rederived_at_submit_time() {
        let fake = FakeRemote::with_items(two_items());
        let view = mounted(&fake).await;
        view.open_bulk().unwrap();
        view.set_query("gadget");
        let form = BulkEditForm {
            location: "Dock 9".into(),
            ..Default::default()
        };
        assert_eq!(view.bulk_update(&form).await.unwrap(), 1);
        assert_eq!(fake.state().bulk_payloads[0].skus, vec!["B".to_string()]);
    }

    #[tokio::test]
    async fn bulk_refused_without_matches() {
        let fake = FakeRemote::with_items(two_items());
        let view = mounted(&fake).await;
        view.set_query("nothing matches this");
        assert!(matches!(view.open_bulk(), Err(ViewError::Plan(_))));
        let form = BulkEditForm {
            stock: "1".into(),
            ..Default::default()
        };
        assert!(view.bulk_update(&form).await.is_err());
        assert_eq!(fake.count("bulk_update"), 0);
    }

    #[tokio::test]
    async fn edit_uses_snapshot_taken_at_open() {
        let fake = FakeRemote::with_items(two_items());
        let view = mounted(&fake).await;
        let session = view.open_edit("A").unwrap();
        assert_eq!(session.form.name, "Widget");

        fake.state().items[0].name = "Renamed elsewhere".into();
        view.reload().await.unwrap();
        match view.dialog() {
            Dialog::Edit(open) => assert_eq!(open.form.name, "Widget"),
            other => panic!("unexpected dialog {other:?}"),
        }

        view.edit_dialog(|d| {
            if let Dialog::Edit(s) = d {
                s.form.stock = "12".into();
            }
        });
        view.submit_dialog().await.unwrap();
        let updated = view.find("A").unwrap();
        assert_eq!(updated.stock, 12);
        assert_eq!(updated.name, "Widget");
    }

    #[tokio::test]
    async fn delete_then_failed_refetch_keeps_previous_collection() {
        let fake = FakeRemote::with_items(two_items());
        let view = mounted(&fake).await;
        fake.fail("list_inventory", 1, offline());

        let prompt = view.request_delete("A").unwrap();
        view.delete_item(prompt.confirm()).await.unwrap();

        assert!(fake.state().items.iter().all(|i| i.sku != "A"));
        assert_eq!(skus(&view.items()), vec!["A", "B"]);
        assert!(view.notice().unwrap().contains("could not be refreshed"));

        view.dismiss_notice();
        view.reload().await.unwrap();
        assert_eq!(skus(&view.items()), vec!["B"]);
    }

    #[tokio::test]
    async fn delete_of_unknown_row_is_refused() {
        let fake = FakeRemote::with_items(two_items());
        let view = mounted(&fake).await;
        assert_eq!(
            view.request_delete("Z").unwrap_err(),
            ViewError::UnknownRecord("Z".into())
        );
    }

    #[tokio::test]
    async fn double_submit_is_rejected_while_in_flight() {
        let fake = FakeRemote::with_items(two_items());
        let view = Arc::new(mounted(&fake).await);
        let gate = fake.hold("create_item");

        let first = {
            let view = view.clone();
            tokio::spawn(async move { view.create_item(&ItemForm::default()).await })
        };
        while !view.is_submitting() {
            tokio::task::yield_now().await;
        }
        assert_eq!(
            view.create_item(&ItemForm::default()).await,
            Err(ViewError::Busy)
        );

        gate.notify_one();
        first.await.unwrap().unwrap();
        assert_eq!(fake.count("create_item"), 1);
        assert!(!view.is_submitting());
    }

    #[tokio::test]
    async fn dismount_discards_late_response() {
        let fake = FakeRemote::with_items(two_items());
        let view = Arc::new(InventoryView::new(fake.clone()));
        view.set_query("widget");
        let gate = fake.hold("list_inventory");

        let load = {
            let view = view.clone();
            tokio::spawn(async move { view.mount().await })
        };
        while !view.is_loading() {
            tokio::task::yield_now().await;
        }
        view.dismount();
        gate.notify_one();

        let err = load.await.unwrap().unwrap_err();
        assert!(err.is_cancelled());
        assert!(view.items().is_empty());
        assert_eq!(view.query(), "");
    }

    #[tokio::test]
    async fn write_in_flight_at_dismount_completes_quietly() {
        let fake = FakeRemote::with_items(two_items());
        let view = Arc::new(mounted(&fake).await);
        let gate = fake.hold("create_item");

        let write = {
            let view = view.clone();
            tokio::spawn(async move { view.create_item(&ItemForm::default()).await })
        };
        while !view.is_submitting() {
            tokio::task::yield_now().await;
        }
        view.dismount();
        gate.notify_one();

        assert_eq!(write.await.unwrap(), Ok(()));
        assert_eq!(view.notice(), None);
        assert_eq!(fake.calls(), vec!["list_inventory", "create_item"]);
        assert_eq!(view.items(), two_items());
    }

    #[tokio::test]
    async fn write_failing_after_dismount_raises_no_notice() {
        let fake = FakeRemote::with_items(two_items());
        let view = Arc::new(mounted(&fake).await);
        fake.fail("delete_item", 1, offline());
        let gate = fake.hold("delete_item");
        let prompt = view.request_delete("A").unwrap();

        let write = {
            let view = view.clone();
            tokio::spawn(async move { view.delete_item(prompt.confirm()).await })
        };
        while !view.is_submitting() {
            tokio::task::yield_now().await;
        }
        view.dismount();
        gate.notify_one();

        let err = write.await.unwrap().unwrap_err();
        assert!(matches!(err, ViewError::Api(ApiError::Transport(_))));
        assert_eq!(view.notice(), None);
        assert_eq!(view.items(), two_items());
    }

    #[tokio::test]
    async fn export_follows_visible_order() {
        let fake = FakeRemote::with_items(two_items());
        let view = mounted(&fake).await;
        view.click_column(InventoryColumn::Stock);
        view.click_column(InventoryColumn::Stock);
        let csv = view.export_csv().unwrap();
        let rows: Vec<&str> = csv.lines().skip(1).collect();
        assert!(rows[0].starts_with("\"B\""));
        assert!(rows[1].starts_with("\"A\""));

        view.set_query("no match");
        assert_eq!(view.export_csv(), None);
    }
}
