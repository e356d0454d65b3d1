//! Shipping screen: the order list and the automation rules that reorder or
//! ship stock on their own.

use std::sync::{Arc, Mutex};
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};

use super::{lock, log_read_failure, until_dismount, LoadingFlag, Notice, SubmitFlag, ViewError};
use crate::api::ApiError;
use crate::editor::{ConfirmedDelete, DeletePrompt, RuleForm};
use crate::models::{AutomationRule, Order, RuleStatus};
use crate::remote::InventoryRemote;

pub struct ShippingView {
    remote: Arc<dyn InventoryRemote>,
    orders: Mutex<Vec<Order>>,
    rules: Mutex<Vec<AutomationRule>>,
    notice: Notice,
    orders_loading: LoadingFlag,
    rules_loading: LoadingFlag,
    submitting: SubmitFlag,
    cancel: CancellationToken,
}

impl ShippingView {
    pub fn new(remote: Arc<dyn InventoryRemote>) -> Self {
        Self {
            remote,
            orders: Mutex::new(Vec::new()),
            rules: Mutex::new(Vec::new()),
            notice: Notice::default(),
            orders_loading: LoadingFlag::default(),
            rules_loading: LoadingFlag::default(),
            submitting: SubmitFlag::default(),
            cancel: CancellationToken::new(),
        }
    }

    /// Load both lists. Each list is kept or replaced on its own; the counts
    /// are returned only when both loads succeed.
    pub async fn mount(&self) -> Result<(usize, usize), ViewError> {
        let (orders, rules) = tokio::join!(self.reload_orders(), self.reload_rules());
        Ok((orders?, rules?))
    }

    /// Token cancelled on dismount; cancelling it directly abandons in-flight
    /// fetches without resetting view state.
    pub fn cancellation(&self) -> CancellationToken {
        self.cancel.clone()
    }

    pub fn dismount(&self) {
        self.cancel.cancel();
    }

    pub async fn reload_orders(&self) -> Result<usize, ViewError> {
        let _loading = self.orders_loading.start();
        match until_dismount(&self.cancel, self.remote.list_orders()).await {
            Ok(orders) => {
                let count = orders.len();
                *lock(&self.orders) = orders;
                Ok(count)
            }
            Err(e) => {
                log_read_failure("orders", &e);
                Err(e.into())
            }
        }
    }

    pub async fn reload_rules(&self) -> Result<usize, ViewError> {
        let _loading = self.rules_loading.start();
        match until_dismount(&self.cancel, self.remote.list_automations()).await {
            Ok(rules) => {
                let count = rules.len();
                *lock(&self.rules) = rules;
                Ok(count)
            }
            Err(e) => {
                log_read_failure("automations", &e);
                Err(e.into())
            }
        }
    }

    pub fn orders(&self) -> Vec<Order> {
        lock(&self.orders).clone()
    }

    pub fn rules(&self) -> Vec<AutomationRule> {
        lock(&self.rules).clone()
    }

    pub fn is_loading_orders(&self) -> bool {
        self.orders_loading.is_set()
    }

    pub fn is_loading_rules(&self) -> bool {
        self.rules_loading.is_set()
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

    pub fn is_dismounted(&self) -> bool {
        self.cancel.is_cancelled()
    }

    /// A dismounted view keeps no notice; the failure is only logged.
    fn write_failed(&self, action: &str, failure: &str, err: &ApiError) {
        warn!(action, error = %err, "shipping write failed");
        if !self.is_dismounted() {
            self.notice.raise(format!("{failure}: {err}"));
        }
    }

    // -----------------------------------------------------------------------
    // Orders
    // -----------------------------------------------------------------------

    pub fn request_delete_order(&self, id: &str) -> Result<DeletePrompt, ViewError> {
        if !lock(&self.orders).iter().any(|o| o.id == id) {
            return Err(ViewError::UnknownRecord(id.to_string()));
        }
        Ok(DeletePrompt::new(id))
    }

    pub async fn delete_order(&self, confirmed: ConfirmedDelete) -> Result<(), ViewError> {
        let _submitting = self.submitting.try_start()?;
        if let Err(e) = self.remote.delete_order(confirmed.id()).await {
            self.write_failed("delete_order", "Error deleting order", &e);
            return Err(e.into());
        }
        info!(id = confirmed.id(), "order deleted");
        if let Err(e) = self.reload_orders().await {
            if !e.is_cancelled() {
                self.notice
                    .raise(format!("Order deleted, but the list could not be refreshed: {e}"));
            }
        }
        Ok(())
    }

    // -----------------------------------------------------------------------
    // Automation rules
    // -----------------------------------------------------------------------

    /// Validate and send a new rule. Incomplete forms never reach the service.
    pub async fn create_rule(&self, form: &RuleForm) -> Result<(), ViewError> {
        let rule = form.to_payload().map_err(ViewError::Invalid)?;
        let _submitting = self.submitting.try_start()?;
        if let Err(e) = self.remote.create_automation(&rule).await {
            self.write_failed("create_rule", "Error creating automation", &e);
            return Err(e.into());
        }
        info!(sku = rule.sku, kind = ?rule.kind, "automation rule created");
        self.refresh_rules_after_write().await;
        Ok(())
    }

    /// Flip a rule between active and disabled. Returns the status sent.
    pub async fn toggle_rule(&self, id: &str) -> Result<RuleStatus, ViewError> {
        let current = lock(&self.rules)
            .iter()
            .find(|r| r.id == id)
            .map(|r| r.status)
            .ok_or_else(|| ViewError::UnknownRecord(id.to_string()))?;
        let next = current.toggled();
        let _submitting = self.submitting.try_start()?;
        if let Err(e) = self.remote.set_automation_status(id, next).await {
            self.write_failed("toggle_rule", "Error updating automation status", &e);
            return Err(e.into());
        }
        info!(id, status = %next, "automation rule toggled");
        self.refresh_rules_after_write().await;
        Ok(next)
    }

    async fn refresh_rules_after_write(&self) {
        if let Err(e) = self.reload_rules().await {
            if !e.is_cancelled() {
                self.notice
                    .raise(format!("Saved, but the rules could not be refreshed: {e}"));
            }
        }
    }
}
