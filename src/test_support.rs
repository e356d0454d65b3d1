//! In-memory inventory service for view tests.

use async_trait::async_trait;
use std::collections::{HashMap, VecDeque};
use std::sync::{Arc, Mutex, MutexGuard};
use tokio::sync::Notify;

use crate::api::ApiError;
use crate::models::{
    AutomationRule, BulkPayload, ChatReply, ChatRequest, DashboardSummary, InventoryItem,
    ItemPayload, LogDirection, LogItem, NewAutomationRule, Order, RuleStatus, SummaryStats,
};
use crate::remote::InventoryRemote;

#[derive(Debug, Default)]
pub(crate) struct FakeState {
    pub items: Vec<InventoryItem>,
    pub orders: Vec<Order>,
    pub automations: Vec<AutomationRule>,
    pub inbound: Vec<LogItem>,
    pub outbound: Vec<LogItem>,
    pub stats: SummaryStats,
    pub dashboard: Option<DashboardSummary>,
    pub chat_replies: VecDeque<ChatReply>,
    pub calls: Vec<String>,
    pub item_payloads: Vec<ItemPayload>,
    pub bulk_payloads: Vec<BulkPayload>,
    pub chat_requests: Vec<ChatRequest>,
    next_id: u32,
    failures: HashMap<&'static str, (usize, ApiError)>,
}

#[derive(Default)]
pub(crate) struct FakeRemote {
    state: Mutex<FakeState>,
    gates: Mutex<HashMap<&'static str, Arc<Notify>>>,
}

pub(crate) fn item(sku: &str, name: &str, category: &str, stock: i64, min_stock: i64) -> InventoryItem {
    InventoryItem {
        sku: sku.into(),
        name: name.into(),
        category: category.into(),
        stock,
        min_stock,
        location: "A-1".into(),
        total_value: format!("${:.2}", stock as f64),
        unit_price: Some(1.0),
    }
}

pub(crate) fn offline() -> ApiError {
    ApiError::Transport("Cannot reach inventory service at http://localhost:8000".into())
}

impl FakeRemote {
    pub fn with_items(items: Vec<InventoryItem>) -> Arc<Self> {
        let fake = Self::default();
        fake.state().items = items;
        Arc::new(fake)
    }

    pub fn state(&self) -> MutexGuard<'_, FakeState> {
        self.state.lock().unwrap()
    }

    /// Fail the next `times` calls of `op` with `error`.
    pub fn fail(&self, op: &'static str, times: usize, error: ApiError) {
        self.state().failures.insert(op, (times, error));
    }

    /// Park every call of `op` until the returned handle is notified.
    pub fn hold(&self, op: &'static str) -> Arc<Notify> {
        let notify = Arc::new(Notify::new());
        self.gates.lock().unwrap().insert(op, notify.clone());
        notify
    }

    pub fn calls(&self) -> Vec<String> {
        self.state().calls.clone()
    }

    pub fn count(&self, op: &str) -> usize {
        self.state().calls.iter().filter(|c| c.as_str() == op).count()
    }

    async fn enter(&self, op: &'static str) -> Result<(), ApiError> {
        let gate = self.gates.lock().unwrap().get(op).cloned();
        if let Some(gate) = gate {
            gate.notified().await;
        }
        let mut state = self.state();
        state.calls.push(op.to_string());
        if let Some((remaining, error)) = state.failures.get_mut(op) {
            if *remaining > 0 {
                *remaining -= 1;
                return Err(error.clone());
            }
        }
        Ok(())
    }
}

fn not_found(what: &str) -> ApiError {
    ApiError::Status {
        status: 404,
        message: format!("{what} not found"),
    }
}

fn apply_payload(item: &mut InventoryItem, payload: &ItemPayload) {
    item.name = payload.name.clone();
    item.category = payload.category.clone();
    item.stock = payload.stock;
    item.min_stock = payload.min_stock;
    item.location = payload.location.clone();
    item.unit_price = Some(payload.unit_price);
    item.total_value = format!("${:.2}", payload.stock as f64 * payload.unit_price);
}

#[async_trait]
impl InventoryRemote for FakeRemote {
    async fn list_inventory(&self) -> Result<Vec<InventoryItem>, ApiError> {
        self.enter("list_inventory").await?;
        Ok(self.state().items.clone())
    }

    async fn create_item(&self, payload: &ItemPayload) -> Result<(), ApiError> {
        self.enter("create_item").await?;
        let mut state = self.state();
        state.next_id += 1;
        let mut item = InventoryItem {
            sku: format!("NEW-{}", state.next_id),
            ..Default::default()
        };
        apply_payload(&mut item, payload);
        state.items.push(item);
        state.item_payloads.push(payload.clone());
        Ok(())
    }

    async fn update_item(&self, sku: &str, payload: &ItemPayload) -> Result<(), ApiError> {
        self.enter("update_item").await?;
        let mut state = self.state();
        state.item_payloads.push(payload.clone());
        let item = state
            .items
            .iter_mut()
            .find(|i| i.sku == sku)
            .ok_or_else(|| not_found("Item"))?;
        apply_payload(item, payload);
        Ok(())
    }

    async fn bulk_update(&self, payload: &BulkPayload) -> Result<(), ApiError> {
        self.enter("bulk_update").await?;
        let mut state = self.state();
        state.bulk_payloads.push(payload.clone());
        for item in state.items.iter_mut().filter(|i| payload.skus.contains(&i.sku)) {
            if let Some(name) = &payload.name {
                item.name = name.clone();
            }
            if let Some(category) = &payload.category {
                item.category = category.clone();
            }
            if let Some(location) = &payload.location {
                item.location = location.clone();
            }
            if let Some(stock) = payload.stock {
                item.stock = stock;
            }
            if let Some(min_stock) = payload.min_stock {
                item.min_stock = min_stock;
            }
        }
        Ok(())
    }

    async fn delete_item(&self, sku: &str) -> Result<(), ApiError> {
        self.enter("delete_item").await?;
        let mut state = self.state();
        let before = state.items.len();
        state.items.retain(|i| i.sku != sku);
        if state.items.len() == before {
            return Err(not_found("Item"));
        }
        Ok(())
    }

    async fn list_orders(&self) -> Result<Vec<Order>, ApiError> {
        self.enter("list_orders").await?;
        Ok(self.state().orders.clone())
    }

    async fn delete_order(&self, id: &str) -> Result<(), ApiError> {
        self.enter("delete_order").await?;
        let mut state = self.state();
        let before = state.orders.len();
        state.orders.retain(|o| o.id != id);
        if state.orders.len() == before {
            return Err(not_found("Order"));
        }
        Ok(())
    }

    async fn list_automations(&self) -> Result<Vec<AutomationRule>, ApiError> {
        self.enter("list_automations").await?;
        Ok(self.state().automations.clone())
    }

    async fn create_automation(&self, rule: &NewAutomationRule) -> Result<(), ApiError> {
        self.enter("create_automation").await?;
        let mut state = self.state();
        state.next_id += 1;
        let id = format!("rule-{}", state.next_id);
        state.automations.push(AutomationRule {
            id,
            sku: rule.sku.to_string(),
            kind: rule.kind,
            condition: rule.condition,
            amount: rule.amount,
            source_name: rule.source_name.clone(),
            source_link: rule.source_link.clone(),
            status: rule.status,
            linked_items: Vec::new(),
        });
        Ok(())
    }

    async fn set_automation_status(&self, id: &str, status: RuleStatus) -> Result<(), ApiError> {
        self.enter("set_automation_status").await?;
        let mut state = self.state();
        let rule = state
            .automations
            .iter_mut()
            .find(|r| r.id == id)
            .ok_or_else(|| not_found("Rule"))?;
        rule.status = status;
        Ok(())
    }

    async fn dashboard(&self) -> Result<DashboardSummary, ApiError> {
        self.enter("dashboard").await?;
        self.state().dashboard.clone().ok_or(ApiError::Status {
            status: 500,
            message: "Error fetching dashboard metrics".into(),
        })
    }

    async fn logs(&self, direction: LogDirection) -> Result<Vec<LogItem>, ApiError> {
        self.enter("logs").await?;
        let state = self.state();
        Ok(match direction {
            LogDirection::Inbound => state.inbound.clone(),
            LogDirection::Outbound => state.outbound.clone(),
        })
    }

    async fn stats(&self) -> Result<SummaryStats, ApiError> {
        self.enter("stats").await?;
        Ok(self.state().stats)
    }

    async fn chat(&self, request: &ChatRequest) -> Result<ChatReply, ApiError> {
        self.enter("chat").await?;
        let mut state = self.state();
        state.chat_requests.push(request.clone());
        state.chat_replies.pop_front().ok_or(ApiError::Status {
            status: 500,
            message: "Internal Server Error".into(),
        })
    }
}
