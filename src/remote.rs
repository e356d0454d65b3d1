//! Typed access to the inventory service endpoints.
//!
//! Views depend on the [`InventoryRemote`] trait rather than on HTTP, so the
//! write-then-reload logic can be driven against an in-memory service in
//! tests. [`HttpRemote`] is the production implementation.

use async_trait::async_trait;
use reqwest::Method;
use serde_json::json;

use crate::api::{ApiClient, ApiError};
use crate::models::{
    AutomationRule, BulkPayload, ChatReply, ChatRequest, DashboardSummary, InventoryItem,
    ItemPayload, LogDirection, LogItem, NewAutomationRule, Order, RuleStatus, SummaryStats,
};

/// Every call the console makes against the inventory service.
///
/// Write methods return `()`: callers never trust a write response as the new
/// state, they list the collection again.
#[async_trait]
pub trait InventoryRemote: Send + Sync {
    async fn list_inventory(&self) -> Result<Vec<InventoryItem>, ApiError>;
    async fn create_item(&self, payload: &ItemPayload) -> Result<(), ApiError>;
    async fn update_item(&self, sku: &str, payload: &ItemPayload) -> Result<(), ApiError>;
    async fn bulk_update(&self, payload: &BulkPayload) -> Result<(), ApiError>;
    async fn delete_item(&self, sku: &str) -> Result<(), ApiError>;

    async fn list_orders(&self) -> Result<Vec<Order>, ApiError>;
    async fn delete_order(&self, id: &str) -> Result<(), ApiError>;

    async fn list_automations(&self) -> Result<Vec<AutomationRule>, ApiError>;
    async fn create_automation(&self, rule: &NewAutomationRule) -> Result<(), ApiError>;
    async fn set_automation_status(&self, id: &str, status: RuleStatus) -> Result<(), ApiError>;

    async fn dashboard(&self) -> Result<DashboardSummary, ApiError>;
    async fn logs(&self, direction: LogDirection) -> Result<Vec<LogItem>, ApiError>;
    async fn stats(&self) -> Result<SummaryStats, ApiError>;

    async fn chat(&self, request: &ChatRequest) -> Result<ChatReply, ApiError>;
}

/// [`InventoryRemote`] over HTTP.
#[derive(Debug, Clone)]
pub struct HttpRemote {
    api: ApiClient,
}

impl HttpRemote {
    pub fn new(api: ApiClient) -> Self {
        Self { api }
    }

    pub fn api(&self) -> &ApiClient {
        &self.api
    }
}

#[async_trait]
impl InventoryRemote for HttpRemote {
    async fn list_inventory(&self) -> Result<Vec<InventoryItem>, ApiError> {
        self.api.get_json(&["api", "inventory"]).await
    }

    async fn create_item(&self, payload: &ItemPayload) -> Result<(), ApiError> {
        self.api
            .execute(Method::POST, &["api", "inventory"], Some(payload))
            .await
    }

    async fn update_item(&self, sku: &str, payload: &ItemPayload) -> Result<(), ApiError> {
        self.api
            .execute(Method::PUT, &["api", "inventory", sku], Some(payload))
            .await
    }

    async fn bulk_update(&self, payload: &BulkPayload) -> Result<(), ApiError> {
        self.api
            .execute(Method::PUT, &["api", "inventory", "bulk"], Some(payload))
            .await
    }

    async fn delete_item(&self, sku: &str) -> Result<(), ApiError> {
        self.api
            .execute::<()>(Method::DELETE, &["api", "inventory", sku], None)
            .await
    }

    async fn list_orders(&self) -> Result<Vec<Order>, ApiError> {
        self.api.get_json(&["api", "orders"]).await
    }

    async fn delete_order(&self, id: &str) -> Result<(), ApiError> {
        self.api
            .execute::<()>(Method::DELETE, &["api", "orders", id], None)
            .await
    }

    async fn list_automations(&self) -> Result<Vec<AutomationRule>, ApiError> {
        self.api.get_json(&["api", "automations"]).await
    }

    async fn create_automation(&self, rule: &NewAutomationRule) -> Result<(), ApiError> {
        self.api
            .execute(Method::POST, &["api", "automations"], Some(rule))
            .await
    }

    async fn set_automation_status(&self, id: &str, status: RuleStatus) -> Result<(), ApiError> {
        let body = json!({ "status": status });
        self.api
            .execute(Method::PUT, &["api", "automations", id, "status"], Some(&body))
            .await
    }

    async fn dashboard(&self) -> Result<DashboardSummary, ApiError> {
        self.api.get_json(&["api", "dashboard"]).await
    }

    async fn logs(&self, direction: LogDirection) -> Result<Vec<LogItem>, ApiError> {
        self.api.get_json(&["api", "logs", direction.as_path()]).await
    }

    async fn stats(&self) -> Result<SummaryStats, ApiError> {
        self.api.get_json(&["api", "stats"]).await
    }

    async fn chat(&self, request: &ChatRequest) -> Result<ChatReply, ApiError> {
        self.api
            .send_json(Method::POST, &["api", "chat"], request)
            .await
    }
}
