//! Wire types for the inventory service.
//!
//! Read models are deliberately lenient: the service builds its responses
//! from loosely typed documents, so missing or `null` scalars fall back to
//! neutral defaults instead of failing the whole list.

use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;
use std::str::FromStr;

// ---------------------------------------------------------------------------
// Lenient field decoding
// ---------------------------------------------------------------------------

fn null_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de> + Default,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

#[derive(Deserialize)]
#[serde(untagged)]
enum StringOrNumber {
    Text(String),
    Int(i64),
    Float(f64),
}

/// Identifiers arrive as strings (document ids) or plain numbers depending on
/// the collection; both are kept as their string form.
fn string_or_number<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Option::<StringOrNumber>::deserialize(deserializer)? {
        Some(StringOrNumber::Text(s)) => s,
        Some(StringOrNumber::Int(n)) => n.to_string(),
        Some(StringOrNumber::Float(n)) => n.to_string(),
        None => String::new(),
    })
}

/// Integer fields that some documents store as floats (`5.0`).
fn lenient_i64<'de, D>(deserializer: D) -> Result<i64, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Option::<StringOrNumber>::deserialize(deserializer)? {
        Some(StringOrNumber::Int(n)) => n,
        Some(StringOrNumber::Float(n)) => n as i64,
        Some(StringOrNumber::Text(s)) => s.trim().parse().unwrap_or_default(),
        None => 0,
    })
}

// ---------------------------------------------------------------------------
// Inventory
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InventoryItem {
    #[serde(deserialize_with = "string_or_number")]
    pub sku: String,
    #[serde(default, deserialize_with = "null_default")]
    pub name: String,
    #[serde(default, deserialize_with = "null_default")]
    pub category: String,
    #[serde(default, deserialize_with = "lenient_i64")]
    pub stock: i64,
    #[serde(default, deserialize_with = "lenient_i64")]
    pub min_stock: i64,
    #[serde(default, deserialize_with = "null_default")]
    pub location: String,
    /// Preformatted by the service, e.g. `$1,250.00`.
    #[serde(default, deserialize_with = "null_default")]
    pub total_value: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub unit_price: Option<f64>,
}

impl InventoryItem {
    /// Rows below their reorder threshold are highlighted.
    pub fn is_low_stock(&self) -> bool {
        self.stock < self.min_stock
    }
}

/// Body for `POST /api/inventory` and `PUT /api/inventory/{sku}`.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ItemPayload {
    pub name: String,
    pub category: String,
    pub stock: i64,
    pub min_stock: i64,
    pub location: String,
    pub unit_price: f64,
}

/// Body for `PUT /api/inventory/bulk`. Absent overrides serialize as `null`,
/// which the service reads as "leave unchanged".
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BulkPayload {
    pub skus: Vec<String>,
    pub name: Option<String>,
    pub category: Option<String>,
    pub location: Option<String>,
    pub stock: Option<i64>,
    pub min_stock: Option<i64>,
}

// ---------------------------------------------------------------------------
// Movement logs
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LogDirection {
    Inbound,
    Outbound,
}

impl LogDirection {
    /// Path segment used by `/api/logs/{direction}`.
    pub fn as_path(self) -> &'static str {
        match self {
            LogDirection::Inbound => "inbound",
            LogDirection::Outbound => "outbound",
        }
    }
}

impl fmt::Display for LogDirection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_path())
    }
}

impl FromStr for LogDirection {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "inbound" | "in" => Ok(LogDirection::Inbound),
            "outbound" | "out" => Ok(LogDirection::Outbound),
            other => Err(format!("Invalid log type: {other}")),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LogItem {
    #[serde(default, deserialize_with = "null_default")]
    pub date: String,
    #[serde(deserialize_with = "string_or_number")]
    pub id: String,
    #[serde(default, deserialize_with = "null_default")]
    pub item: String,
    #[serde(default, deserialize_with = "lenient_i64")]
    pub quantity: i64,
    #[serde(default, deserialize_with = "null_default")]
    pub value: f64,
    #[serde(default, deserialize_with = "null_default")]
    pub source_customer: String,
    #[serde(default, deserialize_with = "null_default")]
    pub responsible: String,
    #[serde(default, deserialize_with = "null_default")]
    pub total_value: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub in_out: Option<String>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct SummaryStats {
    #[serde(default, deserialize_with = "null_default")]
    pub total_inbound_30d: f64,
    #[serde(default, deserialize_with = "null_default")]
    pub total_outbound_30d: f64,
}

// ---------------------------------------------------------------------------
// Orders and automation rules
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Order {
    #[serde(deserialize_with = "string_or_number")]
    pub id: String,
    #[serde(default, deserialize_with = "null_default")]
    pub customer: String,
    #[serde(default, deserialize_with = "lenient_i64")]
    pub items: i64,
    #[serde(default, deserialize_with = "null_default")]
    pub status: String,
    #[serde(default, deserialize_with = "null_default")]
    pub tracking: String,
    #[serde(default, deserialize_with = "null_default")]
    pub date: String,
}

impl Order {
    /// Short display id: `#` plus the last six characters.
    pub fn display_id(&self) -> String {
        let chars: Vec<char> = self.id.chars().collect();
        let start = chars.len().saturating_sub(6);
        format!("#{}", chars[start..].iter().collect::<String>())
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RuleKind {
    /// Reorder when stock falls below `condition`.
    #[default]
    Stock,
    /// Reorder every `condition` days.
    Repeat,
}

impl FromStr for RuleKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "stock" => Ok(RuleKind::Stock),
            "repeat" => Ok(RuleKind::Repeat),
            other => Err(format!("Unknown rule type: {other}")),
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RuleStatus {
    #[default]
    Active,
    Disabled,
}

impl RuleStatus {
    pub fn toggled(self) -> Self {
        match self {
            RuleStatus::Active => RuleStatus::Disabled,
            RuleStatus::Disabled => RuleStatus::Active,
        }
    }
}

impl fmt::Display for RuleStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RuleStatus::Active => f.write_str("active"),
            RuleStatus::Disabled => f.write_str("disabled"),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LinkedItem {
    #[serde(default, deserialize_with = "null_default")]
    pub name: String,
    #[serde(default, deserialize_with = "null_default")]
    pub category: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AutomationRule {
    #[serde(deserialize_with = "string_or_number")]
    pub id: String,
    #[serde(default, deserialize_with = "string_or_number")]
    pub sku: String,
    #[serde(rename = "type", default)]
    pub kind: RuleKind,
    #[serde(default, deserialize_with = "lenient_i64")]
    pub condition: i64,
    #[serde(default, deserialize_with = "lenient_i64")]
    pub amount: i64,
    #[serde(default, deserialize_with = "null_default")]
    pub source_name: String,
    #[serde(default, deserialize_with = "null_default")]
    pub source_link: String,
    #[serde(default)]
    pub status: RuleStatus,
    #[serde(default, deserialize_with = "null_default")]
    pub linked_items: Vec<LinkedItem>,
}

/// Body for `POST /api/automations`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NewAutomationRule {
    pub sku: i64,
    #[serde(rename = "type")]
    pub kind: RuleKind,
    pub condition: i64,
    pub amount: i64,
    pub source_name: String,
    pub source_link: String,
    pub status: RuleStatus,
}

// ---------------------------------------------------------------------------
// Dashboard
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ChartPoint {
    #[serde(default, deserialize_with = "null_default")]
    pub day: String,
    #[serde(default, deserialize_with = "null_default")]
    pub inbound: f64,
    #[serde(default, deserialize_with = "null_default")]
    pub outbound: f64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DashboardSummary {
    #[serde(default, deserialize_with = "null_default")]
    pub total_inventory_value: f64,
    #[serde(default, deserialize_with = "lenient_i64")]
    pub low_stock_count: i64,
    #[serde(default, deserialize_with = "lenient_i64")]
    pub pending_orders: i64,
    #[serde(default, deserialize_with = "null_default")]
    pub turnover_rate: f64,
    #[serde(default, deserialize_with = "null_default")]
    pub top_selling_item: String,
    #[serde(default, deserialize_with = "lenient_i64")]
    pub top_selling_qty: i64,
    #[serde(default, deserialize_with = "null_default")]
    pub mtd_shipped_value: f64,
    #[serde(default, deserialize_with = "null_default")]
    pub chart_data: Vec<ChartPoint>,
}

// ---------------------------------------------------------------------------
// Co-pilot chat
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChatRole {
    User,
    Model,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: ChatRole,
    pub content: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChatRequest {
    pub messages: Vec<ChatMessage>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub conversation_id: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct ChatReply {
    #[serde(default, deserialize_with = "null_default")]
    pub content: String,
    #[serde(default)]
    pub conversation_id: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn inventory_item_tolerates_nulls_and_float_counts() {
        let item: InventoryItem = serde_json::from_value(json!({
            "sku": "65a1",
            "name": "Widget",
            "category": null,
            "stock": 5.0,
            "minStock": null,
            "location": "A-1",
            "totalValue": "$50.00",
            "unitPrice": 10.0
        }))
        .unwrap();
        assert_eq!(item.category, "");
        assert_eq!(item.stock, 5);
        assert_eq!(item.min_stock, 0);
        assert_eq!(item.unit_price, Some(10.0));
    }

    #[test]
    fn log_item_accepts_numeric_id() {
        let log: LogItem = serde_json::from_value(json!({
            "date": "12/01/2026",
            "id": 42,
            "item": "Widget",
            "quantity": 3,
            "value": 2.5,
            "source_customer": "Acme",
            "responsible": "Dana",
            "total_value": 7.5
        }))
        .unwrap();
        assert_eq!(log.id, "42");
        assert_eq!(log.in_out, None);
    }

    #[test]
    fn bulk_payload_serializes_absent_fields_as_null() {
        let payload = BulkPayload {
            skus: vec!["A".into(), "B".into()],
            stock: Some(50),
            ..Default::default()
        };
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
    }

    #[test]
    fn order_display_id_uses_last_six_chars() {
        let order = Order {
            id: "65a1b2c3d4e5f6".into(),
            ..Default::default()
        };
        assert_eq!(order.display_id(), "#d4e5f6");
        let short = Order {
            id: "42".into(),
            ..Default::default()
        };
        assert_eq!(short.display_id(), "#42");
    }

    #[test]
    fn automation_rule_reads_type_and_status() {
        let rule: AutomationRule = serde_json::from_value(json!({
            "id": "r1",
            "sku": 1001,
            "type": "repeat",
            "condition": 7,
            "amount": 40,
            "source_name": "Supplier",
            "source_link": "https://supplier.example",
            "status": "disabled",
            "linked_items": [{ "name": "Widget", "category": "Parts" }]
        }))
        .unwrap();
        assert_eq!(rule.sku, "1001");
        assert_eq!(rule.kind, RuleKind::Repeat);
        assert_eq!(rule.status.toggled(), RuleStatus::Active);
        assert_eq!(rule.linked_items.len(), 1);
    }

    #[test]
    fn log_direction_parses_short_forms() {
        assert_eq!("in".parse::<LogDirection>(), Ok(LogDirection::Inbound));
        assert_eq!("OUTBOUND".parse::<LogDirection>(), Ok(LogDirection::Outbound));
        assert!("sideways".parse::<LogDirection>().is_err());
    }
}
