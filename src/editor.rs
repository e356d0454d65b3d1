//! Record editors: the forms behind the add, edit, delete and automation-rule
//! dialogs, and the request bodies they produce.
//!
//! Numeric inputs are read the way a browser number field hands them over:
//! as free text. Item forms coerce unreadable numbers to zero instead of
//! rejecting them; bulk edits treat them as "no change".

use crate::models::{InventoryItem, ItemPayload, NewAutomationRule, RuleKind, RuleStatus};

// ---------------------------------------------------------------------------
// Numeric text parsing
// ---------------------------------------------------------------------------

/// Leading-integer parse: optional sign followed by digits, anything after
/// the digits is ignored (`"12abc"` -> 12, `"7.9"` -> 7). `None` when no
/// digit leads the text or the value does not fit in an `i64`.
pub fn parse_leading_int(raw: &str) -> Option<i64> {
    let s = raw.trim_start();
    let (sign_len, digits) = match s.as_bytes().first() {
        Some(b'+') | Some(b'-') => (1, &s[1..]),
        _ => (0, s),
    };
    let digit_len = digits.bytes().take_while(u8::is_ascii_digit).count();
    if digit_len == 0 {
        return None;
    }
    s[..sign_len + digit_len].parse().ok()
}

/// Leading-decimal parse: sign, digits, optional fraction and exponent
/// (`"4.50 USD"` -> 4.5, `".5"` -> 0.5). `None` when no number leads the text.
pub fn parse_leading_float(raw: &str) -> Option<f64> {
    let s = raw.trim_start();
    let bytes = s.as_bytes();
    let mut end = 0;
    if matches!(bytes.first(), Some(b'+') | Some(b'-')) {
        end = 1;
    }
    let int_digits = bytes[end..].iter().take_while(|b| b.is_ascii_digit()).count();
    end += int_digits;
    let mut frac_digits = 0;
    if bytes.get(end) == Some(&b'.') {
        frac_digits = bytes[end + 1..]
            .iter()
            .take_while(|b| b.is_ascii_digit())
            .count();
        if int_digits + frac_digits > 0 {
            end += 1 + frac_digits;
        }
    }
    if int_digits + frac_digits == 0 {
        return None;
    }
    if matches!(bytes.get(end), Some(b'e') | Some(b'E')) {
        let mut exp_end = end + 1;
        if matches!(bytes.get(exp_end), Some(b'+') | Some(b'-')) {
            exp_end += 1;
        }
        let exp_digits = bytes[exp_end.min(bytes.len())..]
            .iter()
            .take_while(|b| b.is_ascii_digit())
            .count();
        if exp_digits > 0 {
            end = exp_end + exp_digits;
        }
    }
    s[..end].parse::<f64>().ok().filter(|v| v.is_finite())
}

/// Integer quantity with the zero fallback used by the item dialogs.
pub fn coerce_quantity(raw: &str) -> i64 {
    parse_leading_int(raw).unwrap_or(0)
}

/// Currency amount with the `0.00` fallback used by the item dialogs.
pub fn coerce_price(raw: &str) -> f64 {
    parse_leading_float(raw).unwrap_or(0.0)
}

// ---------------------------------------------------------------------------
// Item form (add / edit)
// ---------------------------------------------------------------------------

/// Raw text of the add/edit item dialog.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ItemForm {
    pub name: String,
    pub category: String,
    pub stock: String,
    pub min_stock: String,
    pub location: String,
    pub unit_price: String,
}

impl ItemForm {
    /// Pre-fill from a row. The form is a copy; later changes to the row are
    /// not reflected until the dialog is opened again.
    pub fn snapshot(item: &InventoryItem) -> Self {
        let unit_price = match item.unit_price {
            Some(price) if price != 0.0 => price.to_string(),
            _ => "0".to_string(),
        };
        Self {
            name: item.name.clone(),
            category: item.category.clone(),
            stock: item.stock.to_string(),
            min_stock: item.min_stock.to_string(),
            location: item.location.clone(),
            unit_price,
        }
    }

    /// Request body; numeric fields never fail, they fall back to zero.
    pub fn to_payload(&self) -> ItemPayload {
        ItemPayload {
            name: self.name.clone(),
            category: self.category.clone(),
            stock: coerce_quantity(&self.stock),
            min_stock: coerce_quantity(&self.min_stock),
            location: self.location.clone(),
            unit_price: coerce_price(&self.unit_price),
        }
    }
}

/// Edit dialog state: the target sku and the snapshot form.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EditSession {
    pub sku: String,
    pub form: ItemForm,
}

impl EditSession {
    pub fn open(item: &InventoryItem) -> Self {
        Self {
            sku: item.sku.clone(),
            form: ItemForm::snapshot(item),
        }
    }
}

// ---------------------------------------------------------------------------
// Delete confirmation
// ---------------------------------------------------------------------------

/// A delete waiting for the user's answer to "are you sure?".
#[derive(Debug, Clone, PartialEq, Eq)]
#[must_use = "a delete is only sent once the prompt is confirmed"]
pub struct DeletePrompt {
    id: String,
}

impl DeletePrompt {
    pub(crate) fn new(id: impl Into<String>) -> Self {
        Self { id: id.into() }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn confirm(self) -> ConfirmedDelete {
        ConfirmedDelete { id: self.id }
    }
}

/// Proof that the user confirmed. Only [`DeletePrompt::confirm`] creates one,
/// so a delete request cannot be issued without the prompt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfirmedDelete {
    id: String,
}

impl ConfirmedDelete {
    pub fn id(&self) -> &str {
        &self.id
    }
}

// ---------------------------------------------------------------------------
// Automation rule form
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RuleForm {
    pub sku: String,
    pub kind: RuleKind,
    pub condition: String,
    pub amount: String,
    pub source_name: String,
    pub source_link: String,
    pub status: RuleStatus,
}

impl Default for RuleForm {
    fn default() -> Self {
        Self {
            sku: String::new(),
            kind: RuleKind::Stock,
            condition: String::new(),
            amount: String::new(),
            source_name: String::new(),
            source_link: String::new(),
            status: RuleStatus::Active,
        }
    }
}

impl RuleForm {
    /// Unlike the item dialogs, rules need a sku, a condition and an amount;
    /// the error names the first field that is missing or not a number.
    pub fn to_payload(&self) -> Result<NewAutomationRule, String> {
        let required = |label: &str, raw: &str| -> Result<i64, String> {
            if raw.trim().is_empty() {
                return Err(format!("Missing {label}"));
            }
            parse_leading_int(raw).ok_or_else(|| format!("Invalid {label}: {raw}"))
        };
        Ok(NewAutomationRule {
            sku: required("sku", &self.sku)?,
            kind: self.kind,
            condition: required("condition", &self.condition)?,
            amount: required("amount", &self.amount)?,
            source_name: self.source_name.trim().to_string(),
            source_link: self.source_link.trim().to_string(),
            status: self.status,
        })
    }
}
