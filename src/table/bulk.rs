//! Bulk adjust planner.
//!
//! A bulk edit targets every row that currently passes the search filter;
//! there is no separate checkbox selection. The caller passes that filtered
//! slice at submit time and gets back one request body.

use thiserror::Error;

use crate::editor::parse_leading_int;
use crate::models::{BulkPayload, InventoryItem};

/// Raw text of the bulk adjust dialog. Blank means "keep existing value".
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BulkEditForm {
    pub name: String,
    pub category: String,
    pub stock: String,
    pub min_stock: String,
    pub location: String,
}

impl BulkEditForm {
    /// The submit button stays disabled while every field is blank.
    pub fn is_blank(&self) -> bool {
        [
            &self.name,
            &self.category,
            &self.stock,
            &self.min_stock,
            &self.location,
        ]
        .iter()
        .all(|v| v.is_empty())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum BulkPlanError {
    #[error("No items match the current filter")]
    EmptySelection,
    #[error("Fill in at least one field to change")]
    NothingToChange,
}

fn text_override(raw: &str) -> Option<String> {
    (!raw.is_empty()).then(|| raw.to_string())
}

/// Blank or unreadable numbers are absent, never zero: zero is a real
/// override and must stay distinguishable from "no change".
fn number_override(raw: &str) -> Option<i64> {
    if raw.is_empty() {
        return None;
    }
    parse_leading_int(raw)
}

/// Build the bulk request for `targets` (the filtered rows, in collection
/// order).
pub fn plan_bulk_update(
    form: &BulkEditForm,
    targets: &[&InventoryItem],
) -> Result<BulkPayload, BulkPlanError> {
    if targets.is_empty() {
        return Err(BulkPlanError::EmptySelection);
    }
    if form.is_blank() {
        return Err(BulkPlanError::NothingToChange);
    }
    Ok(BulkPayload {
        skus: targets.iter().map(|item| item.sku.clone()).collect(),
        name: text_override(&form.name),
        category: text_override(&form.category),
        location: text_override(&form.location),
        stock: number_override(&form.stock),
        min_stock: number_override(&form.min_stock),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::table::filter_rows;
    use serde_json::json;

    fn collection() -> Vec<InventoryItem> {
        vec![
            InventoryItem {
                sku: "A".into(),
                name: "Widget".into(),
                stock: 5,
                min_stock: 10,
                ..Default::default()
            },
            InventoryItem {
                sku: "B".into(),
                name: "Gadget".into(),
                stock: 20,
                min_stock: 5,
                ..Default::default()
            },
        ]
    }

    #[test]
    fn stock_only_edit_leaves_other_fields_null() {
        let rows = collection();
        let targets = filter_rows(&rows, "");
        let form = BulkEditForm {
            stock: "50".into(),
            ..Default::default()
        };
        let payload = plan_bulk_update(&form, &targets).unwrap();
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
    fn zero_is_a_real_override() {
        let rows = collection();
        let targets = filter_rows(&rows, "");
        let form = BulkEditForm {
            min_stock: "0".into(),
            ..Default::default()
        };
        let payload = plan_bulk_update(&form, &targets).unwrap();
        assert_eq!(payload.min_stock, Some(0));
        assert_eq!(payload.stock, None);
    }

    #[test]
    fn unreadable_number_is_absent_not_zero() {
        let rows = collection();
        let targets = filter_rows(&rows, "");
        let form = BulkEditForm {
            stock: "lots".into(),
            location: "Dock 2".into(),
            ..Default::default()
        };
        let payload = plan_bulk_update(&form, &targets).unwrap();
        assert_eq!(payload.stock, None);
        assert_eq!(payload.location.as_deref(), Some("Dock 2"));
    }

    #[test]
    fn targets_follow_the_filter() {
        let rows = collection();
        let targets = filter_rows(&rows, "gadg");
        let form = BulkEditForm {
            category: "Toys".into(),
            ..Default::default()
        };
        let payload = plan_bulk_update(&form, &targets).unwrap();
        assert_eq!(payload.skus, vec!["B".to_string()]);
        assert_eq!(payload.name, None);
    }

    #[test]
    fn refuses_empty_selection_and_blank_form() {
        let rows = collection();
        let none = filter_rows(&rows, "no such item");
        let form = BulkEditForm {
            name: "Renamed".into(),
            ..Default::default()
        };
        assert_eq!(
            plan_bulk_update(&form, &none),
            Err(BulkPlanError::EmptySelection)
        );

        let all = filter_rows(&rows, "");
        assert_eq!(
            plan_bulk_update(&BulkEditForm::default(), &all),
            Err(BulkPlanError::NothingToChange)
        );
    }
}
