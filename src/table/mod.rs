//! Client-side table engine shared by the inventory and movement-log views.
//!
//! The pipeline is `collection -> filter -> sort -> rows`. Every stage is a
//! pure function of the fetched collection and the view's [`TableState`];
//! nothing here talks to the network or mutates records.

pub mod bulk;
pub mod export;
pub mod filter;
pub mod sort;

use std::cmp::Ordering;
use std::fmt::Debug;

use crate::models::{InventoryItem, LogItem};

pub use filter::filter_rows;
pub use sort::{sort_rows, ColumnSort, SortDirection, SortState};

// ---------------------------------------------------------------------------
// Records
// ---------------------------------------------------------------------------

/// A sortable cell value.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum FieldValue<'a> {
    Missing,
    Int(i64),
    Float(f64),
    Text(&'a str),
}

impl FieldValue<'_> {
    /// Placement used when two values are not of comparable kinds.
    fn rank(&self) -> u8 {
        match self {
            FieldValue::Missing => 0,
            FieldValue::Int(_) | FieldValue::Float(_) => 1,
            FieldValue::Text(_) => 2,
        }
    }

    /// Natural ordering: numeric for numbers, lexicographic for text.
    ///
    /// Mixed kinds do not have a meaningful order; they are placed by a fixed
    /// rank so the comparator stays total and the same operator is used for
    /// every pair.
    pub fn compare(&self, other: &Self) -> Ordering {
        match (self, other) {
            (FieldValue::Int(a), FieldValue::Int(b)) => a.cmp(b),
            (FieldValue::Int(a), FieldValue::Float(b)) => (*a as f64).total_cmp(b),
            (FieldValue::Float(a), FieldValue::Int(b)) => a.total_cmp(&(*b as f64)),
            (FieldValue::Float(a), FieldValue::Float(b)) => a.total_cmp(b),
            (FieldValue::Text(a), FieldValue::Text(b)) => a.cmp(b),
            _ => self.rank().cmp(&other.rank()),
        }
    }
}

/// One row of a table: a stable identifier plus typed column access.
pub trait Record {
    type Column: Copy + Eq + Debug;

    fn id(&self) -> &str;

    fn field(&self, column: Self::Column) -> FieldValue<'_>;

    /// Text fields matched by the search box: name, identifier, category.
    fn search_fields(&self) -> [&str; 3];
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum InventoryColumn {
    Sku,
    Name,
    Category,
    Stock,
    MinStock,
    Location,
    TotalValue,
    UnitPrice,
}

impl InventoryColumn {
    pub const ALL: [InventoryColumn; 8] = [
        InventoryColumn::Sku,
        InventoryColumn::Name,
        InventoryColumn::Category,
        InventoryColumn::Stock,
        InventoryColumn::MinStock,
        InventoryColumn::Location,
        InventoryColumn::TotalValue,
        InventoryColumn::UnitPrice,
    ];

    /// Field name as sent by the service.
    pub fn key(self) -> &'static str {
        match self {
            InventoryColumn::Sku => "sku",
            InventoryColumn::Name => "name",
            InventoryColumn::Category => "category",
            InventoryColumn::Stock => "stock",
            InventoryColumn::MinStock => "minStock",
            InventoryColumn::Location => "location",
            InventoryColumn::TotalValue => "totalValue",
            InventoryColumn::UnitPrice => "unitPrice",
        }
    }
}

impl std::str::FromStr for InventoryColumn {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().replace(['_', '-'], "").to_ascii_lowercase();
        InventoryColumn::ALL
            .into_iter()
            .find(|c| c.key().to_ascii_lowercase() == wanted)
            .ok_or_else(|| format!("Unknown inventory column: {s}"))
    }
}

impl Record for InventoryItem {
    type Column = InventoryColumn;

    fn id(&self) -> &str {
        &self.sku
    }

    fn field(&self, column: InventoryColumn) -> FieldValue<'_> {
        match column {
            InventoryColumn::Sku => FieldValue::Text(&self.sku),
            InventoryColumn::Name => FieldValue::Text(&self.name),
            InventoryColumn::Category => FieldValue::Text(&self.category),
            InventoryColumn::Stock => FieldValue::Int(self.stock),
            InventoryColumn::MinStock => FieldValue::Int(self.min_stock),
            InventoryColumn::Location => FieldValue::Text(&self.location),
            InventoryColumn::TotalValue => FieldValue::Text(&self.total_value),
            InventoryColumn::UnitPrice => self
                .unit_price
                .map_or(FieldValue::Missing, FieldValue::Float),
        }
    }

    fn search_fields(&self) -> [&str; 3] {
        [&self.name, &self.sku, &self.category]
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LogColumn {
    Date,
    Id,
    Item,
    Quantity,
    Value,
    SourceCustomer,
    Responsible,
    TotalValue,
}

impl LogColumn {
    pub const ALL: [LogColumn; 8] = [
        LogColumn::Date,
        LogColumn::Id,
        LogColumn::Item,
        LogColumn::Quantity,
        LogColumn::Value,
        LogColumn::SourceCustomer,
        LogColumn::Responsible,
        LogColumn::TotalValue,
    ];

    pub fn key(self) -> &'static str {
        match self {
            LogColumn::Date => "date",
            LogColumn::Id => "id",
            LogColumn::Item => "item",
            LogColumn::Quantity => "quantity",
            LogColumn::Value => "value",
            LogColumn::SourceCustomer => "source_customer",
            LogColumn::Responsible => "responsible",
            LogColumn::TotalValue => "total_value",
        }
    }
}

impl std::str::FromStr for LogColumn {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().replace('-', "_").to_ascii_lowercase();
        LogColumn::ALL
            .into_iter()
            .find(|c| c.key() == wanted)
            .ok_or_else(|| format!("Unknown log column: {s}"))
    }
}

impl Record for LogItem {
    type Column = LogColumn;

    fn id(&self) -> &str {
        &self.id
    }

    fn field(&self, column: LogColumn) -> FieldValue<'_> {
        match column {
            LogColumn::Date => FieldValue::Text(&self.date),
            LogColumn::Id => FieldValue::Text(&self.id),
            LogColumn::Item => FieldValue::Text(&self.item),
            LogColumn::Quantity => FieldValue::Int(self.quantity),
            LogColumn::Value => FieldValue::Float(self.value),
            LogColumn::SourceCustomer => FieldValue::Text(&self.source_customer),
            LogColumn::Responsible => FieldValue::Text(&self.responsible),
            LogColumn::TotalValue => FieldValue::Float(self.total_value),
        }
    }

    fn search_fields(&self) -> [&str; 3] {
        [&self.item, &self.id, &self.source_customer]
    }
}

// ---------------------------------------------------------------------------
// Per-view table state
// ---------------------------------------------------------------------------

/// Search text and sort state owned by one view instance.
#[derive(Debug, Clone, PartialEq)]
pub struct TableState<C> {
    pub query: String,
    pub sort: SortState<C>,
}

impl<C: Copy + Eq> Default for TableState<C> {
    fn default() -> Self {
        Self {
            query: String::new(),
            sort: SortState::unsorted(),
        }
    }
}

impl<C: Copy + Eq> TableState<C> {
    /// Filtered rows in collection order. Bulk targets and exports start here.
    pub fn filtered<'a, R>(&self, rows: &'a [R]) -> Vec<&'a R>
    where
        R: Record<Column = C>,
    {
        filter_rows(rows, &self.query)
    }

    /// Filtered, then sorted: what the table renders.
    pub fn visible<'a, R>(&self, rows: &'a [R]) -> Vec<&'a R>
    where
        R: Record<Column = C>,
    {
        sort_rows(self.filtered(rows), &self.sort)
    }

    pub fn reset(&mut self) {
        *self = Self::default();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn item(sku: &str, name: &str, stock: i64) -> InventoryItem {
        InventoryItem {
            sku: sku.into(),
            name: name.into(),
            category: "Parts".into(),
            stock,
            ..Default::default()
        }
    }

    #[test]
    fn mixed_numeric_kinds_compare_numerically() {
        assert_eq!(
            FieldValue::Int(2).compare(&FieldValue::Float(2.5)),
            Ordering::Less
        );
        assert_eq!(
            FieldValue::Float(3.0).compare(&FieldValue::Int(3)),
            Ordering::Equal
        );
    }

    #[test]
    fn mismatched_kinds_use_fixed_rank() {
        assert_eq!(
            FieldValue::Missing.compare(&FieldValue::Int(0)),
            Ordering::Less
        );
        assert_eq!(
            FieldValue::Text("5").compare(&FieldValue::Int(10)),
            Ordering::Greater
        );
    }

    #[test]
    fn columns_parse_from_service_keys() {
        assert_eq!("minStock".parse(), Ok(InventoryColumn::MinStock));
        assert_eq!("min_stock".parse(), Ok(InventoryColumn::MinStock));
        assert_eq!("total_value".parse(), Ok(LogColumn::TotalValue));
        assert!("colour".parse::<InventoryColumn>().is_err());
    }

    #[test]
    fn visible_filters_before_sorting() {
        let rows = vec![item("C", "Gear", 9), item("A", "Bolt", 3), item("B", "Gasket", 1)];
        let mut state = TableState::default();
        state.query = "g".into();
        state.sort.click(InventoryColumn::Stock);
        let skus: Vec<&str> = state.visible(&rows).iter().map(|r| r.id()).collect();
        assert_eq!(skus, vec!["B", "C"]);
    }

    #[test]
    fn reset_clears_query_and_sort() {
        let mut state = TableState::default();
        state.query = "bolt".into();
        state.sort.click(InventoryColumn::Name);
        state.reset();
        assert_eq!(state, TableState::default());
    }
}
