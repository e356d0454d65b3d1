//! Tri-state column sorting.
//!
//! Clicking a column header cycles it `Idle -> Ascending -> Descending ->
//! Idle`. At most one column is ever out of `Idle`: the state stores a single
//! optional `(column, direction)` pair, so selecting a new column resets the
//! previous one without any bookkeeping.

use super::Record;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SortDirection {
    Ascending,
    Descending,
}

/// Per-column view of the sort state, as drawn in the header.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum ColumnSort {
    #[default]
    Idle,
    Ascending,
    Descending,
}

impl ColumnSort {
    /// Next state for a header click.
    pub fn next(self) -> Self {
        match self {
            ColumnSort::Idle => ColumnSort::Ascending,
            ColumnSort::Ascending => ColumnSort::Descending,
            ColumnSort::Descending => ColumnSort::Idle,
        }
    }

    /// Header glyph: neutral arrows when idle, a chevron otherwise.
    pub fn indicator(self) -> &'static str {
        match self {
            ColumnSort::Idle => "↕",
            ColumnSort::Ascending => "▲",
            ColumnSort::Descending => "▼",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SortState<C> {
    active: Option<(C, SortDirection)>,
}

impl<C: Copy + Eq> Default for SortState<C> {
    fn default() -> Self {
        Self::unsorted()
    }
}

impl<C: Copy + Eq> SortState<C> {
    pub fn unsorted() -> Self {
        Self { active: None }
    }

    pub fn sorted(column: C, direction: SortDirection) -> Self {
        Self {
            active: Some((column, direction)),
        }
    }

    pub fn active(&self) -> Option<(C, SortDirection)> {
        self.active
    }

    pub fn is_unsorted(&self) -> bool {
        self.active.is_none()
    }

    pub fn column_state(&self, column: C) -> ColumnSort {
        match self.active {
            Some((c, SortDirection::Ascending)) if c == column => ColumnSort::Ascending,
            Some((c, SortDirection::Descending)) if c == column => ColumnSort::Descending,
            _ => ColumnSort::Idle,
        }
    }

    /// Apply one header click on `column`.
    pub fn click(&mut self, column: C) {
        self.active = match self.column_state(column).next() {
            ColumnSort::Idle => None,
            ColumnSort::Ascending => Some((column, SortDirection::Ascending)),
            ColumnSort::Descending => Some((column, SortDirection::Descending)),
        };
    }

    pub fn clear(&mut self) {
        self.active = None;
    }
}

/// Order `rows` by the active column. Unsorted state returns the input as-is.
///
/// The sort is stable in both directions: descending compares with the
/// operands swapped rather than reversing, so tied rows keep their input
/// order either way.
pub fn sort_rows<'a, R: Record>(mut rows: Vec<&'a R>, state: &SortState<R::Column>) -> Vec<&'a R> {
    let Some((column, direction)) = state.active() else {
        return rows;
    };
    rows.sort_by(|a, b| {
        let (left, right) = (a.field(column), b.field(column));
        match direction {
            SortDirection::Ascending => left.compare(&right),
            SortDirection::Descending => right.compare(&left),
        }
    });
    rows
}
