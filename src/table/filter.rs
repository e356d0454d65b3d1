use super::Record;

/// Rows whose name, identifier or category contains `query`, ignoring case.
///
/// Collection order is preserved and an empty query keeps every row.
pub fn filter_rows<'a, R: Record>(rows: &'a [R], query: &str) -> Vec<&'a R> {
    if query.is_empty() {
        return rows.iter().collect();
    }
    let needle = query.to_lowercase();
    rows.iter().filter(|r| matches_query(*r, &needle)).collect()
}

/// `needle` must already be lowercased.
pub fn matches_query<R: Record>(record: &R, needle: &str) -> bool {
    record
        .search_fields()
        .iter()
        .any(|field| field.to_lowercase().contains(needle))
}
