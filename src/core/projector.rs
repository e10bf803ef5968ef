use crate::core::{Cell, ProjectedTable};
use serde_json::Value;
use std::collections::HashSet;

/// Keep the first occurrence of each name, preserving the caller's order.
pub fn dedup_preserving_order(names: &[String]) -> Vec<String> {
    let mut seen = HashSet::new();
    names
        .iter()
        .filter(|name| seen.insert(name.as_str()))
        .cloned()
        .collect()
}

/// Build a flat table from the object records, one column per selected
/// field. Returns `None` when nothing is selected.
pub fn project(records: &[Value], selected_fields: &[String]) -> Option<ProjectedTable> {
    let columns = dedup_preserving_order(selected_fields);
    if columns.is_empty() {
        return None;
    }

    let mut table = ProjectedTable::new(columns);

    for object in records.iter().filter_map(Value::as_object) {
        let row = table
            .columns()
            .iter()
            .map(|field| object.get(field).map(Cell::from_value).unwrap_or(Cell::Null))
            .collect();
        table.push_row(row);
    }

    let skipped = records.len() - table.len();
    if skipped > 0 {
        tracing::debug!("Skipped {} non-object elements during projection", skipped);
    }
    tracing::info!(
        "Projected {} rows x {} columns",
        table.len(),
        table.columns().len()
    );

    Some(table)
}
