//! Duplicate detection over a projected table.
//!
//! Rows are grouped by the text of their key-column cells (see
//! [`Cell::render`]; null renders as the empty string). Grouping compares
//! the per-column values, so `["a - b", "c"]` and `["a", "b - c"]` stay in
//! different groups even though both render to the key `a - b - c`.
//!
//! # Example
//!
//! ```
//! use json_extractor::core::{detect_duplicates, load, project, DuplicateOutcome};
//!
//! let doc = load(
//!     br#"{"data":[{"id":1,"name":"A"},{"id":2,"name":"A"},{"id":3,"name":"B"}]}"#,
//!     "people.json",
//! )
//! .unwrap();
//! let fields = vec!["id".to_string(), "name".to_string()];
//! let table = project(&doc.records, &fields).unwrap();
//!
//! let outcome = detect_duplicates(&table, &["name".to_string()]).unwrap();
//! let DuplicateOutcome::Performed(report) = outcome else { unreachable!() };
//!
//! assert_eq!(report.groups.len(), 1);
//! assert_eq!(report.groups[0].key, "A");
//! assert_eq!(report.duplicate_row_count(), 2);
//! ```

use crate::core::projector::dedup_preserving_order;
use crate::core::{Cell, DuplicateGroup, DuplicateOutcome, DuplicateReport, ProjectedTable, Row};
use crate::utils::error::{ExtractorError, Result};
use std::collections::HashMap;

pub const KEY_SEPARATOR: &str = " - ";

fn key_values(row: &Row, key_indices: &[usize]) -> Vec<String> {
    key_indices
        .iter()
        .map(|&i| row.get(i).map(Cell::render).unwrap_or_default())
        .collect()
}

/// Rendered duplicate key of a row for the given key-column positions.
pub fn duplicate_key(row: &Row, key_indices: &[usize]) -> String {
    key_values(row, key_indices).join(KEY_SEPARATOR)
}

fn resolve_key_columns(table: &ProjectedTable, key_columns: &[String]) -> Result<Vec<usize>> {
    key_columns
        .iter()
        .map(|column| {
            table
                .column_index(column)
                .ok_or_else(|| ExtractorError::UnknownKeyColumn {
                    column: column.clone(),
                })
        })
        .collect()
}

pub fn detect_duplicates(table: &ProjectedTable, key_columns: &[String]) -> Result<DuplicateOutcome> {
    let key_columns = dedup_preserving_order(key_columns);
    if key_columns.is_empty() {
        tracing::debug!("No duplicate-check columns selected, skipping detection");
        return Ok(DuplicateOutcome::NotPerformed);
    }

    let key_indices = resolve_key_columns(table, &key_columns)?;

    // Groups in first-seen order; the map points into `groups`.
    let mut positions: HashMap<Vec<String>, usize> = HashMap::new();
    let mut groups: Vec<DuplicateGroup> = Vec::new();

    for (row_index, row) in table.rows().iter().enumerate() {
        let values = key_values(row, &key_indices);
        match positions.get(&values) {
            Some(&group_index) => groups[group_index].members.push(row_index),
            None => {
                groups.push(DuplicateGroup {
                    key: values.join(KEY_SEPARATOR),
                    members: vec![row_index],
                });
                positions.insert(values, groups.len() - 1);
            }
        }
    }

    let total_keys = groups.len();
    groups.retain(|group| group.size() > 1);
    // Stable sort keeps first-seen order among equal sizes.
    groups.sort_by(|a, b| b.size().cmp(&a.size()));

    let member_indices: Vec<usize> = groups
        .iter()
        .flat_map(|group| group.members.iter().copied())
        .collect();
    let sample_indices: Vec<usize> = groups.iter().map(|group| group.members[0]).collect();

    let report = DuplicateReport {
        key_columns,
        duplicate_rows: table.select_rows(&member_indices),
        samples: table.select_rows(&sample_indices),
        groups,
    };

    tracing::info!(
        "Duplicate check on [{}]: {} duplicate rows across {} keys ({} distinct keys overall)",
        report.key_columns.join(", "),
        report.duplicate_row_count(),
        report.distinct_keys(),
        total_keys
    );

    Ok(DuplicateOutcome::Performed(report))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::project;
    use serde_json::{json, Value};

    fn names(list: &[&str]) -> Vec<String> {
        list.iter().map(|n| n.to_string()).collect()
    }

    fn table(value: Value, columns: &[&str]) -> ProjectedTable {
        let records = value.as_array().cloned().unwrap_or_default();
        project(&records, &names(columns)).unwrap()
    }

    fn report(outcome: DuplicateOutcome) -> DuplicateReport {
        match outcome {
            DuplicateOutcome::Performed(report) => report,
            DuplicateOutcome::NotPerformed => panic!("detection should have run"),
        }
    }

    #[test]
    fn test_single_column_scenario() {
        let t = table(
            json!([
                {"id": 1, "name": "A"},
                {"id": 2, "name": "A"},
                {"id": 3, "name": "B"}
            ]),
            &["id", "name"],
        );
        let r = report(detect_duplicates(&t, &names(&["name"])).unwrap());

        assert_eq!(r.groups.len(), 1);
        assert_eq!(r.groups[0].key, "A");
        assert_eq!(r.groups[0].members, vec![0, 1]);
        assert_eq!(r.duplicate_row_count(), 2);
        assert_eq!(r.distinct_keys(), 1);
        assert_eq!(r.duplicate_rows.len(), 2);
        assert!(r
            .duplicate_rows
            .rows()
            .iter()
            .all(|row| row[0] != Cell::Number(3.into())));
    }

    #[test]
    fn test_no_duplicates() {
        let t = table(json!([{"id": 1}, {"id": 2}, {"id": 3}]), &["id"]);
        let r = report(detect_duplicates(&t, &names(&["id"])).unwrap());
        assert!(r.is_empty());
        assert_eq!(r.duplicate_row_count(), 0);
        assert!(r.samples.is_empty());
        assert!(r.duplicate_rows.is_empty());
    }

    #[test]
    fn test_group_of_three_with_one_sample() {
        let t = table(
            json!([
                {"id": "A", "email": "x@a.io", "city": "Oslo"},
                {"id": "B", "email": "x@a.io", "city": "Oslo"},
                {"id": "C", "email": "x@a.io", "city": "Oslo"},
                {"id": "D", "email": "y@a.io", "city": "Oslo"}
            ]),
            &["id", "email", "city"],
        );
        let r = report(detect_duplicates(&t, &names(&["email", "city"])).unwrap());

        assert_eq!(r.groups.len(), 1);
        assert_eq!(r.groups[0].size(), 3);
        assert_eq!(r.groups[0].key, "x@a.io - Oslo");
        assert_eq!(r.samples.len(), 1);

        let sample_id = r.samples.cell(0, "id").unwrap().render();
        assert!(["A", "B", "C"].contains(&sample_id.as_str()));
        assert!(r
            .duplicate_rows
            .rows()
            .iter()
            .all(|row| row[0] != Cell::Text("D".to_string())));
    }

    #[test]
    fn test_groups_sorted_by_size_then_first_seen() {
        let t = table(
            json!([
                {"k": "b"}, {"k": "a"}, {"k": "c"}, {"k": "a"},
                {"k": "b"}, {"k": "c"}, {"k": "c"}, {"k": "d"}
            ]),
            &["k"],
        );
        let r = report(detect_duplicates(&t, &names(&["k"])).unwrap());

        let keys: Vec<&str> = r.groups.iter().map(|g| g.key.as_str()).collect();
        assert_eq!(keys, vec!["c", "b", "a"]);
        assert_eq!(r.groups[0].members, vec![2, 5, 6]);
        assert_eq!(r.duplicate_row_count(), 7);

        let sample_keys: Vec<String> = r.samples.rows().iter().map(|row| row[0].render()).collect();
        assert_eq!(sample_keys, vec!["c", "b", "a"]);

        let listing: Vec<String> = r
            .duplicate_rows
            .rows()
            .iter()
            .map(|row| row[0].render())
            .collect();
        assert_eq!(listing, vec!["c", "c", "c", "b", "b", "a", "a"]);
    }

    #[test]
    fn test_key_column_order_does_not_change_grouping() {
        let t = table(
            json!([
                {"a": 1, "b": "x"},
                {"a": 1, "b": "x"},
                {"a": 2, "b": "x"},
                {"a": 2, "b": "y"},
                {"a": 2, "b": "y"}
            ]),
            &["a", "b"],
        );
        let ab = report(detect_duplicates(&t, &names(&["a", "b"])).unwrap());
        let ba = report(detect_duplicates(&t, &names(&["b", "a"])).unwrap());

        let members = |r: &DuplicateReport| -> Vec<Vec<usize>> {
            r.groups.iter().map(|g| g.members.clone()).collect()
        };
        assert_eq!(members(&ab), members(&ba));
        assert_eq!(ab.groups[0].key, "1 - x");
        assert_eq!(ba.groups[0].key, "x - 1");
    }

    #[test]
    fn test_separator_inside_values_does_not_merge_groups() {
        let t = table(
            json!([
                {"a": "p - q", "b": "r"},
                {"a": "p", "b": "q - r"}
            ]),
            &["a", "b"],
        );
        let r = report(detect_duplicates(&t, &names(&["a", "b"])).unwrap());
        assert!(r.is_empty());
    }

    #[test]
    fn test_null_and_missing_render_as_empty() {
        let t = table(
            json!([
                {"id": 1, "email": null},
                {"id": 2},
                {"id": 3, "email": "e"}
            ]),
            &["id", "email"],
        );
        let r = report(detect_duplicates(&t, &names(&["email"])).unwrap());
        assert_eq!(r.groups.len(), 1);
        assert_eq!(r.groups[0].key, "");
        assert_eq!(r.groups[0].members, vec![0, 1]);
    }

    #[test]
    fn test_integral_float_matches_integer_key() {
        let t = table(json!([{"k": 1}, {"k": 1.0}, {"k": 1.5}]), &["k"]);
        let r = report(detect_duplicates(&t, &names(&["k"])).unwrap());
        assert_eq!(r.groups.len(), 1);
        assert_eq!(r.groups[0].key, "1");
        assert_eq!(r.groups[0].members, vec![0, 1]);
    }

    #[test]
    fn test_empty_key_selection_is_not_performed() {
        let t = table(json!([{"id": 1}, {"id": 1}]), &["id"]);
        assert_eq!(
            detect_duplicates(&t, &[]).unwrap(),
            DuplicateOutcome::NotPerformed
        );
    }

    #[test]
    fn test_unknown_key_column_is_rejected() {
        let t = table(json!([{"id": 1, "name": "A"}]), &["id"]);
        let err = detect_duplicates(&t, &names(&["name"])).unwrap_err();
        assert!(matches!(err, ExtractorError::UnknownKeyColumn { column } if column == "name"));
    }

    #[test]
    fn test_duplicate_key_renders_in_given_order() {
        let row = vec![
            Cell::Number(7.into()),
            Cell::Null,
            Cell::Bool(true),
            Cell::Text("z".to_string()),
        ];
        assert_eq!(duplicate_key(&row, &[3]), "z");
        assert_eq!(duplicate_key(&row, &[2, 0, 1]), "true - 7 - ");
    }
}
