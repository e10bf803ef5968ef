//! Plain-text rendering of a [`SessionView`] for the terminal.

use crate::core::{
    DuplicateOutcome, DuplicateReport, FieldCatalog, ProjectedTable, SessionView, SummaryRow,
    TableOverview, ViewStage,
};
use prettytable::{Cell as PtCell, Row as PtRow, Table};
use std::fmt::Write;

const MAX_CELL_WIDTH: usize = 60;

pub const EXPECTED_STRUCTURE: &str = r#"Your JSON file should have a structure similar to:

{
    "data": [
        {"id": 1, "name": "John", "age": 30},
        {"id": 2, "name": "Jane", "age": 25}
    ]
}

Alternatively, the file can be a direct array:

[
    {"id": 1, "name": "John", "age": 30},
    {"id": 2, "name": "Jane", "age": 25}
]
"#;

fn truncate(text: &str) -> String {
    if text.chars().count() <= MAX_CELL_WIDTH {
        return text.to_string();
    }
    let cut: String = text.chars().take(MAX_CELL_WIDTH - 3).collect();
    format!("{}...", cut)
}

fn titles<S: AsRef<str>>(names: &[S]) -> PtRow {
    PtRow::new(names.iter().map(|n| PtCell::new(n.as_ref())).collect())
}

pub fn render_catalog(catalog: &FieldCatalog) -> String {
    let mut out = String::from("Available Keys\n");
    for field in catalog.field_names() {
        let _ = writeln!(out, "  - {}", catalog.describe(&field));
    }
    out
}

pub fn render_overview(overview: &TableOverview) -> String {
    format!(
        "Data Overview\n  Total Records: {}\n  Selected Columns: {}\n  Total Cells: {}\n",
        overview.total_records, overview.selected_columns, overview.total_cells
    )
}

pub fn render_table(table: &ProjectedTable, limit: usize) -> String {
    let mut pt = Table::new();
    pt.set_titles(titles(table.columns()));
    for row in table.rows().iter().take(limit) {
        pt.add_row(PtRow::new(
            row.iter()
                .map(|cell| PtCell::new(&truncate(&cell.to_string())))
                .collect(),
        ));
    }

    let mut out = pt.to_string();
    if table.len() > limit {
        let _ = writeln!(out, "... {} more rows", table.len() - limit);
    }
    out
}

pub fn render_summary(summary: &[SummaryRow]) -> String {
    let mut pt = Table::new();
    pt.set_titles(titles(&crate::core::export::SUMMARY_HEADER));
    for s in summary {
        pt.add_row(PtRow::new(vec![
            PtCell::new(&s.column),
            PtCell::new(&s.non_null.to_string()),
            PtCell::new(&s.null.to_string()),
            PtCell::new(s.data_type.as_str()),
            PtCell::new(&s.unique_values.to_string()),
        ]));
    }
    pt.to_string()
}

fn render_report(report: &DuplicateReport, limit: usize) -> String {
    let mut out = String::new();
    let columns = report.key_columns.join(", ");

    if report.is_empty() {
        let _ = writeln!(out, "No duplicates found on [{}]", columns);
        return out;
    }

    let _ = writeln!(
        out,
        "Duplicates on [{}]: {} rows share {} keys",
        columns,
        report.duplicate_row_count(),
        report.distinct_keys()
    );

    let mut groups = Table::new();
    groups.set_titles(titles(&["Duplicate Key", "Count"]));
    for group in &report.groups {
        groups.add_row(PtRow::new(vec![
            PtCell::new(&truncate(&group.key)),
            PtCell::new(&group.size().to_string()),
        ]));
    }
    out.push_str("\nGrouped Summary\n");
    out.push_str(&groups.to_string());

    out.push_str("\nAll Duplicate Rows\n");
    out.push_str(&render_table(&report.duplicate_rows, limit));

    out.push_str("\nOne Sample per Group\n");
    out.push_str(&render_table(&report.samples, limit));
    out
}

pub fn render_duplicates(outcome: &DuplicateOutcome, limit: usize) -> String {
    match outcome {
        DuplicateOutcome::NotPerformed => {
            "No duplicate check performed. Choose duplicate-check columns to find duplicates.\n"
                .to_string()
        }
        DuplicateOutcome::Performed(report) => render_report(report, limit),
    }
}

pub fn render_view(view: &SessionView, preview_rows: usize) -> String {
    let mut out = String::new();

    if let Some(raw) = &view.raw_json {
        let _ = writeln!(out, "Raw JSON Structure\n{}\n", raw);
    }

    if let Some(notice) = view.source.structure_notice() {
        let _ = writeln!(out, "{}\n", notice);
    }

    match &view.stage {
        ViewStage::NoRecords => {
            out.push_str("No dictionary items found in the record collection.\n\n");
            out.push_str(EXPECTED_STRUCTURE);
        }
        ViewStage::AwaitingFields => {
            out.push_str(&render_catalog(&view.catalog));
            out.push_str("\nSelect keys to retrieve (--fields, or --all-fields).\n");
        }
        ViewStage::Extracted(extraction) => {
            out.push_str(&render_catalog(&view.catalog));
            out.push('\n');
            out.push_str(&render_overview(&extraction.table.overview()));
            out.push_str("\nPreview Data\n");
            out.push_str(&render_table(&extraction.table, preview_rows));
            out.push_str("\nData Summary\n");
            out.push_str(&render_summary(&extraction.summary));
            out.push('\n');
            out.push_str(&render_duplicates(&extraction.duplicates, preview_rows));
        }
    }

    out
}
