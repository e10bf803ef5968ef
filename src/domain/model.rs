use crate::utils::error::ExtractorError;
use serde::Serialize;
use serde_json::{Number, Value};
use std::collections::{BTreeMap, BTreeSet};
use std::fmt;
use std::str::FromStr;

/// Where the record collection was located inside the uploaded document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub enum RecordSource {
    /// Non-empty array under the top-level `data` key.
    DataKey,
    /// The document root is itself an array.
    RootArray,
    /// Object root without a usable `data` array.
    Missing { available_keys: Vec<String> },
    /// Scalar root, nothing to point the user at.
    NoKeys,
}

impl RecordSource {
    /// Non-fatal structure diagnostics for the user, `None` when the
    /// document had the expected `data` wrapper.
    pub fn structure_notice(&self) -> Option<String> {
        match self {
            RecordSource::DataKey => None,
            RecordSource::RootArray => Some(
                "No 'data' key found or it is empty in the JSON. Using root array as data source."
                    .to_string(),
            ),
            RecordSource::Missing { available_keys } if available_keys.is_empty() => Some(
                "No 'data' key found or it is empty in the JSON. The document has no top-level keys."
                    .to_string(),
            ),
            RecordSource::Missing { available_keys } => Some(format!(
                "No 'data' key found or it is empty in the JSON. Available keys in JSON: {}",
                available_keys.join(", ")
            )),
            RecordSource::NoKeys => Some(
                "No 'data' key found and the JSON root is neither an object nor an array."
                    .to_string(),
            ),
        }
    }
}

#[derive(Debug, Clone)]
pub struct LoadedDocument {
    pub source_name: String,
    pub source: RecordSource,
    pub records: Vec<Value>,
    /// Pretty-printed document, kept only when the user asked to see it.
    pub raw_json: Option<String>,
}

impl LoadedDocument {
    /// Number of elements that are JSON objects and therefore extractable.
    pub fn object_count(&self) -> usize {
        self.records.iter().filter(|r| r.is_object()).count()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum TypeLabel {
    Array,
    Boolean,
    Null,
    Number,
    Object,
    String,
}

impl TypeLabel {
    pub fn of(value: &Value) -> Self {
        match value {
            Value::Null => TypeLabel::Null,
            Value::Bool(_) => TypeLabel::Boolean,
            Value::Number(_) => TypeLabel::Number,
            Value::String(_) => TypeLabel::String,
            Value::Array(_) => TypeLabel::Array,
            Value::Object(_) => TypeLabel::Object,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            TypeLabel::Array => "array",
            TypeLabel::Boolean => "boolean",
            TypeLabel::Null => "null",
            TypeLabel::Number => "number",
            TypeLabel::Object => "object",
            TypeLabel::String => "string",
        }
    }
}

impl fmt::Display for TypeLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Field name to the set of value types observed for it.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct FieldCatalog {
    fields: BTreeMap<String, BTreeSet<TypeLabel>>,
}

impl FieldCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn observe(&mut self, field: &str, label: TypeLabel) {
        self.fields.entry(field.to_string()).or_default().insert(label);
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn contains(&self, field: &str) -> bool {
        self.fields.contains_key(field)
    }

    /// Field names in display order (lexicographic ascending).
    pub fn field_names(&self) -> Vec<String> {
        self.fields.keys().cloned().collect()
    }

    pub fn types(&self, field: &str) -> Option<&BTreeSet<TypeLabel>> {
        self.fields.get(field)
    }

    /// `name (number, string)` as shown next to a selection control.
    pub fn describe(&self, field: &str) -> String {
        match self.fields.get(field) {
            Some(labels) => {
                let labels: Vec<&str> = labels.iter().map(TypeLabel::as_str).collect();
                format!("{} ({})", field, labels.join(", "))
            }
            None => field.to_string(),
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &BTreeSet<TypeLabel>)> {
        self.fields.iter()
    }
}

/// A flat table cell. Compound JSON never appears here; it is stored as
/// its JSON text.
#[derive(Debug, Clone, PartialEq)]
pub enum Cell {
    Null,
    Bool(bool),
    Number(Number),
    Text(String),
}

impl Cell {
    pub fn from_value(value: &Value) -> Self {
        match value {
            Value::Null => Cell::Null,
            Value::Bool(b) => Cell::Bool(*b),
            Value::Number(n) => Cell::Number(n.clone()),
            Value::String(s) => Cell::Text(s.clone()),
            Value::Array(_) | Value::Object(_) => Cell::Text(value.to_string()),
        }
    }

    pub fn is_null(&self) -> bool {
        matches!(self, Cell::Null)
    }

    /// Canonical text form, shared by CSV export and duplicate keys.
    /// Null renders as the empty string; `1.0` renders like `1`.
    pub fn render(&self) -> String {
        match self {
            Cell::Null => String::new(),
            Cell::Bool(b) => b.to_string(),
            Cell::Number(n) => render_number(n),
            Cell::Text(s) => s.clone(),
        }
    }
}

// 2^53: above this an f64 no longer holds every integer exactly
const MAX_EXACT_FLOAT_INT: f64 = 9_007_199_254_740_992.0;

fn render_number(n: &Number) -> String {
    match n.as_f64() {
        Some(v) if n.is_f64() && v.fract() == 0.0 && v.abs() < MAX_EXACT_FLOAT_INT => {
            (v as i64).to_string()
        }
        _ => n.to_string(),
    }
}

impl fmt::Display for Cell {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Cell::Null => f.write_str("None"),
            other => f.write_str(&other.render()),
        }
    }
}

pub type Row = Vec<Cell>;

/// Rectangular projection of the record collection. Every row holds exactly
/// one cell per column.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ProjectedTable {
    columns: Vec<String>,
    rows: Vec<Row>,
}

impl ProjectedTable {
    pub fn new(columns: Vec<String>) -> Self {
        Self {
            columns,
            rows: Vec::new(),
        }
    }

    pub fn push_row(&mut self, row: Row) {
        debug_assert_eq!(
            row.len(),
            self.columns.len(),
            "row width {} doesn't match column count {}",
            row.len(),
            self.columns.len()
        );
        self.rows.push(row);
    }

    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn rows(&self) -> &[Row] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn column_index(&self, column: &str) -> Option<usize> {
        self.columns.iter().position(|c| c == column)
    }

    pub fn cell(&self, row: usize, column: &str) -> Option<&Cell> {
        let index = self.column_index(column)?;
        self.rows.get(row).and_then(|r| r.get(index))
    }

    /// New table with the same columns and the given rows, in the given order.
    pub fn select_rows(&self, indices: &[usize]) -> Self {
        let mut table = Self::new(self.columns.clone());
        for &index in indices {
            if let Some(row) = self.rows.get(index) {
                table.push_row(row.clone());
            }
        }
        table
    }

    pub fn head(&self, n: usize) -> Self {
        Self {
            columns: self.columns.clone(),
            rows: self.rows.iter().take(n).cloned().collect(),
        }
    }

    pub fn overview(&self) -> TableOverview {
        TableOverview {
            total_records: self.rows.len(),
            selected_columns: self.columns.len(),
            total_cells: self.rows.len() * self.columns.len(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct TableOverview {
    pub total_records: usize,
    pub selected_columns: usize,
    pub total_cells: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ColumnType {
    /// Every cell is null.
    Empty,
    Boolean,
    Integer,
    Float,
    String,
    Mixed,
}

impl ColumnType {
    pub fn as_str(&self) -> &'static str {
        match self {
            ColumnType::Empty => "empty",
            ColumnType::Boolean => "boolean",
            ColumnType::Integer => "integer",
            ColumnType::Float => "float",
            ColumnType::String => "string",
            ColumnType::Mixed => "mixed",
        }
    }
}

impl fmt::Display for ColumnType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SummaryRow {
    pub column: String,
    pub non_null: usize,
    pub null: usize,
    pub data_type: ColumnType,
    pub unique_values: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DuplicateGroup {
    /// Key values joined with `" - "` in key-column order.
    pub key: String,
    /// Row indices into the projected table, ascending.
    pub members: Vec<usize>,
}

impl DuplicateGroup {
    pub fn size(&self) -> usize {
        self.members.len()
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct DuplicateReport {
    pub key_columns: Vec<String>,
    /// Groups with two or more members, largest first.
    pub groups: Vec<DuplicateGroup>,
    /// Every member row, group by group.
    pub duplicate_rows: ProjectedTable,
    /// First member of each group, in group order.
    pub samples: ProjectedTable,
}

impl DuplicateReport {
    pub fn duplicate_row_count(&self) -> usize {
        self.groups.iter().map(DuplicateGroup::size).sum()
    }

    pub fn distinct_keys(&self) -> usize {
        self.groups.len()
    }

    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }
}

/// An empty key selection means the check never ran, which is not the same
/// as running it and finding nothing.
#[derive(Debug, Clone, PartialEq)]
pub enum DuplicateOutcome {
    NotPerformed,
    Performed(DuplicateReport),
}

impl DuplicateOutcome {
    pub fn report(&self) -> Option<&DuplicateReport> {
        match self {
            DuplicateOutcome::NotPerformed => None,
            DuplicateOutcome::Performed(report) => Some(report),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ExtractionView {
    pub table: ProjectedTable,
    pub summary: Vec<SummaryRow>,
    pub duplicates: DuplicateOutcome,
    /// Column summary of the duplicate-only table, when the check ran.
    pub duplicate_summary: Option<Vec<SummaryRow>>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum ViewStage {
    /// The collection holds no objects, so there is nothing to extract.
    NoRecords,
    /// Records are available but no field has been selected yet.
    AwaitingFields,
    Extracted(ExtractionView),
}

/// Everything a presentation layer needs after one pass.
#[derive(Debug, Clone, PartialEq)]
pub struct SessionView {
    pub source_name: String,
    pub source: RecordSource,
    pub raw_json: Option<String>,
    pub catalog: FieldCatalog,
    pub stage: ViewStage,
}

impl SessionView {
    pub fn extraction(&self) -> Option<&ExtractionView> {
        match &self.stage {
            ViewStage::Extracted(view) => Some(view),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum ExportFormat {
    Spreadsheet,
    Csv,
}

impl ExportFormat {
    pub const ALL: [&'static str; 2] = ["xlsx", "csv"];

    pub fn extension(&self) -> &'static str {
        match self {
            ExportFormat::Spreadsheet => "xlsx",
            ExportFormat::Csv => "csv",
        }
    }

    pub fn mime_type(&self) -> &'static str {
        match self {
            ExportFormat::Spreadsheet => {
                "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet"
            }
            ExportFormat::Csv => "text/csv",
        }
    }
}

impl FromStr for ExportFormat {
    type Err = ExtractorError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "xlsx" => Ok(ExportFormat::Spreadsheet),
            "csv" => Ok(ExportFormat::Csv),
            other => Err(ExtractorError::InvalidConfigValueError {
                field: "formats".to_string(),
                value: other.to_string(),
                reason: format!("Unsupported format. Valid formats: {}", Self::ALL.join(", ")),
            }),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum ExportContext {
    FullData,
    Duplicates,
}

impl ExportContext {
    pub const ALL: [&'static str; 2] = ["full", "duplicates"];

    pub fn file_stem(&self) -> &'static str {
        match self {
            ExportContext::FullData => "extracted_data",
            ExportContext::Duplicates => "duplicates",
        }
    }
}

impl FromStr for ExportContext {
    type Err = ExtractorError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "full" => Ok(ExportContext::FullData),
            "duplicates" => Ok(ExportContext::Duplicates),
            other => Err(ExtractorError::InvalidConfigValueError {
                field: "contexts".to_string(),
                value: other.to_string(),
                reason: format!("Unsupported context. Valid contexts: {}", Self::ALL.join(", ")),
            }),
        }
    }
}

#[derive(Debug, Clone)]
pub struct ExportArtifact {
    pub context: ExportContext,
    pub format: ExportFormat,
    pub filename: String,
    pub bytes: Vec<u8>,
}
