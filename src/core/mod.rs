pub mod duplicates;
pub mod etl;
pub mod export;
pub mod inspector;
pub mod loader;
pub mod pipeline;
pub mod projector;
pub mod report;
pub mod session;
pub mod summary;

pub use crate::domain::model::{
    Cell, ColumnType, DuplicateGroup, DuplicateOutcome, DuplicateReport, ExportArtifact,
    ExportContext, ExportFormat, ExtractionView, FieldCatalog, LoadedDocument, ProjectedTable,
    RecordSource, Row, SessionView, SummaryRow, TableOverview, TypeLabel, ViewStage,
};
pub use crate::domain::ports::{ConfigProvider, Pipeline, Storage};
pub use crate::utils::error::Result;

pub use duplicates::{detect_duplicates, duplicate_key, KEY_SEPARATOR};
pub use export::{build_artifacts, export_filename, to_csv, to_spreadsheet};
pub use inspector::inspect;
pub use loader::{load, locate_records, parse_document};
pub use projector::project;
pub use session::{Selections, Session};
pub use summary::summarize;
