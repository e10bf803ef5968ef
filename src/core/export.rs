use crate::core::{
    Cell, DuplicateOutcome, ExportArtifact, ExportContext, ExportFormat, ExtractionView,
    ProjectedTable, SummaryRow,
};
use crate::utils::error::{ExtractorError, Result};
use chrono::{DateTime, TimeZone};
use rust_xlsxwriter::{Workbook, Worksheet, XlsxError};

pub const DATA_SHEET: &str = "Data";
pub const SUMMARY_SHEET: &str = "Summary";
pub const SUMMARY_HEADER: [&str; 5] = ["Column", "Non-Null", "Null", "Data Type", "Unique Values"];

pub fn to_csv(table: &ProjectedTable) -> Result<Vec<u8>> {
    let mut writer = csv::Writer::from_writer(Vec::new());

    writer.write_record(table.columns())?;
    for row in table.rows() {
        writer.write_record(row.iter().map(Cell::render))?;
    }

    writer
        .into_inner()
        .map_err(|e| ExtractorError::ExportError {
            message: format!("Failed to finish CSV output: {}", e),
        })
}

fn xlsx_error(e: XlsxError) -> ExtractorError {
    ExtractorError::ExportError {
        message: format!("Failed to build spreadsheet: {}", e),
    }
}

fn sheet_row(index: usize) -> Result<u32> {
    u32::try_from(index).map_err(|_| ExtractorError::ExportError {
        message: format!("Row {} is beyond the spreadsheet row limit", index),
    })
}

fn sheet_col(index: usize) -> Result<u16> {
    u16::try_from(index).map_err(|_| ExtractorError::ExportError {
        message: format!("Column {} is beyond the spreadsheet column limit", index),
    })
}

/// Drop characters XML 1.0 cannot carry. Tab, newline and carriage return
/// are kept.
pub fn strip_invalid_xml_chars(text: &str) -> String {
    text.chars()
        .filter(|&c| match c {
            '\t' | '\n' | '\r' => true,
            '\u{FFFE}' | '\u{FFFF}' => false,
            c => (c as u32) >= 0x20,
        })
        .collect()
}

fn write_text(sheet: &mut Worksheet, row: u32, col: u16, text: &str) -> Result<()> {
    sheet
        .write_string(row, col, &strip_invalid_xml_chars(text))
        .map_err(xlsx_error)?;
    Ok(())
}

fn write_cell(sheet: &mut Worksheet, row: u32, col: u16, cell: &Cell) -> Result<()> {
    match cell {
        // 空值不寫入儲存格
        Cell::Null => {}
        Cell::Bool(b) => {
            sheet.write_boolean(row, col, *b).map_err(xlsx_error)?;
        }
        Cell::Number(n) => match n.as_f64() {
            Some(value) => {
                sheet.write_number(row, col, value).map_err(xlsx_error)?;
            }
            None => write_text(sheet, row, col, &n.to_string())?,
        },
        Cell::Text(s) => write_text(sheet, row, col, s)?,
    }
    Ok(())
}

fn write_header<S: AsRef<str>>(sheet: &mut Worksheet, names: &[S]) -> Result<()> {
    for (col, name) in names.iter().enumerate() {
        write_text(sheet, 0, sheet_col(col)?, name.as_ref())?;
    }
    Ok(())
}

fn write_data_sheet(sheet: &mut Worksheet, table: &ProjectedTable) -> Result<()> {
    sheet.set_name(DATA_SHEET).map_err(xlsx_error)?;
    write_header(sheet, table.columns())?;

    for (index, row) in table.rows().iter().enumerate() {
        let row_number = sheet_row(index + 1)?;
        for (col, cell) in row.iter().enumerate() {
            write_cell(sheet, row_number, sheet_col(col)?, cell)?;
        }
    }
    Ok(())
}

fn write_summary_sheet(sheet: &mut Worksheet, summary: &[SummaryRow]) -> Result<()> {
    sheet.set_name(SUMMARY_SHEET).map_err(xlsx_error)?;
    write_header(sheet, &SUMMARY_HEADER)?;

    for (index, s) in summary.iter().enumerate() {
        let row = sheet_row(index + 1)?;
        write_text(sheet, row, 0, &s.column)?;
        sheet
            .write_number(row, 1, s.non_null as f64)
            .map_err(xlsx_error)?;
        sheet.write_number(row, 2, s.null as f64).map_err(xlsx_error)?;
        write_text(sheet, row, 3, s.data_type.as_str())?;
        sheet
            .write_number(row, 4, s.unique_values as f64)
            .map_err(xlsx_error)?;
    }
    Ok(())
}

/// Two-sheet workbook: the table under `Data`, the column summary under
/// `Summary`. Cells over the spreadsheet limits fail with an export error.
pub fn to_spreadsheet(table: &ProjectedTable, summary: &[SummaryRow]) -> Result<Vec<u8>> {
    let mut workbook = Workbook::new();
    write_data_sheet(workbook.add_worksheet(), table)?;
    write_summary_sheet(workbook.add_worksheet(), summary)?;
    workbook.save_to_buffer().map_err(xlsx_error)
}

/// `extracted_data_20240131_235959.xlsx` and friends.
pub fn export_filename<Tz: TimeZone>(
    context: ExportContext,
    format: ExportFormat,
    timestamp: &DateTime<Tz>,
) -> String
where
    Tz::Offset: std::fmt::Display,
{
    format!(
        "{}_{}.{}",
        context.file_stem(),
        timestamp.format("%Y%m%d_%H%M%S"),
        format.extension()
    )
}

fn encode(table: &ProjectedTable, summary: &[SummaryRow], format: ExportFormat) -> Result<Vec<u8>> {
    match format {
        ExportFormat::Spreadsheet => to_spreadsheet(table, summary),
        ExportFormat::Csv => to_csv(table),
    }
}

/// Encode every requested context/format pair. The duplicates context is
/// only exported when the check ran and found something.
pub fn build_artifacts<Tz: TimeZone>(
    view: &ExtractionView,
    contexts: &[ExportContext],
    formats: &[ExportFormat],
    timestamp: &DateTime<Tz>,
) -> Result<Vec<ExportArtifact>>
where
    Tz::Offset: std::fmt::Display,
{
    let mut artifacts = Vec::new();

    for &context in contexts {
        let (table, summary) = match (context, &view.duplicates, &view.duplicate_summary) {
            (ExportContext::FullData, _, _) => (&view.table, &view.summary),
            (ExportContext::Duplicates, DuplicateOutcome::Performed(report), Some(summary))
                if !report.is_empty() =>
            {
                (&report.duplicate_rows, summary)
            }
            (ExportContext::Duplicates, DuplicateOutcome::NotPerformed, _) => {
                tracing::info!("No duplicate check performed, skipping duplicates export");
                continue;
            }
            (ExportContext::Duplicates, _, _) => {
                tracing::info!("No duplicates found, skipping duplicates export");
                continue;
            }
        };

        for &format in formats {
            let bytes = encode(table, summary, format)?;
            let filename = export_filename(context, format, timestamp);
            tracing::debug!(
                "Encoded {} ({} bytes, {})",
                filename,
                bytes.len(),
                format.mime_type()
            );
            artifacts.push(ExportArtifact {
                context,
                format,
                filename,
                bytes,
            });
        }
    }

    Ok(artifacts)
}
