use crate::core::{LoadedDocument, RecordSource};
use crate::utils::error::{ExtractorError, Result};
use serde_json::Value;
use std::path::Path;

const UTF8_BOM: &[u8] = b"\xEF\xBB\xBF";

/// `.txt` uploads get slightly different wording when the JSON is invalid.
pub fn is_text_file(source_name: &str) -> bool {
    Path::new(source_name)
        .extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| ext.eq_ignore_ascii_case("txt"))
        .unwrap_or(false)
}

pub fn parse_document(bytes: &[u8], source_name: &str) -> Result<Value> {
    let bytes = bytes.strip_prefix(UTF8_BOM).unwrap_or(bytes);

    serde_json::from_slice(bytes).map_err(|e| ExtractorError::ParseError {
        source_name: source_name.to_string(),
        message: e.to_string(),
        text_file: is_text_file(source_name),
    })
}

/// Find the record collection: a non-empty `data` array first, then a root
/// array. Anything else yields no records and whatever keys can help the
/// user fix the input.
pub fn locate_records(document: Value, source_name: &str) -> LoadedDocument {
    let (source, records) = match document {
        Value::Object(mut map) => {
            let available_keys: Vec<String> = map.keys().cloned().collect();
            match map.remove("data") {
                Some(Value::Array(items)) if !items.is_empty() => (RecordSource::DataKey, items),
                _ => (RecordSource::Missing { available_keys }, Vec::new()),
            }
        }
        Value::Array(items) => (RecordSource::RootArray, items),
        _ => (RecordSource::NoKeys, Vec::new()),
    };

    match source.structure_notice() {
        Some(notice) => tracing::warn!("{}", notice),
        None => tracing::debug!("Found 'data' array with {} elements", records.len()),
    }

    LoadedDocument {
        source_name: source_name.to_string(),
        source,
        records,
        raw_json: None,
    }
}

pub fn load(bytes: &[u8], source_name: &str) -> Result<LoadedDocument> {
    let document = parse_document(bytes, source_name)?;
    Ok(locate_records(document, source_name))
}
