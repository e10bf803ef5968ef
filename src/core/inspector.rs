use crate::core::{FieldCatalog, TypeLabel};
use serde_json::Value;

pub fn inspect(records: &[Value]) -> FieldCatalog {
    let mut catalog = FieldCatalog::new();

    for object in records.iter().filter_map(Value::as_object) {
        for (key, value) in object {
            catalog.observe(key, TypeLabel::of(value));
        }
    }

    tracing::debug!("Field catalog built with {} fields", catalog.len());
    catalog
}
