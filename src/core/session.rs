use crate::core::{
    detect_duplicates, inspect, project, summarize, ExtractionView, LoadedDocument, SessionView,
    ViewStage,
};
use crate::utils::error::Result;

/// User choices that drive a pass.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Selections {
    pub fields: Vec<String>,
    pub select_all: bool,
    pub duplicate_keys: Vec<String>,
}

/// Current document plus selections. Every pass recomputes the whole view
/// from these two inputs.
#[derive(Debug, Clone)]
pub struct Session {
    document: LoadedDocument,
    selections: Selections,
}

impl Session {
    pub fn new(document: LoadedDocument, selections: Selections) -> Self {
        Self {
            document,
            selections,
        }
    }

    pub fn document(&self) -> &LoadedDocument {
        &self.document
    }

    pub fn selections(&self) -> &Selections {
        &self.selections
    }

    pub fn with_selections(self, selections: Selections) -> Self {
        Self { selections, ..self }
    }

    pub fn run_pass(&self) -> Result<SessionView> {
        let catalog = inspect(&self.document.records);

        let stage = if catalog.is_empty() {
            tracing::warn!("No dictionary items found in the record collection");
            ViewStage::NoRecords
        } else {
            let fields = if self.selections.fields.is_empty() && self.selections.select_all {
                catalog.field_names()
            } else {
                self.selections.fields.clone()
            };

            for field in fields.iter().filter(|f| !catalog.contains(f)) {
                tracing::warn!("Field '{}' does not appear in any record", field);
            }

            match project(&self.document.records, &fields) {
                None => ViewStage::AwaitingFields,
                Some(table) => {
                    let summary = summarize(&table);
                    let duplicates = detect_duplicates(&table, &self.selections.duplicate_keys)?;
                    let duplicate_summary =
                        duplicates.report().map(|r| summarize(&r.duplicate_rows));
                    ViewStage::Extracted(ExtractionView {
                        table,
                        summary,
                        duplicates,
                        duplicate_summary,
                    })
                }
            }
        };

        Ok(SessionView {
            source_name: self.document.source_name.clone(),
            source: self.document.source.clone(),
            raw_json: self.document.raw_json.clone(),
            catalog,
            stage,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{load, DuplicateOutcome, RecordSource};

    fn strings(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    fn session(json: &str, selections: Selections) -> Session {
        Session::new(load(json.as_bytes(), "input.json").unwrap(), selections)
    }

    #[test]
    fn test_pass_without_selection_awaits_fields() {
        let view = session(r#"{"data":[{"id":1}]}"#, Selections::default())
            .run_pass()
            .unwrap();
        assert_eq!(view.stage, ViewStage::AwaitingFields);
        assert_eq!(view.catalog.field_names(), strings(&["id"]));
    }

    #[test]
    fn test_pass_with_no_objects_reports_no_records() {
        let view = session(r#"{"data":[1,2,3]}"#, Selections::default())
            .run_pass()
            .unwrap();
        assert_eq!(view.stage, ViewStage::NoRecords);
    }

    #[test]
    fn test_select_all_uses_catalog_order() {
        let view = session(
            r#"{"data":[{"b":1,"a":2},{"c":3}]}"#,
            Selections {
                select_all: true,
                ..Selections::default()
            },
        )
        .run_pass()
        .unwrap();
        let extraction = view.extraction().unwrap();
        assert_eq!(extraction.table.columns(), &strings(&["a", "b", "c"])[..]);
        assert_eq!(extraction.duplicates, DuplicateOutcome::NotPerformed);
        assert!(extraction.duplicate_summary.is_none());
    }

    #[test]
    fn test_explicit_fields_win_over_select_all() {
        let view = session(
            r#"{"data":[{"b":1,"a":2}]}"#,
            Selections {
                fields: strings(&["b"]),
                select_all: true,
                duplicate_keys: vec![],
            },
        )
        .run_pass()
        .unwrap();
        assert_eq!(
            view.extraction().unwrap().table.columns(),
            &strings(&["b"])[..]
        );
    }

    #[test]
    fn test_full_pass_with_duplicates() {
        let view = session(
            r#"{"data":[{"id":1,"name":"A"},{"id":2,"name":"A"},{"id":3,"name":"B"}]}"#,
            Selections {
                fields: strings(&["id", "name"]),
                select_all: false,
                duplicate_keys: strings(&["name"]),
            },
        )
        .run_pass()
        .unwrap();

        let extraction = view.extraction().unwrap();
        let report = extraction.duplicates.report().unwrap();
        assert_eq!(report.duplicate_row_count(), 2);
        assert_eq!(extraction.duplicate_summary.as_ref().unwrap()[0].non_null, 2);
        assert_eq!(extraction.summary[0].non_null, 3);
    }

    #[test]
    fn test_root_array_pass() {
        let view = session(
            r#"[{"x":1},{"x":2}]"#,
            Selections {
                fields: strings(&["x"]),
                ..Selections::default()
            },
        )
        .run_pass()
        .unwrap();
        assert_eq!(view.source, RecordSource::RootArray);
        assert_eq!(view.extraction().unwrap().table.len(), 2);
    }

    #[test]
    fn test_changing_selection_recomputes() {
        let first = session(
            r#"{"data":[{"a":1,"b":1},{"a":1,"b":2}]}"#,
            Selections {
                fields: strings(&["a", "b"]),
                select_all: false,
                duplicate_keys: strings(&["a"]),
            },
        );
        let before = first.run_pass().unwrap();
        assert!(!before.extraction().unwrap().duplicates.report().unwrap().is_empty());

        let second = first.with_selections(Selections {
            fields: strings(&["a", "b"]),
            select_all: false,
            duplicate_keys: strings(&["a", "b"]),
        });
        let after = second.run_pass().unwrap();
        assert!(after.extraction().unwrap().duplicates.report().unwrap().is_empty());
    }

    #[test]
    fn test_key_outside_selection_fails() {
        let result = session(
            r#"{"data":[{"a":1,"b":1}]}"#,
            Selections {
                fields: strings(&["a"]),
                select_all: false,
                duplicate_keys: strings(&["b"]),
            },
        )
        .run_pass();
        assert!(result.is_err());
    }
}
