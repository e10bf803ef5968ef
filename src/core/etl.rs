use crate::core::{Pipeline, SessionView, ViewStage};
use crate::utils::error::Result;
use crate::utils::monitor::SystemMonitor;

/// One-line description of a transform result, used in phase logs.
pub fn transform_summary(view: &SessionView) -> String {
    match &view.stage {
        ViewStage::NoRecords => "no records".to_string(),
        ViewStage::AwaitingFields => format!("{} fields, none selected", view.catalog.len()),
        ViewStage::Extracted(extraction) => {
            let mut text = format!(
                "{} rows x {} columns",
                extraction.table.len(),
                extraction.table.columns().len()
            );
            if let Some(report) = extraction.duplicates.report() {
                text.push_str(&format!(
                    ", {} duplicate rows in {} groups",
                    report.duplicate_row_count(),
                    report.distinct_keys()
                ));
            }
            text
        }
    }
}

/// What one pass produced: the view to present and the files written.
#[derive(Debug)]
pub struct RunOutcome {
    pub view: SessionView,
    pub written: Vec<String>,
}

pub struct ExtractorEngine<P: Pipeline> {
    pipeline: P,
    monitor: SystemMonitor,
}

impl<P: Pipeline> ExtractorEngine<P> {
    pub fn new(pipeline: P) -> Self {
        Self::new_with_monitoring(pipeline, false)
    }

    pub fn new_with_monitoring(pipeline: P, monitor_enabled: bool) -> Self {
        Self {
            pipeline,
            monitor: SystemMonitor::new(monitor_enabled),
        }
    }

    pub fn pipeline(&self) -> &P {
        &self.pipeline
    }

    pub fn run(&self) -> Result<RunOutcome> {
        tracing::info!("Starting extraction pass");

        let document = self.pipeline.extract()?;
        let loaded = format!(
            "{} elements, {} objects",
            document.records.len(),
            document.object_count()
        );
        tracing::info!("Loaded {} from {}", loaded, document.source_name);
        self.monitor.log_phase("extract", &loaded);

        let view = self.pipeline.transform(document)?;
        let produced = transform_summary(&view);
        tracing::info!("Transform produced {}", produced);
        self.monitor.log_phase("transform", &produced);

        let written = self.pipeline.load(&view)?;
        tracing::info!("Exported {} files", written.len());
        self.monitor
            .log_phase("load", &format!("{} files", written.len()));

        self.monitor.log_pass_complete(written.len());
        Ok(RunOutcome { view, written })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{load, FieldCatalog, LoadedDocument, RecordSource, Selections, Session};
    use crate::utils::error::ExtractorError;
    use std::cell::Cell;

    struct CountingPipeline {
        fail_transform: bool,
        loads: Cell<usize>,
    }

    impl Pipeline for CountingPipeline {
        fn extract(&self) -> Result<LoadedDocument> {
            Ok(LoadedDocument {
                source_name: "memory".to_string(),
                source: RecordSource::DataKey,
                records: vec![serde_json::json!({"a": 1})],
                raw_json: None,
            })
        }

        fn transform(&self, document: LoadedDocument) -> Result<SessionView> {
            if self.fail_transform {
                return Err(ExtractorError::UnknownKeyColumn {
                    column: "b".to_string(),
                });
            }
            Ok(SessionView {
                source_name: document.source_name,
                source: document.source,
                raw_json: document.raw_json,
                catalog: FieldCatalog::new(),
                stage: ViewStage::AwaitingFields,
            })
        }

        fn load(&self, _view: &SessionView) -> Result<Vec<String>> {
            self.loads.set(self.loads.get() + 1);
            Ok(vec!["out.csv".to_string()])
        }
    }

    #[test]
    fn test_run_executes_all_phases() {
        let engine = ExtractorEngine::new(CountingPipeline {
            fail_transform: false,
            loads: Cell::new(0),
        });
        let outcome = engine.run().unwrap();
        assert_eq!(outcome.written, vec!["out.csv"]);
        assert_eq!(outcome.view.stage, ViewStage::AwaitingFields);
        assert_eq!(engine.pipeline().loads.get(), 1);
    }

    #[test]
    fn test_run_stops_on_transform_error() {
        let engine = ExtractorEngine::new(CountingPipeline {
            fail_transform: true,
            loads: Cell::new(0),
        });
        assert!(engine.run().is_err());
        assert_eq!(engine.pipeline().loads.get(), 0);
    }

    #[test]
    fn test_transform_summary_describes_each_stage() {
        let extracted = Session::new(
            load(br#"{"data":[{"k":1},{"k":1},{"k":2}]}"#, "in.json").unwrap(),
            Selections {
                fields: vec!["k".to_string()],
                select_all: false,
                duplicate_keys: vec!["k".to_string()],
            },
        )
        .run_pass()
        .unwrap();
        assert_eq!(
            transform_summary(&extracted),
            "3 rows x 1 columns, 2 duplicate rows in 1 groups"
        );

        let awaiting = Session::new(
            load(br#"[{"a":1,"b":2}]"#, "in.json").unwrap(),
            Selections::default(),
        )
        .run_pass()
        .unwrap();
        assert_eq!(transform_summary(&awaiting), "2 fields, none selected");
    }

    #[test]
    fn test_monitored_run_completes() {
        let engine = ExtractorEngine::new_with_monitoring(
            CountingPipeline {
                fail_transform: false,
                loads: Cell::new(0),
            },
            true,
        );
        assert_eq!(engine.run().unwrap().written.len(), 1);
    }
}
