use crate::core::session::{Selections, Session};
use crate::core::{
    build_artifacts, locate_records, parse_document, ConfigProvider, ExportContext, ExportFormat,
    LoadedDocument, Pipeline, SessionView, Storage,
};
use crate::utils::error::{ExtractorError, Result};

pub struct ExtractPipeline<S: Storage, C: ConfigProvider> {
    storage: S,
    config: C,
}

impl<S: Storage, C: ConfigProvider> ExtractPipeline<S, C> {
    pub fn new(storage: S, config: C) -> Self {
        Self { storage, config }
    }

    pub fn config(&self) -> &C {
        &self.config
    }

    fn selections(&self) -> Selections {
        Selections {
            fields: self.config.selected_fields().to_vec(),
            select_all: self.config.select_all_fields(),
            duplicate_keys: self.config.duplicate_keys().to_vec(),
        }
    }
}

impl<S: Storage, C: ConfigProvider> Pipeline for ExtractPipeline<S, C> {
    fn extract(&self) -> Result<LoadedDocument> {
        let input = self
            .config
            .input_path()
            .ok_or_else(|| ExtractorError::MissingConfigError {
                field: "input".to_string(),
            })?;

        tracing::debug!("Reading input document: {}", input);
        let bytes = self.storage.read_file(input)?;
        tracing::debug!("Read {} bytes", bytes.len());

        let document = parse_document(&bytes, input)?;
        let raw_json = if self.config.show_raw_json() {
            Some(serde_json::to_string_pretty(&document)?)
        } else {
            None
        };

        Ok(LoadedDocument {
            raw_json,
            ..locate_records(document, input)
        })
    }

    fn transform(&self, document: LoadedDocument) -> Result<SessionView> {
        Session::new(document, self.selections()).run_pass()
    }

    fn load(&self, view: &SessionView) -> Result<Vec<String>> {
        if !self.config.export_enabled() {
            tracing::info!("Export disabled, nothing written");
            return Ok(Vec::new());
        }

        let Some(extraction) = view.extraction() else {
            tracing::info!("No table extracted, nothing to export");
            return Ok(Vec::new());
        };

        let formats = self
            .config
            .export_formats()
            .iter()
            .map(|f| f.parse::<ExportFormat>())
            .collect::<Result<Vec<_>>>()?;
        let contexts = self
            .config
            .export_contexts()
            .iter()
            .map(|c| c.parse::<ExportContext>())
            .collect::<Result<Vec<_>>>()?;

        let artifacts = build_artifacts(extraction, &contexts, &formats, &chrono::Local::now())?;

        let mut written = Vec::with_capacity(artifacts.len());
        for artifact in artifacts {
            self.storage.write_file(&artifact.filename, &artifact.bytes)?;
            let path = format!("{}/{}", self.config.output_path(), artifact.filename);
            tracing::debug!("Wrote {} ({} bytes)", path, artifact.bytes.len());
            written.push(path);
        }

        Ok(written)
    }
}
