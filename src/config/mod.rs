#[cfg(feature = "cli")]
pub mod cli;
pub mod storage;
pub mod toml_config;

use crate::core::{ConfigProvider, ExportContext, ExportFormat};
use crate::utils::error::Result;
use crate::utils::validation;

/// Checks shared by every [`ConfigProvider`].
pub fn validate_provider<C: ConfigProvider>(config: &C) -> Result<()> {
    if let Some(input) = config.input_path() {
        validation::validate_path("input", input)?;
    }
    validation::validate_path("output_path", config.output_path())?;
    validation::validate_non_empty_names("fields", config.selected_fields())?;
    validation::validate_non_empty_names("duplicate_keys", config.duplicate_keys())?;
    validation::validate_allowed_values("formats", config.export_formats(), &ExportFormat::ALL)?;
    validation::validate_allowed_values("contexts", config.export_contexts(), &ExportContext::ALL)?;
    validation::validate_positive_number("preview_rows", config.preview_rows(), 1)?;
    Ok(())
}
