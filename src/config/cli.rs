use crate::config::validate_provider;
use crate::core::ConfigProvider;
use crate::utils::error::Result;
use crate::utils::validation::Validate;
use clap::Parser;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize, Parser)]
#[command(name = "json-extractor")]
#[command(about = "Extract fields from a JSON record array, find duplicates and export to Excel/CSV")]
pub struct CliConfig {
    /// JSON document with a `data` array (or a root array) of records
    #[arg(short, long)]
    pub input: Option<String>,

    /// Fields to extract, in column order
    #[arg(short, long, value_delimiter = ',')]
    pub fields: Vec<String>,

    /// Extract every field found in the records
    #[arg(long)]
    pub all_fields: bool,

    /// Columns whose combined values identify a duplicate
    #[arg(short, long, value_delimiter = ',')]
    pub duplicate_keys: Vec<String>,

    #[arg(short, long, default_value = "./output")]
    pub output_path: String,

    #[arg(long, value_delimiter = ',', default_value = "xlsx,csv")]
    pub formats: Vec<String>,

    #[arg(long, value_delimiter = ',', default_value = "full,duplicates")]
    pub contexts: Vec<String>,

    #[arg(long, default_value = "20")]
    pub preview_rows: usize,

    #[arg(long, help = "Print the parsed JSON before extracting")]
    pub show_raw_json: bool,

    #[arg(long, help = "Only print the report, write no files")]
    pub no_export: bool,

    #[arg(short, long, help = "Enable verbose output")]
    pub verbose: bool,

    #[arg(long, help = "Log CPU and memory usage per phase")]
    pub monitor: bool,

    #[arg(long, help = "Emit logs as JSON")]
    pub log_json: bool,
}

impl ConfigProvider for CliConfig {
    fn input_path(&self) -> Option<&str> {
        self.input.as_deref()
    }

    fn output_path(&self) -> &str {
        &self.output_path
    }

    fn selected_fields(&self) -> &[String] {
        &self.fields
    }

    fn select_all_fields(&self) -> bool {
        self.all_fields
    }

    fn duplicate_keys(&self) -> &[String] {
        &self.duplicate_keys
    }

    fn export_formats(&self) -> &[String] {
        &self.formats
    }

    fn export_contexts(&self) -> &[String] {
        &self.contexts
    }

    fn export_enabled(&self) -> bool {
        !self.no_export
    }

    fn preview_rows(&self) -> usize {
        self.preview_rows
    }

    fn show_raw_json(&self) -> bool {
        self.show_raw_json
    }
}

impl Validate for CliConfig {
    fn validate(&self) -> Result<()> {
        validate_provider(self)
    }
}
