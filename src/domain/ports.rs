use crate::domain::model::{LoadedDocument, SessionView};
use crate::utils::error::Result;

pub trait Storage {
    fn read_file(&self, path: &str) -> Result<Vec<u8>>;
    fn write_file(&self, path: &str, data: &[u8]) -> Result<()>;
}

pub trait ConfigProvider {
    fn input_path(&self) -> Option<&str>;
    fn output_path(&self) -> &str;
    fn selected_fields(&self) -> &[String];
    fn select_all_fields(&self) -> bool;
    fn duplicate_keys(&self) -> &[String];
    fn export_formats(&self) -> &[String];
    fn export_contexts(&self) -> &[String];
    fn export_enabled(&self) -> bool;
    fn preview_rows(&self) -> usize;
    fn show_raw_json(&self) -> bool;
}

pub trait Pipeline {
    fn extract(&self) -> Result<LoadedDocument>;
    fn transform(&self, document: LoadedDocument) -> Result<SessionView>;
    fn load(&self, view: &SessionView) -> Result<Vec<String>>;
}
