pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

#[cfg(feature = "cli")]
pub use config::cli::CliConfig;
pub use config::storage::LocalStorage;
pub use config::toml_config::TomlConfig;

pub use core::{etl::ExtractorEngine, pipeline::ExtractPipeline};
pub use utils::error::{ExtractorError, Result};
