use crate::config::validate_provider;
use crate::core::ConfigProvider;
use crate::utils::error::{ExtractorError, Result};
use crate::utils::validation::Validate;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::path::Path;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct TomlConfig {
    pub input: InputConfig,
    pub selection: SelectionConfig,
    pub export: ExportConfig,
    pub display: DisplayConfig,
    pub monitoring: Option<MonitoringConfig>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct InputConfig {
    pub path: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct SelectionConfig {
    pub fields: Vec<String>,
    pub select_all: bool,
    pub duplicate_keys: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ExportConfig {
    pub enabled: bool,
    pub output_path: String,
    pub formats: Vec<String>,
    pub contexts: Vec<String>,
}

impl Default for ExportConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            output_path: "./output".to_string(),
            formats: vec!["xlsx".to_string(), "csv".to_string()],
            contexts: vec!["full".to_string(), "duplicates".to_string()],
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DisplayConfig {
    pub show_raw_json: bool,
    pub preview_rows: usize,
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self {
            show_raw_json: false,
            preview_rows: 20,
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MonitoringConfig {
    pub enabled: bool,
    pub log_json: Option<bool>,
}

impl TomlConfig {
    /// 從 TOML 檔案載入配置
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path).map_err(ExtractorError::IoError)?;
        Self::from_toml_str(&content)
    }

    /// 從 TOML 字串解析配置
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let processed_content = Self::substitute_env_vars(content)?;

        toml::from_str(&processed_content).map_err(|e| ExtractorError::ConfigValidationError {
            field: "toml_parsing".to_string(),
            message: format!("TOML parsing error: {}", e),
        })
    }

    /// 替換環境變數 (例如 ${INPUT_FILE})，未設定的變數保持原樣
    fn substitute_env_vars(content: &str) -> Result<String> {
        let re = Regex::new(r"\$\{([^}]+)\}").map_err(|e| ExtractorError::ConfigValidationError {
            field: "environment".to_string(),
            message: e.to_string(),
        })?;

        let result = re.replace_all(content, |caps: &regex::Captures| {
            let var_name = &caps[1];
            std::env::var(var_name).unwrap_or_else(|_| format!("${{{}}}", var_name))
        });

        Ok(result.to_string())
    }

    pub fn validate_config(&self) -> Result<()> {
        validate_provider(self)
    }

    pub fn monitoring_enabled(&self) -> bool {
        self.monitoring.as_ref().map(|m| m.enabled).unwrap_or(false)
    }

    pub fn log_json(&self) -> bool {
        self.monitoring
            .as_ref()
            .and_then(|m| m.log_json)
            .unwrap_or(false)
    }
}

impl ConfigProvider for TomlConfig {
    fn input_path(&self) -> Option<&str> {
        self.input.path.as_deref()
    }

    fn output_path(&self) -> &str {
        &self.export.output_path
    }

    fn selected_fields(&self) -> &[String] {
        &self.selection.fields
    }

    fn select_all_fields(&self) -> bool {
        self.selection.select_all
    }

    fn duplicate_keys(&self) -> &[String] {
        &self.selection.duplicate_keys
    }

    fn export_formats(&self) -> &[String] {
        &self.export.formats
    }

    fn export_contexts(&self) -> &[String] {
        &self.export.contexts
    }

    fn export_enabled(&self) -> bool {
        self.export.enabled
    }

    fn preview_rows(&self) -> usize {
        self.display.preview_rows
    }

    fn show_raw_json(&self) -> bool {
        self.display.show_raw_json
    }
}

impl Validate for TomlConfig {
    fn validate(&self) -> Result<()> {
        self.validate_config()
    }
}
