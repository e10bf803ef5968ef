use thiserror::Error;

#[derive(Error, Debug)]
pub enum ExtractorError {
    #[error("Invalid JSON in {source_name}: {message}")]
    ParseError {
        source_name: String,
        message: String,
        text_file: bool,
    },

    #[error("Duplicate-check column '{column}' is not one of the selected columns")]
    UnknownKeyColumn { column: String },

    #[error("CSV processing error: {0}")]
    CsvError(#[from] csv::Error),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("Export error: {message}")]
    ExportError { message: String },

    #[error("Missing configuration: {field}")]
    MissingConfigError { field: String },

    #[error("Invalid value '{value}' for {field}: {reason}")]
    InvalidConfigValueError {
        field: String,
        value: String,
        reason: String,
    },

    #[error("Configuration error in {field}: {message}")]
    ConfigValidationError { field: String, message: String },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Input,
    Selection,
    Export,
    Configuration,
    System,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ErrorSeverity {
    Medium,
    High,
    Critical,
}

impl ExtractorError {
    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::ParseError { .. } | Self::SerializationError(_) => ErrorCategory::Input,
            Self::UnknownKeyColumn { .. } => ErrorCategory::Selection,
            Self::CsvError(_) | Self::ExportError { .. } => {
                ErrorCategory::Export
            }
            Self::MissingConfigError { .. }
            | Self::InvalidConfigValueError { .. }
            | Self::ConfigValidationError { .. } => ErrorCategory::Configuration,
            Self::IoError(_) => ErrorCategory::System,
        }
    }

    pub fn severity(&self) -> ErrorSeverity {
        match self.category() {
            ErrorCategory::Selection => ErrorSeverity::Medium,
            ErrorCategory::Input | ErrorCategory::Configuration | ErrorCategory::Export => {
                ErrorSeverity::High
            }
            ErrorCategory::System => ErrorSeverity::Critical,
        }
    }

    /// 依嚴重程度決定行程結束碼
    pub fn exit_code(&self) -> i32 {
        match self.severity() {
            ErrorSeverity::Medium => 2,
            ErrorSeverity::High => 1,
            ErrorSeverity::Critical => 3,
        }
    }

    /// 給終端使用者看的訊息
    pub fn user_friendly_message(&self) -> String {
        match self {
            Self::ParseError {
                text_file: true, ..
            } => "Invalid JSON in text file. Please make sure the file contains valid JSON."
                .to_string(),
            Self::ParseError { .. } => {
                "Invalid JSON file. Please upload a valid JSON file.".to_string()
            }
            Self::UnknownKeyColumn { column } => format!(
                "Column '{}' cannot be used for the duplicate check because it was not extracted",
                column
            ),
            Self::IoError(e) => format!("Could not access a file: {}", e),
            other => format!("An error occurred: {}", other),
        }
    }

    pub fn recovery_suggestion(&self) -> String {
        match self {
            Self::ParseError { .. } => {
                "Check the file for trailing commas, unquoted keys or truncated content".to_string()
            }
            Self::UnknownKeyColumn { .. } => {
                "Pick duplicate-check columns from the selected fields".to_string()
            }
            Self::CsvError(_) | Self::ExportError { .. } => {
                "Retry the export, or choose a different output format".to_string()
            }
            Self::IoError(_) => {
                "Make sure the input exists and the output directory is writable".to_string()
            }
            Self::SerializationError(_) => "Validate the input document".to_string(),
            Self::MissingConfigError { field }
            | Self::InvalidConfigValueError { field, .. }
            | Self::ConfigValidationError { field, .. } => {
                format!("Fix the '{}' setting and run again", field)
            }
        }
    }
}

pub type Result<T> = std::result::Result<T, ExtractorError>;
