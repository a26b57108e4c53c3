use thiserror::Error;

#[derive(Error, Debug)]
pub enum EtlError {
    #[error("API request failed: {0}")]
    ApiError(#[from] reqwest::Error),

    #[error("Failed to parse response from {url}: {message}")]
    ParseError { url: String, message: String },

    #[error("Invalid value for {field} in {entity}: {value}")]
    InvalidValueError {
        entity: String,
        field: String,
        value: String,
    },

    #[error("{entity} has no {field} reference")]
    EmptyReferenceError { entity: String, field: String },

    #[error("Expected {expected} characters in list, found: {found}")]
    CardinalityError { expected: usize, found: usize },

    #[error("Element {index} is not a character record: {message}")]
    ShapeError { index: usize, message: String },

    #[error("Artifact not found: {path}")]
    MissingArtifactError { path: String },

    #[error("CSV processing error: {0}")]
    CsvError(#[from] csv::Error),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("Configuration error: {message}")]
    ConfigError { message: String },

    #[error("Configuration field '{field}' is invalid: {message}")]
    ConfigValidationError { field: String, message: String },

    #[error("Invalid value '{value}' for '{field}': {reason}")]
    InvalidConfigValueError {
        field: String,
        value: String,
        reason: String,
    },

    #[error("Data processing error: {message}")]
    ProcessingError { message: String },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Network,
    Data,
    Validation,
    Storage,
    Configuration,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ErrorSeverity {
    Medium,
    High,
    Critical,
}

impl ErrorSeverity {
    /// 根據錯誤嚴重程度決定退出碼，失敗一律非零
    pub fn exit_code(self) -> i32 {
        match self {
            ErrorSeverity::Medium => 2,
            ErrorSeverity::High => 1,
            ErrorSeverity::Critical => 3,
        }
    }
}

impl EtlError {
    pub fn category(&self) -> ErrorCategory {
        match self {
            EtlError::ApiError(_) => ErrorCategory::Network,
            EtlError::ParseError { .. }
            | EtlError::InvalidValueError { .. }
            | EtlError::EmptyReferenceError { .. }
            | EtlError::SerializationError(_)
            | EtlError::ProcessingError { .. } => ErrorCategory::Data,
            EtlError::CardinalityError { .. } | EtlError::ShapeError { .. } => {
                ErrorCategory::Validation
            }
            EtlError::MissingArtifactError { .. }
            | EtlError::CsvError(_)
            | EtlError::IoError(_) => ErrorCategory::Storage,
            EtlError::ConfigError { .. }
            | EtlError::ConfigValidationError { .. }
            | EtlError::InvalidConfigValueError { .. } => ErrorCategory::Configuration,
        }
    }

    /// 嚴重程度決定 CLI 的退出碼
    pub fn severity(&self) -> ErrorSeverity {
        match self.category() {
            ErrorCategory::Network => ErrorSeverity::Medium,
            ErrorCategory::Data | ErrorCategory::Validation => ErrorSeverity::High,
            ErrorCategory::Storage | ErrorCategory::Configuration => ErrorSeverity::Critical,
        }
    }

    pub fn is_timeout(&self) -> bool {
        matches!(self, EtlError::ApiError(e) if e.is_timeout())
    }

    pub fn user_friendly_message(&self) -> String {
        match self {
            EtlError::ApiError(e) if e.is_timeout() => {
                "The remote API did not answer in time".to_string()
            }
            EtlError::ApiError(e) => match e.status() {
                Some(status) => format!("The remote API answered with status {}", status),
                None => "Could not reach the remote API".to_string(),
            },
            EtlError::ParseError { url, .. } => {
                format!("Unexpected response format from {}", url)
            }
            EtlError::EmptyReferenceError { entity, field } => {
                format!("'{}' does not list any {}", entity, field)
            }
            EtlError::CardinalityError { expected, found } => format!(
                "Expected exactly {} characters to write, got {}",
                expected, found
            ),
            EtlError::ShapeError { index, .. } => {
                format!("Item {} is not a valid character record", index)
            }
            EtlError::MissingArtifactError { path } => {
                format!("Nothing to upload: {} does not exist", path)
            }
            other => other.to_string(),
        }
    }

    pub fn recovery_suggestion(&self) -> &'static str {
        match self {
            EtlError::ApiError(e) if e.is_timeout() => {
                "Increase --timeout-seconds or try again later"
            }
            EtlError::ApiError(_) => "Check network connectivity and the endpoint URLs",
            EtlError::ParseError { .. } => "Verify the endpoint serves the Star Wars API format",
            EtlError::InvalidValueError { .. } => {
                "The character data is incomplete upstream; try a different --top-n"
            }
            EtlError::EmptyReferenceError { .. } => {
                "Set --species-fallback to name characters without a species entry"
            }
            EtlError::CardinalityError { .. } => "Make --top-n match the number of records",
            EtlError::ShapeError { .. } => {
                "Each record needs name, species, height and appearances fields"
            }
            EtlError::MissingArtifactError { .. } => "Run the writer stage before publishing",
            EtlError::CsvError(_) | EtlError::IoError(_) => {
                "Check that the output directory exists and is writable"
            }
            EtlError::SerializationError(_) => "Check the JSON records file",
            EtlError::ConfigError { .. }
            | EtlError::ConfigValidationError { .. }
            | EtlError::InvalidConfigValueError { .. } => "Review the configuration values",
            EtlError::ProcessingError { .. } => "Re-run the pipeline with --verbose",
        }
    }
}

pub type Result<T> = std::result::Result<T, EtlError>;
