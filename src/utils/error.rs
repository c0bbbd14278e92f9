use crate::utils::validation::FieldError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum AppError {
    #[error("HTTP client error: {0}")]
    HttpError(#[from] reqwest::Error),

    #[error("CSV processing error: {0}")]
    CsvError(#[from] csv::Error),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("Configuration error: {message}")]
    ConfigError { message: String },

    #[error("Invalid value for {field} ({value}): {reason}")]
    InvalidConfigValueError {
        field: String,
        value: String,
        reason: String,
    },

    #[error("Validation failed: {}", format_fields(.fields))]
    ValidationError { fields: Vec<FieldError> },

    #[error("{message}")]
    BackendError { message: String },

    #[error("A submission is already in progress")]
    SubmissionInFlight,
}

pub type Result<T> = std::result::Result<T, AppError>;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Network,
    Configuration,
    Validation,
    Backend,
    Data,
    System,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ErrorSeverity {
    Low,
    Medium,
    High,
    Critical,
}

fn format_fields(fields: &[FieldError]) -> String {
    fields
        .iter()
        .map(|f| format!("{}: {}", f.field, f.message))
        .collect::<Vec<_>>()
        .join("; ")
}

impl AppError {
    pub fn config(message: impl Into<String>) -> Self {
        AppError::ConfigError {
            message: message.into(),
        }
    }

    pub fn backend(message: impl Into<String>) -> Self {
        AppError::BackendError {
            message: message.into(),
        }
    }

    pub fn category(&self) -> ErrorCategory {
        match self {
            AppError::HttpError(_) => ErrorCategory::Network,
            AppError::CsvError(_) | AppError::SerializationError(_) => ErrorCategory::Data,
            AppError::IoError(_) => ErrorCategory::System,
            AppError::ConfigError { .. }
            | AppError::InvalidConfigValueError { .. } => ErrorCategory::Configuration,
            AppError::ValidationError { .. } | AppError::SubmissionInFlight => {
                ErrorCategory::Validation
            }
            AppError::BackendError { .. } => ErrorCategory::Backend,
        }
    }

    pub fn severity(&self) -> ErrorSeverity {
        match self.category() {
            ErrorCategory::Validation => ErrorSeverity::Medium,
            ErrorCategory::Network | ErrorCategory::Backend => ErrorSeverity::High,
            ErrorCategory::Data => ErrorSeverity::High,
            ErrorCategory::Configuration | ErrorCategory::System => ErrorSeverity::Critical,
        }
    }

    pub fn user_friendly_message(&self) -> String {
        match self {
            AppError::ValidationError { fields } => {
                let mut lines = vec!["Some fields are not valid:".to_string()];
                lines.extend(fields.iter().map(|f| format!("  - {}: {}", f.field, f.message)));
                lines.join("\n")
            }
            AppError::BackendError { message } => format!("Server error: {}", message),
            AppError::SubmissionInFlight => {
                "The previous submission has not finished yet".to_string()
            }
            AppError::InvalidConfigValueError { field, reason, .. } => {
                format!("Setting '{}' is invalid: {}", field, reason)
            }
            other => other.to_string(),
        }
    }

    pub fn recovery_suggestion(&self) -> &'static str {
        match self.category() {
            ErrorCategory::Network => "Check that the backend is running and reachable",
            ErrorCategory::Configuration => {
                "Check --api-url, CLUB_ADMIN_API_URL or the [api] section of the config file"
            }
            ErrorCategory::Validation => "Correct the listed fields and submit again",
            ErrorCategory::Backend => "Review the server message; the request was not applied",
            ErrorCategory::Data => "The server returned data in an unexpected shape",
            ErrorCategory::System => "Check file permissions and free disk space",
        }
    }
}
