use thiserror::Error;

#[derive(Error, Debug)]
pub enum FoldError {
    #[error("Zip operation failed: {0}")]
    ZipError(#[from] zip::result::ZipError),

    #[error("API request failed: {0}")]
    ApiError(#[from] reqwest::Error),

    #[error("CSV processing error: {0}")]
    CsvError(#[from] csv::Error),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("Pattern error: {0}")]
    RegexError(#[from] regex::Error),

    #[error("Configuration error in '{field}': {message}")]
    ConfigValidationError { field: String, message: String },

    #[error("Invalid value '{value}' for '{field}': {reason}")]
    InvalidConfigValueError {
        field: String,
        value: String,
        reason: String,
    },

    #[error("Missing required configuration: {field}")]
    MissingConfigError { field: String },

    #[error("Malformed FASTA in {path}: {message}")]
    FastaFormatError { path: String, message: String },

    #[error("Failed to fetch sequence {accession}: {message}")]
    SequenceFetchError { accession: String, message: String },

    #[error("Data processing error: {message}")]
    ProcessingError { message: String },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Configuration,
    Network,
    Storage,
    Data,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ErrorSeverity {
    Low,
    Medium,
    High,
    Critical,
}

impl FoldError {
    pub fn processing(message: impl Into<String>) -> Self {
        FoldError::ProcessingError {
            message: message.into(),
        }
    }

    pub fn category(&self) -> ErrorCategory {
        match self {
            FoldError::ConfigValidationError { .. }
            | FoldError::InvalidConfigValueError { .. }
            | FoldError::MissingConfigError { .. }
            | FoldError::RegexError(_) => ErrorCategory::Configuration,
            FoldError::ApiError(_) | FoldError::SequenceFetchError { .. } => {
                ErrorCategory::Network
            }
            FoldError::IoError(_) | FoldError::ZipError(_) => ErrorCategory::Storage,
            FoldError::CsvError(_)
            | FoldError::SerializationError(_)
            | FoldError::FastaFormatError { .. }
            | FoldError::ProcessingError { .. } => ErrorCategory::Data,
        }
    }

    /// 決定 CLI 的退出碼
    pub fn severity(&self) -> ErrorSeverity {
        match self.category() {
            ErrorCategory::Network => ErrorSeverity::Medium,
            ErrorCategory::Configuration | ErrorCategory::Data => ErrorSeverity::High,
            ErrorCategory::Storage => ErrorSeverity::Critical,
        }
    }

    pub fn user_friendly_message(&self) -> String {
        match self {
            FoldError::ApiError(_) | FoldError::SequenceFetchError { .. } => {
                format!("Could not download sequences: {}", self)
            }
            FoldError::IoError(e) => format!("File system error: {}", e),
            FoldError::FastaFormatError { path, .. } => {
                format!("The file {} is not a usable FASTA file", path)
            }
            _ => self.to_string(),
        }
    }

    pub fn recovery_suggestion(&self) -> &'static str {
        match self.category() {
            ErrorCategory::Configuration => {
                "Check the campaign TOML and command line flags, then run again"
            }
            ErrorCategory::Network => {
                "Check network access to UniProt and the accession IDs, then retry"
            }
            ErrorCategory::Storage => {
                "Check that the input directory exists and the output directory is writable"
            }
            ErrorCategory::Data => "Inspect the offending input file and fix its format",
        }
    }
}

pub type Result<T> = std::result::Result<T, FoldError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_categories_drive_severity() {
        let err = FoldError::SequenceFetchError {
            accession: "P35625".to_string(),
            message: "timeout".to_string(),
        };
        assert_eq!(err.category(), ErrorCategory::Network);
        assert_eq!(err.severity(), ErrorSeverity::Medium);

        let err = FoldError::MissingConfigError {
            field: "mutation.variants".to_string(),
        };
        assert_eq!(err.severity(), ErrorSeverity::High);

        let err = FoldError::IoError(std::io::Error::new(
            std::io::ErrorKind::PermissionDenied,
            "denied",
        ));
        assert_eq!(err.severity(), ErrorSeverity::Critical);
    }

    #[test]
    fn test_user_friendly_message_mentions_path() {
        let err = FoldError::FastaFormatError {
            path: "in/a.fasta".to_string(),
            message: "no header".to_string(),
        };
        assert!(err.user_friendly_message().contains("in/a.fasta"));
    }
}
