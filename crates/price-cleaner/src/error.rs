//! Custom error types for the cleaning pipeline.
//!
//! This module provides the error hierarchy using `thiserror`. Every failure
//! is terminal for the current run and carries enough context (file path or
//! column name) to diagnose it.
//!
//! Errors are serializable so a summary of a failed run can be emitted as
//! JSON alongside successful ones.

use serde::Serialize;
use serde::ser::SerializeStruct;
use std::path::PathBuf;
use thiserror::Error;

/// Problems with the content of the data itself, as opposed to its
/// accessibility or its layout on disk.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DataQualityIssue {
    /// A required column is absent from the header.
    #[error("Required column '{column}' not found in dataset")]
    MissingColumn { column: String },

    /// Every value of the column is missing, so no fill value exists.
    #[error("Column '{column}' has no non-missing values to compute a fill value from")]
    AllValuesMissing { column: String },

    /// The outlier target column was not parsed as numeric.
    #[error("Target column '{column}' must be numeric, found {dtype}")]
    NonNumericTarget { column: String, dtype: String },
}

/// The main error type for the cleaning pipeline.
#[derive(Error, Debug)]
pub enum CleaningError {
    /// Input could not be read, or output could not be written.
    #[error("Cannot access '{}': {source}", path.display())]
    DataAccess {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Input exists but is not a well-formed delimited table.
    #[error("Malformed input '{}': {reason}", path.display())]
    Format { path: PathBuf, reason: String },

    /// Data content prevents cleaning.
    #[error(transparent)]
    DataQuality(#[from] DataQualityIssue),

    /// Invalid configuration provided.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// Polars error wrapper.
    #[error("Polars error: {0}")]
    Polars(#[from] polars::error::PolarsError),

    /// JSON serialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Generic error with context.
    #[error("{context}: {source}")]
    WithContext {
        context: String,
        #[source]
        source: Box<CleaningError>,
    },
}

impl CleaningError {
    /// Build a [`CleaningError::DataAccess`] for `path`.
    pub fn data_access(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::DataAccess {
            path: path.into(),
            source,
        }
    }

    /// Build a [`CleaningError::Format`] for `path`.
    pub fn format(path: impl Into<PathBuf>, reason: impl Into<String>) -> Self {
        Self::Format {
            path: path.into(),
            reason: reason.into(),
        }
    }

    /// Add context to an error.
    pub fn with_context(self, context: impl Into<String>) -> Self {
        CleaningError::WithContext {
            context: context.into(),
            source: Box::new(self),
        }
    }

    /// Get a stable error code.
    ///
    /// Codes are used by the CLI's JSON output so callers can branch on the
    /// failure kind without parsing messages.
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::DataAccess { .. } => "DATA_ACCESS_ERROR",
            Self::Format { .. } => "FORMAT_ERROR",
            Self::DataQuality(issue) => match issue {
                DataQualityIssue::MissingColumn { .. } => "MISSING_COLUMN",
                DataQualityIssue::AllValuesMissing { .. } => "ALL_VALUES_MISSING",
                DataQualityIssue::NonNumericTarget { .. } => "NON_NUMERIC_TARGET",
            },
            Self::InvalidConfig(_) => "INVALID_CONFIG",
            Self::Polars(_) => "POLARS_ERROR",
            Self::Json(_) => "JSON_ERROR",
            Self::WithContext { source, .. } => source.error_code(),
        }
    }

    /// Check if this error is a data quality problem, looking through context.
    pub fn is_data_quality(&self) -> bool {
        match self {
            Self::DataQuality(_) => true,
            Self::WithContext { source, .. } => source.is_data_quality(),
            _ => false,
        }
    }

    /// The data quality issue behind this error, if any.
    pub fn data_quality_issue(&self) -> Option<&DataQualityIssue> {
        match self {
            Self::DataQuality(issue) => Some(issue),
            Self::WithContext { source, .. } => source.data_quality_issue(),
            _ => None,
        }
    }
}

/// Errors are serialized as a struct with `code` and `message` fields.
impl Serialize for CleaningError {
    fn serialize<S>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        let mut state = serializer.serialize_struct("CleaningError", 2)?;
        state.serialize_field("code", &self.error_code())?;
        state.serialize_field("message", &self.to_string())?;
        state.end()
    }
}

/// Result type alias for cleaning operations.
pub type Result<T> = std::result::Result<T, CleaningError>;

/// Extension trait for adding context to Results.
pub trait ResultExt<T> {
    /// Add context to an error result.
    fn context(self, context: impl Into<String>) -> Result<T>;
}

impl<T> ResultExt<T> for Result<T> {
    fn context(self, context: impl Into<String>) -> Result<T> {
        self.map_err(|e| e.with_context(context))
    }
}

impl<T> ResultExt<T> for std::result::Result<T, polars::error::PolarsError> {
    fn context(self, context: impl Into<String>) -> Result<T> {
        self.map_err(|e| CleaningError::Polars(e).with_context(context))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_code() {
        let err = CleaningError::format("data.csv", "line 3 has 2 fields, expected 3");
        assert_eq!(err.error_code(), "FORMAT_ERROR");

        let err: CleaningError = DataQualityIssue::MissingColumn {
            column: "price".to_string(),
        }
        .into();
        assert_eq!(err.error_code(), "MISSING_COLUMN");
    }

    #[test]
    fn test_data_access_message_names_path() {
        let io = std::io::Error::new(std::io::ErrorKind::NotFound, "no such file");
        let err = CleaningError::data_access("datos/crudo/house_data.csv", io);
        assert!(err.to_string().contains("datos/crudo/house_data.csv"));
        assert_eq!(err.error_code(), "DATA_ACCESS_ERROR");
    }

    #[test]
    fn test_data_quality_message_names_column() {
        let err: CleaningError = DataQualityIssue::AllValuesMissing {
            column: "garage".to_string(),
        }
        .into();
        assert!(err.to_string().contains("garage"));
        assert!(err.is_data_quality());
    }

    #[test]
    fn test_error_serialization() {
        let error: CleaningError = DataQualityIssue::MissingColumn {
            column: "price".to_string(),
        }
        .into();
        let json = serde_json::to_string(&error).unwrap();
        assert!(json.contains("MISSING_COLUMN"));
        assert!(json.contains("price"));
    }

    #[test]
    fn test_with_context() {
        let error: CleaningError = DataQualityIssue::NonNumericTarget {
            column: "price".to_string(),
            dtype: "str".to_string(),
        }
        .into();
        let error = error.with_context("During outlier filtering");
        assert!(error.to_string().contains("During outlier filtering"));
        assert_eq!(error.error_code(), "NON_NUMERIC_TARGET"); // Preserves original code
        assert!(error.is_data_quality());
        assert!(matches!(
            error.data_quality_issue(),
            Some(DataQualityIssue::NonNumericTarget { .. })
        ));
    }
}
