//! Configuration types for the cleaning pipeline.
//!
//! Imputation strategy is fixed (median for numeric, mode for categorical);
//! what can be configured is the outlier target, the IQR fence multiplier,
//! and the field separator of the input and output files.

use serde::{Deserialize, Serialize};

/// Default outlier target column.
pub const DEFAULT_TARGET_COLUMN: &str = "price";

/// Default Tukey fence multiplier.
pub const DEFAULT_IQR_MULTIPLIER: f64 = 1.5;

/// Default field separator.
pub const DEFAULT_SEPARATOR: u8 = b',';

/// Configuration for the cleaning pipeline.
///
/// Use [`CleanerConfig::builder()`] to create a new configuration
/// with fluent API.
///
/// # Example
///
/// ```rust,ignore
/// use price_cleaner::config::CleanerConfig;
///
/// let config = CleanerConfig::builder()
///     .target_column("sale_price")
///     .iqr_multiplier(3.0)
///     .build()?;
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CleanerConfig {
    /// Numeric column used for outlier detection.
    /// Default: "price"
    pub target_column: String,

    /// Multiplier `k` in `[Q1 - k*IQR, Q3 + k*IQR]`.
    /// Default: 1.5
    pub iqr_multiplier: f64,

    /// Field separator used for both reading and writing.
    /// Default: b','
    pub separator: u8,
}

impl Default for CleanerConfig {
    fn default() -> Self {
        Self {
            target_column: DEFAULT_TARGET_COLUMN.to_string(),
            iqr_multiplier: DEFAULT_IQR_MULTIPLIER,
            separator: DEFAULT_SEPARATOR,
        }
    }
}

impl CleanerConfig {
    /// Create a new configuration builder.
    pub fn builder() -> CleanerConfigBuilder {
        CleanerConfigBuilder::default()
    }

    /// Validate the configuration and return errors if invalid.
    pub fn validate(&self) -> Result<(), ConfigValidationError> {
        if self.target_column.trim().is_empty() {
            return Err(ConfigValidationError::EmptyTargetColumn);
        }

        if !self.iqr_multiplier.is_finite() || self.iqr_multiplier < 0.0 {
            return Err(ConfigValidationError::InvalidIqrMultiplier(
                self.iqr_multiplier,
            ));
        }

        if !self.separator.is_ascii() || matches!(self.separator, b'"' | b'\n' | b'\r') {
            return Err(ConfigValidationError::InvalidSeparator(
                self.separator as char,
            ));
        }

        Ok(())
    }
}

/// Errors that can occur during configuration validation.
#[derive(Debug, thiserror::Error)]
pub enum ConfigValidationError {
    #[error("Target column name must not be empty")]
    EmptyTargetColumn,

    #[error("Invalid IQR multiplier: {0} (must be finite and non-negative)")]
    InvalidIqrMultiplier(f64),

    #[error("Invalid separator: {0:?} (must be ASCII and not a quote or newline)")]
    InvalidSeparator(char),
}

impl From<ConfigValidationError> for crate::error::CleaningError {
    fn from(err: ConfigValidationError) -> Self {
        crate::error::CleaningError::InvalidConfig(err.to_string())
    }
}

/// Builder for [`CleanerConfig`] with fluent API.
#[derive(Debug, Default)]
pub struct CleanerConfigBuilder {
    target_column: Option<String>,
    iqr_multiplier: Option<f64>,
    separator: Option<u8>,
}

impl CleanerConfigBuilder {
    /// Set the column used for outlier detection.
    pub fn target_column(mut self, column: impl Into<String>) -> Self {
        self.target_column = Some(column.into());
        self
    }

    /// Set the IQR fence multiplier.
    ///
    /// # Arguments
    /// * `k` - Non-negative multiplier (1.5 = Tukey's inner fences, 3.0 = outer fences)
    pub fn iqr_multiplier(mut self, k: f64) -> Self {
        self.iqr_multiplier = Some(k);
        self
    }

    /// Set the field separator.
    pub fn separator(mut self, separator: u8) -> Self {
        self.separator = Some(separator);
        self
    }

    /// Build the configuration.
    ///
    /// Returns a validated `CleanerConfig` or an error if validation fails.
    pub fn build(self) -> Result<CleanerConfig, ConfigValidationError> {
        let config = CleanerConfig {
            target_column: self
                .target_column
                .unwrap_or_else(|| DEFAULT_TARGET_COLUMN.to_string()),
            iqr_multiplier: self.iqr_multiplier.unwrap_or(DEFAULT_IQR_MULTIPLIER),
            separator: self.separator.unwrap_or(DEFAULT_SEPARATOR),
        };

        config.validate()?;
        Ok(config)
    }
}
