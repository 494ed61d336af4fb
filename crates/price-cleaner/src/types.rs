//! Core data types: the in-memory [`Table`], its per-column schema, and the
//! records the cleaning stages produce about what they did.

use crate::error::{DataQualityIssue, Result};
use crate::utils::is_numeric_dtype;
use polars::prelude::*;
use serde::{Deserialize, Serialize};
use std::fmt;

// ============================================================================
// Schema
// ============================================================================

/// How a column is treated during imputation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ColumnKind {
    /// Integer or floating point values; missing entries get the median.
    Numeric,
    /// Anything else; missing entries get the mode.
    Categorical,
}

impl ColumnKind {
    /// Classify a parsed column by its dtype.
    pub fn from_dtype(dtype: &DataType) -> Self {
        if is_numeric_dtype(dtype) {
            Self::Numeric
        } else {
            Self::Categorical
        }
    }
}

impl fmt::Display for ColumnKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Numeric => f.pad("numeric"),
            Self::Categorical => f.pad("categorical"),
        }
    }
}

/// Name and kind of one column.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColumnSchema {
    pub name: String,
    pub kind: ColumnKind,
}

// ============================================================================
// Table
// ============================================================================

/// An ordered set of rows over a fixed, named and typed set of columns.
///
/// The column kinds are computed once when the table is built from a freshly
/// parsed frame and then carried along by every stage, so a numeric column
/// stays numeric even after its integer values are widened to floats by
/// imputation.
#[derive(Debug, Clone)]
pub struct Table {
    df: DataFrame,
    schema: Vec<ColumnSchema>,
}

static_assertions::assert_impl_all!(Table: Send, Sync);

impl Table {
    /// Build a table, classifying every column from its dtype.
    pub fn from_dataframe(df: DataFrame) -> Self {
        let schema = df
            .get_columns()
            .iter()
            .map(|col| ColumnSchema {
                name: col.name().to_string(),
                kind: ColumnKind::from_dtype(col.dtype()),
            })
            .collect();
        Self { df, schema }
    }

    /// Build a table that keeps a previously computed schema.
    pub(crate) fn with_schema(df: DataFrame, schema: Vec<ColumnSchema>) -> Self {
        debug_assert_eq!(df.width(), schema.len());
        Self { df, schema }
    }

    pub fn dataframe(&self) -> &DataFrame {
        &self.df
    }

    pub fn into_dataframe(self) -> DataFrame {
        self.df
    }

    pub fn schema(&self) -> &[ColumnSchema] {
        &self.schema
    }

    /// Kind of the named column, if it exists.
    pub fn column_kind(&self, name: &str) -> Option<ColumnKind> {
        self.schema
            .iter()
            .find(|col| col.name == name)
            .map(|col| col.kind)
    }

    pub fn has_column(&self, name: &str) -> bool {
        self.column_kind(name).is_some()
    }

    /// Fail with [`DataQualityIssue::MissingColumn`] unless the column exists.
    pub fn require_column(&self, name: &str) -> Result<()> {
        if self.has_column(name) {
            Ok(())
        } else {
            Err(DataQualityIssue::MissingColumn {
                column: name.to_string(),
            }
            .into())
        }
    }

    pub fn column_names(&self) -> Vec<String> {
        self.schema.iter().map(|col| col.name.clone()).collect()
    }

    /// Number of data rows.
    pub fn height(&self) -> usize {
        self.df.height()
    }

    /// Number of columns.
    pub fn width(&self) -> usize {
        self.df.width()
    }

    /// `(rows, columns)`.
    pub fn shape(&self) -> (usize, usize) {
        self.df.shape()
    }

    /// Missing value count per column, in header order.
    pub fn missing_counts(&self) -> Vec<(String, usize)> {
        self.df
            .get_columns()
            .iter()
            .map(|col| (col.name().to_string(), col.null_count()))
            .collect()
    }

    /// Missing values across all columns.
    pub fn total_missing(&self) -> usize {
        self.df.get_columns().iter().map(|col| col.null_count()).sum()
    }
}

// ============================================================================
// Stage records
// ============================================================================

/// The value used to fill a column's missing entries.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "method", content = "value", rename_all = "snake_case")]
pub enum FillValue {
    Median(f64),
    Mode(String),
}

impl FillValue {
    /// Name of the statistic, as used in log lines.
    pub fn method(&self) -> &'static str {
        match self {
            Self::Median(_) => "median",
            Self::Mode(_) => "mode",
        }
    }
}

impl fmt::Display for FillValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Median(v) => write!(f, "{}", v),
            Self::Mode(s) => write!(f, "{}", s),
        }
    }
}

/// One column's imputation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Imputation {
    pub column: String,
    pub kind: ColumnKind,
    pub missing_count: usize,
    pub fill_value: FillValue,
}

/// Tukey fences computed from the target column.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct OutlierBounds {
    pub q1: f64,
    pub q3: f64,
    pub iqr: f64,
    pub lower: f64,
    pub upper: f64,
}

impl OutlierBounds {
    /// Fences `[q1 - k*iqr, q3 + k*iqr]`.
    pub fn from_quartiles(q1: f64, q3: f64, multiplier: f64) -> Self {
        let iqr = q3 - q1;
        Self {
            q1,
            q3,
            iqr,
            lower: q1 - multiplier * iqr,
            upper: q3 + multiplier * iqr,
        }
    }

    /// Inclusive on both ends.
    #[inline]
    pub fn contains(&self, value: f64) -> bool {
        value >= self.lower && value <= self.upper
    }
}

/// What the outlier filter found and removed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OutlierReport {
    pub column: String,
    /// `None` when the table had no rows to compute quartiles from.
    pub bounds: Option<OutlierBounds>,
    pub outliers_removed: usize,
}

// ============================================================================
// Run summary
// ============================================================================

/// Summary of one cleaning run.
///
/// Serialized by the CLI for `--json` and `--emit-report`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CleaningSummary {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub input_file: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub output_file: Option<String>,

    pub rows_before: usize,
    pub rows_after: usize,
    pub rows_removed: usize,
    pub columns_before: usize,
    pub columns_after: usize,

    pub missing_before: usize,
    pub missing_after: usize,

    pub schema: Vec<ColumnSchema>,
    pub imputations: Vec<Imputation>,
    pub outliers: OutlierReport,

    /// Total execution time in milliseconds.
    pub duration_ms: u64,
    pub generated_at: String,
}

/// Output of the in-memory cleaning stages.
#[derive(Debug, Clone)]
pub struct CleaningResult {
    pub table: Table,
    pub summary: CleaningSummary,
}
