//! Tabular Data Cleaning Library
//!
//! A small batch cleaner for delimited files, built on Polars.
//!
//! # Overview
//!
//! One run is a fixed, single-threaded sequence:
//!
//! - **Load**: parse a delimited file with a header row into a [`Table`],
//!   classifying every column as numeric or categorical
//! - **Impute**: fill missing numeric values with the column median and
//!   missing categorical values with the column mode
//! - **Filter outliers**: drop rows whose target column (default `price`)
//!   falls outside `[Q1 - 1.5*IQR, Q3 + 1.5*IQR]`
//! - **Write**: persist the cleaned table in the same delimited format
//!
//! # Quick Start
//!
//! ```rust,ignore
//! use price_cleaner::process_data;
//!
//! let cleaned = process_data(
//!     "datos/crudo/house_data.csv",
//!     "datos/procesado/cleaned_house_data.csv",
//! )?;
//! println!("Cleaned shape: {:?}", cleaned.shape());
//! ```
//!
//! # Configuration
//!
//! Use [`CleanerConfig`] to change the target column, the IQR multiplier or
//! the field separator:
//!
//! ```rust,ignore
//! use price_cleaner::{CleanerConfig, CleaningPipeline};
//!
//! let config = CleanerConfig::builder()
//!     .target_column("sale_price")
//!     .iqr_multiplier(3.0)
//!     .separator(b';')
//!     .build()?;
//!
//! let result = CleaningPipeline::builder()
//!     .config(config)
//!     .build()?
//!     .run("in.csv", "out/cleaned.csv")?;
//! ```
//!
//! # Logging
//!
//! The library emits `tracing` events and never installs a subscriber; the
//! binary does that once at startup.

pub mod config;
pub mod error;
pub mod imputers;
pub mod io;
pub mod pipeline;
pub mod reporting;
pub mod types;
pub mod utils;

use std::path::Path;

// Re-exports for convenient access
pub use config::{CleanerConfig, CleanerConfigBuilder, ConfigValidationError};
pub use error::{CleaningError, DataQualityIssue, ResultExt};
pub use imputers::StatisticalImputer;
pub use io::{TableLoader, TableWriter};
pub use pipeline::{CleaningPipeline, CleaningPipelineBuilder, OutlierFilter};
pub use reporting::ReportGenerator;
pub use types::{
    CleaningResult, CleaningSummary, ColumnKind, ColumnSchema, FillValue, Imputation,
    OutlierBounds, OutlierReport, Table,
};

/// Clean `input_file` with the default configuration and write the result to
/// `output_file`, returning the cleaned table.
pub fn process_data(
    input_file: impl AsRef<Path>,
    output_file: impl AsRef<Path>,
) -> error::Result<Table> {
    let result = CleaningPipeline::builder()
        .build()?
        .run(input_file, output_file)?;
    Ok(result.table)
}
