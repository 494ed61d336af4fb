//! Main cleaning pipeline module.
//!
//! This module provides the core `CleaningPipeline` struct and builder for
//! orchestrating load, imputation, outlier removal and write.

use crate::config::CleanerConfig;
use crate::error::Result;
use crate::imputers::StatisticalImputer;
use crate::io::{TableLoader, TableWriter};
use crate::pipeline::OutlierFilter;
use crate::types::{CleaningResult, CleaningSummary, Table};
use chrono::Local;
use std::path::Path;
use std::time::Instant;
use tracing::info;

/// The cleaning pipeline.
///
/// Use [`CleaningPipeline::builder()`] to create a pipeline with custom
/// configuration, or [`crate::process_data`] for the defaults.
///
/// # Example
///
/// ```rust,ignore
/// use price_cleaner::{CleanerConfig, CleaningPipeline};
///
/// let result = CleaningPipeline::builder()
///     .config(CleanerConfig::builder().target_column("price").build()?)
///     .build()?
///     .run("datos/crudo/house_data.csv", "datos/procesado/cleaned_house_data.csv")?;
///
/// println!("{} rows kept", result.table.height());
/// ```
#[derive(Debug, Clone)]
pub struct CleaningPipeline {
    config: CleanerConfig,
    loader: TableLoader,
    writer: TableWriter,
    outlier_filter: OutlierFilter,
}

static_assertions::assert_impl_all!(CleaningPipeline: Send);

impl CleaningPipeline {
    /// Create a new pipeline builder.
    pub fn builder() -> CleaningPipelineBuilder {
        CleaningPipelineBuilder::default()
    }

    pub fn config(&self) -> &CleanerConfig {
        &self.config
    }

    /// Load `input`, clean it, and write the result to `output`.
    ///
    /// The output's parent directory is created first. Nothing is written to
    /// `output` unless every stage succeeds.
    pub fn run(&self, input: impl AsRef<Path>, output: impl AsRef<Path>) -> Result<CleaningResult> {
        let (input, output) = (input.as_ref(), output.as_ref());
        let start_time = Instant::now();

        TableWriter::ensure_parent_dir(output)?;

        let table = self.load(input)?;

        let mut result = self.clean_internal(&table, start_time)?;

        self.writer.write(&result.table, output)?;

        result.summary.input_file = Some(input.display().to_string());
        result.summary.output_file = Some(output.display().to_string());
        result.summary.duration_ms = start_time.elapsed().as_millis() as u64;
        Ok(result)
    }

    /// Load `input` and check the target column is present.
    pub fn load(&self, input: impl AsRef<Path>) -> Result<Table> {
        let table = self.loader.load(input)?;
        table.require_column(&self.config.target_column)?;
        Ok(table)
    }

    /// Run the in-memory stages only: imputation, then outlier removal.
    ///
    /// `table` is not modified; the cleaned rows come back in the result.
    pub fn clean(&self, table: &Table) -> Result<CleaningResult> {
        self.clean_internal(table, Instant::now())
    }

    fn clean_internal(&self, table: &Table, start_time: Instant) -> Result<CleaningResult> {
        info!("Cleaning dataset");
        table.require_column(&self.config.target_column)?;

        // Quartiles need a complete target column, so imputation goes first.
        let (imputed, imputations) = StatisticalImputer::impute(table)?;
        let (cleaned, outliers) = self.outlier_filter.filter(&imputed)?;

        let summary = CleaningSummary {
            input_file: None,
            output_file: None,
            rows_before: table.height(),
            rows_after: cleaned.height(),
            rows_removed: table.height().saturating_sub(cleaned.height()),
            columns_before: table.width(),
            columns_after: cleaned.width(),
            missing_before: table.total_missing(),
            missing_after: cleaned.total_missing(),
            schema: table.schema().to_vec(),
            imputations,
            outliers,
            duration_ms: start_time.elapsed().as_millis() as u64,
            generated_at: Local::now().format("%Y-%m-%d %H:%M:%S").to_string(),
        };

        Ok(CleaningResult {
            table: cleaned,
            summary,
        })
    }
}

/// Builder for [`CleaningPipeline`].
#[derive(Debug, Default)]
pub struct CleaningPipelineBuilder {
    config: Option<CleanerConfig>,
}

impl CleaningPipelineBuilder {
    /// Set the pipeline configuration.
    pub fn config(mut self, config: CleanerConfig) -> Self {
        self.config = Some(config);
        self
    }

    /// Build the pipeline, validating the configuration.
    pub fn build(self) -> Result<CleaningPipeline> {
        let config = self.config.unwrap_or_default();
        config.validate()?;

        Ok(CleaningPipeline {
            loader: TableLoader::new(config.separator),
            writer: TableWriter::new(config.separator),
            outlier_filter: OutlierFilter::from_config(&config),
            config,
        })
    }
}
