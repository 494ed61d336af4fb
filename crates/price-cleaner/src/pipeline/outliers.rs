//! Outlier handling module.
//!
//! Removes rows whose target value falls outside the Tukey fences
//! `[Q1 - k*IQR, Q3 + k*IQR]`.

use crate::config::CleanerConfig;
use crate::error::{DataQualityIssue, Result};
use crate::types::{ColumnKind, OutlierBounds, OutlierReport, Table};
use crate::utils::{quantile_linear_sorted, sorted_numeric_values};
use polars::prelude::*;
use tracing::{debug, info};

/// IQR-based row filter on a single numeric column.
#[derive(Debug, Clone)]
pub struct OutlierFilter {
    column: String,
    multiplier: f64,
}

impl OutlierFilter {
    pub fn new(column: impl Into<String>, multiplier: f64) -> Self {
        Self {
            column: column.into(),
            multiplier,
        }
    }

    pub fn from_config(config: &CleanerConfig) -> Self {
        Self::new(config.target_column.clone(), config.iqr_multiplier)
    }

    pub fn column(&self) -> &str {
        &self.column
    }

    /// Compute the fences for the target column.
    ///
    /// Returns `None` when the column has no values (zero-row table).
    pub fn bounds(&self, table: &Table) -> Result<Option<OutlierBounds>> {
        table.require_column(&self.column)?;
        if table.height() == 0 {
            return Ok(None);
        }

        let series = table
            .dataframe()
            .column(&self.column)?
            .as_materialized_series();
        if table.column_kind(&self.column) != Some(ColumnKind::Numeric) {
            return Err(DataQualityIssue::NonNumericTarget {
                column: self.column.clone(),
                dtype: series.dtype().to_string(),
            }
            .into());
        }

        let values = sorted_numeric_values(series)?;
        let (Some(q1), Some(q3)) = (
            quantile_linear_sorted(&values, 0.25),
            quantile_linear_sorted(&values, 0.75),
        ) else {
            return Ok(None);
        };

        Ok(Some(OutlierBounds::from_quartiles(q1, q3, self.multiplier)))
    }

    /// Remove outlier rows, returning the surviving rows as a new table.
    ///
    /// Rows whose target is missing are kept. When nothing is out of bounds
    /// the returned table is an unchanged copy of the input.
    pub fn filter(&self, table: &Table) -> Result<(Table, OutlierReport)> {
        let mut report = OutlierReport {
            column: self.column.clone(),
            bounds: None,
            outliers_removed: 0,
        };

        let Some(bounds) = self.bounds(table)? else {
            debug!("No values in {}, skipping outlier filter", self.column);
            return Ok((table.clone(), report));
        };
        report.bounds = Some(bounds);
        debug!(
            "IQR bounds for {}: Q1={}, Q3={}, IQR={}, lower={}, upper={}",
            self.column, bounds.q1, bounds.q3, bounds.iqr, bounds.lower, bounds.upper
        );

        let float_series = table
            .dataframe()
            .column(&self.column)?
            .as_materialized_series()
            .cast(&DataType::Float64)?;
        let keep: Vec<bool> = float_series
            .f64()?
            .into_iter()
            .map(|v| v.is_none_or(|val| bounds.contains(val)))
            .collect();

        let outliers = keep.iter().filter(|k| !**k).count();
        if outliers == 0 {
            return Ok((table.clone(), report));
        }
        info!("Found {} outliers in the {} column", outliers, self.column);

        let mask = BooleanChunked::from_slice("mask".into(), &keep);
        let df = table.dataframe().filter(&mask)?;
        let filtered = Table::with_schema(df, table.schema().to_vec());
        info!("Removed outliers. New dataset shape: {:?}", filtered.shape());

        report.outliers_removed = outliers;
        Ok((filtered, report))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn price_table(prices: &[f64]) -> Table {
        let n = prices.len() as i64;
        Table::from_dataframe(
            df![
                "id" => (0..n).collect::<Vec<i64>>(),
                "price" => prices.to_vec(),
            ]
            .unwrap(),
        )
    }

    fn prices(table: &Table) -> Vec<f64> {
        table
            .dataframe()
            .column("price")
            .unwrap()
            .f64()
            .unwrap()
            .into_iter()
            .flatten()
            .collect()
    }

    #[test]
    fn test_bounds_reference_example() {
        let table = price_table(&[1.0, 2.0, 3.0, 4.0, 5.0, 6.0, 7.0, 8.0, 9.0, 100.0]);
        let bounds = OutlierFilter::new("price", 1.5)
            .bounds(&table)
            .unwrap()
            .unwrap();

        assert_eq!(bounds.q1, 3.25);
        assert_eq!(bounds.q3, 7.75);
        assert_eq!(bounds.iqr, 4.5);
        assert_eq!(bounds.lower, -3.5);
        assert_eq!(bounds.upper, 14.5);
    }

    #[test]
    fn test_filter_removes_outlier_row() {
        let table = price_table(&[1.0, 2.0, 3.0, 4.0, 5.0, 6.0, 7.0, 8.0, 9.0, 100.0]);

        let (filtered, report) = OutlierFilter::new("price", 1.5).filter(&table).unwrap();

        assert_eq!(report.outliers_removed, 1);
        assert_eq!(filtered.shape(), (9, 2));
        assert_eq!(prices(&filtered), vec![1.0, 2.0, 3.0, 4.0, 5.0, 6.0, 7.0, 8.0, 9.0]);
        // Input untouched
        assert_eq!(table.height(), 10);
    }

    #[test]
    fn test_filter_bounds_are_inclusive() {
        // Q1 = 2, Q3 = 4, IQR = 2, fences [-1, 7]; 7 sits exactly on the fence
        let table = price_table(&[1.0, 2.0, 3.0, 4.0, 7.0]);

        let (filtered, report) = OutlierFilter::new("price", 1.5).filter(&table).unwrap();

        assert_eq!(report.bounds.unwrap().upper, 7.0);
        assert_eq!(report.outliers_removed, 0);
        assert_eq!(filtered.height(), 5);
    }

    #[test]
    fn test_filter_low_outlier() {
        let table = price_table(&[-500.0, 10.0, 11.0, 12.0, 13.0, 14.0]);

        let (filtered, report) = OutlierFilter::new("price", 1.5).filter(&table).unwrap();

        assert_eq!(report.outliers_removed, 1);
        assert!(!prices(&filtered).contains(&-500.0));
    }

    #[test]
    fn test_filter_constant_column() {
        // IQR = 0, fences [5, 5]
        let table = price_table(&[5.0, 5.0, 5.0, 5.0]);

        let (filtered, report) = OutlierFilter::new("price", 1.5).filter(&table).unwrap();

        assert_eq!(report.outliers_removed, 0);
        assert_eq!(filtered.height(), 4);
    }

    #[test]
    fn test_filter_custom_multiplier() {
        // Fences with k = 0: [Q1, Q3] = [3.25, 7.75]
        let table = price_table(&[1.0, 2.0, 3.0, 4.0, 5.0, 6.0, 7.0, 8.0, 9.0, 100.0]);

        let (filtered, _) = OutlierFilter::new("price", 0.0).filter(&table).unwrap();

        assert_eq!(prices(&filtered), vec![4.0, 5.0, 6.0, 7.0]);
    }

    #[test]
    fn test_filter_integer_target() {
        let table = Table::from_dataframe(
            df!["price" => [1i64, 2, 3, 4, 5, 6, 7, 8, 9, 100]].unwrap(),
        );

        let (filtered, report) = OutlierFilter::new("price", 1.5).filter(&table).unwrap();

        assert_eq!(report.outliers_removed, 1);
        assert_eq!(filtered.height(), 9);
    }

    #[test]
    fn test_filter_missing_target_column() {
        let table = Table::from_dataframe(df!["area" => [1.0, 2.0]].unwrap());

        let err = OutlierFilter::new("price", 1.5).filter(&table).unwrap_err();

        assert_eq!(err.error_code(), "MISSING_COLUMN");
    }

    #[test]
    fn test_filter_non_numeric_target() {
        let table = Table::from_dataframe(df!["price" => ["cheap", "dear"]].unwrap());

        let err = OutlierFilter::new("price", 1.5).filter(&table).unwrap_err();

        assert_eq!(err.error_code(), "NON_NUMERIC_TARGET");
    }

    #[test]
    fn test_filter_empty_table() {
        let table = price_table(&[]);

        let (filtered, report) = OutlierFilter::new("price", 1.5).filter(&table).unwrap();

        assert_eq!(filtered.height(), 0);
        assert!(report.bounds.is_none());
    }

    #[test]
    fn test_filter_keeps_rows_with_missing_target() {
        let table = Table::from_dataframe(
            df!["price" => [Some(1.0), Some(2.0), None, Some(3.0), Some(4.0), Some(50.0)]].unwrap(),
        );

        let (filtered, report) = OutlierFilter::new("price", 1.5).filter(&table).unwrap();

        assert_eq!(report.outliers_removed, 1);
        assert_eq!(filtered.height(), 5);
        assert_eq!(filtered.total_missing(), 1);
    }
}
