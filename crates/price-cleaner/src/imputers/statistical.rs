//! Statistical imputation: median for numeric columns, mode for categorical.

use crate::error::{DataQualityIssue, Result};
use crate::types::{ColumnKind, FillValue, Imputation, Table};
use crate::utils::{
    fill_numeric_nulls, fill_string_nulls, string_mode,
};
use polars::prelude::*;
use tracing::{debug, info};

/// Statistical imputation for filling missing values.
pub struct StatisticalImputer;

impl StatisticalImputer {
    /// Fill every missing value in `table`, returning a new table and one
    /// [`Imputation`] per column that had missing values.
    ///
    /// Columns are visited in header order. Columns without missing values
    /// are left untouched, including their dtype.
    ///
    /// # Errors
    ///
    /// [`DataQualityIssue::AllValuesMissing`] if a column has no non-missing
    /// value to derive a fill value from.
    pub fn impute(table: &Table) -> Result<(Table, Vec<Imputation>)> {
        let mut df = table.dataframe().clone();
        let mut imputations = Vec::new();

        for col_schema in table.schema() {
            let name = col_schema.name.as_str();
            let series = table.dataframe().column(name)?.as_materialized_series();

            let missing_count = series.null_count();
            if missing_count == 0 {
                continue;
            }
            info!("Found {} missing values in {}", missing_count, name);

            let filled = match col_schema.kind {
                ColumnKind::Numeric => Self::fill_with_median(series)?,
                ColumnKind::Categorical => Self::fill_with_mode(series)?,
            };
            let Some((filled, fill_value)) = filled else {
                return Err(DataQualityIssue::AllValuesMissing {
                    column: name.to_string(),
                }
                .into());
            };

            df.replace(name, filled)?;
            info!(
                "Filled missing values in {} with the {}: {}",
                name,
                fill_value.method(),
                fill_value
            );

            imputations.push(Imputation {
                column: name.to_string(),
                kind: col_schema.kind,
                missing_count,
                fill_value,
            });
        }

        debug!("Imputed {} columns", imputations.len());
        Ok((Table::with_schema(df, table.schema().to_vec()), imputations))
    }

    /// Median of the non-null values; `None` if there are none.
    ///
    /// An even count averages the two middle values.
    pub fn median(series: &Series) -> Option<f64> {
        series.median()
    }

    fn fill_with_median(series: &Series) -> Result<Option<(Series, FillValue)>> {
        let Some(median) = Self::median(series) else {
            return Ok(None);
        };
        let filled = fill_numeric_nulls(series, median)?;
        Ok(Some((filled, FillValue::Median(median))))
    }

    fn fill_with_mode(series: &Series) -> Result<Option<(Series, FillValue)>> {
        let Some(mode) = string_mode(series)? else {
            return Ok(None);
        };
        let filled = fill_string_nulls(series, &mode)?;
        Ok(Some((filled, FillValue::Mode(mode))))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn table(df: DataFrame) -> Table {
        Table::from_dataframe(df)
    }

    fn f64_at(table: &Table, col: &str, idx: usize) -> f64 {
        table
            .dataframe()
            .column(col)
            .unwrap()
            .get(idx)
            .unwrap()
            .try_extract::<f64>()
            .unwrap()
    }

    fn str_values(table: &Table, col: &str) -> Vec<String> {
        table
            .dataframe()
            .column(col)
            .unwrap()
            .str()
            .unwrap()
            .into_iter()
            .map(|v| v.unwrap().to_string())
            .collect()
    }

    #[test]
    fn test_median_skips_nulls() {
        let series = Series::new("test".into(), &[Some(10i64), None, Some(1), Some(4), Some(7)]);
        assert_eq!(StatisticalImputer::median(&series), Some(5.5));

        let empty = Series::new("test".into(), &[Option::<f64>::None, None]);
        assert_eq!(StatisticalImputer::median(&empty), None);
    }

    #[test]
    fn test_impute_median_odd_count() {
        let input = table(df!["values" => [Some(1.0), None, Some(3.0), None, Some(5.0)]].unwrap());

        let (output, imputations) = StatisticalImputer::impute(&input).unwrap();

        // Median of [1, 3, 5] = 3
        assert_eq!(output.total_missing(), 0);
        assert_eq!(f64_at(&output, "values", 1), 3.0);
        assert_eq!(f64_at(&output, "values", 3), 3.0);
        assert_eq!(imputations.len(), 1);
        assert_eq!(imputations[0].missing_count, 2);
        assert_eq!(imputations[0].fill_value, FillValue::Median(3.0));
    }

    #[test]
    fn test_impute_median_even_count() {
        let input =
            table(df!["values" => [Some(10.0), Some(1.0), None, Some(2.0), Some(3.0)]].unwrap());

        let (output, imputations) = StatisticalImputer::impute(&input).unwrap();

        // Median of [1, 2, 3, 10] = (2 + 3) / 2
        assert_eq!(f64_at(&output, "values", 2), 2.5);
        assert_eq!(imputations[0].fill_value, FillValue::Median(2.5));
    }

    #[test]
    fn test_impute_integer_column_becomes_float() {
        let input = table(df!["rooms" => [Some(1i64), None, Some(2)]].unwrap());

        let (output, _) = StatisticalImputer::impute(&input).unwrap();

        let rooms = output.dataframe().column("rooms").unwrap();
        assert!(matches!(rooms.dtype(), DataType::Float64));
        assert_eq!(f64_at(&output, "rooms", 1), 1.5);
        assert_eq!(output.column_kind("rooms"), Some(ColumnKind::Numeric));
    }

    #[test]
    fn test_impute_mode() {
        let input = table(
            df!["zone" => [Some("A"), Some("B"), Some("A"), None, Some("A")]].unwrap(),
        );

        let (output, imputations) = StatisticalImputer::impute(&input).unwrap();

        assert_eq!(str_values(&output, "zone"), vec!["A", "B", "A", "A", "A"]);
        assert_eq!(imputations[0].fill_value, FillValue::Mode("A".to_string()));
        assert_eq!(imputations[0].kind, ColumnKind::Categorical);
    }

    #[test]
    fn test_impute_mode_tie_breaking() {
        // "b" and "a" both appear twice; the smaller one wins regardless of order
        let input =
            table(df!["zone" => [Some("b"), Some("a"), None, Some("b"), Some("a")]].unwrap());

        let (output, _) = StatisticalImputer::impute(&input).unwrap();

        assert_eq!(str_values(&output, "zone")[2], "a");
    }

    #[test]
    fn test_impute_leaves_complete_columns_untouched() {
        let input = table(
            df![
                "price" => [100i64, 200, 300],
                "area" => [Some(1.0), None, Some(3.0)],
            ]
            .unwrap(),
        );

        let (output, imputations) = StatisticalImputer::impute(&input).unwrap();

        assert_eq!(imputations.len(), 1);
        assert_eq!(imputations[0].column, "area");
        assert!(matches!(
            output.dataframe().column("price").unwrap().dtype(),
            DataType::Int64
        ));
    }

    #[test]
    fn test_impute_does_not_mutate_input() {
        let input = table(df!["values" => [Some(1.0), None]].unwrap());

        let _ = StatisticalImputer::impute(&input).unwrap();

        assert_eq!(input.total_missing(), 1);
    }

    #[test]
    fn test_impute_all_missing_column_fails() {
        let input = table(
            df![
                "price" => [1.0, 2.0],
                "garage" => [Option::<&str>::None, None],
            ]
            .unwrap(),
        );

        let err = StatisticalImputer::impute(&input).unwrap_err();

        assert_eq!(
            err.data_quality_issue(),
            Some(&DataQualityIssue::AllValuesMissing {
                column: "garage".to_string()
            })
        );
    }

    #[test]
    fn test_impute_empty_table() {
        let input = table(df!["price" => Vec::<f64>::new()].unwrap());

        let (output, imputations) = StatisticalImputer::impute(&input).unwrap();

        assert!(imputations.is_empty());
        assert_eq!(output.height(), 0);
    }
}
