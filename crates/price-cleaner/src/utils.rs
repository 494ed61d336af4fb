//! Shared utilities: dtype checks, order statistics, and null filling.

use polars::prelude::*;
use std::collections::BTreeMap;

// =============================================================================
// Data Type Utilities
// =============================================================================

/// Check if a DataType is numeric (integer or float).
#[inline]
pub fn is_numeric_dtype(dtype: &DataType) -> bool {
    matches!(
        dtype,
        DataType::Int8
            | DataType::Int16
            | DataType::Int32
            | DataType::Int64
            | DataType::UInt8
            | DataType::UInt16
            | DataType::UInt32
            | DataType::UInt64
            | DataType::Float32
            | DataType::Float64
    )
}

// =============================================================================
// Order Statistics
// =============================================================================

/// Percentile of an ascending-sorted slice using linear interpolation
/// between closest ranks.
///
/// The rank is `q * (n - 1)`; a fractional rank interpolates between the
/// neighbouring elements. Returns `None` for an empty slice.
///
/// # Example
///
/// ```rust,ignore
/// let v = [1.0, 2.0, 3.0, 4.0, 5.0, 6.0, 7.0, 8.0, 9.0, 100.0];
/// assert_eq!(quantile_linear_sorted(&v, 0.25), Some(3.25));
/// ```
pub fn quantile_linear_sorted(sorted: &[f64], q: f64) -> Option<f64> {
    if sorted.is_empty() {
        return None;
    }

    let rank = q.clamp(0.0, 1.0) * (sorted.len() - 1) as f64;
    let lo = rank.floor() as usize;
    let hi = rank.ceil() as usize;
    let frac = rank - lo as f64;

    Some(sorted[lo] + (sorted[hi] - sorted[lo]) * frac)
}

/// Non-null values of a numeric Series, as f64, sorted ascending.
pub fn sorted_numeric_values(series: &Series) -> PolarsResult<Vec<f64>> {
    let float_series = series.cast(&DataType::Float64)?;
    let mut values: Vec<f64> = float_series.f64()?.into_iter().flatten().collect();
    values.sort_by(f64::total_cmp);
    Ok(values)
}

/// Most frequent non-null value of a Series, rendered as a string.
///
/// Ties go to the lexicographically smallest value, so the result does not
/// depend on row order.
pub fn string_mode(series: &Series) -> PolarsResult<Option<String>> {
    let str_series = series.cast(&DataType::String)?;
    let str_chunked = str_series.str()?;

    let mut value_counts: BTreeMap<&str, usize> = BTreeMap::new();
    for val in str_chunked.into_iter().flatten() {
        *value_counts.entry(val).or_insert(0) += 1;
    }

    // BTreeMap iterates in ascending key order; keep the first maximum.
    let mut best: Option<(&str, usize)> = None;
    for (val, count) in value_counts {
        if best.is_none_or(|(_, best_count)| count > best_count) {
            best = Some((val, count));
        }
    }

    Ok(best.map(|(val, _)| val.to_string()))
}

// =============================================================================
// Series Transformation Utilities
// =============================================================================

/// Fill null values in a numeric Series, producing a Float64 Series.
pub fn fill_numeric_nulls(series: &Series, fill_value: f64) -> PolarsResult<Series> {
    let float_series = series.cast(&DataType::Float64)?;
    let values: Vec<f64> = float_series
        .f64()?
        .into_iter()
        .map(|v| v.unwrap_or(fill_value))
        .collect();

    Ok(Series::new(series.name().clone(), values))
}

/// Fill null values in a Series with a string, producing a String Series.
pub fn fill_string_nulls(series: &Series, fill_value: &str) -> PolarsResult<Series> {
    let str_series = series.cast(&DataType::String)?;
    let values: Vec<String> = str_series
        .str()?
        .into_iter()
        .map(|v| v.unwrap_or(fill_value).to_string())
        .collect();

    Ok(Series::new(series.name().clone(), values))
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_is_numeric_dtype() {
        assert!(is_numeric_dtype(&DataType::Int64));
        assert!(is_numeric_dtype(&DataType::Float64));
        assert!(!is_numeric_dtype(&DataType::String));
        assert!(!is_numeric_dtype(&DataType::Boolean));
    }

    #[test]
    fn test_quantile_linear() {
        let v = [1.0, 2.0, 3.0, 4.0, 5.0, 6.0, 7.0, 8.0, 9.0, 100.0];
        assert_eq!(quantile_linear_sorted(&v, 0.25), Some(3.25));
        assert_eq!(quantile_linear_sorted(&v, 0.75), Some(7.75));
        assert_eq!(quantile_linear_sorted(&v, 0.0), Some(1.0));
        assert_eq!(quantile_linear_sorted(&v, 1.0), Some(100.0));
        assert_eq!(quantile_linear_sorted(&[42.0], 0.25), Some(42.0));
        assert_eq!(quantile_linear_sorted(&[], 0.5), None);
    }

    #[test]
    fn test_sorted_numeric_values_skips_nulls() {
        let series = Series::new("test".into(), &[Some(3i64), None, Some(1), Some(2)]);
        assert_eq!(sorted_numeric_values(&series).unwrap(), vec![1.0, 2.0, 3.0]);
    }

    #[test]
    fn test_string_mode() {
        let series = Series::new("test".into(), &["a", "b", "a", "c", "a"]);
        assert_eq!(string_mode(&series).unwrap(), Some("a".to_string()));
    }

    #[test]
    fn test_string_mode_tie_breaks_lexicographically() {
        let series = Series::new(
            "test".into(),
            &[Some("north"), Some("east"), None, Some("north"), Some("east")],
        );
        assert_eq!(string_mode(&series).unwrap(), Some("east".to_string()));
    }

    #[test]
    fn test_string_mode_all_null() {
        let series = Series::new("test".into(), &[Option::<&str>::None, None]);
        assert_eq!(string_mode(&series).unwrap(), None);
    }

    #[test]
    fn test_fill_numeric_nulls() {
        let series = Series::new("test".into(), &[Some(1.0), None, Some(3.0)]);
        let filled = fill_numeric_nulls(&series, 0.0).unwrap();

        assert_eq!(filled.null_count(), 0);
        assert_eq!(filled.get(0).unwrap().try_extract::<f64>().unwrap(), 1.0);
        assert_eq!(filled.get(1).unwrap().try_extract::<f64>().unwrap(), 0.0);
        assert_eq!(filled.get(2).unwrap().try_extract::<f64>().unwrap(), 3.0);
    }

    #[test]
    fn test_fill_string_nulls_keeps_values_unquoted() {
        let series = Series::new("test".into(), &[Some("a"), None, Some("b")]);
        let filled = fill_string_nulls(&series, "z").unwrap();
        let values: Vec<Option<&str>> = filled.str().unwrap().into_iter().collect();

        assert_eq!(values, vec![Some("a"), Some("z"), Some("b")]);
    }
}
