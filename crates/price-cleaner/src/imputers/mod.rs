//! Imputation module for handling missing values.
//!
//! Numeric columns are filled with their median, categorical columns with
//! their mode. The strategy is fixed per column kind.

mod statistical;

pub use statistical::StatisticalImputer;
