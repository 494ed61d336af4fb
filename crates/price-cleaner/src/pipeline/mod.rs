//! Pipeline module.
//!
//! This module provides the cleaning pipeline and its outlier stage.

mod builder;
pub mod outliers;

pub use builder::{CleaningPipeline, CleaningPipelineBuilder};
pub use outliers::OutlierFilter;
