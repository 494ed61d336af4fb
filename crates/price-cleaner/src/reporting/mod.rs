//! Report generation module.
//!
//! Persists a [`CleaningSummary`](crate::types::CleaningSummary) as a JSON
//! report next to the cleaned output.
//!
//! # Example
//!
//! ```rust,ignore
//! use price_cleaner::reporting::ReportGenerator;
//!
//! let generator = ReportGenerator::for_output("datos/procesado/cleaned_house_data.csv");
//! let path = generator.write_report_to_file(&result.summary)?;
//! // datos/procesado/cleaned_house_data_report.json
//! ```

mod generator;

pub use generator::ReportGenerator;
