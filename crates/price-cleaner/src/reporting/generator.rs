use crate::error::{CleaningError, Result};
use crate::types::CleaningSummary;
use std::fs::{self, File};
use std::io::Write;
use std::path::{Path, PathBuf};
use tracing::info;

/// Writes JSON reports for cleaning runs.
#[derive(Debug, Clone)]
pub struct ReportGenerator {
    output_dir: PathBuf,
    base_name: String,
}

impl ReportGenerator {
    pub fn new(output_dir: impl Into<PathBuf>, base_name: impl Into<String>) -> Self {
        Self {
            output_dir: output_dir.into(),
            base_name: base_name.into(),
        }
    }

    /// Place the report beside `output_file`, named after its stem.
    pub fn for_output(output_file: impl AsRef<Path>) -> Self {
        let output_file = output_file.as_ref();
        let output_dir = output_file
            .parent()
            .map(Path::to_path_buf)
            .unwrap_or_default();
        let base_name = output_file
            .file_stem()
            .and_then(|s| s.to_str())
            .unwrap_or("output")
            .to_string();
        Self::new(output_dir, base_name)
    }

    /// `<output_dir>/<base_name>_report.json`
    pub fn report_path(&self) -> PathBuf {
        self.output_dir.join(format!("{}_report.json", self.base_name))
    }

    /// Write `summary` as pretty-printed JSON and return the report path.
    pub fn write_report_to_file(&self, summary: &CleaningSummary) -> Result<PathBuf> {
        if !self.output_dir.as_os_str().is_empty() {
            fs::create_dir_all(&self.output_dir)
                .map_err(|e| CleaningError::data_access(&self.output_dir, e))?;
        }

        let report_path = self.report_path();
        let json = serde_json::to_string_pretty(summary)?;
        let mut file =
            File::create(&report_path).map_err(|e| CleaningError::data_access(&report_path, e))?;
        file.write_all(json.as_bytes())
            .map_err(|e| CleaningError::data_access(&report_path, e))?;

        info!("Report saved: {}", report_path.display());

        Ok(report_path)
    }
}
