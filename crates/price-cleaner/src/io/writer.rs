//! Delimited file writer.

use crate::config::DEFAULT_SEPARATOR;
use crate::error::{CleaningError, Result, ResultExt};
use crate::types::Table;
use polars::prelude::*;
use std::ffi::OsString;
use std::fs::{self, File};
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// Writes a [`Table`] as a delimited file with a header row and no index
/// column.
///
/// Data goes to a hidden sibling file first and is renamed over the target
/// only once fully written, so the target never holds a partial table.
#[derive(Debug, Clone)]
pub struct TableWriter {
    separator: u8,
}

impl Default for TableWriter {
    fn default() -> Self {
        Self::new(DEFAULT_SEPARATOR)
    }
}

impl TableWriter {
    pub fn new(separator: u8) -> Self {
        Self { separator }
    }

    /// Create the parent directory of `path` and all missing ancestors.
    ///
    /// Succeeds if the directory already exists.
    pub fn ensure_parent_dir(path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(|e| CleaningError::data_access(parent, e))?;
            debug!("Ensured output directory {}", parent.display());
        }
        Ok(())
    }

    /// Write `table` to `path`, replacing any existing file.
    pub fn write(&self, table: &Table, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        Self::ensure_parent_dir(path)?;

        let staging = staging_path(path)?;
        let result = self.write_csv(table, &staging).and_then(|_| {
            fs::rename(&staging, path).map_err(|e| CleaningError::data_access(path, e))
        });

        if result.is_err() {
            // Best effort; the original error is what the caller needs.
            let _ = fs::remove_file(&staging);
        }
        result?;

        info!("Saved cleaned data to {}", path.display());
        Ok(())
    }

    fn write_csv(&self, table: &Table, path: &Path) -> Result<()> {
        let mut file = File::create(path).map_err(|e| CleaningError::data_access(path, e))?;
        let mut df = table.dataframe().clone();

        CsvWriter::new(&mut file)
            .include_header(true)
            .with_separator(self.separator)
            .with_quote_char(b'"')
            .finish(&mut df)
            .context(format!("Writing {}", path.display()))?;

        file.sync_all()
            .map_err(|e| CleaningError::data_access(path, e))
    }
}

/// `dir/.name.tmp` next to `dir/name`.
fn staging_path(path: &Path) -> Result<PathBuf> {
    let file_name = path.file_name().ok_or_else(|| {
        CleaningError::data_access(
            path,
            std::io::Error::new(std::io::ErrorKind::InvalidInput, "output path has no file name"),
        )
    })?;

    let mut staged = OsString::from(".");
    staged.push(file_name);
    staged.push(".tmp");
    Ok(path.with_file_name(staged))
}
