//! The census report: one CSV row per tick with the number of vulnerable, infected and immune
//! particles.

use crate::error::ContagionError;
use crate::log::{info, trace};
use crate::simulation::Census;
use csv::Writer;
use std::fs::{create_dir_all, File};
use std::path::{Path, PathBuf};

const CENSUS_REPORT_NAME: &str = "census";

/// Where report files go and how existing files are treated.
#[derive(Clone, Debug)]
pub struct ReportOptions {
    pub directory: PathBuf,
    pub file_prefix: String,
    pub overwrite: bool,
}

impl Default for ReportOptions {
    fn default() -> Self {
        Self {
            directory: PathBuf::from("."),
            file_prefix: String::new(),
            overwrite: false,
        }
    }
}

impl ReportOptions {
    /// Sets the directory where reports will be output
    pub fn directory(&mut self, directory: PathBuf) -> &mut ReportOptions {
        self.directory = directory;
        self
    }

    /// Sets the prefix prepended to report file names
    pub fn file_prefix(&mut self, file_prefix: String) -> &mut ReportOptions {
        self.file_prefix = file_prefix;
        self
    }

    /// Allows existing report files to be replaced
    pub fn overwrite(&mut self, overwrite: bool) -> &mut ReportOptions {
        self.overwrite = overwrite;
        self
    }

    fn path_for(&self, short_name: &str) -> PathBuf {
        self.directory
            .join(format!("{}{}.csv", self.file_prefix, short_name))
    }
}

// Creates the file and all parent directories. Refuses to clobber an existing file unless
// `overwrite` is set.
fn create_report_file(path: &Path, overwrite: bool) -> Result<File, ContagionError> {
    if path.exists() && !overwrite {
        return Err(ContagionError::ReportError(format!(
            "report file {} already exists; pass --force-overwrite to replace it",
            path.display()
        )));
    }
    if let Some(parent) = path.parent() {
        create_dir_all(parent)?;
    }
    Ok(File::create(path)?)
}

/// Writes `Census` rows to `<directory>/<prefix>census.csv`.
pub struct CensusReport {
    path: PathBuf,
    writer: Writer<File>,
}

impl CensusReport {
    /// Opens the report file and writes the header on the first row.
    ///
    /// # Errors
    ///
    /// Returns a `ContagionError` if the file already exists and `overwrite` is not set, or if
    /// it cannot be created.
    pub fn create(options: &ReportOptions) -> Result<Self, ContagionError> {
        let path = options.path_for(CENSUS_REPORT_NAME);
        let file = create_report_file(&path, options.overwrite)?;
        info!("writing census report to {}", path.display());
        Ok(Self {
            path,
            writer: Writer::from_writer(file),
        })
    }

    /// Appends one row and flushes it to disk.
    ///
    /// # Errors
    ///
    /// Returns a `ContagionError` if the row cannot be serialized or written.
    pub fn send(&mut self, census: &Census) -> Result<(), ContagionError> {
        trace!("census at t={}: {:?}", census.time, census);
        self.writer.serialize(census)?;
        self.writer.flush()?;
        Ok(())
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }
}
