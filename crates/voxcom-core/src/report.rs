//! Line-oriented CSV log for check results.
//!
//! One `CsvLog` owns one file handle for its lifetime. The header row is
//! written lazily, exactly once, on the first data row in write mode; append
//! mode never writes it; read mode skips one leading row on the first read.

use std::fs::{File, OpenOptions};
use std::path::{Path, PathBuf};

use crate::error::{Result, VoxcomError};

/// Column header of a check log, in file order.
pub const LOG_HEADER: [&str; 7] = ["path", "id", "x", "y", "z", "distance", "warning flags"];

/// Open mode for a [`CsvLog`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LogMode {
    /// Truncate the target; header precedes the first data row.
    Write,
    /// Preserve existing content; no header is ever written.
    Append,
    /// Read rows back; one leading header row is skipped.
    Read,
}

/// One-shot initialization state: transitions to Active exactly once.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum LogState {
    Uninitialized,
    Active,
}

pub struct CsvLog {
    path: PathBuf,
    state: LogState,
    writer: Option<csv::Writer<File>>,
    reader: Option<csv::Reader<File>>,
}

impl CsvLog {
    /// Open a log at `path` in the given mode.
    ///
    /// A target without `.csv` in its name gets the suffix appended. Missing
    /// parent directories and permission problems fail here, not later.
    pub fn open(path: &Path, mode: LogMode) -> Result<Self> {
        let path = normalize_log_path(path);
        let (state, writer, reader) = match mode {
            LogMode::Write => {
                let writer = csv::WriterBuilder::new().flexible(true).from_path(&path)?;
                (LogState::Uninitialized, Some(writer), None)
            }
            LogMode::Append => {
                let file = OpenOptions::new().create(true).append(true).open(&path)?;
                let writer = csv::WriterBuilder::new().flexible(true).from_writer(file);
                // Appending never touches the header.
                (LogState::Active, Some(writer), None)
            }
            LogMode::Read => {
                let reader = csv::ReaderBuilder::new()
                    .has_headers(false)
                    .flexible(true)
                    .from_path(&path)?;
                (LogState::Uninitialized, None, Some(reader))
            }
        };
        Ok(Self {
            path,
            state,
            writer,
            reader,
        })
    }

    /// The normalized path this log reads or writes.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Append one data row, writing the header first if this log is a fresh
    /// write-mode target.
    pub fn writeline<I, S>(&mut self, row: I) -> Result<()>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let writer = self.writer.as_mut().ok_or(VoxcomError::LogMode("writing"))?;
        if self.state == LogState::Uninitialized {
            writer.write_record(LOG_HEADER)?;
            self.state = LogState::Active;
        }
        let fields: Vec<String> = row.into_iter().map(|s| s.as_ref().to_string()).collect();
        writer.write_record(&fields)?;
        Ok(())
    }

    /// Read the next data row, or `None` once the file is exhausted.
    pub fn readline(&mut self) -> Result<Option<Vec<String>>> {
        let reader = self.reader.as_mut().ok_or(VoxcomError::LogMode("reading"))?;
        let mut record = csv::StringRecord::new();
        if self.state == LogState::Uninitialized {
            // Discard the header row.
            reader.read_record(&mut record)?;
            self.state = LogState::Active;
        }
        if reader.read_record(&mut record)? {
            Ok(Some(record.iter().map(str::to_string).collect()))
        } else {
            Ok(None)
        }
    }

    /// Flush and release the file handle. Safe with zero prior operations.
    pub fn close(mut self) -> Result<()> {
        if let Some(writer) = self.writer.as_mut() {
            writer.flush()?;
        }
        Ok(())
    }
}

/// Append `.csv` when the target name does not already mention it.
pub fn normalize_log_path(path: &Path) -> PathBuf {
    let text = path.to_string_lossy();
    if text.contains(".csv") {
        path.to_path_buf()
    } else {
        PathBuf::from(format!("{text}.csv"))
    }
}
