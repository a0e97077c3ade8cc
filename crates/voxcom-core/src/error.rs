use std::path::PathBuf;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum VoxcomError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid volume: {0}")]
    InvalidVolume(String),

    #[error("NIfTI error: {0}")]
    Nifti(#[from] nifti::NiftiError),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("center-of-mass command failed (status {status}): {detail}")]
    StatsFailed { status: i32, detail: String },

    #[error("log file {} already exists", .0.display())]
    LogExists(PathBuf),

    #[error("log is not open for {0}")]
    LogMode(&'static str),
}

pub type Result<T> = std::result::Result<T, VoxcomError>;
