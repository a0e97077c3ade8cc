//! Centroid evaluation and batch checking.
//!
//! `CenterCheck` measures one volume and classifies it against a distance
//! threshold. `CheckRunner` validates candidate paths, evaluates the valid
//! ones and appends one log row per input, flagged or measured.

use std::fs;
use std::path::{Path, PathBuf};

use tracing::{info, warn};

use crate::config::CheckConfig;
use crate::error::{Result, VoxcomError};
use crate::mass::{CoordSpace, MassSource};
use crate::report::{normalize_log_path, CsvLog, LogMode};

/// Field value for columns that do not apply to a row.
pub const NA: &str = "na";

/// A measured center of mass with its classification.
#[derive(Clone, Debug, PartialEq)]
pub struct Centroid {
    pub coords: [f64; 3],
    /// Euclidean distance from the coordinate origin.
    pub distance: f64,
    pub flag: CentroidFlag,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CentroidFlag {
    Centered,
    OffCenter,
}

impl CentroidFlag {
    /// The warning-flags column value for this classification.
    pub fn label(&self) -> &'static str {
        match self {
            CentroidFlag::Centered => "",
            CentroidFlag::OffCenter => "!off center",
        }
    }
}

/// Outcome of evaluating one volume.
#[derive(Clone, Debug, PartialEq)]
pub enum CheckOutcome {
    Measured(Centroid),
    /// The measurement source reported an error; carries its detail text.
    Failed { detail: String },
}

impl CheckOutcome {
    /// The x, y, z, distance and warning-flags column values.
    pub fn fields(&self) -> [String; 5] {
        match self {
            CheckOutcome::Measured(c) => [
                c.coords[0].to_string(),
                c.coords[1].to_string(),
                c.coords[2].to_string(),
                c.distance.to_string(),
                c.flag.label().to_string(),
            ],
            CheckOutcome::Failed { .. } => [
                NA.to_string(),
                NA.to_string(),
                NA.to_string(),
                NA.to_string(),
                "FAILED".to_string(),
            ],
        }
    }
}

/// Evaluates the center of mass of a volume file against a threshold.
#[derive(Clone, Debug)]
pub struct CenterCheck {
    source: MassSource,
    space: CoordSpace,
    threshold: f64,
}

impl CenterCheck {
    pub fn new(source: MassSource, space: CoordSpace, threshold: f64) -> Self {
        Self {
            source,
            space,
            threshold,
        }
    }

    /// Measure and classify one volume. Measurement errors become a
    /// `Failed` outcome; nothing propagates past this layer.
    pub fn run(&self, path: &Path) -> CheckOutcome {
        match self.source.measure(path, self.space) {
            Ok(coords) => {
                let distance = coords.iter().map(|c| c * c).sum::<f64>().sqrt();
                // Strictly greater: a centroid exactly at the threshold is
                // still centered.
                let flag = if distance > self.threshold {
                    CentroidFlag::OffCenter
                } else {
                    CentroidFlag::Centered
                };
                info!(
                    file = %path.display(),
                    x = coords[0],
                    y = coords[1],
                    z = coords[2],
                    distance,
                    flag = flag.label(),
                    "center of mass"
                );
                CheckOutcome::Measured(Centroid {
                    coords,
                    distance,
                    flag,
                })
            }
            Err(e) => {
                warn!(file = %path.display(), error = %e, "center of mass failed");
                CheckOutcome::Failed {
                    detail: e.to_string(),
                }
            }
        }
    }
}

/// Why a candidate path was rejected before evaluation.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PathIssue {
    /// The path does not exist on disk.
    MissingPath,
    /// No subject code anywhere in the path.
    BadDirectory,
    /// The filename carries no `.nii` marker.
    BadFiletype,
}

impl PathIssue {
    /// The warning-flags column value for this rejection.
    pub fn flag_message(&self) -> &'static str {
        match self {
            PathIssue::MissingPath => "!path does not exist",
            PathIssue::BadDirectory => "!file not in a valid directory",
            PathIssue::BadFiletype => "!invalid filetype",
        }
    }
}

/// Find a subject code in `text`: a `B` followed by two digits, a dash and
/// three digits, e.g. `B05-206`.
pub fn subject_code(text: &str) -> Option<&str> {
    let bytes = text.as_bytes();
    bytes
        .windows(7)
        .position(|w| {
            w[0] == b'B'
                && w[1].is_ascii_digit()
                && w[2].is_ascii_digit()
                && w[3] == b'-'
                && w[4].is_ascii_digit()
                && w[5].is_ascii_digit()
                && w[6].is_ascii_digit()
        })
        .map(|start| &text[start..start + 7])
}

/// Validate a candidate path. The first failing rule wins; on success the
/// extracted subject code is returned.
pub fn validate(path: &Path) -> std::result::Result<String, PathIssue> {
    if !path.exists() {
        return Err(PathIssue::MissingPath);
    }
    let text = path.to_string_lossy();
    let code = subject_code(&text).ok_or(PathIssue::BadDirectory)?;
    let filename = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();
    if !filename.contains(".nii") {
        return Err(PathIssue::BadFiletype);
    }
    Ok(code.to_string())
}

/// Validates, evaluates and logs a sequence of candidate volumes.
pub struct CheckRunner {
    check: CenterCheck,
    log: CsvLog,
}

impl CheckRunner {
    /// Open the target log and build the evaluator.
    ///
    /// The overwrite guard runs once here: when the (normalized) log target
    /// already exists and `config.overwrite` is false, construction fails
    /// with [`VoxcomError::LogExists`] and the session writes nothing.
    pub fn create(output: &Path, mode: LogMode, config: &CheckConfig) -> Result<Self> {
        let target = normalize_log_path(output);
        if target.exists() && !config.overwrite {
            return Err(VoxcomError::LogExists(target));
        }
        let log = CsvLog::open(output, mode)?;
        let check = CenterCheck::new(config.mass_source(), config.space, config.threshold);
        Ok(Self { check, log })
    }

    /// The normalized path of the underlying log.
    pub fn log_path(&self) -> &Path {
        self.log.path()
    }

    /// Check one candidate path and append its row.
    ///
    /// Validation failures produce a flagged sentinel row instead of an
    /// evaluation; only log I/O errors propagate.
    pub fn run(&mut self, path: &Path) -> Result<Vec<String>> {
        let text = path.to_string_lossy().into_owned();
        let row: Vec<String> = match validate(path) {
            Ok(id) => {
                let outcome = self.check.run(path);
                let mut row = vec![text, id];
                row.extend(outcome.fields());
                row
            }
            Err(issue) => {
                warn!(file = %path.display(), flag = issue.flag_message(), "rejected");
                let mut row = vec![text];
                row.extend([NA; 5].map(str::to_string));
                row.push(issue.flag_message().to_string());
                row
            }
        };
        self.log.writeline(&row)?;
        Ok(row)
    }

    /// Run every path listed in a manifest file, one per line, in order.
    /// A file's validation failure never aborts the batch.
    pub fn run_manifest(&mut self, manifest: &Path) -> Result<Vec<Vec<String>>> {
        let contents = fs::read_to_string(manifest)?;
        let mut rows = Vec::new();
        for line in contents.lines() {
            let line = line.trim();
            if line.is_empty() {
                continue;
            }
            rows.push(self.run(Path::new(line))?);
        }
        Ok(rows)
    }

    /// Flush and close the underlying log.
    pub fn finish(self) -> Result<()> {
        self.log.close()
    }
}

/// Default log destination for a checked input: `data.csv` next to it.
pub fn default_log_path(input: &Path) -> PathBuf {
    input
        .parent()
        .filter(|p| !p.as_os_str().is_empty())
        .unwrap_or_else(|| Path::new("."))
        .join("data.csv")
}
