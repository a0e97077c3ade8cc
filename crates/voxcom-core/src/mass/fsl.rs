use std::path::{Path, PathBuf};
use std::process::Command;

use tracing::debug;

use crate::error::{Result, VoxcomError};
use crate::mass::CoordSpace;

/// Runner for the external `fslstats` tool.
#[derive(Clone, Debug)]
pub struct FslStats {
    /// Executable to invoke; a bare name is resolved via PATH.
    pub command: PathBuf,
}

impl Default for FslStats {
    fn default() -> Self {
        Self {
            command: PathBuf::from("fslstats"),
        }
    }
}

impl FslStats {
    /// Invoke `fslstats <file> -c|-C` and parse the three reported
    /// coordinates.
    pub fn center_of_mass(&self, path: &Path, space: CoordSpace) -> Result<[f64; 3]> {
        debug!(
            command = %self.command.display(),
            file = %path.display(),
            flag = space.stats_flag(),
            "invoking fslstats"
        );
        let output = Command::new(&self.command)
            .arg(path)
            .arg(space.stats_flag())
            .output()?;

        if !output.status.success() {
            return Err(VoxcomError::StatsFailed {
                status: output.status.code().unwrap_or(-1),
                detail: String::from_utf8_lossy(&output.stderr).trim().to_string(),
            });
        }

        let stdout = String::from_utf8_lossy(&output.stdout);
        parse_coords(&stdout)
    }
}

/// Parse exactly three whitespace-separated floats.
fn parse_coords(text: &str) -> Result<[f64; 3]> {
    let values: Vec<f64> = text
        .split_whitespace()
        .map(str::parse)
        .collect::<std::result::Result<_, _>>()
        .map_err(|_| VoxcomError::StatsFailed {
            status: 0,
            detail: format!("unparseable coordinates: {:?}", text.trim()),
        })?;

    match values[..] {
        [x, y, z] => Ok([x, y, z]),
        _ => Err(VoxcomError::StatsFailed {
            status: 0,
            detail: format!("expected 3 coordinates, got {}", values.len()),
        }),
    }
}
