use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::consts::DEFAULT_THRESHOLD;
use crate::mass::{CoordSpace, FslStats, MassSource};

/// Which measurement backend a check uses.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SourceKind {
    /// Shell out to the external fslstats tool.
    #[default]
    Fslstats,
    /// Measure in-process from the decoded volume.
    Native,
}

/// Settings for center-of-mass checks, loadable from TOML.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct CheckConfig {
    /// Distance from the origin above which a volume is flagged.
    #[serde(default = "default_threshold")]
    pub threshold: f64,

    /// Coordinate space for measurement and threshold.
    #[serde(default)]
    pub space: CoordSpace,

    #[serde(default)]
    pub source: SourceKind,

    /// fslstats executable; only used with the fslstats source.
    #[serde(default = "default_fsl_command")]
    pub fsl_command: PathBuf,

    /// When false, refuse to touch an existing log file.
    #[serde(default = "default_overwrite")]
    pub overwrite: bool,
}

impl Default for CheckConfig {
    fn default() -> Self {
        Self {
            threshold: DEFAULT_THRESHOLD,
            space: CoordSpace::default(),
            source: SourceKind::default(),
            fsl_command: default_fsl_command(),
            overwrite: true,
        }
    }
}

impl CheckConfig {
    /// Build the measurement backend these settings describe.
    pub fn mass_source(&self) -> MassSource {
        match self.source {
            SourceKind::Native => MassSource::Native,
            SourceKind::Fslstats => MassSource::Fsl(FslStats {
                command: self.fsl_command.clone(),
            }),
        }
    }
}

fn default_threshold() -> f64 {
    DEFAULT_THRESHOLD
}

fn default_fsl_command() -> PathBuf {
    PathBuf::from("fslstats")
}

fn default_overwrite() -> bool {
    true
}
