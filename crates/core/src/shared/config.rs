use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::shared::constants::{
    ANNOTATION_EXTENSION, CONFIG_DIR_NAME, CONFIG_FILE_NAME, DEFAULT_IMAGE_EXTENSION,
    DEFAULT_MATCH_THRESHOLD,
};

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("failed to read config {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid config {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
    #[error("threshold must be a finite percentage between 0 and 100, got {0}")]
    Threshold(f64),
    #[error("workers must be at least 1")]
    Workers,
    #[error("unknown tie-break rule '{0}' (expected 'legacy' or 'first-overlap')")]
    TieBreak(String),
    #[error("{0} extension must not be empty")]
    EmptyExtension(&'static str),
}

/// What the per-image matcher does after finding an overlapping box whose
/// label differs from the scanned annotation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TieBreak {
    /// Record the disagreement and keep scanning for a same-label box.
    /// One annotation may therefore yield several disagreeing records.
    #[default]
    ContinueOnLabelMismatch,
    /// The first overlapping box ends the scan whatever its label.
    StopAtFirstOverlap,
}

impl std::str::FromStr for TieBreak {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "legacy" | "continue_on_label_mismatch" => Ok(TieBreak::ContinueOnLabelMismatch),
            "first-overlap" | "stop_at_first_overlap" => Ok(TieBreak::StopAtFirstOverlap),
            other => Err(ConfigError::TieBreak(other.to_string())),
        }
    }
}

impl std::fmt::Display for TieBreak {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TieBreak::ContinueOnLabelMismatch => write!(f, "legacy"),
            TieBreak::StopAtFirstOverlap => write!(f, "first-overlap"),
        }
    }
}

/// Parameters for one comparison run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ComparisonConfig {
    pub threshold: f64,
    pub tie_break: TieBreak,
    /// Also run the matcher from B's perspective and report the true
    /// unmatched-in-B count next to the legacy subtraction.
    pub symmetric: bool,
    pub annotation_extension: String,
    pub image_extension: String,
    pub workers: usize,
}

impl Default for ComparisonConfig {
    fn default() -> Self {
        Self {
            threshold: DEFAULT_MATCH_THRESHOLD,
            tie_break: TieBreak::default(),
            symmetric: false,
            annotation_extension: ANNOTATION_EXTENSION.to_string(),
            image_extension: DEFAULT_IMAGE_EXTENSION.to_string(),
            workers: 1,
        }
    }
}

impl ComparisonConfig {
    /// `<config dir>/annodiff/config.json` for the current platform.
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|d| d.join(CONFIG_DIR_NAME).join(CONFIG_FILE_NAME))
    }

    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let json = fs::read_to_string(path).map_err(|e| ConfigError::Read {
            path: path.to_path_buf(),
            source: e,
        })?;
        let config: Self = serde_json::from_str(&json).map_err(|e| ConfigError::Parse {
            path: path.to_path_buf(),
            source: e,
        })?;
        config.validate()?;
        Ok(config)
    }

    /// Loads the explicit file if given, else the platform default file if
    /// it exists, else built-in defaults.
    pub fn load(explicit: Option<&Path>) -> Result<Self, ConfigError> {
        if let Some(path) = explicit {
            return Self::from_file(path);
        }
        match Self::default_path() {
            Some(path) if path.is_file() => {
                log::debug!("Loading config from {}", path.display());
                Self::from_file(&path)
            }
            _ => Ok(Self::default()),
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if !self.threshold.is_finite() || !(0.0..=100.0).contains(&self.threshold) {
            return Err(ConfigError::Threshold(self.threshold));
        }
        if self.workers == 0 {
            return Err(ConfigError::Workers);
        }
        if self.annotation_extension.is_empty() {
            return Err(ConfigError::EmptyExtension("annotation"));
        }
        if self.image_extension.is_empty() {
            return Err(ConfigError::EmptyExtension("image"));
        }
        Ok(())
    }
}
