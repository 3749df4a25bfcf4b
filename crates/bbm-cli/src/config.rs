//! # CLI Configuration
//!
//! Settings come from an optional YAML file:
//!
//! ```yaml
//! data:
//!   measurements_path: ./messungen
//! contract:
//!   download: { minimum_mbps: 150, normal_mbps: 210, maximum_mbps: 250 }
//!   upload:   { minimum_mbps: 15,  normal_mbps: 30,  maximum_mbps: 40 }
//! methodology:
//!   min_measurements: 30
//! ```
//!
//! File lookup: `--config`, else `BBM_CONFIG`, else `./config.yaml` when
//! present, else built-in defaults. Unknown top-level sections are ignored
//! so a config file shared with other tools still loads.

use std::path::{Path, PathBuf};

use bbm_compliance::Methodology;
use bbm_core::{ContractProfile, Direction, DirectionProfile};
use serde::{Deserialize, Serialize};

/// Config file looked up in the working directory when none is given.
pub const DEFAULT_CONFIG_FILE: &str = "config.yaml";

/// Measurement data location.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DataSettings {
    /// Directory scanned for `Breitbandmessung_*.csv` files.
    pub measurements_path: PathBuf,
}

impl Default for DataSettings {
    fn default() -> Self {
        Self {
            measurements_path: PathBuf::from("."),
        }
    }
}

/// Contract speeds for one direction, any of which may be left to flags.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DirectionSettings {
    pub minimum_mbps: Option<f64>,
    pub normal_mbps: Option<f64>,
    pub maximum_mbps: Option<f64>,
}

impl DirectionSettings {
    /// Overlay `other` on top of `self`; set fields in `other` win.
    pub fn overlay(self, other: DirectionSettings) -> Self {
        Self {
            minimum_mbps: other.minimum_mbps.or(self.minimum_mbps),
            normal_mbps: other.normal_mbps.or(self.normal_mbps),
            maximum_mbps: other.maximum_mbps.or(self.maximum_mbps),
        }
    }

    fn resolve(&self, direction: Direction) -> Result<DirectionProfile, ConfigError> {
        let minimum = self.minimum_mbps.ok_or(ConfigError::MissingContract {
            direction,
            field: "minimum_mbps",
            flag: "min",
        })?;
        let normal = self.normal_mbps.ok_or(ConfigError::MissingContract {
            direction,
            field: "normal_mbps",
            flag: "normal",
        })?;
        let profile = DirectionProfile::new(minimum, normal);
        Ok(match self.maximum_mbps {
            Some(maximum) => profile.with_maximum(maximum),
            None => profile,
        })
    }
}

/// Contract speeds for both directions.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ContractSettings {
    pub download: DirectionSettings,
    pub upload: DirectionSettings,
}

impl ContractSettings {
    /// Overlay `other` on top of `self`, direction by direction.
    pub fn overlay(self, other: ContractSettings) -> Self {
        Self {
            download: self.download.overlay(other.download),
            upload: self.upload.overlay(other.upload),
        }
    }

    /// Build a complete contract profile.
    ///
    /// # Errors
    ///
    /// [`ConfigError::MissingContract`] naming the first unset speed.
    /// Consistency of the speeds is checked later by the evaluator.
    pub fn resolve(&self) -> Result<ContractProfile, ConfigError> {
        Ok(ContractProfile::new(
            self.download.resolve(Direction::Download)?,
            self.upload.resolve(Direction::Upload)?,
        ))
    }
}

/// Everything the CLI reads from its config file.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub data: DataSettings,
    pub contract: ContractSettings,
    pub methodology: Methodology,
}

impl Settings {
    /// Parse settings from YAML text. An empty document yields defaults.
    ///
    /// # Errors
    ///
    /// [`ConfigError::Parse`] if the YAML is malformed or a field has the
    /// wrong type.
    pub fn from_yaml_str(text: &str, origin: &Path) -> Result<Self, ConfigError> {
        if text.trim().is_empty() {
            return Ok(Self::default());
        }
        serde_yaml::from_str(text).map_err(|source| ConfigError::Parse {
            path: origin.to_path_buf(),
            source,
        })
    }

    /// Read settings from a file.
    ///
    /// # Errors
    ///
    /// [`ConfigError::Read`] if the file cannot be read, or
    /// [`ConfigError::Parse`] if it is not valid settings YAML.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_yaml_str(&text, path)
    }

    /// Load settings following the lookup order.
    ///
    /// `explicit` is the `--config` / `BBM_CONFIG` value. An explicit path
    /// must exist; the implicit `./config.yaml` is optional.
    ///
    /// # Errors
    ///
    /// See [`Settings::from_file`].
    pub fn load(explicit: Option<&Path>, working_dir: &Path) -> Result<Self, ConfigError> {
        if let Some(path) = explicit {
            tracing::debug!(path = %path.display(), "loading configuration");
            return Self::from_file(path);
        }
        let implicit = working_dir.join(DEFAULT_CONFIG_FILE);
        if implicit.is_file() {
            tracing::debug!(path = %implicit.display(), "loading configuration");
            return Self::from_file(&implicit);
        }
        tracing::debug!("no configuration file, using defaults");
        Ok(Self::default())
    }

    /// Replace the measurement directory when an override is given.
    pub fn with_data_path(mut self, data_path: Option<PathBuf>) -> Self {
        if let Some(path) = data_path {
            self.data.measurements_path = path;
        }
        self
    }
}

/// CLI configuration errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("cannot read config file {path}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("invalid config file {path}: {source}")]
    Parse {
        path: PathBuf,
        source: serde_yaml::Error,
    },
    #[error("contract {direction} {field} is not set (config `contract.{direction}.{field}` or --{direction}-{flag})")]
    MissingContract {
        direction: Direction,
        field: &'static str,
        /// Suffix of the command-line flag that sets it.
        flag: &'static str,
    },
}
