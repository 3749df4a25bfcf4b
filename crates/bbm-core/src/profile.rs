//! # Contract Profiles
//!
//! The contractually declared speeds a measurement campaign is judged
//! against. Profiles are plain caller input; their consistency is checked by
//! the compliance evaluator, which reports violations as configuration
//! errors rather than data errors.

use serde::{Deserialize, Serialize};

use crate::metric::Direction;

/// Declared speeds for one direction, in Mbit/s.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DirectionProfile {
    /// Guaranteed floor ("minimale Geschwindigkeit").
    pub minimum_mbps: f64,
    /// Advertised typical value ("normalerweise zur Verfügung stehende Geschwindigkeit").
    pub normal_mbps: f64,
    /// Advertised maximum, if the contract states one.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub maximum_mbps: Option<f64>,
}

impl DirectionProfile {
    /// Profile without a declared maximum.
    pub fn new(minimum_mbps: f64, normal_mbps: f64) -> Self {
        Self {
            minimum_mbps,
            normal_mbps,
            maximum_mbps: None,
        }
    }

    /// Add a declared maximum.
    pub fn with_maximum(mut self, maximum_mbps: f64) -> Self {
        self.maximum_mbps = Some(maximum_mbps);
        self
    }
}

/// Declared speeds for both directions.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ContractProfile {
    /// Download speeds.
    pub download: DirectionProfile,
    /// Upload speeds.
    pub upload: DirectionProfile,
}

impl ContractProfile {
    /// Build from per-direction profiles.
    pub fn new(download: DirectionProfile, upload: DirectionProfile) -> Self {
        Self { download, upload }
    }

    /// Profile for a direction.
    pub fn for_direction(&self, direction: Direction) -> &DirectionProfile {
        match direction {
            Direction::Download => &self.download,
            Direction::Upload => &self.upload,
        }
    }
}
