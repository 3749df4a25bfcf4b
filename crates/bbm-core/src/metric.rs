//! # Metrics and Directions
//!
//! `Metric` names the three numeric quantities of a speed test. `Direction`
//! is the subset that is gated by the compliance methodology; latency is
//! reported but never gated.

use serde::{Deserialize, Serialize};
use std::str::FromStr;

use crate::error::CoreError;
use crate::record::MeasurementRecord;

/// A numeric metric carried by every measurement record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Metric {
    /// Download throughput in Mbit/s.
    Download,
    /// Upload throughput in Mbit/s.
    Upload,
    /// Round-trip latency ("Laufzeit") in milliseconds.
    Latency,
}

impl Metric {
    /// All metrics in canonical order.
    pub fn all() -> &'static [Metric] {
        &[Self::Download, Self::Upload, Self::Latency]
    }

    /// snake_case identifier, identical to the serde representation.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Download => "download",
            Self::Upload => "upload",
            Self::Latency => "latency",
        }
    }

    /// Display unit of the metric.
    pub fn unit(&self) -> &'static str {
        match self {
            Self::Download | Self::Upload => "Mbit/s",
            Self::Latency => "ms",
        }
    }

    /// Read this metric from a record as `f64`.
    pub fn value_of(&self, record: &MeasurementRecord) -> f64 {
        match self {
            Self::Download => record.download_mbps,
            Self::Upload => record.upload_mbps,
            Self::Latency => record.latency_ms as f64,
        }
    }
}

impl std::fmt::Display for Metric {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Metric {
    type Err = CoreError;

    /// Parse a metric name. `ping` is accepted as an alias for `latency`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "download" => Ok(Self::Download),
            "upload" => Ok(Self::Upload),
            "latency" | "ping" => Ok(Self::Latency),
            _ => Err(CoreError::UnknownMetric(s.to_string())),
        }
    }
}

/// A gated transfer direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Direction {
    /// Download.
    Download,
    /// Upload.
    Upload,
}

impl Direction {
    /// Both directions in canonical order.
    pub fn all() -> &'static [Direction] {
        &[Self::Download, Self::Upload]
    }

    /// snake_case identifier.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Download => "download",
            Self::Upload => "upload",
        }
    }

    /// The metric measuring this direction.
    pub fn metric(&self) -> Metric {
        match self {
            Self::Download => Metric::Download,
            Self::Upload => Metric::Upload,
        }
    }

    /// Measured speed of this direction in Mbit/s.
    pub fn speed_of(&self, record: &MeasurementRecord) -> f64 {
        match self {
            Self::Download => record.download_mbps,
            Self::Upload => record.upload_mbps,
        }
    }
}

impl std::fmt::Display for Direction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Direction {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "download" => Ok(Self::Download),
            "upload" => Ok(Self::Upload),
            _ => Err(CoreError::UnknownDirection(s.to_string())),
        }
    }
}
