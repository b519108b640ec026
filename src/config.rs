//! Runtime configuration: enabled clusters and TLV scratch buffer size.

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

use crate::codec::DEFAULT_BUFFER_SIZE;
use crate::error::Result;

/// Upper bound for the TLV scratch buffer. A single scalar attribute never
/// needs more than a few bytes.
pub const MAX_BUFFER_SIZE: usize = 4096;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Names of the vendor clusters to register (`eve_energy`, `weather_station`).
    pub enabled_clusters: Vec<String>,
    /// Scratch buffer size used when encoding attribute values to TLV.
    pub tlv_buffer_size: usize,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            enabled_clusters: vec!["eve_energy".to_string(), "weather_station".to_string()],
            tlv_buffer_size: DEFAULT_BUFFER_SIZE,
        }
    }
}

impl Config {
    pub fn from_env() -> Self {
        Self::default().with_env_overrides().clamped()
    }

    /// Load a JSON config file. Missing keys fall back to defaults and
    /// environment variables still take precedence.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let content = fs::read_to_string(path.as_ref())?;
        let config: Self = serde_json::from_str(&content)?;

        Ok(config.with_env_overrides().clamped())
    }

    fn with_env_overrides(mut self) -> Self {
        if let Ok(clusters) = std::env::var("VENDOR_CLUSTERS") {
            self.enabled_clusters = parse_cluster_list(&clusters);
        }
        if let Ok(size) = std::env::var("TLV_BUFFER_SIZE")
            && let Ok(s) = size.parse()
        {
            self.tlv_buffer_size = s;
        }

        self
    }

    fn clamped(mut self) -> Self {
        if self.tlv_buffer_size > MAX_BUFFER_SIZE {
            log::warn!(
                "TLV buffer size {} exceeds maximum, using {}",
                self.tlv_buffer_size,
                MAX_BUFFER_SIZE
            );
            self.tlv_buffer_size = MAX_BUFFER_SIZE;
        }

        self
    }
}

fn parse_cluster_list(value: &str) -> Vec<String> {
    value
        .split(',')
        .map(str::trim)
        .filter(|name| !name.is_empty())
        .map(str::to_string)
        .collect()
}
