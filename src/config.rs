use crate::error::ConfigError;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// Tunables for one curation call.
///
/// Passed into the engine explicitly so that callers and tests can vary the
/// thresholds per run. A JSON file may set any subset of the fields; the
/// rest fall back to [`CurationConfig::default`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CurationConfig {
    /// Largest median Hamming distance an image may have to the rest of the pool.
    pub cluster_threshold: u32,
    /// Images whose shorter side is below this many pixels are dropped.
    pub min_short_side: u32,
    pub aspect_min: f64,
    pub aspect_max: f64,
    /// Applied when width/height falls outside `aspect_min..=aspect_max`.
    pub aspect_penalty: f64,
    pub jpeg_quality: u8,
}

impl Default for CurationConfig {
    fn default() -> Self {
        Self {
            cluster_threshold: 18,
            min_short_side: 400,
            aspect_min: 0.5,
            aspect_max: 2.0,
            aspect_penalty: 0.3,
            jpeg_quality: 88,
        }
    }
}

impl CurationConfig {
    /// Load a config from a JSON file and validate it.
    pub fn from_json_file(path: &Path) -> Result<Self, ConfigError> {
        let raw = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        let config: Self = serde_json::from_str(&raw).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(1..=100).contains(&self.jpeg_quality) {
            return Err(ConfigError::Invalid {
                field: "jpeg_quality",
                message: format!("must be within 1..=100, got {}", self.jpeg_quality),
            });
        }
        for (field, value) in [
            ("aspect_min", self.aspect_min),
            ("aspect_max", self.aspect_max),
            ("aspect_penalty", self.aspect_penalty),
        ] {
            if !value.is_finite() || value < 0.0 {
                return Err(ConfigError::Invalid {
                    field,
                    message: format!("must be a finite, non-negative number, got {value}"),
                });
            }
        }
        if self.aspect_min >= self.aspect_max {
            return Err(ConfigError::Invalid {
                field: "aspect_min",
                message: format!(
                    "must be below aspect_max ({} >= {})",
                    self.aspect_min, self.aspect_max
                ),
            });
        }
        Ok(())
    }
}

/// How many images a product should end up with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SelectionBounds {
    pub min: usize,
    pub max: usize,
}

impl SelectionBounds {
    pub fn new(min: usize, max: usize) -> Result<Self, ConfigError> {
        if min == 0 {
            return Err(ConfigError::Invalid {
                field: "min",
                message: "must be at least 1".to_string(),
            });
        }
        if min > max {
            return Err(ConfigError::Invalid {
                field: "min",
                message: format!("must not exceed max ({min} > {max})"),
            });
        }
        Ok(Self { min, max })
    }
}

impl Default for SelectionBounds {
    fn default() -> Self {
        Self { min: 3, max: 5 }
    }
}
