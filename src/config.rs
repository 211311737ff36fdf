use std::fs;
use std::path::Path;

use serde::Deserialize;
use uom::si::f64::Length;

use crate::transmission::DEFAULT_REPRESENTATIVE_BANDS;

/// Parameters of a whole-building analysis.
#[derive(Clone, Debug, Deserialize, PartialEq)]
#[serde(default)]
pub struct AnalysisConfig {
    /// Interior reference sound pressure level Lp_in in dB.
    pub interior_level: f64,
    /// Receiver distance for the exterior pressure level, skipped if unset.
    pub receiver_distance: Option<Length>,
    pub segmentation: SegmentationConfig,
    /// Bands averaged into single-number summaries.
    pub representative_bands: Vec<u32>,
    pub heatmap: HeatmapConfig,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        AnalysisConfig {
            interior_level: 70.0,
            receiver_distance: None,
            segmentation: SegmentationConfig::default(),
            representative_bands: DEFAULT_REPRESENTATIVE_BANDS.to_vec(),
            heatmap: HeatmapConfig::default(),
        }
    }
}

impl AnalysisConfig {
    pub fn load<P: AsRef<Path>>(path: P) -> anyhow::Result<Self> {
        let string = fs::read_to_string(path)?;
        Self::from_json(&string)
    }

    pub fn from_json(json: &str) -> anyhow::Result<Self> {
        let config: AnalysisConfig = json5::from_str(json)?;
        if config.representative_bands.is_empty() {
            anyhow::bail!("representative_bands must not be empty");
        }
        Ok(config)
    }
}

/// Grid resolution used when splitting elements into segments.
#[derive(Clone, Debug, Deserialize, PartialEq)]
#[serde(default)]
pub struct SegmentationConfig {
    /// Columns along a wall.
    pub horizontal_divisions: usize,
    /// Rows up a wall.
    pub vertical_divisions: usize,
    /// Columns and rows over a floor or ceiling bounding box.
    pub surface_divisions: usize,
    /// Residual base material below this many m² is dropped from a cell.
    pub min_residual_area: f64,
}

impl Default for SegmentationConfig {
    fn default() -> Self {
        SegmentationConfig {
            horizontal_divisions: 3,
            vertical_divisions: 1,
            surface_divisions: 3,
            min_residual_area: 0.001,
        }
    }
}

#[derive(Clone, Debug, Deserialize, PartialEq)]
#[serde(default)]
pub struct HeatmapConfig {
    pub samples_per_wall: usize,
}

impl Default for HeatmapConfig {
    fn default() -> Self {
        HeatmapConfig {
            samples_per_wall: 5,
        }
    }
}
