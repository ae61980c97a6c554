use std::{fs, path::Path};

use serde::{Deserialize, Serialize};

use crate::contour::ContourFilter;
use crate::error::MeldIoError;
use crate::meld::{meld_adjacent, meld_until_stable, StableMeld};
use crate::tile_box::TileBox;

/// Parameters for melding tile boxes.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct MeldParams {
    /// Boxes closer than this (pixels, strict) are merged.
    #[serde(default = "default_threshold")]
    pub threshold: f64,
    /// Area window applied to contours before boxing them.
    #[serde(default)]
    pub contour_filter: ContourFilter,
    /// Extra pixels kept around each meld when cropping.
    #[serde(default = "default_crop_padding")]
    pub crop_padding: i32,
    /// Repeat melding on the melds until nothing changes.
    #[serde(default)]
    pub until_stable: bool,
    /// Upper bound on passes when `until_stable` is set.
    #[serde(default = "default_max_passes")]
    pub max_passes: usize,
}

fn default_threshold() -> f64 {
    10.0
}

fn default_crop_padding() -> i32 {
    10
}

fn default_max_passes() -> usize {
    16
}

impl Default for MeldParams {
    fn default() -> Self {
        Self {
            threshold: default_threshold(),
            contour_filter: ContourFilter::default(),
            crop_padding: default_crop_padding(),
            until_stable: false,
            max_passes: default_max_passes(),
        }
    }
}

impl MeldParams {
    /// Load a JSON config from disk. Missing fields take their defaults.
    pub fn load_json(path: impl AsRef<Path>) -> Result<Self, MeldIoError> {
        let raw = fs::read_to_string(path)?;
        Ok(serde_json::from_str(&raw)?)
    }

    /// Write this config to disk as pretty JSON.
    pub fn write_json(&self, path: impl AsRef<Path>) -> Result<(), MeldIoError> {
        let json = serde_json::to_string_pretty(self)?;
        fs::write(path, json)?;
        Ok(())
    }

    /// Meld `boxes` with these settings: a single pass, or repeated passes
    /// when `until_stable` is set.
    pub fn run(&self, boxes: &[TileBox]) -> StableMeld {
        if self.until_stable {
            meld_until_stable(boxes, self.threshold, self.max_passes)
        } else {
            StableMeld {
                result: meld_adjacent(boxes, self.threshold),
                passes: 1,
            }
        }
    }
}
