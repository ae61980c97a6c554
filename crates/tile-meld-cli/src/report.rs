//! JSON input and report formats.

use std::{fs, path::Path};

use serde::{Deserialize, Serialize};
use tile_meld_core::{boxes_from_contours, Contour, ContourFilter, MeldIoError, TileBox};

/// Boxes and/or contours detected in one frame.
#[derive(Debug, Default, Deserialize)]
pub struct MeldInput {
    #[serde(default)]
    pub boxes: Vec<TileBox>,
    #[serde(default)]
    pub contours: Vec<Contour>,
}

impl MeldInput {
    pub fn load_json(path: impl AsRef<Path>) -> Result<Self, MeldIoError> {
        let raw = fs::read_to_string(path)?;
        Ok(serde_json::from_str(&raw)?)
    }

    /// Explicit boxes first, then boxes of the contours `filter` accepts.
    pub fn into_boxes(self, filter: &ContourFilter) -> Vec<TileBox> {
        let mut boxes = self.boxes;
        boxes.extend(boxes_from_contours(&self.contours, filter));
        boxes
    }
}

#[derive(Debug, Serialize)]
pub struct MeldReport {
    pub input_path: String,
    pub config_path: Option<String>,
    pub threshold: f64,
    pub num_contours: usize,
    pub num_input_boxes: usize,
    pub passes: usize,
    pub did_meld: bool,
    pub melds: Vec<TileBox>,
    pub crops: Vec<String>,
}

impl MeldReport {
    pub fn to_json(&self) -> Result<String, MeldIoError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn write_json(&self, path: impl AsRef<Path>) -> Result<(), MeldIoError> {
        let path = path.as_ref();
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(path, self.to_json()?)?;
        Ok(())
    }
}
