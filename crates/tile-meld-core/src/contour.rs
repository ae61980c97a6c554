//! Contour filtering and conversion to boxes.
//!
//! Contours arrive already extracted (closed polygons in pixel
//! coordinates); this module only decides which ones become tile boxes.

use log::{debug, warn};
use nalgebra::Point2;
use serde::{Deserialize, Serialize};

use crate::tile_box::TileBox;

/// Closed polygon in pixel coordinates.
pub type Contour = Vec<Point2<i32>>;

/// Absolute polygon area (shoelace formula). Fewer than 3 points gives 0.
pub fn contour_area(points: &[Point2<i32>]) -> f64 {
    if points.len() < 3 {
        return 0.0;
    }
    // Each cross product needs 64 bits; their sum does not fit in `i64`.
    let mut twice = 0i128;
    for (k, p) in points.iter().enumerate() {
        let q = &points[(k + 1) % points.len()];
        twice += i128::from(p.x) * i128::from(q.y) - i128::from(q.x) * i128::from(p.y);
    }
    twice.abs() as f64 / 2.0
}

/// Area window for contours worth melding.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct ContourFilter {
    /// Contours must have strictly more area than this.
    #[serde(default = "default_min_area")]
    pub min_area: f64,
    /// Contours must have strictly less area than this.
    #[serde(default = "default_max_area")]
    pub max_area: f64,
}

fn default_min_area() -> f64 {
    100.0
}

fn default_max_area() -> f64 {
    100_000.0
}

impl Default for ContourFilter {
    fn default() -> Self {
        Self {
            min_area: default_min_area(),
            max_area: default_max_area(),
        }
    }
}

impl ContourFilter {
    pub fn accepts(&self, contour: &[Point2<i32>]) -> bool {
        if contour.is_empty() {
            return false;
        }
        let area = contour_area(contour);
        area > self.min_area && area < self.max_area
    }
}

/// Bounding boxes of the contours accepted by `filter`, in input order.
///
/// Accepted contours whose bounding box cannot be represented (a point on
/// `i32::MAX`) are logged and skipped.
pub fn boxes_from_contours(contours: &[Contour], filter: &ContourFilter) -> Vec<TileBox> {
    let mut boxes = Vec::with_capacity(contours.len());
    for (k, contour) in contours.iter().enumerate() {
        if !filter.accepts(contour) {
            continue;
        }
        match TileBox::bounding_points(contour) {
            Ok(b) => boxes.push(b),
            Err(err) => warn!("dropping contour {k}: {err}"),
        }
    }
    debug!(
        "kept {} of {} contours (area in ({}, {}))",
        boxes.len(),
        contours.len(),
        filter.min_area,
        filter.max_area
    );
    boxes
}
