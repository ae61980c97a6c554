//! Axis-aligned tile boxes and the predicates used to cluster them.
//!
//! A [`TileBox`] covers the closed pixel rectangle
//! `[start_x, end_x] × [start_y, end_y]` with `end = start + size`. All
//! predicates treat the boundary as part of the box, so two boxes sharing an
//! edge coordinate overlap and have distance 0.

use std::ops::RangeInclusive;

use nalgebra::Point2;
use serde::{Deserialize, Serialize};

use crate::error::GeometryError;

const BL: usize = 0;
const BR: usize = 1;
const TL: usize = 2;
const TR: usize = 3;

/// Serialized form of a [`TileBox`]: origin plus size.
///
/// Sizes are `i64` because a box spanning the whole `i32` range is wider
/// than `i32::MAX`.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct BoxSpec {
    pub x: i32,
    pub y: i32,
    pub width: i64,
    pub height: i64,
}

/// Immutable axis-aligned rectangle in integer pixel coordinates.
///
/// Corners are named with `y` growing "up": `bl = (start_x, start_y)`,
/// `br = (end_x, start_y)`, `tl = (start_x, end_y)`, `tr = (end_x, end_y)`.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "BoxSpec", into = "BoxSpec")]
pub struct TileBox {
    start_x: i32,
    end_x: i32,
    start_y: i32,
    end_y: i32,
    corners: [Point2<i32>; 4],
}

impl TileBox {
    /// Build a box from its origin and size.
    ///
    /// Fails with [`GeometryError::InvalidGeometry`] when `width` or `height`
    /// is negative or the far edge does not fit in `i32`.
    pub fn new(x: i32, y: i32, width: i32, height: i32) -> Result<Self, GeometryError> {
        Self::try_from(BoxSpec {
            x,
            y,
            width: width.into(),
            height: height.into(),
        })
    }

    /// Build a box from its extreme coordinates.
    ///
    /// Any `start <= end` pair is accepted, including spans wider than
    /// `i32::MAX`.
    pub fn from_bounds(
        start_x: i32,
        start_y: i32,
        end_x: i32,
        end_y: i32,
    ) -> Result<Self, GeometryError> {
        if end_x < start_x || end_y < start_y {
            return Err(GeometryError::InvalidGeometry {
                width: end_x as i64 - start_x as i64,
                height: end_y as i64 - start_y as i64,
            });
        }
        Ok(Self::from_extremes(start_x, start_y, end_x, end_y))
    }

    /// Bounding box of a set of pixel positions.
    ///
    /// Uses the pixel-grid convention of contour bounding rectangles: a
    /// single point yields a 1×1 box.
    pub fn bounding_points(points: &[Point2<i32>]) -> Result<Self, GeometryError> {
        let first = points.first().ok_or(GeometryError::EmptyInput)?;
        let (mut min_x, mut min_y, mut max_x, mut max_y) = (first.x, first.y, first.x, first.y);
        for p in &points[1..] {
            min_x = min_x.min(p.x);
            min_y = min_y.min(p.y);
            max_x = max_x.max(p.x);
            max_y = max_y.max(p.y);
        }
        let end_x = max_x.checked_add(1);
        let end_y = max_y.checked_add(1);
        match (end_x, end_y) {
            (Some(end_x), Some(end_y)) => Self::from_bounds(min_x, min_y, end_x, end_y),
            _ => Err(GeometryError::InvalidGeometry {
                width: i64::from(max_x) - i64::from(min_x) + 1,
                height: i64::from(max_y) - i64::from(min_y) + 1,
            }),
        }
    }

    /// Minimal box enclosing every box in `boxes`.
    pub fn meld<'a, I>(boxes: I) -> Result<Self, GeometryError>
    where
        I: IntoIterator<Item = &'a TileBox>,
    {
        boxes
            .into_iter()
            .copied()
            .reduce(|acc, b| acc.enclose(&b))
            .ok_or(GeometryError::EmptyInput)
    }

    /// Minimal box enclosing `self` and `other`.
    pub fn enclose(&self, other: &TileBox) -> TileBox {
        Self::from_extremes(
            self.start_x.min(other.start_x),
            self.start_y.min(other.start_y),
            self.end_x.max(other.end_x),
            self.end_y.max(other.end_y),
        )
    }

    // Callers guarantee `start <= end` on both axes.
    fn from_extremes(start_x: i32, start_y: i32, end_x: i32, end_y: i32) -> Self {
        Self {
            start_x,
            end_x,
            start_y,
            end_y,
            corners: [
                Point2::new(start_x, start_y),
                Point2::new(end_x, start_y),
                Point2::new(start_x, end_y),
                Point2::new(end_x, end_y),
            ],
        }
    }

    pub fn start_x(&self) -> i32 {
        self.start_x
    }

    pub fn end_x(&self) -> i32 {
        self.end_x
    }

    pub fn start_y(&self) -> i32 {
        self.start_y
    }

    pub fn end_y(&self) -> i32 {
        self.end_y
    }

    pub fn width(&self) -> i64 {
        i64::from(self.end_x) - i64::from(self.start_x)
    }

    pub fn height(&self) -> i64 {
        i64::from(self.end_y) - i64::from(self.start_y)
    }

    /// Both sides are below 2³², so the product fits `u64`.
    pub fn area(&self) -> u64 {
        self.width().unsigned_abs() * self.height().unsigned_abs()
    }

    /// Closed range `start_x..=end_x`.
    pub fn x_range(&self) -> RangeInclusive<i32> {
        self.start_x..=self.end_x
    }

    /// Closed range `start_y..=end_y`.
    pub fn y_range(&self) -> RangeInclusive<i32> {
        self.start_y..=self.end_y
    }

    /// Corners in `[bl, br, tl, tr]` order.
    pub fn corners(&self) -> &[Point2<i32>; 4] {
        &self.corners
    }

    pub fn center(&self) -> Point2<f64> {
        Point2::new(
            self.start_x as f64 + self.width() as f64 / 2.0,
            self.start_y as f64 + self.height() as f64 / 2.0,
        )
    }

    /// Whether `p` lies inside the box, boundary included.
    pub fn contains_point(&self, p: &Point2<i32>) -> bool {
        self.x_range().contains(&p.x) && self.y_range().contains(&p.y)
    }

    /// Whether `self` fully contains `other`.
    pub fn contains(&self, other: &TileBox) -> bool {
        self.start_x <= other.start_x
            && other.end_x <= self.end_x
            && self.start_y <= other.start_y
            && other.end_y <= self.end_y
    }

    /// Whether the boxes touch, intersect, or one contains the other.
    pub fn overlap(&self, other: &TileBox) -> bool {
        if other.corners.iter().any(|c| self.contains_point(c)) {
            return true;
        }
        if self.corners.iter().any(|c| other.contains_point(c)) {
            return true;
        }

        let (sx, sy) = (self.x_range(), self.y_range());
        let (ox, oy) = (other.x_range(), other.y_range());

        // Vertical edges of self crossing horizontal edges of other.
        for x in [self.start_x, self.end_x] {
            if ox.contains(&x) && (sy.contains(&other.start_y) || sy.contains(&other.end_y)) {
                return true;
            }
        }
        // Horizontal edges of self crossing vertical edges of other.
        for y in [self.start_y, self.end_y] {
            if oy.contains(&y) && (sx.contains(&other.start_x) || sx.contains(&other.end_x)) {
                return true;
            }
        }
        false
    }

    /// Shortest gap between the two boxes, 0 when they overlap.
    pub fn shortest_distance(&self, other: &TileBox) -> f64 {
        if self.overlap(other) {
            return 0.0;
        }

        let (sx, sy) = (self.x_range(), self.y_range());
        let (ox, oy) = (other.x_range(), other.y_range());

        // Side by side.
        if oy.contains(&self.start_y)
            || oy.contains(&self.end_y)
            || sy.contains(&other.start_y)
            || sy.contains(&other.end_y)
        {
            return gap(self.start_x, other.end_x).min(gap(self.end_x, other.start_x));
        }
        // Stacked.
        if ox.contains(&self.start_x)
            || ox.contains(&self.end_x)
            || sx.contains(&other.start_x)
            || sx.contains(&other.end_x)
        {
            return gap(self.start_y, other.end_y).min(gap(self.end_y, other.start_y));
        }

        let (mine, theirs) = match (self.start_x > other.end_x, self.start_y > other.end_y) {
            (true, true) => (BL, TR),
            (true, false) => (TL, BR),
            (false, true) => (BR, TL),
            (false, false) => (TR, BL),
        };
        euclid(&self.corners[mine], &other.corners[theirs])
    }

    /// This box grown by `padding` on every side and clamped to
    /// `[0, image_width] × [0, image_height]`.
    ///
    /// Returns `None` when nothing of the padded box lies inside the image.
    pub fn padded_within(
        &self,
        padding: i32,
        image_width: i32,
        image_height: i32,
    ) -> Option<TileBox> {
        let start_x = self.start_x.saturating_sub(padding).max(0);
        let start_y = self.start_y.saturating_sub(padding).max(0);
        let end_x = self.end_x.saturating_add(padding).min(image_width);
        let end_y = self.end_y.saturating_add(padding).min(image_height);
        if end_x <= start_x || end_y <= start_y {
            return None;
        }
        Some(Self::from_extremes(start_x, start_y, end_x, end_y))
    }
}

impl TryFrom<BoxSpec> for TileBox {
    type Error = GeometryError;

    /// Fails when a size is negative or the far edge does not fit in `i32`.
    fn try_from(spec: BoxSpec) -> Result<Self, Self::Error> {
        let invalid = GeometryError::InvalidGeometry {
            width: spec.width,
            height: spec.height,
        };
        if spec.width < 0 || spec.height < 0 {
            return Err(invalid);
        }
        let far_edge = |start: i32, size: i64| {
            i64::from(start)
                .checked_add(size)
                .and_then(|end| i32::try_from(end).ok())
                .ok_or(invalid)
        };
        let end_x = far_edge(spec.x, spec.width)?;
        let end_y = far_edge(spec.y, spec.height)?;
        Ok(Self::from_extremes(spec.x, spec.y, end_x, end_y))
    }
}

impl From<TileBox> for BoxSpec {
    fn from(b: TileBox) -> Self {
        BoxSpec {
            x: b.start_x,
            y: b.start_y,
            width: b.width(),
            height: b.height(),
        }
    }
}

#[inline]
fn gap(a: i32, b: i32) -> f64 {
    (a as i64 - b as i64).abs() as f64
}

#[inline]
fn euclid(a: &Point2<i32>, b: &Point2<i32>) -> f64 {
    let dx = a.x as f64 - b.x as f64;
    let dy = a.y as f64 - b.y as f64;
    dx.hypot(dy)
}
