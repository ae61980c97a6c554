//! Box geometry and adjacency melding for tile region detection.
//!
//! Tiles found in a camera frame arrive as contours; their bounding boxes
//! are clustered by gap distance and every cluster is replaced by one
//! enclosing box (a "meld") that downstream code crops and identifies.
//!
//! ```
//! use tile_meld_core::{meld_adjacent, TileBox};
//!
//! # fn main() -> Result<(), tile_meld_core::GeometryError> {
//! let boxes = [TileBox::new(0, 0, 10, 10)?, TileBox::new(11, 0, 10, 10)?];
//! let result = meld_adjacent(&boxes, 5.0);
//! assert!(result.did_meld);
//! assert_eq!(result.melds, vec![TileBox::new(0, 0, 21, 10)?]);
//! # Ok(())
//! # }
//! ```
//!
//! This crate is purely geometric. It does not decode images or extract
//! contours.

mod contour;
mod disjoint_set;
mod error;
mod image;
mod logger;
mod meld;
mod params;
mod tile_box;

pub use contour::{boxes_from_contours, contour_area, Contour, ContourFilter};
pub use disjoint_set::DisjointSet;
pub use error::{GeometryError, MeldIoError};
pub use image::{GrayImage, GrayImageView};
pub use meld::{meld_adjacent, meld_until_stable, MeldResult, StableMeld};
pub use params::MeldParams;
pub use tile_box::{BoxSpec, TileBox};

#[cfg(feature = "tracing")]
pub use logger::init_tracing;

pub use logger::{init_with_level, level_from_env, parse_level_or, LOG_ENV};
