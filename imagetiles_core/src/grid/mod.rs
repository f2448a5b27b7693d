//! Tile Grid Planner.
//!
//! A planner turns image geometry into the list of tiles a zoom level needs. Each tile is a
//! [`TileCell`]: its coordinate, plus where its content comes from in the level's source image and
//! where that content lands inside the `S × S` tile. Raster planners ([`PlainGrid`],
//! [`GeoPlanner`]) work in whole pixels; [`VectorPlanner`] works in document units for an external
//! rasterizer.

mod footprint;
mod geo;
mod plain;
mod vector;

pub use footprint::Footprint;
pub use geo::{GeoLevel, GeoPlanner};
pub use plain::{PlainGrid, PlainLevel};
pub use vector::{DocumentArea, VectorCell, VectorLevel, VectorPlanner};

use crate::{PixelBox, TileCoord};

/// Where a tile's content is cut from and where it is drawn.
///
/// `source` is in the coordinates of the level's source image (top-left origin). `target` is in
/// tile coordinates (top-left origin). When the two sizes differ, the source is box-resampled to
/// the target size before pasting.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct CellPlacement {
	pub source: PixelBox,
	pub target: PixelBox,
}

/// One tile of a raster zoom level.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TileCell {
	pub coord: TileCoord,
	/// `None` for a tile that overlaps no source pixels; it is emitted fully transparent.
	pub placement: Option<CellPlacement>,
}
