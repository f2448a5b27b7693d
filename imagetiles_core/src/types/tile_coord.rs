//! Tile coordinates in the output pyramid.
//!
//! A [`TileCoord`] is the `(zoom_level, tile_column, tile_row)` key of one row in the MBTiles
//! `tiles` table. Rows use the TMS convention (row 0 is the southernmost row), which is what
//! MBTiles stores. [`TileCoord::flipped_y`] converts to the top-origin rows used by the
//! `{z}/{x}/{y}.png` directory layout.
//!
//! ```
//! use imagetiles_core::TileCoord;
//!
//! let coord = TileCoord::new(3, 1, 2).unwrap();
//! assert_eq!(coord.flipped_y(), 5);
//! ```

use crate::projection::{MAX_LEVEL, flip_row, row_count};
use anyhow::{Result, ensure};
use std::fmt::{self, Debug};

/// A tile coordinate: zoom level, column and TMS row.
#[derive(Eq, PartialEq, Clone, Copy, Hash)]
pub struct TileCoord {
	/// The zoom level of the tile.
	pub level: u8,
	/// The column, counted from the western edge.
	pub x: u32,
	/// The row, counted from the southern edge.
	pub y: u32,
}

impl TileCoord {
	/// Create a new `TileCoord`.
	///
	/// # Errors
	/// Returns an error if `level` exceeds [`MAX_LEVEL`] or `x`/`y` lie outside the level's grid.
	pub fn new(level: u8, x: u32, y: u32) -> Result<TileCoord> {
		ensure!(level <= MAX_LEVEL, "level ({level}) must be <= {MAX_LEVEL}");
		let max = row_count(level);
		ensure!(x < max, "x ({x}) out of bounds for level {level}");
		ensure!(y < max, "y ({y}) out of bounds for level {level}");
		Ok(TileCoord { level, x, y })
	}

	/// The row of this tile in a top-origin (XYZ) layout.
	#[must_use]
	pub fn flipped_y(&self) -> u32 {
		flip_row(self.y, self.level)
	}

	/// Path of this tile relative to a `{z}/{x}/{y}` directory tree, with `y` flipped.
	#[must_use]
	pub fn as_xyz_path(&self, extension: &str) -> String {
		format!("{}/{}/{}.{extension}", self.level, self.x, self.flipped_y())
	}
}

impl Debug for TileCoord {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(f, "TileCoord({}, [{}, {}])", self.level, self.x, self.y)
	}
}

/// Ordering by level, then row, then column.
impl Ord for TileCoord {
	fn cmp(&self, other: &Self) -> std::cmp::Ordering {
		(self.level, self.y, self.x).cmp(&(other.level, other.y, other.x))
	}
}

impl PartialOrd for TileCoord {
	fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
		Some(self.cmp(other))
	}
}
