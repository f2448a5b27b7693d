//! Grid-aligned pyramid of an image without geographic reference.
//!
//! The image is anchored at the bottom-left corner of a square canvas of side `S · 2^max_level`.
//! At level `z` every tile covers `step = S · 2^(max_level − z)` canvas pixels per side, so tile
//! rows are counted from the bottom of the image, matching the TMS rows stored in MBTiles.

use super::{CellPlacement, TileCell};
use crate::{PixelBox, TileCoord, ZoomRange, projection::MAX_LEVEL};
use anyhow::{Result, bail, ensure};

/// Geometry of a plain-mode pyramid.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PlainGrid {
	width: u32,
	height: u32,
	tile_size: u32,
	max_level: u8,
}

impl PlainGrid {
	/// # Errors
	/// Fails if the image is empty, the tile size is zero, or the image needs more than
	/// [`MAX_LEVEL`] levels.
	pub fn new(width: u32, height: u32, tile_size: u32) -> Result<PlainGrid> {
		ensure!(width > 0 && height > 0, "image has no pixels ({width}x{height})");
		ensure!(tile_size > 0, "tile size must be positive");

		let side = u64::from(width.max(height));
		let mut max_level = 0u8;
		while (u64::from(tile_size) << max_level) < side {
			max_level += 1;
			if max_level > MAX_LEVEL {
				bail!("image {width}x{height} needs more than {MAX_LEVEL} zoom levels");
			}
		}

		Ok(PlainGrid {
			width,
			height,
			tile_size,
			max_level,
		})
	}

	/// `ceil(log2(max(w, h) / S))`, or 0 when the image fits in one tile.
	#[must_use]
	pub fn max_level(&self) -> u8 {
		self.max_level
	}

	#[must_use]
	pub fn zoom_range(&self) -> ZoomRange {
		ZoomRange {
			min: 0,
			max: self.max_level,
		}
	}

	/// Plan for one level.
	///
	/// # Errors
	/// Fails if `level` is above [`Self::max_level`].
	pub fn level(&self, level: u8) -> Result<PlainLevel> {
		ensure!(
			level <= self.max_level,
			"level {level} is above the maximum level {}",
			self.max_level
		);
		let step = u64::from(self.tile_size) << (self.max_level - level);
		Ok(PlainLevel {
			level,
			step,
			width: self.width,
			height: self.height,
			tile_size: self.tile_size,
		})
	}

	/// Exact number of tiles across all levels.
	#[must_use]
	pub fn tile_count(&self) -> u64 {
		(0..=self.max_level)
			.filter_map(|level| self.level(level).ok())
			.map(|plan| plan.tile_count())
			.sum()
	}
}

/// One level of a [`PlainGrid`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PlainLevel {
	pub level: u8,
	/// Source pixels per tile side.
	pub step: u64,
	width: u32,
	height: u32,
	tile_size: u32,
}

impl PlainLevel {
	#[must_use]
	pub fn cols(&self) -> u32 {
		div_ceil(self.width, self.step)
	}

	#[must_use]
	pub fn rows(&self) -> u32 {
		div_ceil(self.height, self.step)
	}

	#[must_use]
	pub fn tile_count(&self) -> u64 {
		u64::from(self.cols()) * u64::from(self.rows())
	}

	/// Every tile of the level, row by row from the bottom of the image.
	///
	/// # Errors
	/// Only fails if the grid is internally inconsistent.
	pub fn cells(&self) -> Result<Vec<TileCell>> {
		let mut cells = Vec::with_capacity(usize::try_from(self.tile_count())?);
		for row in 0..self.rows() {
			for col in 0..self.cols() {
				cells.push(self.cell(col, row)?);
			}
		}
		Ok(cells)
	}

	fn cell(&self, col: u32, row: u32) -> Result<TileCell> {
		let width = u64::from(self.width);
		let height = u64::from(self.height);

		let x0 = u64::from(col) * self.step;
		let x1 = (x0 + self.step).min(width);
		let bottom = height - u64::from(row) * self.step;
		let top = bottom.saturating_sub(self.step);

		let source = PixelBox::new(
			u32::try_from(x0)?,
			u32::try_from(top)?,
			u32::try_from(x1 - x0)?,
			u32::try_from(bottom - top)?,
		);
		let scaled_width = self.scale(source.width);
		let scaled_height = self.scale(source.height);
		let target = PixelBox::new(0, self.tile_size - scaled_height, scaled_width, scaled_height);

		Ok(TileCell {
			coord: TileCoord::new(self.level, col, row)?,
			placement: Some(CellPlacement { source, target }),
		})
	}

	/// Size of `length` source pixels inside the tile, rounded, at least one pixel.
	fn scale(&self, length: u32) -> u32 {
		let tile_size = u64::from(self.tile_size);
		let scaled = (u64::from(length) * tile_size + self.step / 2) / self.step;
		// `length <= step`, so the result never exceeds the tile size.
		u32::try_from(scaled.clamp(1, tile_size)).unwrap_or(self.tile_size)
	}
}

fn div_ceil(length: u32, step: u64) -> u32 {
	// `length <= S · 2^max_level`, so the quotient is at most `2^level`.
	u32::try_from(u64::from(length).div_ceil(step)).unwrap_or(u32::MAX)
}
