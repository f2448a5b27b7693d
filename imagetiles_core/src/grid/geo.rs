//! Geo-anchored pyramid of a raster image.
//!
//! The image is centered on a longitude/latitude and spans a known ground width. The target level
//! is the first level whose ground resolution is at least as fine as the image's own. Every lower
//! level scales the image by `image_mpp / level_mpp` and places it in the level's world bitmap.

use super::{CellPlacement, Footprint, TileCell};
use crate::{
	GeoAnchor, PixelBox, PyramidError, TileCoord, ZoomRange,
	projection::{MAX_LEVEL, meters_per_pixel},
};
use anyhow::{Result, bail, ensure};
use std::ops::RangeInclusive;

/// Largest side a scaled level image may have.
const MAX_SCALED_SIDE: f64 = (1u32 << 24) as f64;

/// Highest level whose resolution is not coarser than `image_mpp`.
///
/// Scans levels `MAX_LEVEL − 1` down to 0 for the first with `meters_per_pixel > image_mpp` and
/// returns the level after it, or 0 if even level 0 is finer than the image.
#[must_use]
pub fn target_level(lat: f64, image_mpp: f64) -> u8 {
	(0..MAX_LEVEL)
		.rev()
		.find(|&level| meters_per_pixel(lat, level) > image_mpp)
		.map_or(0, |level| level + 1)
}

/// Plans every level of a geo-anchored pyramid.
#[derive(Clone, Debug, PartialEq)]
pub struct GeoPlanner {
	anchor: GeoAnchor,
	width: u32,
	height: u32,
	tile_size: u32,
	image_mpp: f64,
	zoom: ZoomRange,
}

impl GeoPlanner {
	/// `native_width` is the pixel width `anchor.meters_width` refers to. `width × height` is the
	/// size of the image actually tiled, which differs from the native size after rotation.
	///
	/// With `pixel_perfect`, the image resolution is snapped to the target level so that level is
	/// copied without resampling.
	///
	/// # Errors
	/// [`PyramidError::InvalidConfiguration`] if the image is empty or already degenerate at the
	/// target level.
	pub fn new(
		anchor: GeoAnchor,
		native_width: u32,
		width: u32,
		height: u32,
		tile_size: u32,
		pixel_perfect: bool,
	) -> Result<GeoPlanner> {
		if native_width == 0 || width == 0 || height == 0 || tile_size == 0 {
			bail!(PyramidError::invalid_configuration(format!(
				"cannot plan a {width}x{height} image with {tile_size} px tiles"
			)));
		}

		let mut image_mpp = anchor.meters_per_source_pixel(native_width);
		let target = target_level(anchor.lat, image_mpp);
		if pixel_perfect {
			image_mpp = meters_per_pixel(anchor.lat, target);
			log::debug!(
				"pixel perfect: {} m per pixel, image spans {} m",
				image_mpp,
				image_mpp * f64::from(width)
			);
		}

		let mut planner = GeoPlanner {
			anchor,
			width,
			height,
			tile_size,
			image_mpp,
			zoom: ZoomRange::new(target, target)?,
		};

		if planner.level(target)?.is_none() {
			bail!(PyramidError::invalid_configuration(format!(
				"the image is smaller than 2 px at its own target level {target}"
			)));
		}
		let mut min = target;
		while min > 0 && planner.level(min - 1)?.is_some() {
			min -= 1;
		}
		planner.zoom = ZoomRange::new(min, target)?;
		Ok(planner)
	}

	/// Levels from the first non-degenerate level up to the target level.
	#[must_use]
	pub fn zoom_range(&self) -> ZoomRange {
		self.zoom
	}

	#[must_use]
	pub fn target_level(&self) -> u8 {
		self.zoom.max
	}

	/// Meters per pixel of the tiled image.
	#[must_use]
	pub fn image_meters_per_pixel(&self) -> f64 {
		self.image_mpp
	}

	/// Plan for `level`, or `None` if the scaled image is at most one pixel in either direction.
	pub fn level(&self, level: u8) -> Result<Option<GeoLevel>> {
		ensure!(level <= MAX_LEVEL, "level ({level}) must be <= {MAX_LEVEL}");
		let ratio = self.image_mpp / meters_per_pixel(self.anchor.lat, level);
		let scaled_width = (f64::from(self.width) * ratio).trunc();
		let scaled_height = (f64::from(self.height) * ratio).trunc();

		if scaled_width.min(scaled_height) <= 1.0 {
			return Ok(None);
		}
		if !(scaled_width.is_finite() && scaled_height.is_finite()) || scaled_width.max(scaled_height) > MAX_SCALED_SIDE {
			bail!(PyramidError::invalid_configuration(format!(
				"level {level} would scale the image to {scaled_width}x{scaled_height} px"
			)));
		}

		let footprint = Footprint::centered(
			level,
			self.anchor.lng,
			self.anchor.lat,
			scaled_width,
			scaled_height,
			self.tile_size,
		)
		.snapped();

		Ok(Some(GeoLevel {
			level,
			ratio,
			scaled_width: scaled_width as u32,
			scaled_height: scaled_height as u32,
			footprint,
			tile_size: self.tile_size,
		}))
	}

	/// Number of tiles across [`Self::zoom_range`].
	pub fn tile_count(&self) -> Result<u64> {
		let mut count = 0;
		for level in self.zoom.levels_desc() {
			if let Some(plan) = self.level(level)? {
				count += plan.tile_count();
			}
		}
		Ok(count)
	}
}

/// One level of a [`GeoPlanner`].
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct GeoLevel {
	pub level: u8,
	/// Scale factor from the source image to this level.
	pub ratio: f64,
	pub scaled_width: u32,
	pub scaled_height: u32,
	/// Pixel-aligned placement of the scaled image in the level's world bitmap.
	pub footprint: Footprint,
	tile_size: u32,
}

impl GeoLevel {
	#[must_use]
	pub fn cols(&self) -> RangeInclusive<u32> {
		self.footprint.cols(self.tile_size)
	}

	#[must_use]
	pub fn rows(&self) -> RangeInclusive<u32> {
		self.footprint.rows(self.tile_size)
	}

	#[must_use]
	pub fn tile_count(&self) -> u64 {
		self.footprint.tile_count(self.tile_size)
	}

	/// Every tile the scaled image touches, column by column.
	pub fn cells(&self) -> Result<Vec<TileCell>> {
		let mut cells = Vec::with_capacity(usize::try_from(self.tile_count())?);
		for col in self.cols() {
			for row in self.rows() {
				cells.push(self.cell(col, row)?);
			}
		}
		Ok(cells)
	}

	/// The intersection of tile `(col, row)` with the scaled image.
	///
	/// Tile and image share the level's south-origin pixel space. The crop is taken from the top
	/// of the image down and pasted at the matching offset below the top of the tile.
	fn cell(&self, col: u32, row: u32) -> Result<TileCell> {
		let size = i64::from(self.tile_size);
		let x_min = self.footprint.x_min as i64;
		let y_min = self.footprint.y_min as i64;
		let x_max = x_min + i64::from(self.scaled_width);
		let y_max = y_min + i64::from(self.scaled_height);

		let tile_x = i64::from(col) * size;
		let tile_y = i64::from(row) * size;

		let x0 = tile_x.max(x_min);
		let x1 = (tile_x + size).min(x_max);
		let y0 = tile_y.max(y_min);
		let y1 = (tile_y + size).min(y_max);

		let source = PixelBox::from_edges(x0 - x_min, y_max - y1, x1 - x_min, y_max - y0);
		let target = PixelBox::from_edges(x0 - tile_x, tile_y + size - y1, x1 - tile_x, tile_y + size - y0);
		let placement = match (source, target) {
			(Some(source), Some(target)) => Some(CellPlacement { source, target }),
			_ => None,
		};

		Ok(TileCell {
			coord: TileCoord::new(self.level, col, row)?,
			placement,
		})
	}
}
