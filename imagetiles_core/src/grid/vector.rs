//! Geo-anchored pyramid of a vector document.
//!
//! Same placement as [`super::GeoPlanner`], but nothing is resampled here: every tile is
//! translated back into a rectangle of document units that an external rasterizer renders at
//! `S × S` pixels.

use super::Footprint;
use crate::{GeoAnchor, TileCoord, ZoomRange, projection::meters_per_pixel};
use anyhow::{Result, ensure};

/// A rectangle in document units, origin at the bottom-left corner of the document.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct DocumentArea {
	pub x0: f64,
	pub y0: f64,
	pub x1: f64,
	pub y1: f64,
}

impl DocumentArea {
	#[must_use]
	pub fn as_array(&self) -> [f64; 4] {
		[self.x0, self.y0, self.x1, self.y1]
	}
}

/// One tile of a vector level.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct VectorCell {
	pub coord: TileCoord,
	pub area: DocumentArea,
}

/// Plans an explicit range of levels for a document of known size.
#[derive(Clone, Debug, PartialEq)]
pub struct VectorPlanner {
	anchor: GeoAnchor,
	width: f64,
	height: f64,
	tile_size: u32,
	zoom: ZoomRange,
}

impl VectorPlanner {
	/// `width × height` is the document size in document units; `anchor.meters_width` is the
	/// ground width of `width`.
	pub fn new(anchor: GeoAnchor, width: f64, height: f64, zoom: ZoomRange, tile_size: u32) -> Result<VectorPlanner> {
		ensure!(
			width.is_finite() && height.is_finite() && width > 0.0 && height > 0.0,
			"document size {width}x{height} is not positive"
		);
		ensure!(tile_size > 0, "tile size must be positive");
		Ok(VectorPlanner {
			anchor,
			width,
			height,
			tile_size,
			zoom,
		})
	}

	#[must_use]
	pub fn zoom_range(&self) -> ZoomRange {
		self.zoom
	}

	pub fn level(&self, level: u8) -> Result<VectorLevel> {
		ensure!(self.zoom.contains(level), "level {level} is outside {}", self.zoom);
		let image_mpp = self.anchor.meters_width / self.width;
		let ratio = image_mpp / meters_per_pixel(self.anchor.lat, level);
		ensure!(ratio.is_finite() && ratio > 0.0, "level {level} has no usable scale");

		let footprint = Footprint::centered(
			level,
			self.anchor.lng,
			self.anchor.lat,
			self.width * ratio,
			self.height * ratio,
			self.tile_size,
		);
		Ok(VectorLevel {
			level,
			ratio,
			footprint,
			tile_size: self.tile_size,
		})
	}

	pub fn tile_count(&self) -> Result<u64> {
		let mut count = 0;
		for level in self.zoom.levels_desc() {
			count += self.level(level)?.tile_count();
		}
		Ok(count)
	}
}

/// One level of a [`VectorPlanner`].
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct VectorLevel {
	pub level: u8,
	/// Level pixels per document unit.
	pub ratio: f64,
	pub footprint: Footprint,
	tile_size: u32,
}

impl VectorLevel {
	#[must_use]
	pub fn tile_count(&self) -> u64 {
		self.footprint.tile_count(self.tile_size)
	}

	/// Every tile the document touches, column by column, with its document area.
	pub fn cells(&self) -> Result<Vec<VectorCell>> {
		let size = f64::from(self.tile_size);
		let mut cells = Vec::with_capacity(usize::try_from(self.tile_count())?);
		for col in self.footprint.cols(self.tile_size) {
			for row in self.footprint.rows(self.tile_size) {
				let tile_x = f64::from(col) * size;
				let tile_y = f64::from(row) * size;
				cells.push(VectorCell {
					coord: TileCoord::new(self.level, col, row)?,
					area: DocumentArea {
						x0: (tile_x - self.footprint.x_min) / self.ratio,
						y0: (tile_y - self.footprint.y_min) / self.ratio,
						x1: (tile_x + size - self.footprint.x_min) / self.ratio,
						y1: (tile_y + size - self.footprint.y_min) / self.ratio,
					},
				});
			}
		}
		Ok(cells)
	}
}
