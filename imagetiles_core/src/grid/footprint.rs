use crate::projection::{col_count, pixel_x, pixel_y, row_count};
use std::ops::RangeInclusive;

/// The rectangle an image covers in the world bitmap of one level.
///
/// `x` grows eastwards, `y` grows northwards from the southern edge, both in level pixels.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Footprint {
	pub level: u8,
	pub x_min: f64,
	pub y_min: f64,
	pub width: f64,
	pub height: f64,
}

impl Footprint {
	/// A `width × height` rectangle centered on `(lng, lat)`.
	#[must_use]
	pub fn centered(level: u8, lng: f64, lat: f64, width: f64, height: f64, tile_size: u32) -> Footprint {
		let center_x = pixel_x(level, lng, tile_size);
		let center_y = pixel_y(level, lat, tile_size);
		Footprint {
			level,
			x_min: center_x - width / 2.0,
			y_min: center_y - height / 2.0,
			width,
			height,
		}
	}

	/// The same rectangle with its origin truncated to whole pixels.
	#[must_use]
	pub fn snapped(self) -> Footprint {
		Footprint {
			x_min: self.x_min.trunc(),
			y_min: self.y_min.trunc(),
			..self
		}
	}

	#[must_use]
	pub fn x_max(&self) -> f64 {
		self.x_min + self.width
	}

	#[must_use]
	pub fn y_max(&self) -> f64 {
		self.y_min + self.height
	}

	/// Columns from `floor(x_min / S)` to `floor(x_max / S)`, clamped to the level.
	#[must_use]
	pub fn cols(&self, tile_size: u32) -> RangeInclusive<u32> {
		tile_range(self.x_min, self.x_max(), col_count(self.level), tile_size)
	}

	/// TMS rows from `floor(y_min / S)` to `floor(y_max / S)`, clamped to the level.
	#[must_use]
	pub fn rows(&self, tile_size: u32) -> RangeInclusive<u32> {
		tile_range(self.y_min, self.y_max(), row_count(self.level), tile_size)
	}

	#[must_use]
	pub fn tile_count(&self, tile_size: u32) -> u64 {
		let cols = self.cols(tile_size);
		let rows = self.rows(tile_size);
		u64::from(cols.end() - cols.start() + 1) * u64::from(rows.end() - rows.start() + 1)
	}
}

fn tile_range(min: f64, max: f64, count: u32, tile_size: u32) -> RangeInclusive<u32> {
	let last = f64::from(count - 1);
	let size = f64::from(tile_size);
	let first = (min / size).floor().clamp(0.0, last);
	let end = (max / size).floor().clamp(first, last);
	(first as u32)..=(end as u32)
}
