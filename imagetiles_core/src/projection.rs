//! Spherical Mercator projection math.
//!
//! Converts between longitude/latitude, pixel positions in the world bitmap of a zoom level, and
//! tile indices. All angles are in degrees. Inputs are clamped, so every function is total.
//!
//! Pixel `x` grows eastwards from the antimeridian. Pixel `y` grows northwards from the
//! southern edge of the world, so `floor(y / tile_size)` is directly a TMS row as stored in
//! MBTiles.
//!
//! ```
//! use imagetiles_core::projection::*;
//!
//! assert_eq!(pixel_x(0, 0.0, 256), 128.0);
//! assert_eq!(flip_row(flip_row(5, 3), 3), 5);
//! ```

use std::f64::consts::PI;

/// Ground resolution in meters per pixel at the equator at zoom 0 (256 px tiles).
pub const EQUATOR_METERS_PER_PIXEL: f64 = 156_543.033_92;

pub const MIN_LONGITUDE: f64 = -180.0;
pub const MAX_LONGITUDE: f64 = 180.0;
pub const MIN_LATITUDE: f64 = -90.0;
pub const MAX_LATITUDE: f64 = 90.0;

/// Latitude at which the Mercator world bitmap ends (`atan(sinh(π))`).
pub const MAX_MERCATOR_LATITUDE: f64 = 85.051_128_779_806_59;

/// Highest zoom level the pyramid supports.
pub const MAX_LEVEL: u8 = 30;

fn world_size(zoom: u8, tile_size: u32) -> f64 {
	2f64.powi(i32::from(zoom)) * f64::from(tile_size)
}

/// Meters covered by one pixel at latitude `lat` and zoom level `zoom`.
#[must_use]
pub fn meters_per_pixel(lat: f64, zoom: u8) -> f64 {
	let lat = lat.clamp(MIN_LATITUDE, MAX_LATITUDE);
	EQUATOR_METERS_PER_PIXEL * (lat * PI / 180.0).cos() / 2f64.powi(i32::from(zoom))
}

/// Horizontal pixel position of longitude `lng` at `zoom`.
#[must_use]
pub fn pixel_x(zoom: u8, lng: f64, tile_size: u32) -> f64 {
	let lng = lng.clamp(MIN_LONGITUDE, MAX_LONGITUDE);
	(lng + 180.0) / 360.0 * world_size(zoom, tile_size)
}

/// Vertical pixel position of latitude `lat` at `zoom`, measured from the southern edge.
///
/// Latitudes beyond the Mercator limit are clamped; the result lies in `[0, 2^zoom · tile_size)`.
#[must_use]
pub fn pixel_y(zoom: u8, lat: f64, tile_size: u32) -> f64 {
	let size = world_size(zoom, tile_size);
	let lat = lat.clamp(-MAX_MERCATOR_LATITUDE, MAX_MERCATOR_LATITUDE) * PI / 180.0;
	let y = (1.0 + (lat.tan() + 1.0 / lat.cos()).ln() / PI) / 2.0 * size;
	y.clamp(0.0, size * (1.0 - f64::EPSILON))
}

/// Longitude of horizontal pixel position `x` at `zoom`.
#[must_use]
pub fn lng_of(zoom: u8, x: f64, tile_size: u32) -> f64 {
	let lng = x / world_size(zoom, tile_size) * 360.0 - 180.0;
	lng.clamp(MIN_LONGITUDE, MAX_LONGITUDE)
}

/// Latitude of vertical pixel position `y` (from the southern edge) at `zoom`.
#[must_use]
pub fn lat_of(zoom: u8, y: f64, tile_size: u32) -> f64 {
	let n = PI * (2.0 * y / world_size(zoom, tile_size) - 1.0);
	let lat = n.sinh().atan() * 180.0 / PI;
	lat.clamp(MIN_LATITUDE, MAX_LATITUDE)
}

/// Number of tile rows at `zoom`.
#[must_use]
pub fn row_count(zoom: u8) -> u32 {
	if zoom == 0 { 1 } else { 2u32 << (zoom - 1) }
}

/// Number of tile columns at `zoom`.
#[must_use]
pub fn col_count(zoom: u8) -> u32 {
	row_count(zoom)
}

/// Converts a row index between bottom-origin (TMS) and top-origin (XYZ) numbering.
#[must_use]
pub fn flip_row(row: u32, zoom: u8) -> u32 {
	row_count(zoom) - 1 - row
}
