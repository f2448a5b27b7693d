//! Where a georeferenced image sits on the map.

use crate::{
	PyramidError,
	projection::{MAX_LATITUDE, MAX_LONGITUDE, MIN_LATITUDE, MIN_LONGITUDE},
};
use anyhow::{Result, bail};
use std::fmt;

/// The geographic center of an image and the ground width its full pixel width spans.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct GeoAnchor {
	pub lng: f64,
	pub lat: f64,
	pub meters_width: f64,
}

impl GeoAnchor {
	/// Builds an anchor from a `"lng,lat"` center string and a width in meters.
	///
	/// # Errors
	/// Returns [`PyramidError::InvalidConfiguration`] for unparsable or out-of-range values.
	pub fn new(center: &str, meters_width: f64) -> Result<GeoAnchor> {
		let (lng, lat) = parse_center(center)?;
		if !(meters_width.is_finite() && meters_width > 0.0) {
			bail!(PyramidError::invalid_configuration(format!(
				"meters width must be a positive number, got {meters_width}"
			)));
		}
		Ok(GeoAnchor { lng, lat, meters_width })
	}

	/// Meters per source pixel for an image `width` pixels wide.
	#[must_use]
	pub fn meters_per_source_pixel(&self, width: u32) -> f64 {
		self.meters_width / f64::from(width)
	}

	/// Metadata value `"lng,lat,zoom"`.
	#[must_use]
	pub fn center_metadata(&self, zoom: u8) -> String {
		format!("{},{},{}", self.lng, self.lat, zoom)
	}
}

impl fmt::Display for GeoAnchor {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(f, "{},{} ({} m wide)", self.lng, self.lat, self.meters_width)
	}
}

/// Parses `"lng,lat"`.
pub fn parse_center(center: &str) -> Result<(f64, f64)> {
	let invalid = |why: &str| PyramidError::invalid_configuration(format!("center {center:?} {why}"));

	let parts: Vec<&str> = center.split(',').map(str::trim).collect();
	if parts.len() != 2 {
		bail!(invalid("must have the form \"lng,lat\""));
	}
	let (Ok(lng), Ok(lat)) = (parts[0].parse::<f64>(), parts[1].parse::<f64>()) else {
		bail!(invalid("contains a value that is not a number"));
	};
	if !(MIN_LONGITUDE..=MAX_LONGITUDE).contains(&lng) {
		bail!(invalid("has a longitude outside [-180, 180]"));
	}
	if !(MIN_LATITUDE..=MAX_LATITUDE).contains(&lat) {
		bail!(invalid("has a latitude outside [-90, 90]"));
	}
	Ok((lng, lat))
}
