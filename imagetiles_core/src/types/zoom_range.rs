use crate::projection::MAX_LEVEL;
use anyhow::{Result, ensure};
use std::fmt;

/// An inclusive range of zoom levels, `min <= max <= MAX_LEVEL`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ZoomRange {
	pub min: u8,
	pub max: u8,
}

impl ZoomRange {
	pub fn new(min: u8, max: u8) -> Result<ZoomRange> {
		ensure!(min <= max, "min zoom ({min}) must be <= max zoom ({max})");
		ensure!(max <= MAX_LEVEL, "max zoom ({max}) must be <= {MAX_LEVEL}");
		Ok(ZoomRange { min, max })
	}

	/// Levels from `max` down to `min`, the order in which a pyramid is built.
	pub fn levels_desc(&self) -> impl Iterator<Item = u8> {
		(self.min..=self.max).rev()
	}

	#[must_use]
	pub fn contains(&self, level: u8) -> bool {
		(self.min..=self.max).contains(&level)
	}
}

impl fmt::Display for ZoomRange {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(f, "{}..={}", self.min, self.max)
	}
}
