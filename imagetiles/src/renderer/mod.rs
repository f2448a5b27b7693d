//! Rasterizing vector documents tile by tile.
//!
//! The pyramid driver talks to a [`Rasterizer`]. The production implementation is
//! [`SubprocessRasterizer`], a long-lived child process speaking the line protocol in [`protocol`].

pub mod protocol;
mod subprocess;

pub use subprocess::SubprocessRasterizer;

use anyhow::Result;
use image::DynamicImage;
use imagetiles_core::grid::DocumentArea;
use std::path::Path;

/// Renders parts of a vector document to pixels.
pub trait Rasterizer {
	/// Width and height of the document in document units.
	fn document_size(&mut self, source: &Path) -> Result<(f64, f64)>;

	/// Renders `area` of the document to a `width × height` image over `background` (`#rrggbb`).
	fn render(
		&mut self,
		source: &Path,
		area: &DocumentArea,
		width: u32,
		height: u32,
		background: &str,
	) -> Result<DynamicImage>;
}
