//! Reading the source raster.

use anyhow::{Result, bail};
use image::{DynamicImage, ImageReader};
use imagetiles_core::PyramidError;
use imagetiles_derive::context;
use std::path::Path;

/// Decodes `path` (PNG, JPEG, TIFF or WebP) into an RGBA8 image.
///
/// The format is detected from the file content, not the extension.
#[context("loading source image {path:?}")]
pub fn load_source(path: &Path) -> Result<DynamicImage> {
	let reader = ImageReader::open(path)
		.and_then(|reader| reader.with_guessed_format())
		.map_err(|e| PyramidError::source_decode(e.to_string()))?;
	let format = reader.format();
	let image = reader
		.decode()
		.map_err(|e| PyramidError::source_decode(e.to_string()))?;

	if image.width() == 0 || image.height() == 0 {
		bail!(PyramidError::source_decode("image has no pixels"));
	}
	log::debug!(
		"decoded {:?} source: {}x{} {:?}",
		format,
		image.width(),
		image.height(),
		image.color()
	);

	Ok(DynamicImage::ImageRgba8(image.into_rgba8()))
}
