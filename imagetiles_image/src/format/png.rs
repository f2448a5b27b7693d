//! Lossless RGBA PNG encoding of tiles.

use anyhow::{Result, bail};
use image::{DynamicImage, ImageEncoder, ImageFormat, codecs::png, load_from_memory_with_format};
use imagetiles_core::{Blob, PyramidError};

/// Encodes an 8-bit image as a PNG tile, trading encoding time for size.
pub fn image2blob(image: &DynamicImage) -> Result<Blob> {
	if image.color().bytes_per_pixel() / image.color().channel_count() != 1 {
		bail!(PyramidError::composition("png tiles must be 8-bit images"));
	}

	let mut buffer: Vec<u8> = Vec::new();
	png::PngEncoder::new_with_quality(&mut buffer, png::CompressionType::Best, png::FilterType::Adaptive)
		.write_image(image.as_bytes(), image.width(), image.height(), image.color().into())?;

	Ok(Blob::from(buffer))
}

pub fn blob2image(blob: &Blob) -> Result<DynamicImage> {
	load_from_memory_with_format(blob.as_slice(), ImageFormat::Png)
		.map_err(|e| PyramidError::source_decode(format!("invalid PNG tile: {e}")).into())
}
