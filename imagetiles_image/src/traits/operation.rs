//! Pixel operations the compositor needs on top of `image::DynamicImage`.
//!
//! - Cropping a [`PixelBox`] with bounds checks
//! - Box-filter resampling of a whole image or a region, via `fast_image_resize`
//! - Rotation onto an expanded transparent canvas, via `imageproc`

use anyhow::{Result, bail};
use fast_image_resize::{FilterType, ResizeAlg, ResizeOptions, Resizer};
use image::{DynamicImage, GenericImageView, Rgba, RgbaImage};
use imageproc::geometric_transformations::{Interpolation, Projection, warp_into};
use imagetiles_core::{PixelBox, PyramidError};
use imagetiles_derive::context;

pub trait DynamicImageTraitOperation {
	/// Copies the pixels inside `region`.
	///
	/// Fails with [`PyramidError::Composition`] if `region` is empty or leaves the image.
	fn get_crop(&self, region: PixelBox) -> Result<DynamicImage>;

	/// Resamples `region` to `width × height` with an area-averaging box filter.
	fn get_region_resized(&self, region: PixelBox, width: u32, height: u32) -> Result<DynamicImage>;

	/// Resamples the whole image to `width × height` with a box filter.
	fn get_resized(&self, width: u32, height: u32) -> Result<DynamicImage>;

	/// Rotates counter-clockwise by `degrees` around the center, bicubic, on a canvas grown to fit
	/// the rotated image. Uncovered pixels are transparent.
	fn into_rotated(self, degrees: f64) -> Result<DynamicImage>;
}

fn check_region(image: &DynamicImage, region: PixelBox) -> Result<()> {
	if region.is_empty() || !region.fits_within(image.width(), image.height()) {
		bail!(PyramidError::composition(format!(
			"region {region:?} is empty or outside of the {}x{} image",
			image.width(),
			image.height()
		)));
	}
	Ok(())
}

fn check_size(width: u32, height: u32) -> Result<()> {
	if width == 0 || height == 0 {
		bail!(PyramidError::composition(format!("cannot resize to {width}x{height}")));
	}
	Ok(())
}

/// Edge pixels added around the source before rotating.
const PAD: u32 = 3;

/// Width and height of a `width × height` image rotated by `radians`.
fn rotated_size(width: u32, height: u32, radians: f64) -> (u32, u32) {
	let (sin, cos) = (radians.sin().abs(), radians.cos().abs());
	let (w, h) = (f64::from(width), f64::from(height));
	// Trim float noise so that multiples of 90° keep exact sizes.
	let new_w = (w * cos + h * sin - 1e-6).ceil().max(1.0);
	let new_h = (w * sin + h * cos - 1e-6).ceil().max(1.0);
	(new_w as u32, new_h as u32)
}

impl DynamicImageTraitOperation for DynamicImage {
	#[context("cropping {:?} from {}x{} image", region, self.width(), self.height())]
	fn get_crop(&self, region: PixelBox) -> Result<DynamicImage> {
		check_region(self, region)?;
		Ok(self.crop_imm(region.x, region.y, region.width, region.height))
	}

	#[context("resampling {:?} of {}x{} image to {}x{}", region, self.width(), self.height(), width, height)]
	fn get_region_resized(&self, region: PixelBox, width: u32, height: u32) -> Result<DynamicImage> {
		check_region(self, region)?;
		check_size(width, height)?;
		if (region.width, region.height) == (width, height) {
			return self.get_crop(region);
		}

		let mut dst_image = DynamicImage::new(width, height, self.color());
		let options = ResizeOptions::new()
			.resize_alg(ResizeAlg::Convolution(FilterType::Box))
			.crop(
				f64::from(region.x),
				f64::from(region.y),
				f64::from(region.width),
				f64::from(region.height),
			);
		Resizer::new()
			.resize(self, &mut dst_image, &options)
			.map_err(|e| PyramidError::composition(e.to_string()))?;
		Ok(dst_image)
	}

	#[context("resampling {}x{} image to {}x{}", self.width(), self.height(), width, height)]
	fn get_resized(&self, width: u32, height: u32) -> Result<DynamicImage> {
		let (w, h) = self.dimensions();
		self.get_region_resized(PixelBox::new(0, 0, w, h), width, height)
	}

	#[context("rotating image by {degrees}°")]
	fn into_rotated(self, degrees: f64) -> Result<DynamicImage> {
		if !degrees.is_finite() {
			bail!(PyramidError::composition(format!("cannot rotate by {degrees}")));
		}
		if degrees.rem_euclid(360.0) == 0.0 {
			return Ok(self);
		}
		if self.width() == 0 || self.height() == 0 {
			bail!(PyramidError::composition("cannot rotate an empty image"));
		}

		let source = self.into_rgba8();
		let (src_w, src_h) = source.dimensions();
		let radians = degrees.to_radians();
		let (width, height) = rotated_size(src_w, src_h, radians);
		log::debug!("rotated {src_w}x{src_h} by {degrees}° to {width}x{height}");

		// Bicubic sampling needs a full 4x4 neighbourhood, so the edges are replicated outward.
		let padded = RgbaImage::from_fn(src_w + 2 * PAD, src_h + 2 * PAD, |x, y| {
			*source.get_pixel(
				x.saturating_sub(PAD).min(src_w - 1),
				y.saturating_sub(PAD).min(src_h - 1),
			)
		});

		// Pixel centres sit on integer coordinates. `Projection::rotate` turns clockwise in image
		// coordinates (y down).
		let projection = Projection::translate(
			-((src_w - 1) as f32 / 2.0 + PAD as f32),
			-((src_h - 1) as f32 / 2.0 + PAD as f32),
		)
		.and_then(Projection::rotate(-radians as f32))
		.and_then(Projection::translate((width - 1) as f32 / 2.0, (height - 1) as f32 / 2.0));

		let mut rotated = RgbaImage::new(width, height);
		warp_into(
			&padded,
			&projection,
			Interpolation::Bicubic,
			Rgba([0, 0, 0, 0]),
			&mut rotated,
		);

		// Only pixels whose pre-image lies on the source keep their colour.
		let inverse = projection.invert();
		let (max_x, max_y) = (src_w as f32 - 0.5, src_h as f32 - 0.5);
		for (x, y, pixel) in rotated.enumerate_pixels_mut() {
			let (sx, sy) = inverse * (x as f32, y as f32);
			let (sx, sy) = (sx - PAD as f32, sy - PAD as f32);
			let on_source = (-0.5..max_x).contains(&sx) && (-0.5..max_y).contains(&sy);
			if !on_source {
				*pixel = Rgba([0, 0, 0, 0]);
			}
		}
		Ok(DynamicImage::ImageRgba8(rotated))
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::traits::DynamicImageTraitTest;
	use rstest::rstest;

	fn is_composition(err: &anyhow::Error) -> bool {
		matches!(PyramidError::classify(err), Some(PyramidError::Composition(_)))
	}

	#[test]
	fn crop_copies_pixels() {
		let image = DynamicImage::new_test_rgba(64, 32);
		let crop = image.get_crop(PixelBox::new(10, 5, 4, 3)).unwrap();
		assert_eq!(crop.dimensions(), (4, 3));
		assert_eq!(crop.get_pixel(0, 0), image.get_pixel(10, 5));
		assert_eq!(crop.get_pixel(3, 2), image.get_pixel(13, 7));
	}

	#[rstest]
	#[case(PixelBox::new(60, 0, 5, 5))]
	#[case(PixelBox::new(0, 30, 5, 5))]
	#[case(PixelBox::new(0, 0, 0, 5))]
	fn bad_regions_are_composition_errors(#[case] region: PixelBox) {
		let image = DynamicImage::new_test_rgba(64, 32);
		assert!(is_composition(&image.get_crop(region).unwrap_err()));
		assert!(is_composition(&image.get_region_resized(region, 4, 4).unwrap_err()));
	}

	#[test]
	fn resize_to_zero_is_rejected() {
		let image = DynamicImage::new_test_rgba(8, 8);
		assert!(is_composition(&image.get_resized(0, 4).unwrap_err()));
	}

	#[test]
	fn box_filter_averages_blocks() {
		let image = DynamicImage::ImageRgba8(RgbaImage::from_fn(4, 2, |x, _| {
			if x < 2 { Rgba([200, 0, 0, 255]) } else { Rgba([0, 0, 100, 255]) }
		}));
		let scaled = image.get_resized(2, 1).unwrap();
		assert_eq!(scaled.dimensions(), (2, 1));
		assert_eq!(scaled.get_pixel(0, 0), Rgba([200, 0, 0, 255]));
		assert_eq!(scaled.get_pixel(1, 0), Rgba([0, 0, 100, 255]));
	}

	#[test]
	fn region_resize_uses_only_the_region() {
		let image = DynamicImage::ImageRgba8(RgbaImage::from_fn(8, 8, |x, _| {
			if x < 4 { Rgba([10, 20, 30, 255]) } else { Rgba([250, 250, 250, 255]) }
		}));
		let scaled = image.get_region_resized(PixelBox::new(0, 0, 4, 8), 2, 4).unwrap();
		for (_, _, pixel) in scaled.pixels() {
			assert_eq!(pixel, Rgba([10, 20, 30, 255]));
		}
	}

	#[rstest]
	#[case(90.0, (30, 60))]
	#[case(-90.0, (30, 60))]
	#[case(180.0, (60, 30))]
	#[case(45.0, (64, 64))]
	fn rotation_expands_canvas(#[case] degrees: f64, #[case] size: (u32, u32)) {
		let image = DynamicImage::new_test_rgba(60, 30);
		let rotated = image.into_rotated(degrees).unwrap();
		assert_eq!(rotated.dimensions(), size);
	}

	#[test]
	fn rotation_by_full_turn_is_identity() {
		let image = DynamicImage::new_test_rgba(20, 10);
		assert_eq!(image.clone().into_rotated(360.0).unwrap(), image);
		assert_eq!(image.clone().into_rotated(0.0).unwrap(), image);
	}

	#[test]
	fn rotation_is_counter_clockwise() {
		// A red pixel block on the right edge ends up at the top after a quarter turn.
		let image = DynamicImage::ImageRgba8(RgbaImage::from_fn(40, 20, |x, _| {
			if x >= 30 { Rgba([255, 0, 0, 255]) } else { Rgba([0, 0, 255, 255]) }
		}));
		let rotated = image.into_rotated(90.0).unwrap();
		assert_eq!(rotated.dimensions(), (20, 40));
		let top = rotated.get_pixel(10, 3);
		let bottom = rotated.get_pixel(10, 36);
		assert!(top[0] > 200 && top[2] < 50, "top pixel is {top:?}");
		assert!(bottom[2] > 200 && bottom[0] < 50, "bottom pixel is {bottom:?}");
	}

	fn opaque_count(image: &DynamicImage) -> usize {
		image.pixels().filter(|(_, _, p)| p[3] == 255).count()
	}

	#[test]
	fn half_turn_keeps_every_pixel() {
		let image = DynamicImage::ImageRgba8(RgbaImage::from_fn(40, 20, |x, _| {
			if x >= 30 { Rgba([255, 0, 0, 255]) } else { Rgba([0, 0, 255, 255]) }
		}));
		let rotated = image.into_rotated(180.0).unwrap();
		assert_eq!(rotated.dimensions(), (40, 20));
		assert_eq!(opaque_count(&rotated), 800);
		for y in 0..20 {
			assert!(rotated.get_pixel(0, y)[0] > 200, "left column, row {y}");
			assert!(rotated.get_pixel(9, y)[0] > 200, "band edge, row {y}");
			assert!(rotated.get_pixel(39, y)[2] > 200, "right column, row {y}");
		}
	}

	#[rstest]
	#[case(90.0)]
	#[case(-90.0)]
	#[case(270.0)]
	fn quarter_turn_swaps_sides_with_full_coverage(#[case] degrees: f64) {
		let image = DynamicImage::new_test_rgba(40, 20);
		let rotated = image.into_rotated(degrees).unwrap();
		assert_eq!(rotated.dimensions(), (20, 40));
		assert_eq!(opaque_count(&rotated), 800);
	}

	#[rstest]
	#[case(30.0)]
	#[case(45.0)]
	#[case(-120.0)]
	fn expanded_canvas_holds_the_whole_source(#[case] degrees: f64) {
		let image = DynamicImage::ImageRgba8(RgbaImage::from_pixel(40, 20, Rgba([0, 200, 0, 255])));
		let rotated = image.into_rotated(degrees).unwrap();
		let covered = rotated.pixels().filter(|(_, _, p)| p[3] > 0).count();
		// The rotated rectangle keeps its area; only edge pixels may be partly covered.
		assert!(covered >= 800 - 2 * (40 + 20), "{covered} pixels covered");
		assert!(covered <= 800 + 2 * (40 + 20), "{covered} pixels covered");
		let (w, h) = rotated.dimensions();
		assert_eq!(rotated.get_pixel(w / 2, h / 2), Rgba([0, 200, 0, 255]));
	}

	#[test]
	fn rotated_corners_are_transparent() {
		let image = DynamicImage::new_test_rgba(50, 50);
		let rotated = image.into_rotated(45.0).unwrap();
		assert_eq!(rotated.get_pixel(0, 0)[3], 0);
		let (w, h) = rotated.dimensions();
		assert!(rotated.get_pixel(w / 2, h / 2)[3] > 0);
	}
}
