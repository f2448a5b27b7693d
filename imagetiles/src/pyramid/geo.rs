//! Geo-anchored pyramid of a raster image.

use super::{PyramidJob, TileEmitter, compose_level};
use anyhow::Result;
use image::DynamicImage;
use imagetiles_core::{GeoSettings, ZoomRange, grid::GeoPlanner};
use imagetiles_derive::context;
use imagetiles_image::DynamicImageTraitOperation;

pub struct GeoJob {
	image: DynamicImage,
	planner: GeoPlanner,
	tile_size: u32,
}

impl GeoJob {
	/// Rotates `image` as configured and plans its levels.
	///
	/// The ground width refers to the unrotated image, so the resolution is derived from the
	/// original width while the rotated canvas is what gets tiled.
	#[context("planning a geo pyramid around {}", settings.anchor)]
	pub fn new(image: DynamicImage, settings: &GeoSettings, tile_size: u32) -> Result<GeoJob> {
		let native_width = image.width();
		let image = image.into_rotated(settings.rotation)?;
		let planner = GeoPlanner::new(
			settings.anchor,
			native_width,
			image.width(),
			image.height(),
			tile_size,
			settings.pixel_perfect,
		)?;
		log::debug!(
			"{} m per image pixel, target level {}",
			planner.image_meters_per_pixel(),
			planner.target_level()
		);
		Ok(GeoJob {
			image,
			planner,
			tile_size,
		})
	}

	#[must_use]
	pub fn planner(&self) -> &GeoPlanner {
		&self.planner
	}
}

impl PyramidJob for GeoJob {
	fn zoom_range(&self) -> ZoomRange {
		self.planner.zoom_range()
	}

	fn tile_count(&self) -> Result<u64> {
		self.planner.tile_count()
	}

	fn run(&mut self, emitter: &mut TileEmitter) -> Result<()> {
		for level in self.planner.zoom_range().levels_desc() {
			let Some(plan) = self.planner.level(level)? else {
				continue;
			};
			let cells = plan.cells()?;
			emitter.start_level(level, cells.len() as u64);
			let scaled = self.image.get_resized(plan.scaled_width, plan.scaled_height)?;
			let tiles = compose_level(&scaled, &cells, self.tile_size)?;
			emitter.write_level(level, tiles)?;
		}
		Ok(())
	}
}
