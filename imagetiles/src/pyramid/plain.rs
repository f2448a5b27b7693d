//! Plain pyramid: the image itself is the world, anchored at the bottom-left of the level 0 tile.

use super::{PyramidJob, TileEmitter, compose_level};
use anyhow::Result;
use image::DynamicImage;
use imagetiles_core::{ZoomRange, grid::PlainGrid};
use imagetiles_derive::context;

pub struct PlainJob {
	image: DynamicImage,
	grid: PlainGrid,
	tile_size: u32,
}

impl PlainJob {
	#[context("planning a plain pyramid")]
	pub fn new(image: DynamicImage, tile_size: u32) -> Result<PlainJob> {
		let grid = PlainGrid::new(image.width(), image.height(), tile_size)?;
		Ok(PlainJob { image, grid, tile_size })
	}
}

impl PyramidJob for PlainJob {
	fn zoom_range(&self) -> ZoomRange {
		self.grid.zoom_range()
	}

	fn tile_count(&self) -> Result<u64> {
		Ok(self.grid.tile_count())
	}

	fn run(&mut self, emitter: &mut TileEmitter) -> Result<()> {
		for level in self.grid.zoom_range().levels_desc() {
			let plan = self.grid.level(level)?;
			let cells = plan.cells()?;
			emitter.start_level(level, cells.len() as u64);
			let tiles = compose_level(&self.image, &cells, self.tile_size)?;
			emitter.write_level(level, tiles)?;
		}
		Ok(())
	}
}
