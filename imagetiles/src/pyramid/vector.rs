//! Geo-anchored pyramid of a vector document, rendered tile by tile.

use super::{PyramidJob, TileEmitter};
use crate::renderer::Rasterizer;
use anyhow::{Result, bail};
use image::{DynamicImage, GenericImageView};
use imagetiles_core::{PyramidError, VectorSettings, ZoomRange, grid::VectorPlanner};
use imagetiles_derive::context;
use imagetiles_image::image2blob;
use std::path::{Path, PathBuf};

pub struct VectorJob<'a> {
	source: PathBuf,
	planner: VectorPlanner,
	background: String,
	tile_size: u32,
	rasterizer: &'a mut dyn Rasterizer,
}

impl<'a> VectorJob<'a> {
	/// Asks `rasterizer` for the document size and plans the configured levels.
	#[context("planning a vector pyramid of {:?}", source)]
	pub fn new(
		source: &Path,
		settings: &VectorSettings,
		tile_size: u32,
		rasterizer: &'a mut dyn Rasterizer,
	) -> Result<VectorJob<'a>> {
		let (width, height) = rasterizer.document_size(source)?;
		log::debug!("document {source:?} is {width}x{height} units");
		let planner = VectorPlanner::new(settings.anchor, width, height, settings.zoom, tile_size)?;
		Ok(VectorJob {
			source: source.to_path_buf(),
			planner,
			background: settings.background.clone(),
			tile_size,
			rasterizer,
		})
	}
}

impl PyramidJob for VectorJob<'_> {
	fn zoom_range(&self) -> ZoomRange {
		self.planner.zoom_range()
	}

	fn tile_count(&self) -> Result<u64> {
		self.planner.tile_count()
	}

	fn run(&mut self, emitter: &mut TileEmitter) -> Result<()> {
		let size = self.tile_size;
		for level in self.planner.zoom_range().levels_desc() {
			let cells = self.planner.level(level)?.cells()?;
			emitter.start_level(level, cells.len() as u64);

			let mut tiles = Vec::with_capacity(cells.len());
			for cell in &cells {
				let tile = self
					.rasterizer
					.render(&self.source, &cell.area, size, size, &self.background)?;
				if tile.dimensions() != (size, size) {
					bail!(PyramidError::external_renderer(format!(
						"tile {:?} came back as {}x{} px instead of {size}x{size}",
						cell.coord,
						tile.width(),
						tile.height()
					)));
				}
				tiles.push((cell.coord, image2blob(&DynamicImage::ImageRgba8(tile.into_rgba8()))?));
			}
			emitter.write_level(level, tiles)?;
		}
		Ok(())
	}
}
