//! The pyramid driver.
//!
//! A run moves through `create schema → levels, highest first → range metadata → close`. Each mode
//! is a [`PyramidJob`]: it is fully planned before the output file is touched, so a configuration
//! problem never leaves a half-written database behind. Within a level, tiles are composed and
//! encoded on the rayon pool; the [`TileEmitter`] then commits the whole level at once.

mod emitter;
mod geo;
mod plain;
mod vector;

pub use emitter::TileEmitter;
pub use geo::GeoJob;
pub use plain::PlainJob;
pub use vector::VectorJob;

use crate::renderer::{Rasterizer, SubprocessRasterizer};
use anyhow::Result;
use image::DynamicImage;
use imagetiles_core::{
	Blob, EventBus, Mode, ModeKind, PyramidConfig, TileCoord, VectorSettings, ZoomRange, grid::TileCell,
};
use imagetiles_derive::context;
use imagetiles_image::{compose_tile, image2blob, load_source};
use rayon::prelude::*;
use std::path::Path;

/// What a finished run produced.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PyramidSummary {
	pub mode: ModeKind,
	pub zoom_range: ZoomRange,
	pub tiles: u64,
}

/// A planned pyramid, ready to be written.
pub trait PyramidJob {
	fn zoom_range(&self) -> ZoomRange;

	/// Number of tiles the job will emit.
	fn tile_count(&self) -> Result<u64>;

	/// Emits every level, highest first.
	fn run(&mut self, emitter: &mut TileEmitter) -> Result<()>;
}

/// Converts `source` into the MBTiles file `output`.
///
/// Vector sources are rasterized by the renderer configured in `config`.
#[context("converting {:?} to {:?}", source, output)]
pub fn build_pyramid(source: &Path, output: &Path, config: &PyramidConfig, events: &EventBus) -> Result<PyramidSummary> {
	let mode = config.resolve_mode(source)?;
	log::debug!("resolved mode {:?}", mode);
	match &mode {
		Mode::Plain => {
			let mut job = PlainJob::new(load_source(source)?, config.tile_size)?;
			run_job(&mut job, output, config, &mode, events)
		}
		Mode::Geo(settings) => {
			let mut job = GeoJob::new(load_source(source)?, settings, config.tile_size)?;
			run_job(&mut job, output, config, &mode, events)
		}
		Mode::Vector(settings) => {
			let mut rasterizer = SubprocessRasterizer::spawn(&settings.renderer)?;
			build_vector_pyramid(source, output, config, settings, &mut rasterizer, events)
		}
	}
}

/// Converts the vector document `source` with an already running `rasterizer`.
pub fn build_vector_pyramid(
	source: &Path,
	output: &Path,
	config: &PyramidConfig,
	settings: &VectorSettings,
	rasterizer: &mut dyn Rasterizer,
	events: &EventBus,
) -> Result<PyramidSummary> {
	let mut job = VectorJob::new(source, settings, config.tile_size, rasterizer)?;
	run_job(&mut job, output, config, &Mode::Vector(settings.clone()), events)
}

fn run_job(
	job: &mut dyn PyramidJob,
	output: &Path,
	config: &PyramidConfig,
	mode: &Mode,
	events: &EventBus,
) -> Result<PyramidSummary> {
	log::info!(
		"{} pyramid on levels {}, {} tiles",
		mode.kind(),
		job.zoom_range(),
		job.tile_count()?
	);
	let mut emitter = TileEmitter::create(output, config, mode, events)?;
	job.run(&mut emitter)?;
	emitter.finish(job.zoom_range())
}

/// Composes and encodes the tiles of one raster level in parallel.
fn compose_level(image: &DynamicImage, cells: &[TileCell], tile_size: u32) -> Result<Vec<(TileCoord, Blob)>> {
	cells
		.par_iter()
		.map(|cell| {
			let tile = compose_tile(image, cell, tile_size)?;
			Ok((cell.coord, image2blob(&tile)?))
		})
		.collect()
}
