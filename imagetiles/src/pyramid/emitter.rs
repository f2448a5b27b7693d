//! The single writer of a run: owns the MBTiles file, the optional mirror and the event bus.

use super::PyramidSummary;
use anyhow::Result;
use imagetiles_container::{DirectoryMirror, MBTilesWriter, TileMirror, TilesetMetadata};
use imagetiles_core::{Blob, EventBus, Mode, ModeKind, PyramidConfig, PyramidEvent, TileCoord, ZoomRange};
use imagetiles_derive::context;
use std::path::Path;

pub struct TileEmitter {
	writer: MBTilesWriter,
	mirror: Option<Box<dyn TileMirror>>,
	metadata: TilesetMetadata,
	events: EventBus,
	mode: ModeKind,
	tiles: u64,
}

impl TileEmitter {
	/// Creates the output database and writes the fixed metadata rows.
	#[context("preparing output '{}'", output.display())]
	pub fn create(output: &Path, config: &PyramidConfig, mode: &Mode, events: &EventBus) -> Result<TileEmitter> {
		let writer = MBTilesWriter::create(output)?;

		let mut metadata = TilesetMetadata::new(&config.layer_name(output), &config.description);
		metadata.plain = matches!(mode, Mode::Plain);
		metadata.anchor = match mode {
			Mode::Plain => None,
			Mode::Geo(settings) => Some(settings.anchor),
			Mode::Vector(settings) => Some(settings.anchor),
		};
		writer.write_header(&metadata)?;

		let mirror = config.tiles_dir.as_deref().map(|dir| {
			log::debug!("mirroring tiles to {dir:?}");
			Box::new(DirectoryMirror::new(dir)) as Box<dyn TileMirror>
		});

		events.emit(PyramidEvent::RunStarted {
			mode: mode.kind(),
			tile_size: config.tile_size,
		});
		Ok(TileEmitter {
			writer,
			mirror,
			metadata,
			events: events.clone(),
			mode: mode.kind(),
			tiles: 0,
		})
	}

	pub fn start_level(&self, level: u8, tiles: u64) {
		self.events.emit(PyramidEvent::LevelStarted { level, tiles });
	}

	/// Commits every tile of `level` in one transaction, then mirrors them.
	#[context("writing level {}", level)]
	pub fn write_level(&mut self, level: u8, tiles: Vec<(TileCoord, Blob)>) -> Result<()> {
		self.writer.add_tiles(&tiles)?;
		for (coord, blob) in &tiles {
			if let Some(mirror) = &self.mirror {
				mirror.write_tile(coord, blob)?;
			}
			self.events.emit(PyramidEvent::TileCompleted { coord: *coord });
		}

		let count = tiles.len() as u64;
		self.tiles += count;
		self.events.emit(PyramidEvent::LevelCompleted { level, tiles: count });
		Ok(())
	}

	/// Writes the zoom range rows and closes the database.
	#[context("finalizing output")]
	pub fn finish(mut self, zoom_range: ZoomRange) -> Result<PyramidSummary> {
		self.metadata.zoom_range = Some(zoom_range);
		self.writer.write_footer(&self.metadata)?;
		self.writer.close()?;

		self.events.emit(PyramidEvent::RunCompleted {
			zoom_range,
			tiles: self.tiles,
		});
		Ok(PyramidSummary {
			mode: self.mode,
			zoom_range,
			tiles: self.tiles,
		})
	}
}
