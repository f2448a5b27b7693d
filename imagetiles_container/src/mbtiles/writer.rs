//! Writes a fresh MBTiles database.
//!
//! The schema is the MBTiles 1.0 layout: two plain tables and two unique indices. Tiles are
//! inserted with plain `INSERT`, so a duplicate `(zoom_level, tile_column, tile_row)` fails the
//! batch instead of silently replacing a tile.
//!
//! ```no_run
//! use imagetiles_container::MBTilesWriter;
//! use imagetiles_core::{Blob, TileCoord};
//! use std::path::Path;
//!
//! let mut writer = MBTilesWriter::create(Path::new("out.mbtiles")).unwrap();
//! writer.set_metadata("format", "png").unwrap();
//! writer
//! 	.add_tiles(&[(TileCoord::new(0, 0, 0).unwrap(), Blob::from(vec![1, 2, 3]))])
//! 	.unwrap();
//! writer.close().unwrap();
//! ```

use super::{TilesetMetadata, storage_error};
use anyhow::Result;
use imagetiles_core::{Blob, TileCoord};
use imagetiles_derive::context;
use r2d2::Pool;
use r2d2_sqlite::{SqliteConnectionManager, rusqlite::params};
use std::{
	fs::{File, remove_file},
	path::{Path, PathBuf},
};

const SCHEMA: &str = "CREATE TABLE metadata (name text, value text);
CREATE TABLE tiles (zoom_level integer, tile_column integer, tile_row integer, tile_data blob);
CREATE UNIQUE INDEX tile_index ON tiles (zoom_level, tile_column, tile_row);
CREATE UNIQUE INDEX name ON metadata (name);";

/// Writer for one MBTiles file.
pub struct MBTilesWriter {
	path: PathBuf,
	pool: Pool<SqliteConnectionManager>,
	tiles_written: u64,
}

impl MBTilesWriter {
	/// Creates the database at `path`, replacing any existing file, and sets up the schema.
	///
	/// # Errors
	/// [`imagetiles_core::PyramidError::StorageWrite`] if the file cannot be replaced or created.
	#[context("creating MBTiles database '{}'", path.display())]
	pub fn create(path: &Path) -> Result<MBTilesWriter> {
		if path.exists() {
			remove_file(path).map_err(storage_error)?;
		}
		// Fails fast on unwritable locations, where the pool would retry until it times out.
		File::create(path).map_err(storage_error)?;
		let manager = SqliteConnectionManager::file(path);
		let pool = Pool::builder().max_size(1).build(manager).map_err(storage_error)?;
		pool.get()
			.map_err(storage_error)?
			.execute_batch(SCHEMA)
			.map_err(storage_error)?;

		log::debug!("created MBTiles database {path:?}");
		Ok(MBTilesWriter {
			path: path.to_path_buf(),
			pool,
			tiles_written: 0,
		})
	}

	/// Number of tiles committed so far.
	#[must_use]
	pub fn tiles_written(&self) -> u64 {
		self.tiles_written
	}

	/// Inserts one metadata row.
	#[context("setting metadata '{}' = '{}'", name, value)]
	pub fn set_metadata(&self, name: &str, value: &str) -> Result<()> {
		self.pool
			.get()
			.map_err(storage_error)?
			.execute("INSERT INTO metadata VALUES (?1, ?2)", params![name, value])
			.map_err(storage_error)?;
		Ok(())
	}

	/// Inserts a list of metadata rows in one transaction.
	#[context("writing {} metadata entries", entries.len())]
	pub fn set_metadata_entries(&self, entries: &[(&str, String)]) -> Result<()> {
		let mut conn = self.pool.get().map_err(storage_error)?;
		let transaction = conn.transaction().map_err(storage_error)?;
		for (name, value) in entries {
			transaction
				.execute("INSERT INTO metadata VALUES (?1, ?2)", params![name, value])
				.map_err(storage_error)?;
		}
		transaction.commit().map_err(storage_error)?;
		Ok(())
	}

	/// Writes the fixed rows of `metadata` (name, type, version, description, format).
	pub fn write_header(&self, metadata: &TilesetMetadata) -> Result<()> {
		self.set_metadata_entries(&metadata.header_entries())
	}

	/// Writes the rows only known once every level is done (zoom range, center, projection).
	pub fn write_footer(&self, metadata: &TilesetMetadata) -> Result<()> {
		self.set_metadata_entries(&metadata.footer_entries())
	}

	/// Inserts `tiles` in a single transaction. Rows are TMS, as stored in `TileCoord`.
	///
	/// # Errors
	/// [`imagetiles_core::PyramidError::StorageWrite`] if any insert fails, including a duplicate
	/// coordinate. Nothing of the batch is committed then.
	#[context("adding {} tiles to '{}'", tiles.len(), self.path.display())]
	pub fn add_tiles(&mut self, tiles: &[(TileCoord, Blob)]) -> Result<()> {
		let mut conn = self.pool.get().map_err(storage_error)?;
		let transaction = conn.transaction().map_err(storage_error)?;
		{
			let mut statement = transaction
				.prepare_cached("INSERT INTO tiles VALUES (?1, ?2, ?3, ?4)")
				.map_err(storage_error)?;
			for (coord, blob) in tiles {
				statement
					.execute(params![coord.level, coord.x, coord.y, blob.as_slice()])
					.map_err(|e| storage_error(format!("{coord:?}: {e}")))?;
			}
		}
		transaction.commit().map_err(storage_error)?;
		self.tiles_written += tiles.len() as u64;
		Ok(())
	}

	/// Flushes and closes the database.
	#[context("closing '{}'", self.path.display())]
	pub fn close(self) -> Result<()> {
		self.pool
			.get()
			.map_err(storage_error)?
			.execute_batch("PRAGMA optimize;")
			.map_err(storage_error)?;
		log::debug!("closed {:?} after {} tiles", self.path, self.tiles_written);
		Ok(())
	}
}
