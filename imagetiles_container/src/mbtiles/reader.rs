//! Read access to an MBTiles file, used to inspect what a run produced.

use anyhow::{Result, ensure};
use imagetiles_core::{Blob, TileCoord};
use imagetiles_derive::context;
use r2d2::Pool;
use r2d2_sqlite::{
	SqliteConnectionManager,
	rusqlite::{OpenFlags, OptionalExtension, params},
};
use std::{collections::BTreeMap, path::Path};

pub struct MBTilesReader {
	pool: Pool<SqliteConnectionManager>,
}

impl MBTilesReader {
	/// Opens an existing file read-only.
	///
	/// Read failures are plain errors. They belong to no [`imagetiles_core::PyramidError`] kind,
	/// which all describe a failing run.
	#[context("opening MBTiles database '{}'", path.display())]
	pub fn open(path: &Path) -> Result<MBTilesReader> {
		ensure!(path.is_file(), "file {path:?} does not exist");
		let manager = SqliteConnectionManager::file(path).with_flags(OpenFlags::SQLITE_OPEN_READ_ONLY);
		let pool = Pool::builder().max_size(2).build(manager)?;
		Ok(MBTilesReader { pool })
	}

	/// All `metadata` rows.
	pub fn metadata(&self) -> Result<BTreeMap<String, String>> {
		let conn = self.pool.get()?;
		let mut stmt = conn.prepare("SELECT name, value FROM metadata")?;
		let entries = stmt
			.query_map([], |row| Ok((row.get::<_, String>(0)?, row.get::<_, String>(1)?)))?
			.collect::<Result<BTreeMap<_, _>, _>>()?;
		Ok(entries)
	}

	pub fn tile_count(&self) -> Result<u64> {
		let conn = self.pool.get()?;
		let count: i64 = conn.query_row("SELECT COUNT(*) FROM tiles", [], |row| row.get(0))?;
		Ok(count as u64)
	}

	/// Number of tiles per zoom level.
	pub fn count_by_level(&self) -> Result<BTreeMap<u8, u64>> {
		let conn = self.pool.get()?;
		let mut stmt = conn.prepare("SELECT zoom_level, COUNT(*) FROM tiles GROUP BY zoom_level")?;
		let counts = stmt
			.query_map([], |row| Ok((row.get::<_, u8>(0)?, row.get::<_, i64>(1)? as u64)))?
			.collect::<Result<BTreeMap<_, _>, _>>()?;
		Ok(counts)
	}

	#[context("reading tile {:?}", coord)]
	pub fn get_tile(&self, coord: &TileCoord) -> Result<Option<Blob>> {
		let conn = self.pool.get()?;
		let data = conn
			.query_row(
				"SELECT tile_data FROM tiles WHERE zoom_level = ?1 AND tile_column = ?2 AND tile_row = ?3",
				params![coord.level, coord.x, coord.y],
				|row| row.get::<_, Vec<u8>>(0),
			)
			.optional()?;
		Ok(data.map(Blob::from))
	}

	/// Every stored coordinate, sorted.
	pub fn tile_coords(&self) -> Result<Vec<TileCoord>> {
		let conn = self.pool.get()?;
		let mut stmt = conn.prepare("SELECT zoom_level, tile_column, tile_row FROM tiles")?;
		let rows = stmt
			.query_map([], |row| Ok((row.get::<_, u8>(0)?, row.get::<_, u32>(1)?, row.get::<_, u32>(2)?)))?
			.collect::<Result<Vec<_>, _>>()?;
		let mut coords = rows
			.into_iter()
			.map(|(level, x, y)| TileCoord::new(level, x, y))
			.collect::<Result<Vec<_>>>()?;
		coords.sort();
		Ok(coords)
	}

	/// The `CREATE` statements of all tables and indices, sorted.
	pub fn schema(&self) -> Result<Vec<String>> {
		let conn = self.pool.get()?;
		let mut stmt = conn.prepare("SELECT sql FROM sqlite_master WHERE sql IS NOT NULL ORDER BY sql")?;
		let statements = stmt
			.query_map([], |row| row.get::<_, String>(0))?
			.collect::<Result<Vec<_>, _>>()?;
		Ok(statements)
	}
}
