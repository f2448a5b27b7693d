//! Writes tiles to a `{z}/{x}/{y}.png` tree with XYZ (top-origin) rows.

use super::TileMirror;
use anyhow::{Context, Result};
use imagetiles_core::{Blob, PyramidError, TileCoord};
use std::{
	fs,
	path::{Path, PathBuf},
};

#[derive(Debug, Clone)]
pub struct DirectoryMirror {
	root: PathBuf,
}

impl DirectoryMirror {
	#[must_use]
	pub fn new(root: &Path) -> DirectoryMirror {
		DirectoryMirror {
			root: root.to_path_buf(),
		}
	}

	/// Where `coord` ends up.
	#[must_use]
	pub fn tile_path(&self, coord: &TileCoord) -> PathBuf {
		self.root.join(coord.as_xyz_path("png"))
	}
}

impl TileMirror for DirectoryMirror {
	fn write_tile(&self, coord: &TileCoord, blob: &Blob) -> Result<()> {
		let path = self.tile_path(coord);
		let write = || -> std::io::Result<()> {
			if let Some(parent) = path.parent() {
				fs::create_dir_all(parent)?;
			}
			fs::write(&path, blob.as_slice())
		};
		write()
			.map_err(|e| PyramidError::storage_write(e.to_string()))
			.with_context(|| format!("mirroring {coord:?} to {path:?}"))
	}
}
