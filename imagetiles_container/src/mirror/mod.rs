//! Optional copies of every tile outside the MBTiles file.

mod directory;
pub use directory::*;

use anyhow::Result;
use imagetiles_core::{Blob, TileCoord};

/// Receives every tile as soon as it is encoded.
pub trait TileMirror: Send + Sync {
	fn write_tile(&self, coord: &TileCoord, blob: &Blob) -> Result<()>;
}
