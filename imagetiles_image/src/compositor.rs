//! Tile Compositor: turns a planned [`TileCell`] into an `S × S` RGBA tile.

use crate::traits::DynamicImageTraitOperation;
use anyhow::{Result, bail};
use image::{DynamicImage, imageops::replace};
use imagetiles_core::{PyramidError, grid::TileCell};
use imagetiles_derive::context;

/// A fully transparent `tile_size × tile_size` tile.
#[must_use]
pub fn blank_tile(tile_size: u32) -> DynamicImage {
	DynamicImage::new_rgba8(tile_size, tile_size)
}

/// Builds the tile for `cell` out of `image`.
///
/// The cell's source region is cut from `image`, box-resampled if its target size differs, and
/// copied into a transparent tile at the target position. A cell without placement yields a
/// transparent tile.
///
/// # Errors
/// [`PyramidError::Composition`] if the region leaves the image or the target leaves the tile.
#[context("composing tile {:?}", cell.coord)]
pub fn compose_tile(image: &DynamicImage, cell: &TileCell, tile_size: u32) -> Result<DynamicImage> {
	let mut tile = blank_tile(tile_size);
	let Some(placement) = cell.placement else {
		return Ok(tile);
	};

	let target = placement.target;
	if target.is_empty() || !target.fits_within(tile_size, tile_size) {
		bail!(PyramidError::composition(format!(
			"target {target:?} does not fit a {tile_size} px tile"
		)));
	}

	let part = image.get_region_resized(placement.source, target.width, target.height)?;
	replace(&mut tile, &part, i64::from(target.x), i64::from(target.y));
	Ok(tile)
}
