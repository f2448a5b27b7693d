//! # imagetiles
//!
//! Cuts one image into a tile pyramid stored as MBTiles.
//!
//! - **plain**: the image is the whole world, tiled from level 0 up to the level where it is shown
//!   at full resolution.
//! - **geo**: the image is anchored at a longitude/latitude with a known ground width and placed
//!   on the Web Mercator grid.
//! - **vector**: like geo, but a vector document is rendered tile by tile by an external program.
//!
//! ```no_run
//! use imagetiles::build_pyramid;
//! use imagetiles_core::{EventBus, PyramidConfig};
//! use std::path::Path;
//!
//! let config = PyramidConfig {
//! 	center: Some(String::from("2.3,48.8")),
//! 	meters_width: Some(1000.0),
//! 	..PyramidConfig::default()
//! };
//! let summary = build_pyramid(
//! 	Path::new("paris.png"),
//! 	Path::new("paris.mbtiles"),
//! 	&config,
//! 	&EventBus::new(),
//! )
//! .unwrap();
//! println!("{} tiles on levels {}", summary.tiles, summary.zoom_range);
//! ```

pub mod pyramid;
pub mod renderer;

pub use pyramid::{PyramidSummary, build_pyramid, build_vector_pyramid};
