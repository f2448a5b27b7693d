//! Where tiles end up: the MBTiles database and an optional `{z}/{x}/{y}.png` directory mirror.

mod mbtiles;
mod mirror;

pub use mbtiles::*;
pub use mirror::*;
