//! Raster side of tile pyramid generation: decoding the source, pixel operations and composing
//! `S × S` tiles.

pub mod compositor;
pub mod format;
pub mod source;
pub mod traits;

pub use compositor::{blank_tile, compose_tile};
pub use format::png::{blob2image, image2blob};
pub use source::load_source;
pub use traits::*;
