//! Value types shared by the planner, compositor and writer.

mod blob;
pub use blob::*;

mod geo_anchor;
pub use geo_anchor::*;

mod pixel_box;
pub use pixel_box::*;

mod tile_coord;
pub use tile_coord::*;

mod zoom_range;
pub use zoom_range::*;
