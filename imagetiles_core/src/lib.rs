//! Geometry, configuration and error types for building tile pyramids out of a single image.
//!
//! - [`projection`]: spherical Mercator math.
//! - [`grid`]: which tiles a level needs and where their pixels come from.
//! - [`config`]: YAML/CLI configuration and its validated [`Mode`].
//! - [`events`]: the progress event bus.

pub mod config;
pub mod error;
pub mod events;
pub mod grid;
pub mod projection;
pub mod types;

pub use config::{GeoSettings, Mode, ModeKind, PyramidConfig, RendererConfig, VectorSettings};
pub use error::PyramidError;
pub use events::{EventBus, PyramidEvent};
pub use types::*;
