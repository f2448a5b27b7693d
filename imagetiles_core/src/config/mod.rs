//! Run configuration.
//!
//! A [`PyramidConfig`] is read from YAML, overridden by command line flags, and finally validated
//! into an immutable [`Mode`] by [`PyramidConfig::resolve_mode`].

mod mode;
pub use mode::*;

use crate::{GeoAnchor, PyramidError, ZoomRange, projection::MAX_LEVEL};
use anyhow::{Result, bail};
use imagetiles_derive::context;
use serde::Deserialize;
use std::{
	fs::File,
	io::{BufReader, Read},
	path::{Path, PathBuf},
};

pub const DEFAULT_TILE_SIZE: u32 = 256;
pub const DEFAULT_BACKGROUND: &str = "#030303";

/// Everything a conversion run can be told.
#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct PyramidConfig {
	/// Side of a square tile in pixels.
	pub tile_size: u32,

	/// Explicit mode. Guessed from the other fields when absent.
	pub mode: Option<ModeKind>,

	/// `"lng,lat"` of the image center.
	pub center: Option<String>,

	/// Ground width of the full image in meters.
	pub meters_width: Option<f64>,

	/// Counter-clockwise rotation in degrees (geo mode).
	pub rotation: f64,

	/// Snap the image resolution to its target level (geo mode).
	pub pixel_perfect: bool,

	pub min_zoom: Option<u8>,

	pub max_zoom: Option<u8>,

	/// Background color of rendered vector tiles.
	pub background: String,

	/// Also write every tile to `{tiles_dir}/{z}/{x}/{y}.png`.
	pub tiles_dir: Option<PathBuf>,

	/// Metadata `name`. Defaults to the output file name.
	pub name: Option<String>,

	pub description: String,

	/// External rasterizer (vector mode).
	pub renderer: Option<RendererConfig>,
}

impl Default for PyramidConfig {
	fn default() -> Self {
		PyramidConfig {
			tile_size: DEFAULT_TILE_SIZE,
			mode: None,
			center: None,
			meters_width: None,
			rotation: 0.0,
			pixel_perfect: false,
			min_zoom: None,
			max_zoom: None,
			background: DEFAULT_BACKGROUND.to_string(),
			tiles_dir: None,
			name: None,
			description: String::new(),
			renderer: None,
		}
	}
}

impl PyramidConfig {
	pub fn from_reader<R: Read>(reader: R) -> Result<Self> {
		Ok(serde_yaml_ng::from_reader(reader)?)
	}

	pub fn from_string(text: &str) -> Result<Self> {
		Ok(serde_yaml_ng::from_str(text)?)
	}

	#[context("reading configuration from {path:?}")]
	pub fn from_path(path: &Path) -> Result<Self> {
		let file = File::open(path)?;
		PyramidConfig::from_reader(BufReader::new(file))
	}

	/// The mode this configuration asks for.
	///
	/// An explicit `mode` wins. Otherwise an `.svg` source means vector mode, a `center` or
	/// `meters_width` means geo mode, and anything else is plain mode.
	#[must_use]
	pub fn mode_kind(&self, source: &Path) -> ModeKind {
		if let Some(kind) = self.mode {
			return kind;
		}
		let is_svg = source
			.extension()
			.and_then(|ext| ext.to_str())
			.is_some_and(|ext| ext.eq_ignore_ascii_case("svg"));
		if is_svg {
			ModeKind::Vector
		} else if self.center.is_some() || self.meters_width.is_some() {
			ModeKind::Geo
		} else {
			ModeKind::Plain
		}
	}

	/// Validates the configuration for `source`.
	///
	/// # Errors
	/// [`PyramidError::InvalidConfiguration`] describing the first problem found.
	pub fn resolve_mode(&self, source: &Path) -> Result<Mode> {
		if self.tile_size == 0 {
			bail!(invalid("tile size must be at least 1"));
		}

		let kind = self.mode_kind(source);
		if kind != ModeKind::Vector && (self.min_zoom.is_some() || self.max_zoom.is_some()) {
			log::warn!("min/max zoom are derived from the image in {kind} mode; the given values are ignored");
		}

		Ok(match kind {
			ModeKind::Plain => {
				if self.rotation != 0.0 {
					log::warn!("rotation is only applied in geo mode");
				}
				Mode::Plain
			}
			ModeKind::Geo => {
				if !self.rotation.is_finite() {
					bail!(invalid(format!("rotation must be a finite angle, got {}", self.rotation)));
				}
				Mode::Geo(GeoSettings {
					anchor: self.anchor(kind)?,
					rotation: self.rotation,
					pixel_perfect: self.pixel_perfect,
				})
			}
			ModeKind::Vector => {
				let (Some(min), Some(max)) = (self.min_zoom, self.max_zoom) else {
					bail!(invalid("vector mode needs both min zoom and max zoom"));
				};
				if min > max || max > MAX_LEVEL {
					bail!(invalid(format!(
						"zoom range {min}..={max} must satisfy min <= max <= {MAX_LEVEL}"
					)));
				}
				let Some(renderer) = self.renderer.clone() else {
					bail!(invalid("vector mode needs a renderer"));
				};
				Mode::Vector(VectorSettings {
					anchor: self.anchor(kind)?,
					zoom: ZoomRange::new(min, max)?,
					background: parse_background(&self.background)?,
					renderer,
				})
			}
		})
	}

	fn anchor(&self, kind: ModeKind) -> Result<GeoAnchor> {
		let Some(center) = &self.center else {
			bail!(invalid(format!("{kind} mode needs a center")));
		};
		let Some(meters_width) = self.meters_width else {
			bail!(invalid(format!("{kind} mode needs the image width in meters")));
		};
		GeoAnchor::new(center, meters_width)
	}

	/// Metadata `name`: the configured name or the output file name.
	#[must_use]
	pub fn layer_name(&self, output: &Path) -> String {
		match &self.name {
			Some(name) => name.clone(),
			None => output
				.file_name()
				.map_or_else(|| output.display().to_string(), |name| name.to_string_lossy().into_owned()),
		}
	}
}

fn invalid(message: impl Into<String>) -> PyramidError {
	PyramidError::invalid_configuration(message)
}

/// Validates `#rrggbb` or `#rrggbbaa` and lowercases it.
pub fn parse_background(color: &str) -> Result<String> {
	let hex = color.trim().strip_prefix('#').unwrap_or("");
	if !matches!(hex.len(), 6 | 8) || !hex.chars().all(|c| c.is_ascii_hexdigit()) {
		bail!(invalid(format!("background {color:?} is not a #rrggbb color")));
	}
	Ok(format!("#{}", hex.to_ascii_lowercase()))
}
