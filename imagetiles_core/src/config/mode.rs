use crate::{GeoAnchor, ZoomRange};
use serde::Deserialize;
use std::{fmt, str::FromStr};

/// Which pyramid a run builds.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ModeKind {
	/// Grid-aligned pyramid without geographic reference.
	Plain,
	/// Raster image anchored at a longitude/latitude.
	Geo,
	/// Vector document anchored at a longitude/latitude, rendered by an external program.
	Vector,
}

impl fmt::Display for ModeKind {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(match self {
			ModeKind::Plain => "plain",
			ModeKind::Geo => "geo",
			ModeKind::Vector => "vector",
		})
	}
}

impl FromStr for ModeKind {
	type Err = String;

	fn from_str(s: &str) -> Result<Self, Self::Err> {
		match s.to_ascii_lowercase().as_str() {
			"plain" => Ok(ModeKind::Plain),
			"geo" => Ok(ModeKind::Geo),
			"vector" | "svg" => Ok(ModeKind::Vector),
			_ => Err(format!("unknown mode {s:?}, expected plain, geo or vector")),
		}
	}
}

/// The command line of an external rasterizer.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RendererConfig {
	pub program: String,
	#[serde(default)]
	pub args: Vec<String>,
}

impl RendererConfig {
	/// Splits a command line on whitespace: the first word is the program.
	#[must_use]
	pub fn from_command(command: &str) -> Option<RendererConfig> {
		let mut words = command.split_whitespace().map(String::from);
		let program = words.next()?;
		Some(RendererConfig {
			program,
			args: words.collect(),
		})
	}
}

#[derive(Clone, Debug, PartialEq)]
pub struct GeoSettings {
	pub anchor: GeoAnchor,
	/// Counter-clockwise rotation in degrees applied before tiling.
	pub rotation: f64,
	pub pixel_perfect: bool,
}

#[derive(Clone, Debug, PartialEq)]
pub struct VectorSettings {
	pub anchor: GeoAnchor,
	pub zoom: ZoomRange,
	/// `#rrggbb` or `#rrggbbaa`, lowercase.
	pub background: String,
	pub renderer: RendererConfig,
}

/// A validated mode with everything it needs.
#[derive(Clone, Debug, PartialEq)]
pub enum Mode {
	Plain,
	Geo(GeoSettings),
	Vector(VectorSettings),
}

impl Mode {
	#[must_use]
	pub fn kind(&self) -> ModeKind {
		match self {
			Mode::Plain => ModeKind::Plain,
			Mode::Geo(_) => ModeKind::Geo,
			Mode::Vector(_) => ModeKind::Vector,
		}
	}
}
