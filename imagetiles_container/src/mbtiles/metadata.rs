//! The rows of the MBTiles `metadata` table.

use imagetiles_core::{GeoAnchor, ZoomRange};

/// Describes a tileset. Split into rows known at the start of a run and rows known at the end.
#[derive(Clone, Debug, PartialEq)]
pub struct TilesetMetadata {
	pub name: String,
	pub description: String,
	pub zoom_range: Option<ZoomRange>,
	/// Geo and vector tilesets carry a `center` row.
	pub anchor: Option<GeoAnchor>,
	/// Plain tilesets are not on the map and carry `projection = xy`.
	pub plain: bool,
}

impl TilesetMetadata {
	#[must_use]
	pub fn new(name: &str, description: &str) -> TilesetMetadata {
		TilesetMetadata {
			name: name.to_string(),
			description: description.to_string(),
			zoom_range: None,
			anchor: None,
			plain: false,
		}
	}

	/// Written right after the schema.
	#[must_use]
	pub fn header_entries(&self) -> Vec<(&'static str, String)> {
		vec![
			("name", self.name.clone()),
			("type", String::from("baselayer")),
			("version", String::from("1.0")),
			("description", self.description.clone()),
			("format", String::from("png")),
		]
	}

	/// Written once every level is committed.
	#[must_use]
	pub fn footer_entries(&self) -> Vec<(&'static str, String)> {
		let mut entries = Vec::new();
		if let Some(range) = self.zoom_range {
			entries.push(("minzoom", range.min.to_string()));
			entries.push(("maxzoom", range.max.to_string()));
			if let Some(anchor) = &self.anchor {
				entries.push(("center", anchor.center_metadata(center_zoom(range))));
			}
		}
		if self.plain {
			entries.push(("projection", String::from("xy")));
		}
		entries
	}
}

/// Zoom level advertised in `center`: one above the deepest, but inside the range.
fn center_zoom(range: ZoomRange) -> u8 {
	range.max.saturating_sub(1).max(range.min)
}
