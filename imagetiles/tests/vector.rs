mod test_utilities;

use anyhow::Result;
use assert_fs::TempDir;
use image::{DynamicImage, GenericImageView, Rgba, RgbaImage};
use imagetiles::{build_pyramid, build_vector_pyramid, renderer::Rasterizer};
use imagetiles_container::MBTilesReader;
use imagetiles_core::{
	EventBus, GeoAnchor, ModeKind, PyramidConfig, PyramidError, RendererConfig, VectorSettings, ZoomRange,
	grid::{DocumentArea, VectorPlanner},
};
use pretty_assertions::assert_eq;
use std::path::Path;
use test_utilities::*;

/// Paints every requested tile in the background color and remembers the areas.
struct FillRasterizer {
	size: (f64, f64),
	areas: Vec<[f64; 4]>,
	shrink: bool,
}

impl FillRasterizer {
	fn new(width: f64, height: f64) -> FillRasterizer {
		FillRasterizer {
			size: (width, height),
			areas: Vec::new(),
			shrink: false,
		}
	}
}

impl Rasterizer for FillRasterizer {
	fn document_size(&mut self, _source: &Path) -> Result<(f64, f64)> {
		Ok(self.size)
	}

	fn render(
		&mut self,
		_source: &Path,
		area: &DocumentArea,
		width: u32,
		height: u32,
		background: &str,
	) -> Result<DynamicImage> {
		self.areas.push(area.as_array());
		let channel = |i: usize| u8::from_str_radix(&background[i..i + 2], 16).unwrap();
		let color = Rgba([channel(1), channel(3), channel(5), 255]);
		let width = if self.shrink { width - 1 } else { width };
		Ok(DynamicImage::ImageRgba8(RgbaImage::from_pixel(width, height, color)))
	}
}

fn settings(zoom: ZoomRange) -> VectorSettings {
	VectorSettings {
		anchor: GeoAnchor::new("2.3,48.8", 1000.0).unwrap(),
		zoom,
		background: String::from("#102030"),
		renderer: RendererConfig {
			program: String::from("unused"),
			args: vec![],
		},
	}
}

#[test]
fn renders_every_planned_tile() -> Result<()> {
	let dir = TempDir::new()?;
	let output = dir.path().join("doc.mbtiles");
	let zoom = ZoomRange::new(10, 12)?;
	let mut rasterizer = FillRasterizer::new(2000.0, 1000.0);

	let summary = build_vector_pyramid(
		Path::new("doc.svg"),
		&output,
		&PyramidConfig::default(),
		&settings(zoom),
		&mut rasterizer,
		&EventBus::new(),
	)?;
	assert_eq!(summary.mode, ModeKind::Vector);
	assert_eq!(summary.zoom_range, zoom);

	let planner = VectorPlanner::new(settings(zoom).anchor, 2000.0, 1000.0, zoom, 256)?;
	assert_eq!(summary.tiles, planner.tile_count()?);
	assert_eq!(rasterizer.areas.len() as u64, summary.tiles);

	let reader = MBTilesReader::open(&output)?;
	let metadata = reader.metadata()?;
	assert_eq!(metadata["minzoom"], "10");
	assert_eq!(metadata["maxzoom"], "12");
	assert_eq!(metadata["center"], "2.3,48.8,11");

	let coord = reader.tile_coords()?[0];
	let tile = read_tile(&reader, coord.level, coord.x, coord.y);
	assert_eq!(tile.dimensions(), (256, 256));
	assert_eq!(tile.get_pixel(100, 100), Rgba([0x10, 0x20, 0x30, 255]));
	Ok(())
}

#[test]
fn areas_cover_the_document() -> Result<()> {
	let dir = TempDir::new()?;
	let zoom = ZoomRange::new(13, 13)?;
	let mut rasterizer = FillRasterizer::new(2000.0, 1000.0);
	build_vector_pyramid(
		Path::new("doc.svg"),
		&dir.path().join("doc.mbtiles"),
		&PyramidConfig::default(),
		&settings(zoom),
		&mut rasterizer,
		&EventBus::new(),
	)?;

	let min = |i: usize| rasterizer.areas.iter().map(|a| a[i]).fold(f64::INFINITY, f64::min);
	let max = |i: usize| rasterizer.areas.iter().map(|a| a[i]).fold(f64::NEG_INFINITY, f64::max);
	assert!(min(0) <= 0.0 && max(2) >= 2000.0);
	assert!(min(1) <= 0.0 && max(3) >= 1000.0);
	for area in &rasterizer.areas {
		assert!(area[0] < area[2] && area[1] < area[3]);
	}
	Ok(())
}

#[test]
fn wrong_tile_size_is_a_renderer_error() -> Result<()> {
	let dir = TempDir::new()?;
	let mut rasterizer = FillRasterizer::new(2000.0, 1000.0);
	rasterizer.shrink = true;
	let err = build_vector_pyramid(
		Path::new("doc.svg"),
		&dir.path().join("doc.mbtiles"),
		&PyramidConfig::default(),
		&settings(ZoomRange::new(11, 11)?),
		&mut rasterizer,
		&EventBus::new(),
	)
	.unwrap_err();
	assert!(matches!(
		PyramidError::classify(&err),
		Some(PyramidError::ExternalRenderer(_))
	));
	Ok(())
}

#[test]
fn missing_zoom_range_is_invalid() {
	let config = PyramidConfig {
		center: Some(String::from("2.3,48.8")),
		meters_width: Some(1000.0),
		renderer: RendererConfig::from_command("sh"),
		..PyramidConfig::default()
	};
	let err = build_pyramid(
		Path::new("doc.svg"),
		Path::new("never-written.mbtiles"),
		&config,
		&EventBus::new(),
	)
	.unwrap_err();
	assert!(matches!(
		PyramidError::classify(&err),
		Some(PyramidError::InvalidConfiguration(_))
	));
	assert!(!Path::new("never-written.mbtiles").exists());
}

#[cfg(unix)]
#[test]
fn subprocess_renderer_end_to_end() -> Result<()> {
	let dir = TempDir::new()?;
	let tile = dir.path().join("tile.png");
	RgbaImage::from_pixel(256, 256, Rgba([200, 100, 50, 255])).save(&tile)?;
	let script = format!(
		r#"while IFS= read -r line; do
	case "$line" in
		*'"op":"size"'*) echo '{{"status":"ok","width":1500,"height":900}}' ;;
		*)
			out=$(printf '%s' "$line" | sed -n 's/.*"output":"\([^"]*\)".*/\1/p')
			cp '{}' "$out"
			echo '{{"status":"ok","width":256,"height":256}}' ;;
	esac
done"#,
		tile.display()
	);

	let output = dir.path().join("doc.mbtiles");
	let config = PyramidConfig {
		center: Some(String::from("2.3,48.8")),
		meters_width: Some(1000.0),
		min_zoom: Some(12),
		max_zoom: Some(13),
		renderer: Some(RendererConfig {
			program: String::from("sh"),
			args: vec![String::from("-c"), script],
		}),
		..PyramidConfig::default()
	};
	let summary = build_pyramid(Path::new("doc.svg"), &output, &config, &EventBus::new())?;

	let zoom = ZoomRange::new(12, 13)?;
	let planner = VectorPlanner::new(settings(zoom).anchor, 1500.0, 900.0, zoom, 256)?;
	assert_eq!(summary.tiles, planner.tile_count()?);

	let reader = MBTilesReader::open(&output)?;
	assert_eq!(reader.tile_count()?, summary.tiles);
	let coord = reader.tile_coords()?[0];
	assert_eq!(
		read_tile(&reader, coord.level, coord.x, coord.y).get_pixel(0, 0),
		Rgba([200, 100, 50, 255])
	);
	Ok(())
}
