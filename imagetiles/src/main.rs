use anyhow::{Result, bail};
use clap::Parser;
use clap_verbosity_flag::{Verbosity, WarnLevel};
use imagetiles::build_pyramid;
use imagetiles_core::{EventBus, ModeKind, PyramidConfig, PyramidError, RendererConfig, events::log_event};
use std::path::PathBuf;

/// Cut an image into a tile pyramid stored as MBTiles
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Cli {
	/// source image (PNG, JPEG, TIFF, WebP) or SVG document
	#[arg()]
	image: PathBuf,

	/// MBTiles file to create, an existing file is replaced
	#[arg()]
	mbtiles: PathBuf,

	/// read settings from a YAML file, flags override its values
	#[arg(long, value_name = "FILE", display_order = 0)]
	config: Option<PathBuf>,

	/// plain, geo or vector (guessed from the other settings if omitted)
	#[arg(long, display_order = 1)]
	mode: Option<ModeKind>,

	/// longitude and latitude of the image center
	#[arg(long, value_name = "lng,lat", allow_hyphen_values = true, display_order = 1)]
	center: Option<String>,

	/// ground width of the whole image in meters
	#[arg(long = "meterswidth", value_name = "METERS", display_order = 1)]
	meters_width: Option<f64>,

	/// rotate the image counter-clockwise by this many degrees
	#[arg(long, value_name = "DEGREES", allow_hyphen_values = true, display_order = 1)]
	rotation: Option<f64>,

	/// snap the image resolution to its deepest level so that level is not resampled
	#[arg(long = "px", display_order = 1)]
	pixel_perfect: bool,

	/// lowest zoom level (vector mode)
	#[arg(long = "minzoom", value_name = "int", display_order = 2)]
	min_zoom: Option<u8>,

	/// highest zoom level (vector mode)
	#[arg(long = "maxzoom", value_name = "int", display_order = 2)]
	max_zoom: Option<u8>,

	/// background color of rendered tiles as #rrggbb (vector mode)
	#[arg(long, value_name = "COLOR", display_order = 2)]
	background: Option<String>,

	/// command line of the renderer, e.g. "render-svg --serve" (vector mode)
	#[arg(long, value_name = "COMMAND", display_order = 2)]
	renderer: Option<String>,

	/// side of a tile in pixels [default: 256]
	#[arg(long, value_name = "PIXELS", display_order = 3)]
	tile_size: Option<u32>,

	/// also write every tile to DIR/{z}/{x}/{y}.png
	#[arg(long = "tilesdir", value_name = "DIR", display_order = 3)]
	tiles_dir: Option<PathBuf>,

	/// metadata name [default: the MBTiles file name]
	#[arg(long, display_order = 3)]
	name: Option<String>,

	/// metadata description
	#[arg(long, display_order = 3)]
	description: Option<String>,

	#[command(flatten)]
	verbose: Verbosity<WarnLevel>,
}

impl Cli {
	/// The configuration file, if any, with every given flag applied on top.
	fn config(&self) -> Result<PyramidConfig> {
		let mut config = match &self.config {
			Some(path) => PyramidConfig::from_path(path)?,
			None => PyramidConfig::default(),
		};

		if let Some(mode) = self.mode {
			config.mode = Some(mode);
		}
		if let Some(center) = &self.center {
			config.center = Some(center.clone());
		}
		if let Some(meters_width) = self.meters_width {
			config.meters_width = Some(meters_width);
		}
		if let Some(rotation) = self.rotation {
			config.rotation = rotation;
		}
		if self.pixel_perfect {
			config.pixel_perfect = true;
		}
		if let Some(min_zoom) = self.min_zoom {
			config.min_zoom = Some(min_zoom);
		}
		if let Some(max_zoom) = self.max_zoom {
			config.max_zoom = Some(max_zoom);
		}
		if let Some(background) = &self.background {
			config.background = background.clone();
		}
		if let Some(command) = &self.renderer {
			let Some(renderer) = RendererConfig::from_command(command) else {
				bail!(PyramidError::invalid_configuration("the renderer command is empty"));
			};
			config.renderer = Some(renderer);
		}
		if let Some(tile_size) = self.tile_size {
			config.tile_size = tile_size;
		}
		if let Some(tiles_dir) = &self.tiles_dir {
			config.tiles_dir = Some(tiles_dir.clone());
		}
		if let Some(name) = &self.name {
			config.name = Some(name.clone());
		}
		if let Some(description) = &self.description {
			config.description = description.clone();
		}
		Ok(config)
	}
}

fn main() -> Result<()> {
	let cli = Cli::parse();

	env_logger::Builder::new()
		.filter_level(cli.verbose.log_level_filter())
		.format_timestamp(None)
		.init();

	run(&cli)
}

fn run(cli: &Cli) -> Result<()> {
	let config = cli.config()?;
	let events = EventBus::new();
	events.subscribe(log_event);

	let summary = build_pyramid(&cli.image, &cli.mbtiles, &config, &events)?;
	eprintln!(
		"wrote {} tiles on levels {} to {:?}",
		summary.tiles, summary.zoom_range, cli.mbtiles
	);
	Ok(())
}
