#![allow(unused)]

use assert_cmd::{Command, cargo};
use image::DynamicImage;
use imagetiles_container::MBTilesReader;
use imagetiles_core::{EventBus, PyramidEvent, TileCoord};
use imagetiles_image::{DynamicImageTraitTest, blob2image};
use std::{
	path::{Path, PathBuf},
	sync::{Arc, Mutex},
};

/// Writes an opaque `width × height` gradient PNG into `dir`.
pub fn write_test_image(dir: &Path, name: &str, width: u32, height: u32) -> PathBuf {
	let path = dir.join(name);
	DynamicImage::new_test_rgba(width, height).save(&path).unwrap();
	path
}

/// Reads and decodes one tile, failing if it is missing.
pub fn read_tile(reader: &MBTilesReader, level: u8, x: u32, y: u32) -> DynamicImage {
	let coord = TileCoord::new(level, x, y).unwrap();
	let blob = reader
		.get_tile(&coord)
		.unwrap()
		.unwrap_or_else(|| panic!("missing tile {coord:?}"));
	blob2image(&blob).unwrap()
}

pub fn is_transparent(image: &DynamicImage) -> bool {
	image.to_rgba8().pixels().all(|pixel| pixel[3] == 0)
}

/// An event bus that records everything emitted on it.
pub fn recording_bus() -> (EventBus, Arc<Mutex<Vec<PyramidEvent>>>) {
	let bus = EventBus::new();
	let events = Arc::new(Mutex::new(Vec::new()));
	let events_clone = events.clone();
	bus.subscribe(move |event| events_clone.lock().unwrap().push(event.clone()));
	(bus, events)
}

pub fn imagetiles_cmd() -> Command {
	Command::new(cargo::cargo_bin!("imagetiles"))
}
