mod test_utilities;

use assert_fs::{TempDir, prelude::*};
use imagetiles_container::MBTilesReader;
use predicates::{prelude::*, str};
use test_utilities::*;

#[test]
fn requires_image_and_output() {
	imagetiles_cmd()
		.assert()
		.failure()
		.code(2)
		.stdout(str::is_empty())
		.stderr(str::contains("Usage: imagetiles"));
}

#[test]
fn help_lists_the_flags() {
	imagetiles_cmd().arg("--help").assert().success().stdout(
		str::contains("--meterswidth")
			.and(str::contains("--center"))
			.and(str::contains("--tilesdir"))
			.and(str::contains("--px"))
			.and(str::contains("--minzoom"))
			.and(str::contains("--maxzoom"))
			.and(str::contains("--background"))
			.and(str::contains("Usage: imagetiles [OPTIONS] <IMAGE> <MBTILES>")),
	);
}

#[test]
fn plain_conversion() {
	let dir = TempDir::new().unwrap();
	let source = write_test_image(dir.path(), "square.png", 512, 512);
	let output = dir.child("square.mbtiles");

	imagetiles_cmd()
		.arg(&source)
		.arg(output.path())
		.assert()
		.success()
		.stdout(str::is_empty());

	output.assert(predicate::path::is_file());
	assert_eq!(MBTilesReader::open(output.path()).unwrap().tile_count().unwrap(), 5);
}

#[test]
fn geo_conversion_with_mirror() {
	let dir = TempDir::new().unwrap();
	let source = write_test_image(dir.path(), "paris.png", 200, 200);
	let output = dir.child("paris.mbtiles");

	imagetiles_cmd()
		.arg(&source)
		.arg(output.path())
		.args(["--center", "2.3,48.8", "--meterswidth", "200", "--rotation", "-15"])
		.arg("--tilesdir")
		.arg(dir.child("tiles").path())
		.arg("-v")
		.assert()
		.success()
		.stderr(str::contains("finished:"));

	let reader = MBTilesReader::open(output.path()).unwrap();
	let metadata = reader.metadata().unwrap();
	assert!(metadata["center"].starts_with("2.3,48.8,"));
	for coord in reader.tile_coords().unwrap() {
		dir.child(format!("tiles/{}", coord.as_xyz_path("png")))
			.assert(predicate::path::is_file());
	}
}

#[test]
fn geo_without_width_is_rejected() {
	let dir = TempDir::new().unwrap();
	let source = write_test_image(dir.path(), "paris.png", 64, 64);
	let output = dir.child("paris.mbtiles");

	imagetiles_cmd()
		.arg(&source)
		.arg(output.path())
		.args(["--center", "2.3,48.8"])
		.assert()
		.failure()
		.stderr(str::contains("invalid configuration"));
	output.assert(predicate::path::missing());
}

#[test]
fn vector_without_zoom_is_rejected() {
	let dir = TempDir::new().unwrap();
	let output = dir.child("doc.mbtiles");

	imagetiles_cmd()
		.arg(dir.child("doc.svg").path())
		.arg(output.path())
		.args(["--center", "2.3,48.8", "--meterswidth", "1000", "--renderer", "sh"])
		.assert()
		.failure()
		.stderr(str::contains("min zoom"));
	output.assert(predicate::path::missing());
}

#[test]
fn config_file_is_read() {
	let dir = TempDir::new().unwrap();
	let source = write_test_image(dir.path(), "square.png", 512, 512);
	let config = dir.child("config.yaml");
	config.write_str("tile_size: 512\nname: From YAML\n").unwrap();
	let output = dir.child("square.mbtiles");

	imagetiles_cmd()
		.arg(&source)
		.arg(output.path())
		.arg("--config")
		.arg(config.path())
		.assert()
		.success();

	let reader = MBTilesReader::open(output.path()).unwrap();
	assert_eq!(reader.tile_count().unwrap(), 1);
	assert_eq!(reader.metadata().unwrap()["name"], "From YAML");
}
