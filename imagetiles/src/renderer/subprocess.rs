use super::{
	Rasterizer,
	protocol::{RenderRequest, RenderResponse},
};
use anyhow::{Context, Result, bail};
use image::DynamicImage;
use imagetiles_core::{PyramidError, RendererConfig, grid::DocumentArea};
use imagetiles_derive::context;
use std::{
	fs,
	io::{BufRead, BufReader, Write},
	path::{Path, PathBuf},
	process::{Child, ChildStdin, ChildStdout, Command, Stdio},
};
use tempfile::TempDir;

fn renderer_error(err: impl std::fmt::Display) -> PyramidError {
	PyramidError::external_renderer(err.to_string())
}

/// One child process serving every request of a run, strictly one request at a time.
///
/// The child is killed when the session is dropped.
pub struct SubprocessRasterizer {
	program: String,
	child: Child,
	stdin: ChildStdin,
	stdout: BufReader<ChildStdout>,
	scratch: TempDir,
	rendered: u64,
}

impl SubprocessRasterizer {
	#[context("starting renderer '{}'", config.program)]
	pub fn spawn(config: &RendererConfig) -> Result<SubprocessRasterizer> {
		let mut child = Command::new(&config.program)
			.args(&config.args)
			.stdin(Stdio::piped())
			.stdout(Stdio::piped())
			.stderr(Stdio::inherit())
			.spawn()
			.map_err(renderer_error)?;

		let (Some(stdin), Some(stdout)) = (child.stdin.take(), child.stdout.take()) else {
			let _ = child.kill();
			bail!(renderer_error("failed to open the renderer's stdin/stdout"));
		};
		let scratch = tempfile::Builder::new()
			.prefix("imagetiles-render")
			.tempdir()
			.map_err(renderer_error)?;

		log::debug!("started renderer {:?} {:?}", config.program, config.args);
		Ok(SubprocessRasterizer {
			program: config.program.clone(),
			child,
			stdin,
			stdout: BufReader::new(stdout),
			scratch,
			rendered: 0,
		})
	}

	/// Sends `request` and waits for its answer line.
	fn exchange(&mut self, request: &RenderRequest) -> Result<(f64, f64)> {
		let line = request.to_line()?;
		log::trace!("renderer <- {}", line.trim_end());
		self.stdin
			.write_all(line.as_bytes())
			.and_then(|()| self.stdin.flush())
			.map_err(renderer_error)?;

		let mut answer = String::new();
		let read = self.stdout.read_line(&mut answer).map_err(renderer_error)?;
		if read == 0 {
			let status = self.child.try_wait().ok().flatten();
			bail!(renderer_error(match status {
				Some(status) => format!("'{}' exited with {status}", self.program),
				None => format!("'{}' closed its output", self.program),
			}));
		}
		log::trace!("renderer -> {}", answer.trim_end());
		RenderResponse::from_line(&answer)?.into_size()
	}

	fn next_output(&mut self) -> PathBuf {
		self.rendered += 1;
		self.scratch.path().join(format!("tile-{}.png", self.rendered))
	}
}

impl Rasterizer for SubprocessRasterizer {
	#[context("asking '{}' for the size of {:?}", self.program, source)]
	fn document_size(&mut self, source: &Path) -> Result<(f64, f64)> {
		let (width, height) = self.exchange(&RenderRequest::Size {
			source: source.to_path_buf(),
		})?;
		if !(width.is_finite() && height.is_finite() && width > 0.0 && height > 0.0) {
			bail!(renderer_error(format!("reported document size {width}x{height}")));
		}
		Ok((width, height))
	}

	#[context("rendering {:?} of {:?}", area.as_array(), source)]
	fn render(
		&mut self,
		source: &Path,
		area: &DocumentArea,
		width: u32,
		height: u32,
		background: &str,
	) -> Result<DynamicImage> {
		let output = self.next_output();
		let reported = self.exchange(&RenderRequest::Render {
			source: source.to_path_buf(),
			area: area.as_array(),
			width,
			height,
			background: background.to_string(),
			output: output.clone(),
		})?;
		if reported != (f64::from(width), f64::from(height)) {
			bail!(renderer_error(format!(
				"asked for {width}x{height} px, got {}x{}",
				reported.0, reported.1
			)));
		}

		let bytes = fs::read(&output)
			.map_err(renderer_error)
			.with_context(|| format!("reading rendered tile {output:?}"))?;
		let _ = fs::remove_file(&output);
		let image = image::load_from_memory(&bytes)
			.map_err(|e| renderer_error(format!("rendered tile {output:?} is not an image: {e}")))?;
		Ok(image)
	}
}

impl Drop for SubprocessRasterizer {
	fn drop(&mut self) {
		let _ = self.child.kill();
		let _ = self.child.wait();
	}
}

#[cfg(all(test, unix))]
mod tests {
	use super::*;
	use assert_fs::TempDir;
	use image::{GenericImageView, Rgba, RgbaImage};

	fn is_renderer_error(err: &anyhow::Error) -> bool {
		matches!(
			PyramidError::classify(err),
			Some(PyramidError::ExternalRenderer(_))
		)
	}

	fn shell(script: &str) -> RendererConfig {
		RendererConfig {
			program: String::from("sh"),
			args: vec![String::from("-c"), script.to_string()],
		}
	}

	/// Answers `size` with 2000x1000 and copies `tile` to every requested output.
	fn fake_renderer(tile: &Path) -> RendererConfig {
		shell(&format!(
			r#"while IFS= read -r line; do
	case "$line" in
		*'"op":"size"'*) echo '{{"status":"ok","width":2000,"height":1000}}' ;;
		*'"op":"render"'*)
			out=$(printf '%s' "$line" | sed -n 's/.*"output":"\([^"]*\)".*/\1/p')
			cp '{}' "$out"
			echo '{{"status":"ok","width":4,"height":4}}' ;;
		*) echo '{{"status":"error","message":"unknown op"}}' ;;
	esac
done"#,
			tile.display()
		))
	}

	fn area() -> DocumentArea {
		DocumentArea {
			x0: 0.0,
			y0: 0.0,
			x1: 10.0,
			y1: 10.0,
		}
	}

	#[test]
	fn size_and_render() -> Result<()> {
		let dir = TempDir::new()?;
		let tile = dir.path().join("tile.png");
		RgbaImage::from_pixel(4, 4, Rgba([1, 2, 3, 255])).save(&tile)?;

		let mut renderer = SubprocessRasterizer::spawn(&fake_renderer(&tile))?;
		assert_eq!(renderer.document_size(Path::new("doc.svg"))?, (2000.0, 1000.0));
		for _ in 0..3 {
			let image = renderer.render(Path::new("doc.svg"), &area(), 4, 4, "#030303")?;
			assert_eq!(image.dimensions(), (4, 4));
			assert_eq!(image.get_pixel(3, 3), Rgba([1, 2, 3, 255]));
		}
		Ok(())
	}

	#[test]
	fn size_mismatch_is_fatal() -> Result<()> {
		let dir = TempDir::new()?;
		let tile = dir.path().join("tile.png");
		RgbaImage::new(4, 4).save(&tile)?;

		let mut renderer = SubprocessRasterizer::spawn(&fake_renderer(&tile))?;
		let err = renderer
			.render(Path::new("doc.svg"), &area(), 8, 8, "#030303")
			.unwrap_err();
		assert!(is_renderer_error(&err), "{err:#}");
		Ok(())
	}

	#[test]
	fn error_answer_is_fatal() -> Result<()> {
		let mut renderer = SubprocessRasterizer::spawn(&shell(
			r#"read -r line; echo '{"status":"error","message":"cannot open doc.svg"}'"#,
		))?;
		let err = renderer.document_size(Path::new("doc.svg")).unwrap_err();
		assert!(is_renderer_error(&err));
		assert!(format!("{err:#}").contains("cannot open doc.svg"));
		Ok(())
	}

	#[test]
	fn early_exit_is_fatal() -> Result<()> {
		let mut renderer = SubprocessRasterizer::spawn(&shell("exit 3"))?;
		let err = renderer.document_size(Path::new("doc.svg")).unwrap_err();
		assert!(is_renderer_error(&err), "{err:#}");
		Ok(())
	}

	#[test]
	fn garbage_output_is_fatal() -> Result<()> {
		let mut renderer = SubprocessRasterizer::spawn(&shell("read -r line; echo '> '"))?;
		let err = renderer.document_size(Path::new("doc.svg")).unwrap_err();
		assert!(is_renderer_error(&err));
		Ok(())
	}

	#[test]
	fn missing_program_is_fatal() {
		let config = RendererConfig {
			program: String::from("/nonexistent/renderer"),
			args: vec![],
		};
		let err = SubprocessRasterizer::spawn(&config).err().unwrap();
		assert!(is_renderer_error(&err));
	}
}
