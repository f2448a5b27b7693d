//! Wire format of a rasterizer session: one JSON object per line in each direction.
//!
//! ```text
//! > {"op":"size","source":"map.svg"}
//! < {"status":"ok","width":2000,"height":1000}
//! > {"op":"render","source":"map.svg","area":[0,0,500,500],"width":256,"height":256,"background":"#030303","output":"/tmp/x/tile-0.png"}
//! < {"status":"ok","width":256,"height":256}
//! ```

use anyhow::{Result, bail};
use imagetiles_core::PyramidError;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "op", rename_all = "lowercase")]
pub enum RenderRequest {
	/// Asks for the document size in document units.
	Size { source: PathBuf },
	/// Renders `area` (`[x0, y0, x1, y1]`, bottom-left origin) to a `width × height` PNG at `output`.
	Render {
		source: PathBuf,
		area: [f64; 4],
		width: u32,
		height: u32,
		background: String,
		output: PathBuf,
	},
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(tag = "status", rename_all = "lowercase")]
pub enum RenderResponse {
	Ok { width: f64, height: f64 },
	Error { message: String },
}

impl RenderRequest {
	/// The request as one line, newline included.
	pub fn to_line(&self) -> Result<String> {
		let mut line = serde_json::to_string(self).map_err(|e| PyramidError::external_renderer(e.to_string()))?;
		line.push('\n');
		Ok(line)
	}
}

impl RenderResponse {
	/// Parses one response line.
	pub fn from_line(line: &str) -> Result<RenderResponse> {
		match serde_json::from_str(line.trim_end()) {
			Ok(response) => Ok(response),
			Err(e) => bail!(PyramidError::external_renderer(format!(
				"unexpected answer {:?}: {e}",
				line.trim_end()
			))),
		}
	}

	/// The reported size, or the renderer's own error.
	pub fn into_size(self) -> Result<(f64, f64)> {
		match self {
			RenderResponse::Ok { width, height } => Ok((width, height)),
			RenderResponse::Error { message } => bail!(PyramidError::external_renderer(message)),
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use pretty_assertions::assert_eq;
	use rstest::rstest;

	#[test]
	fn size_request_line() {
		let request = RenderRequest::Size {
			source: PathBuf::from("map.svg"),
		};
		assert_eq!(request.to_line().unwrap(), "{\"op\":\"size\",\"source\":\"map.svg\"}\n");
	}

	#[test]
	fn render_request_line() {
		let request = RenderRequest::Render {
			source: PathBuf::from("map.svg"),
			area: [0.0, 12.5, 100.0, 112.5],
			width: 256,
			height: 256,
			background: String::from("#030303"),
			output: PathBuf::from("/tmp/t.png"),
		};
		assert_eq!(
			request.to_line().unwrap(),
			"{\"op\":\"render\",\"source\":\"map.svg\",\"area\":[0.0,12.5,100.0,112.5],\"width\":256,\"height\":256,\
			 \"background\":\"#030303\",\"output\":\"/tmp/t.png\"}\n"
		);
	}

	#[rstest]
	#[case("{\"status\":\"ok\",\"width\":2000,\"height\":1000.5}\n", (2000.0, 1000.5))]
	#[case("{\"height\":3,\"width\":4,\"status\":\"ok\"}", (4.0, 3.0))]
	fn ok_responses(#[case] line: &str, #[case] size: (f64, f64)) {
		assert_eq!(RenderResponse::from_line(line).unwrap().into_size().unwrap(), size);
	}

	#[rstest]
	#[case("{\"status\":\"error\",\"message\":\"no such file\"}")]
	#[case("{\"status\":\"busy\"}")]
	#[case("> ")]
	#[case("")]
	fn failing_responses(#[case] line: &str) {
		let err = RenderResponse::from_line(line)
			.and_then(RenderResponse::into_size)
			.unwrap_err();
		assert!(matches!(
			PyramidError::classify(&err),
			Some(PyramidError::ExternalRenderer(_))
		));
	}
}
