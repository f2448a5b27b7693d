mod metadata;
mod reader;
mod writer;

pub use metadata::*;
pub use reader::*;
pub use writer::*;

use imagetiles_core::PyramidError;

fn storage_error(err: impl std::fmt::Display) -> PyramidError {
	PyramidError::storage_write(err.to_string())
}
