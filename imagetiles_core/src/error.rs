//! Error kinds of a pyramid run.
//!
//! Every function returns `anyhow::Result`. Failure sites attach one of these kinds to the error
//! chain, either as the error itself (`bail!(PyramidError::...)`) or as a context layer
//! (`.context(PyramidError::...)`). [`PyramidError::classify`] recovers the kind from any error
//! produced by a run, regardless of how many `#[context]` layers were added on the way up.

use thiserror::Error;

/// The failure taxonomy of a conversion run. Every kind aborts the run.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum PyramidError {
	/// The configuration is incomplete or contradictory; nothing was written.
	#[error("invalid configuration: {0}")]
	InvalidConfiguration(String),

	/// The source image could not be read or decoded.
	#[error("failed to decode source image: {0}")]
	SourceDecode(String),

	/// A crop, paste or resize step received bounds it cannot honour.
	#[error("tile composition failed: {0}")]
	Composition(String),

	/// The output database or the tile mirror could not be written.
	#[error("failed to write tiles: {0}")]
	StorageWrite(String),

	/// The external rasterizer exited, answered with an error, or broke the protocol.
	#[error("external renderer failed: {0}")]
	ExternalRenderer(String),
}

impl PyramidError {
	pub fn invalid_configuration(message: impl Into<String>) -> Self {
		PyramidError::InvalidConfiguration(message.into())
	}

	pub fn source_decode(message: impl Into<String>) -> Self {
		PyramidError::SourceDecode(message.into())
	}

	pub fn composition(message: impl Into<String>) -> Self {
		PyramidError::Composition(message.into())
	}

	pub fn storage_write(message: impl Into<String>) -> Self {
		PyramidError::StorageWrite(message.into())
	}

	pub fn external_renderer(message: impl Into<String>) -> Self {
		PyramidError::ExternalRenderer(message.into())
	}

	/// Finds the outermost `PyramidError` in the chain of `err`.
	pub fn classify(err: &anyhow::Error) -> Option<&PyramidError> {
		err.downcast_ref::<PyramidError>()
	}
}
