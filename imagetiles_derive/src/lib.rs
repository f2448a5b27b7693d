//! Procedural macros shared by the imagetiles crates.
//!
//! Currently this is a single attribute, [`macro@context`], which attaches a formatted message
//! to any error returned by the annotated function:
//!
//! ```ignore
//! #[context("writing tile {coord:?}")]
//! fn write(coord: TileCoord) -> anyhow::Result<()> { ... }
//! ```
//!
//! The message is formatted after the body ran, so it must not name values the body consumed.

mod args;
mod context;

use proc_macro::TokenStream;
use syn::parse_macro_input;

/// Wraps the function body so that an `Err` is returned as `err.context(format!(...))`.
///
/// Works for synchronous functions returning `anyhow::Result`.
#[proc_macro_attribute]
pub fn context(args: TokenStream, input: TokenStream) -> TokenStream {
	let args = parse_macro_input!(args as args::Args);
	let item = parse_macro_input!(input as syn::ItemFn);
	context::expand(args, item).into()
}
