use proc_macro2::TokenStream as TokenStream2;
use syn::parse::{self, Parse, ParseStream};

/// Arguments of `#[context(...)]`: the arguments of a `format!` call.
#[derive(Debug)]
pub struct Args {
	pub format_args: TokenStream2,
}

impl Parse for Args {
	fn parse(input: ParseStream<'_>) -> parse::Result<Self> {
		if input.is_empty() {
			return Err(input.error("#[context] needs a message, e.g. #[context(\"reading {}\", path)]"));
		}
		Ok(Self {
			format_args: input.parse()?,
		})
	}
}
