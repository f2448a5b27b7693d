use crate::args::Args;
use proc_macro2::{Ident, Span, TokenStream as TokenStream2};
use quote::{ToTokens, quote};

pub fn expand(args: Args, mut item: syn::ItemFn) -> TokenStream2 {
	if let Some(asyncness) = &item.sig.asyncness {
		return syn::Error::new_spanned(asyncness, "#[context] supports only synchronous functions")
			.to_compile_error();
	}

	let Args { format_args } = args;
	let body = &item.block;
	let output = &item.sig.output;
	let err = Ident::new("err", Span::mixed_site());

	// An owned, non-Copy value moved into the closure keeps it `FnOnce`, so the body may
	// consume captured arguments. The message is formatted after the body ran.
	let once = Ident::new("once", Span::mixed_site());
	let new_body = quote! {
		let #once = ::core::iter::empty::<()>();
		(|| #output {
			::core::mem::drop(#once);
			#body
		})().map_err(|#err| #err.context(format!(#format_args)).into())
	};
	item.block.stmts = vec![syn::Stmt::Expr(syn::Expr::Verbatim(new_body), None)];

	item.into_token_stream()
}

#[cfg(test)]
mod tests {
	use super::*;
	use pretty_assertions::assert_eq;
	use syn::parse_str;

	fn expand_str(args: &str, item: &str) -> String {
		let args: Args = parse_str(args).unwrap();
		let item: syn::ItemFn = parse_str(item).unwrap();
		expand(args, item).to_string()
	}

	#[test]
	fn wraps_function_in_closure() {
		let out = expand_str("\"level {}\", level", "fn f(level: u8) -> Result<()> { Ok(()) }");
		assert!(out.contains("map_err"), "{out}");
		assert!(out.contains("context (format ! (\"level {}\" , level))"), "{out}");
		assert!(out.contains("|| -> Result < () >"), "{out}");
	}

	#[test]
	fn keeps_the_signature() {
		let out = expand_str("\"x\"", "pub fn f(a: &str) -> Result<u8> { Ok(1) }");
		let head = out.split('{').next().unwrap();
		assert!(head.starts_with("pub fn f"), "{head}");
		assert!(head.contains("-> Result < u8 >"), "{head}");
		assert_eq!(out.matches("map_err").count(), 1);
	}

	#[test]
	fn async_function_is_rejected() {
		let out = expand_str("\"x\"", "async fn f() -> Result<u8> { Ok(1) }");
		assert!(out.contains("compile_error"), "{out}");
		assert!(out.contains("only synchronous functions"), "{out}");
	}
}
