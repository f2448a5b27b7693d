//! Extension traits on [`image::DynamicImage`].

mod operation;

pub use operation::*;
#[cfg(any(test, feature = "test"))]
pub use test::*;
