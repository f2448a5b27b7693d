/// An axis-aligned pixel rectangle, top-left origin, half-open on the right and bottom edge.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub struct PixelBox {
	pub x: u32,
	pub y: u32,
	pub width: u32,
	pub height: u32,
}

impl PixelBox {
	#[must_use]
	pub fn new(x: u32, y: u32, width: u32, height: u32) -> PixelBox {
		PixelBox { x, y, width, height }
	}

	/// Builds a box from edge coordinates, or `None` when `x1 <= x0` or `y1 <= y0`.
	#[must_use]
	pub fn from_edges(x0: i64, y0: i64, x1: i64, y1: i64) -> Option<PixelBox> {
		if x1 <= x0 || y1 <= y0 || x0 < 0 || y0 < 0 {
			return None;
		}
		Some(PixelBox {
			x: u32::try_from(x0).ok()?,
			y: u32::try_from(y0).ok()?,
			width: u32::try_from(x1 - x0).ok()?,
			height: u32::try_from(y1 - y0).ok()?,
		})
	}

	#[must_use]
	pub fn right(&self) -> u64 {
		u64::from(self.x) + u64::from(self.width)
	}

	#[must_use]
	pub fn bottom(&self) -> u64 {
		u64::from(self.y) + u64::from(self.height)
	}

	#[must_use]
	pub fn is_empty(&self) -> bool {
		self.width == 0 || self.height == 0
	}

	/// `true` if the box lies entirely inside a `width × height` image.
	#[must_use]
	pub fn fits_within(&self, width: u32, height: u32) -> bool {
		self.right() <= u64::from(width) && self.bottom() <= u64::from(height)
	}
}
