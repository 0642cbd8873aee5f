use glam::Vec2;

mod smooth;
pub use smooth::*;

mod tessellate;
pub use tessellate::*;

mod controller;
pub use controller::*;

/// One accepted stroke sample: a position and the velocity-derived width at
/// that position. Immutable once appended to the stroke buffer.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LinePoint {
	pub position: Vec2,
	pub width: f32,
}

impl LinePoint {
	pub fn new(position: Vec2, width: f32) -> Self {
		Self { position, width }
	}
}
