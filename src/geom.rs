use glam::Vec2;

pub struct AABox {
	min: Vec2,
	max: Vec2,
}

impl AABox {
	pub fn new(min: Vec2, max: Vec2) -> Self {
		Self { min, max }
	}

	pub fn empty() -> Self {
		Self::new(Vec2::MAX, Vec2::MIN)
	}

	pub fn is_empty(&self) -> bool {
		self.min.x > self.max.x && self.min.y > self.max.y
	}

	pub fn min(&self) -> Vec2 {
		self.min
	}

	pub fn max(&self) -> Vec2 {
		self.max
	}

	pub fn expanded_to_contain(self, point: Vec2) -> Self {
		Self::new(self.min.min(point), self.max.max(point))
	}

	pub fn containing(points: impl Iterator<Item = Vec2>) -> Self {
		points.fold(Self::empty(), |b, p| b.expanded_to_contain(p))
	}

	pub fn contains(&self, point: Vec2) -> bool {
		point.x < self.max.x
			&& point.y < self.max.y
			&& !(point.x < self.min.x)
			&& !(point.y < self.min.y)
	}
}

/// True when two points coincide within `tolerance` (Euclidean distance).
pub fn fuzzy_eq(a: Vec2, b: Vec2, tolerance: f32) -> bool {
	a.distance_squared(b) <= tolerance * tolerance
}

/// Quadratic Bezier blend of positions with weights (1-t)^2, 2t(1-t), t^2.
pub fn quadratic_point(a: Vec2, control: Vec2, b: Vec2, t: f32) -> Vec2 {
	let u = 1.0 - t;
	a * (u * u) + control * (2.0 * u * t) + b * (t * t)
}

/// Same blend for scalars. Used for interpolating stroke widths.
pub fn quadratic_scalar(a: f32, control: f32, b: f32, t: f32) -> f32 {
	let u = 1.0 - t;
	a * (u * u) + control * (2.0 * u * t) + b * (t * t)
}
