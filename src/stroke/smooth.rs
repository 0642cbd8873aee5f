use itertools::Itertools;

use crate::geom;
use crate::stroke::LinePoint;

/// How far apart the generated curve samples aim to be, in canvas units.
const SEGMENT_DISTANCE: f32 = 2.0;

/// Bounds on the number of curve samples per midpoint span.
const MIN_SEGMENTS: usize = 32;
const MAX_SEGMENTS: usize = 128;

/// Densifies a raw polyline into a curvature-smoothed one.
///
/// Every consecutive triple is replaced by a quadratic Bezier from the first
/// pair's midpoint to the second pair's midpoint, with the middle sample as
/// control point. Positions and widths are blended with the same weights.
/// The output is recomputed from the raw buffer tail every frame and is
/// never fed back into itself.
///
/// Fewer than three input points yield an empty result; the caller skips
/// the frame.
pub fn smooth_line(points: &[LinePoint]) -> Vec<LinePoint> {
	let mut result = Vec::new();
	for (first, middle, last) in points.iter().tuple_windows() {
		let mid_a = midpoint(first, middle);
		let mid_b = midpoint(middle, last);

		let distance = mid_a.position.distance(mid_b.position);
		let segments =
			((distance / SEGMENT_DISTANCE) as usize).clamp(MIN_SEGMENTS, MAX_SEGMENTS);
		result.reserve(segments + 1);

		let step = 1.0 / segments as f32;
		for j in 0..segments {
			let t = j as f32 * step;
			result.push(LinePoint {
				position: geom::quadratic_point(
					mid_a.position,
					middle.position,
					mid_b.position,
					t,
				),
				width: geom::quadratic_scalar(mid_a.width, middle.width, mid_b.width, t),
			});
		}
		result.push(mid_b);
	}
	result
}

fn midpoint(a: &LinePoint, b: &LinePoint) -> LinePoint {
	LinePoint {
		position: (a.position + b.position) * 0.5,
		width: (a.width + b.width) * 0.5,
	}
}
