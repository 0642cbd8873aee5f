use std::f32::consts;

use glam::Vec2;

use crate::geom;
use crate::mesh::{Color, Mesh, MeshError};
use crate::stroke::LinePoint;

/// Consecutive points closer than this are treated as coincident; their
/// segment has no usable perpendicular and is skipped.
pub const COINCIDENT_TOLERANCE: f32 = 1e-4;

/// Angular resolution of the semicircular end caps.
const CAP_SEGMENTS: usize = 32;

/// Transient request for a round end cap, consumed within the same pass.
#[derive(Debug, Clone, Copy)]
struct CirclePoint {
	position: Vec2,
	width: f32,
	/// Unit vector pointing out of the stroke at this end.
	direction: Vec2,
}

/// Turns a polyline of `(position, width)` samples into a variable-width
/// ribbon mesh: solid quads per segment, a fade-to-transparent overdraw
/// border for anti-aliasing, and round caps at the stroke's ends.
///
/// The tessellator persists the previous pass's boundary vertices and a
/// connecting flag so that successive passes, within or across frames,
/// share edge vertices and leave no seam at the stroke's growing tip.
#[derive(Debug, Clone)]
pub struct RibbonTessellator {
	overdraw: f32,
	connecting: bool,
	previous_c: Vec2,
	previous_d: Vec2,
	previous_g: Vec2,
	previous_i: Vec2,
}

/// Per-pass options decided by the caller.
#[derive(Debug, Clone, Copy, Default)]
pub struct PassOptions {
	/// Register a round cap at the first segment's trailing end. Only
	/// honored on the first quad of a stroke.
	pub start_cap: bool,
	/// The stroke is ending; register a round cap at the final segment.
	pub finishing: bool,
}

impl RibbonTessellator {
	pub fn new(overdraw: f32) -> Self {
		Self {
			overdraw,
			connecting: false,
			previous_c: Vec2::ZERO,
			previous_d: Vec2::ZERO,
			previous_g: Vec2::ZERO,
			previous_i: Vec2::ZERO,
		}
	}

	/// Forget the previous stroke's boundary. Must be called when a new
	/// stroke begins, before its first pass.
	pub fn begin_stroke(&mut self) {
		self.connecting = false;
	}

	/// True once any quad of the current stroke has been emitted.
	pub fn is_connecting(&self) -> bool {
		self.connecting
	}

	/// Appends the ribbon for `points` to `mesh`. On error the mesh is in
	/// an incomplete state and the caller should discard the frame; the
	/// boundary state still allows the next frame to continue the stroke.
	pub fn tessellate(
		&mut self,
		points: &[LinePoint],
		color: Color,
		options: PassOptions,
		mesh: &mut Mesh,
	) -> Result<(), MeshError> {
		let Some((first, rest)) = points.split_first() else {
			return Ok(());
		};
		let fade = color.transparent();
		let mut caps: Vec<CirclePoint> = Vec::new();
		let mut emitted = false;
		let mut previous = *first;

		for (index, current) in rest.iter().enumerate() {
			if geom::fuzzy_eq(current.position, previous.position, COINCIDENT_TOLERANCE) {
				continue;
			}
			let direction = (current.position - previous.position).normalize();
			let perpendicular = direction.perp();

			let joined = self.connecting || emitted;
			let mut a = previous.position + perpendicular * (previous.width / 2.0);
			let mut b = previous.position - perpendicular * (previous.width / 2.0);
			let c = current.position + perpendicular * (current.width / 2.0);
			let d = current.position - perpendicular * (current.width / 2.0);

			if joined {
				// Share the previous pass's leading edge; no seam.
				a = self.previous_c;
				b = self.previous_d;
			} else if options.start_cap {
				caps.push(CirclePoint {
					position: previous.position,
					width: previous.width,
					direction: -direction,
				});
			}

			mesh.push_quad([(a, color), (b, color), (c, color), (d, color)], 0.0)?;
			self.previous_c = c;
			self.previous_d = d;

			if options.finishing && index == rest.len() - 1 {
				caps.push(CirclePoint {
					position: current.position,
					width: current.width,
					direction,
				});
			}

			// Overdraw border, full alpha at the ribbon edge fading to zero
			// at the outer edge.
			let mut f = a + perpendicular * self.overdraw;
			let g = c + perpendicular * self.overdraw;
			let mut h = b - perpendicular * self.overdraw;
			let i = d - perpendicular * self.overdraw;
			if joined {
				f = self.previous_g;
				h = self.previous_i;
			}
			self.previous_g = g;
			self.previous_i = i;

			mesh.push_quad([(f, fade), (a, color), (g, fade), (c, color)], 0.0)?;
			mesh.push_quad([(b, color), (h, fade), (d, color), (i, fade)], 0.0)?;

			emitted = true;
			previous = *current;
		}

		for cap in &caps {
			self.tessellate_cap(cap, color, mesh)?;
		}

		if emitted {
			self.connecting = true;
		}
		Ok(())
	}

	/// A filled semicircle fan bulging along `direction`, plus an overdraw
	/// fade band around its curved edge.
	fn tessellate_cap(
		&self,
		cap: &CirclePoint,
		color: Color,
		mesh: &mut Mesh,
	) -> Result<(), MeshError> {
		let fade = color.transparent();
		let center = cap.position;
		let radius = cap.width / 2.0;

		// Sweep pi radians centered on the outward direction. `to_angle`
		// resolves orientation from the direction's x/y components.
		let base = cap.direction.to_angle() - consts::FRAC_PI_2;
		let step = consts::PI / CAP_SEGMENTS as f32;

		let mut previous_rim = center + radius * Vec2::from_angle(base);
		let mut previous_outer = center + (radius + self.overdraw) * Vec2::from_angle(base);
		for segment in 1..=CAP_SEGMENTS {
			let angle = base + step * segment as f32;
			let rim = center + radius * Vec2::from_angle(angle);
			let outer = center + (radius + self.overdraw) * Vec2::from_angle(angle);

			mesh.push_triangle([(center, color), (previous_rim, color), (rim, color)], 0.0)?;
			mesh.push_quad(
				[
					(previous_rim, color),
					(previous_outer, fade),
					(rim, color),
					(outer, fade),
				],
				0.0,
			)?;

			previous_rim = rim;
			previous_outer = outer;
		}
		Ok(())
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use approx::assert_abs_diff_eq;
	use glam::vec2;

	fn points(samples: &[(f32, f32, f32)]) -> Vec<LinePoint> {
		samples
			.iter()
			.map(|&(x, y, w)| LinePoint::new(vec2(x, y), w))
			.collect()
	}

	fn solid_area(mesh: &Mesh) -> f32 {
		// Sum of triangle areas over fully opaque vertices only.
		let vertices = mesh.vertices();
		mesh
			.indices()
			.chunks_exact(3)
			.filter(|triangle| triangle.iter().all(|&i| vertices[i as usize].color.a == 1.0))
			.map(|triangle| {
				let [a, b, c] =
					[triangle[0], triangle[1], triangle[2]].map(|i| vertices[i as usize].position);
				0.5 * (b - a).truncate().perp_dot((c - a).truncate()).abs()
			})
			.sum()
	}

	#[test]
	fn single_segment_is_one_solid_quad_plus_overdraw() {
		let mut tessellator = RibbonTessellator::new(0.5);
		let mut mesh = Mesh::default();
		tessellator
			.tessellate(
				&points(&[(0.0, 0.0, 2.0), (10.0, 0.0, 2.0)]),
				Color::BLACK,
				PassOptions::default(),
				&mut mesh,
			)
			.unwrap();
		// One solid quad and two fade quads.
		assert_eq!(mesh.triangle_count(), 6);
		assert!(tessellator.is_connecting());
		// Solid ribbon area: length 10 * width 2.
		assert_abs_diff_eq!(solid_area(&mesh), 20.0, epsilon = 1e-3);
		// Overdraw extends half a unit beyond each edge.
		let bounds = mesh.bounds();
		assert_abs_diff_eq!(bounds.min().y, -1.5, epsilon = 1e-5);
		assert_abs_diff_eq!(bounds.max().y, 1.5, epsilon = 1e-5);
	}

	#[test]
	fn coincident_points_emit_nothing() {
		let mut tessellator = RibbonTessellator::new(0.5);
		let mut mesh = Mesh::default();
		tessellator
			.tessellate(
				&points(&[(1.0, 1.0, 2.0), (1.0, 1.0 + 5e-5, 2.0)]),
				Color::BLACK,
				PassOptions::default(),
				&mut mesh,
			)
			.unwrap();
		assert!(mesh.is_empty());
		assert!(!tessellator.is_connecting());
	}

	#[test]
	fn no_zero_area_solid_triangles() {
		let mut tessellator = RibbonTessellator::new(0.5);
		let mut mesh = Mesh::default();
		tessellator
			.tessellate(
				&points(&[
					(0.0, 0.0, 2.0),
					(5.0, 0.0, 2.0),
					(5.0, 0.0, 2.0),
					(5.0, 4.0, 3.0),
				]),
				Color::BLACK,
				PassOptions::default(),
				&mut mesh,
			)
			.unwrap();
		let vertices = mesh.vertices();
		for triangle in mesh.indices().chunks_exact(3) {
			if triangle.iter().any(|&i| vertices[i as usize].color.a < 1.0) {
				continue;
			}
			let [a, b, c] =
				[triangle[0], triangle[1], triangle[2]].map(|i| vertices[i as usize].position);
			let area = 0.5 * (b - a).truncate().perp_dot((c - a).truncate()).abs();
			assert!(area > 1e-6, "zero-area solid triangle");
		}
	}

	#[test]
	fn consecutive_quads_share_edges() {
		let mut tessellator = RibbonTessellator::new(0.5);
		let mut mesh = Mesh::default();
		tessellator
			.tessellate(
				&points(&[(0.0, 0.0, 2.0), (10.0, 0.0, 2.0), (20.0, 5.0, 2.0)]),
				Color::BLACK,
				PassOptions::default(),
				&mut mesh,
			)
			.unwrap();
		let vertices = mesh.vertices();
		// Second solid quad (vertex 12..16 after the first segment's three
		// quads) starts at the first quad's C and D corners.
		assert_eq!(vertices[12].position, vertices[2].position);
		assert_eq!(vertices[13].position, vertices[3].position);
	}

	#[test]
	fn cross_frame_continuity_reuses_boundary() {
		let mut tessellator = RibbonTessellator::new(0.5);
		let mut first_frame = Mesh::default();
		tessellator
			.tessellate(
				&points(&[(0.0, 0.0, 2.0), (10.0, 0.0, 2.0)]),
				Color::BLACK,
				PassOptions::default(),
				&mut first_frame,
			)
			.unwrap();
		let c = first_frame.vertices()[2].position;
		let d = first_frame.vertices()[3].position;

		let mut second_frame = Mesh::default();
		tessellator
			.tessellate(
				&points(&[(10.0, 0.0, 2.0), (20.0, 3.0, 2.0)]),
				Color::BLACK,
				PassOptions::default(),
				&mut second_frame,
			)
			.unwrap();
		// The new frame's first quad opens on the previous frame's edge.
		assert_eq!(second_frame.vertices()[0].position, c);
		assert_eq!(second_frame.vertices()[1].position, d);
	}

	#[test]
	fn begin_stroke_breaks_continuity() {
		let mut tessellator = RibbonTessellator::new(0.5);
		let mut mesh = Mesh::default();
		tessellator
			.tessellate(
				&points(&[(0.0, 0.0, 2.0), (10.0, 0.0, 2.0)]),
				Color::BLACK,
				PassOptions::default(),
				&mut mesh,
			)
			.unwrap();
		tessellator.begin_stroke();
		assert!(!tessellator.is_connecting());

		let mut next = Mesh::default();
		tessellator
			.tessellate(
				&points(&[(50.0, 50.0, 2.0), (60.0, 50.0, 2.0)]),
				Color::BLACK,
				PassOptions::default(),
				&mut next,
			)
			.unwrap();
		// A fresh stroke opens at its own position, not the stale boundary.
		assert_abs_diff_eq!(next.vertices()[0].position.x, 50.0, epsilon = 1e-5);
	}

	#[test]
	fn finishing_adds_one_cap_at_the_end() {
		let mut tessellator = RibbonTessellator::new(0.5);
		let mut mesh = Mesh::default();
		tessellator
			.tessellate(
				&points(&[(0.0, 0.0, 2.0), (10.0, 0.0, 2.0)]),
				Color::BLACK,
				PassOptions {
					start_cap: false,
					finishing: true,
				},
				&mut mesh,
			)
			.unwrap();
		// Ribbon (6 triangles) plus fan (32) plus fade band (64).
		assert_eq!(mesh.triangle_count(), 6 + 3 * CAP_SEGMENTS);
		// The cap bulges past the segment end by its radius plus overdraw.
		let bounds = mesh.bounds();
		assert_abs_diff_eq!(bounds.max().x, 10.0 + 1.0 + 0.5, epsilon = 1e-3);
		// No cap at the start.
		assert_abs_diff_eq!(bounds.min().x, -0.0, epsilon = 1e-3);
	}

	#[test]
	fn start_cap_only_on_first_quad() {
		let mut tessellator = RibbonTessellator::new(0.5);
		let mut mesh = Mesh::default();
		tessellator
			.tessellate(
				&points(&[(0.0, 0.0, 2.0), (10.0, 0.0, 2.0)]),
				Color::BLACK,
				PassOptions {
					start_cap: true,
					finishing: false,
				},
				&mut mesh,
			)
			.unwrap();
		assert_eq!(mesh.triangle_count(), 6 + 3 * CAP_SEGMENTS);
		let bounds = mesh.bounds();
		assert_abs_diff_eq!(bounds.min().x, -1.5, epsilon = 1e-3);

		// Later passes of the same stroke never register another start cap.
		let mut next = Mesh::default();
		tessellator
			.tessellate(
				&points(&[(10.0, 0.0, 2.0), (20.0, 0.0, 2.0)]),
				Color::BLACK,
				PassOptions {
					start_cap: true,
					finishing: false,
				},
				&mut next,
			)
			.unwrap();
		assert_eq!(next.triangle_count(), 6);
	}

	#[test]
	fn cap_fan_stays_on_the_outward_side() {
		let mut tessellator = RibbonTessellator::new(0.5);
		let mut mesh = Mesh::default();
		tessellator
			.tessellate(
				&points(&[(0.0, 0.0, 2.0), (10.0, 0.0, 2.0)]),
				Color::BLACK,
				PassOptions {
					start_cap: false,
					finishing: true,
				},
				&mut mesh,
			)
			.unwrap();
		// Every cap vertex sits at x >= 10 (minus tolerance); the semicircle
		// never folds back over the ribbon.
		// The ribbon occupies the first 12 vertices; the rest are the cap.
		for vertex in &mesh.vertices()[12..] {
			assert!(vertex.position.x >= 10.0 - 1e-4);
		}
	}
}
