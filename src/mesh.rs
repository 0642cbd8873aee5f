use bytemuck::{Pod, Zeroable};
use glam::{vec3, Vec2, Vec3};
use thiserror::Error;

use crate::geom::AABox;

#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum MeshError {
	/// The batch would exceed the `u16` index range. The frame is dropped
	/// rather than emitting a corrupt batch.
	#[error("mesh exceeds {} indexable vertices", u16::MAX)]
	IndexOverflow,
}

/// Straight-alpha rgba color. Batches are expected to be drawn with
/// premultiplied-alpha-over blending.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Pod, Zeroable)]
pub struct Color {
	pub r: f32,
	pub g: f32,
	pub b: f32,
	pub a: f32,
}

impl Color {
	pub const BLACK: Self = Self::new(0.0, 0.0, 0.0, 1.0);
	pub const WHITE: Self = Self::new(1.0, 1.0, 1.0, 1.0);

	pub const fn new(r: f32, g: f32, b: f32, a: f32) -> Self {
		Self { r, g, b, a }
	}

	/// The same color with alpha zero. Outer edge of the overdraw fade.
	pub const fn transparent(self) -> Self {
		Self {
			a: 0.0,
			..self
		}
	}
}

#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Pod, Zeroable)]
pub struct Vertex {
	pub position: Vec3,
	pub color: Color,
}

/// A triangle batch rebuilt from scratch every frame. The vertex and index
/// storage is reused across frames via [`Mesh::clear`].
#[derive(Debug, Clone, Default)]
pub struct Mesh {
	vertices: Vec<Vertex>,
	indices: Vec<u16>,
}

impl Mesh {
	pub fn vertices(&self) -> &[Vertex] {
		&self.vertices
	}

	pub fn indices(&self) -> &[u16] {
		&self.indices
	}

	pub fn is_empty(&self) -> bool {
		self.indices.is_empty()
	}

	pub fn triangle_count(&self) -> usize {
		self.indices.len() / 3
	}

	pub fn clear(&mut self) {
		self.vertices.clear();
		self.indices.clear();
	}

	/// Axis-aligned bounds of every vertex, for dirty-region updates.
	pub fn bounds(&self) -> AABox {
		AABox::containing(self.vertices.iter().map(|v| v.position.truncate()))
	}

	fn start_index(&self, added: usize) -> Result<u16, MeshError> {
		let start = self.vertices.len();
		if start + added > usize::from(u16::MAX) + 1 {
			return Err(MeshError::IndexOverflow);
		}
		Ok(start as u16)
	}

	pub fn push_triangle(
		&mut self,
		corners: [(Vec2, Color); 3],
		z: f32,
	) -> Result<(), MeshError> {
		let start = self.start_index(3)?;
		for (position, color) in corners {
			self.vertices.push(Vertex {
				position: vec3(position.x, position.y, z),
				color,
			});
		}
		self.indices.extend([start, start + 1, start + 2]);
		Ok(())
	}

	/// Two triangles A-B-C and B-C-D sharing the B-C edge.
	pub fn push_quad(&mut self, corners: [(Vec2, Color); 4], z: f32) -> Result<(), MeshError> {
		let start = self.start_index(4)?;
		for (position, color) in corners {
			self.vertices.push(Vertex {
				position: vec3(position.x, position.y, z),
				color,
			});
		}
		self.indices.extend([
			start,
			start + 1,
			start + 2,
			start + 1,
			start + 2,
			start + 3,
		]);
		Ok(())
	}
}
