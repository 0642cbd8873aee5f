use std::time::Duration;

use glam::Vec2;

use crate::config::StrokeConfig;
use crate::geom;
use crate::input::{Gesture, GestureState, LongPressRecognizer, PanRecognizer};
use crate::mesh::{Color, Mesh};
use crate::stroke::{
	smooth_line, LinePoint, PassOptions, RibbonTessellator, COINCIDENT_TOLERANCE,
};

/// Renderer seam. Batches are expected to be drawn onto a persistent
/// render texture with premultiplied-alpha-over blending.
pub trait Canvas {
	fn draw(&mut self, mesh: &Mesh);
	/// Solid fill of the whole surface.
	fn clear(&mut self, background: Color);
}

/// Orchestrates the pipeline: routes pointer events through the gesture
/// recognizers, buffers accepted samples with velocity-derived widths, and
/// once per frame smooths and tessellates the buffer tail into a batch for
/// the [`Canvas`].
///
/// After each tessellated frame all but the last two raw samples are
/// retired; they seed the next frame's first smoothing triple.
pub struct StrokeController {
	config: StrokeConfig,
	pan: PanRecognizer,
	long_press: LongPressRecognizer,
	tessellator: RibbonTessellator,
	points: Vec<LinePoint>,
	previous_width: Option<f32>,
	finishing_line: bool,
	clear_requested: bool,
	mesh: Mesh,
}

impl StrokeController {
	pub fn new(config: StrokeConfig) -> Self {
		Self {
			pan: PanRecognizer::new(config.pan_threshold),
			long_press: LongPressRecognizer::new(
				config.long_press_duration,
				config.long_press_tolerance,
			),
			tessellator: RibbonTessellator::new(config.overdraw),
			points: Vec::new(),
			previous_width: None,
			finishing_line: false,
			// The surface starts out filled with the background color.
			clear_requested: true,
			mesh: Mesh::default(),
			config,
		}
	}

	pub fn config(&self) -> &StrokeConfig {
		&self.config
	}

	/// Number of raw samples currently buffered.
	pub fn pending_samples(&self) -> usize {
		self.points.len()
	}

	pub fn began(&mut self, position: Vec2, timestamp: Duration) -> bool {
		let accepted = self.pan.began(position, timestamp);
		self.long_press.began(position, timestamp);
		accepted
	}

	pub fn moved(&mut self, position: Vec2, timestamp: Duration) {
		if let Some(state) = self.pan.moved(position, timestamp) {
			self.handle(Gesture::Pan(state));
		}
		if let Some(state) = self.long_press.moved(position, timestamp) {
			self.handle(Gesture::LongPress(state));
		}
	}

	pub fn ended(&mut self, position: Vec2, timestamp: Duration) {
		if let Some(state) = self.pan.ended(position, timestamp) {
			self.handle(Gesture::Pan(state));
		}
		if let Some(state) = self.long_press.ended(position, timestamp) {
			self.handle(Gesture::LongPress(state));
		}
	}

	pub fn cancelled(&mut self, position: Vec2, timestamp: Duration) {
		if let Some(state) = self.pan.cancelled(position, timestamp) {
			self.handle(Gesture::Pan(state));
		}
		if let Some(state) = self.long_press.cancelled(position, timestamp) {
			self.handle(Gesture::LongPress(state));
		}
	}

	/// Per-frame tick: drives the long-press timer, then smooths and
	/// tessellates the buffered stroke tail into `canvas`.
	pub fn frame(&mut self, now: Duration, canvas: &mut impl Canvas) {
		if let Some(state) = self.long_press.on_frame(now) {
			self.handle(Gesture::LongPress(state));
		}

		if self.clear_requested {
			canvas.clear(self.config.background_color);
			self.clear_requested = false;
		}

		if self.points.len() <= 2 {
			return;
		}

		let options = PassOptions {
			// A pan stroke seeds its buffer with a duplicated start sample,
			// so it never grows a start cap; a distinct leading pair does.
			start_cap: !geom::fuzzy_eq(
				self.points[0].position,
				self.points[1].position,
				COINCIDENT_TOLERANCE,
			),
			finishing: self.finishing_line,
		};

		self.mesh.clear();
		let result = if self.config.smoothing {
			let smoothed = smooth_line(&self.points);
			self
				.tessellator
				.tessellate(&smoothed, self.config.brush_color, options, &mut self.mesh)
		} else {
			self
				.tessellator
				.tessellate(&self.points, self.config.brush_color, options, &mut self.mesh)
		};

		match result {
			Ok(()) => {
				if !self.mesh.is_empty() {
					tracing::debug!(
						triangles = self.mesh.triangle_count(),
						finishing = options.finishing,
						"stroke frame"
					);
					canvas.draw(&self.mesh);
				}
			}
			Err(error) => {
				// Drop the frame; a missing flash of ink beats a crash.
				tracing::error!(%error, "tessellation failed, frame dropped");
			}
		}

		self.points.drain(..self.points.len() - 2);
		self.finishing_line = false;
	}

	fn handle(&mut self, gesture: Gesture) {
		match gesture {
			Gesture::Pan(GestureState::Began) => self.start_line(),
			Gesture::Pan(GestureState::Changed) => self.extend_line(),
			Gesture::Pan(GestureState::Completed) | Gesture::Pan(GestureState::Failed) => {
				self.end_line()
			}
			Gesture::Pan(_) => {}
			Gesture::LongPress(GestureState::Changed)
			| Gesture::LongPress(GestureState::Completed) => self.clear_canvas(),
			Gesture::LongPress(_) => {}
		}
	}

	fn start_line(&mut self) {
		self.points.clear();
		self.previous_width = None;
		self.finishing_line = false;
		self.tessellator.begin_stroke();

		let sample = LinePoint::new(self.pan.location(), self.extract_width());
		// Duplicated so the smoother has a full triple after one more move.
		self.points.push(sample);
		self.points.push(sample);
	}

	fn extend_line(&mut self) {
		let position = self.pan.location();
		if let Some(last) = self.points.last() {
			// Undersampling noise suppression.
			if last.position.distance(position) < self.config.min_sample_spacing {
				return;
			}
		}
		let width = self.extract_width();
		self.points.push(LinePoint::new(position, width));
	}

	fn end_line(&mut self) {
		if self.points.is_empty() {
			return;
		}
		let width = self.extract_width();
		self.points.push(LinePoint::new(self.pan.location(), width));
		self.finishing_line = true;
	}

	/// The long-press gesture erases the whole canvas and aborts any
	/// in-progress stroke.
	fn clear_canvas(&mut self) {
		tracing::debug!("canvas clear requested");
		self.clear_requested = true;
		self.points.clear();
		self.previous_width = None;
		self.finishing_line = false;
		self.tessellator.begin_stroke();
		self.pan.reset();
	}

	fn extract_width(&mut self) -> f32 {
		let speed = self.pan.velocity().map_or(0.0, Vec2::length);
		let width = self.config.width_for_speed(speed, self.previous_width);
		self.previous_width = Some(width);
		width
	}
}
