use std::time::Duration;

use crate::mesh::Color;

/// Tuning for the whole stroke pipeline. Fixed once the controller is
/// constructed; the defaults are the reference values.
#[derive(Debug, Clone, bon::Builder)]
pub struct StrokeConfig {
	/// Minimum drag distance before a pan is recognized.
	#[builder(default = 5.0)]
	pub pan_threshold: f32,

	/// Hold duration before a long press fires.
	#[builder(default = Duration::from_millis(500))]
	pub long_press_duration: Duration,

	/// Maximum movement allowed during a long press.
	#[builder(default = 10.0)]
	pub long_press_tolerance: f32,

	/// Divisor mapping pointer speed (units/second) to stroke width.
	#[builder(default = 166.0)]
	pub speed_to_width: f32,

	#[builder(default = 1.0)]
	pub min_width: f32,

	#[builder(default = 40.0)]
	pub max_width: f32,

	/// Weight of the freshly computed width; the remainder comes from the
	/// previous sample's width.
	#[builder(default = 0.8)]
	pub width_smoothing: f32,

	/// Width of the fade-to-transparent anti-aliasing border.
	#[builder(default = 0.5)]
	pub overdraw: f32,

	/// Samples closer than this to the previous one are dropped.
	#[builder(default = 1.5)]
	pub min_sample_spacing: f32,

	/// Curvature smoothing of the raw polyline before tessellation.
	#[builder(default = true)]
	pub smoothing: bool,

	#[builder(default = Color::BLACK)]
	pub brush_color: Color,

	#[builder(default = Color::WHITE)]
	pub background_color: Color,
}

impl Default for StrokeConfig {
	fn default() -> Self {
		Self::builder().build()
	}
}

impl StrokeConfig {
	/// Width for the current running-average pointer speed, exponentially
	/// smoothed against the previous sample's width. The very first sample
	/// of a stroke has no previous width and is not smoothed.
	pub fn width_for_speed(&self, speed: f32, previous_width: Option<f32>) -> f32 {
		let width = (speed / self.speed_to_width).clamp(self.min_width, self.max_width);
		match previous_width {
			Some(previous) => width * self.width_smoothing + previous * (1.0 - self.width_smoothing),
			None => width,
		}
	}
}
