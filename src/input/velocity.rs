use std::time::Duration;

use glam::Vec2;

/// Capacity of the sliding window of instantaneous velocities.
pub const VELOCITY_WINDOW: usize = 10;

/// Running average of instantaneous 2D velocity over the last
/// [`VELOCITY_WINDOW`] accepted samples.
///
/// The samples live in a fixed ring buffer alongside a running sum, so each
/// update evicts the oldest contribution and adds the new one in O(1).
#[derive(Debug, Clone, Default)]
pub struct VelocityCalculator {
	samples: [Vec2; VELOCITY_WINDOW],
	sample_count: usize,
	running_sum: Vec2,
	previous: Option<(Vec2, Duration)>,
}

impl VelocityCalculator {
	/// Must be called at the start of every stroke so velocity does not
	/// bleed over from the previous one.
	pub fn reset(&mut self) {
		*self = Self::default();
	}

	/// Feeds a timestamped position. The first sample after a reset only
	/// seeds the previous-position state; samples with zero or negative
	/// elapsed time are rejected outright, leaving the previous state
	/// untouched so the next sample integrates over the combined interval.
	pub fn add_sample(&mut self, position: Vec2, timestamp: Duration) {
		let Some((previous_position, previous_timestamp)) = self.previous else {
			self.previous = Some((position, timestamp));
			return;
		};

		let Some(elapsed) = timestamp.checked_sub(previous_timestamp) else {
			tracing::warn!(?timestamp, ?previous_timestamp, "non-monotonic velocity sample");
			return;
		};
		if elapsed.is_zero() {
			tracing::trace!(?timestamp, "zero elapsed time, sample rejected");
			return;
		}

		let velocity = (position - previous_position) / elapsed.as_secs_f32();
		let slot = self.sample_count % VELOCITY_WINDOW;
		self.running_sum += velocity - self.samples[slot];
		self.samples[slot] = velocity;
		self.sample_count += 1;
		self.previous = Some((position, timestamp));
	}

	pub fn sample_count(&self) -> usize {
		self.sample_count
	}

	pub fn last_velocity_sample(&self) -> Option<Vec2> {
		(self.sample_count > 0).then(|| self.samples[(self.sample_count - 1) % VELOCITY_WINDOW])
	}

	/// `None` until at least one non-degenerate sample pair has been fed.
	pub fn running_average(&self) -> Option<Vec2> {
		(self.sample_count > 0)
			.then(|| self.running_sum / self.sample_count.min(VELOCITY_WINDOW) as f32)
	}
}
