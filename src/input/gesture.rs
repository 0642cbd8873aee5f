use std::time::Duration;

use glam::Vec2;

use crate::input::VelocityCalculator;

/// Five-state gesture lifecycle shared by both recognizers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GestureState {
	Possible,
	Began,
	Changed,
	Completed,
	Failed,
}

/// A recognized transition, tagged by which recognizer produced it.
/// Dispatch is a closed pattern match; no open recognizer extensibility.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Gesture {
	Pan(GestureState),
	LongPress(GestureState),
}

/// Recognizes a drag once the pointer moves beyond a minimum distance from
/// its start. Feeds every move into a [`VelocityCalculator`] so the caller
/// can derive stroke width from drawing speed.
///
/// Event methods return `Some(state)` exactly when a transition fires;
/// `None` means no observable change.
#[derive(Debug, Clone)]
pub struct PanRecognizer {
	threshold: f32,
	state: GestureState,
	location: Vec2,
	began_location: Vec2,
	velocity: VelocityCalculator,
}

impl PanRecognizer {
	pub fn new(threshold: f32) -> Self {
		Self {
			threshold,
			state: GestureState::Possible,
			location: Vec2::ZERO,
			began_location: Vec2::ZERO,
			velocity: VelocityCalculator::default(),
		}
	}

	pub fn state(&self) -> GestureState {
		self.state
	}

	pub fn location(&self) -> Vec2 {
		self.location
	}

	/// Running-average pointer velocity; `None` until a move has been fed.
	pub fn velocity(&self) -> Option<Vec2> {
		self.velocity.running_average()
	}

	pub fn began(&mut self, location: Vec2, timestamp: Duration) -> bool {
		self.velocity.reset();
		self.velocity.add_sample(location, timestamp);
		self.began_location = location;
		self.location = location;
		self.state = GestureState::Possible;
		true
	}

	pub fn moved(&mut self, location: Vec2, timestamp: Duration) -> Option<GestureState> {
		self.velocity.add_sample(location, timestamp);
		self.location = location;

		if self.state == GestureState::Possible {
			if location.distance(self.began_location) > self.threshold {
				self.state = GestureState::Began;
				tracing::trace!(?location, "pan began");
				return Some(GestureState::Began);
			}
		} else if self.state == GestureState::Began {
			self.state = GestureState::Changed;
		}

		(self.state == GestureState::Changed).then_some(GestureState::Changed)
	}

	/// A gesture that never left `Possible` is a tap, not a drag; it resets
	/// silently.
	pub fn ended(&mut self, location: Vec2, _timestamp: Duration) -> Option<GestureState> {
		self.location = location;
		if self.state == GestureState::Changed {
			self.state = GestureState::Completed;
			tracing::trace!(?location, "pan completed");
			return Some(GestureState::Completed);
		}
		self.state = GestureState::Possible;
		None
	}

	pub fn cancelled(&mut self, location: Vec2, _timestamp: Duration) -> Option<GestureState> {
		self.location = location;
		match self.state {
			GestureState::Began | GestureState::Changed => {
				self.state = GestureState::Failed;
				tracing::trace!(?location, "pan cancelled");
				Some(GestureState::Failed)
			}
			_ => {
				self.state = GestureState::Possible;
				None
			}
		}
	}

	pub fn reset(&mut self) {
		self.state = GestureState::Possible;
	}
}

/// Armed while a press is in progress. Dropping it is what disarms the
/// per-frame check, so the timer cannot outlive the recognizer's active
/// window.
#[derive(Debug, Clone, Copy)]
struct HoldTimer {
	start_location: Vec2,
	start_time: Duration,
}

impl HoldTimer {
	fn satisfied(&self, location: Vec2, now: Duration, tolerance: f32, minimum: Duration) -> bool {
		let moved = location.distance(self.start_location);
		let held = now.saturating_sub(self.start_time);
		moved < tolerance && held > minimum
	}
}

/// Recognizes a press held in place past a minimum duration. Fires at most
/// once per touch, either from a frame tick or from the pointer lifting.
#[derive(Debug, Clone)]
pub struct LongPressRecognizer {
	minimum_duration: Duration,
	tolerance: f32,
	state: GestureState,
	location: Vec2,
	timer: Option<HoldTimer>,
}

impl LongPressRecognizer {
	pub fn new(minimum_duration: Duration, tolerance: f32) -> Self {
		Self {
			minimum_duration,
			tolerance,
			state: GestureState::Possible,
			location: Vec2::ZERO,
			timer: None,
		}
	}

	pub fn state(&self) -> GestureState {
		self.state
	}

	pub fn location(&self) -> Vec2 {
		self.location
	}

	pub fn is_armed(&self) -> bool {
		self.timer.is_some()
	}

	pub fn began(&mut self, location: Vec2, timestamp: Duration) -> bool {
		self.state = GestureState::Began;
		self.location = location;
		self.timer = Some(HoldTimer {
			start_location: location,
			start_time: timestamp,
		});
		true
	}

	pub fn moved(&mut self, location: Vec2, timestamp: Duration) -> Option<GestureState> {
		self.location = location;
		if !matches!(self.state, GestureState::Began | GestureState::Changed) {
			return None;
		}
		let timer = self.timer?;
		if timer.satisfied(location, timestamp, self.tolerance, self.minimum_duration) {
			self.state = GestureState::Changed;
			Some(GestureState::Changed)
		} else {
			self.reset();
			None
		}
	}

	/// Host-driven periodic tick. A press held past the minimum duration
	/// fires `Changed` exactly once; the timer is disarmed immediately so
	/// later ticks are inert.
	pub fn on_frame(&mut self, now: Duration) -> Option<GestureState> {
		if !matches!(self.state, GestureState::Began | GestureState::Changed) {
			return None;
		}
		let timer = self.timer?;
		if now.saturating_sub(timer.start_time) > self.minimum_duration {
			tracing::trace!("long press fired");
			self.reset();
			return Some(GestureState::Changed);
		}
		None
	}

	pub fn ended(&mut self, location: Vec2, timestamp: Duration) -> Option<GestureState> {
		self.location = location;
		if !matches!(self.state, GestureState::Began | GestureState::Changed) {
			return None;
		}
		let Some(timer) = self.timer.take() else {
			return None;
		};
		if timer.satisfied(location, timestamp, self.tolerance, self.minimum_duration) {
			self.state = GestureState::Completed;
			tracing::trace!(?location, "long press completed");
			Some(GestureState::Completed)
		} else {
			self.state = GestureState::Possible;
			None
		}
	}

	pub fn cancelled(&mut self, location: Vec2, _timestamp: Duration) -> Option<GestureState> {
		self.location = location;
		self.reset();
		None
	}

	/// Every exit transition releases the timer; an armed timer outliving
	/// the active window would tick against stale state.
	pub fn reset(&mut self) {
		self.state = GestureState::Possible;
		self.timer = None;
	}
}
