//! Per-instance simulation state and the reveal/hide state machine.
//!
//! One [`SimulationState`] exists per bound spoiler element. It is mutated by
//! the frame loop (every refresh) and by the interaction controller (on input
//! events); both run on the same event queue, so plain `&mut` access is enough.
//!
//! ```text
//! Idle ──start──▶ Running ──reveal_all──▶ Revealed ──hide_all──▶ Running
//! ```

use std::collections::VecDeque;

use log::debug;

use super::field::ParticleField;
use super::geometry::Region;
use super::host::{FrameHandle, FrameScheduler, Layout, Surface, VisualHints};
use super::sprite::SpriteCache;
use super::tuning::SpoilerTuning;

/// A pointer sample that clears nearby particles for a while.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct RevealPoint {
	/// Container-local position.
	pub x: f64,
	pub y: f64,
	/// Creation time (ms).
	pub at: f64,
}

/// Bounded, time-limited buffer of reveal points.
#[derive(Clone, Debug)]
pub struct RevealPoints {
	points: VecDeque<RevealPoint>,
	capacity: usize,
	ttl_ms: f64,
}

impl RevealPoints {
	/// Empty buffer holding at most `capacity` points for `ttl_ms` each.
	pub fn new(capacity: usize, ttl_ms: f64) -> Self {
		Self {
			points: VecDeque::with_capacity(capacity + 1),
			capacity,
			ttl_ms,
		}
	}

	/// Append a point, evicting the oldest once over capacity.
	pub fn push(&mut self, x: f64, y: f64, now: f64) {
		self.points.push_back(RevealPoint { x, y, at: now });
		while self.points.len() > self.capacity {
			self.points.pop_front();
		}
	}

	/// Drop points that have lived for `ttl_ms` or longer.
	pub fn expire(&mut self, now: f64) {
		let ttl = self.ttl_ms;
		self.points.retain(|p| now - p.at < ttl);
	}

	/// Drop every point.
	pub fn clear(&mut self) {
		self.points.clear();
	}

	/// Number of live points.
	pub fn len(&self) -> usize {
		self.points.len()
	}

	/// Whether no point is live.
	pub fn is_empty(&self) -> bool {
		self.points.is_empty()
	}

	/// Points, oldest first.
	pub fn iter(&self) -> impl Iterator<Item = &RevealPoint> {
		self.points.iter()
	}

	/// Whether any point lies strictly within `radius` of `(x, y)`.
	#[inline]
	pub fn any_within(&self, x: f64, y: f64, radius: f64) -> bool {
		let r2 = radius * radius;
		self.points.iter().any(|p| {
			let (dx, dy) = (x - p.x, y - p.y);
			dx * dx + dy * dy < r2
		})
	}
}

/// Loop phase of a spoiler instance.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Phase {
	/// Not animating (before the first start or after teardown).
	Idle,
	/// Cloud visible and animating.
	Running,
	/// Text shown; no frames are scheduled.
	Revealed,
}

/// Elapsed time values for one frame.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct FrameClock {
	/// Seconds since the loop (re)started.
	pub time: f64,
	/// Seconds since the previous frame, clamped to the motion step limit.
	pub dt: f64,
}

/// Everything one spoiler instance owns.
pub struct SimulationState {
	/// Constants for every stage of the effect.
	pub tuning: SpoilerTuning,
	/// Device pixel ratio, clamped to `[1, 2]`.
	pub dpr: f64,
	/// Canvas size in CSS pixels.
	pub width: f64,
	pub height: f64,
	pub field: ParticleField,
	/// Live pointer reveal points.
	pub reveal: RevealPoints,
	/// Sprites for the current color.
	pub sprites: SpriteCache,
	phase: Phase,
	frame: Option<FrameHandle>,
	start: f64,
	last: f64,
}

impl SimulationState {
	/// Idle state; the field is built by the first frame.
	pub fn new(tuning: SpoilerTuning, dpr: f64, seed: u64) -> Self {
		let field = ParticleField::new(tuning.field.clone(), seed);
		let reveal = RevealPoints::new(tuning.reveal.max_points, tuning.reveal.ttl_ms);
		Self {
			tuning,
			dpr: if dpr.is_finite() { dpr.clamp(1.0, 2.0) } else { 1.0 },
			width: 0.0,
			height: 0.0,
			field,
			reveal,
			sprites: SpriteCache::default(),
			phase: Phase::Idle,
			frame: None,
			start: 0.0,
			last: 0.0,
		}
	}

	/// Current loop phase.
	pub fn phase(&self) -> Phase {
		self.phase
	}

	/// Whether the whole text is shown.
	pub fn is_revealed(&self) -> bool {
		self.phase == Phase::Revealed
	}

	/// Frame requested but not yet run.
	pub fn pending_frame(&self) -> Option<FrameHandle> {
		self.frame
	}

	/// Region the cloud covers, if there is text.
	pub fn region(&self) -> Option<&Region> {
		self.field.region()
	}

	/// Adopt a new container size. Changes smaller than the resize epsilon on
	/// both axes are ignored; anything larger resizes the surface and rebuilds
	/// the particle field. Returns whether a rebuild happened.
	pub fn sync_layout<S: Surface + ?Sized>(&mut self, layout: &Layout, surface: &mut S) -> bool {
		let w = layout.width.max(1.0);
		let h = layout.height.max(1.0);
		let eps = self.tuning.resize_epsilon;
		if (w - self.width).abs() < eps && (h - self.height).abs() < eps {
			return false;
		}

		self.width = w;
		self.height = h;
		surface.resize(w, h, self.dpr);

		match layout.text {
			Some(text) if w > 1.0 && h > 1.0 => self.field.build(Region::around_text(&text, w, h)),
			_ => self.field.clear(),
		}
		true
	}

	/// Start animating. No-op while already running.
	pub fn start<F: FrameScheduler + ?Sized>(&mut self, now: f64, frames: &mut F) {
		if self.phase == Phase::Running {
			return;
		}
		self.phase = Phase::Running;
		self.start = now;
		self.last = now;
		self.frame = frames.request();
	}

	/// Forget reveal points and make every particle opaque again.
	pub fn clear_reveal(&mut self) {
		self.reveal.clear();
		self.field.restore_alpha();
	}

	/// Show the text: hide the cloud and stop the loop.
	pub fn reveal_all<H, F>(&mut self, hints: &mut H, frames: &mut F)
	where
		H: VisualHints + ?Sized,
		F: FrameScheduler + ?Sized,
	{
		hints.set_revealed(true);
		hints.set_spotlight(0.0, 0.0, 0.0, false);
		self.clear_reveal();
		self.cancel_frame(frames);
		self.phase = Phase::Revealed;
		debug!("styled-text: spoiler revealed");
	}

	/// Obscure the text again and restart the loop.
	pub fn hide_all<H, F>(&mut self, now: f64, hints: &mut H, frames: &mut F)
	where
		H: VisualHints + ?Sized,
		F: FrameScheduler + ?Sized,
	{
		hints.set_revealed(false);
		hints.set_spotlight(0.0, 0.0, 0.0, false);
		self.clear_reveal();
		if self.phase == Phase::Revealed {
			self.phase = Phase::Idle;
		}
		self.start(now, frames);
		debug!("styled-text: spoiler hidden");
	}

	/// Stop for good: cancel the pending frame and drop the particles.
	pub fn stop<F: FrameScheduler + ?Sized>(&mut self, frames: &mut F) {
		self.cancel_frame(frames);
		self.phase = Phase::Idle;
		self.reveal.clear();
		self.field.clear();
	}

	fn cancel_frame<F: FrameScheduler + ?Sized>(&mut self, frames: &mut F) {
		if let Some(handle) = self.frame.take() {
			frames.cancel(handle);
		}
	}

	/// Consume the pending frame and advance the clock. Returns `None` when
	/// the loop must halt instead of drawing.
	pub(crate) fn begin_frame(&mut self, now: f64) -> Option<FrameClock> {
		self.frame = None;
		if self.phase != Phase::Running {
			return None;
		}
		let time = (now - self.start) / 1000.0;
		let dt = ((now - self.last) / 1000.0).clamp(0.0, self.tuning.motion.max_step);
		self.last = now;
		Some(FrameClock { time, dt })
	}

	pub(crate) fn schedule_next<F: FrameScheduler + ?Sized>(&mut self, frames: &mut F) {
		if self.phase == Phase::Running && self.frame.is_none() {
			self.frame = frames.request();
		}
	}
}
