//! Pointer, touch and click handling for the spoiler.
//!
//! Capability detection happens once, at bind time: [`Bindings::select`] turns
//! the device class and configured trigger into a fixed set of gestures. The
//! [`Controller`] then maps input events onto the simulation state.

use super::host::{FrameScheduler, VisualHints};
use super::settings::{DesktopTrigger, MobileTrigger, SpoilerSettings};
use super::state::SimulationState;

/// Input capability of the device, detected once per binding.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DeviceClass {
	/// Fine pointer with hover (mouse, trackpad).
	Pointer,
	/// Coarse pointer or no hover (touch screens).
	Touch,
}

/// Gestures wired up for one spoiler instance.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Bindings {
	/// Mouse move reveals locally, mouse leave re-obscures.
	pub hover_ink: bool,
	/// Touch drag reveals locally, touch end re-obscures.
	pub touch_ink: bool,
	/// Click/tap toggles the whole text.
	pub click_toggle: bool,
}

impl Bindings {
	/// Gestures for `device` under the configured triggers.
	pub fn select(device: DeviceClass, settings: &SpoilerSettings) -> Self {
		match device {
			DeviceClass::Pointer => match settings.desktop {
				DesktopTrigger::Hover => Self {
					hover_ink: true,
					..Self::default()
				},
				DesktopTrigger::Click => Self {
					click_toggle: true,
					..Self::default()
				},
				DesktopTrigger::HoverClick => Self {
					hover_ink: true,
					click_toggle: true,
					..Self::default()
				},
			},
			DeviceClass::Touch => match settings.mobile {
				MobileTrigger::Hover => Self {
					touch_ink: true,
					..Self::default()
				},
				MobileTrigger::HoverClick => Self {
					touch_ink: true,
					click_toggle: true,
					..Self::default()
				},
				MobileTrigger::Tap => Self {
					click_toggle: true,
					..Self::default()
				},
			},
		}
	}
}

/// Input event in container-local CSS pixels.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum InteractionEvent {
	/// Mouse moved over the container.
	PointerMove { x: f64, y: f64 },
	/// Mouse left the container.
	PointerLeave,
	/// First finger down.
	TouchStart { x: f64, y: f64 },
	/// Finger dragged.
	TouchMove { x: f64, y: f64 },
	/// Last finger lifted or touch cancelled.
	TouchEnd,
	/// Click or tap.
	Click,
}

/// Maps input events to state transitions for one instance.
#[derive(Clone, Copy, Debug)]
pub struct Controller {
	bindings: Bindings,
}

impl Controller {
	/// Controller for a fixed set of gestures.
	pub fn new(bindings: Bindings) -> Self {
		Self { bindings }
	}

	/// Gestures this controller responds to.
	pub fn bindings(&self) -> Bindings {
		self.bindings
	}

	/// Apply `event`. Returns `true` when the event was consumed, in which
	/// case the host should suppress its default action.
	pub fn handle<H, F>(
		&self,
		state: &mut SimulationState,
		event: InteractionEvent,
		now: f64,
		hints: &mut H,
		frames: &mut F,
	) -> bool
	where
		H: VisualHints + ?Sized,
		F: FrameScheduler + ?Sized,
	{
		let radius = state.tuning.reveal.radius;
		match event {
			InteractionEvent::PointerMove { x, y } if self.bindings.hover_ink => {
				state.reveal.push(x, y, now);
				hints.set_spotlight(x, y, radius, true);
				true
			}
			InteractionEvent::TouchMove { x, y } if self.bindings.touch_ink => {
				state.reveal.push(x, y, now);
				hints.set_spotlight(x, y, radius, true);
				true
			}
			InteractionEvent::TouchStart { x, y } if self.bindings.touch_ink => {
				hints.set_spotlight(x, y, radius, true);
				true
			}
			InteractionEvent::PointerLeave if self.bindings.hover_ink => {
				hints.set_spotlight(0.0, 0.0, 0.0, false);
				state.clear_reveal();
				true
			}
			InteractionEvent::TouchEnd if self.bindings.touch_ink => {
				hints.set_spotlight(0.0, 0.0, 0.0, false);
				state.clear_reveal();
				true
			}
			InteractionEvent::Click if self.bindings.click_toggle => {
				if state.is_revealed() {
					state.hide_all(now, hints, frames);
				} else {
					state.reveal_all(hints, frames);
				}
				true
			}
			_ => false,
		}
	}
}
