//! Drives the spoiler frame loop end to end through in-memory hosts.

use pretty_assertions::assert_eq;
use styled_text::components::spoiler::color::Rgb;
use styled_text::components::spoiler::field::{ParticleField, ParticleKind};
use styled_text::components::spoiler::geometry::TextBox;
use styled_text::components::spoiler::host::{
	FrameHandle, FrameScheduler, Layout, LayoutSource, SpoilerStyle, Surface, VisualHints,
};
use styled_text::components::spoiler::interaction::{Bindings, Controller, DeviceClass, InteractionEvent};
use styled_text::components::spoiler::settings::{DesktopTrigger, MobileTrigger, SpoilerSettings};
use styled_text::components::spoiler::simulation::{FrameOutcome, frame};
use styled_text::components::spoiler::sprite::SpriteSet;
use styled_text::components::spoiler::state::{Phase, SimulationState};
use styled_text::components::spoiler::tuning::SpoilerTuning;

struct FakeHost {
	layout: Layout,
	style: SpoilerStyle,
}

impl FakeHost {
	fn new(width: f64, height: f64) -> Self {
		Self {
			layout: Layout {
				width,
				height,
				text: Some(TextBox {
					x: 20.0,
					y: 20.0,
					width: width - 40.0,
					height: 20.0,
					font_size: 16.0,
					line_height: 20.0,
				}),
			},
			style: SpoilerStyle::default(),
		}
	}
}

impl LayoutSource for FakeHost {
	fn layout(&self) -> Layout {
		self.layout
	}

	fn style(&self) -> SpoilerStyle {
		self.style
	}
}

#[derive(Default)]
struct RecordingSurface {
	resizes: Vec<(f64, f64, f64)>,
	sprite_loads: usize,
	draws: Vec<(ParticleKind, f64, f64, f64)>,
}

impl Surface for RecordingSurface {
	fn resize(&mut self, width: f64, height: f64, dpr: f64) {
		self.resizes.push((width, height, dpr));
	}

	fn clear(&mut self, _width: f64, _height: f64) {
		self.draws.clear();
	}

	fn load_sprites(&mut self, _sprites: &SpriteSet) {
		self.sprite_loads += 1;
	}

	fn draw_sprite(&mut self, kind: ParticleKind, x: f64, y: f64, _w: f64, _h: f64, alpha: f64) {
		self.draws.push((kind, x, y, alpha));
	}
}

#[derive(Default)]
struct Hints {
	revealed: bool,
	spotlight: Option<(f64, f64, f64)>,
}

impl VisualHints for Hints {
	fn set_spotlight(&mut self, x: f64, y: f64, radius: f64, enabled: bool) {
		self.spotlight = enabled.then_some((x, y, radius));
	}

	fn set_revealed(&mut self, revealed: bool) {
		self.revealed = revealed;
	}
}

#[derive(Default)]
struct Frames {
	issued: i32,
	pending: Option<FrameHandle>,
	cancelled: Vec<FrameHandle>,
}

impl FrameScheduler for Frames {
	fn request(&mut self) -> Option<FrameHandle> {
		self.issued += 1;
		self.pending = Some(FrameHandle(self.issued));
		self.pending
	}

	fn cancel(&mut self, handle: FrameHandle) {
		self.cancelled.push(handle);
		if self.pending == Some(handle) {
			self.pending = None;
		}
	}
}

fn positions(state: &SimulationState) -> Vec<(f64, f64)> {
	state.field.particles().iter().map(|p| (p.x, p.y)).collect()
}

#[test]
fn first_frame_builds_and_draws_the_cloud() {
	let host = FakeHost::new(300.0, 60.0);
	let (mut surface, mut frames) = (RecordingSurface::default(), Frames::default());
	let mut state = SimulationState::new(SpoilerTuning::default(), 2.0, 42);

	state.start(0.0, &mut frames);
	let outcome = frame(&mut state, 16.0, &host, &mut surface, &mut frames);

	let region = *state.region().expect("region built");
	let expected = ParticleField::target_count(&state.tuning.field, &region);
	assert_eq!(state.field.len(), expected);
	assert_eq!(surface.resizes, vec![(300.0, 60.0, 2.0)]);
	assert_eq!(surface.sprite_loads, 1);
	assert_eq!(state.sprites.key(), Some(Rgb::new(156, 163, 175)));

	let FrameOutcome::Drawn(drawn) = outcome else {
		panic!("expected a drawn frame, got {outcome:?}");
	};
	assert!(drawn > 0);
	assert_eq!(surface.draws.len(), drawn);
	for &(_, x, y, alpha) in &surface.draws {
		assert!(alpha > 0.01 && alpha <= 1.0);
		// Snapped to half pixels at dpr 2.
		assert_eq!((x * 2.0).fract(), 0.0);
		assert_eq!((y * 2.0).fract(), 0.0);
	}
	assert_eq!(frames.pending, Some(FrameHandle(2)));
}

#[test]
fn reveal_halts_motion_and_hide_resumes_it() {
	let host = FakeHost::new(300.0, 60.0);
	let (mut surface, mut frames, mut hints) =
		(RecordingSurface::default(), Frames::default(), Hints::default());
	let mut state = SimulationState::new(SpoilerTuning::default(), 1.0, 7);
	let settings = SpoilerSettings {
		desktop: DesktopTrigger::HoverClick,
		mobile: MobileTrigger::Tap,
	};
	let controller = Controller::new(Bindings::select(DeviceClass::Pointer, &settings));

	state.start(0.0, &mut frames);
	frame(&mut state, 16.0, &host, &mut surface, &mut frames);
	let before = positions(&state);
	frame(&mut state, 32.0, &host, &mut surface, &mut frames);
	assert_ne!(positions(&state), before);

	assert!(controller.handle(&mut state, InteractionEvent::Click, 40.0, &mut hints, &mut frames));
	assert!(hints.revealed);
	assert_eq!(state.phase(), Phase::Revealed);
	assert_eq!(frames.pending, None);
	assert_eq!(frames.cancelled, vec![FrameHandle(3)]);

	let frozen = positions(&state);
	assert_eq!(frame(&mut state, 48.0, &host, &mut surface, &mut frames), FrameOutcome::Halted);
	assert_eq!(frame(&mut state, 64.0, &host, &mut surface, &mut frames), FrameOutcome::Halted);
	assert_eq!(positions(&state), frozen);
	assert_eq!(frames.pending, None);

	assert!(controller.handle(&mut state, InteractionEvent::Click, 80.0, &mut hints, &mut frames));
	assert!(!hints.revealed);
	assert_eq!(state.phase(), Phase::Running);
	assert!(frames.pending.is_some());

	let outcome = frame(&mut state, 96.0, &host, &mut surface, &mut frames);
	assert!(matches!(outcome, FrameOutcome::Drawn(_)));
	assert_ne!(positions(&state), frozen);
}

#[test]
fn pointer_trail_fades_nearby_particles_until_it_expires() {
	let host = FakeHost::new(300.0, 60.0);
	let (mut surface, mut frames, mut hints) =
		(RecordingSurface::default(), Frames::default(), Hints::default());
	let controller = Controller::new(Bindings::select(DeviceClass::Pointer, &SpoilerSettings::default()));

	// Live point: pushed during an event, seen by the very next frame.
	let mut state = SimulationState::new(SpoilerTuning::default(), 1.0, 3);
	state.start(0.0, &mut frames);
	let event = InteractionEvent::PointerMove { x: 150.0, y: 30.0 };
	controller.handle(&mut state, event, 1000.0, &mut hints, &mut frames);
	assert_eq!(hints.spotlight, Some((150.0, 30.0, 34.0)));
	frame(&mut state, 1200.0, &host, &mut surface, &mut frames);
	assert!(state.field.particles().iter().any(|p| p.alpha < 1.0));

	// Expired point: exactly one time-to-live old when the frame runs.
	let mut state = SimulationState::new(SpoilerTuning::default(), 1.0, 3);
	state.start(0.0, &mut frames);
	controller.handle(&mut state, event, 0.0, &mut hints, &mut frames);
	frame(&mut state, 1200.0, &host, &mut surface, &mut frames);
	assert!(state.reveal.is_empty());
	assert!(state.field.particles().iter().all(|p| p.alpha == 1.0));
}

#[test]
fn leaving_restores_the_cloud_immediately() {
	let host = FakeHost::new(300.0, 60.0);
	let (mut surface, mut frames, mut hints) =
		(RecordingSurface::default(), Frames::default(), Hints::default());
	let controller = Controller::new(Bindings::select(DeviceClass::Pointer, &SpoilerSettings::default()));
	let mut state = SimulationState::new(SpoilerTuning::default(), 1.0, 11);

	state.start(0.0, &mut frames);
	controller.handle(&mut state, InteractionEvent::PointerMove { x: 150.0, y: 30.0 }, 10.0, &mut hints, &mut frames);
	frame(&mut state, 16.0, &host, &mut surface, &mut frames);
	assert!(state.field.particles().iter().any(|p| p.alpha < 1.0));

	controller.handle(&mut state, InteractionEvent::PointerLeave, 20.0, &mut hints, &mut frames);
	assert_eq!(hints.spotlight, None);
	assert!(state.reveal.is_empty());
	assert!(state.field.particles().iter().all(|p| p.alpha == 1.0));
}

#[test]
fn sub_pixel_layout_jitter_keeps_the_field() {
	let mut host = FakeHost::new(300.0, 60.0);
	let (mut surface, mut frames) = (RecordingSurface::default(), Frames::default());
	let mut state = SimulationState::new(SpoilerTuning::default(), 1.0, 5);

	state.start(0.0, &mut frames);
	frame(&mut state, 16.0, &host, &mut surface, &mut frames);
	let region = *state.region().expect("region built");

	host.layout.width = 300.3;
	host.layout.height = 60.4;
	frame(&mut state, 32.0, &host, &mut surface, &mut frames);
	assert_eq!(surface.resizes.len(), 1);
	assert_eq!(state.region(), Some(&region));

	host.layout.width = 340.0;
	if let Some(text) = host.layout.text.as_mut() {
		text.width = 300.0;
	}
	frame(&mut state, 48.0, &host, &mut surface, &mut frames);
	assert_eq!(surface.resizes.len(), 2);
	assert_ne!(state.region(), Some(&region));
}

#[test]
fn empty_text_draws_nothing_but_keeps_running() {
	let mut host = FakeHost::new(300.0, 60.0);
	host.layout.text = None;
	let (mut surface, mut frames) = (RecordingSurface::default(), Frames::default());
	let mut state = SimulationState::new(SpoilerTuning::default(), 1.0, 5);

	state.start(0.0, &mut frames);
	assert_eq!(frame(&mut state, 16.0, &host, &mut surface, &mut frames), FrameOutcome::Drawn(0));
	assert!(state.field.is_empty());
	assert!(frames.pending.is_some());
}

#[test]
fn color_change_rebuilds_sprites_once() {
	let mut host = FakeHost::new(300.0, 60.0);
	let (mut surface, mut frames) = (RecordingSurface::default(), Frames::default());
	let mut state = SimulationState::new(SpoilerTuning::default(), 1.0, 5);

	state.start(0.0, &mut frames);
	frame(&mut state, 16.0, &host, &mut surface, &mut frames);
	frame(&mut state, 32.0, &host, &mut surface, &mut frames);
	assert_eq!(surface.sprite_loads, 1);

	host.style = SpoilerStyle::from_css("#ff0000", "0.5");
	frame(&mut state, 48.0, &host, &mut surface, &mut frames);
	frame(&mut state, 64.0, &host, &mut surface, &mut frames);
	assert_eq!(surface.sprite_loads, 2);
	assert_eq!(state.sprites.key(), Some(Rgb::new(255, 0, 0)));
}

#[test]
fn long_run_keeps_count_and_confines_the_cloud() {
	let host = FakeHost::new(300.0, 60.0);
	let (mut surface, mut frames) = (RecordingSurface::default(), Frames::default());
	let mut state = SimulationState::new(SpoilerTuning::default(), 1.0, 17);

	state.start(0.0, &mut frames);
	frame(&mut state, 16.0, &host, &mut surface, &mut frames);
	let region = *state.region().expect("region built");
	let count = state.field.len();

	for i in 2..2000 {
		frame(&mut state, i as f64 * 16.0, &host, &mut surface, &mut frames);
		assert_eq!(state.field.len(), count);
	}
	let limit = region.feather * state.tuning.edge.respawn_distance;
	for p in state.field.particles() {
		assert!(region.signed_distance(p.x, p.y) <= limit + 1e-9);
	}
	assert_eq!(state.region(), Some(&region));
}
