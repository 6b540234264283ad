//! Per-frame simulation and compositing of the spoiler cloud.
//!
//! [`frame`] is the single scheduled tick. Each call:
//! 1. expires old reveal points,
//! 2. re-syncs layout (rebuilding the field on a real resize),
//! 3. moves every particle through a small curl field,
//! 4. fades particles at the feathered region edge and near reveal points,
//! 5. blits the cached sprite for each visible particle, snapped to device pixels,
//! 6. requests the next frame unless the spoiler has been revealed.

use super::field::{Particle, ParticleField};
use super::host::{FrameScheduler, LayoutSource, Surface};
use super::sprite::SpriteSet;
use super::state::{FrameClock, RevealPoints, SimulationState};
use super::tuning::{MotionTuning, SpoilerTuning};

/// What a call to [`frame`] did.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FrameOutcome {
	/// The spoiler is not running; nothing was drawn or scheduled.
	Halted,
	/// The frame ran and drew this many particles.
	Drawn(usize),
}

/// Round a CSS-pixel coordinate to the device pixel grid.
#[inline]
pub fn snap(v: f64, dpr: f64) -> f64 {
	(v * dpr).round() / dpr
}

/// Run one animation frame.
pub fn frame<L, S, F>(
	state: &mut SimulationState,
	now: f64,
	host: &L,
	surface: &mut S,
	frames: &mut F,
) -> FrameOutcome
where
	L: LayoutSource + ?Sized,
	S: Surface + ?Sized,
	F: FrameScheduler + ?Sized,
{
	let Some(clock) = state.begin_frame(now) else {
		return FrameOutcome::Halted;
	};

	state.reveal.expire(now);
	state.sync_layout(&host.layout(), surface);

	let style = host.style();
	surface.clear(state.width, state.height);
	if state.sprites.ensure(style.color, &state.tuning.sprite) {
		if let Some(set) = state.sprites.sprites() {
			surface.load_sprites(set);
		}
	}

	let drawn = match state.sprites.sprites() {
		Some(sprites) => step_particles(
			&mut state.field,
			&state.reveal,
			sprites,
			&state.tuning,
			Pass {
				clock,
				opacity: style.opacity,
				dpr: state.dpr,
			},
			surface,
		),
		None => 0,
	};

	state.schedule_next(frames);
	FrameOutcome::Drawn(drawn)
}

/// Per-frame constants shared by every particle.
#[derive(Clone, Copy)]
struct Pass {
	clock: FrameClock,
	opacity: f64,
	dpr: f64,
}

/// Apply the curl acceleration, cap the speed and integrate position.
#[inline]
pub fn advance(p: &mut Particle, time: f64, dt: f64, m: &MotionTuning) {
	let ax = (p.y * m.curl_frequency + time * m.curl_time_x + p.phase).sin() * m.curl_strength;
	let ay = (p.x * m.curl_frequency - time * m.curl_time_y + p.phase).cos() * m.curl_strength;
	p.vx += ax * dt;
	p.vy += ay * dt;

	let max_v = p.base_speed * m.max_speed_factor;
	let v = (p.vx * p.vx + p.vy * p.vy).sqrt();
	if v > max_v {
		let k = max_v / v;
		p.vx *= k;
		p.vy *= k;
	}

	p.x += p.vx * dt;
	p.y += p.vy * dt;
}

fn step_particles<S: Surface + ?Sized>(
	field: &mut ParticleField,
	reveal: &RevealPoints,
	sprites: &SpriteSet,
	tuning: &SpoilerTuning,
	pass: Pass,
	surface: &mut S,
) -> usize {
	let (particles, region, spawner) = field.split_mut();
	let Some(region) = region else {
		return 0;
	};
	let (m, e, r) = (&tuning.motion, &tuning.edge, &tuning.reveal);
	let (cx, cy) = region.center();
	let time = pass.clock.time;
	let mut drawn = 0;

	for p in particles.iter_mut() {
		advance(p, time, pass.clock.dt, m);

		// Irregular boundary so the cloud never ends in a clean outline.
		let sdf = region.signed_distance(p.x, p.y);
		let noise = ((p.x * e.jitter_frequency.0 + time * e.jitter_drift.0 + p.phase).sin()
			+ (p.y * e.jitter_frequency.1 - time * e.jitter_drift.1 + p.phase).cos())
			* 0.5;
		let edge = e.jittered_factor(sdf, region.feather, noise);
		if edge <= e.visible_threshold {
			if sdf > region.feather * e.respawn_distance {
				spawner.respawn(p, &region);
			}
			continue;
		}

		if sdf > m.pull_threshold {
			p.x += (cx - p.x) * m.pull_strength;
			p.y += (cy - p.y) * m.pull_strength;
			p.vx *= m.pull_damping;
			p.vy *= m.pull_damping;
		}

		p.alpha = if reveal.any_within(p.x, p.y, r.radius) {
			(p.alpha - r.fade_out).max(0.0)
		} else {
			(p.alpha + r.fade_in).min(1.0)
		};

		let twinkle = 1.0 - r.twinkle_depth + r.twinkle_depth * (time * p.twinkle_speed + p.phase).sin();
		let base = (pass.opacity * p.alpha * edge * twinkle * r.boost).clamp(0.0, 1.0);
		if base <= r.min_draw_alpha {
			continue;
		}

		let sprite = sprites.get(p.kind);
		let scale = (p.size / r.reference_size).clamp(r.min_scale, r.max_scale);
		let dw = (sprite.width as f64 * scale).round().max(1.0);
		let dh = (sprite.height as f64 * scale).round().max(1.0);
		let alpha = (base * (1.0 + p.tint * r.tint_boost)).clamp(0.0, 1.0);
		surface.draw_sprite(
			p.kind,
			snap(p.x - dw / 2.0, pass.dpr),
			snap(p.y - dh / 2.0, pass.dpr),
			dw,
			dh,
			alpha,
		);
		drawn += 1;
	}

	drawn
}
