//! Tuning constants for the spoiler cloud.
//!
//! Every magic number of the effect lives here, grouped by the stage that
//! consumes it. The defaults reproduce the "invisible ink" look; tests tweak
//! individual groups to isolate behavior.

use super::geometry::smooth_step;

/// Particle count and spawn distribution.
#[derive(Clone, Debug)]
pub struct FieldTuning {
	/// Region area (px²) allotted to one particle.
	pub area_per_particle: f64,
	/// Lower bound on the particle count.
	pub min_particles: usize,
	/// Upper bound on the particle count.
	pub max_particles: usize,
	/// Rejection-sampling attempts before falling back to the region center.
	pub sample_attempts: usize,
	/// Sampling margin outside the region, in feather widths.
	pub margin_factor: f64,
	/// Base speed is drawn from `[speed_min, speed_min + speed_range)` px/s.
	pub speed_min: f64,
	pub speed_range: f64,
	/// Probability that a particle is a spark.
	pub spark_chance: f64,
	/// Share of non-spark particles that use the small dust sprite.
	pub dust_share: f64,
}

/// Per-kind sprite shape.
#[derive(Clone, Copy, Debug)]
pub struct SpriteShape {
	/// Glyph radius in CSS pixels.
	pub radius: f64,
	/// How far the core color is pushed towards white.
	pub whiten: f64,
}

/// Sprite rasterization parameters.
#[derive(Clone, Debug)]
pub struct SpriteTuning {
	pub dust: SpriteShape,
	pub dust2: SpriteShape,
	pub spark: SpriteShape,
	/// Peak halo opacity at the glyph center.
	pub halo_alpha: f64,
	/// Halo reaches zero this far beyond the glyph radius.
	pub halo_extent: f64,
	/// Radius from which the opaque core grows from 1×1 to 2×2.
	pub wide_core_radius: f64,
}

/// Drift and curl-noise parameters.
#[derive(Clone, Debug)]
pub struct MotionTuning {
	/// Spatial frequency of the curl field.
	pub curl_frequency: f64,
	pub curl_time_x: f64,
	pub curl_time_y: f64,
	/// Acceleration amplitude (px/s²).
	pub curl_strength: f64,
	/// Speed cap relative to the particle's base speed.
	pub max_speed_factor: f64,
	/// Longest simulated step (s); longer frames are truncated.
	pub max_step: f64,
	/// Distance outside the region (px) past which particles are pulled back.
	pub pull_threshold: f64,
	/// Fraction of the offset to the region center closed per frame.
	pub pull_strength: f64,
	/// Velocity retained per frame while being pulled back.
	pub pull_damping: f64,
}

/// Edge-fade policy, in feather widths of signed distance.
///
/// A particle at normalized distance `n = sdf / feather` is fully visible for
/// `n <= fade_start`, invisible for `n >= fade_end`, and smoothstepped between.
#[derive(Clone, Debug)]
pub struct EdgeTuning {
	pub fade_start: f64,
	pub fade_end: f64,
	/// Amplitude of the boundary jitter, in feather widths.
	pub jitter: f64,
	/// Spatial frequency of the jitter along x and y.
	pub jitter_frequency: (f64, f64),
	/// Temporal drift of the jitter along x and y.
	pub jitter_drift: (f64, f64),
	/// Invisible particles beyond this distance are respawned.
	pub respawn_distance: f64,
	/// Edge factors at or below this are treated as invisible.
	pub visible_threshold: f64,
}

impl EdgeTuning {
	/// Edge visibility factor for a signed distance, before jitter.
	pub fn factor(&self, sdf: f64, feather: f64) -> f64 {
		1.0 - smooth_step(self.fade_start, self.fade_end, sdf / feather)
	}

	/// Edge visibility factor with a jitter sample in `[-1, 1]`.
	pub fn jittered_factor(&self, sdf: f64, feather: f64, noise: f64) -> f64 {
		self.factor(sdf + noise * feather * self.jitter, feather)
	}
}

/// Pointer reveal and per-particle opacity parameters.
#[derive(Clone, Debug)]
pub struct RevealTuning {
	/// Reveal point lifetime (ms).
	pub ttl_ms: f64,
	/// Reveal points kept at once; the oldest is evicted first.
	pub max_points: usize,
	/// Reveal radius around a point (px); also the spotlight radius.
	pub radius: f64,
	/// Alpha lost per frame while inside a reveal radius.
	pub fade_out: f64,
	/// Alpha regained per frame otherwise.
	pub fade_in: f64,
	/// Relative opacity swing of the twinkle.
	pub twinkle_depth: f64,
	/// Constant opacity boost so the configured color reads.
	pub boost: f64,
	/// Opacity gain per unit of particle tint.
	pub tint_boost: f64,
	/// Particles below this opacity are not drawn.
	pub min_draw_alpha: f64,
	/// Particle size mapped to a sprite scale of 1.
	pub reference_size: f64,
	pub min_scale: f64,
	pub max_scale: f64,
}

/// Complete tuning set for one spoiler instance.
#[derive(Clone, Debug)]
pub struct SpoilerTuning {
	pub field: FieldTuning,
	pub sprite: SpriteTuning,
	pub motion: MotionTuning,
	pub edge: EdgeTuning,
	pub reveal: RevealTuning,
	/// Container size change (px) below which layout is considered unchanged.
	pub resize_epsilon: f64,
}

impl Default for SpoilerTuning {
	fn default() -> Self {
		Self {
			field: FieldTuning::default(),
			sprite: SpriteTuning::default(),
			motion: MotionTuning::default(),
			edge: EdgeTuning::default(),
			reveal: RevealTuning::default(),
			resize_epsilon: 0.5,
		}
	}
}

impl Default for FieldTuning {
	fn default() -> Self {
		Self {
			area_per_particle: 22.0,
			min_particles: 520,
			max_particles: 2200,
			sample_attempts: 14,
			margin_factor: 1.15,
			speed_min: 7.0,
			speed_range: 10.0,
			spark_chance: 0.06,
			dust_share: 0.55,
		}
	}
}

impl Default for SpriteTuning {
	fn default() -> Self {
		Self {
			dust: SpriteShape {
				radius: 0.72,
				whiten: 0.06,
			},
			dust2: SpriteShape {
				radius: 0.92,
				whiten: 0.08,
			},
			spark: SpriteShape {
				radius: 1.18,
				whiten: 0.14,
			},
			halo_alpha: 0.18,
			halo_extent: 0.8,
			wide_core_radius: 1.05,
		}
	}
}

impl Default for MotionTuning {
	fn default() -> Self {
		Self {
			curl_frequency: 0.045,
			curl_time_x: 0.85,
			curl_time_y: 0.80,
			curl_strength: 3.2,
			max_speed_factor: 1.18,
			max_step: 0.05,
			pull_threshold: 0.6,
			pull_strength: 0.02,
			pull_damping: 0.98,
		}
	}
}

impl Default for EdgeTuning {
	fn default() -> Self {
		Self {
			fade_start: -1.0,
			fade_end: 0.0,
			jitter: 0.18,
			jitter_frequency: (0.11, 0.13),
			jitter_drift: (0.8, 0.7),
			respawn_distance: 1.8,
			visible_threshold: 0.01,
		}
	}
}

impl Default for RevealTuning {
	fn default() -> Self {
		Self {
			ttl_ms: 1200.0,
			max_points: 30,
			radius: 34.0,
			fade_out: 0.12,
			fade_in: 0.042,
			twinkle_depth: 0.06,
			boost: 1.48,
			tint_boost: 0.82,
			min_draw_alpha: 0.01,
			reference_size: 0.8,
			min_scale: 0.9,
			max_scale: 1.15,
		}
	}
}
