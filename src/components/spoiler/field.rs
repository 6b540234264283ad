//! Particle field: the dust cloud covering the spoiler region.
//!
//! The field is rebuilt wholesale whenever the region changes size. Between
//! rebuilds the particle count is fixed; particles that drift away are
//! respawned in place rather than destroyed.

use std::f64::consts::TAU;

use log::debug;
use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};

use super::geometry::Region;
use super::tuning::FieldTuning;

/// Visual class of a particle; selects the sprite it is drawn with.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ParticleKind {
	/// Small, faint dust.
	Dust,
	/// Slightly larger dust.
	Dust2,
	/// Rare bright sparkle.
	Spark,
}

impl ParticleKind {
	/// Every kind, in sprite order.
	pub const ALL: [ParticleKind; 3] = [ParticleKind::Dust, ParticleKind::Dust2, ParticleKind::Spark];

	/// Position in [`ParticleKind::ALL`].
	pub fn index(self) -> usize {
		match self {
			ParticleKind::Dust => 0,
			ParticleKind::Dust2 => 1,
			ParticleKind::Spark => 2,
		}
	}
}

/// A single dust particle.
#[derive(Clone, Debug)]
pub struct Particle {
	/// Position in CSS pixels.
	pub x: f64,
	pub y: f64,
	/// Velocity in CSS pixels per second.
	pub vx: f64,
	pub vy: f64,
	/// Speed assigned at creation; kept across respawns.
	pub base_speed: f64,
	/// Reveal opacity in `[0, 1]`, lowered near the pointer.
	pub alpha: f64,
	/// Relative glyph size; scales the sprite.
	pub size: f64,
	/// Sprite used to draw the particle.
	pub kind: ParticleKind,
	/// Extra opacity weight, higher for sparks.
	pub tint: f64,
	pub phase: f64, // For twinkling and edge jitter
	/// Twinkle angular speed (rad/s).
	pub twinkle_speed: f64,
}

/// Seeded random source for particle placement.
pub struct Spawner {
	rng: SmallRng,
	tuning: FieldTuning,
}

impl Spawner {
	/// Spawner seeded with `seed`.
	pub fn new(tuning: FieldTuning, seed: u64) -> Self {
		Self {
			rng: SmallRng::seed_from_u64(seed),
			tuning,
		}
	}

	/// Distribution parameters in use.
	pub fn tuning(&self) -> &FieldTuning {
		&self.tuning
	}

	/// Rejection-sample a point within `feather * margin_factor` of the region,
	/// falling back to the region center once the attempt budget is spent.
	pub fn sample_point(&mut self, region: &Region) -> (f64, f64) {
		let margin = region.feather * self.tuning.margin_factor;
		for _ in 0..self.tuning.sample_attempts {
			let x = region.x + (self.rng.random::<f64>() * (region.w + margin * 2.0) - margin);
			let y = region.y + (self.rng.random::<f64>() * (region.h + margin * 2.0) - margin);
			if region.signed_distance(x, y) <= margin {
				return (x, y);
			}
		}
		region.center()
	}

	fn velocity(&mut self, speed: f64) -> (f64, f64) {
		let dir = self.rng.random::<f64>() * TAU;
		(dir.cos() * speed, dir.sin() * speed)
	}

	/// Create a fresh particle inside `region`.
	pub fn spawn(&mut self, region: &Region) -> Particle {
		let (x, y) = self.sample_point(region);
		let speed = self.tuning.speed_min + self.rng.random::<f64>() * self.tuning.speed_range;
		let (vx, vy) = self.velocity(speed);

		let sparkle = self.rng.random::<f64>() < self.tuning.spark_chance;
		let size = if sparkle {
			0.90 + self.rng.random::<f64>() * 0.35
		} else {
			0.55 + self.rng.random::<f64>() * 0.28
		};
		let tint = if sparkle {
			0.65 + self.rng.random::<f64>() * 0.25
		} else {
			0.22 + self.rng.random::<f64>() * 0.22
		};
		let kind = if sparkle {
			ParticleKind::Spark
		} else if self.rng.random::<f64>() < self.tuning.dust_share {
			ParticleKind::Dust
		} else {
			ParticleKind::Dust2
		};

		Particle {
			x,
			y,
			vx,
			vy,
			base_speed: speed,
			alpha: 1.0,
			size,
			kind,
			tint,
			phase: self.rng.random::<f64>() * TAU,
			twinkle_speed: 0.6 + self.rng.random::<f64>() * 1.0,
		}
	}

	/// Move `particle` to a new sampled point in `region` with a new heading.
	pub fn respawn(&mut self, particle: &mut Particle, region: &Region) {
		let (x, y) = self.sample_point(region);
		let (vx, vy) = self.velocity(particle.base_speed);
		particle.x = x;
		particle.y = y;
		particle.vx = vx;
		particle.vy = vy;
	}
}

/// Owns the particle set and the region it covers.
pub struct ParticleField {
	particles: Vec<Particle>,
	region: Option<Region>,
	spawner: Spawner,
}

impl ParticleField {
	/// Empty field; nothing is spawned until [`ParticleField::build`].
	pub fn new(tuning: FieldTuning, seed: u64) -> Self {
		Self {
			particles: Vec::new(),
			region: None,
			spawner: Spawner::new(tuning, seed),
		}
	}

	/// Particle count for a region: one per `area_per_particle`, clamped.
	pub fn target_count(tuning: &FieldTuning, region: &Region) -> usize {
		let raw = (region.area() / tuning.area_per_particle).round();
		(raw.max(0.0) as usize).clamp(tuning.min_particles, tuning.max_particles)
	}

	/// Discard all particles and seed a new cloud over `region`.
	pub fn build(&mut self, region: Region) {
		let count = Self::target_count(self.spawner.tuning(), &region);
		self.particles.clear();
		self.particles.reserve(count);
		for _ in 0..count {
			let particle = self.spawner.spawn(&region);
			self.particles.push(particle);
		}
		self.region = Some(region);
		debug!(
			"styled-text: built {} particles over {:.1}x{:.1} region",
			count, region.w, region.h
		);
	}

	/// Drop all particles and the region (nothing to obscure).
	pub fn clear(&mut self) {
		self.particles.clear();
		self.region = None;
	}

	/// Region the current cloud covers.
	pub fn region(&self) -> Option<&Region> {
		self.region.as_ref()
	}

	/// Current particles.
	pub fn particles(&self) -> &[Particle] {
		&self.particles
	}

	/// Number of particles.
	pub fn len(&self) -> usize {
		self.particles.len()
	}

	/// Whether the field holds no particles.
	pub fn is_empty(&self) -> bool {
		self.particles.is_empty()
	}

	/// Respawn the particle at `index` into the current region.
	pub fn respawn(&mut self, index: usize) {
		let Some(region) = self.region else {
			return;
		};
		if let Some(p) = self.particles.get_mut(index) {
			self.spawner.respawn(p, &region);
		}
	}

	/// Make every particle fully opaque again.
	pub fn restore_alpha(&mut self) {
		for p in &mut self.particles {
			p.alpha = 1.0;
		}
	}

	/// Borrow particles and spawner together for the per-frame update.
	pub(crate) fn split_mut(&mut self) -> (&mut [Particle], Option<Region>, &mut Spawner) {
		(&mut self.particles, self.region, &mut self.spawner)
	}
}
