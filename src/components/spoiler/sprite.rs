//! Pre-rasterized particle glyphs.
//!
//! Drawing thousands of radial gradients per frame is far too slow, so each
//! particle kind is rasterized once into a tiny RGBA buffer and blitted from
//! then on. The cache is keyed by the spoiler color and only rebuilt when that
//! color changes.

use log::debug;

use super::color::Rgb;
use super::field::ParticleKind;
use super::tuning::{SpriteShape, SpriteTuning};

/// A small straight-alpha RGBA8 image.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Sprite {
	/// Size in pixels.
	pub width: u32,
	pub height: u32,
	/// Row-major RGBA bytes, `width * height * 4` long.
	pub pixels: Vec<u8>,
}

impl Sprite {
	/// Rasterize a glyph: an opaque 1–2px core with a faint radial halo.
	pub fn rasterize(color: Rgb, shape: SpriteShape, tuning: &SpriteTuning) -> Self {
		let side = (shape.radius * 2.0 + 4.0).ceil() as u32;
		let col = color.mix_to_white(shape.whiten);
		let mid = side / 2;

		let core = if shape.radius >= tuning.wide_core_radius { 2 } else { 1 };
		let core_min = mid - core / 2;
		let core_max = core_min + core;
		// Halo is anchored on the center of the `mid` pixel for both core sizes.
		let halo_center = mid as f64 + 0.5;
		let halo_radius = shape.radius + tuning.halo_extent;

		let mut pixels = vec![0u8; (side * side * 4) as usize];
		for py in 0..side {
			for px in 0..side {
				let in_core = (core_min..core_max).contains(&px) && (core_min..core_max).contains(&py);
				let alpha = if in_core {
					1.0
				} else {
					let dx = px as f64 + 0.5 - halo_center;
					let dy = py as f64 + 0.5 - halo_center;
					let d = (dx * dx + dy * dy).sqrt();
					if d < halo_radius {
						tuning.halo_alpha * (1.0 - d / halo_radius)
					} else {
						0.0
					}
				};
				let i = ((py * side + px) * 4) as usize;
				pixels[i] = col.r;
				pixels[i + 1] = col.g;
				pixels[i + 2] = col.b;
				pixels[i + 3] = (alpha * 255.0).round() as u8;
			}
		}

		Self {
			width: side,
			height: side,
			pixels,
		}
	}

	/// Alpha byte of the pixel at `(x, y)`.
	pub fn alpha_at(&self, x: u32, y: u32) -> u8 {
		self.pixels[((y * self.width + x) * 4 + 3) as usize]
	}
}

/// One sprite per particle kind, all in the same color.
#[derive(Clone, Debug)]
pub struct SpriteSet {
	sprites: [Sprite; 3],
}

impl SpriteSet {
	/// Rasterize all kinds in `color`.
	pub fn build(color: Rgb, tuning: &SpriteTuning) -> Self {
		Self {
			sprites: [
				Sprite::rasterize(color, tuning.dust, tuning),
				Sprite::rasterize(color, tuning.dust2, tuning),
				Sprite::rasterize(color, tuning.spark, tuning),
			],
		}
	}

	/// Sprite for `kind`.
	pub fn get(&self, kind: ParticleKind) -> &Sprite {
		&self.sprites[kind.index()]
	}

	/// Sprites paired with their kind.
	pub fn iter(&self) -> impl Iterator<Item = (ParticleKind, &Sprite)> {
		ParticleKind::ALL.into_iter().map(|k| (k, self.get(k)))
	}
}

/// Color-keyed sprite cache.
#[derive(Clone, Debug, Default)]
pub struct SpriteCache {
	key: Option<Rgb>,
	set: Option<SpriteSet>,
}

impl SpriteCache {
	/// Make sure sprites exist for `color`. Returns `true` when they were
	/// (re)built and need to be uploaded to the surface.
	pub fn ensure(&mut self, color: Rgb, tuning: &SpriteTuning) -> bool {
		if self.key == Some(color) && self.set.is_some() {
			return false;
		}
		self.set = Some(SpriteSet::build(color, tuning));
		self.key = Some(color);
		debug!("styled-text: rebuilt particle sprites for {}", color);
		true
	}

	/// Color the cached sprites were built for.
	pub fn key(&self) -> Option<Rgb> {
		self.key
	}

	/// Cached sprites, once built.
	pub fn sprites(&self) -> Option<&SpriteSet> {
		self.set.as_ref()
	}
}
