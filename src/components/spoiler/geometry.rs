//! Rounded-rectangle region and its signed distance field.
//!
//! The cloud is confined to a single rounded rectangle hugging the laid-out
//! text box, not to individual glyphs. All coordinates are CSS pixels relative
//! to the spoiler canvas.

/// Hermite smoothstep of `x` over `[a, b]`, clamped to `[0, 1]`.
pub fn smooth_step(a: f64, b: f64, x: f64) -> f64 {
	let t = ((x - a) / (b - a)).clamp(0.0, 1.0);
	t * t * (3.0 - 2.0 * t)
}

/// Laid-out text box as measured by the host.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TextBox {
	/// Offset of the text element inside the spoiler container.
	pub x: f64,
	pub y: f64,
	pub width: f64,
	pub height: f64,
	/// Computed font size (px).
	pub font_size: f64,
	/// Resolved line height (px).
	pub line_height: f64,
}

/// Rounded rectangle that particles are confined to.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Region {
	pub x: f64,
	pub y: f64,
	/// Size in CSS pixels.
	pub w: f64,
	pub h: f64,
	/// Corner radius, never more than half the shorter side.
	pub radius: f64,
	/// Width of the soft transition band at the boundary.
	pub feather: f64,
}

impl Region {
	/// Derive the cloud region from a text box, padded by font metrics and
	/// clipped to a `canvas_w × canvas_h` canvas.
	pub fn around_text(text: &TextBox, canvas_w: f64, canvas_h: f64) -> Self {
		let pad_x = 10f64.max(text.width * 0.04).max(text.font_size * 0.7);
		let pad_y = 6f64.max(text.height * 0.18).max(text.font_size * 0.35);
		let corner = (text.line_height * 0.55).clamp(10.0, 10f64.max((text.height + pad_y * 2.0) / 2.0));

		let x = (text.x - pad_x).clamp(0.0, (canvas_w - 1.0).max(0.0));
		let y = (text.y - pad_y).clamp(0.0, (canvas_h - 1.0).max(0.0));
		let mut w = (text.width + pad_x * 2.0).max(1.0);
		let mut h = (text.height + pad_y * 2.0).max(1.0);
		if x + w > canvas_w {
			w = (canvas_w - x).max(1.0);
		}
		if y + h > canvas_h {
			h = (canvas_h - y).max(1.0);
		}

		Self {
			x,
			y,
			w,
			h,
			radius: corner.min(w.min(h) / 2.0),
			feather: 8f64.max(text.line_height * 0.28),
		}
	}

	/// Center of the bounding box.
	pub fn center(&self) -> (f64, f64) {
		(self.x + self.w / 2.0, self.y + self.h / 2.0)
	}

	/// Bounding-box area (px²).
	pub fn area(&self) -> f64 {
		self.w * self.h
	}

	/// Signed distance from `(px, py)` to the boundary: negative inside,
	/// positive outside.
	#[inline]
	pub fn signed_distance(&self, px: f64, py: f64) -> f64 {
		let (cx, cy) = self.center();
		let qx = (px - cx).abs() - (self.w / 2.0 - self.radius);
		let qy = (py - cy).abs() - (self.h / 2.0 - self.radius);
		qx.max(0.0).hypot(qy.max(0.0)) + qx.max(qy).min(0.0) - self.radius
	}
}

#[cfg(test)]
mod tests {
	use pretty_assertions::assert_eq;
	use proptest::prelude::*;

	use super::*;

	fn region() -> Region {
		Region {
			x: 10.0,
			y: 20.0,
			w: 200.0,
			h: 60.0,
			radius: 12.0,
			feather: 9.0,
		}
	}

	#[test]
	fn distance_sign_follows_containment() {
		let r = region();
		assert_eq!(r.signed_distance(110.0, 50.0), -30.0);
		assert_eq!(r.signed_distance(10.0, 50.0), 0.0);
		assert_eq!(r.signed_distance(0.0, 50.0), 10.0);
		assert_eq!(r.signed_distance(110.0, 90.0), 10.0);
	}

	#[test]
	fn corners_are_rounded() {
		let r = region();
		// The bounding-box corner lies outside the rounded corner.
		let d = r.signed_distance(10.0, 20.0);
		let expected = (2.0f64 * 12.0 * 12.0).sqrt() - 12.0;
		assert!((d - expected).abs() < 1e-9);
		// The corner circle center sits one radius inside.
		assert!((r.signed_distance(22.0, 32.0) + 12.0).abs() < 1e-9);
	}

	#[test]
	fn smooth_step_clamps() {
		assert_eq!(smooth_step(0.0, 1.0, -3.0), 0.0);
		assert_eq!(smooth_step(0.0, 1.0, 4.0), 1.0);
		assert_eq!(smooth_step(0.0, 1.0, 0.5), 0.5);
	}

	#[test]
	fn region_pads_text_box() {
		let text = TextBox {
			x: 40.0,
			y: 30.0,
			width: 200.0,
			height: 24.0,
			font_size: 20.0,
			line_height: 24.0,
		};
		let r = Region::around_text(&text, 400.0, 100.0);
		// pad_x = max(10, 8, 14) = 14, pad_y = max(6, 4.32, 7) = 7
		assert_eq!((r.x, r.y, r.w, r.h), (26.0, 23.0, 228.0, 38.0));
		assert!((r.radius - 13.2).abs() < 1e-9);
		assert_eq!(r.feather, 8.0);
	}

	#[test]
	fn region_is_clipped_to_canvas() {
		let text = TextBox {
			x: 0.0,
			y: 0.0,
			width: 300.0,
			height: 40.0,
			font_size: 16.0,
			line_height: 40.0,
		};
		let r = Region::around_text(&text, 250.0, 30.0);
		assert_eq!((r.x, r.y), (0.0, 0.0));
		assert_eq!((r.w, r.h), (250.0, 30.0));
		assert!(r.radius <= 15.0);
		assert!((r.feather - 11.2).abs() < 1e-9);
	}

	proptest! {
		#[test]
		fn region_stays_inside_canvas(
			x in -50.0f64..500.0,
			y in -50.0f64..200.0,
			width in 0.0f64..800.0,
			height in 0.0f64..200.0,
			font_size in 8.0f64..72.0,
			canvas_w in 2.0f64..900.0,
			canvas_h in 2.0f64..300.0,
		) {
			let text = TextBox { x, y, width, height, font_size, line_height: font_size * 1.25 };
			let r = Region::around_text(&text, canvas_w, canvas_h);
			prop_assert!(r.x >= 0.0 && r.y >= 0.0);
			prop_assert!(r.x + r.w <= canvas_w + 1e-9);
			prop_assert!(r.y + r.h <= canvas_h + 1e-9);
			prop_assert!(r.radius <= r.w.min(r.h) / 2.0);
			prop_assert!(r.signed_distance(r.center().0, r.center().1) <= 0.0);
		}
	}
}
