//! Boundary between the spoiler core and whatever hosts it.
//!
//! The core never touches the DOM. It reads layout and style through
//! [`LayoutSource`], draws through [`Surface`], publishes the spotlight and
//! revealed flag through [`VisualHints`] and drives its loop through
//! [`FrameScheduler`]. The browser implementations live in `dom.rs`; tests use
//! in-memory fakes.

use super::color::Rgb;
use super::field::ParticleKind;
use super::geometry::TextBox;
use super::sprite::SpriteSet;

/// Default spoiler color when the host does not configure one.
pub const DEFAULT_COLOR: &str = "#9ca3af";

/// Snapshot of the container and text geometry.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Layout {
	/// Container (and canvas) size in CSS pixels.
	pub width: f64,
	pub height: f64,
	/// Text box, or `None` when there is no text to obscure.
	pub text: Option<TextBox>,
}

/// Spoiler appearance resolved from host style properties.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SpoilerStyle {
	/// Particle color.
	pub color: Rgb,
	/// Overall cloud opacity in `[0, 1]`.
	pub opacity: f64,
}

impl SpoilerStyle {
	/// Resolve raw CSS values: an empty color uses [`DEFAULT_COLOR`], an
	/// unparseable opacity means fully opaque.
	pub fn from_css(color: &str, opacity: &str) -> Self {
		let color = if color.trim().is_empty() {
			DEFAULT_COLOR
		} else {
			color
		};
		Self {
			color: Rgb::parse(color),
			opacity: parse_css_number(opacity).unwrap_or(1.0).clamp(0.0, 1.0),
		}
	}
}

impl Default for SpoilerStyle {
	fn default() -> Self {
		Self::from_css(DEFAULT_COLOR, "1")
	}
}

/// Leading-number parse in the manner of CSS lengths (`"16px"` → 16).
pub fn parse_css_number(raw: &str) -> Option<f64> {
	let s = raw.trim();
	let end = s
		.char_indices()
		.find(|&(_, c)| !(c.is_ascii_digit() || matches!(c, '.' | '-' | '+' | 'e' | 'E')))
		.map(|(i, _)| i)
		.unwrap_or(s.len());
	(1..=end)
		.rev()
		.find_map(|i| s[..i].parse::<f64>().ok())
		.filter(|n| n.is_finite())
}

/// Font metrics from computed style strings. `line-height: normal` (or any
/// non-numeric value) resolves to `1.25 × font-size`.
pub fn font_metrics(font_size: &str, line_height: &str) -> (f64, f64) {
	let size = parse_css_number(font_size).filter(|n| *n > 0.0).unwrap_or(16.0);
	let line = parse_css_number(line_height).unwrap_or(size * 1.25);
	(size, line)
}

/// Read-only view of the host element.
pub trait LayoutSource {
	fn layout(&self) -> Layout;
	fn style(&self) -> SpoilerStyle;
}

/// Render target for the particle cloud.
pub trait Surface {
	/// Resize the backing store to `width × height` CSS pixels at `dpr`.
	fn resize(&mut self, width: f64, height: f64, dpr: f64);
	fn clear(&mut self, width: f64, height: f64);
	/// Replace the glyphs used by [`Surface::draw_sprite`].
	fn load_sprites(&mut self, sprites: &SpriteSet);
	/// Blit the sprite for `kind` into the given destination rectangle.
	fn draw_sprite(&mut self, kind: ParticleKind, x: f64, y: f64, w: f64, h: f64, alpha: f64);
}

/// Visual signals the core emits besides the canvas itself.
pub trait VisualHints {
	/// Move (or hide) the pointer spotlight. Coordinates are container-local.
	fn set_spotlight(&mut self, x: f64, y: f64, radius: f64, enabled: bool);
	/// Show the plain text (`true`) or the cloud (`false`).
	fn set_revealed(&mut self, revealed: bool);
}

/// Opaque handle of a pending animation frame.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct FrameHandle(pub i32);

/// Per-refresh scheduling primitive.
pub trait FrameScheduler {
	/// Request one callback on the next display refresh.
	fn request(&mut self) -> Option<FrameHandle>;
	fn cancel(&mut self, handle: FrameHandle);
}

#[cfg(test)]
mod tests {
	use pretty_assertions::assert_eq;
	use test_case::test_case;

	use super::*;

	#[test_case("16px", Some(16.0))]
	#[test_case(" 0.5 ", Some(0.5))]
	#[test_case("1.5e1em", Some(15.0))]
	#[test_case("-3", Some(-3.0))]
	#[test_case("12e", Some(12.0))]
	#[test_case("normal", None)]
	#[test_case("", None)]
	fn css_numbers(raw: &str, expected: Option<f64>) {
		assert_eq!(parse_css_number(raw), expected);
	}

	#[test]
	fn style_defaults_and_clamps() {
		assert_eq!(SpoilerStyle::from_css("", ""), SpoilerStyle::default());
		assert_eq!(SpoilerStyle::default().color, Rgb::new(156, 163, 175));
		assert_eq!(SpoilerStyle::from_css("#fff", "2").opacity, 1.0);
		assert_eq!(SpoilerStyle::from_css("#fff", "-1").opacity, 0.0);
		assert_eq!(SpoilerStyle::from_css("#fff", "0.4").opacity, 0.4);
	}

	#[test]
	fn metrics_fall_back_for_normal_line_height() {
		assert_eq!(font_metrics("20px", "normal"), (20.0, 25.0));
		assert_eq!(font_metrics("20px", "30px"), (20.0, 30.0));
		assert_eq!(font_metrics("", "normal"), (16.0, 20.0));
	}
}
