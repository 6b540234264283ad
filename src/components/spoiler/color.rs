//! Spoiler color handling.
//!
//! The spoiler color arrives as a CSS string from the host. Only the forms a
//! page builder actually emits are understood: `#rgb`, `#rrggbb`, `rgb()` and
//! `rgba()`. Anything else resolves to [`Rgb::FALLBACK`].

use std::fmt;

/// Opaque RGB color triple. Alpha is carried separately by the spoiler opacity.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Rgb {
	/// Red channel.
	pub r: u8,
	/// Green channel.
	pub g: u8,
	/// Blue channel.
	pub b: u8,
}

impl Rgb {
	/// Neutral gray used when the configured color cannot be parsed.
	pub const FALLBACK: Rgb = Rgb::new(156, 163, 175);

	/// Color from its channels.
	pub const fn new(r: u8, g: u8, b: u8) -> Self {
		Self { r, g, b }
	}

	/// Parse a CSS color, falling back to [`Rgb::FALLBACK`].
	pub fn parse(css: &str) -> Self {
		Self::try_parse(css).unwrap_or(Self::FALLBACK)
	}

	/// Parse a CSS color, returning `None` for unsupported or malformed input.
	pub fn try_parse(css: &str) -> Option<Self> {
		let c = css.trim();
		if let Some(hex) = c.strip_prefix('#') {
			return parse_hex(hex);
		}
		parse_functional(c)
	}

	/// Blend towards white (0.0 = unchanged, 1.0 = white), rounding each channel.
	pub fn mix_to_white(self, factor: f64) -> Self {
		let f = factor.clamp(0.0, 1.0);
		let mix = |c: u8| (c as f64 + (255.0 - c as f64) * f).round() as u8;
		Self {
			r: mix(self.r),
			g: mix(self.g),
			b: mix(self.b),
		}
	}

	/// `rgb(r, g, b)` form for style properties.
	pub fn to_css(self) -> String {
		format!("#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
	}
}

impl Default for Rgb {
	fn default() -> Self {
		Self::FALLBACK
	}
}

impl fmt::Display for Rgb {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(f, "{},{},{}", self.r, self.g, self.b)
	}
}

fn parse_hex(hex: &str) -> Option<Rgb> {
	if !hex.is_ascii() {
		return None;
	}
	let channel = |s: &str| u8::from_str_radix(s, 16).ok();
	match hex.len() {
		3 => {
			let mut it = hex.chars().map(|c| {
				let pair = format!("{c}{c}");
				channel(&pair)
			});
			Some(Rgb::new(it.next()??, it.next()??, it.next()??))
		}
		6 => Some(Rgb::new(
			channel(&hex[0..2])?,
			channel(&hex[2..4])?,
			channel(&hex[4..6])?,
		)),
		_ => None,
	}
}

/// `rgb(r, g, b)` / `rgba(r, g, b, a)`, case-insensitive. Channels are read as
/// leading integers (so `12.7` reads as `12`) and clamped to `0..=255`.
fn parse_functional(c: &str) -> Option<Rgb> {
	let lower = c.to_ascii_lowercase();
	let start = lower.find("rgb")?;
	let rest = &lower[start + 3..];
	let rest = rest.strip_prefix('a').unwrap_or(rest);
	let body = rest.strip_prefix('(')?;
	let body = &body[..body.find(')')?];

	let mut parts = body.split(',').map(str::trim);
	let mut next = || parts.next().and_then(leading_int);
	Some(Rgb::new(next()?, next()?, next()?))
}

fn leading_int(s: &str) -> Option<u8> {
	let end = s
		.char_indices()
		.find(|&(i, ch)| !(ch.is_ascii_digit() || (i == 0 && (ch == '-' || ch == '+'))))
		.map(|(i, _)| i)
		.unwrap_or(s.len());
	let n: i64 = s[..end].parse().ok()?;
	Some(n.clamp(0, 255) as u8)
}
