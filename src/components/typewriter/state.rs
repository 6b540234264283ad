//! Typewriter timing, independent of any timer API.
//!
//! A pass starts by emptying the text, then shows one more character every
//! `speed_ms` until the whole text is visible. One further step ends the pass.
//! With looping enabled the next pass begins `delay_ms` after that.

use serde::Deserialize;

/// Typing effect configuration.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct TypingSettings {
	/// Milliseconds between characters.
	pub speed_ms: u32,
	/// Pause before a looped pass restarts.
	pub delay_ms: u32,
	#[serde(rename = "loop")]
	pub looped: bool,
	/// Text of the blinking cursor element.
	pub cursor: String,
}

impl Default for TypingSettings {
	fn default() -> Self {
		Self {
			speed_ms: 80,
			delay_ms: 1200,
			looped: false,
			cursor: "|".to_string(),
		}
	}
}

/// Leading integer of `raw`, like `parseInt` (`"120ms"` → 120).
fn leading_int(raw: &str) -> Option<i64> {
	let s = raw.trim();
	let digits = s.strip_prefix(['-', '+']).unwrap_or(s);
	let len = digits.chars().take_while(char::is_ascii_digit).count();
	if len == 0 {
		return None;
	}
	let value: i64 = digits[..len].parse().ok()?;
	Some(if s.starts_with('-') { -value } else { value })
}

fn millis(raw: Option<&str>, default: u32) -> u32 {
	match raw.and_then(leading_int) {
		Some(0) | None => default,
		Some(n) => n.clamp(1, u32::MAX as i64) as u32,
	}
}

impl TypingSettings {
	/// Build from raw `data-typing-*` attribute values. Missing, zero or
	/// unparseable numbers use the defaults; only `"yes"` enables looping.
	pub fn from_attrs(
		speed: Option<&str>,
		delay: Option<&str>,
		looped: Option<&str>,
		cursor: Option<&str>,
	) -> Self {
		let defaults = Self::default();
		Self {
			speed_ms: millis(speed, defaults.speed_ms),
			delay_ms: millis(delay, defaults.delay_ms),
			looped: looped == Some("yes"),
			cursor: cursor
				.filter(|c| !c.is_empty())
				.map(str::to_string)
				.unwrap_or(defaults.cursor),
		}
	}

	fn speed(&self) -> f64 {
		self.speed_ms.max(1) as f64
	}

	fn delay(&self) -> f64 {
		self.delay_ms.max(1) as f64
	}
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Stage {
	/// Next step shows `next` characters (or ends the pass past the end).
	Typing { next: usize },
	/// Between looped passes.
	Waiting,
	Finished,
}

/// State machine behind the typing effect.
#[derive(Clone, Debug)]
pub struct Typewriter {
	chars: Vec<char>,
	settings: TypingSettings,
	shown: usize,
	stage: Stage,
	due: f64,
}

impl Typewriter {
	/// Start a pass at `now`. The first [`poll`](Self::poll) at or after `now`
	/// empties the text.
	pub fn new(text: &str, settings: TypingSettings, now: f64) -> Self {
		Self {
			chars: text.chars().collect(),
			settings,
			shown: 0,
			stage: Stage::Typing { next: 0 },
			due: now,
		}
	}

	/// Timing this instance runs with.
	pub fn settings(&self) -> &TypingSettings {
		&self.settings
	}

	/// Run every step due by `now`. Returns the text to display when it
	/// changed, `None` otherwise.
	pub fn poll(&mut self, now: f64) -> Option<String> {
		let mut changed = false;
		while self.stage != Stage::Finished && self.due <= now {
			match self.stage {
				Stage::Typing { next } if next <= self.chars.len() => {
					self.shown = next;
					self.stage = Stage::Typing { next: next + 1 };
					self.due += self.settings.speed();
					changed = true;
				}
				Stage::Typing { .. } if self.settings.looped => {
					self.stage = Stage::Waiting;
					self.due += self.settings.delay();
				}
				Stage::Typing { .. } => self.stage = Stage::Finished,
				Stage::Waiting => self.stage = Stage::Typing { next: 0 },
				Stage::Finished => {}
			}
		}
		changed.then(|| self.visible_text())
	}

	/// Time of the next step, or `None` once a non-looping pass has ended.
	pub fn next_due(&self) -> Option<f64> {
		(self.stage != Stage::Finished).then_some(self.due)
	}

	/// Prefix currently typed out.
	pub fn visible_text(&self) -> String {
		self.chars[..self.shown].iter().collect()
	}

	/// The full text being typed.
	pub fn full_text(&self) -> String {
		self.chars.iter().collect()
	}

	/// Whether a single pass has completed.
	pub fn is_finished(&self) -> bool {
		self.stage == Stage::Finished
	}
}

#[cfg(test)]
mod tests {
	use pretty_assertions::assert_eq;
	use test_case::test_case;

	use super::*;

	fn settings(looped: bool) -> TypingSettings {
		TypingSettings {
			looped,
			..TypingSettings::default()
		}
	}

	#[test_case(None, 80)]
	#[test_case(Some("0"), 80)]
	#[test_case(Some("abc"), 80)]
	#[test_case(Some("120"), 120)]
	#[test_case(Some(" 45ms"), 45)]
	#[test_case(Some("-5"), 1)]
	fn speed_attribute(raw: Option<&str>, expected: u32) {
		assert_eq!(TypingSettings::from_attrs(raw, None, None, None).speed_ms, expected);
	}

	#[test]
	fn attributes_fill_defaults() {
		let s = TypingSettings::from_attrs(None, Some("300"), Some("yes"), Some(""));
		assert_eq!(
			s,
			TypingSettings {
				speed_ms: 80,
				delay_ms: 300,
				looped: true,
				cursor: "|".to_string(),
			}
		);
		assert!(!TypingSettings::from_attrs(None, None, Some("true"), None).looped);
		assert_eq!(TypingSettings::from_attrs(None, None, None, Some("_")).cursor, "_");
	}

	#[test]
	fn json_settings_use_defaults() {
		let s: TypingSettings = serde_json::from_str(r#"{"speed_ms": 40, "loop": true}"#).unwrap();
		assert_eq!(s.speed_ms, 40);
		assert_eq!(s.delay_ms, 1200);
		assert!(s.looped);
	}

	#[test]
	fn types_one_character_per_step() {
		let mut tw = Typewriter::new("Hello", settings(false), 0.0);
		assert_eq!(tw.poll(0.0), Some(String::new()));
		assert_eq!(tw.poll(79.0), None);
		assert_eq!(tw.poll(80.0).as_deref(), Some("H"));
		assert_eq!(tw.poll(320.0).as_deref(), Some("Hell"));
		assert_eq!(tw.visible_text().chars().count(), 4);
		assert_eq!(tw.poll(400.0).as_deref(), Some("Hello"));
		assert_eq!(tw.next_due(), Some(480.0));
	}

	#[test]
	fn single_pass_stops_mutating() {
		let mut tw = Typewriter::new("Hello", settings(false), 0.0);
		tw.poll(400.0);
		assert_eq!(tw.poll(480.0), None);
		assert!(tw.is_finished());
		assert_eq!(tw.next_due(), None);
		assert_eq!(tw.poll(100_000.0), None);
		assert_eq!(tw.visible_text(), "Hello");
	}

	#[test]
	fn looping_restarts_after_delay() {
		let mut tw = Typewriter::new("Hello", settings(true), 0.0);
		tw.poll(480.0);
		assert_eq!(tw.visible_text(), "Hello");
		assert_eq!(tw.next_due(), Some(1680.0));
		assert_eq!(tw.poll(1679.0), None);
		assert_eq!(tw.poll(1680.0), Some(String::new()));
		assert_eq!(tw.poll(1760.0).as_deref(), Some("H"));
		assert!(!tw.is_finished());
	}

	#[test]
	fn counts_unicode_scalars() {
		let mut tw = Typewriter::new("héllo✓", settings(false), 0.0);
		assert_eq!(tw.poll(160.0).as_deref(), Some("hé"));
		assert_eq!(tw.full_text(), "héllo✓");
	}

	#[test]
	fn empty_text_finishes_after_one_step() {
		let mut tw = Typewriter::new("", settings(false), 10.0);
		assert_eq!(tw.poll(10.0), Some(String::new()));
		assert_eq!(tw.poll(90.0), None);
		assert!(tw.is_finished());
	}
}
