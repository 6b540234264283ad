//! Typewriter passes on a simulated clock, stepping exactly when due.

use pretty_assertions::assert_eq;
use styled_text::{Typewriter, TypingSettings};

/// Poll at every due time until `until`, collecting what would be displayed.
fn run(tw: &mut Typewriter, until: f64) -> Vec<(f64, String)> {
	let mut shown = Vec::new();
	while let Some(due) = tw.next_due() {
		if due > until {
			break;
		}
		if let Some(text) = tw.poll(due) {
			shown.push((due, text));
		}
	}
	shown
}

#[test]
fn single_pass_types_then_stops() {
	let mut tw = Typewriter::new("Hello", TypingSettings::default(), 0.0);
	let shown = run(&mut tw, 10_000.0);

	let texts: Vec<&str> = shown.iter().map(|(_, t)| t.as_str()).collect();
	assert_eq!(texts, vec!["", "H", "He", "Hel", "Hell", "Hello"]);
	assert_eq!(shown[4].0, 320.0);
	assert!(tw.is_finished());
	assert_eq!(tw.poll(20_000.0), None);
}

#[test]
fn looped_pass_restarts_from_empty_after_delay() {
	let settings = TypingSettings {
		speed_ms: 50,
		delay_ms: 500,
		looped: true,
		..TypingSettings::default()
	};
	let mut tw = Typewriter::new("abc", settings, 100.0);
	let shown = run(&mut tw, 1000.0);

	// Pass 1 at 100..250, end step at 300, pause until 800, pass 2 from 800,
	// its end step at 1000 schedules the next pause.
	let expected: Vec<(f64, String)> = [
		(100.0, ""),
		(150.0, "a"),
		(200.0, "ab"),
		(250.0, "abc"),
		(800.0, ""),
		(850.0, "a"),
		(900.0, "ab"),
		(950.0, "abc"),
	]
	.into_iter()
	.map(|(t, s)| (t, s.to_string()))
	.collect();
	assert_eq!(shown, expected);
	assert!(!tw.is_finished());
	assert_eq!(tw.next_due(), Some(1500.0));
}

#[test]
fn late_poll_catches_up_without_skipping_the_end() {
	let mut tw = Typewriter::new("Hello", TypingSettings::default(), 0.0);
	assert_eq!(tw.poll(10_000.0).as_deref(), Some("Hello"));
	assert!(tw.is_finished());
}
