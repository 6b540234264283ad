//! Spoiler trigger configuration.
//!
//! Triggers come either from `data-spoiler-desktop` / `data-spoiler-mobile`
//! attributes on the widget or from JSON (demo data). Unknown values never
//! fail: they select the default mode for that device class.

use serde::Deserialize;

/// How a pointer (mouse) device reveals the text.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum DesktopTrigger {
	/// Clicking toggles the whole text.
	Click,
	/// Hover wipes locally, click toggles the whole text.
	HoverClick,
	/// Moving the pointer wipes the cloud locally.
	#[default]
	#[serde(other)]
	Hover,
}

impl DesktopTrigger {
	/// Parse an attribute value; anything unknown is [`DesktopTrigger::Hover`].
	pub fn from_attr(value: &str) -> Self {
		match value.trim() {
			"click" => Self::Click,
			"hover-click" => Self::HoverClick,
			_ => Self::Hover,
		}
	}

	/// Attribute spelling.
	pub fn as_str(self) -> &'static str {
		match self {
			Self::Hover => "hover",
			Self::Click => "click",
			Self::HoverClick => "hover-click",
		}
	}
}

/// How a touch device reveals the text.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum MobileTrigger {
	/// Dragging a finger wipes the cloud locally.
	Hover,
	/// Dragging wipes locally, tapping toggles the whole text.
	HoverClick,
	/// Tapping toggles the whole text.
	#[default]
	#[serde(other)]
	Tap,
}

impl MobileTrigger {
	/// Parse an attribute value; anything unknown is [`MobileTrigger::Tap`].
	pub fn from_attr(value: &str) -> Self {
		match value.trim() {
			"hover" => Self::Hover,
			"hover-click" => Self::HoverClick,
			_ => Self::Tap,
		}
	}

	/// Attribute spelling.
	pub fn as_str(self) -> &'static str {
		match self {
			Self::Hover => "hover",
			Self::HoverClick => "hover-click",
			Self::Tap => "tap",
		}
	}
}

/// Trigger modes for both device classes.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct SpoilerSettings {
	/// Trigger on pointer devices.
	pub desktop: DesktopTrigger,
	/// Trigger on touch devices.
	pub mobile: MobileTrigger,
}

impl SpoilerSettings {
	/// Build from raw attribute values; missing attributes use the defaults.
	pub fn from_attrs(desktop: Option<&str>, mobile: Option<&str>) -> Self {
		Self {
			desktop: desktop.map(DesktopTrigger::from_attr).unwrap_or_default(),
			mobile: mobile.map(MobileTrigger::from_attr).unwrap_or_default(),
		}
	}
}
