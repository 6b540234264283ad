//! styled-text: "invisible ink" spoiler and typewriter effects for text widgets.
//!
//! Page-builder widgets are bound with [`init_styled_text`] and released with
//! [`teardown_styled_text`]; Leptos apps can use [`SpoilerText`] and
//! [`TypewriterText`] directly. The demo [`App`] renders a list of widgets read
//! from the page.

use std::sync::Once;

use leptos::prelude::*;
use leptos_meta::*;
use log::{Level, info, warn};
use serde::Deserialize;
use wasm_bindgen::JsCast;
use web_sys::{HtmlScriptElement, Window};

pub mod components;
pub mod error;
pub mod registry;

pub use components::spoiler::{SpoilerInstance, SpoilerSettings, SpoilerText, bind_spoiler};
pub use components::typewriter::{Typewriter, TypewriterInstance, TypewriterText, TypingSettings, bind_typewriter};
pub use error::SetupError;
pub use registry::{EffectKind, init_styled_text, teardown_styled_text};

static LOGGING: Once = Once::new();

/// Initialize logging and panic hooks for the WASM target. Safe to call more
/// than once.
pub fn init_logging() {
	LOGGING.call_once(|| {
		let _ = console_log::init_with_level(Level::Debug);
		console_error_panic_hook::set_once();
		info!("styled-text: logging initialized");
	});
}

/// One widget of the demo page.
#[derive(Clone, Debug, PartialEq, Deserialize)]
pub struct DemoWidget {
	/// Effect to render.
	pub effect: EffectKind,
	/// Text content of the widget.
	pub text: String,
	#[serde(default)]
	pub spoiler: SpoilerSettings,
	#[serde(default)]
	pub typing: TypingSettings,
}

/// Demo page content.
#[derive(Clone, Debug, Default, PartialEq, Deserialize)]
pub struct DemoData {
	#[serde(default)]
	/// Page heading; defaults to "Styled Text".
	pub title: Option<String>,
	pub widgets: Vec<DemoWidget>,
}

/// Load demo widgets from a script element with id="styled-text-data".
/// Expected format: JSON with { title?, widgets: [{ effect, text, spoiler?, typing? }] }
fn load_demo_data() -> Option<DemoData> {
	let window: Window = web_sys::window()?;
	let document = window.document()?;
	let element = document.get_element_by_id("styled-text-data")?;
	let script: HtmlScriptElement = element.dyn_into().ok()?;
	let json_text = script.text().ok()?;

	match serde_json::from_str::<DemoData>(&json_text) {
		Ok(data) => {
			info!("styled-text: loaded {} demo widgets", data.widgets.len());
			Some(data)
		}
		Err(e) => {
			warn!("styled-text: failed to parse demo data: {}", e);
			None
		}
	}
}

/// Main application component.
/// Loads widget definitions from the DOM and renders each effect.
#[component]
pub fn App() -> impl IntoView {
	provide_meta_context();

	let data = load_demo_data().unwrap_or_default();
	let title = data.title.unwrap_or_else(|| "Styled Text".to_string());
	let widgets = data
		.widgets
		.into_iter()
		.map(|w| match w.effect {
			EffectKind::Spoiler => view! { <SpoilerText text=w.text settings=w.spoiler /> }.into_any(),
			EffectKind::Typing => view! { <TypewriterText text=w.text settings=w.typing /> }.into_any(),
		})
		.collect_view();

	view! {
		<Html attr:lang="en" attr:dir="ltr" />
		<Title text=title.clone() />
		<Meta charset="UTF-8" />
		<Meta name="viewport" content="width=device-width, initial-scale=1.0" />

		<main class="styled-text-demo">
			<h1>{title}</h1>
			<p class="subtitle">"Hover or tap the clouded lines to read them."</p>
			{widgets}
		</main>
	}
}

#[cfg(test)]
mod tests {
	use pretty_assertions::assert_eq;

	use super::*;
	use crate::components::spoiler::DesktopTrigger;

	#[test]
	fn demo_data_parses_with_defaults() {
		let json = r#"{
			"widgets": [
				{ "effect": "spoiler", "text": "Secret", "spoiler": { "desktop": "click" } },
				{ "effect": "typing", "text": "Hello", "typing": { "speed_ms": 50, "loop": true } }
			]
		}"#;
		let data: DemoData = serde_json::from_str(json).unwrap();
		assert_eq!(data.title, None);
		assert_eq!(data.widgets.len(), 2);
		assert_eq!(data.widgets[0].spoiler.desktop, DesktopTrigger::Click);
		assert_eq!(data.widgets[0].typing, TypingSettings::default());
		assert_eq!(data.widgets[1].effect, EffectKind::Typing);
		assert_eq!(data.widgets[1].typing.speed_ms, 50);
		assert!(data.widgets[1].typing.looped);
	}

	#[test]
	fn unknown_effect_is_rejected() {
		let json = r#"{ "widgets": [{ "effect": "marquee", "text": "x" }] }"#;
		assert!(serde_json::from_str::<DemoData>(json).is_err());
	}
}
