//! Setup failures for widget binding.

use thiserror::Error;
use wasm_bindgen::JsValue;

/// Why a widget could not be bound. Binding failures leave the element
/// untouched; they are logged and never surface to the page.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum SetupError {
	#[error("missing element `{0}`")]
	MissingElement(&'static str),
	#[error("2d rendering context unavailable")]
	NoRenderingContext,
	#[error("no window or document")]
	NoWindow,
	#[error("javascript error: {0}")]
	Js(String),
}

impl From<JsValue> for SetupError {
	fn from(value: JsValue) -> Self {
		Self::Js(value.as_string().unwrap_or_else(|| format!("{value:?}")))
	}
}
