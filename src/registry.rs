//! Widget registry and the page-level entry points.
//!
//! Each widget element is bound at most once. Bindings are keyed by a
//! numeric id so that Leptos cleanup hooks (which must be `Send`) can release
//! them without holding on to DOM handles.

use std::cell::RefCell;

use log::{info, warn};
use serde::Deserialize;
use wasm_bindgen::prelude::*;
use web_sys::{Element, HtmlElement, Node};

use crate::components::spoiler::{SpoilerInstance, bind_spoiler};
use crate::components::typewriter::{TypewriterInstance, bind_typewriter};
use crate::error::SetupError;

/// Which effect a widget root carries (`data-effect`).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EffectKind {
	/// Particle cloud, revealed on hover or tap.
	Spoiler,
	/// Typewriter.
	Typing,
}

impl EffectKind {
	/// Every kind, in binding order.
	pub const ALL: [EffectKind; 2] = [EffectKind::Spoiler, EffectKind::Typing];

	/// Value of `data-effect` for this kind.
	pub fn as_str(self) -> &'static str {
		match self {
			Self::Spoiler => "spoiler",
			Self::Typing => "typing",
		}
	}

	/// CSS selector matching widget roots of this kind.
	pub fn selector(self) -> &'static str {
		match self {
			Self::Spoiler => r#".styled-text[data-effect="spoiler"]"#,
			Self::Typing => r#".styled-text[data-effect="typing"]"#,
		}
	}
}

struct Entry<E, W> {
	key: u64,
	element: E,
	widget: W,
}

/// Bound widgets, at most one per element.
pub struct Registry<E, W> {
	entries: Vec<Entry<E, W>>,
	next_key: u64,
}

impl<E, W> Default for Registry<E, W> {
	fn default() -> Self {
		Self {
			entries: Vec::new(),
			next_key: 1,
		}
	}
}

impl<E: PartialEq, W> Registry<E, W> {
	/// Allocate a fresh binding key.
	pub fn next_key(&mut self) -> u64 {
		let key = self.next_key;
		self.next_key += 1;
		key
	}

	/// Whether `element` is bound.
	pub fn contains(&self, element: &E) -> bool {
		self.entries.iter().any(|e| e.element == *element)
	}

	/// Register `widget` for `element`. Returns the widget back when the
	/// element is already bound.
	pub fn insert(&mut self, key: u64, element: E, widget: W) -> Result<(), W> {
		if self.contains(&element) {
			return Err(widget);
		}
		self.entries.push(Entry { key, element, widget });
		Ok(())
	}

	/// Remove the binding under `key`, returning its widget.
	pub fn remove_key(&mut self, key: u64) -> Option<W> {
		let idx = self.entries.iter().position(|e| e.key == key)?;
		Some(self.entries.swap_remove(idx).widget)
	}

	/// Remove every binding whose element satisfies `pred`.
	pub fn drain_matching(&mut self, pred: impl Fn(&E) -> bool) -> Vec<W> {
		let (gone, kept) = std::mem::take(&mut self.entries)
			.into_iter()
			.partition::<Vec<_>, _>(|e| pred(&e.element));
		self.entries = kept;
		gone.into_iter().map(|e| e.widget).collect()
	}

	/// Number of bindings.
	pub fn len(&self) -> usize {
		self.entries.len()
	}

	/// Whether nothing is bound.
	pub fn is_empty(&self) -> bool {
		self.entries.is_empty()
	}
}

/// A live binding; dropping it tears the effect down.
enum Widget {
	Spoiler(SpoilerInstance),
	Typing(TypewriterInstance),
}

impl Widget {
	fn summary(&self) -> String {
		match self {
			Self::Spoiler(s) => format!(
				"spoiler ({} particles, revealed: {})",
				s.particle_count(),
				s.is_revealed()
			),
			Self::Typing(t) => format!("typing ({:?})", t.visible_text()),
		}
	}
}

thread_local! {
	static REGISTRY: RefCell<Registry<Element, Widget>> = RefCell::new(Registry::default());
}

/// Allocate a binding key.
pub fn next_key() -> u64 {
	REGISTRY.with_borrow_mut(|r| r.next_key())
}

fn bind(kind: EffectKind, root: &HtmlElement) -> Result<Widget, SetupError> {
	Ok(match kind {
		EffectKind::Spoiler => Widget::Spoiler(bind_spoiler(root)?),
		EffectKind::Typing => Widget::Typing(bind_typewriter(root)?),
	})
}

/// Bind `root` under `key` unless it is already bound. Setup failures are
/// logged and leave the element untouched.
pub fn bind_with_key(key: u64, root: HtmlElement, kind: EffectKind) -> bool {
	let element: Element = root.clone().into();
	if REGISTRY.with_borrow(|r| r.contains(&element)) {
		return false;
	}
	match bind(kind, &root) {
		// A duplicate comes back out of the closure and drops after the borrow.
		Ok(widget) => match REGISTRY.with_borrow_mut(|r| r.insert(key, element, widget)) {
			Ok(()) => {
				info!("styled-text: bound {} widget", kind.as_str());
				true
			}
			Err(_) => false,
		},
		Err(e) => {
			warn!("styled-text: {} setup aborted: {}", kind.as_str(), e);
			false
		}
	}
}

/// Release the binding registered under `key`, if any.
pub fn release_key(key: u64) {
	if let Some(widget) = REGISTRY.with_borrow_mut(|r| r.remove_key(key)) {
		info!("styled-text: released {}", widget.summary());
	}
}

fn widget_roots(scope: &Element, kind: EffectKind) -> Vec<HtmlElement> {
	let Ok(list) = scope.query_selector_all(kind.selector()) else {
		return Vec::new();
	};
	(0..list.length())
		.filter_map(|i| list.item(i))
		.filter_map(|node| node.dyn_into::<HtmlElement>().ok())
		.collect()
}

/// Bind every spoiler and typing widget inside `scope`. Elements that are
/// already bound are skipped. Returns the number of new bindings.
#[wasm_bindgen]
pub fn init_styled_text(scope: &Element) -> usize {
	crate::init_logging();
	let mut bound = 0;
	for kind in EffectKind::ALL {
		for root in widget_roots(scope, kind) {
			if bind_with_key(next_key(), root, kind) {
				bound += 1;
			}
		}
	}
	bound
}

/// Release every binding on `scope` or inside it. Returns how many were
/// released.
#[wasm_bindgen]
pub fn teardown_styled_text(scope: &Element) -> usize {
	let released = REGISTRY.with_borrow_mut(|r| {
		r.drain_matching(|el| {
			let node: &Node = el;
			scope.contains(Some(node))
		})
	});
	for widget in &released {
		info!("styled-text: released {}", widget.summary());
	}
	released.len()
}
