//! Typing effect bound to the DOM through `setTimeout`.

use std::cell::{Cell, RefCell};
use std::rc::Rc;

use leptos::prelude::*;
use wasm_bindgen::prelude::*;
use web_sys::{Element, HtmlElement, Window};

use super::state::{Typewriter, TypingSettings};
use crate::components::spoiler::INNER_SELECTOR;
use crate::error::SetupError;
use crate::registry::{self, EffectKind};

/// Class of the cursor element inserted after the text.
pub const CURSOR_CLASS: &str = "styled-text__cursor";

type TimerCallback = Rc<RefCell<Option<Closure<dyn FnMut()>>>>;

/// A running typing effect. Dropping it cancels the timer, removes the cursor
/// and restores the full text.
pub struct TypewriterInstance {
	window: Window,
	text: Element,
	cursor: Element,
	typewriter: Rc<RefCell<Typewriter>>,
	timer: Rc<Cell<Option<i32>>>,
	tick: TimerCallback,
}

impl TypewriterInstance {
	/// Text currently on screen.
	pub fn visible_text(&self) -> String {
		self.typewriter.borrow().visible_text()
	}
}

impl Drop for TypewriterInstance {
	fn drop(&mut self) {
		if let Some(handle) = self.timer.take() {
			self.window.clear_timeout_with_handle(handle);
		}
		self.tick.borrow_mut().take();
		self.cursor.remove();
		let full = self.typewriter.borrow().full_text();
		self.text.set_text_content(Some(&full));
	}
}

fn now_ms(window: &Window) -> f64 {
	window.performance().map(|p| p.now()).unwrap_or_default()
}

/// Bind the typing effect to a `.styled-text[data-effect="typing"]` root.
pub fn bind_typewriter(root: &HtmlElement) -> Result<TypewriterInstance, SetupError> {
	let window = web_sys::window().ok_or(SetupError::NoWindow)?;
	let document = window.document().ok_or(SetupError::NoWindow)?;
	let text = root
		.query_selector(&format!("{INNER_SELECTOR} span"))?
		.ok_or(SetupError::MissingElement(".styled-text-inner span"))?;

	let settings = TypingSettings::from_attrs(
		root.get_attribute("data-typing-speed").as_deref(),
		root.get_attribute("data-typing-delay").as_deref(),
		root.get_attribute("data-typing-loop").as_deref(),
		root.get_attribute("data-typing-cursor").as_deref(),
	);

	let cursor = document.create_element("span")?;
	cursor.set_class_name(CURSOR_CLASS);
	cursor.set_text_content(Some(&settings.cursor));
	text.insert_adjacent_element("afterend", &cursor)?;

	let full = text.text_content().unwrap_or_default();
	let typewriter = Rc::new(RefCell::new(Typewriter::new(&full, settings, now_ms(&window))));
	let timer = Rc::new(Cell::new(None));
	let tick: TimerCallback = Rc::new(RefCell::new(None));

	let (tw, timer_inner, tick_inner, text_inner, win) =
		(typewriter.clone(), timer.clone(), tick.clone(), text.clone(), window.clone());
	*tick.borrow_mut() = Some(Closure::new(move || {
		timer_inner.set(None);
		let now = now_ms(&win);
		let mut state = tw.borrow_mut();
		if let Some(visible) = state.poll(now) {
			text_inner.set_text_content(Some(&visible));
		}
		let Some(due) = state.next_due() else {
			return;
		};
		if let Some(ref cb) = *tick_inner.borrow() {
			let wait = (due - now).ceil().max(0.0) as i32;
			timer_inner.set(
				win.set_timeout_with_callback_and_timeout_and_arguments_0(cb.as_ref().unchecked_ref(), wait)
					.ok(),
			);
		}
	}));

	let instance = TypewriterInstance {
		window,
		text,
		cursor,
		typewriter,
		timer,
		tick,
	};
	// First pass starts right away.
	if let Some(ref cb) = *instance.tick.borrow() {
		let handle = instance
			.window
			.set_timeout_with_callback_and_timeout_and_arguments_0(cb.as_ref().unchecked_ref(), 0)?;
		instance.timer.set(Some(handle));
	}
	Ok(instance)
}

/// Text typed out one character at a time, optionally looping.
#[component]
pub fn TypewriterText(
	#[prop(into)] text: String,
	#[prop(optional)] settings: TypingSettings,
) -> impl IntoView {
	let root_ref = NodeRef::<leptos::html::Div>::new();
	let key = registry::next_key();

	Effect::new(move |_| {
		let Some(root) = root_ref.get() else {
			return;
		};
		registry::bind_with_key(key, root.into(), EffectKind::Typing);
	});
	on_cleanup(move || registry::release_key(key));

	let speed = settings.speed_ms.to_string();
	let delay = settings.delay_ms.to_string();
	let looped = if settings.looped { "yes" } else { "no" };
	view! {
		<div
			node_ref=root_ref
			class="styled-text"
			data-effect="typing"
			data-typing-speed=speed
			data-typing-delay=delay
			data-typing-loop=looped
			data-typing-cursor=settings.cursor
		>
			<div class="styled-text-inner">
				<span>{text}</span>
			</div>
		</div>
	}
}
