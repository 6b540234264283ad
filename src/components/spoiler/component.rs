//! Binding of one spoiler widget to the DOM, and its Leptos wrapper.
//!
//! [`bind_spoiler`] inserts the canvas, builds the per-instance runtime and
//! wires up the gestures selected for this device. The runtime sits in an
//! `Rc<RefCell<_>>` shared by the frame callback, the event listeners and the
//! resize observer. Dropping the returned [`SpoilerInstance`] tears all of it
//! down again.

use std::cell::RefCell;
use std::rc::Rc;

use leptos::prelude::*;
use log::{debug, info};
use wasm_bindgen::prelude::*;
use web_sys::{
	Event, EventTarget, HtmlCanvasElement, HtmlElement, MouseEvent, ResizeObserver, TouchEvent, Window,
};

use super::dom::{
	CANVAS_CLASS, CanvasSurface, DomHints, DomHost, FrameCallback, RafScheduler, detect_device, now_ms,
	random_seed,
};
use super::host::{LayoutSource, VisualHints};
use super::interaction::{Bindings, Controller, InteractionEvent};
use super::settings::SpoilerSettings;
use super::simulation;
use super::state::SimulationState;
use super::tuning::SpoilerTuning;
use crate::error::SetupError;
use crate::registry::{self, EffectKind};

/// Selector of the inner container inside a widget root.
pub const INNER_SELECTOR: &str = ".styled-text-inner";

/// Everything the frame loop and the event handlers share.
struct Runtime {
	state: SimulationState,
	host: DomHost,
	surface: CanvasSurface,
	hints: DomHints,
	frames: RafScheduler,
	controller: Controller,
	inner: HtmlElement,
}

impl Runtime {
	fn dispatch(&mut self, event: InteractionEvent) -> bool {
		self.controller
			.handle(&mut self.state, event, now_ms(), &mut self.hints, &mut self.frames)
	}

	/// Viewport coordinates to inner-container coordinates.
	fn local(&self, client_x: i32, client_y: i32) -> (f64, f64) {
		let rect = self.inner.get_bounding_client_rect();
		(client_x as f64 - rect.left(), client_y as f64 - rect.top())
	}

	fn sync_layout(&mut self) {
		let layout = self.host.layout();
		self.state.sync_layout(&layout, &mut self.surface);
	}
}

/// DOM event listener that unregisters itself when dropped.
struct Listener {
	target: EventTarget,
	kind: &'static str,
	callback: Closure<dyn FnMut(Event)>,
}

impl Listener {
	fn attach(
		target: &EventTarget,
		kind: &'static str,
		handler: impl FnMut(Event) + 'static,
	) -> Result<Self, SetupError> {
		let callback = Closure::<dyn FnMut(Event)>::new(handler);
		target.add_event_listener_with_callback(kind, callback.as_ref().unchecked_ref())?;
		Ok(Self {
			target: target.clone(),
			kind,
			callback,
		})
	}
}

impl Drop for Listener {
	fn drop(&mut self) {
		let _ = self
			.target
			.remove_event_listener_with_callback(self.kind, self.callback.as_ref().unchecked_ref());
	}
}

/// Layout change notification, chosen once at bind time.
enum ResizeWatch {
	Observer {
		observer: ResizeObserver,
		_callback: Closure<dyn FnMut()>,
	},
	Window {
		_listener: Listener,
	},
}

/// A bound spoiler. Dropping it stops the loop and releases every DOM hook.
pub struct SpoilerInstance {
	runtime: Rc<RefCell<Runtime>>,
	frame: FrameCallback,
	listeners: Vec<Listener>,
	resize: Option<ResizeWatch>,
	canvas: HtmlCanvasElement,
}

impl SpoilerInstance {
	/// Whether the whole text is currently shown.
	pub fn is_revealed(&self) -> bool {
		self.runtime.borrow().state.is_revealed()
	}

	/// Number of live particles.
	pub fn particle_count(&self) -> usize {
		self.runtime.borrow().state.field.len()
	}

	/// Gestures wired up at bind time.
	pub fn bindings(&self) -> Bindings {
		self.runtime.borrow().controller.bindings()
	}
}

impl Drop for SpoilerInstance {
	fn drop(&mut self) {
		if let Ok(mut guard) = self.runtime.try_borrow_mut() {
			let r = &mut *guard;
			r.state.stop(&mut r.frames);
			r.hints.set_spotlight(0.0, 0.0, 0.0, false);
			r.hints.set_revealed(false);
		}
		self.listeners.clear();
		if let Some(ResizeWatch::Observer { observer, .. }) = &self.resize {
			observer.disconnect();
		}
		// Breaks the frame closure <-> runtime cycle.
		self.frame.borrow_mut().take();
		self.canvas.remove();
	}
}

fn find(parent: &HtmlElement, selector: &'static str) -> Result<HtmlElement, SetupError> {
	parent
		.query_selector(selector)?
		.and_then(|el| el.dyn_into::<HtmlElement>().ok())
		.ok_or(SetupError::MissingElement(selector))
}

fn has_resize_observer(window: &Window) -> bool {
	js_sys::Reflect::has(window, &JsValue::from_str("ResizeObserver")).unwrap_or(false)
}

/// Wire one event kind on `target` to the controller. `map` translates the
/// DOM event; `None` drops it.
fn listen<M>(
	target: &EventTarget,
	kind: &'static str,
	runtime: &Rc<RefCell<Runtime>>,
	map: M,
) -> Result<Listener, SetupError>
where
	M: Fn(&Runtime, &Event) -> Option<InteractionEvent> + 'static,
{
	let runtime = runtime.clone();
	Listener::attach(target, kind, move |ev: Event| {
		let mut r = runtime.borrow_mut();
		let Some(input) = map(&*r, &ev) else {
			return;
		};
		if r.dispatch(input) && input == InteractionEvent::Click {
			ev.prevent_default();
		}
	})
}

fn first_touch(r: &Runtime, ev: &Event) -> Option<(f64, f64)> {
	let touch = ev.dyn_ref::<TouchEvent>()?.touches().get(0)?;
	Some(r.local(touch.client_x(), touch.client_y()))
}

fn attach_gestures(
	root: &HtmlElement,
	bindings: Bindings,
	runtime: &Rc<RefCell<Runtime>>,
) -> Result<Vec<Listener>, SetupError> {
	let target: &EventTarget = root.as_ref();
	let mut listeners = Vec::new();

	if bindings.hover_ink {
		listeners.push(listen(target, "mousemove", runtime, |r, ev| {
			let ev = ev.dyn_ref::<MouseEvent>()?;
			let (x, y) = r.local(ev.client_x(), ev.client_y());
			Some(InteractionEvent::PointerMove { x, y })
		})?);
		listeners.push(listen(target, "mouseleave", runtime, |_, _| {
			Some(InteractionEvent::PointerLeave)
		})?);
	}

	if bindings.touch_ink {
		listeners.push(listen(target, "touchstart", runtime, |r, ev| {
			first_touch(r, ev).map(|(x, y)| InteractionEvent::TouchStart { x, y })
		})?);
		listeners.push(listen(target, "touchmove", runtime, |r, ev| {
			first_touch(r, ev).map(|(x, y)| InteractionEvent::TouchMove { x, y })
		})?);
		listeners.push(listen(target, "touchend", runtime, |_, _| {
			Some(InteractionEvent::TouchEnd)
		})?);
	}

	if bindings.click_toggle {
		listeners.push(listen(target, "click", runtime, |_, _| Some(InteractionEvent::Click))?);
	}

	Ok(listeners)
}

fn watch_resize(
	window: &Window,
	inner: &HtmlElement,
	runtime: &Rc<RefCell<Runtime>>,
) -> Result<ResizeWatch, SetupError> {
	if has_resize_observer(window) {
		let rt = runtime.clone();
		let callback = Closure::<dyn FnMut()>::new(move || rt.borrow_mut().sync_layout());
		let observer = ResizeObserver::new(callback.as_ref().unchecked_ref())?;
		observer.observe(inner);
		return Ok(ResizeWatch::Observer {
			observer,
			_callback: callback,
		});
	}

	info!("styled-text: ResizeObserver unavailable, falling back to window resize");
	let rt = runtime.clone();
	let listener = Listener::attach(window.as_ref(), "resize", move |_| rt.borrow_mut().sync_layout())?;
	Ok(ResizeWatch::Window { _listener: listener })
}

/// Bind the spoiler effect to a `.styled-text[data-effect="spoiler"]` root.
pub fn bind_spoiler(root: &HtmlElement) -> Result<SpoilerInstance, SetupError> {
	let window = web_sys::window().ok_or(SetupError::NoWindow)?;
	let document = window.document().ok_or(SetupError::NoWindow)?;
	let inner = find(root, INNER_SELECTOR)?;
	let text = find(&inner, "span")?;

	let canvas: HtmlCanvasElement = document
		.create_element("canvas")?
		.dyn_into()
		.map_err(|_| SetupError::NoRenderingContext)?;
	canvas.set_class_name(CANVAS_CLASS);
	let surface = CanvasSurface::new(document, canvas.clone())?;
	inner.append_child(&canvas)?;

	let settings = SpoilerSettings::from_attrs(
		root.get_attribute("data-spoiler-desktop").as_deref(),
		root.get_attribute("data-spoiler-mobile").as_deref(),
	);
	let device = detect_device(&window);
	let bindings = Bindings::select(device, &settings);
	debug!("styled-text: spoiler bindings {:?} for {:?}", bindings, device);

	let frame: FrameCallback = Rc::new(RefCell::new(None));
	let runtime = Rc::new(RefCell::new(Runtime {
		state: SimulationState::new(SpoilerTuning::default(), window.device_pixel_ratio(), random_seed()),
		host: DomHost::new(root.clone(), inner.clone(), text.clone()),
		surface,
		hints: DomHints::new(inner.clone(), text),
		frames: RafScheduler::new(window.clone(), frame.clone()),
		controller: Controller::new(bindings),
		inner: inner.clone(),
	}));

	let rt = runtime.clone();
	*frame.borrow_mut() = Some(Closure::new(move || {
		let mut guard = rt.borrow_mut();
		let r = &mut *guard;
		simulation::frame(&mut r.state, now_ms(), &r.host, &mut r.surface, &mut r.frames);
	}));

	// From here on a failure drops the instance, which undoes the setup.
	let mut instance = SpoilerInstance {
		runtime: runtime.clone(),
		frame,
		listeners: Vec::new(),
		resize: None,
		canvas,
	};
	instance.resize = Some(watch_resize(&window, &inner, &runtime)?);
	instance.listeners = attach_gestures(root, bindings, &runtime)?;

	{
		let mut guard = runtime.borrow_mut();
		let r = &mut *guard;
		r.sync_layout();
		r.state.start(now_ms(), &mut r.frames);
	}

	Ok(instance)
}

/// Text obscured by an animated particle cloud until the user reveals it.
///
/// Renders the widget markup and binds it through the registry on mount, so
/// it behaves exactly like a server-rendered widget picked up by
/// `init_styled_text`.
#[component]
pub fn SpoilerText(
	#[prop(into)] text: String,
	#[prop(optional)] settings: SpoilerSettings,
) -> impl IntoView {
	let root_ref = NodeRef::<leptos::html::Div>::new();
	let key = registry::next_key();

	Effect::new(move |_| {
		let Some(root) = root_ref.get() else {
			return;
		};
		registry::bind_with_key(key, root.into(), EffectKind::Spoiler);
	});
	on_cleanup(move || registry::release_key(key));

	let (desktop, mobile) = (settings.desktop.as_str(), settings.mobile.as_str());
	view! {
		<div
			node_ref=root_ref
			class="styled-text"
			data-effect="spoiler"
			data-spoiler-desktop=desktop
			data-spoiler-mobile=mobile
		>
			<div class="styled-text-inner">
				<span>{text}</span>
			</div>
		</div>
	}
}
