//! `web-sys` implementations of the host boundary traits.

use std::cell::RefCell;
use std::rc::Rc;

use log::warn;
use wasm_bindgen::prelude::*;
use wasm_bindgen::{Clamped, JsCast};
use web_sys::{
	CanvasRenderingContext2d, CssStyleDeclaration, Document, Element, HtmlCanvasElement, HtmlElement,
	ImageData, Window,
};

use super::field::ParticleKind;
use super::geometry::TextBox;
use super::host::{
	FrameHandle, FrameScheduler, Layout, LayoutSource, SpoilerStyle, Surface, VisualHints,
	font_metrics,
};
use super::interaction::DeviceClass;
use super::sprite::{Sprite, SpriteSet};
use crate::error::SetupError;

/// Class of the canvas inserted into the inner container.
pub const CANVAS_CLASS: &str = "styled-text-spoiler-canvas";
/// Class toggled on the inner container while the text is shown.
pub const REVEALED_CLASS: &str = "is-revealed";

const TOUCH_QUERY: &str = "(hover: none), (pointer: coarse)";

fn computed_style(el: &Element) -> Option<CssStyleDeclaration> {
	web_sys::window()?.get_computed_style(el).ok().flatten()
}

fn property(style: Option<&CssStyleDeclaration>, name: &str) -> String {
	style
		.and_then(|s| s.get_property_value(name).ok())
		.unwrap_or_default()
}

/// Milliseconds from the page's high-resolution clock.
pub fn now_ms() -> f64 {
	web_sys::window()
		.and_then(|w| w.performance())
		.map(|p| p.now())
		.unwrap_or_default()
}

/// Touch when the device cannot hover or has a coarse pointer.
pub fn detect_device(window: &Window) -> DeviceClass {
	let touch = window
		.match_media(TOUCH_QUERY)
		.ok()
		.flatten()
		.is_some_and(|q| q.matches());
	if touch { DeviceClass::Touch } else { DeviceClass::Pointer }
}

/// Seed for the particle field from the host random source.
pub fn random_seed() -> u64 {
	(js_sys::Math::random() * u64::MAX as f64) as u64
}

/// Reads geometry from the widget root, its inner container and text span.
pub struct DomHost {
	root: HtmlElement,
	inner: HtmlElement,
	text: HtmlElement,
}

impl DomHost {
	/// Read layout from `inner` and `text`, style from `root`.
	pub fn new(root: HtmlElement, inner: HtmlElement, text: HtmlElement) -> Self {
		Self { root, inner, text }
	}
}

impl LayoutSource for DomHost {
	fn layout(&self) -> Layout {
		let outer = self.inner.get_bounding_client_rect();
		let content = self.text.text_content().unwrap_or_default();
		let text = (!content.trim().is_empty()).then(|| {
			let rect = self.text.get_bounding_client_rect();
			let style = computed_style(&self.root);
			let (font_size, line_height) = font_metrics(
				&property(style.as_ref(), "font-size"),
				&property(style.as_ref(), "line-height"),
			);
			TextBox {
				x: rect.left() - outer.left(),
				y: rect.top() - outer.top(),
				width: rect.width(),
				height: rect.height(),
				font_size,
				line_height,
			}
		});
		Layout {
			width: outer.width(),
			height: outer.height(),
			text,
		}
	}

	fn style(&self) -> SpoilerStyle {
		let style = computed_style(&self.root);
		SpoilerStyle::from_css(
			&property(style.as_ref(), "--spoiler-color"),
			&property(style.as_ref(), "--spoiler-opacity"),
		)
	}
}

/// Canvas-backed render surface. Sprites live on small offscreen canvases.
pub struct CanvasSurface {
	document: Document,
	canvas: HtmlCanvasElement,
	ctx: CanvasRenderingContext2d,
	sprites: Vec<HtmlCanvasElement>,
}

impl CanvasSurface {
	/// Wrap `canvas`; fails when no 2D context is available.
	pub fn new(document: Document, canvas: HtmlCanvasElement) -> Result<Self, SetupError> {
		let ctx = context_2d(&canvas)?;
		Ok(Self {
			document,
			canvas,
			ctx,
			sprites: Vec::new(),
		})
	}

	fn upload(&self, sprite: &Sprite) -> Result<HtmlCanvasElement, SetupError> {
		let canvas: HtmlCanvasElement = self
			.document
			.create_element("canvas")?
			.dyn_into()
			.map_err(|_| SetupError::NoRenderingContext)?;
		canvas.set_width(sprite.width);
		canvas.set_height(sprite.height);
		let data = ImageData::new_with_u8_clamped_array_and_sh(
			Clamped(&sprite.pixels),
			sprite.width,
			sprite.height,
		)?;
		context_2d(&canvas)?.put_image_data(&data, 0.0, 0.0)?;
		Ok(canvas)
	}
}

fn context_2d(canvas: &HtmlCanvasElement) -> Result<CanvasRenderingContext2d, SetupError> {
	canvas
		.get_context("2d")?
		.ok_or(SetupError::NoRenderingContext)?
		.dyn_into()
		.map_err(|_| SetupError::NoRenderingContext)
}

impl Surface for CanvasSurface {
	fn resize(&mut self, width: f64, height: f64, dpr: f64) {
		self.canvas.set_width((width * dpr).ceil() as u32);
		self.canvas.set_height((height * dpr).ceil() as u32);
		let style = self.canvas.style();
		let _ = style.set_property("width", &format!("{width}px"));
		let _ = style.set_property("height", &format!("{height}px"));
		let _ = self.ctx.set_transform(dpr, 0.0, 0.0, dpr, 0.0, 0.0);
		self.ctx.set_image_smoothing_enabled(false);
	}

	fn clear(&mut self, width: f64, height: f64) {
		self.ctx.set_global_alpha(1.0);
		self.ctx.clear_rect(0.0, 0.0, width, height);
	}

	fn load_sprites(&mut self, sprites: &SpriteSet) {
		let uploaded: Result<Vec<_>, _> = sprites.iter().map(|(_, s)| self.upload(s)).collect();
		match uploaded {
			Ok(canvases) => self.sprites = canvases,
			Err(e) => {
				warn!("styled-text: sprite upload failed: {}", e);
				self.sprites.clear();
			}
		}
	}

	fn draw_sprite(&mut self, kind: ParticleKind, x: f64, y: f64, w: f64, h: f64, alpha: f64) {
		let Some(sprite) = self.sprites.get(kind.index()) else {
			return;
		};
		self.ctx.set_global_alpha(alpha);
		let _ = self.ctx.draw_image_with_html_canvas_element_and_dw_and_dh(sprite, x, y, w, h);
	}
}

/// Publishes the spotlight as CSS variables and the revealed flag as a class.
pub struct DomHints {
	inner: HtmlElement,
	text: HtmlElement,
}

impl DomHints {
	/// Publish hints on `inner`, positioned relative to `text`.
	pub fn new(inner: HtmlElement, text: HtmlElement) -> Self {
		Self { inner, text }
	}
}

impl VisualHints for DomHints {
	fn set_spotlight(&mut self, x: f64, y: f64, radius: f64, enabled: bool) {
		let style = self.inner.style();
		if !enabled {
			let _ = style.set_property("--spoiler-spot-r", "0px");
			return;
		}
		// Incoming coordinates are container-local; the variables are
		// relative to the text span.
		let outer = self.inner.get_bounding_client_rect();
		let text = self.text.get_bounding_client_rect();
		let sx = x - (text.left() - outer.left());
		let sy = y - (text.top() - outer.top());
		let _ = style.set_property("--spoiler-spot-x", &format!("{sx}px"));
		let _ = style.set_property("--spoiler-spot-y", &format!("{sy}px"));
		let _ = style.set_property("--spoiler-spot-r", &format!("{radius}px"));
	}

	fn set_revealed(&mut self, revealed: bool) {
		let _ = self.inner.class_list().toggle_with_force(REVEALED_CLASS, revealed);
	}
}

/// Frame callback slot shared between the scheduler and the callback itself.
pub type FrameCallback = Rc<RefCell<Option<Closure<dyn FnMut()>>>>;

/// `requestAnimationFrame` scheduler driving a shared callback.
pub struct RafScheduler {
	window: Window,
	callback: FrameCallback,
}

impl RafScheduler {
	/// Schedule `callback` on `window` refreshes.
	pub fn new(window: Window, callback: FrameCallback) -> Self {
		Self { window, callback }
	}
}

impl FrameScheduler for RafScheduler {
	fn request(&mut self) -> Option<FrameHandle> {
		let slot = self.callback.borrow();
		let cb = slot.as_ref()?;
		self.window
			.request_animation_frame(cb.as_ref().unchecked_ref())
			.ok()
			.map(FrameHandle)
	}

	fn cancel(&mut self, handle: FrameHandle) {
		let _ = self.window.cancel_animation_frame(handle.0);
	}
}
