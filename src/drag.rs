//! Mouse-driven dragging and column resizing.
//!
//! Both follow the pointer through ***mousemove*** listeners on the document, which last from the starting event until the next ***mouseup***.

use crate::Error;
use core::{
	cell::{Cell, RefCell},
	fmt::{self, Debug, Formatter},
	mem,
};
use js_sys::Function;
use std::rc::Rc;
use tracing::{error, trace, trace_span, warn};
use wasm_bindgen::{closure::Closure, JsCast};
use web_sys::{Document, HtmlElement, MouseEvent};

/// `data-draggable` must be set and non-empty for [`DragAndDrop::start`] to move an element.
pub const DRAGGABLE_DATA_KEY: &str = "draggable";

/// Margin subtracted from the window's outer width before [`ColumnResizer`] caps a column at a third of it.
pub const RESIZE_MARGIN_PX: f64 = 16.0;

/// Document listeners belonging to one gesture.
struct GestureListeners {
	document: Document,
	attached: RefCell<Vec<(&'static str, Function)>>,
}

impl GestureListeners {
	fn new(document: Document) -> Self {
		Self {
			document,
			attached: RefCell::default(),
		}
	}

	fn attach(&self, event_type: &'static str, listener: &Function) -> Result<(), Error> {
		self.document.add_event_listener_with_callback(event_type, listener)?;
		self.attached.borrow_mut().push((event_type, listener.clone()));
		Ok(())
	}

	fn is_attached(&self) -> bool {
		!self.attached.borrow().is_empty()
	}

	fn detach_all(&self) {
		let attached = mem::take(&mut *self.attached.borrow_mut());
		for (event_type, listener) in attached {
			if let Err(error) = self.document.remove_event_listener_with_callback(event_type, &listener) {
				error!("Failed to remove {:?} listener: {:?}", event_type, error)
			}
		}
	}
}

fn function(closure: &Closure<dyn Fn(MouseEvent)>) -> &Function {
	closure.as_ref().unchecked_ref()
}

/// Whether `target` opted into dragging through `data-draggable`.
#[must_use]
pub fn is_draggable(target: &HtmlElement) -> bool {
	target.dataset().get(DRAGGABLE_DATA_KEY).map_or(false, |value| !value.is_empty())
}

struct DragState {
	target: HtmlElement,
	offset_x: i32,
	offset_y: i32,
	listeners: GestureListeners,
}

impl DragState {
	fn follow(&self, event: &MouseEvent) -> Result<(), Error> {
		let style = self.target.style();
		style.set_property("top", &format!("{}px", event.client_y() - self.offset_y))?;
		style.set_property("left", &format!("{}px", event.client_x() - self.offset_x))?;
		Ok(())
	}
}

/// Moves an element with the mouse, keeping the grab point under the pointer.
///
/// Meant to be started from a delegated ***mousedown*** callback:
///
/// ```rust,no_run
/// use reel_dom::{add_global_event_listener, drag::DragAndDrop, ListenerOptions};
/// use std::cell::RefCell;
/// use wasm_bindgen::JsCast;
///
/// thread_local!(static DRAG: RefCell<Option<DragAndDrop>> = RefCell::new(None));
///
/// add_global_event_listener(
/// 	&["mousedown"],
/// 	&["[data-draggable]"],
/// 	|delegated| {
/// 		if let (Some(event), Some(target)) = (delegated.event.dyn_ref(), delegated.target.dyn_ref()) {
/// 			if let Ok(drag) = DragAndDrop::start(event, target) {
/// 				DRAG.with(|current| *current.borrow_mut() = drag);
/// 			}
/// 		}
/// 	},
/// 	ListenerOptions::new(),
/// 	None,
/// )
/// .unwrap()
/// .forget();
/// ```
///
/// The drag ends on the next ***mouseup*** anywhere in the document, or when this is dropped.
#[must_use = "Dropping a `DragAndDrop` ends the drag."]
pub struct DragAndDrop {
	state: Rc<DragState>,
	_on_move: Closure<dyn Fn(MouseEvent)>,
	_on_up: Closure<dyn Fn(MouseEvent)>,
}

impl Debug for DragAndDrop {
	fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
		f.debug_struct("DragAndDrop")
			.field("target", &self.state.target)
			.field("offset_x", &self.state.offset_x)
			.field("offset_y", &self.state.offset_y)
			.field("dragging", &self.is_dragging())
			.finish()
	}
}

impl DragAndDrop {
	/// Positions `target` absolutely and starts following the mouse.
	///
	/// Returns [`None`] without touching `target` unless it [is draggable](`is_draggable`).
	///
	/// # Errors
	///
	/// [`Error::NoDocument`] if `target` isn't part of a document, [`Error::Js`] if a style or listener can't be set.
	pub fn start(event: &MouseEvent, target: &HtmlElement) -> Result<Option<Self>, Error> {
		if !is_draggable(target) {
			trace!("Target is not draggable.");
			return Ok(None);
		}
		let document = target.owner_document().ok_or(Error::NoDocument)?;
		target.style().set_property("position", "absolute")?;

		let state = Rc::new(DragState {
			target: target.clone(),
			offset_x: event.client_x() - target.offset_left(),
			offset_y: event.client_y() - target.offset_top(),
			listeners: GestureListeners::new(document),
		});

		let on_move = {
			let state = Rc::clone(&state);
			Closure::wrap(Box::new(move |event: MouseEvent| {
				if let Err(error) = state.follow(&event) {
					error!("Failed to move dragged element: {}", error)
				}
			}) as Box<dyn Fn(MouseEvent)>)
		};
		let on_up = {
			let state = Rc::clone(&state);
			Closure::wrap(Box::new(move |_: MouseEvent| {
				let span = trace_span!("Drag end");
				let _enter = span.enter();
				state.listeners.detach_all();
			}) as Box<dyn Fn(MouseEvent)>)
		};

		let drag = Self {
			state,
			_on_move: on_move,
			_on_up: on_up,
		};
		// On error, dropping `drag` removes whatever was attached.
		drag.state.listeners.attach("mousemove", function(&drag._on_move))?;
		drag.state.listeners.attach("mouseup", function(&drag._on_up))?;
		trace!("Drag started.");
		Ok(Some(drag))
	}

	/// Whether the mouse hasn't been released yet.
	#[must_use]
	pub fn is_dragging(&self) -> bool {
		self.state.listeners.is_attached()
	}

	#[must_use]
	pub fn target(&self) -> &HtmlElement {
		&self.state.target
	}

	/// Lets the drag run until the next ***mouseup*** without keeping a handle.
	pub fn forget(self) {
		mem::forget(self)
	}
}

impl Drop for DragAndDrop {
	fn drop(&mut self) {
		self.state.listeners.detach_all()
	}
}

/// Parses the leading integer of a CSS length like `"240.5px"`, the way ***parseInt()*** does.
#[must_use]
pub fn parse_pixels(value: &str) -> Option<i32> {
	let value = value.trim_start();
	let digits_start = usize::from(value.starts_with('-') || value.starts_with('+'));
	let digits_end = value[digits_start..]
		.find(|c: char| !c.is_ascii_digit())
		.map_or(value.len(), |end| digits_start + end);
	if digits_end == digits_start {
		return None;
	}
	value[..digits_end].parse().ok()
}

struct ResizeState {
	parent: HtmlElement,
	window: web_sys::Window,
	start_x: Cell<i32>,
	start_width: Cell<i32>,
	max_width: Cell<Option<f64>>,
	listeners: GestureListeners,
}

impl ResizeState {
	fn computed_width(&self) -> Result<Option<i32>, Error> {
		let style = match self.window.get_computed_style(&self.parent)? {
			Some(style) => style,
			None => return Ok(None),
		};
		Ok(parse_pixels(&style.get_property_value("width")?))
	}

	fn max_width(&self) -> Result<f64, Error> {
		if let Some(max_width) = self.max_width.get() {
			return Ok(max_width);
		}
		let outer_width = self.window.outer_width()?.as_f64().unwrap_or_default();
		Ok((outer_width - RESIZE_MARGIN_PX) / 3.0)
	}

	fn start(&self, event: &MouseEvent, on_move: &Function, on_up: &Function) -> Result<(), Error> {
		self.listeners.detach_all();
		let width = match self.computed_width()? {
			Some(width) => width,
			None => {
				warn!("Column has no pixel width. Not resizing.");
				return Ok(());
			}
		};
		self.start_x.set(event.client_x());
		self.start_width.set(width);
		self.listeners.attach("mousemove", on_move)?;
		self.listeners.attach("mouseup", on_up)?;
		trace!("Resize started at {}px.", width);
		Ok(())
	}

	fn follow(&self, event: &MouseEvent) -> Result<(), Error> {
		let dx = event.client_x() - self.start_x.get();
		// A column right of the page's left edge grows towards the left.
		let width = if self.parent.get_bounding_client_rect().x() > 0.0 {
			self.start_width.get() - dx
		} else {
			self.start_width.get() + dx
		};
		if f64::from(width) <= self.max_width()? {
			self.parent.style().set_property("width", &format!("{}px", width))?;
		}
		Ok(())
	}
}

/// Resizes one of two adjacent columns by dragging a handle.
///
/// A ***dblclick*** on the handle starts resizing, the next ***mouseup*** ends it.
/// The column is never made wider than a third of the window's outer width, less [`RESIZE_MARGIN_PX`].
///
/// Dropping this detaches all of its listeners.
#[must_use = "Dropping a `ColumnResizer` detaches it. Call `.forget()` to keep it for the lifetime of the page."]
pub struct ColumnResizer {
	handle: web_sys::EventTarget,
	state: Rc<ResizeState>,
	on_start: Closure<dyn Fn(MouseEvent)>,
	_on_move: Closure<dyn Fn(MouseEvent)>,
	_on_up: Closure<dyn Fn(MouseEvent)>,
}

impl Debug for ColumnResizer {
	fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
		f.debug_struct("ColumnResizer")
			.field("parent", &self.state.parent)
			.field("handle", &self.handle)
			.field("resizing", &self.is_resizing())
			.finish()
	}
}

impl ColumnResizer {
	/// Resizes `parent` when `handle` is double-clicked and dragged.
	///
	/// # Errors
	///
	/// [`Error::NoWindow`] or [`Error::NoDocument`] outside of a browsing context, [`Error::Js`] if the listener can't be attached.
	pub fn new(parent: HtmlElement, handle: web_sys::EventTarget) -> Result<Self, Error> {
		let window = web_sys::window().ok_or(Error::NoWindow)?;
		let document = window.document().ok_or(Error::NoDocument)?;
		let state = Rc::new(ResizeState {
			parent,
			window,
			start_x: Cell::new(0),
			start_width: Cell::new(0),
			max_width: Cell::new(None),
			listeners: GestureListeners::new(document),
		});

		let on_move = {
			let state = Rc::clone(&state);
			Closure::wrap(Box::new(move |event: MouseEvent| {
				if let Err(error) = state.follow(&event) {
					error!("Failed to resize column: {}", error)
				}
			}) as Box<dyn Fn(MouseEvent)>)
		};
		let on_up = {
			let state = Rc::clone(&state);
			Closure::wrap(Box::new(move |_: MouseEvent| {
				state.listeners.detach_all();
				trace!("Resize ended.");
			}) as Box<dyn Fn(MouseEvent)>)
		};
		let on_start = {
			let state = Rc::clone(&state);
			let on_move = function(&on_move).clone();
			let on_up = function(&on_up).clone();
			Closure::wrap(Box::new(move |event: MouseEvent| {
				let span = trace_span!("Resize start");
				let _enter = span.enter();
				if let Err(error) = state.start(&event, &on_move, &on_up) {
					error!("Failed to start resizing: {}", error);
					state.listeners.detach_all();
				}
			}) as Box<dyn Fn(MouseEvent)>)
		};

		handle.add_event_listener_with_callback("dblclick", function(&on_start))?;
		Ok(Self {
			handle,
			state,
			on_start,
			_on_move: on_move,
			_on_up: on_up,
		})
	}

	/// Overrides the width cap. [`None`] restores the default based on the window.
	pub fn set_max_width(&self, max_width: Option<f64>) {
		self.state.max_width.set(max_width)
	}

	#[must_use]
	pub fn is_resizing(&self) -> bool {
		self.state.listeners.is_attached()
	}

	/// Keeps the listeners attached for the lifetime of the page.
	pub fn forget(self) {
		mem::forget(self)
	}
}

impl Drop for ColumnResizer {
	fn drop(&mut self) {
		self.state.listeners.detach_all();
		if let Err(error) = self.handle.remove_event_listener_with_callback("dblclick", function(&self.on_start)) {
			error!("Failed to remove \"dblclick\" listener: {:?}", error)
		}
	}
}

#[cfg(test)]
mod tests {
	use super::parse_pixels;

	#[test]
	fn pixels_parse_like_parse_int() {
		assert_eq!(parse_pixels("240px"), Some(240));
		assert_eq!(parse_pixels("240.75px"), Some(240));
		assert_eq!(parse_pixels("  -12px"), Some(-12));
		assert_eq!(parse_pixels("+3"), Some(3));
		assert_eq!(parse_pixels("auto"), None);
		assert_eq!(parse_pixels("-px"), None);
		assert_eq!(parse_pixels(""), None);
	}
}
