//! Click-and-hold detection.

use crate::Error;
use core::{
	cell::{Cell, RefCell},
	fmt::{self, Debug, Formatter},
	mem,
};
use std::rc::{Rc, Weak};
use tracing::{error, trace, trace_span};
use wasm_bindgen::{closure::Closure, JsCast};

/// How long a press has to last before it counts as held.
pub const HOLD_DELAY_MS: i32 = 500;

const START_EVENTS: [&str; 2] = ["mousedown", "touchstart"];
const END_EVENTS: [&str; 5] = ["mouseup", "mouseleave", "mouseout", "touchend", "touchcancel"];

#[derive(Default)]
struct HoldState {
	held: Cell<bool>,
	timeout: Cell<Option<i32>>,
	pending: RefCell<Option<Closure<dyn FnMut()>>>,
}

/// Calls back once a press on a target has lasted [`HOLD_DELAY_MS`].
///
/// A press starts with ***mousedown*** or ***touchstart*** and is cancelled by
/// ***mouseup***, ***mouseleave***, ***mouseout***, ***touchend*** or ***touchcancel***.
///
/// Dropping this detaches its listeners and cancels a pending hold.
#[must_use = "Dropping a `ClickAndHold` detaches it. Call `.forget()` to keep it for the lifetime of the page."]
pub struct ClickAndHold {
	target: web_sys::EventTarget,
	window: web_sys::Window,
	state: Rc<HoldState>,
	on_start: Closure<dyn Fn(web_sys::Event)>,
	on_end: Closure<dyn Fn(web_sys::Event)>,
}

impl Debug for ClickAndHold {
	fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
		f.debug_struct("ClickAndHold")
			.field("target", &self.target)
			.field("held", &self.state.held.get())
			.finish()
	}
}

impl ClickAndHold {
	/// # Errors
	///
	/// [`Error::NoWindow`] outside of a browsing context, [`Error::Js`] if a listener can't be attached.
	pub fn new(target: web_sys::EventTarget, callback: impl 'static + Fn(&web_sys::Event, &web_sys::EventTarget)) -> Result<Self, Error> {
		let window = web_sys::window().ok_or(Error::NoWindow)?;
		let state = Rc::new(HoldState::default());
		let callback: Rc<dyn Fn(&web_sys::Event, &web_sys::EventTarget)> = Rc::new(callback);

		let on_start = {
			let state = Rc::clone(&state);
			let window = window.clone();
			let target = target.clone();
			Closure::wrap(Box::new(move |event: web_sys::Event| {
				let span = trace_span!("Hold start", event_type = &*event.type_());
				let _enter = span.enter();

				state.held.set(true);
				cancel_pending(&window, &state);

				let timer = {
					let state = Rc::downgrade(&state);
					let callback = Rc::clone(&callback);
					let target = target.clone();
					Closure::once(move || fire(&state, &*callback, &event, &target))
				};
				match window.set_timeout_with_callback_and_timeout_and_arguments_0(timer.as_ref().unchecked_ref(), HOLD_DELAY_MS) {
					Ok(handle) => {
						state.timeout.set(Some(handle));
						*state.pending.borrow_mut() = Some(timer);
					}
					Err(error) => error!("Failed to schedule hold timeout: {:?}", error),
				}
			}) as Box<dyn Fn(web_sys::Event)>)
		};

		let on_end = {
			let state = Rc::clone(&state);
			let window = window.clone();
			Closure::wrap(Box::new(move |_: web_sys::Event| {
				state.held.set(false);
				cancel_pending(&window, &state);
			}) as Box<dyn Fn(web_sys::Event)>)
		};

		let click_and_hold = Self {
			target,
			window,
			state,
			on_start,
			on_end,
		};
		// On error, dropping `click_and_hold` removes whatever was attached.
		for event_type in &START_EVENTS {
			click_and_hold
				.target
				.add_event_listener_with_callback(event_type, click_and_hold.on_start.as_ref().unchecked_ref())?;
		}
		for event_type in &END_EVENTS {
			click_and_hold
				.target
				.add_event_listener_with_callback(event_type, click_and_hold.on_end.as_ref().unchecked_ref())?;
		}
		Ok(click_and_hold)
	}

	#[must_use]
	pub fn is_held(&self) -> bool {
		self.state.held.get()
	}

	/// Keeps the listeners attached for the lifetime of the page.
	pub fn forget(self) {
		mem::forget(self)
	}
}

impl Drop for ClickAndHold {
	fn drop(&mut self) {
		cancel_pending(&self.window, &self.state);
		for event_type in &START_EVENTS {
			if let Err(error) = self
				.target
				.remove_event_listener_with_callback(event_type, self.on_start.as_ref().unchecked_ref())
			{
				error!("Failed to remove {:?} listener: {:?}", event_type, error)
			}
		}
		for event_type in &END_EVENTS {
			if let Err(error) = self.target.remove_event_listener_with_callback(event_type, self.on_end.as_ref().unchecked_ref()) {
				error!("Failed to remove {:?} listener: {:?}", event_type, error)
			}
		}
	}
}

fn cancel_pending(window: &web_sys::Window, state: &HoldState) {
	if let Some(handle) = state.timeout.take() {
		window.clear_timeout_with_handle(handle);
		trace!("Cancelled pending hold.");
	}
	// `wasm-bindgen` defers freeing a closure that is dropped while it runs.
	drop(state.pending.borrow_mut().take());
}

fn fire(state: &Weak<HoldState>, callback: &dyn Fn(&web_sys::Event, &web_sys::EventTarget), event: &web_sys::Event, target: &web_sys::EventTarget) {
	let state = match state.upgrade() {
		Some(state) => state,
		None => return,
	};
	state.timeout.set(None);
	if state.held.get() {
		let span = trace_span!("Hold callback");
		let _enter = span.enter();
		callback(event, target)
	}
}
