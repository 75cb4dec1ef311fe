//! Delegated event listeners.
//!
//! Instead of attaching a listener to each matching element, one listener per (event type, selector) pair is attached to a root
//! [***EventTarget***](https://developer.mozilla.org/en-US/docs/Web/API/EventTarget) (usually the document),
//! and the event's original [***target***](https://developer.mozilla.org/en-US/docs/Web/API/Event/target) is tested against the selector
//! with [***Element.matches()***](https://developer.mozilla.org/en-US/docs/Web/API/Element/matches) at dispatch time.
//!
//! Elements created after registration are therefore covered without rebinding anything.

use crate::{error::describe, Error};
use core::{
	cell::{Cell, RefCell},
	fmt::{self, Debug, Formatter},
	mem,
};
use hashbrown::HashMap;
use js_sys::Function;
use std::rc::Rc;
use tracing::{error, instrument, trace, trace_span};
use wasm_bindgen::{closure::Closure, JsCast, JsValue};

/// Mirrors [***AddEventListenerOptions***](https://developer.mozilla.org/en-US/docs/Web/API/EventTarget/addEventListener#parameters).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct ListenerOptions {
	capture: bool,
	once: bool,
	passive: bool,
}
impl ListenerOptions {
	#[must_use]
	pub const fn new() -> Self {
		Self {
			capture: false,
			once: false,
			passive: false,
		}
	}

	#[must_use]
	pub const fn with_capture(self, capture: bool) -> Self {
		Self { capture, ..self }
	}

	#[must_use]
	pub const fn with_once(self, once: bool) -> Self {
		Self { once, ..self }
	}

	#[must_use]
	pub const fn with_passive(self, passive: bool) -> Self {
		Self { passive, ..self }
	}

	#[must_use]
	pub const fn capture(self) -> bool {
		self.capture
	}

	#[must_use]
	pub const fn once(self) -> bool {
		self.once
	}

	#[must_use]
	pub const fn passive(self) -> bool {
		self.passive
	}

	fn cache_index(self) -> usize {
		self.capture as usize + self.once as usize * 2 + self.passive as usize * 4
	}
}

/// What a delegated callback receives for each matching selector.
#[derive(Debug, Clone, Copy)]
pub struct Delegated<'a> {
	pub event: &'a web_sys::Event,
	/// The event's original target, which matched [`selector`](`Delegated::selector`).
	pub target: &'a web_sys::Element,
	pub selector: &'a str,
	pub event_type: &'a str,
}

type Callback = Rc<dyn Fn(Delegated<'_>)>;

struct Binding {
	event_type: Rc<str>,
	selector: Rc<str>,
	callback: Callback,
	once: bool,
}

struct Attached {
	id: u32,
	event_type: Rc<str>,
	listener: Function,
	capture: bool,
}

struct Shared {
	root: web_sys::EventTarget,
	bindings: Rc<RefCell<HashMap<u32, Binding>>>,
	next_id: Cell<u32>,
	common_handler: Closure<dyn Fn(JsValue, web_sys::Event)>,
	event_listener_options_cache: RefCell<[Option<web_sys::AddEventListenerOptions>; 8]>,
}

/// Attaches delegated listeners to one root [`web_sys::EventTarget`].
///
/// All [`Registration`]s made through the same [`Delegator`] share a single Rust-side handler.
/// Each (event type, selector) pair is bound to it as its own
/// [***JavaScript***](https://developer.mozilla.org/en-US/docs/Web/JavaScript) function,
/// so the browser keeps them in registration order.
///
/// Cloning is cheap and shares the handler.
#[derive(Clone)]
pub struct Delegator {
	shared: Rc<Shared>,
}

impl Debug for Delegator {
	fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
		f.debug_struct("Delegator")
			.field("root", &self.shared.root)
			.field("binding_count", &self.binding_count())
			.finish()
	}
}

impl Delegator {
	#[must_use]
	#[instrument]
	pub fn new(root: web_sys::EventTarget) -> Self {
		let bindings: Rc<RefCell<HashMap<u32, Binding>>> = Rc::default();
		let common_handler = {
			let bindings = Rc::clone(&bindings);
			Closure::wrap(Box::new(move |binding_id: JsValue, event: web_sys::Event| {
				let span = trace_span!("common_handler", binding_id = ?&binding_id);
				let _enter = span.enter();

				#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
				let id = match binding_id.as_f64() {
					Some(id) => id as u32,
					None => return error!("reel-dom bug: Invalid binding id {:?}", binding_id),
				};

				// The borrow ends here, so the callback may register or dispose freely.
				let binding = {
					let mut bindings = bindings.borrow_mut();
					// The browser has already dropped a `once` listener at this point.
					if bindings.get(&id).map_or(false, |binding| binding.once) {
						bindings.remove(&id).map(|binding| (binding.event_type, binding.selector, binding.callback))
					} else {
						bindings
							.get(&id)
							.map(|binding| (Rc::clone(&binding.event_type), Rc::clone(&binding.selector), Rc::clone(&binding.callback)))
					}
				};
				match binding {
					Some((event_type, selector, callback)) => dispatch(&event, &event_type, &selector, &*callback),
					None => trace!("Binding {} was disposed. Ignoring event.", id),
				}
			}) as Box<dyn Fn(JsValue, web_sys::Event)>)
		};

		Self {
			shared: Rc::new(Shared {
				root,
				bindings,
				next_id: Cell::new(0),
				common_handler,
				event_listener_options_cache: RefCell::new([None, None, None, None, None, None, None, None]),
			}),
		}
	}

	/// Delegates from the current window's document.
	///
	/// # Errors
	///
	/// [`Error::NoWindow`] or [`Error::NoDocument`] if there is no document to attach to.
	pub fn for_document() -> Result<Self, Error> {
		Ok(Self::new(crate::dom::document()?.into()))
	}

	#[must_use]
	pub fn root(&self) -> &web_sys::EventTarget {
		&self.shared.root
	}

	/// The number of live (event type, selector) bindings across all of this [`Delegator`]'s [`Registration`]s.
	#[must_use]
	pub fn binding_count(&self) -> usize {
		self.shared.bindings.borrow().len()
	}

	/// Attaches one listener per combination of `event_types` and `selectors` to the root.
	///
	/// `callback` runs once for each selector the event's target matches, in the order of `selectors`.
	///
	/// The listeners stay attached until the returned [`Registration`] is dropped or [disposed](`Registration::dispose`).
	/// Use [`Registration::forget`] to keep them for the lifetime of the page.
	///
	/// # Errors
	///
	/// [`Error::InvalidSelector`] if any selector can't be parsed, in which case nothing is attached.
	///
	/// [`Error::Js`] if attaching a listener fails. Listeners attached by this call up to that point are removed again.
	#[instrument(skip(callback))]
	pub fn register(
		&self,
		event_types: &[&str],
		selectors: &[&str],
		callback: impl 'static + Fn(Delegated<'_>),
		options: ListenerOptions,
	) -> Result<Registration, Error> {
		for selector in selectors {
			validate_selector(&self.shared.root, selector)?;
		}

		let callback: Callback = Rc::new(callback);
		let event_types: Vec<Rc<str>> = event_types.iter().map(|&event_type| event_type.into()).collect();
		let selectors: Vec<Rc<str>> = selectors.iter().map(|&selector| selector.into()).collect();

		let mut registration = Registration {
			shared: Rc::clone(&self.shared),
			attached: Vec::with_capacity(event_types.len() * selectors.len()),
			event_types,
			selectors,
			options,
		};

		for event_type in &registration.event_types {
			for selector in &registration.selectors {
				// On error, dropping `registration` detaches everything attached so far.
				let attached = self.shared.attach(event_type, selector, &callback, options)?;
				registration.attached.push(attached);
			}
		}

		trace!("Attached {} delegated listener(s).", registration.attached.len());
		Ok(registration)
	}
}

impl Shared {
	fn attach(&self, event_type: &Rc<str>, selector: &Rc<str>, callback: &Callback, options: ListenerOptions) -> Result<Attached, Error> {
		let id = self.next_id.get();
		self.next_id.set(id.wrapping_add(1));

		let listener = self
			.common_handler
			.as_ref()
			.unchecked_ref::<Function>()
			.bind1(&JsValue::UNDEFINED, &JsValue::from(id))
			.unchecked_into::<Function>();

		self.root
			.add_event_listener_with_callback_and_add_event_listener_options(event_type, &listener, &self.add_event_listener_options(options))?;

		self.bindings.borrow_mut().insert(
			id,
			Binding {
				event_type: Rc::clone(event_type),
				selector: Rc::clone(selector),
				callback: Rc::clone(callback),
				once: options.once(),
			},
		);

		Ok(Attached {
			id,
			event_type: Rc::clone(event_type),
			listener,
			capture: options.capture(),
		})
	}

	fn detach(&self, Attached { id, event_type, listener, capture }: Attached) {
		self.bindings.borrow_mut().remove(&id);
		if let Err(error) = self.root.remove_event_listener_with_callback_and_bool(&event_type, &listener, capture) {
			error!("Failed to remove delegated listener {:?}: {:?}", event_type, error)
		}
	}

	fn add_event_listener_options(&self, options: ListenerOptions) -> web_sys::AddEventListenerOptions {
		let mut cache = self.event_listener_options_cache.borrow_mut();
		cache[options.cache_index()]
			.get_or_insert_with(|| {
				let mut web_options = web_sys::AddEventListenerOptions::new();
				web_options.capture(options.capture()).once(options.once()).passive(options.passive());
				web_options
			})
			.clone()
	}
}

fn dispatch(event: &web_sys::Event, event_type: &str, selector: &str, callback: &dyn Fn(Delegated<'_>)) {
	let target = match event.target().and_then(|target| target.dyn_into::<web_sys::Element>().ok()) {
		Some(target) => target,
		None => return trace!("Event target is not an element."),
	};

	match target.matches(selector) {
		Ok(true) => {
			let span = if cfg!(feature = "dangerous-logging") {
				trace_span!("Delegated callback", event_type, selector, target = ?&target)
			} else {
				trace_span!("Delegated callback", event_type, selector)
			};
			let _enter = span.enter();
			callback(Delegated {
				event,
				target: &target,
				selector,
				event_type,
			})
		}
		Ok(false) => (),
		Err(error) => error!("Failed to match selector {:?}: {:?}", selector, error),
	}
}

fn validate_selector(root: &web_sys::EventTarget, selector: &str) -> Result<(), Error> {
	let document = match root.dyn_ref::<web_sys::Document>() {
		Some(document) => Some(document.clone()),
		None => root.dyn_ref::<web_sys::Node>().and_then(web_sys::Node::owner_document),
	};
	match document {
		Some(document) => document.query_selector(selector).map(drop).map_err(|error| Error::InvalidSelector {
			selector: selector.to_owned(),
			message: describe(&error),
		}),
		// Roots like `window` have no document to check against.
		None => Ok(()),
	}
}

/// The listeners attached by one [`Delegator::register`] call.
///
/// Dropping this detaches them.
#[must_use = "Dropping a `Registration` removes its listeners. Call `.forget()` to keep them for the lifetime of the page."]
pub struct Registration {
	shared: Rc<Shared>,
	attached: Vec<Attached>,
	event_types: Vec<Rc<str>>,
	selectors: Vec<Rc<str>>,
	options: ListenerOptions,
}

impl Debug for Registration {
	fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
		f.debug_struct("Registration")
			.field("root", &self.shared.root)
			.field("event_types", &self.event_types)
			.field("selectors", &self.selectors)
			.field("options", &self.options)
			.field("len", &self.len())
			.finish()
	}
}

impl Registration {
	/// The number of attached (event type, selector) listeners.
	///
	/// This starts out as the product of the two input lengths.
	/// With [`ListenerOptions::once`], listeners that already fired are not counted.
	#[must_use]
	pub fn len(&self) -> usize {
		let bindings = self.shared.bindings.borrow();
		self.attached.iter().filter(|attached| bindings.contains_key(&attached.id)).count()
	}

	#[must_use]
	pub fn is_empty(&self) -> bool {
		self.len() == 0
	}

	pub fn event_types(&self) -> impl '_ + ExactSizeIterator<Item = &str> {
		self.event_types.iter().map(|event_type| &**event_type)
	}

	pub fn selectors(&self) -> impl '_ + ExactSizeIterator<Item = &str> {
		self.selectors.iter().map(|selector| &**selector)
	}

	#[must_use]
	pub fn options(&self) -> ListenerOptions {
		self.options
	}

	#[must_use]
	pub fn root(&self) -> &web_sys::EventTarget {
		&self.shared.root
	}

	/// Detaches all listeners of this registration.
	pub fn dispose(self) {
		drop(self)
	}

	/// Keeps the listeners attached for the lifetime of the page.
	pub fn forget(self) {
		mem::forget(self)
	}
}

impl Drop for Registration {
	fn drop(&mut self) {
		let count = self.attached.len();
		for attached in self.attached.drain(..) {
			self.shared.detach(attached)
		}
		trace!("Detached {} delegated listener(s).", count);
	}
}

/// Registers `callback` for every combination of `event_types` and `selectors` on `root`,
/// or on the current document if `root` is [`None`].
///
/// Each call creates its own [`Delegator`]. Use one explicitly to share the handler between registrations.
///
/// # Errors
///
/// [`Error::NoWindow`] or [`Error::NoDocument`] if `root` is [`None`] and there is no document.
///
/// Otherwise see [`Delegator::register`].
pub fn add_global_event_listener(
	event_types: &[&str],
	selectors: &[&str],
	callback: impl 'static + Fn(Delegated<'_>),
	options: ListenerOptions,
	root: Option<&web_sys::EventTarget>,
) -> Result<Registration, Error> {
	let delegator = match root {
		Some(root) => Delegator::new(root.clone()),
		None => Delegator::for_document()?,
	};
	delegator.register(event_types, selectors, callback, options)
}
