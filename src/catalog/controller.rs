use super::{
	fetch::fetch_json,
	render::{self, INDEX_DATA_KEY},
	CatalogConfig, CatalogItem, Category, DiscoverPage, GenreList, GenreTable, RequestSequence,
};
use crate::{
	delegation::{Delegated, Delegator, ListenerOptions, Registration},
	dom::qs,
	Error,
};
use core::{
	cell::{Cell, RefCell},
	fmt::{self, Debug, Formatter},
	mem,
};
use std::rc::{Rc, Weak};
use tracing::{debug, error, instrument, trace, warn};
use wasm_bindgen::{closure::Closure, JsCast};
use wasm_bindgen_futures::spawn_local;
use web_sys::{Document, HtmlElement};

pub const MAIN_SELECTOR: &str = "[data-main]";
pub const SECTION_SELECTOR: &str = "[data-section]";
pub const TOGGLE_SELECTOR: &str = ".btn";
pub const BLUR_SELECTOR: &str = ".blur";
pub const POPUP_SELECTOR: &str = ".popup";
pub const IMAGE_SELECTOR: &str = ".dp";
pub const BODY_SELECTOR: &str = "body";
pub const MOVIES_SELECTOR: &str = "[data-movies]";
pub const TV_SELECTOR: &str = "[data-tv]";

const ACTIVE_CLASS: &str = "active";

/// The elements the controller renders into.
#[derive(Debug, Clone)]
pub struct Mounts {
	/// Card list.
	pub main: HtmlElement,
	/// Popup host.
	pub section: HtmlElement,
	/// Category toggle indicator.
	pub toggle: HtmlElement,
	/// Overlay behind the popup.
	pub blur: HtmlElement,
}

impl Mounts {
	/// # Errors
	///
	/// [`Error::MissingMount`] naming the first selector without a match.
	pub fn find(document: &Document) -> Result<Self, Error> {
		let require = |selector: &'static str| -> Result<HtmlElement, Error> { qs(selector, document)?.ok_or(Error::MissingMount(selector)) };
		Ok(Self {
			main: require(MAIN_SELECTOR)?,
			section: require(SECTION_SELECTOR)?,
			toggle: require(TOGGLE_SELECTOR)?,
			blur: require(BLUR_SELECTOR)?,
		})
	}
}

struct Inner {
	config: CatalogConfig,
	document: Document,
	mounts: Mounts,
	category: Cell<Option<Category>>,
	items: RefCell<Vec<CatalogItem>>,
	genres: RefCell<GenreTable>,
	list_requests: RequestSequence,
	genre_requests: RequestSequence,
	registration: RefCell<Option<Registration>>,
	popup_timeout: Cell<Option<i32>>,
}

/// Fetches and renders catalog pages and shows item details on click.
///
/// Clicks are delegated from the document, so cards rendered later need no wiring.
/// Dropping the controller detaches its listener.
#[must_use = "Dropping a `CatalogController` detaches it. Call `.forget()` to keep it for the lifetime of the page."]
pub struct CatalogController {
	inner: Rc<Inner>,
}

impl Debug for CatalogController {
	fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
		f.debug_struct("CatalogController")
			.field("category", &self.inner.category.get())
			.field("item_count", &self.inner.items.borrow().len())
			.field("genre_count", &self.inner.genres.borrow().len())
			.finish()
	}
}

impl CatalogController {
	/// Finds the [`Mounts`] in `document` and starts listening for clicks.
	///
	/// Nothing is fetched until [`show_category`](`CatalogController::show_category`) is called.
	///
	/// # Errors
	///
	/// [`Error::MissingMount`] if a mount point is missing, [`Error::Js`] if the listener can't be attached.
	#[instrument(skip_all)]
	pub fn mount(document: Document, config: CatalogConfig) -> Result<Self, Error> {
		let mounts = Mounts::find(&document)?;
		let inner = Rc::new(Inner {
			config,
			document: document.clone(),
			mounts,
			category: Cell::new(None),
			items: RefCell::default(),
			genres: RefCell::default(),
			list_requests: RequestSequence::new(),
			genre_requests: RequestSequence::new(),
			registration: RefCell::new(None),
			popup_timeout: Cell::new(None),
		});

		let weak = Rc::downgrade(&inner);
		let registration = Delegator::new(document.into()).register(
			&["click"],
			&[IMAGE_SELECTOR, BODY_SELECTOR, MOVIES_SELECTOR, TV_SELECTOR],
			move |delegated| {
				if let Some(inner) = weak.upgrade() {
					Inner::on_click(&inner, delegated)
				}
			},
			ListenerOptions::new(),
		)?;
		*inner.registration.borrow_mut() = Some(registration);

		Ok(Self { inner })
	}

	#[must_use]
	pub fn category(&self) -> Option<Category> {
		self.inner.category.get()
	}

	#[must_use]
	pub fn mounts(&self) -> &Mounts {
		&self.inner.mounts
	}

	/// Moves the toggle and (re)loads the list and genres of `category`.
	///
	/// Responses to earlier calls that arrive afterwards are discarded.
	pub fn show_category(&self, category: Category) {
		Inner::show_category(&self.inner, category)
	}

	/// Renders `items` as if they had just been fetched, invalidating pending list requests.
	///
	/// # Errors
	///
	/// [`Error::Js`] if the DOM rejects an operation.
	pub fn show_items(&self, items: Vec<CatalogItem>) -> Result<(), Error> {
		self.inner.list_requests.issue();
		self.inner.accept_items(items)
	}

	/// Replaces the genre table, invalidating pending genre requests.
	pub fn set_genres(&self, genres: GenreTable) {
		self.inner.genre_requests.issue();
		*self.inner.genres.borrow_mut() = genres;
	}

	/// Renders the popup for the item at `index` of the current list and shows it.
	///
	/// # Errors
	///
	/// [`Error::Js`] if the DOM rejects an operation.
	pub fn open_popup(&self, index: usize) -> Result<(), Error> {
		if !self.inner.render_popup(index)? {
			warn!("No item at index {}.", index);
		}
		self.inner.show_popup()
	}

	/// # Errors
	///
	/// [`Error::Js`] if the DOM rejects an operation.
	pub fn close_popup(&self) -> Result<(), Error> {
		self.inner.hide_popup()
	}

	/// Keeps the controller and its listener for the lifetime of the page.
	pub fn forget(self) {
		mem::forget(self)
	}
}

impl Inner {
	fn on_click(this: &Rc<Self>, delegated: Delegated<'_>) {
		let result = match delegated.selector {
			IMAGE_SELECTOR => this.open_from(delegated.target),
			BODY_SELECTOR => this.hide_popup(),
			MOVIES_SELECTOR => {
				Self::show_category(this, Category::Movies);
				Ok(())
			}
			TV_SELECTOR => {
				Self::show_category(this, Category::Tv);
				Ok(())
			}
			other => {
				trace!("Ignoring click on {:?}.", other);
				Ok(())
			}
		};
		if let Err(error) = result {
			error!("Failed to handle click on {:?}: {}", delegated.selector, error)
		}
	}

	/// Card images carry their index on the card. The popup's own image has none and only re-shows it.
	fn open_from(&self, target: &web_sys::Element) -> Result<(), Error> {
		let index = target
			.closest(".movie-card")?
			.and_then(|card| card.get_attribute(&format!("data-{}", INDEX_DATA_KEY)))
			.and_then(|index| index.parse::<usize>().ok());
		if let Some(index) = index {
			self.render_popup(index)?;
		}
		self.show_popup()
	}

	#[instrument(skip(this))]
	fn show_category(this: &Rc<Self>, category: Category) {
		this.category.set(Some(category));
		if let Err(error) = this.mounts.toggle.style().set_property("left", category.toggle_offset()) {
			warn!("Failed to move the category toggle: {:?}", error)
		}

		let list_url = this.config.discover_url(category);
		let list_token = this.list_requests.issue();
		let weak = Rc::downgrade(this);
		spawn_local(async move {
			let result = fetch_json::<DiscoverPage>(&list_url).await;
			let inner = match upgrade(&weak) {
				Some(inner) => inner,
				None => return,
			};
			if !inner.list_requests.is_current(list_token) {
				return debug!("Discarding stale {:?} list response.", category);
			}
			let result = result.and_then(|page| inner.accept_items(page.results));
			if let Err(error) = result {
				error!("Failed to load the {:?} list: {}", category, error);
				if let Err(error) = render::render_error(&inner.document, &inner.mounts.main, &format!("Could not load the catalog: {}", error)) {
					error!("Failed to render the error notice: {}", error)
				}
			}
		});

		let genre_url = this.config.genre_url(category);
		let genre_token = this.genre_requests.issue();
		let weak = Rc::downgrade(this);
		spawn_local(async move {
			let result = fetch_json::<GenreList>(&genre_url).await;
			let inner = match upgrade(&weak) {
				Some(inner) => inner,
				None => return,
			};
			if !inner.genre_requests.is_current(genre_token) {
				return debug!("Discarding stale {:?} genre response.", category);
			}
			match result {
				Ok(list) => {
					let table = GenreTable::from_genres(list.genres);
					trace!("Loaded {} genre(s).", table.len());
					*inner.genres.borrow_mut() = table;
				}
				Err(error) => error!("Failed to load {:?} genres: {}", category, error),
			}
		});
	}

	fn accept_items(&self, items: Vec<CatalogItem>) -> Result<(), Error> {
		if cfg!(feature = "dangerous-logging") {
			for item in &items {
				trace!(title = item.card_title(), "Catalog item.");
			}
		}
		render::render_list(&self.document, &self.mounts.main, &self.config, &items)?;
		*self.items.borrow_mut() = items;
		Ok(())
	}

	/// Returns whether there was an item at `index`.
	fn render_popup(&self, index: usize) -> Result<bool, Error> {
		let items = self.items.borrow();
		let item = match items.get(index) {
			Some(item) => item,
			None => return Ok(false),
		};
		render::render_popup(&self.document, &self.mounts.section, &self.config, &self.genres.borrow(), item)?;
		Ok(true)
	}

	/// Activates the overlay at once and the popup after the configured delay.
	fn show_popup(&self) -> Result<(), Error> {
		let window = web_sys::window().ok_or(Error::NoWindow)?;
		self.cancel_popup_activation(&window);
		self.mounts.blur.class_list().add_1(ACTIVE_CLASS)?;

		let section = self.mounts.section.clone();
		let activate = Closure::once_into_js(move || match qs(POPUP_SELECTOR, &section) {
			Ok(Some(popup)) => {
				if let Err(error) = popup.class_list().add_1(ACTIVE_CLASS) {
					error!("Failed to activate the popup: {:?}", error)
				}
			}
			Ok(None) => trace!("Popup vanished before activation."),
			Err(error) => error!("Failed to find the popup: {}", error),
		});
		let handle = window.set_timeout_with_callback_and_timeout_and_arguments_0(activate.unchecked_ref(), self.config.popup_delay_ms)?;
		self.popup_timeout.set(Some(handle));
		Ok(())
	}

	/// Clearing a handle that already fired is a no-op.
	fn cancel_popup_activation(&self, window: &web_sys::Window) {
		if let Some(handle) = self.popup_timeout.take() {
			window.clear_timeout_with_handle(handle);
		}
	}

	fn hide_popup(&self) -> Result<(), Error> {
		if let Some(window) = web_sys::window() {
			self.cancel_popup_activation(&window);
		}
		self.mounts.blur.class_list().remove_1(ACTIVE_CLASS)?;
		if let Some(popup) = qs(POPUP_SELECTOR, &self.mounts.section)? {
			popup.class_list().remove_1(ACTIVE_CLASS)?;
		}
		Ok(())
	}
}

fn upgrade(weak: &Weak<Inner>) -> Option<Rc<Inner>> {
	let inner = weak.upgrade();
	if inner.is_none() {
		trace!("Controller dropped before the response arrived.");
	}
	inner
}
