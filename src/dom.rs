//! Element construction and query helpers.

use crate::Error;
use tracing::{instrument, trace};
use wasm_bindgen::{JsCast, JsValue};
use web_sys::{Document, DomStringMap, Element, HtmlElement, Node, NodeList};

/// The current window's document.
///
/// # Errors
///
/// [`Error::NoWindow`] outside of a browsing context, [`Error::NoDocument`] if the window has no document.
pub fn document() -> Result<Document, Error> {
	web_sys::window().ok_or(Error::NoWindow)?.document().ok_or(Error::NoDocument)
}

/// Declarative setup for [`create_element`].
///
/// Entries are applied in the order they were added, within each kind.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ElementOptions {
	classes: Vec<String>,
	dataset: Vec<(String, String)>,
	text: Option<String>,
	style: Vec<(String, String)>,
	attributes: Vec<(String, String)>,
}

impl ElementOptions {
	#[must_use]
	pub fn new() -> Self {
		Self::default()
	}

	#[must_use]
	pub fn class(mut self, class: impl Into<String>) -> Self {
		self.classes.push(class.into());
		self
	}

	#[must_use]
	pub fn classes<I: IntoIterator>(mut self, classes: I) -> Self
	where
		I::Item: Into<String>,
	{
		self.classes.extend(classes.into_iter().map(Into::into));
		self
	}

	/// Sets `data-{key}` through the element's [***dataset***](https://developer.mozilla.org/en-US/docs/Web/API/HTMLElement/dataset),
	/// so `key` is in camelCase.
	#[must_use]
	pub fn data(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
		self.dataset.push((key.into(), value.into()));
		self
	}

	#[must_use]
	pub fn text(mut self, text: impl Into<String>) -> Self {
		self.text = Some(text.into());
		self
	}

	#[must_use]
	pub fn style(mut self, property: impl Into<String>, value: impl Into<String>) -> Self {
		self.style.push((property.into(), value.into()));
		self
	}

	#[must_use]
	pub fn attribute(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
		self.attributes.push((name.into(), value.into()));
		self
	}

	/// The inline style as written to ***cssText***.
	#[must_use]
	pub fn css_text(&self) -> String {
		self.style.iter().map(|(property, value)| format!("{}: {}; ", property, value)).collect()
	}
}

/// Creates a detached `<{tag}>` in `document` and applies `options` to it.
///
/// # Errors
///
/// [`Error::Js`] if the tag name, a class, a data key or an attribute name is rejected by the DOM.
#[instrument(skip(document))]
pub fn create_element(document: &Document, tag: &str, options: &ElementOptions) -> Result<HtmlElement, Error> {
	let element = document
		.create_element(tag)?
		.dyn_into::<HtmlElement>()
		.map_err(|element| Error::Js(format!("<{}> is not an HTML element", element.tag_name())))?;

	let class_list = element.class_list();
	for class in &options.classes {
		class_list.add_1(class)?;
	}

	if !options.dataset.is_empty() {
		let dataset = element.dataset();
		for (key, value) in &options.dataset {
			dataset.set(key, value)?;
		}
	}

	if let Some(text) = &options.text {
		element.set_text_content(Some(text.as_str()));
	}

	if !options.style.is_empty() {
		element.style().set_css_text(&options.css_text());
	}

	for (name, value) in &options.attributes {
		element.set_attribute(name, value)?;
	}

	Ok(element)
}

/// Something [***querySelector()***](https://developer.mozilla.org/en-US/docs/Web/API/Document/querySelector) can be called on.
pub trait QueryRoot {
	/// # Errors
	///
	/// Iff `selectors` is not a valid selector list.
	fn query_selector(&self, selectors: &str) -> Result<Option<Element>, JsValue>;

	/// # Errors
	///
	/// Iff `selectors` is not a valid selector list.
	fn query_selector_all(&self, selectors: &str) -> Result<NodeList, JsValue>;
}

impl QueryRoot for Document {
	fn query_selector(&self, selectors: &str) -> Result<Option<Element>, JsValue> {
		Document::query_selector(self, selectors)
	}

	fn query_selector_all(&self, selectors: &str) -> Result<NodeList, JsValue> {
		Document::query_selector_all(self, selectors)
	}
}

impl QueryRoot for Element {
	fn query_selector(&self, selectors: &str) -> Result<Option<Element>, JsValue> {
		Element::query_selector(self, selectors)
	}

	fn query_selector_all(&self, selectors: &str) -> Result<NodeList, JsValue> {
		Element::query_selector_all(self, selectors)
	}
}

impl QueryRoot for HtmlElement {
	fn query_selector(&self, selectors: &str) -> Result<Option<Element>, JsValue> {
		Element::query_selector(self, selectors)
	}

	fn query_selector_all(&self, selectors: &str) -> Result<NodeList, JsValue> {
		Element::query_selector_all(self, selectors)
	}
}

fn invalid_selector(selector: &str, error: &JsValue) -> Error {
	Error::InvalidSelector {
		selector: selector.to_owned(),
		message: crate::error::describe(error),
	}
}

/// The first descendant of `parent` matching `selector`, if that is an [`HtmlElement`].
///
/// # Errors
///
/// [`Error::InvalidSelector`] if `selector` can't be parsed.
pub fn qs(selector: &str, parent: &impl QueryRoot) -> Result<Option<HtmlElement>, Error> {
	let element = parent.query_selector(selector).map_err(|error| invalid_selector(selector, &error))?;
	Ok(element.and_then(|element| element.dyn_into::<HtmlElement>().ok()))
}

/// All descendants of `parent` matching `selector`, in document order.
///
/// # Errors
///
/// [`Error::InvalidSelector`] if `selector` can't be parsed.
pub fn qsa(selector: &str, parent: &impl QueryRoot) -> Result<Vec<Element>, Error> {
	let nodes = parent.query_selector_all(selector).map_err(|error| invalid_selector(selector, &error))?;
	Ok((0..nodes.length())
		.filter_map(|i| nodes.get(i))
		.filter_map(|node| node.dyn_into::<Element>().ok())
		.collect())
}

/// The first descendant of `parent` carrying a `data-{name}` attribute.
///
/// # Errors
///
/// [`Error::InvalidSelector`] if `name` isn't a valid attribute name.
pub fn data_attribute(name: &str, parent: &impl QueryRoot) -> Result<Option<Element>, Error> {
	let selector = format!("[data-{}]", name);
	parent.query_selector(&selector).map_err(|error| invalid_selector(&selector, &error))
}

/// The [***dataset***](https://developer.mozilla.org/en-US/docs/Web/API/HTMLElement/dataset) of [`data_attribute`]'s result.
///
/// # Errors
///
/// See [`data_attribute`].
pub fn data_attribute_set(name: &str, parent: &impl QueryRoot) -> Result<Option<DomStringMap>, Error> {
	Ok(data_attribute(name, parent)?
		.and_then(|element| element.dyn_into::<HtmlElement>().ok())
		.map(|element| element.dataset()))
}

/// Appends `children` to `parent` in order.
///
/// # Errors
///
/// [`Error::Js`] if the DOM rejects an insertion, for example of an ancestor of `parent`.
/// Children before the rejected one stay appended.
pub fn append<'a>(parent: &Node, children: impl IntoIterator<Item = &'a Node>) -> Result<(), Error> {
	let mut count = 0_usize;
	for child in children {
		parent.append_child(child)?;
		count += 1;
	}
	trace!("Appended {} node(s).", count);
	Ok(())
}
