//! Card, popup and error markup.
//!
//! Every render replaces its container's content from scratch. Catalog text is only ever written as text content.

use super::{CatalogConfig, CatalogItem, GenreTable};
use crate::{
	dom::{create_element, ElementOptions},
	Error,
};
use tracing::{instrument, trace};
use web_sys::{Document, Element, HtmlElement};

/// `data-index` of cards, pointing into the last rendered list.
pub const INDEX_DATA_KEY: &str = "index";

fn element(document: &Document, tag: &str, options: ElementOptions) -> Result<HtmlElement, Error> {
	create_element(document, tag, &options)
}

fn text(document: &Document, tag: &str, text: &str) -> Result<HtmlElement, Error> {
	element(document, tag, ElementOptions::new().text(text))
}

fn image(document: &Document, config: &CatalogConfig, path: Option<&str>, alt: &str) -> Result<HtmlElement, Error> {
	let mut options = ElementOptions::new().class("dp").attribute("alt", alt);
	if let Some(path) = path {
		options = options.attribute("src", config.image_url(path));
	}
	element(document, "img", options)
}

/// Title and rating.
fn movie_info(document: &Document, title: &str, item: &CatalogItem, rating_id: Option<&str>) -> Result<HtmlElement, Error> {
	let info = element(document, "div", ElementOptions::new().class("movie-info"))?;
	let mut rating = ElementOptions::new().class(item.rating_class()).text(item.rating_text());
	if let Some(id) = rating_id {
		rating = rating.attribute("id", id);
	}
	let heading = text(document, "h2", title)?;
	let rating = element(document, "span", rating)?;
	info.append_child(&heading)?;
	info.append_child(&rating)?;
	Ok(info)
}

/// Overview, language and release date.
fn overview_section(document: &Document, item: &CatalogItem) -> Result<HtmlElement, Error> {
	let section = element(document, "div", ElementOptions::new().class("overview-section"))?;

	let heading = element(document, "div", ElementOptions::new().class("overview-and-language"))?;
	let overview = text(document, "h3", "Overview")?;
	let language = element(document, "h4", ElementOptions::new().class("language").text(item.original_language.as_str()))?;
	heading.append_child(&overview)?;
	heading.append_child(&language)?;
	section.append_child(&heading)?;

	let description = element(document, "p", ElementOptions::new().class("description").text(item.overview.as_str()))?;
	section.append_child(&description)?;

	let (label, date) = item.release();
	let release = element(document, "div", ElementOptions::new().class("release-date"))?;
	let label = text(document, "h4", label)?;
	let date = text(document, "p", date)?;
	release.append_child(&label)?;
	release.append_child(&date)?;
	section.append_child(&release)?;

	Ok(section)
}

/// One `div.movie-card` for the item at `index`.
///
/// # Errors
///
/// [`Error::Js`] if the DOM rejects an operation.
pub fn card(document: &Document, config: &CatalogConfig, index: usize, item: &CatalogItem) -> Result<HtmlElement, Error> {
	let title = item.card_title();
	let card = element(document, "div", ElementOptions::new().class("movie-card").data(INDEX_DATA_KEY, index.to_string()))?;
	let poster = image(document, config, item.poster_path.as_deref(), title)?;
	let info = movie_info(document, title, item, None)?;
	let overview = overview_section(document, item)?;
	card.append_child(&poster)?;
	card.append_child(&info)?;
	card.append_child(&overview)?;
	Ok(card)
}

/// Clears `main` and fills it with one card per item.
///
/// # Errors
///
/// [`Error::Js`] if the DOM rejects an operation. `main` may be partially filled in that case.
#[instrument(skip_all, fields(count = items.len()))]
pub fn render_list(document: &Document, main: &Element, config: &CatalogConfig, items: &[CatalogItem]) -> Result<(), Error> {
	main.set_inner_html("");
	for (index, item) in items.iter().enumerate() {
		let card = card(document, config, index, item)?;
		main.append_child(&card)?;
	}
	trace!("Rendered {} card(s).", items.len());
	Ok(())
}

/// Clears `section` and renders the `div.popup` for `item` into it.
///
/// # Errors
///
/// [`Error::Js`] if the DOM rejects an operation.
#[instrument(skip_all)]
pub fn render_popup(document: &Document, section: &Element, config: &CatalogConfig, genres: &GenreTable, item: &CatalogItem) -> Result<HtmlElement, Error> {
	section.set_inner_html("");
	let title = item.popup_title();
	let popup = element(document, "div", ElementOptions::new().class("popup"))?;

	let image_container = element(document, "div", ElementOptions::new().class("img-container"))?;
	let info = movie_info(document, title, item, Some("rating"))?;
	let image_frame = element(document, "div", ElementOptions::new().class("image"))?;
	let backdrop = image(document, config, item.popup_image_path(), title)?;
	image_frame.append_child(&backdrop)?;
	let button = text(document, "button", "Add to Watchlist ")?;
	let plus = text(document, "strong", "+")?;
	button.append_child(&plus)?;
	image_container.append_child(&info)?;
	image_container.append_child(&image_frame)?;
	image_container.append_child(&button)?;
	popup.append_child(&image_container)?;

	let overview = overview_section(document, item)?;
	let genre_container = element(document, "div", ElementOptions::new().class("genre"))?;
	for name in genres.names(&item.genre_ids) {
		let genre = element(document, "div", ElementOptions::new().class("genre-text").text(name))?;
		genre_container.append_child(&genre)?;
	}
	overview.append_child(&genre_container)?;
	popup.append_child(&overview)?;

	section.append_child(&popup)?;
	Ok(popup)
}

/// Replaces `main`'s content with a `p.error` notice.
///
/// # Errors
///
/// [`Error::Js`] if the DOM rejects an operation.
pub fn render_error(document: &Document, main: &Element, message: &str) -> Result<(), Error> {
	main.set_inner_html("");
	let notice = element(document, "p", ElementOptions::new().class("error").text(message))?;
	main.append_child(&notice)?;
	Ok(())
}
