use super::Category;
use crate::Error;
use web_sys::Document;

pub const DEFAULT_API_BASE_URL: &str = "https://api.themoviedb.org/3";
pub const DEFAULT_IMAGE_BASE_URL: &str = "https://image.tmdb.org/t/p/w500";

/// `<meta name="catalog-api-key" content="…">`
pub const API_KEY_META: &str = "catalog-api-key";
/// `<meta name="catalog-language" content="…">`, optional.
pub const LANGUAGE_META: &str = "catalog-language";

/// Where and how the catalog is queried.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CatalogConfig {
	pub api_base_url: String,
	pub image_base_url: String,
	pub api_key: String,
	/// Language of discover results, like `en-US`.
	pub language: String,
	/// Language of genre names, like `en`.
	pub genre_language: String,
	pub page: u32,
	/// Delay between showing the overlay and the popup.
	pub popup_delay_ms: i32,
}

impl CatalogConfig {
	#[must_use]
	pub fn new(api_key: impl Into<String>) -> Self {
		Self {
			api_base_url: DEFAULT_API_BASE_URL.to_owned(),
			image_base_url: DEFAULT_IMAGE_BASE_URL.to_owned(),
			api_key: api_key.into(),
			language: "en-US".to_owned(),
			genre_language: "en".to_owned(),
			page: 1,
			popup_delay_ms: 50,
		}
	}

	/// Reads the API key (and optionally the language) from `<meta>` tags in `document`.
	///
	/// # Errors
	///
	/// [`Error::MissingConfig`] if there is no non-empty [`API_KEY_META`].
	pub fn from_meta(document: &Document) -> Result<Self, Error> {
		let api_key = meta_content(document, API_KEY_META)?.ok_or(Error::MissingConfig(API_KEY_META))?;
		let mut config = Self::new(api_key);
		if let Some(language) = meta_content(document, LANGUAGE_META)? {
			config.language = language;
		}
		Ok(config)
	}

	#[must_use]
	pub fn with_api_base_url(self, api_base_url: impl Into<String>) -> Self {
		Self {
			api_base_url: api_base_url.into(),
			..self
		}
	}

	#[must_use]
	pub fn with_image_base_url(self, image_base_url: impl Into<String>) -> Self {
		Self {
			image_base_url: image_base_url.into(),
			..self
		}
	}

	#[must_use]
	pub fn with_page(self, page: u32) -> Self {
		Self { page, ..self }
	}

	#[must_use]
	pub fn with_popup_delay_ms(self, popup_delay_ms: i32) -> Self {
		Self { popup_delay_ms, ..self }
	}

	#[must_use]
	pub fn discover_url(&self, category: Category) -> String {
		let extra = match category {
			Category::Movies => "include_video=true",
			Category::Tv => "include_null_first_air_dates=true",
		};
		format!(
			"{}/discover/{}?include_adult=true&{}&language={}&page={}&sort_by=popularity.desc&api_key={}",
			self.api_base_url,
			category.path_segment(),
			extra,
			self.language,
			self.page,
			self.api_key,
		)
	}

	#[must_use]
	pub fn genre_url(&self, category: Category) -> String {
		format!(
			"{}/genre/{}/list?language={}&api_key={}",
			self.api_base_url,
			category.path_segment(),
			self.genre_language,
			self.api_key,
		)
	}

	/// Absolute image URL for an API-relative `path` like `/abc.jpg`.
	#[must_use]
	pub fn image_url(&self, path: &str) -> String {
		format!("{}{}", self.image_base_url, path)
	}
}

fn meta_content(document: &Document, name: &str) -> Result<Option<String>, Error> {
	let selector = format!("meta[name={:?}]", name);
	let meta = document.query_selector(&selector)?;
	Ok(meta
		.and_then(|meta| meta.get_attribute("content"))
		.filter(|content| !content.is_empty()))
}
