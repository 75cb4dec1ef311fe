use serde::{Deserialize, Deserializer};

/// Decodes `null` like a missing field.
fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
	D: Deserializer<'de>,
	T: Default + Deserialize<'de>,
{
	Option::<T>::deserialize(deserializer).map(Option::unwrap_or_default)
}

/// Catalog partition, each with its own endpoints.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Category {
	Movies,
	Tv,
}

impl Category {
	pub(crate) fn path_segment(self) -> &'static str {
		match self {
			Category::Movies => "movie",
			Category::Tv => "tv",
		}
	}

	/// Horizontal position of the toggle indicator.
	#[must_use]
	pub fn toggle_offset(self) -> &'static str {
		match self {
			Category::Movies => "0",
			Category::Tv => "110px",
		}
	}
}

/// One page of discover results.
#[derive(Debug, Clone, Default, Deserialize, PartialEq)]
pub struct DiscoverPage {
	#[serde(default)]
	pub page: Option<u32>,
	#[serde(default, deserialize_with = "null_as_default")]
	pub results: Vec<CatalogItem>,
}

/// A movie or series. Missing and `null` fields decode to their defaults.
#[derive(Debug, Clone, Default, Deserialize, PartialEq)]
#[serde(default)]
pub struct CatalogItem {
	pub id: Option<u64>,
	pub original_title: Option<String>,
	pub original_name: Option<String>,
	pub title: Option<String>,
	pub name: Option<String>,
	pub poster_path: Option<String>,
	pub backdrop_path: Option<String>,
	/// 0 to 10.
	#[serde(deserialize_with = "null_as_default")]
	pub vote_average: f64,
	#[serde(deserialize_with = "null_as_default")]
	pub overview: String,
	pub release_date: Option<String>,
	pub first_air_date: Option<String>,
	#[serde(deserialize_with = "null_as_default")]
	pub original_language: String,
	#[serde(deserialize_with = "null_as_default")]
	pub genre_ids: Vec<u32>,
}

fn present(value: &Option<String>) -> Option<&str> {
	value.as_deref().filter(|value| !value.is_empty())
}

/// Rating colour class: `green` from 8, `orange` from 5, otherwise `red`.
#[must_use]
pub fn rating_class(vote_average: f64) -> &'static str {
	if vote_average >= 8.0 {
		"green"
	} else if vote_average >= 5.0 {
		"orange"
	} else {
		"red"
	}
}

impl CatalogItem {
	/// The title shown on cards, preferring the movie title.
	#[must_use]
	pub fn card_title(&self) -> &str {
		present(&self.original_title)
			.or_else(|| present(&self.original_name))
			.or_else(|| present(&self.title))
			.or_else(|| present(&self.name))
			.unwrap_or_default()
	}

	/// The title shown in the popup, preferring the series name.
	#[must_use]
	pub fn popup_title(&self) -> &str {
		present(&self.original_name)
			.or_else(|| present(&self.original_title))
			.or_else(|| present(&self.name))
			.or_else(|| present(&self.title))
			.unwrap_or_default()
	}

	#[must_use]
	pub fn rating_class(&self) -> &'static str {
		rating_class(self.vote_average)
	}

	/// The rating with two decimals.
	#[must_use]
	pub fn rating_text(&self) -> String {
		format!("{:.2}", self.vote_average)
	}

	/// Label and date of the first release or air date.
	#[must_use]
	pub fn release(&self) -> (&'static str, &str) {
		match present(&self.release_date) {
			Some(date) => ("Release date: ", date),
			None => ("First Air Date: ", present(&self.first_air_date).unwrap_or_default()),
		}
	}

	/// The backdrop if there is one, otherwise the poster.
	#[must_use]
	pub fn popup_image_path(&self) -> Option<&str> {
		present(&self.backdrop_path).or_else(|| present(&self.poster_path))
	}
}

#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
pub struct Genre {
	pub id: u32,
	pub name: String,
}

#[derive(Debug, Clone, Default, Deserialize, PartialEq, Eq)]
pub struct GenreList {
	#[serde(default)]
	pub genres: Vec<Genre>,
}
