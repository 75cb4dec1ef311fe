//! The movie/TV catalog browser.
//!
//! Expected markup (styling is up to the page):
//!
//! ```html
//! <meta name="catalog-api-key" content="…">
//! <button data-movies>Movies</button> <button data-tv>TV</button> <div class="btn"></div>
//! <main data-main></main>
//! <div class="blur"></div>
//! <section data-section></section>
//! ```

mod config;
mod controller;
mod fetch;
mod genres;
mod model;
pub mod render;
mod sequence;

pub use config::{CatalogConfig, API_KEY_META, DEFAULT_API_BASE_URL, DEFAULT_IMAGE_BASE_URL, LANGUAGE_META};
pub use controller::{CatalogController, Mounts};
pub use fetch::fetch_json;
pub use genres::{GenreTable, UNKNOWN_GENRE};
pub use model::{rating_class, CatalogItem, Category, DiscoverPage, Genre, GenreList};
pub use sequence::{RequestSequence, RequestToken};
