#![doc(html_root_url = "https://docs.rs/reel-dom/0.0.1")]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

//! Delegated DOM event listeners and small DOM utilities for [***WebAssembly***](https://developer.mozilla.org/en-US/docs/WebAssembly) front-ends,
//! plus a movie/TV [`catalog`] browser built on them.

#[cfg(doctest)]
pub mod readme {
	doc_comment::doctest!("../README.md");
}

pub mod array;
pub mod catalog;
pub mod delegation;
pub mod dom;
pub mod drag;
mod error;
pub mod format;
pub mod helpers;
pub mod hold;

pub use delegation::{add_global_event_listener, Delegated, Delegator, ListenerOptions, Registration};
pub use error::Error;

use wasm_bindgen::{prelude::wasm_bindgen, JsValue};

/// Mounts the catalog browser on the current page and shows movies.
///
/// Without `api_key`, it is read from `<meta name="catalog-api-key" content="…">`.
///
/// With the `console_error_panic_hook` and `tracing-wasm` features, this also installs those.
///
/// # Errors
///
/// If the page lacks a mount point or the API key.
#[wasm_bindgen]
pub fn run(api_key: Option<String>) -> Result<(), JsValue> {
	#[cfg(feature = "console_error_panic_hook")]
	console_error_panic_hook::set_once();
	#[cfg(feature = "tracing-wasm")]
	{
		// Another subscriber may already be installed.
		let _ = tracing_wasm::try_set_as_global_default();
	}

	let document = dom::document()?;
	let config = match api_key {
		Some(api_key) => catalog::CatalogConfig::new(api_key),
		None => catalog::CatalogConfig::from_meta(&document)?,
	};
	let controller = catalog::CatalogController::mount(document, config)?;
	controller.show_category(catalog::Category::Movies);
	controller.forget();
	Ok(())
}
