use thiserror::Error;
use wasm_bindgen::{JsCast, JsValue};

/// Everything that can go wrong in this crate.
///
/// [***JavaScript***](https://developer.mozilla.org/en-US/docs/Web/JavaScript) exceptions are stringified on conversion,
/// so this type stays [`Send`].
#[derive(Debug, Error)]
pub enum Error {
	#[error("no global `window` exists")]
	NoWindow,

	#[error("the window has no document")]
	NoDocument,

	#[error("mount point {0:?} not found in the document")]
	MissingMount(&'static str),

	#[error("missing configuration value {0:?}")]
	MissingConfig(&'static str),

	#[error("invalid selector {selector:?}: {message}")]
	InvalidSelector { selector: String, message: String },

	#[error("JavaScript error: {0}")]
	Js(String),

	/// `url` never includes the query string, which carries the API key.
	#[error("request to {url} failed with HTTP status {status}")]
	Http { url: String, status: u16 },

	#[error("malformed response body: {0}")]
	Decode(#[from] serde_json::Error),

	#[error("invalid currency code {0:?}, expected three ASCII letters")]
	InvalidCurrency(String),

	#[error("value is neither an object nor an array")]
	NotFlattenable,
}

impl From<JsValue> for Error {
	fn from(value: JsValue) -> Self {
		Self::Js(describe(&value))
	}
}

impl From<Error> for JsValue {
	fn from(error: Error) -> Self {
		js_sys::Error::new(&error.to_string()).into()
	}
}

/// Best-effort human readable form of a thrown [`JsValue`].
pub(crate) fn describe(value: &JsValue) -> String {
	if let Some(error) = value.dyn_ref::<js_sys::Error>() {
		String::from(error.message())
	} else if let Some(string) = value.as_string() {
		string
	} else {
		format!("{:?}", value)
	}
}
