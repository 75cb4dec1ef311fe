use crate::Error;
use serde::de::DeserializeOwned;
use tracing::{instrument, trace};
use wasm_bindgen::JsCast;
use wasm_bindgen_futures::JsFuture;

/// `url` without its query string, which carries the API key.
pub(crate) fn redact(url: &str) -> &str {
	url.split('?').next().unwrap_or(url)
}

/// GETs `url` and decodes the body as JSON.
///
/// # Errors
///
/// [`Error::Js`] on network failure, [`Error::Http`] on a non-2xx status, [`Error::Decode`] on an unexpected body.
#[instrument(skip(url), fields(url = redact(url)))]
pub async fn fetch_json<T: DeserializeOwned>(url: &str) -> Result<T, Error> {
	let window = web_sys::window().ok_or(Error::NoWindow)?;
	let response: web_sys::Response = JsFuture::from(window.fetch_with_str(url)).await?.dyn_into()?;
	if !response.ok() {
		return Err(Error::Http {
			url: redact(url).to_owned(),
			status: response.status(),
		});
	}

	let body = JsFuture::from(response.text()?)
		.await?
		.as_string()
		.ok_or_else(|| Error::Js("response body is not a string".to_owned()))?;
	trace!("Received {} byte(s).", body.len());
	Ok(serde_json::from_str(&body)?)
}
