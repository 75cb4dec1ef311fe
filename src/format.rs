//! Locale-aware number formatting through [***Intl.NumberFormat***](https://developer.mozilla.org/en-US/docs/Web/JavaScript/Reference/Global_Objects/Intl/NumberFormat).
//!
//! `locale` [`None`] means the browser's default locale.

use crate::Error;
use js_sys::{Array, Function, Object, Reflect};
use tracing::instrument;
use wasm_bindgen::{JsCast, JsValue};

/// Formats `number` with grouping separators, as in `1,234.5`.
///
/// # Errors
///
/// [`Error::Js`] if `locale` is not a valid language tag.
pub fn format_number(number: f64, locale: Option<&str>) -> Result<String, Error> {
	format_with(number, locale, &[])
}

/// Formats `amount` in `currency` (an ISO 4217 code such as `"EUR"`).
///
/// # Errors
///
/// [`Error::InvalidCurrency`] unless `currency` consists of exactly three ASCII letters.
///
/// [`Error::Js`] if `locale` is not a valid language tag.
pub fn format_currency(amount: f64, currency: &str, locale: Option<&str>) -> Result<String, Error> {
	if currency.len() != 3 || !currency.bytes().all(|b| b.is_ascii_alphabetic()) {
		return Err(Error::InvalidCurrency(currency.to_owned()));
	}
	format_with(amount, locale, &[("style", "currency"), ("currency", currency)])
}

/// Formats `number` in compact notation, as in `1.2K`.
///
/// # Errors
///
/// [`Error::Js`] if `locale` is not a valid language tag.
pub fn format_compact_number(number: f64, locale: Option<&str>) -> Result<String, Error> {
	format_with(number, locale, &[("notation", "compact")])
}

#[instrument]
fn format_with(number: f64, locale: Option<&str>, options: &[(&str, &str)]) -> Result<String, Error> {
	let intl = Reflect::get(&js_sys::global(), &JsValue::from_str("Intl"))?;
	let constructor: Function = Reflect::get(&intl, &JsValue::from_str("NumberFormat"))?.dyn_into()?;

	let locales = Array::new();
	if let Some(locale) = locale {
		locales.push(&JsValue::from_str(locale));
	}

	let js_options = Object::new();
	for &(key, value) in options {
		Reflect::set(&js_options, &JsValue::from_str(key), &JsValue::from_str(value))?;
	}

	// `Reflect.construct` turns the `RangeError`s of bad locales into `Err` rather than aborting.
	let number_format = Reflect::construct(&constructor, &Array::of2(&locales, &js_options))?;
	let format: Function = Reflect::get(&number_format, &JsValue::from_str("format"))?.dyn_into()?;
	format
		.call1(&number_format, &JsValue::from_f64(number))?
		.as_string()
		.ok_or_else(|| Error::Js("`Intl.NumberFormat.prototype.format` returned a non-string".to_owned()))
}
