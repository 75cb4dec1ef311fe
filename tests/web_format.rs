use reel_dom::{
	format::{format_compact_number, format_currency, format_number},
	helpers::{random_number, sleep},
	Error,
};
use wasm_bindgen_test::{wasm_bindgen_test, wasm_bindgen_test_configure};

wasm_bindgen_test_configure!(run_in_browser);

mod web_log_;

#[wasm_bindgen_test]
fn numbers() {
	web_log_::init();
	assert_eq!(format_number(1_234_567.5, Some("en-US")).unwrap(), "1,234,567.5");
	assert_eq!(format_number(1_234.5, Some("de-DE")).unwrap(), "1.234,5");
	assert!(!format_number(1.0, None).unwrap().is_empty());
}

#[wasm_bindgen_test]
fn currency() {
	assert_eq!(format_currency(12.5, "USD", Some("en-US")).unwrap(), "$12.50");
	assert!(matches!(format_currency(1.0, "US", None), Err(Error::InvalidCurrency(code)) if code == "US"));
	assert!(matches!(format_currency(1.0, "U$D", None), Err(Error::InvalidCurrency(_))));
}

#[wasm_bindgen_test]
fn compact() {
	assert_eq!(format_compact_number(1_200.0, Some("en-US")).unwrap(), "1.2K");
	assert_eq!(format_compact_number(3_400_000.0, Some("en-US")).unwrap(), "3.4M");
}

#[wasm_bindgen_test]
fn bad_locales_are_errors() {
	assert!(matches!(format_number(1.0, Some("not a locale!")), Err(Error::Js(_))));
}

#[wasm_bindgen_test]
fn random_numbers_stay_in_range() {
	for _ in 0..100 {
		let n = random_number(3, 7);
		assert!((3..=7).contains(&n), "{} out of range", n);
	}
}

#[wasm_bindgen_test]
async fn sleep_resolves() {
	let start = js_sys::Date::now();
	sleep(0.05).await.unwrap();
	assert!(js_sys::Date::now() - start >= 40.0);
}
