use reel_dom::{
	dom::{append, create_element, data_attribute, data_attribute_set, document, qs, qsa, ElementOptions},
	Error,
};
use wasm_bindgen_test::{wasm_bindgen_test, wasm_bindgen_test_configure};

wasm_bindgen_test_configure!(run_in_browser);

mod web_log_;

#[wasm_bindgen_test]
fn create_element_applies_options() {
	web_log_::init();
	let document = document().unwrap();

	let options = ElementOptions::new()
		.classes(vec!["card", "wide"])
		.class("highlighted")
		.data("movieId", "42")
		.text("<b>not bold</b>")
		.style("color", "red")
		.style("margin-top", "3px")
		.attribute("title", "Tooltip");
	assert_eq!(options.css_text(), "color: red; margin-top: 3px; ");

	let element = create_element(&document, "div", &options).unwrap();

	assert_eq!(element.class_name(), "card wide highlighted");
	assert_eq!(element.get_attribute("data-movie-id").as_deref(), Some("42"));
	assert_eq!(element.text_content().as_deref(), Some("<b>not bold</b>"));
	assert!(element.query_selector("b").unwrap().is_none());
	assert_eq!(element.style().get_property_value("color").unwrap(), "red");
	assert_eq!(element.style().get_property_value("margin-top").unwrap(), "3px");
	assert_eq!(element.get_attribute("title").as_deref(), Some("Tooltip"));
}

#[wasm_bindgen_test]
fn create_element_rejects_bad_tags() {
	let document = document().unwrap();
	assert!(matches!(create_element(&document, "not a tag", &ElementOptions::new()), Err(Error::Js(_))));
}

#[wasm_bindgen_test]
fn queries() {
	web_log_::init();
	let document = document().unwrap();
	let container = create_element(&document, "section", &ElementOptions::new()).unwrap();
	container.set_inner_html(
		r#"<p class="item" id="first"></p>
		<svg class="item" id="vector"></svg>
		<p class="item" id="last" data-config data-mode="dark"></p>"#,
	);

	assert_eq!(qs(".item", &container).unwrap().unwrap().id(), "first");
	assert!(qs("svg", &container).unwrap().is_none(), "SVG elements are not HTML elements.");
	assert!(qs(".missing", &container).unwrap().is_none());
	assert!(matches!(qs("[broken", &container), Err(Error::InvalidSelector { .. })));

	let ids: Vec<_> = qsa(".item", &container).unwrap().iter().map(web_sys::Element::id).collect();
	assert_eq!(ids, vec!["first", "vector", "last"]);
	assert!(qsa(".missing", &container).unwrap().is_empty());

	assert_eq!(data_attribute("config", &container).unwrap().unwrap().id(), "last");
	let dataset = data_attribute_set("config", &container).unwrap().unwrap();
	assert_eq!(dataset.get("mode").as_deref(), Some("dark"));
	assert!(data_attribute_set("absent", &container).unwrap().is_none());
}

#[wasm_bindgen_test]
fn append_keeps_order() {
	let document = document().unwrap();
	let parent = create_element(&document, "ul", &ElementOptions::new()).unwrap();
	let first = create_element(&document, "li", &ElementOptions::new().text("1")).unwrap();
	let second = create_element(&document, "li", &ElementOptions::new().text("2")).unwrap();

	let children: Vec<&web_sys::Node> = vec![first.as_ref(), second.as_ref()];
	append(&parent, children).unwrap();

	assert_eq!(parent.text_content().as_deref(), Some("12"));
	let ancestor: &web_sys::Node = parent.as_ref();
	assert!(matches!(append(&first, Some(ancestor)), Err(Error::Js(_))));
}
