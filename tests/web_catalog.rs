use reel_dom::{
	catalog::{render, CatalogConfig, CatalogController, CatalogItem, Category, Genre, GenreTable},
	dom::{document, qs, qsa},
	helpers::sleep,
	Error,
};
use wasm_bindgen::JsCast;
use wasm_bindgen_test::{wasm_bindgen_test, wasm_bindgen_test_configure};
use web_sys::{Document, HtmlElement};

wasm_bindgen_test_configure!(run_in_browser);

mod web_log_;

const PAGE: &str = r#"
	<button data-movies id="movies">Movies</button>
	<button data-tv id="tv">TV</button>
	<div class="btn"></div>
	<main data-main></main>
	<div class="blur"></div>
	<section data-section></section>
"#;

/// Mounts a fresh page. Remove the returned container when done, so the next test finds its own mounts.
fn page() -> (Document, HtmlElement) {
	web_log_::init();
	let document = document().unwrap();
	let container: HtmlElement = document.create_element("div").unwrap().dyn_into().unwrap();
	container.set_inner_html(PAGE);
	document.body().unwrap().append_child(&container).unwrap();
	(document, container)
}

fn config() -> CatalogConfig {
	// Nothing listens there, so requests fail fast.
	CatalogConfig::new("TEST-KEY").with_api_base_url("http://127.0.0.1:9")
}

fn items() -> Vec<CatalogItem> {
	vec![
		CatalogItem {
			original_title: Some("First Film".to_owned()),
			poster_path: Some("/first.jpg".to_owned()),
			vote_average: 8.5,
			overview: "<b>Not markup.</b>".to_owned(),
			release_date: Some("2021-02-03".to_owned()),
			original_language: "en".to_owned(),
			genre_ids: vec![28, 99],
			..CatalogItem::default()
		},
		CatalogItem {
			original_name: Some("Some Series".to_owned()),
			poster_path: Some("/series.jpg".to_owned()),
			backdrop_path: Some("/series-wide.jpg".to_owned()),
			vote_average: 6.0,
			first_air_date: Some("2019-09-09".to_owned()),
			original_language: "ja".to_owned(),
			genre_ids: vec![18],
			..CatalogItem::default()
		},
	]
}

fn genres() -> GenreTable {
	GenreTable::from_genres(vec![
		Genre { id: 28, name: "Action".to_owned() },
		Genre { id: 18, name: "Drama".to_owned() },
	])
}

fn text(parent: &HtmlElement, selector: &str) -> String {
	qs(selector, parent).unwrap().unwrap().text_content().unwrap_or_default()
}

fn has_active(element: &web_sys::Element) -> bool {
	element.class_list().contains("active")
}

#[wasm_bindgen_test]
fn missing_mounts_are_reported() {
	web_log_::init();
	let result = CatalogController::mount(document().unwrap(), config());
	assert!(matches!(result, Err(Error::MissingMount(_))));
}

#[wasm_bindgen_test]
fn cards_render_detached() {
	web_log_::init();
	let document = document().unwrap();
	let items = items();

	let card = render::card(&document, &config(), 7, &items[1]).unwrap();
	assert!(card.parent_node().is_none());
	assert!(card.class_list().contains("movie-card"));
	assert_eq!(card.get_attribute("data-index").as_deref(), Some("7"));
	let mut tags = Vec::new();
	let mut child = card.first_element_child();
	while let Some(element) = child {
		tags.push(element.tag_name());
		child = element.next_element_sibling();
	}
	assert_eq!(tags, vec!["IMG", "DIV", "DIV"]);
	assert_eq!(text(&card, ".movie-info h2"), "Some Series");
	assert_eq!(text(&card, ".overview-and-language h3"), "Overview");
	assert_eq!(text(&card, ".language"), "ja");
	assert_eq!(qs("img.dp", &card).unwrap().unwrap().get_attribute("alt").as_deref(), Some("Some Series"));
}

#[wasm_bindgen_test]
fn cards_are_rebuilt_from_scratch() {
	let (document, container) = page();
	let controller = CatalogController::mount(document, config()).unwrap();
	let main = &controller.mounts().main;

	controller.show_items(items()).unwrap();
	controller.show_items(items()).unwrap();

	let cards = qsa(".movie-card", main).unwrap();
	assert_eq!(cards.len(), 2);
	assert_eq!(cards[1].get_attribute("data-index").as_deref(), Some("1"));

	let first: HtmlElement = cards[0].clone().dyn_into().unwrap();
	assert_eq!(text(&first, ".movie-info h2"), "First Film");
	assert_eq!(text(&first, ".movie-info span.green"), "8.50");
	assert_eq!(text(&first, ".language"), "en");
	assert_eq!(text(&first, ".release-date h4"), "Release date: ");
	assert_eq!(text(&first, ".release-date p"), "2021-02-03");
	assert_eq!(text(&first, ".description"), "<b>Not markup.</b>");
	assert!(qs("b", &first).unwrap().is_none());
	assert_eq!(
		qs("img.dp", &first).unwrap().unwrap().get_attribute("src").as_deref(),
		Some("https://image.tmdb.org/t/p/w500/first.jpg")
	);

	let second: HtmlElement = cards[1].clone().dyn_into().unwrap();
	assert_eq!(text(&second, ".movie-info h2"), "Some Series");
	assert_eq!(text(&second, ".movie-info span.orange"), "6.00");
	assert_eq!(text(&second, ".release-date h4"), "First Air Date: ");

	drop(controller);
	container.remove();
}

#[wasm_bindgen_test]
async fn popup_shows_details_and_genres() {
	let (document, container) = page();
	let controller = CatalogController::mount(document, config().with_popup_delay_ms(10)).unwrap();
	controller.set_genres(genres());
	controller.show_items(items()).unwrap();

	controller.open_popup(1).unwrap();
	let section = controller.mounts().section.clone();
	let popup = qs(".popup", &section).unwrap().unwrap();
	assert_eq!(text(&popup, ".movie-info h2"), "Some Series");
	assert_eq!(text(&popup, "#rating"), "6.00");
	assert_eq!(
		qs(".image img", &popup).unwrap().unwrap().get_attribute("src").as_deref(),
		Some("https://image.tmdb.org/t/p/w500/series-wide.jpg")
	);
	assert_eq!(text(&popup, "button"), "Add to Watchlist +");
	let genre_names: Vec<_> = qsa(".genre .genre-text", &popup).unwrap().iter().filter_map(|genre| genre.text_content()).collect();
	assert_eq!(genre_names, vec!["Drama"]);

	assert!(has_active(&controller.mounts().blur));
	assert!(!has_active(&popup), "The popup is activated after a delay.");
	sleep(0.1).await.unwrap();
	assert!(has_active(&popup));

	controller.close_popup().unwrap();
	assert!(!has_active(&controller.mounts().blur));
	assert!(!has_active(&popup));

	drop(controller);
	container.remove();
}

#[wasm_bindgen_test]
async fn closing_before_the_delay_keeps_the_popup_inactive() {
	let (document, container) = page();
	let controller = CatalogController::mount(document, config().with_popup_delay_ms(50)).unwrap();
	controller.show_items(items()).unwrap();

	controller.open_popup(0).unwrap();
	controller.close_popup().unwrap();
	sleep(0.15).await.unwrap();

	let popup = qs(".popup", &controller.mounts().section).unwrap().unwrap();
	assert!(!has_active(&popup));
	assert!(!has_active(&controller.mounts().blur));

	drop(controller);
	container.remove();
}

#[wasm_bindgen_test]
async fn clicks_are_delegated() {
	let (document, container) = page();
	let controller = CatalogController::mount(document.clone(), config().with_popup_delay_ms(0)).unwrap();
	controller.set_genres(genres());
	controller.show_items(items()).unwrap();

	let card_image: HtmlElement = qsa(".movie-card .dp", &controller.mounts().main).unwrap()[0].clone().dyn_into().unwrap();
	card_image.click();

	let popup = qs(".popup", &controller.mounts().section).unwrap().unwrap();
	assert_eq!(text(&popup, ".movie-info h2"), "First Film");
	let genre_names: Vec<_> = qsa(".genre-text", &popup).unwrap().iter().filter_map(|genre| genre.text_content()).collect();
	assert_eq!(genre_names, vec!["Action", "Unknown"]);
	assert!(has_active(&controller.mounts().blur));
	sleep(0.05).await.unwrap();
	assert!(has_active(&popup));

	document.body().unwrap().click();
	assert!(!has_active(&controller.mounts().blur));
	assert!(!has_active(&popup));

	qs("#tv", &container).unwrap().unwrap().click();
	assert_eq!(controller.category(), Some(Category::Tv));
	assert_eq!(controller.mounts().toggle.style().get_property_value("left").unwrap(), "110px");

	qs("#movies", &container).unwrap().unwrap().click();
	assert_eq!(controller.category(), Some(Category::Movies));
	assert_eq!(controller.mounts().toggle.style().get_property_value("left").unwrap(), "0px");

	drop(controller);
	container.remove();
}

#[wasm_bindgen_test]
async fn failed_requests_show_a_notice() {
	let (document, container) = page();
	let controller = CatalogController::mount(document, config()).unwrap();
	controller.show_category(Category::Tv);

	let main = controller.mounts().main.clone();
	for _ in 0..50 {
		if qs("p.error", &main).unwrap().is_some() {
			break;
		}
		sleep(0.1).await.unwrap();
	}
	let notice = qs("p.error", &main).unwrap().expect("No error notice after 5 seconds.");
	assert!(notice.text_content().unwrap().starts_with("Could not load the catalog: "));
	assert!(!notice.text_content().unwrap().contains("TEST-KEY"));

	drop(controller);
	container.remove();
}

#[wasm_bindgen_test]
async fn superseded_responses_are_discarded() {
	let (document, container) = page();
	let controller = CatalogController::mount(document, config()).unwrap();

	// The request fails, but arrives after newer items were shown.
	controller.show_category(Category::Tv);
	controller.show_items(items()).unwrap();
	sleep(2.0).await.unwrap();

	let main = &controller.mounts().main;
	assert!(qs("p.error", main).unwrap().is_none());
	assert_eq!(qsa(".movie-card", main).unwrap().len(), 2);
	assert_eq!(controller.category(), Some(Category::Tv));

	drop(controller);
	container.remove();
}

#[wasm_bindgen_test]
fn dropped_controllers_stop_listening() {
	let (document, container) = page();
	let controller = CatalogController::mount(document, config()).unwrap();
	let toggle = controller.mounts().toggle.clone();
	drop(controller);

	qs("#tv", &container).unwrap().unwrap().click();
	assert_eq!(toggle.style().get_property_value("left").unwrap(), "");

	container.remove();
}
