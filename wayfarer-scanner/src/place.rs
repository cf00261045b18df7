// Place details from a rendered map page snapshot

use crate::result::PlaceRecord;
use crate::strategy::{first_match, first_text, non_empty};
use regex::Regex;
use scraper::Html;
use std::sync::LazyLock;
use tracing::debug;

static REVIEW_COUNT_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(\d+(?:,\d+)*)").expect("valid review count regex"));

pub const NAME_SELECTORS: &[&str] = &["h1.DUwDvf", "h1.fontHeadlineLarge", "div.P5Bobd"];

pub const ADDRESS_SELECTORS: &[&str] = &[
    r#"button[data-item-id="address"]"#,
    "span.desktop-more-info-widget-place-address",
];

pub const PHONE_SELECTORS: &[&str] = &[r#"button[data-item-id*="phone"]"#, "span.QSFF4-text"];

pub const WEBSITE_SELECTORS: &[&str] = &[
    r#"a[data-item-id*="authority"]"#,
    r#"a[jsaction*="website"]"#,
];

pub const RATING_SELECTORS: &[&str] = &["div.F7nice", "span.ceNzKf", "span.rW3L9c"];

pub const REVIEW_COUNT_SELECTORS: &[&str] = &["span.F7nice", "span.r-i7DoTkIFmMnw", "span.DkEaL"];

pub const CATEGORY_SELECTORS: &[&str] = &[
    "div.Io6YTe",
    "span.YhemCb",
    r#"button[jsaction*="category"]"#,
];

/// Reads the place details panel. Fields with no match keep their placeholder.
/// Coordinates are resolved separately and left unset here.
pub fn extract_place_info(document: &Html) -> PlaceRecord {
    let root = document.root_element();
    let mut place = PlaceRecord::default();

    if let Some(name) = first_text(root, NAME_SELECTORS) {
        place.name = name;
    }
    if let Some(address) = first_text(root, ADDRESS_SELECTORS) {
        place.address = address;
    }
    if let Some(phone) = first_text(root, PHONE_SELECTORS) {
        place.phone = phone;
    }
    if let Some(website) = first_match(root, WEBSITE_SELECTORS, |matched| {
        matched[0].value().attr("href").map(str::to_string).and_then(non_empty)
    }) {
        place.website = website;
    }
    if let Some(rating) = first_text(root, RATING_SELECTORS) {
        place.rating = rating;
    }
    if let Some(text) = first_text(root, REVIEW_COUNT_SELECTORS) {
        place.total_reviews = review_count(&text);
    }
    if let Some(categories) = first_text(root, CATEGORY_SELECTORS) {
        place.categories = categories;
    }

    debug!("Extracted place info for {:?}", place.name);
    place
}

/// Pulls the first grouped number out of a review-count label, or keeps the
/// label as-is when it has none.
pub fn review_count(text: &str) -> String {
    REVIEW_COUNT_RE
        .captures(text)
        .map(|caps| caps[1].to_string())
        .unwrap_or_else(|| text.to_string())
}
