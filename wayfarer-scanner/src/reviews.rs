use crate::result::{NOT_AVAILABLE, ReviewRecord, UNKNOWN};
use crate::strategy::{Chain, first_match, first_text, inner_text, non_empty, parse_selector};
use regex::Regex;
use scraper::{ElementRef, Html};
use std::sync::LazyLock;
use tracing::{debug, info};

static DIGITS_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"(\d+)").expect("valid digits regex"));

pub const REVIEW_NODE_SELECTORS: &[&str] = &[
    "div[data-review-id]",
    "div.jftiEf",
    "div.gws-localreviews__google-review",
];

pub const REVIEWER_SELECTORS: &[&str] = &[
    "div.d4r55",
    "div.TSUbDb",
    "span.x3AX1-LfntMc-header-title-title",
    "a.DHIhE",
    "div.Tfgpc",
];

pub const REVIEW_TEXT_SELECTORS: &[&str] = &[
    r#"span[class*="fontBodyMedium"]"#,
    "span.wiI7pd",
    "div.MyEned",
    "span.review-full-text",
    "div.Jtu6Td",
];

pub const REVIEW_DATE_SELECTORS: &[&str] = &["span.rsqaWe", "span.dehysf", "span.xRkPPb"];

/// Scrapes every review node on the page, in DOM order.
///
/// Returns `None` when no review node selector matched anything.
pub fn extract_reviews(document: &Html) -> Option<Vec<ReviewRecord>> {
    let nodes = first_match(document.root_element(), REVIEW_NODE_SELECTORS, Some)?;
    info!("Found {} review nodes", nodes.len());

    let rating = rating_chain();
    let reviews = nodes
        .into_iter()
        .enumerate()
        .map(|(idx, node)| {
            debug!("Processing review {}", idx + 1);
            extract_review(node, &rating)
        })
        .collect();
    Some(reviews)
}

fn extract_review<'a>(node: ElementRef<'a>, rating: &Chain<ElementRef<'a>, String>) -> ReviewRecord {
    ReviewRecord {
        reviewer: first_text(node, REVIEWER_SELECTORS).unwrap_or_else(|| UNKNOWN.to_string()),
        rating: rating
            .resolve(&node)
            .unwrap_or_else(|| NOT_AVAILABLE.to_string()),
        date: first_text(node, REVIEW_DATE_SELECTORS).unwrap_or_else(|| NOT_AVAILABLE.to_string()),
        text: review_text(node).unwrap_or_default(),
    }
}

fn rating_chain<'a>() -> Chain<ElementRef<'a>, String> {
    Chain::new("review rating")
        .then("aria-label", rating_from_aria_label)
        .then("star count", rating_from_stars)
}

/// First number in the aria-label of a star image, e.g. "4 stars".
fn rating_from_aria_label(node: &ElementRef<'_>) -> Option<String> {
    let selector = parse_selector(r#"span[role="img"]"#)?;
    node.select(&selector)
        .filter_map(|el| el.value().attr("aria-label"))
        .find_map(|label| DIGITS_RE.captures(label).map(|caps| caps[1].to_string()))
}

/// Number of filled star icons, when the review renders stars as images.
fn rating_from_stars(node: &ElementRef<'_>) -> Option<String> {
    let selector = parse_selector(r#"img[src*="star_"]"#)?;
    let stars: Vec<_> = node.select(&selector).collect();
    if stars.is_empty() {
        return None;
    }
    let filled = stars
        .iter()
        .filter(|star| {
            star.value()
                .attr("src")
                .is_some_and(|src| src.contains("star_fill"))
        })
        .count();
    Some(filled.to_string())
}

fn review_text(node: ElementRef<'_>) -> Option<String> {
    first_match(node, REVIEW_TEXT_SELECTORS, |matched| {
        let joined = matched
            .into_iter()
            .map(inner_text)
            .filter(|text| !text.is_empty())
            .collect::<Vec<_>>()
            .join(" ");
        non_empty(joined)
    })
    .or_else(|| fallback_text(node))
}

/// Last resort: everything after the first two lines, which usually hold the
/// reviewer name and rating.
fn fallback_text(node: ElementRef<'_>) -> Option<String> {
    let full = inner_text(node);
    let lines: Vec<&str> = full.split('\n').collect();
    if lines.len() > 2 {
        non_empty(lines[2..].join(" "))
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn review(html: &str) -> ReviewRecord {
        let document = Html::parse_document(html);
        let mut reviews = extract_reviews(&document).expect("review nodes");
        reviews.remove(0)
    }

    #[test]
    fn test_rating_prefers_aria_label() {
        let r = review(
            r#"<div data-review-id="1"><span role="img" aria-label="4 stars"></span>
               <img src="/star_fill.png"><img src="/star_fill.png"></div>"#,
        );
        assert_eq!(r.rating, "4");
    }

    #[test]
    fn test_rating_falls_back_to_star_count() {
        let r = review(
            r#"<div class="jftiEf"><img src="/star_fill.png"><img src="/star_fill.png">
               <img src="/star_empty.png"></div>"#,
        );
        assert_eq!(r.rating, "2");
    }

    #[test]
    fn test_fallback_text_skips_two_lines() {
        let r = review(
            r#"<div class="jftiEf"><p>Jane</p><p>5 stars</p><p>Great view</p><p>Worth it</p></div>"#,
        );
        assert_eq!(r.text, "Great view Worth it");
        assert_eq!(r.reviewer, UNKNOWN);
        assert_eq!(r.date, NOT_AVAILABLE);
    }
}
