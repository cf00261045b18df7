//! Parser for the prefecture "best 100" listing pages.

use crate::strategy::parse_selector;
use regex::Regex;
use scraper::{ElementRef, Html};
use serde::{Deserialize, Serialize};
use std::sync::LazyLock;
use tracing::debug;

static COUNT_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\((\d+)\)").expect("valid count regex"));

static TITLE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(\w+)'s best 100").expect("valid title regex"));

const CATEGORY_SPAN_SELECTOR: &str = r#"span[style*="color:#22AA22"]"#;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ListedPlace {
    pub name: String,
    /// Empty when the row has no location cell.
    pub location: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoryRecord {
    pub name: String,
    /// Count declared in the legend, 0 when absent. Not checked against `places`.
    pub count: u32,
    pub places: Vec<ListedPlace>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Top100Page {
    /// Empty when the title does not name a prefecture.
    pub prefecture: String,
    /// Categories in page order.
    pub categories: Vec<CategoryRecord>,
}

impl Top100Page {
    pub fn category(&self, name: &str) -> Option<&CategoryRecord> {
        self.categories.iter().find(|c| c.name == name)
    }

    pub fn place_count(&self) -> usize {
        self.categories.iter().map(|c| c.places.len()).sum()
    }

    /// Later categories with an existing name replace the earlier entry,
    /// keeping its position.
    fn insert(&mut self, category: CategoryRecord) {
        match self.categories.iter_mut().find(|c| c.name == category.name) {
            Some(existing) => *existing = category,
            None => self.categories.push(category),
        }
    }
}

pub fn parse_top100(html: &str) -> Top100Page {
    let document = Html::parse_document(html);
    let mut page = Top100Page {
        prefecture: prefecture_name(&document),
        categories: Vec::new(),
    };

    let (Some(fieldset), Some(legend), Some(span), Some(row), Some(cell)) = (
        parse_selector("fieldset"),
        parse_selector("legend"),
        parse_selector(CATEGORY_SPAN_SELECTOR),
        parse_selector("tr"),
        parse_selector("td"),
    ) else {
        return page;
    };

    for set in document.select(&fieldset) {
        let Some(legend_el) = set.select(&legend).next() else {
            continue;
        };
        let Some(span_el) = legend_el.select(&span).next() else {
            continue;
        };

        let name = text_of(span_el);
        let count = COUNT_RE
            .captures(&text_of(legend_el))
            .and_then(|caps| caps[1].parse().ok())
            .unwrap_or(0);

        let mut places = Vec::new();
        for tr in set.select(&row) {
            let cells: Vec<ElementRef<'_>> = tr.select(&cell).collect();
            let Some(first) = cells.first() else {
                continue;
            };
            let place_text = text_of(*first);
            if place_text.contains(',') {
                places.extend(
                    place_text
                        .split(',')
                        .map(str::trim)
                        .map(|item| ListedPlace {
                            name: item.to_string(),
                            location: String::new(),
                        }),
                );
            } else {
                let location = cells.get(1).map(|c| text_of(*c)).unwrap_or_default();
                places.push(ListedPlace {
                    name: place_text,
                    location,
                });
            }
        }

        debug!("Category {} ({}): {} places", name, count, places.len());
        page.insert(CategoryRecord {
            name,
            count,
            places,
        });
    }

    page
}

fn prefecture_name(document: &Html) -> String {
    parse_selector("title")
        .and_then(|title| document.select(&title).next())
        .and_then(|title| {
            TITLE_RE
                .captures(text_of(title).as_str())
                .map(|caps| caps[1].to_string())
        })
        .unwrap_or_default()
}

fn text_of(element: ElementRef<'_>) -> String {
    element.text().collect::<String>().trim().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_prefecture_from_title() {
        let page = parse_top100("<html><head><title>Kyoto's best 100 spots</title></head></html>");
        assert_eq!(page.prefecture, "Kyoto");
    }

    #[test]
    fn test_missing_title_gives_empty_prefecture() {
        let page = parse_top100("<html><body></body></html>");
        assert_eq!(page.prefecture, "");
        assert!(page.categories.is_empty());
    }

    #[test]
    fn test_fieldset_without_green_span_is_ignored() {
        let page = parse_top100(
            r#"<fieldset><legend><span style="color:#000000">Other</span> (2)</legend>
               <table><tr><td>A</td></tr></table></fieldset>"#,
        );
        assert!(page.categories.is_empty());
    }

    #[test]
    fn test_missing_count_is_zero() {
        let page = parse_top100(
            r#"<fieldset><legend><span style="color:#22AA22">Parks</span></legend>
               <table><tr><td>Ueno Park</td><td>Taito</td></tr></table></fieldset>"#,
        );
        let parks = page.category("Parks").unwrap();
        assert_eq!(parks.count, 0);
        assert_eq!(
            parks.places,
            vec![ListedPlace {
                name: "Ueno Park".into(),
                location: "Taito".into()
            }]
        );
    }
}
