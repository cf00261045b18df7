//! Ordered fallback chains.
//!
//! Every extraction step on a map page is a list of lookups tried in priority
//! order. The first one that produces a value wins and the rest are never run.

use scraper::{ElementRef, Selector};
use tracing::{debug, warn};

/// A single named lookup over some context.
pub struct Attempt<C: ?Sized, T> {
    pub name: &'static str,
    pub run: fn(&C) -> Option<T>,
}

/// Named, ordered list of attempts resolving one field.
pub struct Chain<C: ?Sized, T> {
    field: &'static str,
    attempts: Vec<Attempt<C, T>>,
}

impl<C: ?Sized, T> Chain<C, T> {
    pub fn new(field: &'static str) -> Self {
        Self {
            field,
            attempts: Vec::new(),
        }
    }

    pub fn then(mut self, name: &'static str, run: fn(&C) -> Option<T>) -> Self {
        self.attempts.push(Attempt { name, run });
        self
    }

    pub fn len(&self) -> usize {
        self.attempts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.attempts.is_empty()
    }

    /// Runs the attempts in order, stopping at the first success.
    pub fn resolve(&self, ctx: &C) -> Option<T> {
        for attempt in &self.attempts {
            if let Some(value) = (attempt.run)(ctx) {
                debug!("{} resolved by {}", self.field, attempt.name);
                return Some(value);
            }
        }
        debug!("{}: all {} strategies exhausted", self.field, self.attempts.len());
        None
    }
}

/// Tries each CSS selector in order and returns the first value `extract`
/// produces from the elements it matches under `scope`.
///
/// Selectors that fail to parse are skipped.
pub fn first_match<'a, T>(
    scope: ElementRef<'a>,
    selectors: &[&str],
    mut extract: impl FnMut(Vec<ElementRef<'a>>) -> Option<T>,
) -> Option<T> {
    for raw in selectors {
        let Some(selector) = parse_selector(raw) else {
            continue;
        };
        let matched: Vec<ElementRef<'a>> = scope.select(&selector).collect();
        if matched.is_empty() {
            continue;
        }
        if let Some(value) = extract(matched) {
            return Some(value);
        }
    }
    None
}

/// Text of the first element matched by the first selector with a non-empty result.
pub fn first_text(scope: ElementRef<'_>, selectors: &[&str]) -> Option<String> {
    first_match(scope, selectors, |matched| non_empty(inner_text(matched[0])))
}

pub fn parse_selector(raw: &str) -> Option<Selector> {
    match Selector::parse(raw) {
        Ok(selector) => Some(selector),
        Err(e) => {
            warn!("Skipping unparsable selector {:?}: {}", raw, e);
            None
        }
    }
}

/// Rendered-ish text of an element: its trimmed text nodes, one per line.
pub fn inner_text(element: ElementRef<'_>) -> String {
    element
        .text()
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .collect::<Vec<_>>()
        .join("\n")
}

pub fn non_empty(value: String) -> Option<String> {
    if value.trim().is_empty() {
        None
    } else {
        Some(value)
    }
}
