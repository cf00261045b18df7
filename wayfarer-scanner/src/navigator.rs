// Interactive steps of the map page script: clicking, tab switching, scrolling.

use crate::error::Result;
use crate::session::{BrowserSession, ScrollTechnique};
use serde_json::Value;
use std::time::Duration;
use tracing::{debug, info, warn};

/// Sleeps between browser actions and the fixed scroll count.
///
/// The page renders asynchronously, so each interactive step waits a fixed
/// time instead of polling for content.
#[derive(Debug, Clone)]
pub struct Pacing {
    pub page_load: Duration,
    pub before_results: Duration,
    pub after_result_click: Duration,
    pub before_reviews_tab: Duration,
    pub after_reviews_tab: Duration,
    pub share_dialog: Duration,
    pub dialog_close: Duration,
    pub scroll_pause: Duration,
    pub scroll_iterations: usize,
    pub expand_click: Duration,
}

impl Default for Pacing {
    fn default() -> Self {
        Self {
            page_load: Duration::from_secs(5),
            before_results: Duration::from_secs(5),
            after_result_click: Duration::from_secs(3),
            before_reviews_tab: Duration::from_secs(5),
            after_reviews_tab: Duration::from_secs(3),
            share_dialog: Duration::from_secs(2),
            dialog_close: Duration::from_secs(1),
            scroll_pause: Duration::from_millis(1500),
            scroll_iterations: 8,
            expand_click: Duration::from_millis(200),
        }
    }
}

impl Pacing {
    /// No waiting at all, same number of scroll iterations.
    pub fn immediate() -> Self {
        Self {
            page_load: Duration::ZERO,
            before_results: Duration::ZERO,
            after_result_click: Duration::ZERO,
            before_reviews_tab: Duration::ZERO,
            after_reviews_tab: Duration::ZERO,
            share_dialog: Duration::ZERO,
            dialog_close: Duration::ZERO,
            scroll_pause: Duration::ZERO,
            expand_click: Duration::ZERO,
            ..Self::default()
        }
    }

    pub fn with_scroll_iterations(mut self, iterations: usize) -> Self {
        self.scroll_iterations = iterations;
        self
    }
}

pub const BUSINESS_RESULT_SELECTORS: &[&str] = &[
    r#"a[href*="maps/place"]"#,
    r#"div[role="article"]"#,
    "div.V0h1Ob-haAclf",
    "div.Nv2PK",
];

pub const REVIEW_TAB_SELECTORS: &[&str] = &[
    r#"button[aria-label*="review"]"#,
    r#"button[data-tab*="review"]"#,
    r#"div[role="tab"][aria-label*="review"]"#,
    r#"button[jsaction*="reviewsAction"]"#,
    "button.hh2c6",
    r#"[role="tab"]:nth-child(2)"#,
];

pub const SCROLL_CONTAINER_SELECTORS: &[&str] = &[
    r#"div[role="feed"]"#,
    r#"div.m6QErb[aria-label*="review"]"#,
    "div.m6QErb.DxyBCb.kA9KIf",
    r#"div[aria-label*="review"][role="region"]"#,
    "div.m6QErb",
    "div.DxyBCb.kA9KIf",
];

/// Review nodes a scroll container has to hold to be picked.
const REVIEW_CHILD_SELECTOR: &str = "div.jftiEf, div[data-review-id]";

pub const MORE_BUTTON_SELECTORS: &[&str] = &[
    r#"button[aria-label="More"]"#,
    "button.w8nwRe",
    "button.ysrH9e",
    r#"button[jsaction*="expand"]"#,
];

const REVIEWS_TAB_BY_TEXT_JS: &str = r#"(() => {
    const elements = document.querySelectorAll('button, div[role="tab"]');
    for (const el of elements) {
        if (el.textContent.toLowerCase().includes('review') || el.textContent.includes('クチコミ')) {
            el.click();
            return true;
        }
    }
    return false;
})()"#;

/// Quotes a string as a JavaScript literal.
fn js_literal(value: &str) -> String {
    Value::from(value).to_string()
}

fn truthy(value: &Value) -> bool {
    match value {
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|n| n != 0.0),
        Value::String(s) => !s.is_empty(),
        Value::Null => false,
        _ => true,
    }
}

pub fn element_exists(session: &dyn BrowserSession, selector: &str) -> Result<bool> {
    let script = format!("document.querySelector({}) !== null", js_literal(selector));
    Ok(truthy(&session.evaluate(&script)?))
}

/// Clicks the first displayed element matching `selector` through JavaScript.
pub fn click_first_visible(session: &dyn BrowserSession, selector: &str) -> Result<bool> {
    let script = format!(
        "(() => {{ const el = Array.from(document.querySelectorAll({})).find(e => e.offsetParent !== null); if (!el) return false; el.click(); return true; }})()",
        js_literal(selector)
    );
    Ok(truthy(&session.evaluate(&script)?))
}

/// Clicks the first displayed element that has not been clicked by this helper
/// before, marking it so later calls move on to the next one.
fn click_next_unvisited(session: &dyn BrowserSession, selector: &str) -> Result<bool> {
    let script = format!(
        "(() => {{ const el = Array.from(document.querySelectorAll({})).find(e => e.offsetParent !== null && !e.dataset.wayfarerClicked); if (!el) return false; el.dataset.wayfarerClicked = '1'; el.click(); return true; }})()",
        js_literal(selector)
    );
    Ok(truthy(&session.evaluate(&script)?))
}

/// Clicks the first element matching `selector` whose visible text contains `needle`.
fn click_containing_text(
    session: &dyn BrowserSession,
    selector: &str,
    needle: &str,
) -> Result<bool> {
    let script = format!(
        "(() => {{ const el = Array.from(document.querySelectorAll({})).find(e => (e.innerText || '').toLowerCase().includes({})); if (!el) return false; el.click(); return true; }})()",
        js_literal(selector),
        js_literal(needle)
    );
    Ok(truthy(&session.evaluate(&script)?))
}

/// Value of the first input matching `selector`.
pub fn input_value(session: &dyn BrowserSession, selector: &str) -> Result<Option<String>> {
    let script = format!(
        "(() => {{ const el = document.querySelector({}); return el ? el.value : null; }})()",
        js_literal(selector)
    );
    Ok(match session.evaluate(&script)? {
        Value::String(s) if !s.is_empty() => Some(s),
        _ => None,
    })
}

/// Opens the first search result so the place panel is shown.
pub fn click_first_result(session: &dyn BrowserSession, pacing: &Pacing) -> Result<bool> {
    info!("Looking for the first business result...");
    session.pause(pacing.before_results);

    for selector in BUSINESS_RESULT_SELECTORS {
        match session.click(selector) {
            Ok(true) => {
                info!("Clicked first business with selector: {}", selector);
                session.pause(pacing.after_result_click);
                return Ok(true);
            }
            Ok(false) => continue,
            Err(e) => {
                warn!("Error with selector {}: {}", selector, e);
                continue;
            }
        }
    }

    info!("Could not find any business listings");
    Ok(false)
}

pub fn open_reviews_tab(session: &dyn BrowserSession, pacing: &Pacing) -> Result<bool> {
    info!("Attempting to click on reviews tab...");
    session.pause(pacing.before_reviews_tab);

    match session.evaluate(REVIEWS_TAB_BY_TEXT_JS) {
        Ok(clicked) if truthy(&clicked) => {
            info!("Clicked reviews tab by its text");
            session.pause(pacing.after_reviews_tab);
            return Ok(true);
        }
        Ok(_) => {}
        Err(e) => warn!("Text search for reviews tab failed: {}", e),
    }

    for selector in REVIEW_TAB_SELECTORS {
        match click_containing_text(session, selector, "review") {
            Ok(true) => {
                info!("Clicked reviews tab with selector: {}", selector);
                session.pause(pacing.after_reviews_tab);
                return Ok(true);
            }
            Ok(false) => continue,
            Err(e) => {
                warn!("Error with selector {}: {}", selector, e);
                continue;
            }
        }
    }

    info!("Could not find reviews tab");
    Ok(false)
}

/// Selector for the first candidate container that holds review nodes, or
/// `body` when none does.
pub fn find_scroll_container(session: &dyn BrowserSession) -> String {
    for selector in SCROLL_CONTAINER_SELECTORS {
        let candidate = format!("{}:has({})", selector, REVIEW_CHILD_SELECTOR);
        match element_exists(session, &candidate) {
            Ok(true) => {
                debug!("Found scroll container with selector: {}", selector);
                return candidate;
            }
            Ok(false) => continue,
            Err(e) => {
                warn!("Error finding scroll container with selector {}: {}", selector, e);
                continue;
            }
        }
    }
    info!("Could not find scroll container, using body element");
    "body".to_string()
}

/// Scrolls the review list a fixed number of times.
///
/// Every technique runs on every iteration regardless of whether the previous
/// one moved anything; individual technique failures are ignored.
pub fn scroll_reviews(session: &dyn BrowserSession, pacing: &Pacing) -> Result<usize> {
    info!("Starting to scroll through reviews...");
    let container = find_scroll_container(session);

    for i in 0..pacing.scroll_iterations {
        debug!("Scrolling {}/{}...", i + 1, pacing.scroll_iterations);
        for technique in ScrollTechnique::ALL {
            if let Err(e) = session.scroll(&container, technique) {
                debug!("Scroll technique {:?} failed: {}", technique, e);
            }
        }
        session.pause(pacing.scroll_pause);
    }
    Ok(pacing.scroll_iterations)
}

// Upper bound on clicks per selector in case a page keeps re-rendering buttons.
const MAX_EXPAND_CLICKS: usize = 500;

/// Clicks every displayed "More" button once. Returns how many were clicked.
pub fn expand_reviews(session: &dyn BrowserSession, pacing: &Pacing) -> Result<usize> {
    info!("Attempting to expand all reviews...");
    let mut total_clicked = 0;

    for selector in MORE_BUTTON_SELECTORS {
        let mut clicked = 0;
        while clicked < MAX_EXPAND_CLICKS {
            match click_next_unvisited(session, selector) {
                Ok(true) => {
                    clicked += 1;
                    session.pause(pacing.expand_click);
                }
                Ok(false) => break,
                Err(e) => {
                    warn!("Error with selector {}: {}", selector, e);
                    break;
                }
            }
        }
        if clicked > 0 {
            debug!("Clicked {} 'More' buttons with selector: {}", clicked, selector);
        }
        total_clicked += clicked;
    }

    info!("Expanded {} reviews", total_clicked);
    Ok(total_clicked)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_js_literal_escapes_quotes() {
        assert_eq!(
            js_literal(r#"button[aria-label="More"]"#),
            r#""button[aria-label=\"More\"]""#
        );
    }

    #[test]
    fn test_truthy() {
        assert!(truthy(&Value::Bool(true)));
        assert!(!truthy(&Value::Bool(false)));
        assert!(!truthy(&Value::Null));
        assert!(truthy(&Value::from(2)));
        assert!(!truthy(&Value::from("")));
    }

    #[test]
    fn test_immediate_pacing_keeps_iterations() {
        let pacing = Pacing::immediate();
        assert_eq!(pacing.scroll_iterations, Pacing::default().scroll_iterations);
        assert!(pacing.page_load.is_zero());
    }
}
