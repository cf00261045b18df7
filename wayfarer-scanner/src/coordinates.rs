// Latitude/longitude of the place currently shown on a map page.

use crate::navigator::{Pacing, click_first_visible, input_value};
use crate::result::Coordinates;
use crate::session::BrowserSession;
use crate::strategy::{Chain, parse_selector};
use regex::Regex;
use scraper::Html;
use serde_json::Value;
use std::sync::LazyLock;
use tracing::{debug, info, warn};

static URL_COORDS_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"@(-?\d+\.\d+),(-?\d+\.\d+)").expect("valid url coordinate regex")
});

static SCRIPT_OBJECT_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(\{[^{}]*"latitude"[^{}]*\})"#).expect("valid script object regex")
});

static SOURCE_COORDS_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#""latitude":(-?\d+\.\d+),"longitude":(-?\d+\.\d+)"#)
        .expect("valid page source coordinate regex")
});

pub const SHARE_BUTTON_SELECTORS: &[&str] = &[
    r#"button[aria-label*="Share"]"#,
    r#"button[jsaction*="share"]"#,
    r#"button[data-value="Share"]"#,
];

pub const SHARE_URL_INPUT_SELECTORS: &[&str] = &[r#"input[aria-label*="Copy link"]"#, "input.vrsrZe"];

const CLOSE_DIALOG_SELECTOR: &str = r#"button[aria-label="Close"]"#;

/// What the coordinate strategies can look at.
pub struct CoordinateContext<'a> {
    pub session: &'a dyn BrowserSession,
    pub pacing: &'a Pacing,
}

/// The four coordinate strategies, cheapest first.
pub fn coordinate_chain<'a>() -> Chain<CoordinateContext<'a>, Coordinates> {
    Chain::new("coordinates")
        .then("url", from_current_url)
        .then("script metadata", from_script_metadata)
        .then("share dialog", from_share_dialog)
        .then("page source", from_page_source)
}

/// Resolves coordinates, or returns both fields unset when every strategy fails.
pub fn extract_coordinates(session: &dyn BrowserSession, pacing: &Pacing) -> Coordinates {
    info!("Trying to extract coordinates...");
    let ctx = CoordinateContext { session, pacing };
    match coordinate_chain()
        .resolve(&ctx)
        .filter(Coordinates::is_resolved)
    {
        Some(coordinates) => {
            info!(
                "Extracted coordinates: {}, {}",
                coordinates.latitude.as_deref().unwrap_or_default(),
                coordinates.longitude.as_deref().unwrap_or_default()
            );
            coordinates
        }
        None => {
            info!("Could not extract coordinates using any method");
            Coordinates::default()
        }
    }
}

/// `@lat,lng` segment of a map URL.
pub fn coordinates_in_url(url: &str) -> Option<Coordinates> {
    URL_COORDS_RE
        .captures(url)
        .map(|caps| Coordinates::new(&caps[1], &caps[2]))
}

/// First flat JSON object inside a `<script>` that carries both keys.
pub fn coordinates_in_scripts(document: &Html) -> Option<Coordinates> {
    let selector = parse_selector("script")?;
    document.select(&selector).find_map(|script| {
        let content: String = script.text().collect();
        if !(content.contains("latitude") && content.contains("longitude")) {
            return None;
        }
        let object = SCRIPT_OBJECT_RE.captures(&content)?;
        let data: Value = serde_json::from_str(&object[1]).ok()?;
        Some(Coordinates::new(
            json_scalar(data.get("latitude")?),
            json_scalar(data.get("longitude")?),
        ))
    })
}

/// `"latitude":..,"longitude":..` pair anywhere in raw page source.
pub fn coordinates_in_source(source: &str) -> Option<Coordinates> {
    SOURCE_COORDS_RE
        .captures(source)
        .map(|caps| Coordinates::new(&caps[1], &caps[2]))
}

fn json_scalar(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

fn from_current_url(ctx: &CoordinateContext<'_>) -> Option<Coordinates> {
    let url = ctx.session.current_url();
    debug!("Current URL: {}", url);
    coordinates_in_url(&url)
}

fn from_script_metadata(ctx: &CoordinateContext<'_>) -> Option<Coordinates> {
    match ctx.session.page_source() {
        Ok(source) => coordinates_in_scripts(&Html::parse_document(&source)),
        Err(e) => {
            warn!("Error extracting coordinates from metadata: {}", e);
            None
        }
    }
}

fn from_share_dialog(ctx: &CoordinateContext<'_>) -> Option<Coordinates> {
    for button in SHARE_BUTTON_SELECTORS {
        match click_first_visible(ctx.session, button) {
            Ok(true) => {}
            Ok(false) => continue,
            Err(e) => {
                warn!("Error clicking share button {}: {}", button, e);
                continue;
            }
        }
        debug!("Opened share dialog with {}", button);
        ctx.session.pause(ctx.pacing.share_dialog);

        for input in SHARE_URL_INPUT_SELECTORS {
            let Ok(Some(share_url)) = input_value(ctx.session, input) else {
                continue;
            };
            debug!("Share URL: {}", share_url);
            if let Some(coordinates) = coordinates_in_url(&share_url) {
                close_share_dialog(ctx);
                return Some(coordinates);
            }
        }
    }
    None
}

fn close_share_dialog(ctx: &CoordinateContext<'_>) {
    match click_first_visible(ctx.session, CLOSE_DIALOG_SELECTOR) {
        Ok(true) => ctx.session.pause(ctx.pacing.dialog_close),
        Ok(false) => {}
        Err(e) => debug!("Could not close share dialog: {}", e),
    }
}

fn from_page_source(ctx: &CoordinateContext<'_>) -> Option<Coordinates> {
    match ctx.session.page_source() {
        Ok(source) => coordinates_in_source(&source),
        Err(e) => {
            warn!("Error extracting coordinates from page source: {}", e);
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_coordinates_in_url() {
        let url = "https://www.google.com/maps/place/Tokyo+Tower/@35.6585805,139.7454329,17z";
        assert_eq!(
            coordinates_in_url(url),
            Some(Coordinates::new("35.6585805", "139.7454329"))
        );
        assert_eq!(coordinates_in_url("https://www.google.com/maps/search/x"), None);
    }

    #[test]
    fn test_coordinates_in_url_negative() {
        let found = coordinates_in_url("/maps/@-33.8567844,-151.213108,15z").unwrap();
        assert_eq!(found.latitude.as_deref(), Some("-33.8567844"));
        assert_eq!(found.longitude.as_deref(), Some("-151.213108"));
    }

    #[test]
    fn test_coordinates_in_scripts_numbers_and_strings() {
        let html = Html::parse_document(
            r#"<html><head>
               <script>var x = 1;</script>
               <script>window.meta = {"@type":"Place","latitude":35.71,"longitude":"139.79"};</script>
               </head></html>"#,
        );
        assert_eq!(
            coordinates_in_scripts(&html),
            Some(Coordinates::new("35.71", "139.79"))
        );
    }

    #[test]
    fn test_coordinates_in_scripts_needs_both_keys() {
        let html = Html::parse_document(r#"<script>{"latitude":35.71}</script>"#);
        assert_eq!(coordinates_in_scripts(&html), None);
    }

    #[test]
    fn test_coordinates_in_source() {
        let source = r#"...[null,"latitude":34.9671,"longitude":135.7727,null]..."#;
        assert_eq!(
            coordinates_in_source(source),
            Some(Coordinates::new("34.9671", "135.7727"))
        );
    }

    #[test]
    fn test_partial_coordinates_are_unresolved() {
        let partial = Coordinates {
            latitude: Some("35.0".into()),
            longitude: None,
        };
        assert!(!partial.is_resolved());
        assert!(!Coordinates::default().is_resolved());
        assert!(Coordinates::new("35.0", "139.0").is_resolved());
    }
}
