use crate::error::{Result, ScanError};
use headless_chrome::{Browser, LaunchOptionsBuilder, Tab};
use serde_json::Value;
use std::ffi::OsStr;
use std::sync::Arc;
use std::thread::sleep;
use std::time::Duration;
use tracing::{debug, info};

/// Ways of nudging a scrollable container into lazy-loading more content.
///
/// Pages listen for different events, so every technique is applied on each
/// scroll iteration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScrollTechnique {
    /// `scrollTop = scrollHeight` on the container.
    ScrollTop,
    /// Focus the container and press Page Down.
    PageDownKey,
    /// Move the mouse over the container and press Page Down.
    HoverPageDown,
    /// `scrollIntoView(false)` on the container.
    IntoView,
}

impl ScrollTechnique {
    pub const ALL: [ScrollTechnique; 4] = [
        ScrollTechnique::ScrollTop,
        ScrollTechnique::PageDownKey,
        ScrollTechnique::HoverPageDown,
        ScrollTechnique::IntoView,
    ];
}

/// A live browser page that the extractor drives.
///
/// One session is shared by every target of a run: it is navigated to each
/// URL in turn and keeps its cookies, window and history between targets.
/// Nothing is reset between targets beyond the navigation itself. The owner
/// closes it once at the end of the run, by dropping it.
pub trait BrowserSession {
    fn navigate(&self, url: &str) -> Result<()>;

    fn current_url(&self) -> String;

    fn page_source(&self) -> Result<String>;

    /// Evaluates a JavaScript expression and returns its primitive result.
    fn evaluate(&self, script: &str) -> Result<Value>;

    /// Native click on the first element matching `selector`.
    /// Returns `false` when nothing matches.
    fn click(&self, selector: &str) -> Result<bool>;

    fn scroll(&self, selector: &str, technique: ScrollTechnique) -> Result<()>;

    fn pause(&self, duration: Duration) {
        if !duration.is_zero() {
            sleep(duration);
        }
    }
}

/// Launch settings for [`ChromeSession`].
#[derive(Debug, Clone)]
pub struct LaunchConfig {
    pub headless: bool,
    pub window_size: (u32, u32),
    pub idle_timeout: Duration,
    /// Page opened once to set the language preference cookie.
    pub home_url: String,
}

impl Default for LaunchConfig {
    fn default() -> Self {
        Self {
            headless: false,
            window_size: (1920, 1080),
            idle_timeout: Duration::from_secs(300),
            home_url: "https://www.google.com".to_string(),
        }
    }
}

static CHROME_ARGS: [&str; 3] = [
    "--disable-notifications",
    "--lang=en-US",
    "--accept-lang=en-US,en;q=0.9",
];

/// [`BrowserSession`] backed by a Chrome instance.
pub struct ChromeSession {
    // Keeps the browser process alive for as long as the tab is used.
    _browser: Browser,
    tab: Arc<Tab>,
}

impl ChromeSession {
    pub fn launch(config: &LaunchConfig) -> Result<Self> {
        info!(
            "Launching Chrome (headless: {}, window: {}x{})",
            config.headless, config.window_size.0, config.window_size.1
        );
        let options = LaunchOptionsBuilder::default()
            .headless(config.headless)
            .window_size(Some(config.window_size))
            .idle_browser_timeout(config.idle_timeout)
            .args(CHROME_ARGS.iter().map(|arg| OsStr::new(*arg)).collect())
            .build()
            .map_err(|e| ScanError::Other(format!("Invalid launch options: {}", e)))?;

        let browser = Browser::new(options)?;
        let tab = browser.new_tab()?;
        let session = Self {
            _browser: browser,
            tab,
        };

        session.navigate(&config.home_url)?;
        session.evaluate(r#"document.cookie = "PREF=hl=en; path=/""#)?;
        Ok(session)
    }

    fn find_first(&self, selector: &str) -> Option<headless_chrome::Element<'_>> {
        // find_elements errors when nothing matches
        self.tab
            .find_elements(selector)
            .ok()
            .and_then(|mut found| (!found.is_empty()).then(|| found.remove(0)))
    }
}

impl BrowserSession for ChromeSession {
    fn navigate(&self, url: &str) -> Result<()> {
        debug!("Navigating to {}", url);
        self.tab.navigate_to(url)?.wait_until_navigated()?;
        Ok(())
    }

    fn current_url(&self) -> String {
        self.tab.get_url()
    }

    fn page_source(&self) -> Result<String> {
        Ok(self.tab.get_content()?)
    }

    fn evaluate(&self, script: &str) -> Result<Value> {
        let remote = self.tab.evaluate(script, false)?;
        Ok(remote.value.unwrap_or(Value::Null))
    }

    fn click(&self, selector: &str) -> Result<bool> {
        match self.find_first(selector) {
            Some(element) => {
                element.click()?;
                Ok(true)
            }
            None => Ok(false),
        }
    }

    fn scroll(&self, selector: &str, technique: ScrollTechnique) -> Result<()> {
        let element = self
            .find_first(selector)
            .ok_or_else(|| ScanError::Other(format!("No element matches {}", selector)))?;

        match technique {
            ScrollTechnique::ScrollTop => {
                element.call_js_fn(
                    "function() { this.scrollTop = this.scrollHeight; }",
                    vec![],
                    false,
                )?;
            }
            ScrollTechnique::PageDownKey => {
                element.focus()?;
                self.tab.press_key("PageDown")?;
            }
            ScrollTechnique::HoverPageDown => {
                element.move_mouse_over()?;
                self.tab.press_key("PageDown")?;
            }
            ScrollTechnique::IntoView => {
                element.call_js_fn("function() { this.scrollIntoView(false); }", vec![], false)?;
            }
        }
        Ok(())
    }
}
