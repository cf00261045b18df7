use std::path::PathBuf;
use wayfarer_scanner::Pacing;

pub const DEFAULT_DB_PATH: &str = "~/.config/wayfarer/travel.db";
pub const DEFAULT_SCRAPE_OUTPUT: &str = "outputs";
pub const DEFAULT_RAW_HTML_DIR: &str = "raw_html";
pub const DEFAULT_LISTING_OUTPUT: &str = "output";

/// Run settings shared by the subcommands. Paths are expected to be expanded
/// already.
#[derive(Debug, Clone)]
pub struct Settings {
    pub db_path: PathBuf,
    pub scrape_output: PathBuf,
    pub raw_html_dir: PathBuf,
    pub listing_output: PathBuf,
    pub headless: bool,
    pub pacing: Pacing,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            db_path: PathBuf::from(DEFAULT_DB_PATH),
            scrape_output: PathBuf::from(DEFAULT_SCRAPE_OUTPUT),
            raw_html_dir: PathBuf::from(DEFAULT_RAW_HTML_DIR),
            listing_output: PathBuf::from(DEFAULT_LISTING_OUTPUT),
            headless: false,
            pacing: Pacing::default(),
        }
    }
}
