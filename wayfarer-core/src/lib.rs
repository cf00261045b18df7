pub mod config;
pub mod data;
pub mod download;
pub mod error;
pub mod export;
pub mod listing;
pub mod scrape;
pub mod seed;
pub mod urls;

pub use config::Settings;
pub use data::Database;
pub use error::{CoreError, Result};
pub use scrape::{ScrapeOptions, ScrapeSummary, TargetOutcome, execute_scrape};
pub use seed::{SeedStep, seed_database};
