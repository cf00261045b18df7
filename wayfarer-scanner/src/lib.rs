pub mod coordinates;
pub mod error;
pub mod extractor;
pub mod fetch;
pub mod navigator;
pub mod place;
pub mod result;
pub mod reviews;
pub mod session;
pub mod strategy;
pub mod top100;

pub use error::ScanError;
pub use extractor::PageExtractor;
pub use fetch::{Fetcher, HttpFetcher};
pub use navigator::Pacing;
pub use result::{Coordinates, PageScrape, PlaceRecord, ReviewRecord, Stage, StepPolicy};
pub use session::{BrowserSession, ChromeSession, LaunchConfig, ScrollTechnique};
pub use top100::{CategoryRecord, ListedPlace, Top100Page, parse_top100};
