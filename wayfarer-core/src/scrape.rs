use crate::export::{ExportedFiles, save_scrape};
use indicatif::{ProgressBar, ProgressStyle};
use std::path::PathBuf;
use tracing::{error, info, warn};
use wayfarer_scanner::{BrowserSession, Pacing, PageExtractor, Stage};

/// Options for a scrape run over a list of map search URLs.
pub struct ScrapeOptions {
    pub out_dir: PathBuf,
    pub pacing: Pacing,
    pub show_progress_bars: bool,
}

/// What happened to one target URL.
#[derive(Debug, Clone)]
pub enum TargetOutcome {
    Saved {
        url: String,
        place: String,
        reviews: usize,
        files: ExportedFiles,
    },
    Skipped {
        url: String,
        /// Stage that failed and abandoned the target.
        stage: Stage,
        reason: String,
    },
}

impl TargetOutcome {
    pub fn url(&self) -> &str {
        match self {
            TargetOutcome::Saved { url, .. } | TargetOutcome::Skipped { url, .. } => url,
        }
    }

    pub fn is_saved(&self) -> bool {
        matches!(self, TargetOutcome::Saved { .. })
    }

    /// One-line result for the progress log.
    pub fn describe(&self) -> String {
        match self {
            TargetOutcome::Saved { place, reviews, .. } => {
                format!("Saved {} ({} reviews)", place, reviews)
            }
            TargetOutcome::Skipped { url, stage, reason } => {
                format!("Skipped {} at {}: {}", url, stage.as_str(), reason)
            }
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct ScrapeSummary {
    pub outcomes: Vec<TargetOutcome>,
}

impl ScrapeSummary {
    pub fn saved(&self) -> usize {
        self.outcomes.iter().filter(|o| o.is_saved()).count()
    }

    pub fn skipped(&self) -> usize {
        self.outcomes.len() - self.saved()
    }

    pub fn total_reviews(&self) -> usize {
        self.outcomes
            .iter()
            .map(|o| match o {
                TargetOutcome::Saved { reviews, .. } => *reviews,
                TargetOutcome::Skipped { .. } => 0,
            })
            .sum()
    }
}

/// Scrapes every URL in order with one shared browser session.
///
/// A target that fails to load or to save is logged and skipped; the run
/// always carries on with the next URL. Closing the session is left to the
/// caller.
pub fn execute_scrape(
    session: &dyn BrowserSession,
    urls: &[String],
    options: &ScrapeOptions,
) -> ScrapeSummary {
    let progress_bar = if options.show_progress_bars {
        let pb = ProgressBar::new(urls.len() as u64);
        pb.set_style(
            ProgressStyle::with_template("{spinner:.cyan} [{bar:30.cyan/blue}] {pos}/{len} {msg}")
                .unwrap_or_else(|_| ProgressStyle::default_bar())
                .progress_chars("=> "),
        );
        pb
    } else {
        ProgressBar::hidden()
    };

    let extractor = PageExtractor::new(session, options.pacing.clone());
    let mut summary = ScrapeSummary::default();

    for (idx, url) in urls.iter().enumerate() {
        info!("Scraping place {}/{}: {}", idx + 1, urls.len(), url);
        progress_bar.set_message(url.clone());

        let outcome = scrape_target(&extractor, url, options);
        progress_bar.suspend(|| {
            if outcome.is_saved() {
                info!("{}", outcome.describe());
            } else {
                warn!("{}", outcome.describe());
            }
        });
        summary.outcomes.push(outcome);
        progress_bar.inc(1);
    }

    progress_bar.finish_with_message(format!(
        "{} saved, {} skipped",
        summary.saved(),
        summary.skipped()
    ));
    summary
}

fn scrape_target(extractor: &PageExtractor<'_>, url: &str, options: &ScrapeOptions) -> TargetOutcome {
    let mut scrape = match extractor.scrape(url) {
        Ok(scrape) => scrape,
        Err(e) => {
            error!("Skipping {}: {}", url, e);
            return TargetOutcome::Skipped {
                url: url.to_string(),
                stage: Stage::Loaded,
                reason: e.to_string(),
            };
        }
    };

    match save_scrape(&scrape, &options.out_dir) {
        Ok(files) => {
            scrape.stage = Stage::Saved;
            info!("Reached {} for {}", scrape.stage.as_str(), url);
            TargetOutcome::Saved {
                url: url.to_string(),
                place: scrape.place.name.clone(),
                reviews: scrape.review_count(),
                files,
            }
        }
        Err(e) => {
            error!("Failed to save {}: {}", url, e);
            TargetOutcome::Skipped {
                url: url.to_string(),
                stage: Stage::Saved,
                reason: e.to_string(),
            }
        }
    }
}
