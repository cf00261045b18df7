use crate::coordinates::extract_coordinates;
use crate::error::Result;
use crate::navigator::{
    Pacing, click_first_result, expand_reviews, open_reviews_tab, scroll_reviews,
};
use crate::place::extract_place_info;
use crate::result::{PageScrape, PlaceRecord, Stage, StepPolicy};
use crate::reviews::extract_reviews;
use crate::session::BrowserSession;
use scraper::Html;
use tracing::{debug, error, info, warn};

/// Runs the per-target navigation script against a shared browser session.
///
/// The extractor never owns the session; the same one is handed to every
/// target of a run.
pub struct PageExtractor<'s> {
    session: &'s dyn BrowserSession,
    pacing: Pacing,
}

impl<'s> PageExtractor<'s> {
    pub fn new(session: &'s dyn BrowserSession, pacing: Pacing) -> Self {
        Self { session, pacing }
    }

    /// Walks one target URL from `Loaded` up to `ReviewsExtracted`.
    ///
    /// Only a navigation failure is returned as an error. Every later stage
    /// degrades to its placeholder and the script moves on. Persisting the
    /// result (the `Saved` stage) is up to the caller.
    pub fn scrape(&self, url: &str) -> Result<PageScrape> {
        info!("Scraping {}", url);

        self.stage(Stage::Loaded, self.session.navigate(url), || ())?;
        self.session.pause(self.pacing.page_load);
        info!("Loaded map page");

        let clicked = self.stage(
            Stage::ResultClicked,
            click_first_result(self.session, &self.pacing),
            || false,
        )?;
        if !clicked {
            info!("Could not find business listing, continuing anyway");
        }

        let coordinates = extract_coordinates(self.session, &self.pacing);
        debug!("Reached {}", Stage::CoordinatesResolved.as_str());

        let place = self
            .stage(
                Stage::InfoExtracted,
                self.snapshot().map(|doc| extract_place_info(&doc)),
                PlaceRecord::default,
            )?
            .with_coordinates(coordinates);

        let tab_open = self.stage(
            Stage::ReviewsTabOpen,
            open_reviews_tab(self.session, &self.pacing),
            || false,
        )?;
        if !tab_open {
            info!("Could not click reviews tab, continuing anyway");
        }

        self.stage(
            Stage::ReviewsScrolled,
            scroll_reviews(self.session, &self.pacing),
            || 0,
        )?;
        self.stage(
            Stage::ReviewsExpanded,
            expand_reviews(self.session, &self.pacing),
            || 0,
        )?;

        let reviews = self.stage(
            Stage::ReviewsExtracted,
            self.snapshot().map(|doc| extract_reviews(&doc)),
            || None,
        )?;
        match &reviews {
            Some(found) => info!("Extracted {} reviews from {}", found.len(), url),
            None => info!("No reviews found on {}", url),
        }

        Ok(PageScrape {
            url: url.to_string(),
            place,
            reviews,
            stage: Stage::ReviewsExtracted,
        })
    }

    fn snapshot(&self) -> Result<Html> {
        let source = self.session.page_source()?;
        Ok(Html::parse_document(&source))
    }

    /// Applies the stage's failure policy to the outcome of a step.
    fn stage<T>(&self, stage: Stage, outcome: Result<T>, placeholder: impl FnOnce() -> T) -> Result<T> {
        match outcome {
            Ok(value) => {
                debug!("Reached {}", stage.as_str());
                Ok(value)
            }
            Err(e) => match stage.policy() {
                StepPolicy::AbortTarget => {
                    error!("Stage {} failed, abandoning target: {}", stage.as_str(), e);
                    Err(e)
                }
                StepPolicy::Degrade => {
                    warn!("Stage {} failed, using placeholder: {}", stage.as_str(), e);
                    Ok(placeholder())
                }
            },
        }
    }
}
