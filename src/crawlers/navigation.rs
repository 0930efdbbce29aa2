use crate::config::ScraperConfig;
use crate::crawlers::crawler::{BrowserLauncher, BrowserSession, ContinueSignal, Visibility};
use crate::error::ScrapeError;
use crate::output::DebugSnapshots;
use crate::parsers::PageExtraction;
use crate::results::Product;
use crate::utils::same_page;
use std::time::Duration;
use url::Url;

/// States of the navigation controller
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NavState {
    /// Start page requested in a fresh headless session
    Loading,
    /// Product cards did not show up; a human is solving a challenge in a visible browser
    AwaitingManualVerification,
    /// Current page can be extracted
    Ready,
    /// No further page to visit
    Exhausted,
    /// Crawl aborted by an error
    Failed,
}

impl NavState {
    pub fn is_terminal(&self) -> bool {
        matches!(self, NavState::Exhausted | NavState::Failed)
    }
}

/// Progress of one crawl, passed explicitly through every step
#[derive(Debug, Clone)]
pub struct CrawlState {
    /// 1-based number of the page currently loaded
    pub page_number: usize,
    pub max_pages: usize,
    /// Products in the order they were encountered
    pub products: Vec<Product>,
    /// Next-page link found on the last extracted page
    pub next_page_url: Option<Url>,
    pub pages_extracted: usize,
    pub status: NavState,
}

impl CrawlState {
    pub fn new(max_pages: usize) -> Self {
        Self {
            page_number: 1,
            max_pages: max_pages.max(1),
            products: Vec::new(),
            next_page_url: None,
            pages_extracted: 0,
            status: NavState::Loading,
        }
    }

    /// Normalizes and appends the items of an extracted page; returns how many were added
    pub fn record_page(&mut self, page: PageExtraction) -> usize {
        let skipped = page.skipped();
        self.next_page_url = page.next_page.clone();

        let before = self.products.len();
        self.products
            .extend(page.into_items().into_iter().map(Product::from_raw));
        self.pages_extracted += 1;

        let added = self.products.len() - before;
        ::log::info!(
            "Page {}: {} products ({} cards skipped)",
            self.page_number,
            added,
            skipped
        );
        added
    }

    /// Decides whether to follow the recorded next-page link.
    ///
    /// Moves to `Exhausted` when there is no link, the link points back at
    /// `current`, or the page limit is reached; otherwise stays `Ready` and
    /// advances the page counter.
    pub fn advance(&mut self, current: &Url) -> NavState {
        let follow = match &self.next_page_url {
            None => {
                ::log::info!("No next page link on page {}", self.page_number);
                false
            }
            Some(next) if same_page(next, current) => {
                ::log::info!("Next page link points at the current page {}", current);
                false
            }
            Some(_) if self.page_number >= self.max_pages => {
                ::log::info!("Reached page limit of {}", self.max_pages);
                false
            }
            Some(_) => true,
        };

        if follow {
            self.page_number += 1;
            self.status = NavState::Ready;
        } else {
            self.status = NavState::Exhausted;
        }
        self.status
    }

    pub fn fail(&mut self) {
        self.status = NavState::Failed;
    }
}

/// Timing and target settings for the navigation controller
#[derive(Debug, Clone)]
pub struct NavigationSettings {
    pub start_url: String,
    /// Selector whose appearance means product cards are rendered
    pub ready_marker: String,
    pub initial_wait: Duration,
    pub manual_wait: Duration,
    pub page_delay: Duration,
}

impl From<&ScraperConfig> for NavigationSettings {
    fn from(config: &ScraperConfig) -> Self {
        Self {
            start_url: config.start_url.clone(),
            ready_marker: config.selectors.product_card.clone(),
            initial_wait: config.initial_wait(),
            manual_wait: config.manual_wait(),
            page_delay: config.page_delay(),
        }
    }
}

/// Drives a browser session through the listing pages
pub struct Navigator<L, S> {
    launcher: L,
    signal: S,
    settings: NavigationSettings,
}

impl<L, S> Navigator<L, S>
where
    L: BrowserLauncher,
    S: ContinueSignal,
{
    pub fn new(launcher: L, signal: S, settings: NavigationSettings) -> Self {
        Self {
            launcher,
            signal,
            settings,
        }
    }

    /// Loads the start page, falling back to manual verification in a visible browser.
    ///
    /// On success the returned session shows the start page and `state` is `Ready`.
    /// Any session opened here is closed again before an error is returned.
    pub async fn open(
        &mut self,
        state: &mut CrawlState,
        snapshots: &DebugSnapshots,
    ) -> Result<L::Session, ScrapeError> {
        state.status = NavState::Loading;
        ::log::info!("Navigating to {}", self.settings.start_url);

        let session = self.launcher.launch(Visibility::Headless).await?;
        if let Err(e) = session.goto(&self.settings.start_url).await {
            close_quietly(session).await;
            return Err(e);
        }
        snapshots.capture(&session, "initial_load").await;

        match session
            .wait_for(&self.settings.ready_marker, self.settings.initial_wait)
            .await
        {
            Ok(true) => {
                state.status = NavState::Ready;
                return Ok(session);
            }
            Ok(false) => {}
            Err(e) => {
                close_quietly(session).await;
                return Err(e);
            }
        }

        ::log::info!(
            "Product cards did not appear within {:?}; launching a visible browser for manual verification",
            self.settings.initial_wait
        );
        state.status = NavState::AwaitingManualVerification;
        close_quietly(session).await;

        let session = self.launcher.launch(Visibility::Visible).await?;
        match self.verify_manually(&session).await {
            Ok(true) => ::log::info!("Product cards found after manual verification"),
            Ok(false) => {
                ::log::warn!("Could not find products even after manual verification")
            }
            Err(e) => {
                close_quietly(session).await;
                return Err(e);
            }
        }

        state.status = NavState::Ready;
        Ok(session)
    }

    /// Reloads the start page in the visible session and waits for the human
    async fn verify_manually(&mut self, session: &L::Session) -> Result<bool, ScrapeError> {
        session.goto(&self.settings.start_url).await?;
        self.signal.wait_for_continue().await?;
        session
            .wait_for(&self.settings.ready_marker, self.settings.manual_wait)
            .await
    }

    /// Applies the transition decision for the page just extracted and,
    /// when staying `Ready`, loads the next page.
    pub async fn next_page(
        &self,
        session: &L::Session,
        state: &mut CrawlState,
        current: &Url,
    ) -> Result<NavState, ScrapeError> {
        if state.advance(current) != NavState::Ready {
            return Ok(state.status);
        }

        let Some(next) = state.next_page_url.clone() else {
            return Ok(state.status);
        };
        ::log::info!("Navigating to page {}: {}", state.page_number, next);
        session.goto(next.as_str()).await?;

        if !session
            .wait_for(&self.settings.ready_marker, self.settings.initial_wait)
            .await?
        {
            ::log::debug!("No product cards visible on page {}", state.page_number);
        }

        if !self.settings.page_delay.is_zero() {
            tokio::time::sleep(self.settings.page_delay).await;
        }
        Ok(state.status)
    }
}

/// Closes a session, logging instead of propagating failures
pub async fn close_quietly<B: BrowserSession>(session: B) {
    if let Err(e) = session.close().await {
        ::log::warn!("Failed to close browser session: {}", e);
    }
}
