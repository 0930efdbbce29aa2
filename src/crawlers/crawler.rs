use crate::error::ScrapeError;
use std::time::Duration;
use url::Url;

/// Whether a browser window is shown to the user
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Visibility {
    Headless,
    Visible,
}

/// A live browser session driven by the navigation controller
#[allow(async_fn_in_trait)]
pub trait BrowserSession {
    /// Navigate to a URL and wait for the page load to complete
    async fn goto(&self, url: &str) -> Result<(), ScrapeError>;

    /// URL the browser is currently showing
    async fn current_url(&self) -> Result<Url, ScrapeError>;

    /// Serialized DOM of the current page
    async fn source(&self) -> Result<String, ScrapeError>;

    /// Wait until an element matching `selector` appears.
    ///
    /// Returns `Ok(false)` when the timeout elapses without a match.
    async fn wait_for(&self, selector: &str, timeout: Duration) -> Result<bool, ScrapeError>;

    /// PNG screenshot of the current page
    async fn screenshot(&self) -> Result<Vec<u8>, ScrapeError>;

    /// End the session and release the browser
    async fn close(self) -> Result<(), ScrapeError>;
}

/// Creates browser sessions
#[allow(async_fn_in_trait)]
pub trait BrowserLauncher {
    type Session: BrowserSession;

    async fn launch(&self, visibility: Visibility) -> Result<Self::Session, ScrapeError>;
}

/// External "go ahead" signal used after a human solved a verification challenge
#[allow(async_fn_in_trait)]
pub trait ContinueSignal {
    /// Block until the human signals the crawl may continue
    async fn wait_for_continue(&mut self) -> Result<(), ScrapeError>;
}
