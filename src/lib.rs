// Re-export modules
pub mod config;
pub mod crawlers;
pub mod error;
pub mod output;
pub mod parsers;
pub mod pipeline;
pub mod results;
pub mod utils;

// Re-export commonly used types for convenience
pub use crawlers::navigation::NavState;
pub use error::ScrapeError;
pub use results::{CrawlReport, Product, RawItem};

use crawlers::signal::{ImmediateContinue, StdinContinue};
use crawlers::web::WebDriverLauncher;
use std::path::PathBuf;

/// Main builder for a catalog scrape run
pub struct Scraper {
    config: config::ScraperConfig,
    unattended: bool,
}

impl Scraper {
    /// Create a new Scraper builder for the given start URL
    pub fn new(start_url: &str) -> Self {
        Self::with_config(config::ScraperConfig::new(start_url))
    }

    /// Create a Scraper from an existing configuration
    pub fn with_config(config: config::ScraperConfig) -> Self {
        Self {
            config,
            unattended: false,
        }
    }

    /// Load configuration from a file
    pub fn with_config_file(
        path: impl AsRef<std::path::Path>,
    ) -> Result<Self, Box<dyn std::error::Error>> {
        let config = config::ScraperConfig::from_file(path)?;
        Ok(Self::with_config(config))
    }

    /// Load configuration from a string
    pub fn with_config_str(config_str: &str) -> Result<Self, Box<dyn std::error::Error>> {
        let config = serde_json::from_str(config_str)?;
        Ok(Self::with_config(config))
    }

    /// Override the start URL
    pub fn with_start_url(mut self, start_url: &str) -> Self {
        self.config.start_url = start_url.to_string();
        self
    }

    /// Set the maximum number of listing pages to visit
    pub fn with_max_pages(mut self, max_pages: usize) -> Self {
        self.config.max_pages = max_pages;
        self
    }

    /// Set where the CSV is written
    pub fn with_output(mut self, path: impl Into<PathBuf>) -> Self {
        self.config.output_path = path.into();
        self
    }

    /// Set the debug snapshot directory (None disables snapshots)
    pub fn with_debug_dir(mut self, dir: Option<PathBuf>) -> Self {
        self.config.debug_dir = dir;
        self
    }

    /// Set the WebDriver server URL
    pub fn with_webdriver_url(mut self, url: &str) -> Self {
        self.config.webdriver_url = url.to_string();
        self
    }

    /// Do not wait for a human after the verification fallback
    pub fn unattended(mut self, unattended: bool) -> Self {
        self.unattended = unattended;
        self
    }

    pub fn config(&self) -> &config::ScraperConfig {
        &self.config
    }

    /// Run the scrape against the configured WebDriver server
    pub async fn run(mut self) -> Result<CrawlReport, ScrapeError> {
        url::Url::parse(&self.config.start_url)?;

        // Override the WebDriver URL with an environment variable if provided
        if let Ok(webdriver_url) = std::env::var("WEBDRIVER_URL") {
            if !webdriver_url.is_empty() {
                self.config.webdriver_url = webdriver_url;
            }
        }

        let launcher = WebDriverLauncher::new(&self.config);
        if self.unattended {
            pipeline::run(&self.config, launcher, ImmediateContinue).await
        } else {
            pipeline::run(&self.config, launcher, StdinContinue::new()).await
        }
    }
}
