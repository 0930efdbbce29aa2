use crate::config::ScraperConfig;
use crate::crawlers::crawler::{BrowserLauncher, BrowserSession, Visibility};
use crate::error::ScrapeError;
use fantoccini::error::CmdError;
use fantoccini::wd::Capabilities;
use fantoccini::{Client, ClientBuilder, Locator};
use serde_json::json;
use std::time::Duration;
use url::Url;

/// Alternative endpoints tried when the configured WebDriver URL is unreachable
const FALLBACK_WEBDRIVER_URLS: [&str; 4] = [
    "http://localhost:9515", // ChromeDriver default
    "http://localhost:4723", // Appium default
    "http://localhost:9222", // Chrome debug port default
    "http://127.0.0.1:4444", // Try with IP instead of localhost
];

/// Launches Chrome sessions through a WebDriver server
#[derive(Debug, Clone)]
pub struct WebDriverLauncher {
    webdriver_url: String,
    user_agent: String,
    window_size: (u32, u32),
}

impl WebDriverLauncher {
    pub fn new(config: &ScraperConfig) -> Self {
        Self {
            webdriver_url: config.webdriver_url.clone(),
            user_agent: config.user_agent.clone(),
            window_size: config.window_size,
        }
    }

    /// Chrome capabilities for the requested visibility
    pub fn capabilities(&self, visibility: Visibility) -> Capabilities {
        let mut args = vec![
            format!("--user-agent={}", self.user_agent),
            "--no-sandbox".to_string(),
            "--disable-setuid-sandbox".to_string(),
        ];

        match visibility {
            Visibility::Headless => {
                args.push("--headless=new".to_string());
                args.push(format!(
                    "--window-size={},{}",
                    self.window_size.0, self.window_size.1
                ));
            }
            Visibility::Visible => {
                args.push("--start-maximized".to_string());
            }
        }

        let mut caps = Capabilities::new();
        caps.insert("goog:chromeOptions".to_string(), json!({ "args": args }));
        caps
    }

    /// Connects to the WebDriver instance, trying common fallback endpoints
    async fn connect_to_webdriver(&self, visibility: Visibility) -> Result<Client, ScrapeError> {
        let caps = self.capabilities(visibility);

        match ClientBuilder::native()
            .capabilities(caps.clone())
            .connect(&self.webdriver_url)
            .await
        {
            Ok(client) => {
                ::log::debug!(
                    "Connected to WebDriver at {} ({:?})",
                    self.webdriver_url,
                    visibility
                );
                return Ok(client);
            }
            Err(e) => {
                ::log::error!(
                    "Failed to connect to WebDriver at {}: {}",
                    self.webdriver_url,
                    e
                );
            }
        }

        for url in FALLBACK_WEBDRIVER_URLS.iter() {
            if *url == self.webdriver_url {
                continue;
            }

            ::log::info!("Trying fallback WebDriver URL: {}", url);
            if let Ok(client) = ClientBuilder::native()
                .capabilities(caps.clone())
                .connect(url)
                .await
            {
                ::log::debug!("Connected to fallback WebDriver at {}", url);
                return Ok(client);
            }
        }

        ::log::error!(
            "Make sure a WebDriver server is running or set the WEBDRIVER_URL environment variable"
        );
        let mut tried = vec![self.webdriver_url.as_str()];
        tried.extend(
            FALLBACK_WEBDRIVER_URLS
                .iter()
                .copied()
                .filter(|u| *u != self.webdriver_url),
        );
        Err(ScrapeError::NoWebDriver(tried.join(", ")))
    }
}

impl BrowserLauncher for WebDriverLauncher {
    type Session = WebDriverSession;

    async fn launch(&self, visibility: Visibility) -> Result<WebDriverSession, ScrapeError> {
        let client = self.connect_to_webdriver(visibility).await?;
        Ok(WebDriverSession { client })
    }
}

/// A Chrome session controlled over WebDriver
pub struct WebDriverSession {
    client: Client,
}

impl BrowserSession for WebDriverSession {
    async fn goto(&self, url: &str) -> Result<(), ScrapeError> {
        self.client
            .goto(url)
            .await
            .map_err(|e| log_command_error(e, "navigating to", url))
    }

    async fn current_url(&self) -> Result<Url, ScrapeError> {
        Ok(self.client.current_url().await?)
    }

    async fn source(&self) -> Result<String, ScrapeError> {
        self.client
            .source()
            .await
            .map_err(|e| log_command_error(e, "getting source for", "current page"))
    }

    async fn wait_for(&self, selector: &str, timeout: Duration) -> Result<bool, ScrapeError> {
        match self
            .client
            .wait()
            .at_most(timeout)
            .for_element(Locator::Css(selector))
            .await
        {
            Ok(_) => Ok(true),
            Err(CmdError::WaitTimeout) => Ok(false),
            Err(e) => Err(e.into()),
        }
    }

    async fn screenshot(&self) -> Result<Vec<u8>, ScrapeError> {
        Ok(self.client.screenshot().await?)
    }

    async fn close(self) -> Result<(), ScrapeError> {
        Ok(self.client.close().await?)
    }
}

/// Logs a failed WebDriver command with context before it is propagated
fn log_command_error(error: CmdError, context: &str, target: &str) -> ScrapeError {
    if error.to_string().contains("Unable to find session") {
        ::log::warn!("Lost WebDriver session while {} {}", context, target);
    } else {
        ::log::error!("Failed {} {}: {}", context, target, error);
    }
    error.into()
}
