use thiserror::Error;

/// Errors that can abort a scrape run
#[derive(Debug, Error)]
pub enum ScrapeError {
    /// A WebDriver command failed (navigation, page source, screenshot, ...)
    #[error("WebDriver command failed: {0}")]
    Command(#[from] fantoccini::error::CmdError),

    /// No WebDriver session could be created
    #[error("failed to create WebDriver session: {0}")]
    Session(#[from] fantoccini::error::NewSessionError),

    /// None of the known WebDriver endpoints accepted a connection
    #[error("no WebDriver server reachable (tried {0})")]
    NoWebDriver(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("invalid URL: {0}")]
    Url(#[from] url::ParseError),

    #[error("invalid configuration: {0}")]
    Config(String),
}
