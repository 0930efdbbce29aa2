use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fs::File;
use std::io::Read;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Configuration for a catalog scrape run
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScraperConfig {
    /// Catalog listing page to start from
    #[serde(default = "default_start_url")]
    pub start_url: String,

    /// URL for the WebDriver instance
    #[serde(default = "default_webdriver_url")]
    pub webdriver_url: String,

    /// Maximum number of listing pages to visit
    #[serde(default = "default_max_pages")]
    pub max_pages: usize,

    /// Where the ranked CSV is written
    #[serde(default = "default_output_path")]
    pub output_path: PathBuf,

    /// Directory for per-page screenshots and HTML dumps (None disables them)
    #[serde(default = "default_debug_dir")]
    pub debug_dir: Option<PathBuf>,

    /// User agent presented by both the headless and the visible browser
    #[serde(default = "default_user_agent")]
    pub user_agent: String,

    /// Browser window size for headless sessions
    #[serde(default = "default_window_size")]
    pub window_size: (u32, u32),

    /// How long to wait for product cards on the first (headless) load
    #[serde(default = "default_initial_wait_ms")]
    pub initial_wait_ms: u64,

    /// How long to wait for product cards after manual verification
    #[serde(default = "default_manual_wait_secs")]
    pub manual_wait_secs: u64,

    /// Pause after each page transition
    #[serde(default = "default_page_delay_ms")]
    pub page_delay_ms: u64,

    /// Selectors and keywords used to read the listing
    #[serde(default)]
    pub selectors: SelectorConfig,
}

/// Selectors and localized keywords for the product listing
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SelectorConfig {
    /// Marks one product card; also the "page is ready" marker
    pub product_card: String,

    /// Element whose `title` attribute holds the product name
    pub title_link: String,

    /// Fallback element whose text holds the product name
    pub title_heading: String,

    /// Prefix of the accessibility label carrying the price
    pub price_label_prefix: String,

    /// Fallback element whose text holds the price
    pub price_display: String,

    /// Feature list entries holding label/value span pairs
    pub feature_item: String,

    /// Lower-case word a memory label must contain
    pub memory_keyword: String,

    /// Lower-case word a memory label must not contain
    pub memory_exclude: String,

    /// Lower-case word identifying the "next page" anchor
    pub next_keyword: String,
}

impl Default for SelectorConfig {
    fn default() -> Self {
        Self {
            product_card: r#"[data-name="productCard"]"#.to_string(),
            title_link: "a[title]".to_string(),
            title_heading: "h3".to_string(),
            price_label_prefix: "Cena:".to_string(),
            price_display: ".parts__Price-sc-24f114ef-1".to_string(),
            feature_item: "ul li".to_string(),
            memory_keyword: "pamięć".to_string(),
            memory_exclude: "ram".to_string(),
            next_keyword: "następna".to_string(),
        }
    }
}

fn default_start_url() -> String {
    "https://www.x-kom.pl/g-2/c/1663-tablety.html".to_string()
}

/// Default value for webdriver_url
fn default_webdriver_url() -> String {
    "http://localhost:4444".to_string()
}

fn default_max_pages() -> usize {
    3
}

fn default_output_path() -> PathBuf {
    PathBuf::from("xkom_products.csv")
}

fn default_debug_dir() -> Option<PathBuf> {
    Some(PathBuf::from("debug"))
}

fn default_user_agent() -> String {
    "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120 Safari/537.36"
        .to_string()
}

fn default_window_size() -> (u32, u32) {
    (1920, 1080)
}

fn default_initial_wait_ms() -> u64 {
    3000
}

fn default_manual_wait_secs() -> u64 {
    60
}

fn default_page_delay_ms() -> u64 {
    1000
}

impl Default for ScraperConfig {
    fn default() -> Self {
        Self::new(&default_start_url())
    }
}

impl ScraperConfig {
    /// Create a new configuration with default values
    pub fn new(start_url: &str) -> Self {
        Self {
            start_url: start_url.to_string(),
            webdriver_url: default_webdriver_url(),
            max_pages: default_max_pages(),
            output_path: default_output_path(),
            debug_dir: default_debug_dir(),
            user_agent: default_user_agent(),
            window_size: default_window_size(),
            initial_wait_ms: default_initial_wait_ms(),
            manual_wait_secs: default_manual_wait_secs(),
            page_delay_ms: default_page_delay_ms(),
            selectors: SelectorConfig::default(),
        }
    }

    /// Load configuration from a file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, Box<dyn Error>> {
        let mut file = File::open(path)?;
        let mut contents = String::new();
        file.read_to_string(&mut contents)?;

        let config: Self = serde_json::from_str(&contents)?;
        Ok(config)
    }

    pub fn initial_wait(&self) -> Duration {
        Duration::from_millis(self.initial_wait_ms)
    }

    pub fn manual_wait(&self) -> Duration {
        Duration::from_secs(self.manual_wait_secs)
    }

    pub fn page_delay(&self) -> Duration {
        Duration::from_millis(self.page_delay_ms)
    }
}
