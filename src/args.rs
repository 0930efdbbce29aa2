use clap::Parser;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "catalog-scrape")]
#[command(about = "Scrapes tablet listings from a retail catalog and ranks them by price per GB")]
#[command(version)]
pub struct Args {
    /// Catalog listing page to start from
    pub url: Option<String>,

    /// Path to a JSON configuration file
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Maximum number of listing pages to visit
    #[arg(short, long)]
    pub max_pages: Option<usize>,

    /// CSV output path
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Directory for debug screenshots and HTML dumps
    #[arg(long)]
    pub debug_dir: Option<PathBuf>,

    /// Do not write debug screenshots and HTML dumps
    #[arg(long, conflicts_with = "debug_dir")]
    pub no_debug: bool,

    /// WebDriver server URL (WEBDRIVER_URL overrides it)
    #[arg(long)]
    pub webdriver_url: Option<String>,

    /// Do not wait for ENTER after opening the verification browser
    #[arg(long)]
    pub unattended: bool,
}
