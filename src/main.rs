use catalog_scrape::{NavState, Scraper};
use clap::Parser;
use std::process::ExitCode;

mod args;
use args::Args;

#[tokio::main]
async fn main() -> ExitCode {
    // Initialize logging
    env_logger::init();

    // Parse command-line arguments
    let args = Args::parse();

    let mut scraper = match &args.config {
        Some(path) => match Scraper::with_config_file(path) {
            Ok(scraper) => scraper,
            Err(e) => {
                ::log::error!("Failed to load configuration {}: {}", path.display(), e);
                return ExitCode::FAILURE;
            }
        },
        None => Scraper::with_config(Default::default()),
    };

    if let Some(url) = &args.url {
        scraper = scraper.with_start_url(url);
    }
    if let Some(max_pages) = args.max_pages {
        scraper = scraper.with_max_pages(max_pages);
    }
    if let Some(output) = args.output {
        scraper = scraper.with_output(output);
    }
    if args.no_debug {
        scraper = scraper.with_debug_dir(None);
    } else if let Some(dir) = args.debug_dir {
        scraper = scraper.with_debug_dir(Some(dir));
    }
    if let Some(url) = &args.webdriver_url {
        scraper = scraper.with_webdriver_url(url);
    }
    scraper = scraper.unattended(args.unattended);

    println!("Note: scraping requires a WebDriver server (e.g., ChromeDriver).");
    println!(
        "Set WEBDRIVER_URL environment variable if not using {}",
        scraper.config().webdriver_url
    );
    ::log::info!("Starting scrape of {}", scraper.config().start_url);

    let start_time = std::time::Instant::now();
    match scraper.run().await {
        Ok(report) => {
            ::log::info!(
                "Scrape finished in {:.2} seconds: {} pages, {} products, state {:?}",
                start_time.elapsed().as_secs_f64(),
                report.pages_visited,
                report.products.len(),
                report.final_state
            );
            if report.final_state == NavState::Failed {
                ExitCode::FAILURE
            } else {
                ExitCode::SUCCESS
            }
        }
        Err(e) => {
            ::log::error!("Scrape failed: {}", e);
            ExitCode::FAILURE
        }
    }
}
