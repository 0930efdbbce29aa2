use crate::config::ScraperConfig;
use crate::crawlers::crawler::{BrowserLauncher, BrowserSession, ContinueSignal};
use crate::crawlers::navigation::{CrawlState, NavState, NavigationSettings, Navigator};
use crate::error::ScrapeError;
use crate::output::{self, DebugSnapshots};
use crate::parsers::html::{ListingSelectors, extract_page};
use crate::results::{CrawlReport, rank_products};

/// Runs one scrape: navigate, extract, normalize, rank, write the CSV.
///
/// A crawl error does not discard the products collected before it; they are
/// still ranked and written, and the report carries `NavState::Failed`.
/// `Err` is returned only for bad selectors or when the CSV cannot be written.
pub async fn run<L, S>(
    config: &ScraperConfig,
    launcher: L,
    signal: S,
) -> Result<CrawlReport, ScrapeError>
where
    L: BrowserLauncher,
    S: ContinueSignal,
{
    let selectors = ListingSelectors::new(&config.selectors)?;
    let snapshots = DebugSnapshots::new(config.debug_dir.clone());
    let mut navigator = Navigator::new(launcher, signal, NavigationSettings::from(config));
    let mut state = CrawlState::new(config.max_pages);

    let crawl_result = match navigator.open(&mut state, &snapshots).await {
        Ok(session) => {
            let result = crawl_pages(&navigator, &session, &mut state, &selectors, &snapshots).await;
            if let Err(e) = session.close().await {
                ::log::warn!("Failed to close browser session: {}", e);
            }
            result
        }
        Err(e) => Err(e),
    };

    let error = match crawl_result {
        Ok(()) => None,
        Err(e) => {
            ::log::error!("Error during scraping: {}", e);
            state.fail();
            Some(e.to_string())
        }
    };

    let mut products = std::mem::take(&mut state.products);
    rank_products(&mut products);

    output::write_csv(&config.output_path, &products)?;
    println!(
        "Scraped {} products. Data saved to {}",
        products.len(),
        config.output_path.display()
    );
    output::print_summary(&products);

    Ok(CrawlReport {
        products,
        pages_visited: state.pages_extracted,
        final_state: state.status,
        error,
        output_path: config.output_path.clone(),
    })
}

/// Extracts the current page and follows next-page links until the state is terminal
async fn crawl_pages<L, S>(
    navigator: &Navigator<L, S>,
    session: &L::Session,
    state: &mut CrawlState,
    selectors: &ListingSelectors,
    snapshots: &DebugSnapshots,
) -> Result<(), ScrapeError>
where
    L: BrowserLauncher,
    S: ContinueSignal,
{
    while state.status == NavState::Ready {
        let current = session.current_url().await?;
        ::log::info!("Scraping page {} (URL: {})", state.page_number, current);
        snapshots
            .capture(session, &format!("Page_{}", state.page_number))
            .await;

        let html = session.source().await?;
        let page = extract_page(&html, &current, selectors);
        state.record_page(page);

        navigator.next_page(session, state, &current).await?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::crawlers::crawler::Visibility;
    use crate::crawlers::fake::{FakeLauncher, FakeSite};
    use crate::crawlers::signal::ImmediateContinue;
    use std::path::Path;

    const START: &str = "https://shop.example/tablets";

    fn config(dir: &Path, max_pages: usize) -> ScraperConfig {
        let mut config = ScraperConfig::new(START);
        config.max_pages = max_pages;
        config.output_path = dir.join("products.csv");
        config.debug_dir = None;
        config.page_delay_ms = 0;
        config.initial_wait_ms = 10;
        config.manual_wait_secs = 0;
        config
    }

    fn titles(report: &CrawlReport) -> Vec<&str> {
        report
            .products
            .iter()
            .map(|p| p.title.as_deref().unwrap_or(""))
            .collect()
    }

    #[tokio::test]
    async fn test_two_pages_then_no_next_link() {
        let dir = tempfile::tempdir().unwrap();
        let site = FakeSite::new()
            .page(
                START,
                FakeSite::html(
                    &[
                        FakeSite::card("Pricey", "64 GB", "3 200,00 zł"),
                        FakeSite::card("Cheap", "256 GB", "2 560 zł"),
                    ],
                    Some("/tablets?page=2"),
                ),
            )
            .page(
                "https://shop.example/tablets?page=2",
                FakeSite::html(
                    &[
                        FakeSite::card("Middle", "128 GB", "2 560 zł"),
                        FakeSite::card("Unknown", "", "brak"),
                    ],
                    None,
                ),
            );
        let launcher = FakeLauncher::new(site);

        let report = run(&config(dir.path(), 3), launcher.clone(), ImmediateContinue)
            .await
            .unwrap();

        assert_eq!(report.final_state, NavState::Exhausted);
        assert!(report.is_success());
        assert_eq!(report.pages_visited, 2);
        // 10 PLN/GB, 20 PLN/GB, 50 PLN/GB, then the product without a price
        assert_eq!(titles(&report), vec!["Cheap", "Middle", "Pricey", "Unknown"]);
        assert_eq!(launcher.closed(), 1);

        let csv = std::fs::read_to_string(dir.path().join("products.csv")).unwrap();
        let lines: Vec<&str> = csv.lines().collect();
        assert_eq!(lines.len(), 5);
        assert_eq!(lines[1], "Cheap,256 GB,2560,Cena: 2 560 zł,10");
        // Empty memory value and unparseable price render as blanks
        assert_eq!(lines[4], "Unknown,,,Cena: brak,");
        assert_eq!(report.products[3].memory, None);
    }

    #[tokio::test]
    async fn test_page_limit_stops_crawl() {
        let dir = tempfile::tempdir().unwrap();
        let mut site = FakeSite::new().page(START, FakeSite::listing(1, Some("?page=2")));
        for n in 2..=5 {
            site = site.page(
                &format!("{}?page={}", START, n),
                FakeSite::listing(1, Some(&format!("?page={}", n + 1))),
            );
        }
        let launcher = FakeLauncher::new(site);

        let report = run(&config(dir.path(), 3), launcher.clone(), ImmediateContinue)
            .await
            .unwrap();

        assert_eq!(report.final_state, NavState::Exhausted);
        assert_eq!(report.pages_visited, 3);
        assert_eq!(report.products.len(), 3);
        assert_eq!(
            launcher.visited(),
            vec![
                START.to_string(),
                format!("{}?page=2", START),
                format!("{}?page=3", START),
            ]
        );
    }

    #[tokio::test]
    async fn test_blocked_page_without_cards_yields_empty_result() {
        let dir = tempfile::tempdir().unwrap();
        let site = FakeSite::new()
            .page(START, "<html><body><h1>Access denied</h1></body></html>")
            .block_headless();
        let launcher = FakeLauncher::new(site);

        let report = run(&config(dir.path(), 3), launcher.clone(), ImmediateContinue)
            .await
            .unwrap();

        assert_eq!(report.final_state, NavState::Exhausted);
        assert_eq!(report.pages_visited, 1);
        assert!(report.products.is_empty());
        assert!(report.error.is_none());
        assert_eq!(
            launcher.launches(),
            vec![Visibility::Headless, Visibility::Visible]
        );
        // Both the discarded headless session and the visible one are closed
        assert_eq!(launcher.closed(), 2);
    }

    #[tokio::test]
    async fn test_navigation_error_keeps_partial_results() {
        let dir = tempfile::tempdir().unwrap();
        let site = FakeSite::new().page(START, FakeSite::listing(2, Some("/gone")));
        let launcher = FakeLauncher::new(site);

        let report = run(&config(dir.path(), 3), launcher.clone(), ImmediateContinue)
            .await
            .unwrap();

        assert_eq!(report.final_state, NavState::Failed);
        assert!(report.error.is_some());
        assert_eq!(report.products.len(), 2);
        assert_eq!(launcher.closed(), 1);

        let csv = std::fs::read_to_string(dir.path().join("products.csv")).unwrap();
        assert_eq!(csv.lines().count(), 3);
    }

    #[tokio::test]
    async fn test_unreachable_start_page_writes_empty_csv() {
        let dir = tempfile::tempdir().unwrap();
        let launcher = FakeLauncher::new(FakeSite::new());

        let report = run(&config(dir.path(), 3), launcher.clone(), ImmediateContinue)
            .await
            .unwrap();

        assert_eq!(report.final_state, NavState::Failed);
        assert_eq!(report.pages_visited, 0);
        assert_eq!(launcher.closed(), 1);
        assert!(dir.path().join("products.csv").exists());
    }

    #[tokio::test]
    async fn test_debug_snapshots_are_written() {
        let dir = tempfile::tempdir().unwrap();
        let debug_dir = dir.path().join("debug");
        let site = FakeSite::new().page(START, FakeSite::listing(1, None));
        let mut config = config(dir.path(), 3);
        config.debug_dir = Some(debug_dir.clone());

        run(&config, FakeLauncher::new(site), ImmediateContinue)
            .await
            .unwrap();

        for name in ["initial_load.png", "initial_load.html", "Page_1.png", "Page_1.html"] {
            assert!(debug_dir.join(name).exists(), "missing {}", name);
        }
    }
}
