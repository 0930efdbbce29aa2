//! In-memory browser used to drive the navigation controller in tests.

use crate::crawlers::crawler::{BrowserLauncher, BrowserSession, ContinueSignal, Visibility};
use crate::error::ScrapeError;
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use url::Url;

/// Static set of pages served by the fake browser
#[derive(Debug, Default)]
pub struct FakeSite {
    pages: HashMap<String, String>,
    headless_blocked: bool,
}

impl FakeSite {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn page(mut self, url: &str, html: impl Into<String>) -> Self {
        self.pages.insert(url.to_string(), html.into());
        self
    }

    /// Headless sessions never see product cards, as behind a bot challenge
    pub fn block_headless(mut self) -> Self {
        self.headless_blocked = true;
        self
    }

    pub fn card(title: &str, memory: &str, price: &str) -> String {
        format!(
            r#"<div data-name="productCard">
                 <a href="/p" title="{}"></a>
                 <div aria-label="Cena: {}">{}</div>
                 <ul><li><span>Pamięć wbudowana</span><span>{}</span></li></ul>
               </div>"#,
            title, price, price, memory
        )
    }

    pub fn html(cards: &[String], next: Option<&str>) -> String {
        let next = next
            .map(|href| format!(r#"<a href="{}" aria-label="Następna strona">&gt;</a>"#, href))
            .unwrap_or_default();
        format!("<html><body>{}{}</body></html>", cards.join("\n"), next)
    }

    pub fn listing(count: usize, next: Option<&str>) -> String {
        let cards: Vec<String> = (0..count)
            .map(|i| Self::card(&format!("Tab {}", i), "64 GB", "640 zł"))
            .collect();
        Self::html(&cards, next)
    }
}

#[derive(Debug, Default)]
struct Journal {
    launches: Vec<Visibility>,
    visited: Vec<String>,
    closed: usize,
}

/// Launcher handing out sessions on a shared `FakeSite`
#[derive(Debug, Clone)]
pub struct FakeLauncher {
    site: Arc<FakeSite>,
    journal: Arc<Mutex<Journal>>,
}

impl FakeLauncher {
    pub fn new(site: FakeSite) -> Self {
        Self {
            site: Arc::new(site),
            journal: Arc::new(Mutex::new(Journal::default())),
        }
    }

    pub fn launches(&self) -> Vec<Visibility> {
        self.journal.lock().unwrap().launches.clone()
    }

    pub fn visited(&self) -> Vec<String> {
        self.journal.lock().unwrap().visited.clone()
    }

    pub fn closed(&self) -> usize {
        self.journal.lock().unwrap().closed
    }
}

impl BrowserLauncher for FakeLauncher {
    type Session = FakeSession;

    async fn launch(&self, visibility: Visibility) -> Result<FakeSession, ScrapeError> {
        self.journal.lock().unwrap().launches.push(visibility);
        Ok(FakeSession {
            site: Arc::clone(&self.site),
            journal: Arc::clone(&self.journal),
            visibility,
            current: Mutex::new(None),
        })
    }
}

pub struct FakeSession {
    site: Arc<FakeSite>,
    journal: Arc<Mutex<Journal>>,
    visibility: Visibility,
    current: Mutex<Option<String>>,
}

impl FakeSession {
    fn current_html(&self) -> Result<String, ScrapeError> {
        let current = self.current.lock().unwrap();
        current
            .as_ref()
            .and_then(|url| self.site.pages.get(url))
            .cloned()
            .ok_or_else(|| ScrapeError::Io(std::io::Error::other("no page loaded")))
    }
}

impl BrowserSession for FakeSession {
    async fn goto(&self, url: &str) -> Result<(), ScrapeError> {
        self.journal.lock().unwrap().visited.push(url.to_string());
        if !self.site.pages.contains_key(url) {
            return Err(ScrapeError::Io(std::io::Error::other(format!(
                "net::ERR_NAME_NOT_RESOLVED at {}",
                url
            ))));
        }
        *self.current.lock().unwrap() = Some(url.to_string());
        Ok(())
    }

    async fn current_url(&self) -> Result<Url, ScrapeError> {
        let current = self.current.lock().unwrap().clone();
        match current {
            Some(url) => Ok(Url::parse(&url)?),
            None => Err(ScrapeError::Io(std::io::Error::other("no page loaded"))),
        }
    }

    async fn source(&self) -> Result<String, ScrapeError> {
        self.current_html()
    }

    async fn wait_for(&self, _selector: &str, _timeout: Duration) -> Result<bool, ScrapeError> {
        if self.visibility == Visibility::Headless && self.site.headless_blocked {
            return Ok(false);
        }
        Ok(self.current_html()?.contains(r#"data-name="productCard""#))
    }

    async fn screenshot(&self) -> Result<Vec<u8>, ScrapeError> {
        Ok(b"\x89PNG".to_vec())
    }

    async fn close(self) -> Result<(), ScrapeError> {
        self.journal.lock().unwrap().closed += 1;
        Ok(())
    }
}

/// Continue signal that returns immediately and counts how often it was awaited
#[derive(Debug, Clone, Default)]
pub struct RecordingContinue {
    calls: Arc<AtomicUsize>,
}

impl RecordingContinue {
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

impl ContinueSignal for RecordingContinue {
    async fn wait_for_continue(&mut self) -> Result<(), ScrapeError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }
}
