use crate::config::SelectorConfig;
use crate::error::ScrapeError;
use crate::parsers::{CardOutcome, PageExtraction, SkipReason};
use crate::results::RawItem;
use scraper::{ElementRef, Html, Selector};
use url::Url;

/// Compiled selectors for reading a product listing
#[derive(Debug)]
pub struct ListingSelectors {
    card: Selector,
    title_link: Selector,
    title_heading: Selector,
    labelled: Selector,
    price_display: Selector,
    feature_item: Selector,
    span: Selector,
    anchor: Selector,
    base: Selector,
    price_label_prefix: String,
    memory_keyword: String,
    memory_exclude: String,
    next_keyword: String,
}

fn compile(selector: &str) -> Result<Selector, ScrapeError> {
    Selector::parse(selector)
        .map_err(|e| ScrapeError::Config(format!("bad selector {:?}: {}", selector, e)))
}

impl ListingSelectors {
    pub fn new(config: &SelectorConfig) -> Result<Self, ScrapeError> {
        Ok(Self {
            card: compile(&config.product_card)?,
            title_link: compile(&config.title_link)?,
            title_heading: compile(&config.title_heading)?,
            labelled: compile("[aria-label]")?,
            price_display: compile(&config.price_display)?,
            feature_item: compile(&config.feature_item)?,
            span: compile("span")?,
            anchor: compile("a")?,
            base: compile("base[href]")?,
            price_label_prefix: config.price_label_prefix.clone(),
            memory_keyword: config.memory_keyword.to_lowercase(),
            memory_exclude: config.memory_exclude.to_lowercase(),
            next_keyword: config.next_keyword.to_lowercase(),
        })
    }
}

/// Reads every product card and the next-page link from a listing page
pub fn extract_page(html: &str, page_url: &Url, selectors: &ListingSelectors) -> PageExtraction {
    let doc = Html::parse_document(html);

    let outcomes = doc
        .select(&selectors.card)
        .enumerate()
        .map(|(index, card)| match extract_card(card, selectors) {
            Ok(item) => CardOutcome::Extracted(item),
            Err(reason) => {
                ::log::debug!("Skipping product card {}: {}", index, reason);
                CardOutcome::Skipped { index, reason }
            }
        })
        .collect::<Vec<_>>();

    let next_page = find_next_page(&doc, page_url, selectors);

    ::log::debug!(
        "Extracted {} cards from {} (next page: {:?})",
        outcomes.len(),
        page_url,
        next_page.as_ref().map(Url::as_str)
    );

    PageExtraction::new(outcomes, next_page)
}

/// Reads a single product card.
///
/// Every field is optional, so a card only fails when it is nested inside
/// another card: its fields were already read through the enclosing one.
pub fn extract_card(card: ElementRef<'_>, selectors: &ListingSelectors) -> Result<RawItem, SkipReason> {
    let nested = card
        .ancestors()
        .filter_map(ElementRef::wrap)
        .any(|ancestor| selectors.card.matches(&ancestor));
    if nested {
        return Err(SkipReason::Nested);
    }

    let title = card
        .select(&selectors.title_link)
        .next()
        .and_then(|a| a.value().attr("title"))
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .map(str::to_string)
        .or_else(|| {
            card.select(&selectors.title_heading)
                .next()
                .map(|h| element_text(&h))
                .filter(|t| !t.is_empty())
        });

    let price_text = card
        .select(&selectors.labelled)
        .filter_map(|e| e.value().attr("aria-label"))
        .find(|label| label.starts_with(&selectors.price_label_prefix))
        .map(str::to_string)
        .or_else(|| {
            card.select(&selectors.price_display)
                .next()
                .map(|p| p.text().collect::<String>().trim().to_string())
                .filter(|t| !t.is_empty())
        });

    let memory_text = find_memory(card, selectors);

    Ok(RawItem {
        title,
        memory_text,
        price_text,
    })
}

/// Value of the first feature entry labelled as storage memory (not RAM)
fn find_memory(card: ElementRef<'_>, selectors: &ListingSelectors) -> Option<String> {
    let value = card.select(&selectors.feature_item).find_map(|li| {
        let mut spans = li.select(&selectors.span);
        let label = element_text(&spans.next()?).to_lowercase();
        let value = element_text(&spans.next()?);

        (label.contains(&selectors.memory_keyword) && !label.contains(&selectors.memory_exclude))
            .then_some(value)
    })?;

    (!value.is_empty()).then_some(value)
}

/// Finds the anchor labelled as "next page" and resolves its target
pub fn find_next_page(doc: &Html, page_url: &Url, selectors: &ListingSelectors) -> Option<Url> {
    let anchor = doc.select(&selectors.anchor).find(|a| {
        let text = element_text(a).to_lowercase();
        let aria = a.value().attr("aria-label").unwrap_or("").to_lowercase();
        text.contains(&selectors.next_keyword) || aria.contains(&selectors.next_keyword)
    })?;

    let href = anchor.value().attr("href")?.trim();
    if href.is_empty() {
        return None;
    }

    let base = doc
        .select(&selectors.base)
        .next()
        .and_then(|b| b.value().attr("href"))
        .and_then(|href| page_url.join(href).ok())
        .unwrap_or_else(|| page_url.clone());

    base.join(href).ok()
}

/// Text content of an element with whitespace collapsed
fn element_text(element: &ElementRef<'_>) -> String {
    element
        .text()
        .collect::<Vec<_>>()
        .join(" ")
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
}
