use crate::crawlers::navigation::NavState;
use crate::parsers::number::{extract_number, parse_memory_size_gb, price_per_unit};
use std::cmp::Ordering;
use std::path::PathBuf;

/// Raw text read from one product card, before any normalization
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RawItem {
    pub title: Option<String>,
    pub memory_text: Option<String>,
    pub price_text: Option<String>,
}

/// A normalized product listing
#[derive(Debug, Clone, PartialEq)]
pub struct Product {
    /// Product name as listed
    pub title: Option<String>,

    /// Memory capacity as listed (e.g. "128 GB")
    pub memory: Option<String>,

    /// Price parsed from `raw_price`
    pub price_numeric: Option<f64>,

    /// Price text as found on the card
    pub raw_price: Option<String>,

    /// Price divided by memory size in GB
    pub price_per_unit: Option<f64>,
}

impl Product {
    /// Normalize a raw card into a product
    pub fn from_raw(raw: RawItem) -> Self {
        let price_numeric = extract_number(raw.price_text.as_deref());
        let memory_gb = parse_memory_size_gb(raw.memory_text.as_deref());

        Self {
            title: raw.title,
            memory: raw.memory_text,
            price_numeric,
            raw_price: raw.price_text,
            price_per_unit: price_per_unit(price_numeric, memory_gb),
        }
    }
}

/// Orders by ascending price per unit, with missing values last
pub fn compare_price_per_unit(a: &Product, b: &Product) -> Ordering {
    match (a.price_per_unit, b.price_per_unit) {
        (Some(x), Some(y)) => x.total_cmp(&y),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}

/// Stable sort by price per unit; products without one keep their order at the end
pub fn rank_products(products: &mut [Product]) {
    products.sort_by(compare_price_per_unit);
}

/// Outcome of one scrape run
#[derive(Debug, Clone)]
pub struct CrawlReport {
    /// Products in ranked order
    pub products: Vec<Product>,

    /// Number of listing pages that were extracted
    pub pages_visited: usize,

    /// State the navigation controller ended in
    pub final_state: NavState,

    /// Error that aborted the crawl, if any
    pub error: Option<String>,

    /// Where the CSV was written
    pub output_path: PathBuf,
}

impl CrawlReport {
    pub fn is_success(&self) -> bool {
        self.final_state == NavState::Exhausted
    }
}
