//! Conversions from scraped text to numbers.
//!
//! Nothing here fails loudly: text without a usable number yields `None`.

use regex::Regex;
use std::sync::LazyLock;

static PRICE_NUMBER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[0-9]+(?:\.[0-9]+)?").expect("valid price regex"));

static MEMORY_NUMBER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[0-9]+(?:[.,][0-9]+)?").expect("valid memory regex"));

/// Extracts the first number from a price-like string.
///
/// All whitespace is removed first so thousands separators such as
/// `"1 234,56"` collapse, and the first decimal comma becomes a dot.
pub fn extract_number(text: Option<&str>) -> Option<f64> {
    let text = text?;
    if text.is_empty() {
        return None;
    }

    let compact: String = text.chars().filter(|c| !c.is_whitespace()).collect();
    let compact = compact.replacen(',', ".", 1);

    PRICE_NUMBER
        .find(&compact)
        .and_then(|m| m.as_str().parse::<f64>().ok())
}

/// Reads a memory size as a number of gigabytes.
///
/// Unit suffixes are not interpreted: `"512 MB"` reads as 512.
pub fn parse_memory_size_gb(text: Option<&str>) -> Option<f64> {
    let lower = text?.to_lowercase();

    MEMORY_NUMBER
        .find(&lower)
        .and_then(|m| m.as_str().replace(',', ".").parse::<f64>().ok())
}

/// Price per gigabyte, defined only for a known price and a positive memory size
pub fn price_per_unit(price: Option<f64>, memory_gb: Option<f64>) -> Option<f64> {
    match (price, memory_gb) {
        (Some(price), Some(memory)) if memory > 0.0 => Some(price / memory),
        _ => None,
    }
}
