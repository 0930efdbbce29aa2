pub mod html;
pub mod number;


use crate::results::RawItem;
use std::fmt;
use url::Url;

/// Why a product card contributed no item
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SkipReason {
    /// Card sits inside another product card
    Nested,
}

impl fmt::Display for SkipReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SkipReason::Nested => write!(f, "card is nested inside another product card"),
        }
    }
}

/// Result of reading one product card
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CardOutcome {
    Extracted(RawItem),
    Skipped { index: usize, reason: SkipReason },
}

/// Everything read from one listing page
#[derive(Debug, Clone, Default)]
pub struct PageExtraction {
    /// One outcome per product card, in document order
    pub outcomes: Vec<CardOutcome>,
    /// Absolute URL of the next listing page, if the page links one
    pub next_page: Option<Url>,
}

impl PageExtraction {
    pub fn new(outcomes: Vec<CardOutcome>, next_page: Option<Url>) -> Self {
        Self {
            outcomes,
            next_page,
        }
    }

    /// Successfully read items, in document order
    pub fn items(&self) -> impl Iterator<Item = &RawItem> {
        self.outcomes.iter().filter_map(|o| match o {
            CardOutcome::Extracted(item) => Some(item),
            CardOutcome::Skipped { .. } => None,
        })
    }

    /// Consumes the extraction, keeping only the successfully read items
    pub fn into_items(self) -> Vec<RawItem> {
        self.outcomes
            .into_iter()
            .filter_map(|o| match o {
                CardOutcome::Extracted(item) => Some(item),
                CardOutcome::Skipped { .. } => None,
            })
            .collect()
    }

    pub fn skipped(&self) -> usize {
        self.outcomes
            .iter()
            .filter(|o| matches!(o, CardOutcome::Skipped { .. }))
            .count()
    }
}
