//! Multi-page aggregation of listing lots.
//!
//! Pages are fetched one after another in page order. Each page is extracted
//! on its own; the per-page results are merged afterwards, dropping lots whose
//! truncated name and rounded price were already seen on an earlier page.

pub mod backoff;
pub mod errors;
pub mod source;

pub use errors::PageError;
pub use source::{HttpPageSource, PageSource};

use std::collections::HashSet;
use std::time::Duration;
use tracing::{info, instrument, warn};

use crate::extractor::{Lot, extract_from_html};
use crate::fetcher::FetchError;

const DEFAULT_RETRY_BASE: Duration = Duration::from_millis(500);

pub struct Aggregator<S> {
    source: S,
    page_delay: Duration,
    max_retries: u32,
    retry_base: Duration,
}

impl<S: PageSource> Aggregator<S> {
    pub fn new(source: S) -> Self {
        Self {
            source,
            page_delay: Duration::ZERO,
            max_retries: 0,
            retry_base: DEFAULT_RETRY_BASE,
        }
    }

    /// Pause between consecutive page fetches.
    pub fn with_page_delay(mut self, delay: Duration) -> Self {
        self.page_delay = delay;
        self
    }

    /// Retry retriable fetch failures up to `max_retries` times per page.
    pub fn with_retries(mut self, max_retries: u32, base: Duration) -> Self {
        self.max_retries = max_retries;
        self.retry_base = base;
        self
    }

    /// Collect the lots of pages `1..=page_count`.
    ///
    /// A page that cannot be fetched or has no listing table is logged and
    /// skipped. If no page produces anything the result is empty.
    #[instrument(skip(self))]
    pub async fn run(&self, page_count: u32) -> Vec<Lot> {
        let mut pages = Vec::new();

        for page in 1..=page_count {
            if page > 1 && !self.page_delay.is_zero() {
                tokio::time::sleep(self.page_delay).await;
            }

            match self.process_page(page).await {
                Ok(lots) => {
                    info!(page, count = lots.len(), "Extracted lots from page");
                    pages.push(lots);
                }
                Err(e) => {
                    warn!(page, error = %e, "Skipping page");
                }
            }
        }

        let merged = merge_pages(pages);
        info!(page_count, total = merged.len(), "Finished listing pages");
        merged
    }

    async fn process_page(&self, page: u32) -> Result<Vec<Lot>, PageError> {
        let html = self.fetch_with_retry(page).await?;
        Ok(extract_from_html(&html)?)
    }

    async fn fetch_with_retry(&self, page: u32) -> Result<String, FetchError> {
        let mut attempt = 0;
        loop {
            match self.source.fetch_page(page).await {
                Ok(html) => return Ok(html),
                Err(e) if e.should_retry() && attempt < self.max_retries => {
                    let delay = backoff::retry_delay(attempt, self.retry_base);
                    warn!(page, attempt, error = %e, delay_ms = delay.as_millis() as u64, "Retrying page fetch");
                    tokio::time::sleep(delay).await;
                    attempt += 1;
                }
                Err(e) => return Err(e),
            }
        }
    }
}

/// Concatenate page results in order, keeping the first lot of every
/// truncated-name/rounded-price identity.
pub fn merge_pages<I>(pages: I) -> Vec<Lot>
where
    I: IntoIterator<Item = Vec<Lot>>,
{
    let mut seen = HashSet::new();
    pages
        .into_iter()
        .flatten()
        .filter(|lot| seen.insert(lot.loose_key()))
        .collect()
}

/// Most expensive first; equal prices keep their relative order.
pub fn sort_by_price_desc(mut lots: Vec<Lot>) -> Vec<Lot> {
    lots.sort_by(|a, b| b.price.total_cmp(&a.price));
    lots
}

/// Keep lots with `min <= price <= max`; a missing bound does not constrain.
pub fn filter_by_price_range(lots: Vec<Lot>, min: Option<f64>, max: Option<f64>) -> Vec<Lot> {
    lots.into_iter()
        .filter(|lot| min.is_none_or(|min| lot.price >= min))
        .filter(|lot| max.is_none_or(|max| lot.price <= max))
        .collect()
}
