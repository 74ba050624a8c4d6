//! Aggregation pipeline: page budget → listings → enriched records.
//!
//! Pages are fetched strictly one after another, each behind a rate-limiter
//! token. A failed page is recorded and skipped; a failed description falls
//! back to placeholder text. Neither aborts the run. No deduplication is
//! performed across pages, so overlapping API pages yield duplicate records.

use jobhound_core::{ListingRecord, SearchCriteria};
use tokio_util::sync::CancellationToken;

use crate::error::ListingError;
use crate::normalize::{normalize_listing, DESCRIPTION_PLACEHOLDER};
use crate::rate_limit::TokenBucket;
use crate::source::ListingSource;
use crate::types::VacancyItem;

/// A page that could not be fetched.
#[derive(Debug)]
pub struct PageFailure {
    pub page: u32,
    pub error: ListingError,
}

/// A listing whose description could not be fetched; it is still present in
/// the records with placeholder text.
#[derive(Debug)]
pub struct DetailFailure {
    pub listing_id: String,
    pub error: ListingError,
}

/// Outcome of one pipeline run.
#[derive(Debug, Default)]
pub struct SearchReport {
    /// Page order, then API order within a page.
    pub records: Vec<ListingRecord>,
    pub page_failures: Vec<PageFailure>,
    pub detail_failures: Vec<DetailFailure>,
    /// Pages for which a request was actually sent.
    pub pages_attempted: u32,
    /// The run stopped early because the token was cancelled.
    pub cancelled: bool,
}

impl SearchReport {
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Every attempted page failed.
    #[must_use]
    pub fn all_pages_failed(&self) -> bool {
        self.pages_attempted > 0
            && self.page_failures.len() == self.pages_attempted as usize
    }

    #[must_use]
    pub fn into_records(self) -> Vec<ListingRecord> {
        self.records
    }
}

/// Drives a [`ListingSource`] across a fixed page budget.
pub struct AggregationPipeline<S> {
    source: S,
    limiter: TokenBucket,
    page_budget: u32,
}

impl<S: ListingSource> AggregationPipeline<S> {
    #[must_use]
    pub fn new(source: S, limiter: TokenBucket, page_budget: u32) -> Self {
        Self {
            source,
            limiter,
            page_budget,
        }
    }

    /// Runs the search to completion (or until `cancel` fires).
    ///
    /// Cancellation is checked before each page and while waiting for a
    /// rate-limit token; records collected so far are kept. A request that is
    /// already in flight is allowed to finish.
    pub async fn run(&self, criteria: &SearchCriteria, cancel: &CancellationToken) -> SearchReport {
        let mut report = SearchReport::default();
        let mut total_pages: Option<u32> = None;

        tracing::info!(
            keyword = criteria.keyword(),
            area = %criteria.area(),
            page_budget = self.page_budget,
            "starting listings search"
        );

        for page in 0..self.page_budget {
            if total_pages.is_some_and(|total| page >= total) {
                tracing::debug!(page, ?total_pages, "no more result pages");
                break;
            }

            let acquired = tokio::select! {
                biased;
                () = cancel.cancelled() => false,
                () = self.limiter.acquire() => true,
            };
            if !acquired {
                tracing::info!(page, "search cancelled");
                report.cancelled = true;
                break;
            }

            report.pages_attempted += 1;
            match self.source.fetch_page(criteria, page).await {
                Ok(result) => {
                    tracing::debug!(
                        page,
                        items = result.items.len(),
                        found = ?result.found,
                        "fetched listings page"
                    );
                    total_pages = result.pages;
                    for item in result.items {
                        let record = self.enrich(item, &mut report.detail_failures).await;
                        report.records.push(record);
                    }
                }
                Err(error) => {
                    tracing::warn!(page, error = %error, "listings page failed; skipping");
                    report.page_failures.push(PageFailure { page, error });
                }
            }
        }

        tracing::info!(
            records = report.records.len(),
            failed_pages = report.page_failures.len(),
            failed_details = report.detail_failures.len(),
            cancelled = report.cancelled,
            "listings search finished"
        );

        report
    }

    async fn enrich(&self, item: VacancyItem, failures: &mut Vec<DetailFailure>) -> ListingRecord {
        let Some(listing_id) = item.id.clone() else {
            tracing::warn!(title = ?item.name, "listing has no id; skipping description fetch");
            return normalize_listing(item, DESCRIPTION_PLACEHOLDER.to_owned());
        };

        let description = match self.source.fetch_description(&listing_id).await {
            Ok(description) => description,
            Err(error) => {
                tracing::warn!(listing_id = %listing_id, error = %error, "description fetch failed");
                failures.push(DetailFailure { listing_id, error });
                DESCRIPTION_PLACEHOLDER.to_owned()
            }
        };
        normalize_listing(item, description)
    }
}

#[cfg(test)]
#[path = "pipeline_test.rs"]
mod tests;
