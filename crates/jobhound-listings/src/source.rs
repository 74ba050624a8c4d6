//! Seam between the aggregation pipeline and the listings backend.

use async_trait::async_trait;
use jobhound_core::SearchCriteria;

use crate::client::HhClient;
use crate::error::ListingError;
use crate::types::VacancyPage;

/// Backend the pipeline pulls pages and descriptions from.
#[async_trait]
pub trait ListingSource: Send + Sync {
    /// Fetches one 0-based page of results.
    async fn fetch_page(
        &self,
        criteria: &SearchCriteria,
        page: u32,
    ) -> Result<VacancyPage, ListingError>;

    /// Fetches the plain-text description of one listing.
    async fn fetch_description(&self, listing_id: &str) -> Result<String, ListingError>;
}

#[async_trait]
impl ListingSource for HhClient {
    async fn fetch_page(
        &self,
        criteria: &SearchCriteria,
        page: u32,
    ) -> Result<VacancyPage, ListingError> {
        HhClient::fetch_page(self, criteria, page).await
    }

    async fn fetch_description(&self, listing_id: &str) -> Result<String, ListingError> {
        HhClient::fetch_description(self, listing_id).await
    }
}
