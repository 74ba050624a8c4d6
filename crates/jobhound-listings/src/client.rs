//! HTTP client for the hh.ru public vacancies API.

use std::time::Duration;

use jobhound_core::{AppConfig, SearchCriteria};
use reqwest::{Client, Url};
use serde::de::DeserializeOwned;

use crate::error::ListingError;
use crate::normalize::strip_html;
use crate::types::{VacancyDetail, VacancyPage};

/// Fallback used when a 429 response carries no usable `Retry-After`.
const DEFAULT_RETRY_AFTER_SECS: u64 = 60;

/// Client for the search and detail endpoints.
///
/// Every request carries the configured `User-Agent` and timeout. Non-2xx
/// responses surface as typed [`ListingError`] variants; nothing is retried,
/// a failed page is simply fewer results for the caller.
pub struct HhClient {
    client: Client,
    base_url: Url,
    per_page: u32,
}

impl HhClient {
    /// Creates a client pointed at `base_url` (the configured API root in
    /// production, a mock server URI in tests).
    ///
    /// # Errors
    ///
    /// Returns [`ListingError::Http`] if the underlying `reqwest::Client`
    /// cannot be constructed, or [`ListingError::InvalidBaseUrl`] if
    /// `base_url` does not parse as an http(s) URL.
    pub fn new(
        base_url: &str,
        timeout_secs: u64,
        user_agent: &str,
        per_page: u32,
    ) -> Result<Self, ListingError> {
        let timeout = Duration::from_secs(timeout_secs);
        let client = Client::builder()
            .timeout(timeout)
            .connect_timeout(timeout.min(Duration::from_secs(10)))
            .user_agent(user_agent)
            .build()?;

        let base_url = Url::parse(base_url).map_err(|e| ListingError::InvalidBaseUrl {
            base_url: base_url.to_owned(),
            reason: e.to_string(),
        })?;
        if base_url.cannot_be_a_base() {
            return Err(ListingError::InvalidBaseUrl {
                base_url: base_url.to_string(),
                reason: "URL cannot carry a path".to_owned(),
            });
        }

        Ok(Self {
            client,
            base_url,
            per_page,
        })
    }

    /// Builds a client from the loaded application config.
    ///
    /// # Errors
    ///
    /// See [`HhClient::new`].
    pub fn from_config(config: &AppConfig) -> Result<Self, ListingError> {
        Self::new(
            &config.api_base_url,
            config.request_timeout_secs,
            &config.user_agent,
            config.per_page,
        )
    }

    /// Fetches one page (0-based) of search results for `criteria`.
    ///
    /// # Errors
    ///
    /// - [`ListingError::RateLimited`] on HTTP 429.
    /// - [`ListingError::NotFound`] on HTTP 404.
    /// - [`ListingError::UnexpectedStatus`] on any other non-2xx status.
    /// - [`ListingError::Http`] on network failure or timeout.
    /// - [`ListingError::Deserialize`] if the body is not the expected JSON.
    pub async fn fetch_page(
        &self,
        criteria: &SearchCriteria,
        page: u32,
    ) -> Result<VacancyPage, ListingError> {
        let url = self.search_url(criteria, page);
        tracing::debug!(%url, page, "fetching listings page");
        self.get_json(url, &format!("search page {page}")).await
    }

    /// Fetches the full description of one listing as plain text.
    ///
    /// Returns an empty string when the listing has no description; the
    /// caller decides on placeholder text.
    ///
    /// # Errors
    ///
    /// Same variants as [`HhClient::fetch_page`].
    pub async fn fetch_description(&self, listing_id: &str) -> Result<String, ListingError> {
        let url = self.detail_url(listing_id);
        let detail: VacancyDetail = self
            .get_json(url, &format!("listing {listing_id}"))
            .await?;
        Ok(detail
            .description
            .as_deref()
            .map(strip_html)
            .unwrap_or_default())
    }

    fn endpoint(&self, segments: &[&str]) -> Url {
        let mut url = self.base_url.clone();
        // `new` rejects cannot-be-a-base URLs, so this branch always runs.
        if let Ok(mut path) = url.path_segments_mut() {
            path.pop_if_empty().extend(segments);
        }
        url
    }

    fn search_url(&self, criteria: &SearchCriteria, page: u32) -> Url {
        let mut url = self.endpoint(&["vacancies"]);
        {
            let mut query = url.query_pairs_mut();
            query
                .append_pair("text", criteria.keyword())
                .append_pair("area", &criteria.area().to_string());
            if let Some(salary) = criteria.salary_from() {
                query.append_pair("salary", &salary.to_string());
            }
            if let Some(employment) = criteria.employment() {
                query.append_pair("employment", employment.code());
            }
            if let Some(schedule) = criteria.schedule() {
                query.append_pair("schedule", schedule.code());
            }
            query
                .append_pair("page", &page.to_string())
                .append_pair("per_page", &self.per_page.to_string());
        }
        url
    }

    fn detail_url(&self, listing_id: &str) -> Url {
        self.endpoint(&["vacancies", listing_id])
    }

    async fn get_json<T: DeserializeOwned>(
        &self,
        url: Url,
        context: &str,
    ) -> Result<T, ListingError> {
        let response = self.client.get(url.clone()).send().await?;
        let status = response.status();

        if status == reqwest::StatusCode::TOO_MANY_REQUESTS {
            let retry_after_secs = response
                .headers()
                .get(reqwest::header::RETRY_AFTER)
                .and_then(|v| v.to_str().ok())
                .and_then(|s| s.parse::<u64>().ok())
                .unwrap_or(DEFAULT_RETRY_AFTER_SECS);
            return Err(ListingError::RateLimited { retry_after_secs });
        }

        if status == reqwest::StatusCode::NOT_FOUND {
            return Err(ListingError::NotFound {
                url: url.to_string(),
            });
        }

        if !status.is_success() {
            return Err(ListingError::UnexpectedStatus {
                status: status.as_u16(),
                url: url.to_string(),
            });
        }

        let body = response.text().await?;
        serde_json::from_str::<T>(&body).map_err(|e| ListingError::Deserialize {
            context: context.to_owned(),
            source: e,
        })
    }
}

#[cfg(test)]
#[path = "client_test.rs"]
mod tests;
