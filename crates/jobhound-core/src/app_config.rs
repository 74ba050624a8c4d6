use std::path::PathBuf;

/// Runtime settings for the search host, loaded from `JOBHOUND_*` env vars.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub log_level: String,
    pub api_base_url: String,
    pub user_agent: String,
    pub request_timeout_secs: u64,
    /// Number of result pages fetched per search.
    pub page_budget: u32,
    /// Listings requested per page (the API caps this at 100).
    pub per_page: u32,
    /// Minimum spacing between page requests.
    pub page_interval_ms: u64,
    pub export_dir: PathBuf,
    pub preview_limit: usize,
}
