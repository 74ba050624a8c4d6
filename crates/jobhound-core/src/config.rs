use crate::app_config::AppConfig;
use crate::ConfigError;

const MAX_PER_PAGE: u32 = 100;

/// Load application configuration from environment variables.
///
/// Calls `dotenvy::dotenv().ok()` to load `.env` files before reading env vars.
///
/// # Errors
///
/// Returns `ConfigError` if a value is present but invalid.
pub fn load_app_config() -> Result<AppConfig, ConfigError> {
    dotenvy::dotenv().ok();
    load_app_config_from_env()
}

/// Load application configuration from environment variables already in the process.
///
/// Unlike [`load_app_config`], this does NOT load `.env` files.
///
/// # Errors
///
/// Returns `ConfigError` if a value is present but invalid.
pub fn load_app_config_from_env() -> Result<AppConfig, ConfigError> {
    build_app_config(|key| std::env::var(key))
}

/// Build application configuration using the provided env-var lookup function.
///
/// Decoupled from the real environment so tests can feed a `HashMap` lookup.
fn build_app_config<F>(lookup: F) -> Result<AppConfig, ConfigError>
where
    F: Fn(&str) -> Result<String, std::env::VarError>,
{
    use std::path::PathBuf;

    let or_default = |var: &str, default: &str| -> String {
        lookup(var).unwrap_or_else(|_| default.to_string())
    };

    let invalid = |var: &str, reason: String| ConfigError::InvalidEnvVar {
        var: var.to_string(),
        reason,
    };

    let parse_u32 = |var: &str, default: &str| -> Result<u32, ConfigError> {
        or_default(var, default)
            .parse::<u32>()
            .map_err(|e| invalid(var, e.to_string()))
    };

    let parse_u64 = |var: &str, default: &str| -> Result<u64, ConfigError> {
        or_default(var, default)
            .parse::<u64>()
            .map_err(|e| invalid(var, e.to_string()))
    };

    let parse_usize = |var: &str, default: &str| -> Result<usize, ConfigError> {
        or_default(var, default)
            .parse::<usize>()
            .map_err(|e| invalid(var, e.to_string()))
    };

    let log_level = or_default("JOBHOUND_LOG_LEVEL", "info");
    let api_base_url = or_default("JOBHOUND_API_BASE_URL", "https://api.hh.ru");
    if !(api_base_url.starts_with("http://") || api_base_url.starts_with("https://")) {
        return Err(invalid(
            "JOBHOUND_API_BASE_URL",
            format!("expected an http(s) URL, got \"{api_base_url}\""),
        ));
    }
    let user_agent = or_default("JOBHOUND_USER_AGENT", "jobhound/0.1 (vacancy-search)");
    let request_timeout_secs = parse_u64("JOBHOUND_REQUEST_TIMEOUT_SECS", "10")?;

    let page_budget = parse_u32("JOBHOUND_PAGE_BUDGET", "3")?;
    if page_budget == 0 {
        return Err(invalid("JOBHOUND_PAGE_BUDGET", "must be at least 1".into()));
    }

    let per_page = parse_u32("JOBHOUND_PER_PAGE", "20")?;
    if per_page == 0 || per_page > MAX_PER_PAGE {
        return Err(invalid(
            "JOBHOUND_PER_PAGE",
            format!("must be between 1 and {MAX_PER_PAGE}"),
        ));
    }

    let page_interval_ms = parse_u64("JOBHOUND_PAGE_INTERVAL_MS", "1000")?;
    let export_dir = PathBuf::from(or_default("JOBHOUND_EXPORT_DIR", "./exports"));
    let preview_limit = parse_usize("JOBHOUND_PREVIEW_LIMIT", "5")?;
    if preview_limit == 0 {
        return Err(invalid("JOBHOUND_PREVIEW_LIMIT", "must be at least 1".into()));
    }

    Ok(AppConfig {
        log_level,
        api_base_url,
        user_agent,
        request_timeout_secs,
        page_budget,
        per_page,
        page_interval_ms,
        export_dir,
        preview_limit,
    })
}

#[cfg(test)]
#[path = "config_test.rs"]
mod tests;
