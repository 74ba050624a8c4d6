//! Normalization from raw API items to [`jobhound_core::ListingRecord`].
//!
//! Missing fields never fail a listing; each one degrades to a fixed
//! fallback string.

use jobhound_core::ListingRecord;

use crate::types::{Salary, VacancyItem};

pub const SALARY_NOT_SPECIFIED: &str = "Не указана";
pub const DESCRIPTION_PLACEHOLDER: &str = "Нет описания";
pub const TITLE_PLACEHOLDER: &str = "Без названия";
pub const COMPANY_PLACEHOLDER: &str = "Компания не указана";
pub const URL_PLACEHOLDER: &str = "Ссылка не указана";

const LISTING_WEB_BASE: &str = "https://hh.ru/vacancy";

/// Marker for an unknown salary bound when only the other one is known.
const UNKNOWN_BOUND: &str = "?";

/// Renders a salary range for display.
///
/// - both bounds: `"100000 - 150000 RUR"`
/// - one bound: `"? - 150000 RUR"` / `"100000 - ? RUR"`
/// - no salary block or neither bound: [`SALARY_NOT_SPECIFIED`]
///
/// The currency suffix is dropped when the API omits it.
#[must_use]
pub fn render_salary(salary: Option<&Salary>) -> String {
    let Some(salary) = salary else {
        return SALARY_NOT_SPECIFIED.to_owned();
    };

    let range = match (salary.from, salary.to) {
        (Some(from), Some(to)) => format!("{from} - {to}"),
        (Some(from), None) => format!("{from} - {UNKNOWN_BOUND}"),
        (None, Some(to)) => format!("{UNKNOWN_BOUND} - {to}"),
        (None, None) => return SALARY_NOT_SPECIFIED.to_owned(),
    };

    match salary.currency.as_deref().map(str::trim) {
        Some(currency) if !currency.is_empty() => format!("{range} {currency}"),
        _ => range,
    }
}

/// Normalizes a search item plus its fetched description into a record.
///
/// A blank `description` is replaced with [`DESCRIPTION_PLACEHOLDER`].
#[must_use]
pub fn normalize_listing(item: VacancyItem, description: String) -> ListingRecord {
    let salary_display = render_salary(item.salary.as_ref());

    let title = non_blank(item.name).unwrap_or_else(|| TITLE_PLACEHOLDER.to_owned());
    let company = non_blank(item.employer.and_then(|e| e.name))
        .unwrap_or_else(|| COMPANY_PLACEHOLDER.to_owned());
    let url = non_blank(item.alternate_url)
        .or_else(|| non_blank(item.id).map(|id| format!("{LISTING_WEB_BASE}/{id}")))
        .unwrap_or_else(|| URL_PLACEHOLDER.to_owned());
    let description = non_blank(Some(description))
        .unwrap_or_else(|| DESCRIPTION_PLACEHOLDER.to_owned());

    ListingRecord {
        title,
        company,
        salary_display,
        description,
        url,
    }
}

fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|s| s.trim().to_owned())
        .filter(|s| !s.is_empty())
}

/// Tags that break text flow; they become a space instead of vanishing.
const BLOCK_TAGS: &[&str] = &[
    "p", "br", "li", "ul", "ol", "div", "h1", "h2", "h3", "h4", "h5", "h6", "tr", "td",
];

/// Strips HTML tags, decodes the common entities, and collapses whitespace.
#[must_use]
pub fn strip_html(html: &str) -> String {
    let mut out = String::with_capacity(html.len());
    let mut tag = String::new();
    let mut in_tag = false;

    for ch in html.chars() {
        match ch {
            '<' if !in_tag => {
                in_tag = true;
                tag.clear();
            }
            '>' if in_tag => {
                in_tag = false;
                if is_block_tag(&tag) {
                    out.push(' ');
                }
            }
            _ if in_tag => tag.push(ch),
            _ => out.push(ch),
        }
    }

    decode_entities(&out)
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
}

fn is_block_tag(raw: &str) -> bool {
    let name: String = raw
        .trim_start_matches('/')
        .chars()
        .take_while(char::is_ascii_alphanumeric)
        .collect::<String>()
        .to_ascii_lowercase();
    BLOCK_TAGS.contains(&name.as_str())
}

fn decode_entities(text: &str) -> String {
    text.replace("&nbsp;", " ")
        .replace("&quot;", "\"")
        .replace("&#39;", "'")
        .replace("&laquo;", "«")
        .replace("&raquo;", "»")
        .replace("&mdash;", "—")
        .replace("&ndash;", "–")
        .replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&amp;", "&")
}

#[cfg(test)]
#[path = "normalize_test.rs"]
mod tests;
