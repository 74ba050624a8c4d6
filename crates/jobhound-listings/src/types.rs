//! Response types for the hh.ru public vacancies API.
//!
//! ## Observed shape
//!
//! ### `GET /vacancies`
//! Top level carries `items`, `found`, `pages`, `page`, `per_page`. `pages` is
//! the total page count for the query and may be smaller than our page budget.
//!
//! ### `salary`
//! Either `null` or an object whose `from`/`to` bounds are independently
//! nullable. `currency` is an ISO-like code (`"RUR"`, `"USD"`, `"KZT"`).
//!
//! ### `employer`
//! Present on every observed item, but anonymous listings carry only a
//! `name`. Modeled as optional throughout so a missing block never fails the
//! page.
//!
//! ### `GET /vacancies/{id}`
//! The detail body has `description` as an HTML fragment (`<p>`, `<ul>`,
//! `<strong>`...). Archived listings may omit it.
//!
//! Every field is optional: the pipeline degrades missing fields to fallback
//! text rather than rejecting the page.

use serde::Deserialize;

/// One page of search results.
#[derive(Debug, Deserialize)]
pub struct VacancyPage {
    #[serde(default)]
    pub items: Vec<VacancyItem>,

    /// Total matching listings across all pages.
    #[serde(default)]
    pub found: Option<u64>,

    /// Total page count for this query.
    #[serde(default)]
    pub pages: Option<u32>,
}

/// A single listing as it appears in search results.
#[derive(Debug, Deserialize)]
pub struct VacancyItem {
    /// Listing id; hh.ru sends numeric ids as JSON strings. Without one the
    /// listing is kept but its description cannot be fetched.
    #[serde(default)]
    pub id: Option<String>,

    /// Job title.
    #[serde(default)]
    pub name: Option<String>,

    #[serde(default)]
    pub employer: Option<Employer>,

    #[serde(default)]
    pub salary: Option<Salary>,

    /// Public web page for the listing.
    #[serde(default)]
    pub alternate_url: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct Employer {
    #[serde(default)]
    pub name: Option<String>,
}

/// Salary range; either bound may be unknown.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Salary {
    #[serde(default)]
    pub from: Option<u64>,
    #[serde(default)]
    pub to: Option<u64>,
    #[serde(default)]
    pub currency: Option<String>,
}

/// Detail payload for `GET /vacancies/{id}`; only the description is used.
#[derive(Debug, Deserialize)]
pub struct VacancyDetail {
    #[serde(default)]
    pub description: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn page_parses_with_missing_optional_fields() {
        let page: VacancyPage = serde_json::from_str(
            r#"{"items": [{"id": "42"}], "found": 1, "pages": 1, "page": 0, "per_page": 20}"#,
        )
        .unwrap();
        assert_eq!(page.items.len(), 1);
        let item = &page.items[0];
        assert_eq!(item.id.as_deref(), Some("42"));
        assert!(item.name.is_none());
        assert!(item.employer.is_none());
        assert!(item.salary.is_none());
        assert_eq!(page.pages, Some(1));
    }

    #[test]
    fn salary_bounds_are_independently_nullable() {
        let salary: Salary =
            serde_json::from_str(r#"{"from": null, "to": 150000, "currency": "RUR", "gross": true}"#)
                .unwrap();
        assert_eq!(salary.from, None);
        assert_eq!(salary.to, Some(150_000));
        assert_eq!(salary.currency.as_deref(), Some("RUR"));
    }

    #[test]
    fn item_without_id_does_not_fail_the_page() {
        let page: VacancyPage = serde_json::from_str(
            r#"{"items": [{"id": "1", "name": "ok"}, {"name": "no id"}], "pages": 1}"#,
        )
        .unwrap();
        assert_eq!(page.items.len(), 2);
        assert_eq!(page.items[0].id.as_deref(), Some("1"));
        assert!(page.items[1].id.is_none());
        assert_eq!(page.items[1].name.as_deref(), Some("no id"));
    }

    #[test]
    fn page_without_items_is_empty() {
        let page: VacancyPage = serde_json::from_str("{}").unwrap();
        assert!(page.items.is_empty());
        assert!(page.pages.is_none());
    }
}
