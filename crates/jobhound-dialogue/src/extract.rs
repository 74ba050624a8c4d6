//! Free-text filter extraction.
//!
//! Recognizes a salary threshold ("от 120000", "от 120 000 руб",
//! "зарплата от 150000"), an employment marker, a schedule marker, and a
//! city, each independently. Vocabulary markers are matched on token
//! boundaries against labels and aliases; when several phrases match, the
//! one spanning the most tokens wins and ties go to the earliest position.
//! Nothing here fails: an unrecognized marker simply leaves its field unset.

use std::ops::Range;

use jobhound_core::vocabulary::{self, VocabEntry, CITIES, EMPLOYMENT, SCHEDULE};
use jobhound_core::{
    AreaId, CriteriaBuilder, CriteriaError, Employment, Schedule, SearchCriteria,
};
use regex::Regex;

use crate::tokenize::{find_phrase, phrase_tokens, tokenize, Token};

const SALARY_PATTERN: &str = r"(?i)(?P<prefix>\b(?:зарплата|зарплатой|зп|з/п)\s+)?\bот\s+(?P<amount>[0-9]{1,3}(?:[ \x{a0}][0-9]{3})+|[0-9]+)(?P<currency>\s*(?:рублей|руб\.?|р\.|₽))?";

/// A bare "от N" with neither prefix nor currency needs at least this many
/// digits to count as a salary ("опыт от 3 лет" is not one).
const MIN_BARE_SALARY_DIGITS: usize = 4;

/// Prepositions stripped together with a following city name.
const CITY_PREPOSITIONS: &[&str] = &["в", "во"];

/// Filters recognized in one message. Every field is optional.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FilterSet {
    pub salary_from: Option<u64>,
    pub employment: Option<Employment>,
    pub schedule: Option<Schedule>,
    pub area: Option<AreaId>,
}

impl FilterSet {
    #[must_use]
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }

    /// Combines the filters with a keyword into search criteria. An unset
    /// area falls back to nationwide.
    ///
    /// # Errors
    ///
    /// Returns [`CriteriaError::EmptyKeyword`] if `keyword` is blank.
    pub fn into_criteria(self, keyword: &str) -> Result<SearchCriteria, CriteriaError> {
        CriteriaBuilder::new()
            .keyword(keyword)
            .salary_from(self.salary_from)
            .employment(self.employment)
            .schedule(self.schedule)
            .area(self.area)
            .build()
    }
}

/// Pattern-based extractor for the one-message search path.
#[derive(Debug, Clone)]
pub struct FilterExtractor {
    salary: Regex,
}

impl Default for FilterExtractor {
    fn default() -> Self {
        Self::new()
    }
}

impl FilterExtractor {
    #[must_use]
    pub fn new() -> Self {
        Self {
            salary: Regex::new(SALARY_PATTERN).expect("valid salary regex"),
        }
    }

    #[must_use]
    pub fn extract(&self, text: &str) -> FilterSet {
        self.scan(text).filters
    }

    /// Removes every recognized marker (salary, employment, schedule, and the
    /// resolved city phrase) and collapses whitespace, leaving the keyword.
    #[must_use]
    pub fn strip_markers(&self, text: &str) -> String {
        let scan = self.scan(text);
        remove_spans(text, scan.spans)
    }

    /// Extracts filters and uses whatever text remains as the keyword.
    ///
    /// # Errors
    ///
    /// Returns [`CriteriaError::EmptyKeyword`] if the message consists of
    /// markers only.
    pub fn criteria_from_text(&self, text: &str) -> Result<SearchCriteria, CriteriaError> {
        let scan = self.scan(text);
        let keyword = remove_spans(text, scan.spans);
        tracing::debug!(
            keyword = %keyword,
            filters = ?scan.filters,
            "extracted filters from free text"
        );
        scan.filters.into_criteria(&keyword)
    }

    fn scan(&self, text: &str) -> Scan {
        let tokens = tokenize(text);
        let mut spans = Vec::new();

        let salary_from = self.find_salary(text).map(|(amount, span)| {
            spans.push(span);
            amount
        });
        let employment = best_match(&tokens, EMPLOYMENT).map(|m| {
            spans.push(m.span);
            m.value
        });
        let schedule = best_match(&tokens, SCHEDULE).map(|m| {
            spans.push(m.span);
            m.value
        });
        let area = best_match(&tokens, CITIES).map(|m| {
            spans.push(with_preposition(&tokens, &m));
            m.value
        });

        Scan {
            filters: FilterSet {
                salary_from,
                employment,
                schedule,
                area,
            },
            spans,
        }
    }

    fn find_salary(&self, text: &str) -> Option<(u64, Range<usize>)> {
        for caps in self.salary.captures_iter(text) {
            let Some(amount) = caps.name("amount") else {
                continue;
            };
            let digits: String = amount.as_str().chars().filter(char::is_ascii_digit).collect();
            let qualified = caps.name("prefix").is_some() || caps.name("currency").is_some();
            if !qualified && digits.len() < MIN_BARE_SALARY_DIGITS {
                continue;
            }
            let Ok(value) = digits.parse::<u64>() else {
                tracing::debug!(amount = amount.as_str(), "salary amount out of range");
                continue;
            };
            let whole = caps.get(0).map_or_else(|| amount.range(), |m| m.range());
            return Some((value, whole));
        }
        None
    }
}

/// Resolves a city or region mentioned anywhere in `text`.
#[must_use]
pub fn resolve_area(text: &str) -> Option<AreaId> {
    best_match(&tokenize(text), CITIES).map(|m| m.value)
}

/// Resolves a city answer from the dialogue: exact case-normalized label
/// match, otherwise the nationwide region.
#[must_use]
pub fn resolve_city(text: &str) -> AreaId {
    area_or_nationwide(vocabulary::lookup(CITIES, text))
}

#[must_use]
pub fn area_or_nationwide(area: Option<AreaId>) -> AreaId {
    area.unwrap_or(AreaId::NATIONWIDE)
}

struct Scan {
    filters: FilterSet,
    spans: Vec<Range<usize>>,
}

#[derive(Debug)]
struct PhraseMatch<T> {
    value: T,
    first_token: usize,
    token_len: usize,
    span: Range<usize>,
}

/// Longest phrase wins; equal lengths go to the earlier position, then to
/// vocabulary order.
fn best_match<T: Copy>(tokens: &[Token], vocab: &[VocabEntry<T>]) -> Option<PhraseMatch<T>> {
    let mut best: Option<PhraseMatch<T>> = None;

    for entry in vocab {
        for spelling in entry.spellings() {
            let phrase = phrase_tokens(spelling);
            let Some(first_token) = find_phrase(tokens, &phrase) else {
                continue;
            };
            let last_token = first_token + phrase.len() - 1;
            let candidate = PhraseMatch {
                value: entry.value,
                first_token,
                token_len: phrase.len(),
                span: tokens[first_token].span.start..tokens[last_token].span.end,
            };
            let better = best.as_ref().is_none_or(|current| {
                candidate.token_len > current.token_len
                    || (candidate.token_len == current.token_len
                        && candidate.first_token < current.first_token)
            });
            if better {
                best = Some(candidate);
            }
        }
    }

    best
}

fn with_preposition<T>(tokens: &[Token], m: &PhraseMatch<T>) -> Range<usize> {
    match m.first_token.checked_sub(1).map(|i| &tokens[i]) {
        Some(prev) if CITY_PREPOSITIONS.contains(&prev.norm.as_str()) => {
            prev.span.start..m.span.end
        }
        _ => m.span.clone(),
    }
}

fn remove_spans(text: &str, mut spans: Vec<Range<usize>>) -> String {
    spans.sort_by_key(|span| span.start);

    let mut kept = String::with_capacity(text.len());
    let mut cursor = 0;
    for span in spans {
        if span.start > cursor {
            kept.push_str(&text[cursor..span.start]);
        }
        kept.push(' ');
        cursor = cursor.max(span.end);
    }
    kept.push_str(&text[cursor..]);

    kept.split_whitespace()
        .filter(|word| word.chars().any(char::is_alphanumeric))
        .collect::<Vec<_>>()
        .join(" ")
        .trim_matches(|c: char| matches!(c, ',' | ';' | ':' | '-'))
        .trim()
        .to_owned()
}

#[cfg(test)]
#[path = "extract_test.rs"]
mod tests;
