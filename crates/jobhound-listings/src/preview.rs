use jobhound_core::ListingRecord;

/// Shown instead of a preview when a search produced nothing.
pub const NO_LISTINGS_MESSAGE: &str = "Вакансии не найдены";

/// Renders the first `limit` records as a numbered, 1-indexed list:
/// `"{index}. {title} ({company}) - {salary}\n{url}"` per entry, entries
/// separated by a newline.
#[must_use]
pub fn render_preview(records: &[ListingRecord], limit: usize) -> String {
    if records.is_empty() {
        return NO_LISTINGS_MESSAGE.to_owned();
    }

    records
        .iter()
        .take(limit)
        .enumerate()
        .map(|(i, r)| {
            format!(
                "{}. {} ({}) - {}\n{}",
                i + 1,
                r.title,
                r.company,
                r.salary_display,
                r.url
            )
        })
        .collect::<Vec<_>>()
        .join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(n: usize) -> ListingRecord {
        ListingRecord {
            title: format!("Job {n}"),
            company: format!("Company {n}"),
            salary_display: "Не указана".to_owned(),
            description: String::new(),
            url: format!("https://hh.ru/vacancy/{n}"),
        }
    }

    #[test]
    fn preview_keeps_first_five_of_seven() {
        let records: Vec<_> = (1..=7).map(record).collect();
        let preview = render_preview(&records, 5);

        assert!(preview.starts_with("1. Job 1 (Company 1) - Не указана\nhttps://hh.ru/vacancy/1"));
        assert!(preview.contains("5. Job 5 (Company 5)"));
        assert!(!preview.contains("Job 6"));
        assert!(!preview.contains("Job 7"));
        assert_eq!(preview.lines().count(), 10);
    }

    #[test]
    fn preview_with_fewer_records_than_limit() {
        let records = vec![record(1), record(2)];
        let preview = render_preview(&records, 5);
        assert_eq!(
            preview,
            "1. Job 1 (Company 1) - Не указана\nhttps://hh.ru/vacancy/1\n\
             2. Job 2 (Company 2) - Не указана\nhttps://hh.ru/vacancy/2"
        );
    }

    #[test]
    fn preview_of_nothing_says_so() {
        assert_eq!(render_preview(&[], 5), NO_LISTINGS_MESSAGE);
    }
}
