//! Export sink for search results.
//!
//! [`CsvExporter`] writes into a sibling `.partial` file and renames it into
//! place once fully flushed, so a failed export never leaves a truncated
//! artifact under the final name.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use chrono::{DateTime, TimeZone};
use jobhound_core::ListingRecord;
use thiserror::Error;

/// Column headers, in `ListingRecord` field order.
const COLUMNS: [&str; 5] = ["Название", "Компания", "Зарплата", "Описание", "Ссылка"];

const MAX_SLUG_CHARS: usize = 40;

#[derive(Debug, Error)]
pub enum ExportError {
    #[error("export I/O error at {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("CSV write error: {0}")]
    Csv(#[from] csv::Error),
}

/// Turns normalized records into a downloadable artifact.
pub trait Exporter: Send + Sync {
    /// Writes `records` and returns the artifact path.
    ///
    /// # Errors
    ///
    /// Returns [`ExportError`] if the artifact cannot be written.
    fn export(&self, records: &[ListingRecord], file_stem: &str) -> Result<PathBuf, ExportError>;
}

#[derive(Debug, Clone)]
pub struct CsvExporter {
    dir: PathBuf,
}

impl CsvExporter {
    #[must_use]
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }
}

impl Exporter for CsvExporter {
    fn export(&self, records: &[ListingRecord], file_stem: &str) -> Result<PathBuf, ExportError> {
        fs::create_dir_all(&self.dir).map_err(io_at(&self.dir))?;

        let target = self.dir.join(format!("{file_stem}.csv"));
        let partial = self.dir.join(format!(".{file_stem}.csv.partial"));

        let result = write_csv(&partial, records)
            .and_then(|()| fs::rename(&partial, &target).map_err(io_at(&target)));
        if let Err(err) = &result {
            tracing::warn!(path = %partial.display(), error = %err, "export failed; removing partial file");
            fs::remove_file(&partial).ok();
        }
        result?;

        tracing::info!(path = %target.display(), records = records.len(), "export written");
        Ok(target)
    }
}

fn write_csv(path: &Path, records: &[ListingRecord]) -> Result<(), ExportError> {
    let mut writer = csv::WriterBuilder::new()
        .has_headers(false)
        .from_path(path)?;
    writer.write_record(COLUMNS)?;
    for record in records {
        writer.serialize(record)?;
    }
    writer.flush().map_err(io_at(path))?;
    Ok(())
}

fn io_at(path: &Path) -> impl FnOnce(io::Error) -> ExportError + '_ {
    move |source| ExportError::Io {
        path: path.to_path_buf(),
        source,
    }
}

/// `vacancies_<slug>_<YYYYmmdd_HHMMSS>` for a search keyword.
#[must_use]
pub fn export_file_stem<Tz>(keyword: &str, at: &DateTime<Tz>) -> String
where
    Tz: TimeZone,
    Tz::Offset: std::fmt::Display,
{
    format!("vacancies_{}_{}", slug(keyword), at.format("%Y%m%d_%H%M%S"))
}

/// Lowercased alphanumeric runs joined by `_`; Cyrillic is kept as is.
fn slug(keyword: &str) -> String {
    let mut out = String::new();
    for ch in keyword.chars().flat_map(char::to_lowercase) {
        if ch.is_alphanumeric() {
            out.push(ch);
        } else if !out.is_empty() && !out.ends_with('_') {
            out.push('_');
        }
        if out.chars().count() >= MAX_SLUG_CHARS {
            break;
        }
    }
    let trimmed = out.trim_end_matches('_');
    if trimmed.is_empty() {
        "search".to_owned()
    } else {
        trimmed.to_owned()
    }
}

#[cfg(test)]
mod tests {
    use chrono::Utc;

    use super::*;

    fn record(n: usize) -> ListingRecord {
        ListingRecord {
            title: format!("Job {n}"),
            company: "Acme, Inc.".to_owned(),
            salary_display: "100000 - ? RUR".to_owned(),
            description: "Line one\nline two".to_owned(),
            url: format!("https://hh.ru/vacancy/{n}"),
        }
    }

    #[test]
    fn writes_header_and_rows() {
        let dir = tempfile::tempdir().unwrap();
        let exporter = CsvExporter::new(dir.path());

        let path = exporter.export(&[record(1), record(2)], "vacancies_test").unwrap();
        assert_eq!(path, dir.path().join("vacancies_test.csv"));

        let mut reader = csv::Reader::from_path(&path).unwrap();
        let headers = reader.headers().unwrap().clone();
        assert_eq!(headers.iter().collect::<Vec<_>>(), COLUMNS.to_vec());

        let rows: Vec<csv::StringRecord> = reader.records().map(Result::unwrap).collect();
        assert_eq!(rows.len(), 2);
        assert_eq!(&rows[0][0], "Job 1");
        assert_eq!(&rows[0][1], "Acme, Inc.");
        assert_eq!(&rows[0][3], "Line one\nline two");
        assert_eq!(&rows[1][4], "https://hh.ru/vacancy/2");
    }

    #[test]
    fn creates_missing_directory_and_leaves_no_partial() {
        let dir = tempfile::tempdir().unwrap();
        let nested = dir.path().join("exports").join("today");
        let exporter = CsvExporter::new(&nested);

        exporter.export(&[record(1)], "run").unwrap();

        let names: Vec<String> = fs::read_dir(&nested)
            .unwrap()
            .map(|e| e.unwrap().file_name().to_string_lossy().into_owned())
            .collect();
        assert_eq!(names, vec!["run.csv".to_owned()]);
    }

    #[test]
    fn unwritable_directory_is_an_io_error() {
        let dir = tempfile::tempdir().unwrap();
        let blocker = dir.path().join("not-a-dir");
        fs::write(&blocker, b"file").unwrap();

        let exporter = CsvExporter::new(&blocker);
        let result = exporter.export(&[record(1)], "run");
        assert!(matches!(result, Err(ExportError::Io { .. })), "got {result:?}");
    }

    #[test]
    fn file_stem_has_slug_and_timestamp() {
        let at = Utc.with_ymd_and_hms(2024, 3, 9, 14, 5, 7).unwrap();
        assert_eq!(
            export_file_stem("Python developer", &at),
            "vacancies_python_developer_20240309_140507"
        );
    }

    #[test]
    fn slug_keeps_cyrillic_and_collapses_separators() {
        assert_eq!(slug("  Java / Разработчик!! "), "java_разработчик");
        assert_eq!(slug("C++"), "c");
        assert_eq!(slug("///"), "search");
    }

    #[test]
    fn slug_is_bounded() {
        let long = "a".repeat(200);
        assert_eq!(slug(&long).chars().count(), MAX_SLUG_CHARS);
    }
}
