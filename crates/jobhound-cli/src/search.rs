//! Search execution shared by the `search` and `chat` commands.
//!
//! A run never fails as a whole because of the listings API: page and
//! description failures are already folded into the [`SearchReport`]. Only an
//! export failure is reported as an error, and the preview is still shown.

use std::path::PathBuf;
use std::time::Duration;

use anyhow::Context;
use chrono::Local;
use jobhound_core::{AppConfig, SearchCriteria};
use jobhound_dialogue::{prompts, FilterExtractor};
use jobhound_listings::{render_preview, AggregationPipeline, HhClient, SearchReport, TokenBucket};
use tokio_util::sync::CancellationToken;

use crate::export::{export_file_stem, CsvExporter, ExportError, Exporter};

pub(crate) type Pipeline = AggregationPipeline<HhClient>;

/// Builds the production pipeline from config.
pub(crate) fn build_pipeline(config: &AppConfig) -> anyhow::Result<Pipeline> {
    let client = HhClient::from_config(config).context("failed to build listings client")?;
    let limiter = TokenBucket::per_interval(Duration::from_millis(config.page_interval_ms));
    Ok(AggregationPipeline::new(client, limiter, config.page_budget))
}

#[derive(Debug)]
pub(crate) enum ExportStatus {
    Skipped,
    Written(PathBuf),
    Failed(ExportError),
}

#[derive(Debug)]
pub(crate) struct SearchOutcome {
    pub keyword: String,
    pub preview: String,
    pub export: ExportStatus,
    pub total: usize,
    pub cancelled: bool,
}

impl SearchOutcome {
    /// Text shown to the user once a search finishes.
    pub(crate) fn render(&self) -> String {
        let mut out = String::new();
        if self.cancelled {
            out.push_str("⏹ Поиск прерван, показаны найденные до остановки вакансии.\n\n");
        }
        if self.total > 0 {
            out.push_str(&format!("✅ Найдено вакансий: {}\n\n", self.total));
        }
        out.push_str(&self.preview);
        match &self.export {
            ExportStatus::Skipped => {}
            ExportStatus::Written(path) => {
                out.push_str(&format!("\n\n📎 Файл с вакансиями: {}", path.display()));
            }
            ExportStatus::Failed(err) => {
                out.push_str(&format!("\n\n⚠️ Не удалось сохранить файл: {err}"));
            }
        }
        out
    }
}

/// Renders the preview and exports the records, if there are any.
pub(crate) fn finish_search(
    criteria: &SearchCriteria,
    report: SearchReport,
    exporter: Option<&dyn Exporter>,
    preview_limit: usize,
) -> SearchOutcome {
    let api_unavailable = report.all_pages_failed();
    if api_unavailable {
        tracing::warn!(
            keyword = criteria.keyword(),
            failed_pages = report.page_failures.len(),
            "every listings page failed"
        );
    }

    let cancelled = report.cancelled;
    let records = report.into_records();
    let preview = render_preview(&records, preview_limit);

    let export = match exporter {
        Some(exporter) if !records.is_empty() => {
            let stem = export_file_stem(criteria.keyword(), &Local::now());
            match exporter.export(&records, &stem) {
                Ok(path) => ExportStatus::Written(path),
                Err(err) => {
                    tracing::error!(error = %err, "export failed");
                    ExportStatus::Failed(err)
                }
            }
        }
        _ => ExportStatus::Skipped,
    };

    SearchOutcome {
        keyword: criteria.keyword().to_owned(),
        preview,
        export,
        total: records.len(),
        cancelled,
    }
}

/// Cancels `token` on the first Ctrl-C.
pub(crate) async fn cancel_on_ctrl_c(token: CancellationToken) {
    match tokio::signal::ctrl_c().await {
        Ok(()) => {
            tracing::info!("interrupt received; stopping search");
            token.cancel();
        }
        Err(err) => tracing::warn!(error = %err, "failed to listen for ctrl-c"),
    }
}

/// `jobhound search`: free text → filters → pipeline → preview (+ CSV).
pub(crate) async fn run_search(config: &AppConfig, text: &str, export: bool) -> anyhow::Result<()> {
    let criteria = FilterExtractor::new()
        .criteria_from_text(text)
        .context("the request has no search keyword left after removing filters")?;
    println!("{}\n", prompts::summary(&criteria));

    let pipeline = build_pipeline(config)?;
    let cancel = CancellationToken::new();
    let watcher = tokio::spawn(cancel_on_ctrl_c(cancel.clone()));
    let report = pipeline.run(&criteria, &cancel).await;
    watcher.abort();

    let exporter = CsvExporter::new(&config.export_dir);
    let exporter = export.then_some(&exporter as &dyn Exporter);
    let outcome = finish_search(&criteria, report, exporter, config.preview_limit);
    println!("{}", outcome.render());

    if let ExportStatus::Failed(err) = outcome.export {
        return Err(anyhow::Error::new(err).context("search finished but export failed"));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;

    use jobhound_core::{CriteriaBuilder, ListingRecord};
    use jobhound_listings::{ListingError, PageFailure};

    use super::*;

    fn criteria() -> SearchCriteria {
        let mut builder = CriteriaBuilder::new();
        builder.keyword("rust");
        builder.build().unwrap()
    }

    fn record(n: usize) -> ListingRecord {
        ListingRecord {
            title: format!("Job {n}"),
            company: "Acme".to_owned(),
            salary_display: "Не указана".to_owned(),
            description: "text".to_owned(),
            url: format!("https://hh.ru/vacancy/{n}"),
        }
    }

    fn report(records: Vec<ListingRecord>) -> SearchReport {
        SearchReport {
            records,
            pages_attempted: 1,
            ..SearchReport::default()
        }
    }

    struct FailingExporter;

    impl Exporter for FailingExporter {
        fn export(&self, _: &[ListingRecord], _: &str) -> Result<PathBuf, ExportError> {
            Err(ExportError::Io {
                path: PathBuf::from("/nowhere"),
                source: std::io::Error::other("disk full"),
            })
        }
    }

    #[derive(Default)]
    struct RecordingExporter {
        stems: Mutex<Vec<String>>,
    }

    impl Exporter for RecordingExporter {
        fn export(&self, records: &[ListingRecord], stem: &str) -> Result<PathBuf, ExportError> {
            assert!(!records.is_empty());
            self.stems.lock().unwrap().push(stem.to_owned());
            Ok(PathBuf::from(format!("{stem}.csv")))
        }
    }

    #[test]
    fn export_failure_still_shows_preview() {
        let outcome = finish_search(&criteria(), report(vec![record(1)]), Some(&FailingExporter), 5);

        assert!(matches!(outcome.export, ExportStatus::Failed(_)));
        assert!(outcome.preview.starts_with("1. Job 1 (Acme)"));
        let text = outcome.render();
        assert!(text.contains("1. Job 1"));
        assert!(text.contains("disk full"));
    }

    #[test]
    fn successful_export_uses_keyword_stem() {
        let exporter = RecordingExporter::default();
        let outcome = finish_search(&criteria(), report(vec![record(1), record(2)]), Some(&exporter), 5);

        assert_eq!(outcome.total, 2);
        let stems = exporter.stems.lock().unwrap();
        assert_eq!(stems.len(), 1);
        assert!(stems[0].starts_with("vacancies_rust_"), "stem {}", stems[0]);
        assert!(matches!(outcome.export, ExportStatus::Written(_)));
    }

    #[test]
    fn empty_result_skips_export() {
        let exporter = RecordingExporter::default();
        let outcome = finish_search(&criteria(), report(Vec::new()), Some(&exporter), 5);

        assert!(matches!(outcome.export, ExportStatus::Skipped));
        assert_eq!(outcome.preview, "Вакансии не найдены");
        assert!(exporter.stems.lock().unwrap().is_empty());
    }

    #[test]
    fn total_api_failure_reads_as_no_results() {
        let mut failed = report(Vec::new());
        failed.pages_attempted = 1;
        failed.page_failures.push(PageFailure {
            page: 0,
            error: ListingError::UnexpectedStatus {
                status: 503,
                url: "https://api.hh.ru/vacancies".to_owned(),
            },
        });

        let outcome = finish_search(&criteria(), failed, None, 5);
        assert_eq!(outcome.total, 0);
        assert_eq!(outcome.render(), "Вакансии не найдены");
    }

    #[test]
    fn cancelled_run_is_flagged() {
        let mut partial = report(vec![record(1)]);
        partial.cancelled = true;

        let outcome = finish_search(&criteria(), partial, None, 5);
        let text = outcome.render();
        assert!(text.starts_with("⏹"));
        assert!(text.contains("1. Job 1"));
    }
}
