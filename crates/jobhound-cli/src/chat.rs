//! Interactive terminal host for the criteria dialogue.
//!
//! Stands in for a chat transport: each stdin line is one message. Completed
//! dialogues spawn a search task that reports back over a channel, so the
//! prompt stays responsive while pages are fetched. Ctrl-C cancels running
//! searches; with none running it exits.

use std::sync::Arc;

use jobhound_core::{AppConfig, SearchCriteria};
use jobhound_dialogue::{prompts, DialogueError, DialogueStateMachine, Reply, SessionId, SessionStore};
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;

use crate::export::{CsvExporter, Exporter};
use crate::search::{build_pipeline, finish_search, Pipeline, SearchOutcome};

const HELP: &str = "Команды: /start (новый поиск), /cancel (отменить), /quit (выход).\n\
    Варианты ответа можно выбирать по номеру.";

#[derive(Debug, PartialEq, Eq)]
enum Input<'a> {
    Start,
    Cancel,
    Quit,
    Help,
    Answer(&'a str),
}

fn parse_input(line: &str) -> Input<'_> {
    match line.trim() {
        "/start" => Input::Start,
        "/cancel" => Input::Cancel,
        "/quit" | "/exit" => Input::Quit,
        "/help" => Input::Help,
        other => Input::Answer(other),
    }
}

/// Maps a numeric answer onto the last offered choice set.
fn resolve_choice<'a>(answer: &'a str, choices: Option<&'a [String]>) -> &'a str {
    let Some(choices) = choices else {
        return answer;
    };
    answer
        .parse::<usize>()
        .ok()
        .and_then(|n| n.checked_sub(1))
        .and_then(|i| choices.get(i))
        .map_or(answer, String::as_str)
}

fn render_reply(reply: &Reply) -> String {
    let mut out = reply.prompt.clone();
    if let Some(choices) = &reply.choices {
        for (i, choice) in choices.iter().enumerate() {
            out.push_str(&format!("\n  {}. {choice}", i + 1));
        }
    }
    out
}

struct SearchSpawner {
    pipeline: Arc<Pipeline>,
    exporter: Arc<dyn Exporter>,
    preview_limit: usize,
    results: mpsc::Sender<SearchOutcome>,
}

impl SearchSpawner {
    fn spawn(&self, criteria: SearchCriteria, cancel: CancellationToken) {
        let pipeline = Arc::clone(&self.pipeline);
        let exporter = Arc::clone(&self.exporter);
        let preview_limit = self.preview_limit;
        let results = self.results.clone();

        tokio::spawn(async move {
            let report = pipeline.run(&criteria, &cancel).await;
            let outcome = finish_search(&criteria, report, Some(exporter.as_ref()), preview_limit);
            if results.send(outcome).await.is_err() {
                tracing::debug!(keyword = criteria.keyword(), "chat closed before search finished");
            }
        });
    }
}

/// `jobhound chat`: runs the dialogue for one session on stdin/stdout.
pub(crate) async fn run_chat(config: &AppConfig, session: SessionId) -> anyhow::Result<()> {
    let machine = DialogueStateMachine::new(Arc::new(SessionStore::new()));
    let (results_tx, mut results) = mpsc::channel(8);
    let spawner = SearchSpawner {
        pipeline: Arc::new(build_pipeline(config)?),
        exporter: Arc::new(CsvExporter::new(&config.export_dir)),
        preview_limit: config.preview_limit,
        results: results_tx,
    };

    let mut searches = CancellationToken::new();
    let mut running: usize = 0;
    let mut choices: Option<Vec<String>> = None;
    let mut lines = BufReader::new(tokio::io::stdin()).lines();

    println!("{HELP}\n");
    let reply = machine.start(session.clone());
    println!("{}", render_reply(&reply));

    loop {
        tokio::select! {
            line = lines.next_line() => {
                let Some(line) = line? else {
                    break;
                };
                match parse_input(&line) {
                    Input::Quit => break,
                    Input::Help => println!("{HELP}"),
                    Input::Start => {
                        let reply = machine.start(session.clone());
                        choices = reply.choices.clone();
                        println!("{}", render_reply(&reply));
                    }
                    Input::Cancel => {
                        let cancellation = machine.cancel(&session).await;
                        choices = None;
                        println!("{}", render_reply(&cancellation.reply));
                    }
                    Input::Answer(text) => {
                        let answer = resolve_choice(text, choices.as_deref());
                        match machine.advance(&session, answer).await {
                            Ok(step) => {
                                choices = step.reply.choices.clone();
                                println!("{}", render_reply(&step.reply));
                                if let Some(criteria) = step.criteria {
                                    println!("\n⏳ Ищу вакансии...");
                                    spawner.spawn(criteria, searches.clone());
                                    running += 1;
                                }
                            }
                            Err(DialogueError::NoActiveSession(_)) => println!("{}", prompts::NOT_STARTED),
                            Err(err) => {
                                tracing::error!(session = %session, error = %err, "dialogue failed");
                                println!("Произошла ошибка, попробуйте снова.");
                            }
                        }
                    }
                }
            }
            Some(outcome) = results.recv() => {
                running = running.saturating_sub(1);
                println!("\n🔔 Результаты по запросу «{}»:\n{}", outcome.keyword, outcome.render());
            }
            signal = tokio::signal::ctrl_c() => {
                if let Err(err) = signal {
                    tracing::warn!(error = %err, "failed to listen for ctrl-c");
                    break;
                }
                if running == 0 {
                    break;
                }
                println!("\n⏹ Останавливаю поиск...");
                searches.cancel();
                searches = CancellationToken::new();
            }
        }
    }

    // Let in-flight searches report what they collected.
    searches.cancel();
    while running > 0 {
        let Some(outcome) = results.recv().await else {
            break;
        };
        running -= 1;
        println!("\n🔔 Результаты по запросу «{}»:\n{}", outcome.keyword, outcome.render());
    }

    Ok(())
}
