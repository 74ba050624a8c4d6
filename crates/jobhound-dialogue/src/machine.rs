//! Step-by-step criteria collection.
//!
//! Order is fixed: keyword, salary, employment, schedule, city. Each answer
//! is validated for the current step; an invalid answer re-prompts without
//! changing state. The city step never re-prompts: an unknown city resolves
//! to the nationwide region.

use std::sync::Arc;

use jobhound_core::vocabulary::{self, CITIES, EMPLOYMENT, SCHEDULE};
use jobhound_core::{Employment, Schedule, SearchCriteria};

use crate::error::DialogueError;
use crate::extract::resolve_city;
use crate::prompts;
use crate::session::{DialogueState, Session, SessionId, SessionStore};

/// Message for the user, with an optional choice set to render as buttons.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Reply {
    pub prompt: String,
    pub choices: Option<Vec<String>>,
    /// The dialogue is over; the host should drop any choice keyboard.
    pub done: bool,
}

impl Reply {
    fn text(prompt: impl Into<String>) -> Self {
        Self {
            prompt: prompt.into(),
            choices: None,
            done: false,
        }
    }

    fn with_choices(prompt: impl Into<String>, choices: Vec<String>) -> Self {
        Self {
            prompt: prompt.into(),
            choices: Some(choices),
            done: false,
        }
    }

    fn finished(prompt: impl Into<String>) -> Self {
        Self {
            prompt: prompt.into(),
            choices: None,
            done: true,
        }
    }
}

/// Result of one [`DialogueStateMachine::advance`] call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Step {
    pub reply: Reply,
    /// Present exactly once, on the step that completes the dialogue.
    pub criteria: Option<SearchCriteria>,
}

/// Result of [`DialogueStateMachine::cancel`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Cancellation {
    pub reply: Reply,
    /// A session was active and has been discarded.
    pub existed: bool,
}

/// Drives sessions held in a shared [`SessionStore`].
#[derive(Debug, Clone)]
pub struct DialogueStateMachine {
    store: Arc<SessionStore>,
}

impl DialogueStateMachine {
    #[must_use]
    pub fn new(store: Arc<SessionStore>) -> Self {
        Self { store }
    }

    #[must_use]
    pub fn store(&self) -> &SessionStore {
        &self.store
    }

    /// Opens a fresh session for `id`, discarding any session in progress.
    pub fn start(&self, id: SessionId) -> Reply {
        tracing::info!(session = %id, "dialogue started");
        self.store.open(id);
        Reply::text(prompts::GREETING)
    }

    /// Feeds one user answer into the session for `id`.
    ///
    /// On the final step the session is removed from the store while still
    /// locked, so the returned criteria are produced at most once.
    ///
    /// # Errors
    ///
    /// Returns [`DialogueError::NoActiveSession`] if `id` has no session (never
    /// started, already completed, or cancelled).
    pub async fn advance(&self, id: &SessionId, text: &str) -> Result<Step, DialogueError> {
        let slot = self
            .store
            .get(id)
            .ok_or_else(|| DialogueError::NoActiveSession(id.clone()))?;
        let mut session = slot.lock().await;
        if slot.is_closed() {
            return Err(DialogueError::NoActiveSession(id.clone()));
        }

        let step = transition(&mut session, text)?;
        if session.state() == DialogueState::Done {
            self.store.close(id, &slot);
            tracing::info!(session = %id, "dialogue completed");
        }
        Ok(step)
    }

    /// Discards the session for `id`, if any. Criteria are never produced for
    /// a cancelled session.
    pub async fn cancel(&self, id: &SessionId) -> Cancellation {
        let existed = match self.store.get(id) {
            Some(slot) => {
                let _session = slot.lock().await;
                self.store.close(id, &slot)
            }
            None => false,
        };
        tracing::info!(session = %id, existed, "dialogue cancelled");
        Cancellation {
            reply: Reply::finished(prompts::CANCELLED),
            existed,
        }
    }
}

fn transition(session: &mut Session, text: &str) -> Result<Step, DialogueError> {
    let answer = text.trim();
    let state = session.state();
    tracing::debug!(session = %session.id(), ?state, "dialogue answer received");

    let reply = match state {
        DialogueState::AwaitingKeyword => {
            if answer.is_empty() {
                tracing::warn!(session = %session.id(), "empty keyword");
                return Ok(reprompt(prompts::KEYWORD_RETRY, None));
            }
            session.partial_mut().keyword(answer);
            Reply::text(prompts::ASK_SALARY)
        }
        DialogueState::AwaitingSalary => {
            let Ok(salary) = answer.parse::<u64>() else {
                tracing::warn!(session = %session.id(), input = answer, "invalid salary");
                return Ok(reprompt(prompts::SALARY_RETRY, None));
            };
            session.partial_mut().salary_from(Some(salary));
            Reply::with_choices(prompts::ASK_EMPLOYMENT, vocabulary::labels(EMPLOYMENT))
        }
        DialogueState::AwaitingEmployment => {
            let Some(employment) = Employment::from_label(answer) else {
                tracing::warn!(session = %session.id(), input = answer, "unknown employment type");
                return Ok(reprompt(
                    prompts::EMPLOYMENT_RETRY,
                    Some(vocabulary::labels(EMPLOYMENT)),
                ));
            };
            session.partial_mut().employment(Some(employment));
            Reply::with_choices(prompts::ASK_SCHEDULE, vocabulary::labels(SCHEDULE))
        }
        DialogueState::AwaitingSchedule => {
            let Some(schedule) = Schedule::from_label(answer) else {
                tracing::warn!(session = %session.id(), input = answer, "unknown schedule");
                return Ok(reprompt(
                    prompts::SCHEDULE_RETRY,
                    Some(vocabulary::labels(SCHEDULE)),
                ));
            };
            session.partial_mut().schedule(Some(schedule));
            Reply::with_choices(prompts::ASK_CITY, vocabulary::labels(CITIES))
        }
        DialogueState::AwaitingCity => {
            let area = resolve_city(answer);
            tracing::debug!(session = %session.id(), input = answer, %area, "city resolved");
            session.partial_mut().area(Some(area));
            let criteria = session.partial().build()?;
            session.advance_state();
            return Ok(Step {
                reply: Reply::finished(prompts::summary(&criteria)),
                criteria: Some(criteria),
            });
        }
        // Done sessions are removed before the lock is released.
        DialogueState::Done => {
            return Err(DialogueError::NoActiveSession(session.id().clone()));
        }
    };

    session.advance_state();
    tracing::debug!(session = %session.id(), state = ?session.state(), "dialogue advanced");
    Ok(Step {
        reply,
        criteria: None,
    })
}

fn reprompt(prompt: &str, choices: Option<Vec<String>>) -> Step {
    Step {
        reply: Reply {
            prompt: prompt.to_owned(),
            choices,
            done: false,
        },
        criteria: None,
    }
}

#[cfg(test)]
#[path = "machine_test.rs"]
mod tests;
