//! Criteria collection for the job-search bot.
//!
//! Two entry paths produce a [`jobhound_core::SearchCriteria`]: the step-by-step
//! [`DialogueStateMachine`] backed by an injected [`SessionStore`], and the
//! one-message [`FilterExtractor`] that pattern-matches free text.

pub mod error;
pub mod extract;
pub mod machine;
pub mod prompts;
pub mod session;

mod tokenize;

pub use error::DialogueError;
pub use extract::{area_or_nationwide, resolve_area, resolve_city, FilterExtractor, FilterSet};
pub use machine::{Cancellation, DialogueStateMachine, Reply, Step};
pub use session::{DialogueState, Session, SessionId, SessionSlot, SessionStore};
