use jobhound_core::CriteriaError;
use thiserror::Error;

use crate::session::SessionId;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DialogueError {
    #[error("no active session for {0}")]
    NoActiveSession(SessionId),

    #[error("collected criteria are incomplete: {0}")]
    Criteria(#[from] CriteriaError),
}
