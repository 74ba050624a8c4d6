//! In-memory session storage.
//!
//! The store maps a [`SessionId`] to a slot holding one [`Session`] behind an
//! async mutex. The map lock is only held to look up, insert, or remove a
//! slot; all per-session work happens under the slot's own lock, so distinct
//! sessions never contend with each other.
//!
//! Sessions are not persisted; a restart loses every in-progress dialogue.

use std::collections::HashMap;
use std::fmt;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, PoisonError};

use jobhound_core::CriteriaBuilder;

/// Opaque per-user key. Chat transports typically use a numeric chat id.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct SessionId(String);

impl SessionId {
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<i64> for SessionId {
    fn from(id: i64) -> Self {
        Self(id.to_string())
    }
}

impl From<&str> for SessionId {
    fn from(id: &str) -> Self {
        Self(id.to_owned())
    }
}

impl From<String> for SessionId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

impl fmt::Display for SessionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Position in the criteria-collection dialogue. Transitions are strictly
/// linear; an invalid answer leaves the state unchanged.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DialogueState {
    AwaitingKeyword,
    AwaitingSalary,
    AwaitingEmployment,
    AwaitingSchedule,
    AwaitingCity,
    Done,
}

impl DialogueState {
    /// The state that follows a valid answer in this one.
    #[must_use]
    pub fn next(self) -> Self {
        match self {
            DialogueState::AwaitingKeyword => DialogueState::AwaitingSalary,
            DialogueState::AwaitingSalary => DialogueState::AwaitingEmployment,
            DialogueState::AwaitingEmployment => DialogueState::AwaitingSchedule,
            DialogueState::AwaitingSchedule => DialogueState::AwaitingCity,
            DialogueState::AwaitingCity | DialogueState::Done => DialogueState::Done,
        }
    }
}

/// One user's in-progress criteria collection.
#[derive(Debug, Clone)]
pub struct Session {
    id: SessionId,
    state: DialogueState,
    partial: CriteriaBuilder,
}

impl Session {
    #[must_use]
    pub fn new(id: SessionId) -> Self {
        Self {
            id,
            state: DialogueState::AwaitingKeyword,
            partial: CriteriaBuilder::new(),
        }
    }

    #[must_use]
    pub fn id(&self) -> &SessionId {
        &self.id
    }

    #[must_use]
    pub fn state(&self) -> DialogueState {
        self.state
    }

    #[must_use]
    pub fn partial(&self) -> &CriteriaBuilder {
        &self.partial
    }

    pub(crate) fn partial_mut(&mut self) -> &mut CriteriaBuilder {
        &mut self.partial
    }

    pub(crate) fn advance_state(&mut self) {
        self.state = self.state.next();
    }
}

/// Storage slot for a single session.
///
/// `closed` is set when the slot leaves the map (completion, cancellation, or
/// replacement by a new start). A task that fetched the slot earlier must
/// check it after taking the lock.
#[derive(Debug)]
pub struct SessionSlot {
    session: tokio::sync::Mutex<Session>,
    closed: AtomicBool,
}

impl SessionSlot {
    fn new(session: Session) -> Self {
        Self {
            session: tokio::sync::Mutex::new(session),
            closed: AtomicBool::new(false),
        }
    }

    pub async fn lock(&self) -> tokio::sync::MutexGuard<'_, Session> {
        self.session.lock().await
    }

    #[must_use]
    pub fn is_closed(&self) -> bool {
        self.closed.load(Ordering::Acquire)
    }

    fn close(&self) {
        self.closed.store(true, Ordering::Release);
    }
}

/// Process-wide session map. Construct once and share via `Arc`.
#[derive(Debug, Default)]
pub struct SessionStore {
    slots: Mutex<HashMap<SessionId, Arc<SessionSlot>>>,
}

impl SessionStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts a fresh session for `id`, closing any session it replaces.
    pub fn open(&self, id: SessionId) -> Arc<SessionSlot> {
        let slot = Arc::new(SessionSlot::new(Session::new(id.clone())));
        let replaced = self.slots().insert(id, Arc::clone(&slot));
        if let Some(old) = replaced {
            old.close();
        }
        slot
    }

    #[must_use]
    pub fn get(&self, id: &SessionId) -> Option<Arc<SessionSlot>> {
        self.slots().get(id).cloned()
    }

    /// Removes `slot` from the map and marks it closed.
    ///
    /// The entry for `id` is only removed if it still points at `slot`; a
    /// newer session opened under the same id is left alone. Returns `false`
    /// if `slot` was already closed.
    pub fn close(&self, id: &SessionId, slot: &Arc<SessionSlot>) -> bool {
        if slot.is_closed() {
            return false;
        }
        {
            let mut slots = self.slots();
            if slots.get(id).is_some_and(|current| Arc::ptr_eq(current, slot)) {
                slots.remove(id);
            }
        }
        slot.close();
        true
    }

    #[must_use]
    pub fn contains(&self, id: &SessionId) -> bool {
        self.slots().contains_key(id)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.slots().len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.slots().is_empty()
    }

    fn slots(&self) -> std::sync::MutexGuard<'_, HashMap<SessionId, Arc<SessionSlot>>> {
        // The map is never left half-updated, so a poisoned lock is still usable.
        self.slots.lock().unwrap_or_else(PoisonError::into_inner)
    }
}
