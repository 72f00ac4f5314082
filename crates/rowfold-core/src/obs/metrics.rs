use crate::error::ConflictKind;
use serde::{Deserialize, Serialize};
use std::cell::RefCell;

///
/// EventState
/// Ephemeral, in-memory counters for fold activity on this thread.
///

#[derive(Clone, Debug, Default, Deserialize, Serialize)]
pub(crate) struct EventState {
    pub(crate) ops: EventOps,
}

///
/// EventOps
///

#[derive(Clone, Debug, Default, Deserialize, Eq, PartialEq, Serialize)]
pub struct EventOps {
    // Fold entrypoints
    pub fold_calls: u64,

    // Rows
    pub rows_merged: u64,
    pub rows_skipped: u64,

    // Collections
    pub members_inserted: u64,

    // Conflicts
    pub arity_conflicts: u64,
    pub identity_conflicts: u64,
    pub type_conflicts: u64,
    pub value_conflicts: u64,
}

impl EventOps {
    /// Total conflicts across every kind.
    #[must_use]
    pub const fn conflicts(&self) -> u64 {
        self.arity_conflicts
            .saturating_add(self.identity_conflicts)
            .saturating_add(self.type_conflicts)
            .saturating_add(self.value_conflicts)
    }

    pub(crate) const fn record_conflict(&mut self, kind: ConflictKind) {
        let slot = match kind {
            ConflictKind::Arity => &mut self.arity_conflicts,
            ConflictKind::Identity => &mut self.identity_conflicts,
            ConflictKind::Type => &mut self.type_conflicts,
            ConflictKind::Value => &mut self.value_conflicts,
        };
        *slot = slot.saturating_add(1);
    }
}

///
/// EventReport
/// Point-in-time snapshot of the thread's fold counters.
///

#[derive(Clone, Debug, Default, Deserialize, Eq, PartialEq, Serialize)]
pub struct EventReport {
    pub ops: EventOps,
}

thread_local! {
    static EVENT_STATE: RefCell<EventState> = RefCell::new(EventState::default());
}

/// Borrow metrics mutably.
pub(crate) fn with_state_mut<R>(f: impl FnOnce(&mut EventState) -> R) -> R {
    EVENT_STATE.with(|m| f(&mut m.borrow_mut()))
}

/// Reset all counters.
pub(crate) fn reset_all() {
    with_state_mut(|m| *m = EventState::default());
}

/// Build a report from the current state.
#[must_use]
pub(crate) fn report() -> EventReport {
    EVENT_STATE.with(|m| EventReport {
        ops: m.borrow().ops.clone(),
    })
}
