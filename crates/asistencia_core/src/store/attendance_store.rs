//! Attendance state container.
//!
//! # Responsibility
//! - Hold attendee records in load order together with session metadata.
//! - Expose `load`, `update_status`, `reset` as the only mutators.
//! - Dispatch observer callbacks after each mutation.
//!
//! # Invariants
//! - Attendee ids are unique within the store.
//! - `update_status` never adds, removes or reorders records.
//! - Session metadata is `None` exactly when no list has been loaded or the
//!   store was reset.

use crate::model::attendee::{AttendanceStatus, AttendeeId, AttendeeRecord};
use crate::model::session::SessionMetadata;
use crate::model::tally::AttendanceTally;
use crate::store::snapshot::PersistedSnapshot;
use log::{debug, info};
use std::fmt::{Debug, Formatter};

/// Mutation kind delivered to store observers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StoreEvent {
    Loaded { count: usize },
    StatusUpdated { id: AttendeeId, status: AttendanceStatus },
    Reset,
    Restored { count: usize },
}

/// Handle returned by `subscribe`, used to unsubscribe.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

/// Observer callback. Receives the store after the mutation was applied.
pub type StoreObserver = Box<dyn FnMut(&AttendanceStore, &StoreEvent)>;

/// Authoritative attendee collection plus session metadata.
#[derive(Default)]
pub struct AttendanceStore {
    attendees: Vec<AttendeeRecord>,
    session: Option<SessionMetadata>,
    observers: Vec<(SubscriptionId, StoreObserver)>,
    next_subscription: u64,
}

impl Debug for AttendanceStore {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AttendanceStore")
            .field("attendees", &self.attendees)
            .field("session", &self.session)
            .field("observers", &self.observers.len())
            .finish()
    }
}

impl AttendanceStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replaces the list and session with freshly created unmarked records.
    ///
    /// # Contract
    /// - Names are trimmed; input order is kept.
    /// - Every record gets a new id.
    /// - Empty input yields an empty list; no error is raised here.
    pub fn load<I, S>(&mut self, names: I, session: SessionMetadata)
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.attendees = names.into_iter().map(AttendeeRecord::new).collect();
        self.session = Some(session);

        let count = self.attendees.len();
        info!(
            "event=attendance_load module=store status=ok count={} session=\"{}\"",
            count, session
        );
        self.notify(StoreEvent::Loaded { count });
    }

    /// Sets the status of the record with `id`.
    ///
    /// Returns `false` and leaves the store untouched when `id` is unknown.
    pub fn update_status(&mut self, id: AttendeeId, status: AttendanceStatus) -> bool {
        let Some(record) = self.attendees.iter_mut().find(|record| record.id == id) else {
            debug!(
                "event=status_update module=store status=skipped reason=unknown_id id={}",
                id
            );
            return false;
        };

        record.status = status;
        debug!(
            "event=status_update module=store status=ok id={} value={}",
            id, status
        );
        self.notify(StoreEvent::StatusUpdated { id, status });
        true
    }

    /// Clears the list and session metadata.
    pub fn reset(&mut self) {
        self.attendees.clear();
        self.session = None;
        info!("event=attendance_reset module=store status=ok");
        self.notify(StoreEvent::Reset);
    }

    /// Adopts a previously persisted snapshot as current state.
    pub fn restore(&mut self, snapshot: PersistedSnapshot) {
        let count = snapshot.attendees.len();
        self.attendees = snapshot.attendees;
        self.session = Some(snapshot.session_type);
        self.notify(StoreEvent::Restored { count });
    }

    /// Registers an observer invoked after every mutation, in subscription order.
    pub fn subscribe(
        &mut self,
        observer: impl FnMut(&AttendanceStore, &StoreEvent) + 'static,
    ) -> SubscriptionId {
        let id = SubscriptionId(self.next_subscription);
        self.next_subscription += 1;
        self.observers.push((id, Box::new(observer)));
        id
    }

    /// Removes an observer. Returns whether it was registered.
    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        let before = self.observers.len();
        self.observers.retain(|(registered, _)| *registered != id);
        self.observers.len() != before
    }

    pub fn attendees(&self) -> &[AttendeeRecord] {
        &self.attendees
    }

    pub fn session(&self) -> Option<SessionMetadata> {
        self.session
    }

    pub fn get(&self, id: AttendeeId) -> Option<&AttendeeRecord> {
        self.attendees.iter().find(|record| record.id == id)
    }

    /// Index of `id` in load order.
    pub fn position(&self, id: AttendeeId) -> Option<usize> {
        self.attendees.iter().position(|record| record.id == id)
    }

    pub fn len(&self) -> usize {
        self.attendees.len()
    }

    pub fn is_empty(&self) -> bool {
        self.attendees.is_empty()
    }

    pub fn tally(&self) -> AttendanceTally {
        AttendanceTally::from_records(&self.attendees)
    }

    /// Returns the persistable pair, or `None` when there is nothing worth
    /// keeping (empty list or no session).
    pub fn snapshot(&self) -> Option<PersistedSnapshot> {
        match self.session {
            Some(session) if !self.attendees.is_empty() => Some(PersistedSnapshot {
                attendees: self.attendees.clone(),
                session_type: session,
            }),
            _ => None,
        }
    }

    fn notify(&mut self, event: StoreEvent) {
        if self.observers.is_empty() {
            return;
        }
        // Observers only get `&self`, so none can subscribe while dispatching.
        let mut observers = std::mem::take(&mut self.observers);
        for (_, observer) in observers.iter_mut() {
            observer(&*self, &event);
        }
        self.observers = observers;
    }
}
