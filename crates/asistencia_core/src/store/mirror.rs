//! Durable mirror of attendance state.
//!
//! # Responsibility
//! - Restore the last saved snapshot once at startup.
//! - Re-serialize the store into its slot after each mutation.
//!
//! # Invariants
//! - `sync` is a no-op until `restore` has run.
//! - Read, write and remove failures are logged and never surfaced.
//! - A store with no records or no session leaves no slot behind.

use crate::repo::slot_repo::SlotRepository;
use crate::store::attendance_store::AttendanceStore;
use crate::store::snapshot::PersistedSnapshot;
use log::{debug, error, info, warn};

/// Default slot key holding the attendance snapshot.
pub const DEFAULT_SLOT_KEY: &str = "attendanceData";

/// Keeps one durable slot in step with an `AttendanceStore`.
pub struct PersistenceMirror<R: SlotRepository> {
    repo: R,
    slot_key: String,
    restored: bool,
}

impl<R: SlotRepository> PersistenceMirror<R> {
    pub fn new(repo: R) -> Self {
        Self::with_slot_key(repo, DEFAULT_SLOT_KEY)
    }

    pub fn with_slot_key(repo: R, slot_key: impl Into<String>) -> Self {
        Self {
            repo,
            slot_key: slot_key.into(),
            restored: false,
        }
    }

    pub fn slot_key(&self) -> &str {
        &self.slot_key
    }

    /// Whether the startup restore attempt already ran.
    pub fn is_restored(&self) -> bool {
        self.restored
    }

    /// Reads the slot and returns a valid snapshot, if any.
    ///
    /// Runs at most once; later calls return `None` without touching the slot.
    /// Every failure path falls back to `None`.
    pub fn restore(&mut self) -> Option<PersistedSnapshot> {
        if self.restored {
            warn!(
                "event=slot_restore module=mirror status=skipped reason=already_restored key={}",
                self.slot_key
            );
            return None;
        }
        self.restored = true;

        let raw = match self.repo.get_slot(&self.slot_key) {
            Ok(Some(raw)) => raw,
            Ok(None) => {
                info!(
                    "event=slot_restore module=mirror status=empty key={}",
                    self.slot_key
                );
                return None;
            }
            Err(err) => {
                warn!(
                    "event=slot_restore module=mirror status=error error_code=slot_read_failed key={} error={}",
                    self.slot_key, err
                );
                return None;
            }
        };

        match PersistedSnapshot::from_json(&raw) {
            Ok(snapshot) => {
                info!(
                    "event=slot_restore module=mirror status=ok key={} count={}",
                    self.slot_key,
                    snapshot.attendees.len()
                );
                Some(snapshot)
            }
            Err(err) => {
                warn!(
                    "event=slot_restore module=mirror status=error error_code=slot_malformed key={} error={}",
                    self.slot_key, err
                );
                None
            }
        }
    }

    /// Writes or removes the slot to match `store`.
    pub fn sync(&self, store: &AttendanceStore) {
        if !self.restored {
            debug!(
                "event=slot_write module=mirror status=skipped reason=restore_pending key={}",
                self.slot_key
            );
            return;
        }

        match store.snapshot() {
            Some(snapshot) => self.write(&snapshot),
            None => self.clear(),
        }
    }

    /// Removes the slot.
    pub fn clear(&self) {
        match self.repo.remove_slot(&self.slot_key) {
            Ok(()) => debug!(
                "event=slot_remove module=mirror status=ok key={}",
                self.slot_key
            ),
            Err(err) => error!(
                "event=slot_remove module=mirror status=error error_code=slot_remove_failed key={} error={}",
                self.slot_key, err
            ),
        }
    }

    fn write(&self, snapshot: &PersistedSnapshot) {
        let json = match snapshot.to_json() {
            Ok(json) => json,
            Err(err) => {
                error!(
                    "event=slot_write module=mirror status=error error_code=slot_encode_failed key={} error={}",
                    self.slot_key, err
                );
                return;
            }
        };

        match self.repo.put_slot(&self.slot_key, &json) {
            Ok(()) => debug!(
                "event=slot_write module=mirror status=ok key={} count={} bytes={}",
                self.slot_key,
                snapshot.attendees.len(),
                json.len()
            ),
            Err(err) => error!(
                "event=slot_write module=mirror status=error error_code=slot_write_failed key={} error={}",
                self.slot_key, err
            ),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::PersistenceMirror;
    use crate::db::open_db_in_memory;
    use crate::model::session::{MeetingKind, SessionGroup, SessionMetadata};
    use crate::repo::slot_repo::{SlotRepository, SqliteSlotRepository};
    use crate::store::attendance_store::AttendanceStore;

    fn session() -> SessionMetadata {
        SessionMetadata::new(SessionGroup::Consejo, MeetingKind::Ordinaria)
    }

    #[test]
    fn sync_before_restore_does_not_clobber_saved_slot() {
        let conn = open_db_in_memory().unwrap();
        let repo = SqliteSlotRepository::new(&conn);
        repo.put_slot("attendanceData", "previous").unwrap();

        let mirror = PersistenceMirror::new(&repo);
        mirror.sync(&AttendanceStore::new());

        assert_eq!(
            repo.get_slot("attendanceData").unwrap().as_deref(),
            Some("previous")
        );
    }

    #[test]
    fn restore_runs_only_once() {
        let conn = open_db_in_memory().unwrap();
        let repo = SqliteSlotRepository::new(&conn);
        let mut store = AttendanceStore::new();
        store.load(["Ana"], session());
        repo.put_slot("attendanceData", &store.snapshot().unwrap().to_json().unwrap())
            .unwrap();

        let mut mirror = PersistenceMirror::new(&repo);
        assert!(mirror.restore().is_some());
        assert!(mirror.is_restored());
        assert!(mirror.restore().is_none());
    }

    #[test]
    fn sync_removes_slot_when_store_is_empty() {
        let conn = open_db_in_memory().unwrap();
        let repo = SqliteSlotRepository::new(&conn);
        let mut mirror = PersistenceMirror::with_slot_key(&repo, "custom");
        mirror.restore();

        let mut store = AttendanceStore::new();
        store.load(["Ana"], session());
        mirror.sync(&store);
        assert!(repo.get_slot("custom").unwrap().is_some());

        store.reset();
        mirror.sync(&store);
        assert!(repo.get_slot("custom").unwrap().is_none());
    }
}
