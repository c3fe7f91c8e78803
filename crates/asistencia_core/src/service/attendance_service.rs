//! Attendance use-case service.
//!
//! # Responsibility
//! - Own the attendance store and its persistence mirror as one unit.
//! - Restore the saved session once at startup.
//! - Serialize uploads: only one ingestion may be pending at a time.
//!
//! # Invariants
//! - Every mutation is mirrored to the durable slot after restore.
//! - A failed ingestion leaves store and slot untouched.
//! - `reset` always leaves no saved slot behind.

use crate::ingest::csv::{parse_names, IngestError, IngestResult};
use crate::model::attendee::{AttendanceStatus, AttendeeId, AttendeeRecord};
use crate::model::session::SessionMetadata;
use crate::model::tally::AttendanceTally;
use crate::repo::slot_repo::SlotRepository;
use crate::store::attendance_store::{AttendanceStore, StoreEvent, SubscriptionId};
use crate::store::mirror::PersistenceMirror;
use log::{info, warn};
use std::path::Path;

/// Handle for one in-flight upload.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UploadTicket(u64);

/// Store plus durable mirror, driven by one operator.
pub struct AttendanceService<R: SlotRepository> {
    store: AttendanceStore,
    mirror: PersistenceMirror<R>,
    pending_upload: Option<UploadTicket>,
    next_ticket: u64,
}

impl<R: SlotRepository> AttendanceService<R> {
    /// Creates a service over `repo` using the default slot key.
    ///
    /// Nothing is read until `start` is called.
    pub fn new(repo: R) -> Self {
        Self::from_mirror(PersistenceMirror::new(repo))
    }

    pub fn with_slot_key(repo: R, slot_key: impl Into<String>) -> Self {
        Self::from_mirror(PersistenceMirror::with_slot_key(repo, slot_key))
    }

    fn from_mirror(mirror: PersistenceMirror<R>) -> Self {
        Self {
            store: AttendanceStore::new(),
            mirror,
            pending_upload: None,
            next_ticket: 0,
        }
    }

    /// Restores the saved session, if any. Returns the restored record count.
    ///
    /// Only the first call reads the slot. The snapshot is adopted only while
    /// the store is still in its initial empty state; anything loaded before
    /// `start` wins and is written to the slot instead.
    pub fn start(&mut self) -> usize {
        let snapshot = self.mirror.restore();
        if self.store.is_empty() && self.store.session().is_none() {
            if let Some(snapshot) = snapshot {
                self.store.restore(snapshot);
                return self.store.len();
            }
            return 0;
        }

        if snapshot.is_some() {
            info!(
                "event=slot_restore module=service status=skipped reason=store_mutated count={}",
                self.store.len()
            );
        }
        self.mirror.sync(&self.store);
        0
    }

    pub fn load<I, S>(&mut self, names: I, session: SessionMetadata)
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.store.load(names, session);
        self.mirror.sync(&self.store);
    }

    /// Returns whether a record with `id` was found and updated.
    pub fn update_status(&mut self, id: AttendeeId, status: AttendanceStatus) -> bool {
        let updated = self.store.update_status(id, status);
        if updated {
            self.mirror.sync(&self.store);
        }
        updated
    }

    pub fn reset(&mut self) {
        self.store.reset();
        self.mirror.clear();
    }

    /// Reserves the upload gate.
    ///
    /// # Errors
    /// - `IngestError::UploadPending` while another upload is in flight.
    pub fn begin_upload(&mut self) -> IngestResult<UploadTicket> {
        if self.pending_upload.is_some() {
            warn!("event=csv_ingest module=service status=rejected reason=upload_pending");
            return Err(IngestError::UploadPending);
        }
        let ticket = UploadTicket(self.next_ticket);
        self.next_ticket += 1;
        self.pending_upload = Some(ticket);
        Ok(ticket)
    }

    /// Completes the upload identified by `ticket` with the read outcome.
    ///
    /// Parses `read_result`, loads the names on success and returns how many
    /// were loaded. The gate is released whatever the outcome.
    ///
    /// # Errors
    /// - `IngestError::UnknownUpload` when `ticket` is not the pending upload.
    /// - `IngestError::Read` when the file could not be read.
    /// - Parse errors from `parse_names`.
    pub fn finish_upload(
        &mut self,
        ticket: UploadTicket,
        read_result: std::io::Result<String>,
        session: SessionMetadata,
    ) -> IngestResult<usize> {
        if self.pending_upload != Some(ticket) {
            warn!("event=csv_ingest module=service status=rejected reason=unknown_upload");
            return Err(IngestError::UnknownUpload);
        }
        self.pending_upload = None;

        let names = parse_names(&read_result?)?;
        let count = names.len();
        self.load(names, session);
        info!(
            "event=csv_ingest module=service status=ok count={} session=\"{}\"",
            count, session
        );
        Ok(count)
    }

    /// Reads `path` and ingests it as one upload.
    pub fn upload_file(
        &mut self,
        path: impl AsRef<Path>,
        session: SessionMetadata,
    ) -> IngestResult<usize> {
        let ticket = self.begin_upload()?;
        let read_result = std::fs::read_to_string(path);
        self.finish_upload(ticket, read_result, session)
    }

    /// Ingests already-read upload text.
    pub fn upload_text(&mut self, text: &str, session: SessionMetadata) -> IngestResult<usize> {
        let ticket = self.begin_upload()?;
        self.finish_upload(ticket, Ok(text.to_string()), session)
    }

    pub fn is_upload_pending(&self) -> bool {
        self.pending_upload.is_some()
    }

    pub fn subscribe(
        &mut self,
        observer: impl FnMut(&AttendanceStore, &StoreEvent) + 'static,
    ) -> SubscriptionId {
        self.store.subscribe(observer)
    }

    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        self.store.unsubscribe(id)
    }

    pub fn store(&self) -> &AttendanceStore {
        &self.store
    }

    pub fn attendees(&self) -> &[AttendeeRecord] {
        self.store.attendees()
    }

    pub fn session(&self) -> Option<SessionMetadata> {
        self.store.session()
    }

    pub fn tally(&self) -> AttendanceTally {
        self.store.tally()
    }

    pub fn slot_key(&self) -> &str {
        self.mirror.slot_key()
    }
}
