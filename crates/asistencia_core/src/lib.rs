//! Core domain logic for Asistencia.
//! This crate is the single source of truth for attendance state.

pub mod config;
pub mod db;
pub mod ingest;
pub mod logging;
pub mod model;
pub mod report;
pub mod repo;
pub mod service;
pub mod store;
pub mod view;

pub use config::{AppConfig, ConfigError};
pub use ingest::csv::{header_keywords, parse_names, IngestError, IngestResult};
pub use logging::{default_log_level, init_logging, logging_status, LoggingError};
pub use model::attendee::{AttendanceStatus, AttendeeId, AttendeeRecord, ParseStatusError};
pub use model::session::{MeetingKind, SessionGroup, SessionMetadata, SessionParseError};
pub use model::tally::AttendanceTally;
pub use report::export::{
    default_file_name, export_report, AttendanceReport, ExportError, ReportRow, Rgb,
};
pub use repo::slot_repo::{SlotRepoError, SlotRepository, SlotResult, SqliteSlotRepository};
pub use service::attendance_service::{AttendanceService, UploadTicket};
pub use store::attendance_store::{AttendanceStore, StoreEvent, SubscriptionId};
pub use store::mirror::{PersistenceMirror, DEFAULT_SLOT_KEY};
pub use store::snapshot::{PersistedSnapshot, SnapshotError};
pub use view::focus::FocusCursor;
pub use view::list::{filter_by_name, progress_percent};

/// Minimal health-check API.
pub fn ping() -> &'static str {
    "pong"
}

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
