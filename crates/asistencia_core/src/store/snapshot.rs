//! Persisted attendance snapshot wire format.
//!
//! The durable slot holds one JSON object:
//! `{"attendees": [{"id", "name", "status"}...], "sessionType": {"group", "meetingKind"}}`.
//!
//! # Invariants
//! - Both fields must be present and non-null to be adopted.
//! - Attendee ids must be unique and names non-blank.

use crate::model::attendee::{AttendeeId, AttendeeRecord};
use crate::model::session::SessionMetadata;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Attendee list plus session metadata as stored in the durable slot.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PersistedSnapshot {
    pub attendees: Vec<AttendeeRecord>,
    pub session_type: SessionMetadata,
}

/// Lenient shape used to tell "missing/null" apart from malformed JSON.
#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawSnapshot {
    #[serde(default)]
    attendees: Option<Vec<AttendeeRecord>>,
    #[serde(default)]
    session_type: Option<SessionMetadata>,
}

/// Reasons a stored slot value is not adopted.
#[derive(Debug)]
pub enum SnapshotError {
    Json(serde_json::Error),
    MissingField(&'static str),
    DuplicateId(AttendeeId),
    BlankName(AttendeeId),
}

impl Display for SnapshotError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Json(err) => write!(f, "invalid snapshot json: {err}"),
            Self::MissingField(field) => write!(f, "snapshot field `{field}` is missing or null"),
            Self::DuplicateId(id) => write!(f, "snapshot contains duplicate attendee id {id}"),
            Self::BlankName(id) => write!(f, "snapshot attendee {id} has a blank name"),
        }
    }
}

impl Error for SnapshotError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Json(err) => Some(err),
            _ => None,
        }
    }
}

impl From<serde_json::Error> for SnapshotError {
    fn from(value: serde_json::Error) -> Self {
        Self::Json(value)
    }
}

impl PersistedSnapshot {
    /// Serializes to the slot JSON format.
    pub fn to_json(&self) -> Result<String, SnapshotError> {
        Ok(serde_json::to_string(self)?)
    }

    /// Parses and structurally validates a slot value.
    pub fn from_json(raw: &str) -> Result<Self, SnapshotError> {
        let parsed: RawSnapshot = serde_json::from_str(raw)?;
        let attendees = parsed
            .attendees
            .ok_or(SnapshotError::MissingField("attendees"))?;
        let session_type = parsed
            .session_type
            .ok_or(SnapshotError::MissingField("sessionType"))?;

        let mut seen = HashSet::with_capacity(attendees.len());
        for record in &attendees {
            if !seen.insert(record.id) {
                return Err(SnapshotError::DuplicateId(record.id));
            }
            if record.name.trim().is_empty() {
                return Err(SnapshotError::BlankName(record.id));
            }
        }

        Ok(Self {
            attendees,
            session_type,
        })
    }
}
