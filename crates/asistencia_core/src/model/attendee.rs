//! Attendee domain model.
//!
//! # Responsibility
//! - Define the record tracked for every person on the attendance list.
//! - Provide status labels used by list and report projections.
//!
//! # Invariants
//! - `id` is stable and never reused for another attendee.
//! - `name` is stored trimmed.
//! - New records start as `AttendanceStatus::Unmarked`.

use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::str::FromStr;
use uuid::Uuid;

/// Stable identifier for one attendee record.
pub type AttendeeId = Uuid;

/// Attendance mark for one attendee.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AttendanceStatus {
    Present,
    Absent,
    /// Not yet marked by the operator.
    #[default]
    Unmarked,
}

impl AttendanceStatus {
    /// All statuses in report order.
    pub const ALL: [AttendanceStatus; 3] = [Self::Present, Self::Absent, Self::Unmarked];

    /// Stable wire value (`present|absent|unmarked`).
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Present => "present",
            Self::Absent => "absent",
            Self::Unmarked => "unmarked",
        }
    }

    /// Label used by the exported report table.
    pub fn label(self) -> &'static str {
        match self {
            Self::Present => "Presente",
            Self::Absent => "Ausente",
            Self::Unmarked => "Sin Marcar",
        }
    }

    /// Label used by the searchable list view. Unmarked rows show nothing.
    pub fn list_label(self) -> &'static str {
        match self {
            Self::Present => "Asistió",
            Self::Absent => "No Asistió",
            Self::Unmarked => "",
        }
    }

    pub fn is_marked(self) -> bool {
        !matches!(self, Self::Unmarked)
    }
}

impl Display for AttendanceStatus {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned when a status string is not recognized.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseStatusError(pub String);

impl Display for ParseStatusError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "unsupported attendance status `{}`; expected present|absent|unmarked",
            self.0
        )
    }
}

impl Error for ParseStatusError {}

impl FromStr for AttendanceStatus {
    type Err = ParseStatusError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_lowercase().as_str() {
            "present" | "presente" => Ok(Self::Present),
            "absent" | "ausente" => Ok(Self::Absent),
            "unmarked" | "sin marcar" => Ok(Self::Unmarked),
            other => Err(ParseStatusError(other.to_string())),
        }
    }
}

/// One tracked person on the attendance list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AttendeeRecord {
    pub id: AttendeeId,
    pub name: String,
    pub status: AttendanceStatus,
}

impl AttendeeRecord {
    /// Creates an unmarked record with a generated stable ID.
    ///
    /// The name is trimmed; emptiness is rejected upstream by ingestion.
    pub fn new(name: impl AsRef<str>) -> Self {
        Self::with_id(Uuid::new_v4(), name)
    }

    /// Creates an unmarked record with a caller-provided ID.
    pub fn with_id(id: AttendeeId, name: impl AsRef<str>) -> Self {
        Self {
            id,
            name: name.as_ref().trim().to_string(),
            status: AttendanceStatus::Unmarked,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{AttendanceStatus, AttendeeRecord};

    #[test]
    fn new_record_is_trimmed_and_unmarked() {
        let record = AttendeeRecord::new("  Ana  ");
        assert_eq!(record.name, "Ana");
        assert_eq!(record.status, AttendanceStatus::Unmarked);
    }

    #[test]
    fn status_parses_english_and_spanish_values() {
        assert_eq!("PRESENT".parse::<AttendanceStatus>(), Ok(AttendanceStatus::Present));
        assert_eq!(" ausente ".parse::<AttendanceStatus>(), Ok(AttendanceStatus::Absent));
        assert_eq!("Sin Marcar".parse::<AttendanceStatus>(), Ok(AttendanceStatus::Unmarked));
        assert!("late".parse::<AttendanceStatus>().is_err());
    }

    #[test]
    fn status_serializes_as_snake_case() {
        let json = serde_json::to_string(&AttendanceStatus::Unmarked).unwrap();
        assert_eq!(json, "\"unmarked\"");
    }
}
