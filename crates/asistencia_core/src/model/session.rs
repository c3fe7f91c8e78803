//! Session classification model.
//!
//! A session is the pair (group, meeting kind) selected before an attendance
//! list is loaded.

use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::str::FromStr;

/// Governing body that meets in the session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SessionGroup {
    Consejo,
    Asamblea,
}

impl SessionGroup {
    pub const ALL: [SessionGroup; 2] = [Self::Consejo, Self::Asamblea];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Consejo => "Consejo",
            Self::Asamblea => "Asamblea",
        }
    }
}

/// Meeting type of the session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MeetingKind {
    Ordinaria,
    Extraordinaria,
}

impl MeetingKind {
    pub const ALL: [MeetingKind; 2] = [Self::Ordinaria, Self::Extraordinaria];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Ordinaria => "Ordinaria",
            Self::Extraordinaria => "Extraordinaria",
        }
    }
}

/// Classification of the current attendance-taking session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionMetadata {
    pub group: SessionGroup,
    pub meeting_kind: MeetingKind,
}

impl SessionMetadata {
    pub fn new(group: SessionGroup, meeting_kind: MeetingKind) -> Self {
        Self {
            group,
            meeting_kind,
        }
    }
}

impl Display for SessionMetadata {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} {}", self.group.as_str(), self.meeting_kind.as_str())
    }
}

/// Error returned when a group or meeting kind string is not recognized.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionParseError {
    UnknownGroup(String),
    UnknownMeetingKind(String),
}

impl Display for SessionParseError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::UnknownGroup(value) => {
                write!(f, "unknown session group `{value}`; expected consejo|asamblea")
            }
            Self::UnknownMeetingKind(value) => write!(
                f,
                "unknown meeting kind `{value}`; expected ordinaria|extraordinaria"
            ),
        }
    }
}

impl Error for SessionParseError {}

impl FromStr for SessionGroup {
    type Err = SessionParseError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let normalized = value.trim();
        Self::ALL
            .into_iter()
            .find(|group| group.as_str().eq_ignore_ascii_case(normalized))
            .ok_or_else(|| SessionParseError::UnknownGroup(normalized.to_string()))
    }
}

impl FromStr for MeetingKind {
    type Err = SessionParseError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let normalized = value.trim();
        Self::ALL
            .into_iter()
            .find(|kind| kind.as_str().eq_ignore_ascii_case(normalized))
            .ok_or_else(|| SessionParseError::UnknownMeetingKind(normalized.to_string()))
    }
}
