//! CSV name-list parser.
//!
//! # Responsibility
//! - Split text on any line-ending convention and drop blank lines.
//! - Take the first comma-delimited field of every line as a candidate name.
//! - Skip a leading header row detected by keyword.
//!
//! # Invariants
//! - A successful parse always yields at least one non-blank, trimmed name.
//! - Header detection only inspects the first field of the first non-blank
//!   line.

use log::{info, warn};
use once_cell::sync::Lazy;
use regex::Regex;
use std::error::Error;
use std::fmt::{Display, Formatter};

const HEADER_KEYWORDS: &[&str] = &[
    "name",
    "nombre",
    "attendee",
    "asistente",
    "participant",
    "participante",
];

static LINE_BREAK_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\r\n|\n|\r").expect("valid line break regex"));
static HEADER_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(&format!("(?i){}", HEADER_KEYWORDS.join("|"))).expect("valid header regex")
});

pub type IngestResult<T> = Result<T, IngestError>;

/// Ingestion failures surfaced to the operator.
#[derive(Debug)]
pub enum IngestError {
    /// Uploaded text is empty or whitespace only.
    EmptyInput,
    /// No usable names remain after header/blank filtering.
    NoNames,
    /// The uploaded file could not be read.
    Read(std::io::Error),
    /// Another upload is still in flight.
    UploadPending,
    /// Completion arrived for an upload that is not the pending one.
    UnknownUpload,
}

impl IngestError {
    /// Short notification title shown to the operator.
    pub fn title(&self) -> &'static str {
        match self {
            Self::EmptyInput | Self::NoNames => "CSV vacío o inválido",
            Self::Read(_) => "Error al leer el archivo",
            Self::UploadPending | Self::UnknownUpload => "Carga en curso",
        }
    }

    /// Notification body shown to the operator.
    pub fn user_message(&self) -> &'static str {
        match self {
            Self::EmptyInput | Self::NoNames => {
                "El archivo CSV no contiene nombres válidos en la primera columna."
            }
            Self::Read(_) => "No se pudo leer el archivo seleccionado.",
            Self::UploadPending => "Espera a que termine la carga anterior.",
            Self::UnknownUpload => "La carga ya no está vigente.",
        }
    }
}

impl Display for IngestError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::EmptyInput => write!(f, "uploaded file is empty"),
            Self::NoNames => write!(f, "uploaded file has no names in the first column"),
            Self::Read(err) => write!(f, "failed to read uploaded file: {err}"),
            Self::UploadPending => write!(f, "another upload is still pending"),
            Self::UnknownUpload => write!(f, "upload ticket is not the pending upload"),
        }
    }
}

impl Error for IngestError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Read(err) => Some(err),
            _ => None,
        }
    }
}

impl From<std::io::Error> for IngestError {
    fn from(value: std::io::Error) -> Self {
        Self::Read(value)
    }
}

/// Returns the keywords that mark a header row.
pub fn header_keywords() -> &'static [&'static str] {
    HEADER_KEYWORDS
}

/// Returns whether `field` looks like a header cell.
///
/// Matching is case-insensitive and by substring, so `Nombres` and
/// `Participant Name` both count.
pub fn is_header_field(field: &str) -> bool {
    HEADER_RE.is_match(field)
}

/// Parses uploaded CSV text into attendee names.
///
/// # Errors
/// - `IngestError::EmptyInput` when `text` is blank.
/// - `IngestError::NoNames` when no name survives filtering.
pub fn parse_names(text: &str) -> IngestResult<Vec<String>> {
    if text.trim().is_empty() {
        warn!("event=csv_ingest module=ingest status=rejected reason=empty_input");
        return Err(IngestError::EmptyInput);
    }

    let lines: Vec<&str> = LINE_BREAK_RE
        .split(text)
        .filter(|line| !line.trim().is_empty())
        .collect();

    let skip_header = lines
        .first()
        .is_some_and(|line| is_header_field(first_field(line)));

    let names: Vec<String> = lines
        .iter()
        .skip(usize::from(skip_header))
        .map(|line| first_field(line).trim())
        .filter(|name| !name.is_empty())
        .map(str::to_string)
        .collect();

    if names.is_empty() {
        warn!(
            "event=csv_ingest module=ingest status=rejected reason=no_names lines={}",
            lines.len()
        );
        return Err(IngestError::NoNames);
    }

    info!(
        "event=csv_ingest module=ingest status=ok lines={} header_skipped={} count={}",
        lines.len(),
        skip_header,
        names.len()
    );
    Ok(names)
}

fn first_field(line: &str) -> &str {
    line.split(',').next().unwrap_or(line)
}

#[cfg(test)]
mod tests {
    use super::{header_keywords, is_header_field, parse_names, IngestError};

    #[test]
    fn skips_spanish_header_row() {
        assert_eq!(parse_names("Nombre\nAna\nBeto\n").unwrap(), vec!["Ana", "Beto"]);
    }

    #[test]
    fn keeps_first_line_without_header() {
        assert_eq!(parse_names("Ana\nBeto").unwrap(), vec!["Ana", "Beto"]);
    }

    #[test]
    fn handles_every_line_ending_and_extra_columns() {
        let text = "Participant,Email\r\n Ana ,ana@example.com\rBeto,b@example.com\n\n  \nCarla";
        assert_eq!(parse_names(text).unwrap(), vec!["Ana", "Beto", "Carla"]);
    }

    #[test]
    fn header_detection_ignores_later_columns() {
        assert_eq!(parse_names("Ana,nombre\nBeto").unwrap(), vec!["Ana", "Beto"]);
    }

    #[test]
    fn blank_only_input_is_rejected() {
        assert!(matches!(parse_names("\n  \r\n\t\n"), Err(IngestError::EmptyInput)));
        assert!(matches!(parse_names(""), Err(IngestError::EmptyInput)));
    }

    #[test]
    fn header_only_or_empty_first_fields_are_rejected() {
        assert!(matches!(parse_names("NOMBRE\n"), Err(IngestError::NoNames)));
        assert!(matches!(parse_names(",x\n ,y"), Err(IngestError::NoNames)));
    }

    #[test]
    fn header_keywords_match_case_insensitively() {
        for keyword in header_keywords() {
            assert!(is_header_field(&keyword.to_uppercase()));
        }
        assert!(!is_header_field("Ana"));
    }
}
