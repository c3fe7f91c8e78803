//! Report document model, renderers and file export.

use crate::model::attendee::{AttendanceStatus, AttendeeRecord};
use crate::model::session::SessionMetadata;
use crate::model::tally::AttendanceTally;
use chrono::NaiveDate;
use log::{error, info};
use std::error::Error;
use std::fmt::{Display, Formatter, Write as _};
use std::path::{Path, PathBuf};

pub const REPORT_TITLE: &str = "Reporte de Asistencia";
pub const DEFAULT_ROWS_PER_PAGE: usize = 25;
const TABLE_HEADER: [&str; 2] = ["Nombre de Asistente", "Asistencia"];
const HEADER_FILL: Rgb = Rgb(63, 81, 181);

/// 8-bit RGB color.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rgb(pub u8, pub u8, pub u8);

impl Rgb {
    pub fn css(self) -> String {
        format!("rgb({}, {}, {})", self.0, self.1, self.2)
    }
}

/// Text color for a status cell.
pub fn status_color(status: AttendanceStatus) -> Rgb {
    match status {
        AttendanceStatus::Present => Rgb(0, 100, 0),
        AttendanceStatus::Absent => Rgb(200, 0, 0),
        AttendanceStatus::Unmarked => Rgb(128, 128, 128),
    }
}

#[derive(Debug)]
pub enum ExportError {
    /// There are no attendees to report on.
    NoData,
    Io { path: PathBuf, source: std::io::Error },
}

impl Display for ExportError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::NoData => write!(f, "no attendance data to export"),
            Self::Io { path, source } => {
                write!(f, "failed to write report `{}`: {source}", path.display())
            }
        }
    }
}

impl Error for ExportError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::NoData => None,
            Self::Io { source, .. } => Some(source),
        }
    }
}

/// One table row of the report.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReportRow {
    pub name: String,
    pub status: AttendanceStatus,
}

impl ReportRow {
    pub fn label(&self) -> &'static str {
        self.status.label()
    }

    pub fn color(&self) -> Rgb {
        status_color(self.status)
    }
}

/// Paginated attendance report.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AttendanceReport {
    pub title: String,
    pub date: NaiveDate,
    pub session: Option<SessionMetadata>,
    pub summary: AttendanceTally,
    pub pages: Vec<Vec<ReportRow>>,
}

impl AttendanceReport {
    /// Builds the report in store order. `rows_per_page` below 1 is treated as 1.
    pub fn build(
        records: &[AttendeeRecord],
        session: Option<SessionMetadata>,
        date: NaiveDate,
        rows_per_page: usize,
    ) -> Self {
        let rows: Vec<ReportRow> = records
            .iter()
            .map(|record| ReportRow {
                name: record.name.clone(),
                status: record.status,
            })
            .collect();
        let pages = rows
            .chunks(rows_per_page.max(1))
            .map(<[ReportRow]>::to_vec)
            .collect();

        Self {
            title: REPORT_TITLE.to_string(),
            date,
            session,
            summary: AttendanceTally::from_records(records),
            pages,
        }
    }

    pub fn page_count(&self) -> usize {
        self.pages.len()
    }

    pub fn rows(&self) -> impl Iterator<Item = &ReportRow> {
        self.pages.iter().flatten()
    }

    /// Summary block lines shown under the title.
    pub fn summary_lines(&self) -> Vec<String> {
        let mut lines = vec![format!("Fecha: {}", self.date.format("%d/%m/%Y"))];
        if let Some(session) = self.session {
            lines.push(format!("Sesión: {session}"));
        }
        lines.push(format!("Total de Asistentes: {}", self.summary.total));
        lines.push(format!("Presentes: {}", self.summary.present));
        lines.push(format!("Ausentes: {}", self.summary.absent));
        lines.push(format!("Sin Marcar: {}", self.summary.unmarked));
        lines
    }

    /// Plain-text rendering; pages are separated by form feeds.
    pub fn render_text(&self) -> String {
        let name_width = self
            .rows()
            .map(|row| row.name.chars().count())
            .chain(std::iter::once(TABLE_HEADER[0].chars().count()))
            .max()
            .unwrap_or_default();

        let mut out = String::new();
        for (page_index, page) in self.pages.iter().enumerate() {
            if page_index > 0 {
                out.push('\u{c}');
            }
            if page_index == 0 {
                let _ = writeln!(out, "{}", self.title);
                for line in self.summary_lines() {
                    let _ = writeln!(out, "{line}");
                }
                out.push('\n');
            }
            let _ = writeln!(
                out,
                "{:<name_width$}  {}",
                TABLE_HEADER[0], TABLE_HEADER[1]
            );
            for row in page {
                let _ = writeln!(out, "{:<name_width$}  {}", row.name, row.label());
            }
            let _ = writeln!(out, "Página {} de {}", page_index + 1, self.page_count());
        }
        out
    }

    /// HTML rendering with one printable section per page.
    pub fn render_html(&self) -> String {
        let mut out = String::new();
        let _ = write!(
            out,
            "<!DOCTYPE html>\n<html lang=\"es\">\n<head>\n<meta charset=\"utf-8\">\n<title>{}</title>\n\
             <style>\nbody {{ font-family: Helvetica, Arial, sans-serif; font-size: 10pt; }}\n\
             h1 {{ text-align: center; font-size: 20pt; }}\n.summary {{ text-align: center; }}\n\
             table {{ border-collapse: collapse; width: 100%; }}\nth, td {{ border: 1px solid #ccc; padding: 4px; }}\n\
             th {{ background: {}; color: #fff; text-align: center; }}\ntd.status {{ text-align: center; width: 80mm; }}\n\
             .page {{ page-break-after: always; }}\n.page:last-child {{ page-break-after: auto; }}\n</style>\n</head>\n<body>\n",
            escape_html(&self.title),
            HEADER_FILL.css()
        );

        for (page_index, page) in self.pages.iter().enumerate() {
            out.push_str("<section class=\"page\">\n");
            if page_index == 0 {
                let _ = writeln!(out, "<h1>{}</h1>", escape_html(&self.title));
                out.push_str("<div class=\"summary\">\n");
                for line in self.summary_lines() {
                    let _ = writeln!(out, "<p>{}</p>", escape_html(&line));
                }
                out.push_str("</div>\n");
            }
            let _ = writeln!(
                out,
                "<table>\n<thead><tr><th>{}</th><th>{}</th></tr></thead>\n<tbody>",
                TABLE_HEADER[0], TABLE_HEADER[1]
            );
            for row in page {
                let _ = writeln!(
                    out,
                    "<tr><td>{}</td><td class=\"status\" style=\"color: {}\">{}</td></tr>",
                    escape_html(&row.name),
                    row.color().css(),
                    row.label()
                );
            }
            out.push_str("</tbody>\n</table>\n</section>\n");
        }

        out.push_str("</body>\n</html>\n");
        out
    }
}

/// File name used for an export made on `date`.
pub fn default_file_name(date: NaiveDate) -> String {
    format!("reporte_asistencia_{}.html", date.format("%Y-%m-%d"))
}

/// Writes the HTML report for `records` into `dir` and returns its path.
///
/// # Errors
/// - `ExportError::NoData` when `records` is empty.
/// - `ExportError::Io` when the directory or file cannot be written.
pub fn export_report(
    records: &[AttendeeRecord],
    session: Option<SessionMetadata>,
    dir: &Path,
    date: NaiveDate,
    rows_per_page: usize,
) -> Result<PathBuf, ExportError> {
    if records.is_empty() {
        info!("event=report_export module=report status=rejected reason=no_data");
        return Err(ExportError::NoData);
    }

    let report = AttendanceReport::build(records, session, date, rows_per_page);
    let path = dir.join(default_file_name(date));
    let write_result = std::fs::create_dir_all(dir)
        .and_then(|()| std::fs::write(&path, report.render_html()));

    if let Err(source) = write_result {
        error!(
            "event=report_export module=report status=error error_code=report_write_failed path={} error={}",
            path.display(),
            source
        );
        return Err(ExportError::Io { path, source });
    }

    info!(
        "event=report_export module=report status=ok rows={} pages={} path={}",
        report.summary.total,
        report.page_count(),
        path.display()
    );
    Ok(path)
}

fn escape_html(value: &str) -> String {
    let mut escaped = String::with_capacity(value.len());
    for ch in value.chars() {
        match ch {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            other => escaped.push(other),
        }
    }
    escaped
}
