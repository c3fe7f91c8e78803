//! Operator CLI for attendance taking.
//!
//! # Responsibility
//! - Restore the saved session, apply one command, and let the core mirror
//!   persist the result.
//! - Print operator-facing messages; keep diagnostics in the log files.

use anyhow::{bail, Context, Result};
use asistencia_core::db::open_db;
use asistencia_core::{
    core_version, export_report, filter_by_name, init_logging, ping, progress_percent,
    AppConfig, AttendanceService, AttendanceStatus, AttendeeId, AttendeeRecord, FocusCursor,
    MeetingKind, SessionGroup, SessionMetadata, SlotRepository, SqliteSlotRepository,
};
use clap::{Parser, Subcommand};
use log::warn;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "asistencia", version, about = "Toma de asistencia desde una lista CSV")]
struct Cli {
    /// Directory holding the session database, logs and reports.
    #[arg(long, global = true)]
    data_dir: Option<PathBuf>,
    /// Optional TOML config file.
    #[arg(long, global = true, default_value = "asistencia.toml")]
    config: PathBuf,
    #[arg(long, global = true)]
    log_level: Option<String>,
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Load a CSV name list, replacing the current session.
    Upload {
        file: PathBuf,
        #[arg(long)]
        group: SessionGroup,
        #[arg(long)]
        kind: MeetingKind,
    },
    /// List attendees, optionally filtered by name.
    List {
        #[arg(long)]
        search: Option<String>,
    },
    /// Mark one attendee, by id or by exact name.
    Mark {
        attendee: String,
        status: AttendanceStatus,
    },
    /// Show one attendee in the focus view.
    Focus {
        /// Zero-based index in load order, clamped to the list.
        #[arg(long, default_value_t = 0)]
        index: usize,
    },
    /// Show running tallies.
    Tally,
    /// Clear the session and its saved state.
    Reset,
    /// Write the attendance report as HTML.
    Export {
        #[arg(long)]
        out_dir: Option<PathBuf>,
    },
    /// Show core version and saved-session information.
    Status,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let mut config = AppConfig::load(Some(cli.config.as_path()))?;
    if let Some(data_dir) = cli.data_dir {
        config.data_dir = data_dir;
    }
    if let Some(level) = cli.log_level {
        config.log_level = level;
    }

    std::fs::create_dir_all(&config.data_dir).with_context(|| {
        format!("failed to create data dir `{}`", config.data_dir.display())
    })?;
    if let Err(err) = init_logging(&config.log_level, &config.log_dir()) {
        eprintln!("aviso: registro desactivado: {err}");
    }

    let conn = open_db(config.db_path())
        .with_context(|| format!("failed to open `{}`", config.db_path().display()))?;
    let repo = SqliteSlotRepository::new(&conn);
    let mut service = AttendanceService::with_slot_key(&repo, config.slot_key.clone());
    service.start();

    match cli.command {
        Command::Upload { file, group, kind } => {
            let session = SessionMetadata::new(group, kind);
            match service.upload_file(&file, session) {
                Ok(count) => {
                    println!("CSV subido con éxito: {count} asistentes cargados correctamente.");
                    println!("Sesión: {session}");
                }
                Err(err) => bail!("{}: {}", err.title(), err.user_message()),
            }
        }
        Command::List { search } => {
            let term = search.unwrap_or_default();
            let matches = filter_by_name(service.attendees(), &term);
            if service.attendees().is_empty() {
                println!("No hay asistentes cargados. Por favor, sube un archivo CSV.");
            } else if matches.is_empty() {
                println!("No se encontraron asistentes con ese nombre.");
            }
            for record in matches {
                println!("{}  {:<40} {}", record.id, record.name, record.status.list_label());
            }
        }
        Command::Mark { attendee, status } => {
            println!("{}", mark_attendee(&mut service, &attendee, status)?);
        }
        Command::Focus { index } => {
            let records = service.attendees();
            let cursor = FocusCursor::at(index, records.len());
            match cursor.current(records) {
                Some(record) => {
                    println!("{}", cursor.position_label(records.len()));
                    println!("{}", record.name);
                    println!("{}", record.status.label());
                    println!(
                        "anterior: {}  siguiente: {}",
                        yes_no(cursor.has_previous()),
                        yes_no(cursor.has_next(records.len()))
                    );
                }
                None => println!("No hay asistentes cargados. Por favor, sube un archivo CSV."),
            }
        }
        Command::Tally => {
            let tally = service.tally();
            if let Some(session) = service.session() {
                println!("Sesión: {session}");
            }
            println!("Total: {}", tally.total);
            println!("Presentes: {}", tally.present);
            println!("Ausentes: {}", tally.absent);
            println!("Sin Marcar: {}", tally.unmarked);
            println!("Progreso: {:.0}%", progress_percent(service.attendees()));
        }
        Command::Reset => {
            service.reset();
            println!("Sesión reiniciada.");
        }
        Command::Export { out_dir } => {
            let dir = out_dir.unwrap_or_else(|| config.report_dir());
            let today = chrono::Local::now().date_naive();
            let path = export_report(
                service.attendees(),
                service.session(),
                &dir,
                today,
                config.rows_per_page,
            )?;
            println!("Reporte Descargado: {}", path.display());
        }
        Command::Status => {
            println!("asistencia_core ping={} version={}", ping(), core_version());
            println!("db={}", config.db_path().display());
            let saved = repo.get_slot(service.slot_key()).unwrap_or_else(|err| {
                warn!("event=status module=cli status=error error={err}");
                None
            });
            println!(
                "slot={} saved={} attendees={}",
                service.slot_key(),
                yes_no(saved.is_some()),
                service.attendees().len()
            );
        }
    }

    Ok(())
}

/// Marks one attendee and returns the confirmation line.
///
/// Ids not present in the list are reported as errors without mutating.
fn mark_attendee<R: SlotRepository>(
    service: &mut AttendanceService<R>,
    query: &str,
    status: AttendanceStatus,
) -> Result<String> {
    let id = resolve_attendee(service.attendees(), query)?;
    if !service.update_status(id, status) {
        bail!("no se encontró al asistente `{query}`");
    }
    match service.store().get(id) {
        Some(record) => Ok(format!("{} -> {}", record.name, record.status.label())),
        None => bail!("no se encontró al asistente `{query}`"),
    }
}

/// Resolves an attendee by id, or by case-insensitive exact name.
fn resolve_attendee(records: &[AttendeeRecord], query: &str) -> Result<AttendeeId> {
    if let Ok(id) = query.trim().parse::<AttendeeId>() {
        return Ok(id);
    }

    let needle = query.trim().to_lowercase();
    let mut found = records
        .iter()
        .filter(|record| record.name.to_lowercase() == needle);
    match (found.next(), found.next()) {
        (Some(record), None) => Ok(record.id),
        (Some(_), Some(_)) => bail!("hay varios asistentes llamados `{query}`; usa el id"),
        (None, _) => bail!("no se encontró al asistente `{query}`"),
    }
}

fn yes_no(value: bool) -> &'static str {
    if value {
        "sí"
    } else {
        "no"
    }
}
