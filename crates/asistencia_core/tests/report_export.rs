use asistencia_core::{
    default_file_name, export_report, AttendanceStatus, AttendanceStore, ExportError,
    MeetingKind, SessionGroup, SessionMetadata,
};
use chrono::NaiveDate;

fn date() -> NaiveDate {
    NaiveDate::from_ymd_opt(2026, 10, 19).unwrap()
}

#[test]
fn export_writes_html_report_without_mutating_store() {
    let dir = tempfile::tempdir().unwrap();
    let mut store = AttendanceStore::new();
    store.load(
        ["Ana", "Beto", "Carla"],
        SessionMetadata::new(SessionGroup::Consejo, MeetingKind::Ordinaria),
    );
    let ids: Vec<_> = store.attendees().iter().map(|record| record.id).collect();
    store.update_status(ids[0], AttendanceStatus::Present);
    store.update_status(ids[1], AttendanceStatus::Absent);
    let before = store.attendees().to_vec();

    let path = export_report(store.attendees(), store.session(), dir.path(), date(), 2).unwrap();

    assert_eq!(path, dir.path().join(default_file_name(date())));
    let html = std::fs::read_to_string(&path).unwrap();
    assert!(html.contains("Reporte de Asistencia"));
    assert!(html.contains("Sesión: Consejo Ordinaria"));
    assert!(html.contains("Presentes: 1"));
    assert_eq!(html.matches("<section class=\"page\">").count(), 2);
    assert!(html.contains("rgb(200, 0, 0)\">Ausente"));
    assert!(html.contains("rgb(128, 128, 128)\">Sin Marcar"));
    assert_eq!(store.attendees(), before.as_slice());
}

#[test]
fn export_without_attendees_is_rejected() {
    let dir = tempfile::tempdir().unwrap();
    let err = export_report(&[], None, dir.path(), date(), 25).unwrap_err();
    assert!(matches!(err, ExportError::NoData));
    assert!(std::fs::read_dir(dir.path()).unwrap().next().is_none());
}
