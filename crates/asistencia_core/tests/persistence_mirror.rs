use asistencia_core::db::{open_db, open_db_in_memory};
use asistencia_core::{
    AttendanceService, AttendanceStatus, MeetingKind, PersistedSnapshot, SessionGroup,
    SessionMetadata, SlotRepoError, SlotRepository, SlotResult, SqliteSlotRepository,
    DEFAULT_SLOT_KEY,
};
use std::cell::{Cell, RefCell};
use std::collections::HashSet;

fn asamblea() -> SessionMetadata {
    SessionMetadata::new(SessionGroup::Asamblea, MeetingKind::Extraordinaria)
}

#[test]
fn session_survives_restart() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("asistencia.sqlite3");

    let beto_id = {
        let conn = open_db(&path).unwrap();
        let mut service = AttendanceService::new(SqliteSlotRepository::new(&conn));
        assert_eq!(service.start(), 0);
        service.load(["Ana", "Beto"], asamblea());
        let beto_id = service.attendees()[1].id;
        service.update_status(beto_id, AttendanceStatus::Absent);
        beto_id
    };

    let conn = open_db(&path).unwrap();
    let mut service = AttendanceService::new(SqliteSlotRepository::new(&conn));
    assert_eq!(service.start(), 2);

    let names: Vec<&str> = service
        .attendees()
        .iter()
        .map(|record| record.name.as_str())
        .collect();
    assert_eq!(names, vec!["Ana", "Beto"]);
    assert_eq!(service.attendees()[0].status, AttendanceStatus::Unmarked);
    assert_eq!(service.attendees()[1].status, AttendanceStatus::Absent);
    assert_eq!(service.attendees()[1].id, beto_id);
    assert_eq!(service.session(), Some(asamblea()));
    let ids: HashSet<_> = service.attendees().iter().map(|record| record.id).collect();
    assert_eq!(ids.len(), 2);

    assert!(service.update_status(beto_id, AttendanceStatus::Present));

    let raw = SqliteSlotRepository::new(&conn)
        .get_slot(DEFAULT_SLOT_KEY)
        .unwrap()
        .unwrap();
    let saved = PersistedSnapshot::from_json(&raw).unwrap();
    assert_eq!(saved.attendees[1].id, beto_id);
    assert_eq!(saved.attendees[1].status, AttendanceStatus::Present);
    assert_eq!(saved.attendees[0].status, AttendanceStatus::Unmarked);
}

#[test]
fn reset_removes_saved_slot() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteSlotRepository::new(&conn);
    let mut service = AttendanceService::new(&repo);
    service.start();
    service.load(["Ana"], asamblea());
    assert!(repo.get_slot(DEFAULT_SLOT_KEY).unwrap().is_some());

    service.reset();

    assert!(service.attendees().is_empty());
    assert_eq!(service.session(), None);
    assert!(repo.get_slot(DEFAULT_SLOT_KEY).unwrap().is_none());
}

#[test]
fn malformed_slot_falls_back_to_empty_state() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteSlotRepository::new(&conn);

    for raw in [
        "{not json",
        r#"{"attendees": null, "sessionType": {"group": "Consejo", "meetingKind": "Ordinaria"}}"#,
        r#"{"attendees": [{"id": "x", "name": "Ana", "status": "present"}], "sessionType": {"group": "Consejo", "meetingKind": "Ordinaria"}}"#,
        r#"{"attendees": [], "sessionType": {"group": "Comite", "meetingKind": "Ordinaria"}}"#,
    ] {
        repo.put_slot(DEFAULT_SLOT_KEY, raw).unwrap();
        let mut service = AttendanceService::new(&repo);
        assert_eq!(service.start(), 0, "slot `{raw}` should not be adopted");
        assert!(service.attendees().is_empty());
        assert_eq!(service.session(), None);
    }
}

#[test]
fn mutations_before_start_do_not_touch_the_slot() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteSlotRepository::new(&conn);
    repo.put_slot(DEFAULT_SLOT_KEY, "saved-earlier").unwrap();

    let mut service = AttendanceService::new(&repo);
    service.load(["Ana"], asamblea());

    assert_eq!(
        repo.get_slot(DEFAULT_SLOT_KEY).unwrap().as_deref(),
        Some("saved-earlier")
    );
}

#[test]
fn list_loaded_before_start_is_kept_and_saved() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteSlotRepository::new(&conn);
    {
        let mut earlier = AttendanceService::new(&repo);
        earlier.start();
        earlier.load(
            ["Viejo"],
            SessionMetadata::new(SessionGroup::Consejo, MeetingKind::Ordinaria),
        );
    }

    let mut service = AttendanceService::new(&repo);
    service.load(["Ana", "Beto"], asamblea());
    assert_eq!(service.start(), 0);

    let names: Vec<&str> = service
        .attendees()
        .iter()
        .map(|record| record.name.as_str())
        .collect();
    assert_eq!(names, vec!["Ana", "Beto"]);
    assert_eq!(service.session(), Some(asamblea()));

    let saved =
        PersistedSnapshot::from_json(&repo.get_slot(DEFAULT_SLOT_KEY).unwrap().unwrap()).unwrap();
    assert_eq!(saved.attendees, service.attendees());
    assert_eq!(saved.session_type, asamblea());
}

#[test]
fn slot_json_uses_documented_shape() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteSlotRepository::new(&conn);
    let mut service = AttendanceService::with_slot_key(&repo, "sesion");
    service.start();
    service.load(["Ana"], asamblea());

    let raw = repo.get_slot("sesion").unwrap().unwrap();
    let value: serde_json::Value = serde_json::from_str(&raw).unwrap();
    assert_eq!(value["attendees"][0]["name"], "Ana");
    assert_eq!(value["attendees"][0]["status"], "unmarked");
    assert_eq!(value["sessionType"]["group"], "Asamblea");
    assert_eq!(value["sessionType"]["meetingKind"], "Extraordinaria");
    assert!(PersistedSnapshot::from_json(&raw).is_ok());
}

/// Slot backend that fails every write, like a full quota.
#[derive(Default)]
struct FullQuotaRepo {
    saved: RefCell<Option<String>>,
    write_attempts: Cell<usize>,
}

impl SlotRepository for FullQuotaRepo {
    fn get_slot(&self, _key: &str) -> SlotResult<Option<String>> {
        Ok(self.saved.borrow().clone())
    }

    fn put_slot(&self, _key: &str, _value: &str) -> SlotResult<()> {
        self.write_attempts.set(self.write_attempts.get() + 1);
        Err(SlotRepoError::Backend("quota exceeded".to_string()))
    }

    fn remove_slot(&self, _key: &str) -> SlotResult<()> {
        Err(SlotRepoError::Backend("storage unavailable".to_string()))
    }
}

#[test]
fn write_failures_are_swallowed_and_state_stays_usable() {
    let repo = FullQuotaRepo::default();
    let mut service = AttendanceService::new(&repo);
    service.start();

    service.load(["Ana", "Beto"], asamblea());
    let id = service.attendees()[0].id;
    assert!(service.update_status(id, AttendanceStatus::Present));
    service.reset();

    assert_eq!(repo.write_attempts.get(), 2);
    assert!(service.attendees().is_empty());
}
