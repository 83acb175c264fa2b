use rsvp_core::db::open_db_in_memory;
use rsvp_core::{
    CallContext, ErrorKind, EscapeError, EscapeHatchLedger, EscapeState, Principal,
    SqliteEscapeRepository,
};

const MEETING: u64 = 1;

type Ledger<'c> = EscapeHatchLedger<SqliteEscapeRepository<'c>>;

fn ctx(caller: &str, now: u64) -> CallContext {
    CallContext::new(caller, now)
}

#[test]
fn declare_then_trigger_then_retrigger_is_noop() {
    let conn = open_db_in_memory().unwrap();
    let ledger = EscapeHatchLedger::new(SqliteEscapeRepository::try_new(&conn).unwrap());
    let dana = Principal::new("dana");

    ledger
        .declare_escape(&ctx("dana", 10), MEETING, "stuck in traffic")
        .unwrap();
    assert!(ledger.trigger_escape(&ctx("dana", 15), MEETING).unwrap());

    let triggered = ledger.get_escape(MEETING, &dana).unwrap().unwrap();
    assert!(triggered.triggered);
    assert_eq!(triggered.triggered_at, Some(15));
    assert_eq!(triggered.declared_at, 10);
    assert_eq!(triggered.reason, "stuck in traffic");

    assert!(!ledger.trigger_escape(&ctx("dana", 99), MEETING).unwrap());
    let after = ledger.get_escape(MEETING, &dana).unwrap().unwrap();
    assert_eq!(after, triggered);
}

#[test]
fn second_declaration_for_same_key_conflicts() {
    let conn = open_db_in_memory().unwrap();
    let ledger = EscapeHatchLedger::new(SqliteEscapeRepository::try_new(&conn).unwrap());

    ledger.declare_escape(&ctx("dana", 10), MEETING, "first").unwrap();
    let err = ledger
        .declare_escape(&ctx("dana", 11), MEETING, "second")
        .unwrap_err();
    assert!(matches!(err, EscapeError::EscapeAlreadyRegistered { meeting_id: MEETING, .. }));
    assert_eq!(err.kind(), ErrorKind::Conflict);
    assert_eq!(err.code(), 200);

    let hatch = ledger
        .get_escape(MEETING, &Principal::new("dana"))
        .unwrap()
        .unwrap();
    assert_eq!(hatch.reason, "first");
    assert_eq!(hatch.declared_at, 10);
}

#[test]
fn keys_are_per_meeting_and_participant() {
    let conn = open_db_in_memory().unwrap();
    let ledger = EscapeHatchLedger::new(SqliteEscapeRepository::try_new(&conn).unwrap());

    ledger.declare_escape(&ctx("dana", 1), MEETING, "a").unwrap();
    ledger.declare_escape(&ctx("erin", 1), MEETING, "b").unwrap();
    ledger.declare_escape(&ctx("dana", 1), 2, "c").unwrap();

    let participants = ledger
        .list_escapes(MEETING)
        .unwrap()
        .into_iter()
        .map(|hatch| hatch.participant.to_string())
        .collect::<Vec<_>>();
    assert_eq!(participants, vec!["dana", "erin"]);
    assert_eq!(ledger.list_escapes(2).unwrap().len(), 1);
}

#[test]
fn trigger_and_clear_require_existing_record() {
    let conn = open_db_in_memory().unwrap();
    let ledger = EscapeHatchLedger::new(SqliteEscapeRepository::try_new(&conn).unwrap());

    let trigger_err = ledger.trigger_escape(&ctx("dana", 1), MEETING).unwrap_err();
    assert!(matches!(trigger_err, EscapeError::EscapeNotFound { .. }));
    assert_eq!(trigger_err.kind(), ErrorKind::NotFound);

    let clear_err = ledger.clear_escape(&ctx("dana", 1), MEETING).unwrap_err();
    assert!(matches!(clear_err, EscapeError::EscapeNotFound { .. }));
    assert_eq!(clear_err.code(), 201);
}

#[test]
fn callers_cannot_trigger_someone_elses_hatch() {
    let conn = open_db_in_memory().unwrap();
    let ledger = EscapeHatchLedger::new(SqliteEscapeRepository::try_new(&conn).unwrap());

    ledger.declare_escape(&ctx("dana", 1), MEETING, "dentist").unwrap();
    let err = ledger.trigger_escape(&ctx("mallory", 2), MEETING).unwrap_err();
    assert!(matches!(err, EscapeError::EscapeNotFound { .. }));
    assert!(ledger
        .has_active_escape(MEETING, &Principal::new("dana"))
        .unwrap());
}

#[test]
fn clear_after_trigger_allows_fresh_declaration() {
    let conn = open_db_in_memory().unwrap();
    let ledger = EscapeHatchLedger::new(SqliteEscapeRepository::try_new(&conn).unwrap());
    let dana = Principal::new("dana");

    ledger.declare_escape(&ctx("dana", 1), MEETING, "old excuse").unwrap();
    ledger.trigger_escape(&ctx("dana", 2), MEETING).unwrap();
    ledger.clear_escape(&ctx("dana", 3), MEETING).unwrap();
    assert!(ledger.get_escape(MEETING, &dana).unwrap().is_none());

    ledger.declare_escape(&ctx("dana", 4), MEETING, "new excuse").unwrap();
    let fresh = ledger.get_escape(MEETING, &dana).unwrap().unwrap();
    assert_eq!(fresh.reason, "new excuse");
    assert_eq!(fresh.declared_at, 4);
    assert!(!fresh.triggered);
    assert_eq!(fresh.triggered_at, None);
}

#[test]
fn has_active_escape_tracks_lifecycle() {
    let conn = open_db_in_memory().unwrap();
    let ledger = EscapeHatchLedger::new(SqliteEscapeRepository::try_new(&conn).unwrap());
    let dana = Principal::new("dana");
    let active = |ledger: &Ledger<'_>| ledger.has_active_escape(MEETING, &dana).unwrap();
    let state = |ledger: &Ledger<'_>| ledger.escape_state(MEETING, &dana).unwrap();

    assert!(!active(&ledger));
    assert_eq!(state(&ledger), EscapeState::Absent);

    ledger.declare_escape(&ctx("dana", 1), MEETING, "sick").unwrap();
    assert!(active(&ledger));
    assert_eq!(state(&ledger), EscapeState::Declared);

    ledger.trigger_escape(&ctx("dana", 2), MEETING).unwrap();
    assert!(!active(&ledger));
    assert_eq!(state(&ledger), EscapeState::Triggered);

    ledger.clear_escape(&ctx("dana", 3), MEETING).unwrap();
    assert!(!active(&ledger));
    assert_eq!(state(&ledger), EscapeState::Absent);

    ledger.declare_escape(&ctx("dana", 4), MEETING, "sick again").unwrap();
    ledger.clear_escape(&ctx("dana", 5), MEETING).unwrap();
    assert!(!active(&ledger));
}

#[test]
fn reason_bound_is_counted_in_characters() {
    let conn = open_db_in_memory().unwrap();
    let ledger = EscapeHatchLedger::new(SqliteEscapeRepository::try_new(&conn).unwrap());

    ledger
        .declare_escape(&ctx("dana", 1), MEETING, &"\u{1f697}".repeat(128))
        .unwrap();

    let err = ledger
        .declare_escape(&ctx("erin", 1), MEETING, &"x".repeat(129))
        .unwrap_err();
    assert!(matches!(err, EscapeError::InvalidReason(_)));
    assert_eq!(err.kind(), ErrorKind::Validation);
    assert!(ledger
        .get_escape(MEETING, &Principal::new("erin"))
        .unwrap()
        .is_none());
}
