use tabsift::session::{InteractionLog, Role, Session, LOG_CAPACITY};
use tabsift::store::LoadOptions;

#[test]
fn log_is_bounded_to_the_fifty_most_recent_turns() {
    let mut log = InteractionLog::default();
    for i in 0..60 {
        log.record(Role::User, &format!("turn {}", i));
    }
    assert_eq!(log.len(), LOG_CAPACITY);
    let entries = log.entries();
    assert_eq!(entries.first().unwrap().content, "turn 10", "oldest ten evicted");
    assert_eq!(entries.last().unwrap().content, "turn 59", "most recent kept");
    // strictly in order
    for (i, turn) in entries.iter().enumerate() {
        assert_eq!(turn.content, format!("turn {}", i + 10));
    }
}

#[test]
fn session_records_load_ask_and_answer_turns() {
    let mut session = Session::new();
    session
        .load(b"a\n1\n2\n", "tiny.csv", &LoadOptions::default())
        .unwrap();
    session.ask("count rows").unwrap();
    let turns = session.history();
    assert_eq!(turns.len(), 3);
    assert_eq!(turns[0].role, Role::System);
    assert!(turns[0].content.contains("Loaded 'tiny.csv'"));
    assert_eq!(turns[1].role, Role::User);
    assert_eq!(turns[1].content, "count rows");
    assert_eq!(turns[2].role, Role::Agent);
    assert_eq!(turns[2].content, "scalar");
}

#[test]
fn failed_ask_still_records_the_user_turn() {
    let mut session = Session::new();
    assert!(session.ask("count rows").is_err(), "nothing loaded");
    let turns = session.history();
    assert_eq!(turns.len(), 1, "no agent turn for a failed request");
    assert_eq!(turns[0].role, Role::User);
}
