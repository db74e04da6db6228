use tabsift::datatype::Value;
use tabsift::error::TabsiftError;
use tabsift::execute::Answer;
use tabsift::session::Session;
use tabsift::store::LoadOptions;

fn setup() -> Session {
    let csv = b"city,price\n\
        oslo,10\n\
        bergen,20\n\
        oslo,30\n";
    let mut session = Session::new();
    session
        .load(csv, "cities.csv", &LoadOptions::default())
        .expect("sample csv loads");
    session
}

fn expect_table(answer: Answer) -> tabsift::execute::ResultTable {
    match answer {
        Answer::Table(t) => t,
        other => panic!("expected a table, got {:?}", other),
    }
}

#[test]
fn count_star_returns_one_row_one_column() {
    let mut session = setup();
    let table = expect_table(session.ask("sql: select count(*) c from df").unwrap());
    assert_eq!(table.columns, vec!["c"]);
    assert_eq!(table.row_count, 1);
    assert_eq!(table.rows[0][0], Value::Int(3));
}

#[test]
fn where_and_group_by_run_with_full_engine_fidelity() {
    let mut session = setup();
    let table = expect_table(
        session
            .ask("sql: select city, sum(price) total from df group by city order by city")
            .unwrap(),
    );
    assert_eq!(table.columns, vec!["city", "total"]);
    assert_eq!(table.rows[0], vec![Value::Text("bergen".to_string()), Value::Int(20)]);
    assert_eq!(table.rows[1], vec![Value::Text("oslo".to_string()), Value::Int(40)]);
}

#[test]
fn prefix_detection_is_case_insensitive_and_query_casing_survives() {
    let mut session = setup();
    let table = expect_table(session.ask("  SQL: SELECT COUNT(*) C FROM df  ").unwrap());
    assert_eq!(table.columns, vec!["C"], "the query text after the prefix runs verbatim");
    assert_eq!(table.rows[0][0], Value::Int(3));
}

#[test]
fn engine_errors_propagate_with_their_own_message() {
    let mut session = setup();
    match session.ask("sql: select nope from df") {
        Err(TabsiftError::Query(message)) => {
            assert!(message.contains("nope"), "engine message kept: {}", message);
        }
        other => panic!("expected a query error, got {:?}", other),
    }
    match session.ask("sql: select from from") {
        Err(TabsiftError::Query(_)) => (),
        other => panic!("syntax errors also propagate, got {:?}", other),
    }
}

#[test]
fn passthrough_requires_a_loaded_dataset() {
    let mut session = Session::new();
    match session.ask("sql: select 1") {
        Err(TabsiftError::NotLoaded) => (),
        other => panic!("expected NotLoaded, got {:?}", other),
    }
}
