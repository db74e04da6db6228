use tabsift::datatype::Value;
use tabsift::error::TabsiftError;
use tabsift::execute::Answer;
use tabsift::resolve::HELP;
use tabsift::session::Session;
use tabsift::store::LoadOptions;

fn setup() -> Session {
    let csv = b"city,price,stock\n\
        oslo,10,3\n\
        bergen,20,\n\
        oslo,30,5\n\
        trondheim,15,2\n\
        bergen,25,1\n\
        stavanger,40,0\n\
        oslo,5,9\n\
        tromso,60,4\n\
        bergen,35,2\n\
        drammen,50,7\n";
    let mut session = Session::new();
    session
        .load(csv, "cities.csv", &LoadOptions::default())
        .expect("sample csv loads");
    session
}

#[test]
fn count_rows_returns_total_as_integer() {
    let mut session = setup();
    let answer = session.ask("count rows").expect("ask ok");
    assert_eq!(answer, Answer::Scalar(Value::Int(10)));
}

#[test]
fn average_and_mean_are_the_same_shape() {
    let mut session = Session::new();
    session
        .load(b"price\n10\n20\n30\n", "p.csv", &LoadOptions::default())
        .unwrap();
    assert_eq!(
        session.ask("average of price").unwrap(),
        Answer::Scalar(Value::Float(20.0))
    );
    assert_eq!(
        session.ask("mean of price").unwrap(),
        Answer::Scalar(Value::Float(20.0))
    );
}

#[test]
fn sum_max_min_over_numeric_column() {
    let mut session = setup();
    assert_eq!(
        session.ask("sum of price").unwrap(),
        Answer::Scalar(Value::Float(290.0))
    );
    assert_eq!(
        session.ask("max of price").unwrap(),
        Answer::Scalar(Value::Int(60))
    );
    assert_eq!(
        session.ask("min of price").unwrap(),
        Answer::Scalar(Value::Int(5))
    );
}

#[test]
fn aggregates_over_an_all_null_column_degrade_gracefully() {
    let mut session = Session::new();
    session
        .load(b"k,v\n1,\n2,\n3,\n", "blanks.csv", &LoadOptions::default())
        .unwrap();
    assert_eq!(
        session.ask("average of v").unwrap(),
        Answer::Scalar(Value::Null),
        "mean over zero non-null cells has no value"
    );
    assert_eq!(
        session.ask("sum of v").unwrap(),
        Answer::Scalar(Value::Float(0.0)),
        "an empty sum is zero"
    );
    assert_eq!(session.ask("max of v").unwrap(), Answer::Scalar(Value::Null));
    assert_eq!(session.ask("min of v").unwrap(), Answer::Scalar(Value::Null));
}

#[test]
fn max_of_text_column_uses_lexical_order() {
    let mut session = setup();
    assert_eq!(
        session.ask("max of city").unwrap(),
        Answer::Scalar(Value::Text("trondheim".to_string()))
    );
}

#[test]
fn unique_values_preserve_first_occurrence_order_and_drop_nulls() {
    let mut session = setup();
    let answer = session.ask("unique values of city").unwrap();
    let expected: Vec<Value> = [
        "oslo",
        "bergen",
        "trondheim",
        "stavanger",
        "tromso",
        "drammen",
    ]
    .iter()
    .map(|s| Value::Text(s.to_string()))
    .collect();
    assert_eq!(answer, Answer::Values(expected));

    // stock has a null cell which must not appear
    match session.ask("unique values of stock").unwrap() {
        Answer::Values(values) => {
            assert!(!values.iter().any(|v| v.is_null()), "nulls are dropped");
        }
        other => panic!("expected values, got {:?}", other),
    }
}

#[test]
fn matching_is_case_insensitive() {
    let mut session = setup();
    assert_eq!(
        session.ask("  COUNT ROWS  ").unwrap(),
        Answer::Scalar(Value::Int(10))
    );
    assert_eq!(
        session.ask("Average OF price").unwrap(),
        Answer::Scalar(Value::Float(29.0))
    );
}

#[test]
fn unknown_column_answers_with_a_message_not_an_error() {
    // the legacy asymmetry: aggregate/unique/filter shapes answer with a
    // message result, while chart and sql paths raise hard errors
    let mut session = setup();
    let expected = Answer::Message("Column 'altitude' not found.".to_string());
    assert_eq!(session.ask("average of altitude").unwrap(), expected);
    assert_eq!(session.ask("unique values of altitude").unwrap(), expected);
    assert_eq!(
        session.ask("filter altitude > 3 and show top 2").unwrap(),
        expected
    );
}

#[test]
fn mean_of_text_column_is_a_hard_type_error() {
    let mut session = setup();
    match session.ask("average of city") {
        Err(TabsiftError::Type(_)) => (),
        other => panic!("expected a type error, got {:?}", other),
    }
}

#[test]
fn unrecognized_text_returns_the_instructional_message() {
    let mut session = setup();
    assert_eq!(
        session.ask("please summarize everything").unwrap(),
        Answer::Message(HELP.to_string())
    );
    // near-miss of a shape: substring matches are not enough
    assert_eq!(
        session.ask("the average of price please").unwrap(),
        Answer::Message(HELP.to_string())
    );
}

#[test]
fn asking_without_a_dataset_is_an_error() {
    let mut session = Session::new();
    match session.ask("count rows") {
        Err(TabsiftError::NotLoaded) => (),
        other => panic!("expected NotLoaded, got {:?}", other),
    }
}
