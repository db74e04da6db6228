use tabsift::datatype::Value;
use tabsift::error::TabsiftError;
use tabsift::session::Session;
use tabsift::store::LoadOptions;

fn setup() -> Session {
    let csv = b"city,price,qty\n\
        oslo,10,1\n\
        bergen,20,2\n\
        oslo,,3\n\
        tromso,40,4\n";
    let mut session = Session::new();
    session
        .load(csv, "cities.csv", &LoadOptions::default())
        .expect("sample csv loads");
    session
}

#[test]
fn schema_reports_dtype_null_and_distinct_counts() {
    let session = setup();
    let schema = session.schema().unwrap();
    assert_eq!(
        schema.columns,
        vec!["column", "dtype", "non_null", "nulls", "unique"]
    );
    assert_eq!(schema.row_count, 3);
    // city: object, 4 non-null, 0 nulls, 3 distinct
    assert_eq!(
        schema.rows[0],
        vec![
            Value::Text("city".to_string()),
            Value::Text("object".to_string()),
            Value::Int(4),
            Value::Int(0),
            Value::Int(3),
        ]
    );
    // price: int64 with one null
    assert_eq!(schema.rows[1][1], Value::Text("int64".to_string()));
    assert_eq!(schema.rows[1][2], Value::Int(3));
    assert_eq!(schema.rows[1][3], Value::Int(1));
}

#[test]
fn stats_cover_numeric_columns_and_null_out_the_rest() {
    let session = setup();
    let stats = session.stats().unwrap();
    assert_eq!(
        stats.columns,
        vec!["column", "count", "unique", "mean", "std", "min", "max"]
    );
    let price = &stats.rows[1];
    assert_eq!(price[0], Value::Text("price".to_string()));
    assert_eq!(price[1], Value::Int(3));
    match price[3] {
        Value::Float(mean) => assert!((mean - 70.0 / 3.0).abs() < 1e-9),
        ref other => panic!("expected a float mean, got {:?}", other),
    }
    assert_eq!(price[5], Value::Float(10.0));
    assert_eq!(price[6], Value::Float(40.0));
    let city = &stats.rows[0];
    assert_eq!(city[3], Value::Null, "no mean for a text column");
    assert_eq!(city[6], Value::Null);
}

#[test]
fn missingness_sorts_worst_first() {
    let session = setup();
    let missing = session.missingness().unwrap();
    assert_eq!(missing.columns, vec!["column", "missing_ratio"]);
    assert_eq!(missing.rows[0][0], Value::Text("price".to_string()));
    assert_eq!(missing.rows[0][1], Value::Float(0.25));
    assert_eq!(missing.rows[1][1], Value::Float(0.0));
}

#[test]
fn correlations_cover_numeric_columns_pairwise() {
    let session = setup();
    let corr = session.correlations().unwrap();
    assert_eq!(corr.columns, vec!["column", "price", "qty"]);
    assert_eq!(corr.row_count, 2);
    match corr.rows[0][1] {
        Value::Float(self_corr) => assert!((self_corr - 1.0).abs() < 1e-9),
        ref other => panic!("expected 1.0 on the diagonal, got {:?}", other),
    }
    // price/qty over complete pairs (10,1) (20,2) (40,4) is perfectly linear
    match corr.rows[0][2] {
        Value::Float(r) => assert!((r - 1.0).abs() < 1e-9),
        ref other => panic!("expected a float, got {:?}", other),
    }
}

#[test]
fn correlations_without_numeric_columns_return_the_sentinel() {
    let mut session = Session::new();
    session
        .load(b"city\noslo\nbergen\n", "only-text.csv", &LoadOptions::default())
        .unwrap();
    let corr = session.correlations().unwrap();
    assert_eq!(corr.columns, vec!["note"]);
    assert_eq!(
        corr.rows[0][0],
        Value::Text("No numeric columns for correlation".to_string())
    );
}

#[test]
fn profiling_without_a_dataset_is_an_error() {
    let session = Session::new();
    for result in [
        session.schema(),
        session.stats(),
        session.missingness(),
        session.correlations(),
    ] {
        match result {
            Err(TabsiftError::NotLoaded) => (),
            other => panic!("expected NotLoaded, got {:?}", other),
        }
    }
}
