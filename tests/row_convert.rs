//! Row conversion: positional decoding, strictness, and failure diagnostics.

mod common;

use chrono::{NaiveDate, NaiveDateTime};
use common::{person, Person};
use polars::prelude::AnyValue;
use typedframe::prelude::*;

#[test]
fn tuple_decodes_positionally() {
    let cells = vec![AnyValue::Int64(1), AnyValue::StringOwned("a".into())];
    let decoded = <(i64, String)>::from_cells(&cells).unwrap();
    assert_eq!(decoded, (1, "a".to_string()));
}

#[test]
fn named_record_decodes_by_position_not_name() {
    let cells = vec![
        AnyValue::Int64(7),
        AnyValue::StringOwned("Grace".into()),
        AnyValue::Int64(40),
    ];
    let decoded = Person::from_cells(&cells).unwrap();
    assert_eq!(decoded, person(7, "Grace", 40));
}

#[test]
fn short_row_fails_with_arity_never_pads() {
    let cells = vec![AnyValue::Int64(1)];
    let err = <(i64, String)>::from_cells(&cells).unwrap_err();
    match err {
        FrameError::Arity { expected, actual } => {
            assert_eq!(expected, 2);
            assert_eq!(actual, 1);
        }
        other => panic!("expected arity error, got: {other}"),
    }
}

#[test]
fn long_row_fails_with_arity_never_truncates() {
    let cells = vec![
        AnyValue::Int64(1),
        AnyValue::StringOwned("a".into()),
        AnyValue::Int64(9),
    ];
    let err = <(i64, String)>::from_cells(&cells).unwrap_err();
    assert!(matches!(
        err,
        FrameError::Arity {
            expected: 2,
            actual: 3
        }
    ));
}

#[test]
fn text_cell_never_coerces_to_numeric() {
    let cells = vec![AnyValue::StringOwned("5".into())];
    let err = <(i64,)>::from_cells(&cells).unwrap_err();
    match err {
        FrameError::Cell {
            index,
            field,
            expected,
            ..
        } => {
            assert_eq!(index, 0);
            assert_eq!(field, "_1");
            assert_eq!(expected, "long");
        }
        other => panic!("expected cell error, got: {other}"),
    }
}

#[test]
fn narrowing_and_cross_kind_conversions_fail() {
    // Int64 into i32 would narrow.
    assert!(<(i32,)>::from_cells(&[AnyValue::Int64(1)]).is_err());
    // Float into integer crosses kinds.
    assert!(<(i64,)>::from_cells(&[AnyValue::Float64(1.0)]).is_err());
    // Integer into double crosses kinds.
    assert!(<(f64,)>::from_cells(&[AnyValue::Int64(1)]).is_err());
}

#[test]
fn lossless_widening_is_admitted() {
    assert_eq!(<(i64,)>::from_cells(&[AnyValue::Int32(7)]).unwrap(), (7,));
    let (d,) = <(f64,)>::from_cells(&[AnyValue::Float32(0.5)]).unwrap();
    assert_eq!(d, 0.5);
}

#[test]
fn null_requires_an_option_target() {
    let err = <(i64,)>::from_cells(&[AnyValue::Null]).unwrap_err();
    assert!(matches!(err, FrameError::Cell { .. }));

    let decoded = <(Option<i64>,)>::from_cells(&[AnyValue::Null]).unwrap();
    assert_eq!(decoded, (None,));
    let decoded = <(Option<i64>,)>::from_cells(&[AnyValue::Int64(3)]).unwrap();
    assert_eq!(decoded, (Some(3),));
}

#[test]
fn cell_error_names_position_field_and_types() {
    let cells = vec![
        AnyValue::Int64(1),
        AnyValue::Int64(2),
        AnyValue::Int64(40),
    ];
    let msg = Person::from_cells(&cells).unwrap_err().to_string();
    assert!(msg.contains("cell 1"), "message was: {msg}");
    assert!(msg.contains("'name'"), "message was: {msg}");
    assert!(msg.contains("string"), "message was: {msg}");
}

#[test]
fn date_and_timestamp_cells_round_trip() {
    let date = NaiveDate::from_ymd_opt(2020, 1, 2).unwrap();
    let ts: NaiveDateTime = date.and_hms_opt(3, 4, 5).unwrap();

    let date_cell = Cell::to_any(&date);
    assert_eq!(<NaiveDate as Cell>::from_any(&date_cell), Some(date));

    let ts_cell = Cell::to_any(&ts);
    assert_eq!(<NaiveDateTime as Cell>::from_any(&ts_cell), Some(ts));
}

#[test]
fn record_schema_is_stable_across_calls() {
    assert_eq!(Person::schema(), Person::schema());
    assert_eq!(Person::schema().names(), vec!["id", "name", "age"]);
    assert_eq!(Person::ARITY, 3);
}

#[test]
fn nullable_fields_show_in_schema() {
    typed_record! {
        pub struct Sparse {
            pub id: i64,
            pub note: Option<String>,
        }
    }
    let schema = Sparse::schema();
    assert!(!schema.fields()[0].nullable);
    assert!(schema.fields()[1].nullable);
    assert_eq!(
        schema.tree_string(),
        "root\n |-- id: long (nullable = false)\n |-- note: string (nullable = true)\n"
    );
}
