//! Typed joins: prepend schema composition, positional splitting, outer
//! nullability, and the filtering joins.

mod common;

use common::{people, person, Dept, Person};
use typedframe::prelude::*;

fn depts() -> TypedFrame<Dept> {
    TypedFrame::from_records(vec![
        Dept {
            id: 1,
            dept: "Eng".to_string(),
        },
        Dept {
            id: 2,
            dept: "Sales".to_string(),
        },
    ])
    .unwrap()
}

#[test]
fn join_schema_is_the_positional_concatenation() {
    let joined = people().join(&depts(), vec!["id"], JoinType::Inner).unwrap();
    let schema = joined.schema();
    assert_eq!(schema.len(), Person::schema().len() + Dept::schema().len());
    assert_eq!(schema.names(), vec!["id", "name", "age", "id", "dept"]);

    let mut values = Person::schema().values();
    values.extend(Dept::schema().values());
    assert_eq!(schema.values(), values);
}

#[test]
fn joined_rows_split_at_the_left_arity() {
    let joined = people().join(&depts(), vec!["id"], JoinType::Inner).unwrap();
    let mut rows = joined.collect().unwrap();
    rows.sort_by_key(|j| j.0.id);
    assert_eq!(rows.len(), 2);

    let Joined(left, right) = &rows[0];
    assert_eq!(*left, person(1, "Alice", 25));
    assert_eq!(right.id, 1);
    assert_eq!(right.dept, "Eng");

    let Joined(left, right) = &rows[1];
    assert_eq!(*left, person(2, "Bob", 30));
    assert_eq!(right.dept, "Sales");
}

#[test]
fn left_join_needs_option_fields_on_the_right() {
    typed_record! {
        pub struct MaybeDept {
            pub id: Option<i64>,
            pub dept: Option<String>,
        }
    }
    let right: TypedFrame<MaybeDept> = TypedFrame::from_records(vec![MaybeDept {
        id: Some(1),
        dept: Some("Eng".to_string()),
    }])
    .unwrap();

    let joined = people().join(&right, vec!["id"], JoinType::Left).unwrap();
    let mut rows = joined.collect().unwrap();
    rows.sort_by_key(|j| j.0.id);
    assert_eq!(rows.len(), 3);
    assert_eq!(rows[0].1.dept.as_deref(), Some("Eng"));
    assert_eq!(rows[1].1.dept, None);
    assert_eq!(rows[2].1.id, None);
}

typed_record! {
    pub struct NullablePerson {
        pub id: Option<i64>,
        pub name: Option<String>,
    }
}

typed_record! {
    pub struct NullableDept {
        pub id: Option<i64>,
        pub dept: Option<String>,
    }
}

#[test]
fn right_join_keeps_the_positional_layout() {
    // Every dept id matches a person, so the non-Option left side decodes.
    let joined = people().join(&depts(), vec!["id"], JoinType::Right).unwrap();
    assert_eq!(
        joined.schema().names(),
        vec!["id", "name", "age", "id", "dept"]
    );
    let mut rows = joined.collect().unwrap();
    rows.sort_by_key(|j| j.1.id);
    assert_eq!(rows.len(), 2);

    let Joined(left, right) = &rows[0];
    assert_eq!(*left, person(1, "Alice", 25));
    assert_eq!(right.dept, "Eng");
    assert_eq!(rows[1].1.dept, "Sales");
}

#[test]
fn right_join_nulls_the_left_side_for_unmatched_rows() {
    let left: TypedFrame<NullablePerson> = TypedFrame::from_records(vec![NullablePerson {
        id: Some(1),
        name: Some("Alice".to_string()),
    }])
    .unwrap();

    let joined = left.join(&depts(), vec!["id"], JoinType::Right).unwrap();
    let mut rows = joined.collect().unwrap();
    rows.sort_by_key(|j| j.1.id);
    assert_eq!(rows.len(), 2);
    assert_eq!(rows[0].0.name.as_deref(), Some("Alice"));
    assert_eq!(rows[1].0.id, None);
    assert_eq!(rows[1].1.dept, "Sales");
}

#[test]
fn outer_join_nulls_both_unmatched_sides() {
    let left: TypedFrame<NullablePerson> = TypedFrame::from_records(vec![
        NullablePerson {
            id: Some(1),
            name: Some("Alice".to_string()),
        },
        NullablePerson {
            id: Some(3),
            name: Some("Carol".to_string()),
        },
    ])
    .unwrap();
    let right: TypedFrame<NullableDept> = TypedFrame::from_records(vec![
        NullableDept {
            id: Some(1),
            dept: Some("Eng".to_string()),
        },
        NullableDept {
            id: Some(2),
            dept: Some("Sales".to_string()),
        },
    ])
    .unwrap();

    let joined = left.join(&right, vec!["id"], JoinType::Outer).unwrap();
    let rows = joined.collect().unwrap();
    assert_eq!(rows.len(), 3);

    let matched = rows.iter().find(|j| j.0.id == Some(1)).unwrap();
    assert_eq!(matched.1.dept.as_deref(), Some("Eng"));

    let left_only = rows.iter().find(|j| j.0.id == Some(3)).unwrap();
    assert_eq!(left_only.1.id, None);

    let right_only = rows.iter().find(|j| j.0.id.is_none()).unwrap();
    assert_eq!(right_only.1.dept.as_deref(), Some("Sales"));
}

#[test]
fn left_join_with_non_option_right_fails_at_conversion() {
    let right = TypedFrame::from_records(vec![Dept {
        id: 1,
        dept: "Eng".to_string(),
    }])
    .unwrap();
    let joined = people().join(&right, vec!["id"], JoinType::Left).unwrap();
    // Unmatched rows carry nulls in Dept's non-Option fields.
    let err = joined.collect().unwrap_err();
    assert!(matches!(err, FrameError::Cell { .. }));
}

#[test]
fn self_join_keeps_duplicate_field_names() {
    let frame = people();
    let joined = frame.join(&frame, vec!["id"], JoinType::Inner).unwrap();
    assert_eq!(
        joined.schema().names(),
        vec!["id", "name", "age", "id", "name", "age"]
    );
    let mut rows = joined.collect().unwrap();
    rows.sort_by_key(|j| j.0.id);
    assert_eq!(rows.len(), 3);
    for Joined(left, right) in rows {
        assert_eq!(left, right);
    }
}

#[test]
fn to_json_disambiguates_duplicate_names_after_join() {
    let frame = people();
    let joined = frame.join(&frame, vec!["id"], JoinType::Inner).unwrap();
    let rows = joined.to_json().unwrap();
    assert_eq!(rows.len(), 3);

    let value: serde_json::Value = serde_json::from_str(&rows[0]).unwrap();
    let obj = value.as_object().unwrap();
    // One key per column: both sides survive under the engine's suffixing.
    assert_eq!(obj.len(), 6);
    assert!(obj.contains_key("id"));
    assert!(obj.contains_key("id_right"));
    assert_eq!(obj["name"], obj["name_right"]);
}

#[test]
fn semi_and_anti_joins_preserve_the_left_schema() {
    let frame = people();
    let matched = frame.semi_join(&depts(), vec!["id"]).unwrap();
    let mut ids: Vec<i64> = matched.collect().unwrap().into_iter().map(|p| p.id).collect();
    ids.sort_unstable();
    assert_eq!(ids, vec![1, 2]);

    let unmatched = frame.anti_join(&depts(), vec!["id"]).unwrap();
    assert_eq!(
        unmatched.collect().unwrap(),
        vec![person(3, "Carol", 35)]
    );
}

#[test]
fn unknown_join_key_is_a_not_found_error() {
    let err = people()
        .join(&depts(), vec!["missing"], JoinType::Inner)
        .unwrap_err();
    match err {
        FrameError::NotFound(msg) => {
            assert!(msg.contains("missing"), "message was: {msg}");
            assert!(msg.contains("id"), "message was: {msg}");
        }
        other => panic!("expected not found, got: {other}"),
    }
}
