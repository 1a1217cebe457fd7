//! Shared helpers for integration tests (record types and frame setup).

use typedframe::prelude::*;

typed_record! {
    pub struct Person {
        pub id: i64,
        pub name: String,
        pub age: i64,
    }
}

typed_record! {
    pub struct Dept {
        pub id: i64,
        pub dept: String,
    }
}

pub fn person(id: i64, name: &str, age: i64) -> Person {
    Person {
        id,
        name: name.to_string(),
        age,
    }
}

/// Convenience helper for a small three-person frame.
pub fn people() -> TypedFrame<Person> {
    TypedFrame::from_records(vec![
        person(1, "Alice", 25),
        person(2, "Bob", 30),
        person(3, "Carol", 35),
    ])
    .unwrap()
}
