//! typedframe - a compile-time typed schema facade over Polars
//!
//! This library attaches a static schema, carried by a Rust record type, to
//! an otherwise dynamically-typed Polars `DataFrame`, and exposes typed
//! accessors (row-to-record conversion, typed map/flatMap combinators). All
//! actual computation, storage, and query planning is delegated to Polars;
//! this layer only tracks the column schema through operations and converts
//! type-erased rows at the materialization boundary.

pub mod error;
pub mod frame;
pub mod prelude;
pub mod record;
pub mod row;
pub mod schema;

mod date_utils;

// Re-exported for macro-generated code and for building filter expressions.
pub use polars;

pub use error::FrameError;
pub use frame::{JoinType, TypedFrame, TypedWriter, WriteFormat, WriteMode};
pub use record::{Joined, Record};
pub use row::{Cell, Row};
pub use schema::{DataType, Field, Schema};
