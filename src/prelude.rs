//! One-stop prelude for application code and embedding.
//!
//! Use `use typedframe::prelude::*` to get the most common types plus the
//! Polars expression helpers needed for `filter`.

pub use crate::error::FrameError;
pub use crate::frame::{JoinType, TypedFrame, TypedWriter, WriteFormat, WriteMode};
pub use crate::record::{Joined, Record};
pub use crate::row::{Cell, Row};
pub use crate::schema::{DataType, Field, Schema};
pub use crate::typed_record;

pub use polars::prelude::{col, lit, Expr};
