//! Type-erased rows and the positional row converter.
//!
//! A [`Row`] is what the engine hands back at materialization time: an
//! ordered sequence of loosely-typed cells. Conversion into a typed record is
//! positional and strict: the arity is checked first (a wrong-length row
//! fails, never truncates or pads), then each cell must convert to its
//! declared type with no silent coercion. A text cell targeted at a numeric
//! field is an error, not a default. The only admitted loosening is lossless
//! integer/float widening (Int32 into `i64`, Float32 into `f64`) and `Null`
//! into `Option` targets.

use crate::date_utils::epoch_naive_date;
use crate::error::FrameError;
use crate::record::Record;
use crate::schema::DataType;
use chrono::{DateTime, NaiveDate, NaiveDateTime};
use polars::prelude::{AnyValue, TimeUnit};

/// An ordered sequence of type-erased cell values from the engine.
#[derive(Debug, Clone)]
pub struct Row {
    cells: Vec<AnyValue<'static>>,
}

impl Row {
    pub fn new(cells: Vec<AnyValue<'static>>) -> Self {
        Row { cells }
    }

    pub fn cells(&self) -> &[AnyValue<'static>] {
        &self.cells
    }

    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    /// Convert this row into a typed record, positionally.
    pub fn decode<R: Record>(&self) -> Result<R, FrameError> {
        R::from_cells(&self.cells)
    }
}

/// A single column value type: its descriptor type plus strict conversions
/// to and from the engine's type-erased cell representation.
pub trait Cell: Sized {
    /// Whether the engine column may contain nulls for this type.
    const NULLABLE: bool = false;

    /// Descriptor type of this cell.
    fn dtype() -> DataType;

    /// Strict conversion from an engine cell. `None` means the value is not
    /// of (or losslessly widenable to) this type.
    fn from_any(av: &AnyValue<'static>) -> Option<Self>;

    /// Engine cell representation of this value.
    fn to_any(&self) -> AnyValue<'static>;
}

impl Cell for bool {
    fn dtype() -> DataType {
        DataType::Boolean
    }

    fn from_any(av: &AnyValue<'static>) -> Option<Self> {
        match av {
            AnyValue::Boolean(b) => Some(*b),
            _ => None,
        }
    }

    fn to_any(&self) -> AnyValue<'static> {
        AnyValue::Boolean(*self)
    }
}

impl Cell for i32 {
    fn dtype() -> DataType {
        DataType::Integer
    }

    fn from_any(av: &AnyValue<'static>) -> Option<Self> {
        match av {
            AnyValue::Int32(v) => Some(*v),
            _ => None,
        }
    }

    fn to_any(&self) -> AnyValue<'static> {
        AnyValue::Int32(*self)
    }
}

impl Cell for i64 {
    fn dtype() -> DataType {
        DataType::Long
    }

    fn from_any(av: &AnyValue<'static>) -> Option<Self> {
        match av {
            AnyValue::Int64(v) => Some(*v),
            // Lossless widening; integral columns read as Long.
            AnyValue::Int32(v) => Some(i64::from(*v)),
            _ => None,
        }
    }

    fn to_any(&self) -> AnyValue<'static> {
        AnyValue::Int64(*self)
    }
}

impl Cell for f64 {
    fn dtype() -> DataType {
        DataType::Double
    }

    fn from_any(av: &AnyValue<'static>) -> Option<Self> {
        match av {
            AnyValue::Float64(v) => Some(*v),
            AnyValue::Float32(v) => Some(f64::from(*v)),
            _ => None,
        }
    }

    fn to_any(&self) -> AnyValue<'static> {
        AnyValue::Float64(*self)
    }
}

impl Cell for String {
    fn dtype() -> DataType {
        DataType::String
    }

    fn from_any(av: &AnyValue<'static>) -> Option<Self> {
        match av {
            AnyValue::String(s) => Some((*s).to_string()),
            AnyValue::StringOwned(s) => Some(s.to_string()),
            _ => None,
        }
    }

    fn to_any(&self) -> AnyValue<'static> {
        AnyValue::StringOwned(self.as_str().into())
    }
}

impl Cell for NaiveDate {
    fn dtype() -> DataType {
        DataType::Date
    }

    fn from_any(av: &AnyValue<'static>) -> Option<Self> {
        match av {
            AnyValue::Date(days) => Some(epoch_naive_date() + chrono::Duration::days(i64::from(*days))),
            _ => None,
        }
    }

    fn to_any(&self) -> AnyValue<'static> {
        let days = self.signed_duration_since(epoch_naive_date()).num_days();
        AnyValue::Date(days as i32)
    }
}

impl Cell for NaiveDateTime {
    fn dtype() -> DataType {
        DataType::Timestamp
    }

    fn from_any(av: &AnyValue<'static>) -> Option<Self> {
        let (value, unit) = match av {
            // Zoned datetimes are rejected: a naive target cannot carry them.
            AnyValue::Datetime(v, tu, None) => (*v, *tu),
            AnyValue::DatetimeOwned(v, tu, None) => (*v, *tu),
            _ => return None,
        };
        match unit {
            TimeUnit::Nanoseconds => Some(DateTime::from_timestamp_nanos(value).naive_utc()),
            TimeUnit::Microseconds => {
                DateTime::from_timestamp_micros(value).map(|dt| dt.naive_utc())
            }
            TimeUnit::Milliseconds => {
                DateTime::from_timestamp_millis(value).map(|dt| dt.naive_utc())
            }
        }
    }

    fn to_any(&self) -> AnyValue<'static> {
        AnyValue::DatetimeOwned(
            self.and_utc().timestamp_micros(),
            TimeUnit::Microseconds,
            None,
        )
    }
}

impl<C: Cell> Cell for Option<C> {
    const NULLABLE: bool = true;

    fn dtype() -> DataType {
        C::dtype()
    }

    fn from_any(av: &AnyValue<'static>) -> Option<Self> {
        match av {
            AnyValue::Null => Some(None),
            other => C::from_any(other).map(Some),
        }
    }

    fn to_any(&self) -> AnyValue<'static> {
        match self {
            Some(v) => v.to_any(),
            None => AnyValue::Null,
        }
    }
}

/// Fail unless the row length matches the record's column count.
pub fn check_arity(expected: usize, actual: usize) -> Result<(), FrameError> {
    if expected == actual {
        Ok(())
    } else {
        Err(FrameError::Arity { expected, actual })
    }
}

/// Convert the cell at position `at` into `T`, reporting position, field
/// name, and expected vs. actual type on failure.
pub fn cell_at<T: Cell>(
    cells: &[AnyValue<'static>],
    at: usize,
    field: &str,
) -> Result<T, FrameError> {
    let av = cells.get(at).ok_or(FrameError::Arity {
        expected: at + 1,
        actual: cells.len(),
    })?;
    T::from_any(av).ok_or_else(|| FrameError::Cell {
        index: at,
        field: field.to_string(),
        expected: if T::NULLABLE {
            format!("{} (nullable)", T::dtype())
        } else {
            T::dtype().to_string()
        },
        actual: format!("{av:?}"),
    })
}
