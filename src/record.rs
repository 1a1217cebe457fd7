//! Record types: the compile-time carrier of a frame's schema.
//!
//! A [`Record`] maps a Rust type to an ordered column schema and converts a
//! type-erased row to and from that type by position. Three families of
//! records exist:
//!
//! - tuples of [`Cell`] types up to arity 8, with positional field names
//!   `_1..=_8` (the "value list" form, used by the typed combinators);
//! - named structs declared through [`typed_record!`], which derives the
//!   schema from the field declarations once per type and caches it;
//! - [`Joined`], the result shape of a join: the left record's columns
//!   followed by the right record's columns.
//!
//! Row conversion is positional, never by name: a record matches a frame when
//! its field types line up with the frame's columns in order.

use crate::error::FrameError;
use crate::row::{self, Cell};
use crate::schema::{Field, Schema};
use polars::prelude::AnyValue;

/// A statically-typed record corresponding positionally to a frame's columns.
pub trait Record: Sized {
    /// Number of columns.
    const ARITY: usize;

    /// Column schema of this record type. Implementations derived through
    /// [`typed_record!`] compute this once per type and cache it.
    fn schema() -> Schema;

    /// Convert a type-erased row into this record, positionally. Fails on
    /// arity mismatch or any cell that does not convert to its declared type.
    fn from_cells(cells: &[AnyValue<'static>]) -> Result<Self, FrameError>;

    /// Type-erased row representation of this record, in column order.
    fn to_cells(&self) -> Vec<AnyValue<'static>>;
}

/// Result shape of a join: `A`'s columns followed by `B`'s columns.
///
/// The schema is the positional concatenation (`A::schema().prepend(B)`);
/// decoding splits the row at `A::ARITY`. For outer-style joins, fields on
/// the side that may not match must be `Option` in their record type.
#[derive(Debug, Clone, PartialEq)]
pub struct Joined<A, B>(pub A, pub B);

impl<A: Record, B: Record> Record for Joined<A, B> {
    const ARITY: usize = A::ARITY + B::ARITY;

    fn schema() -> Schema {
        A::schema().prepend(&B::schema())
    }

    fn from_cells(cells: &[AnyValue<'static>]) -> Result<Self, FrameError> {
        row::check_arity(Self::ARITY, cells.len())?;
        let (left, right) = cells.split_at(A::ARITY);
        Ok(Joined(A::from_cells(left)?, B::from_cells(right)?))
    }

    fn to_cells(&self) -> Vec<AnyValue<'static>> {
        let mut cells = self.0.to_cells();
        cells.extend(self.1.to_cells());
        cells
    }
}

macro_rules! impl_tuple_record {
    ($(($idx:tt, $name:literal, $T:ident)),+) => {
        impl<$($T: Cell),+> Record for ($($T,)+) {
            const ARITY: usize = <[&str]>::len(&[$($name),+]);

            fn schema() -> Schema {
                Schema::new(vec![$(Field::new($name, $T::dtype(), $T::NULLABLE)),+])
            }

            fn from_cells(cells: &[AnyValue<'static>]) -> Result<Self, FrameError> {
                row::check_arity(Self::ARITY, cells.len())?;
                Ok(($(row::cell_at::<$T>(cells, $idx, $name)?,)+))
            }

            fn to_cells(&self) -> Vec<AnyValue<'static>> {
                vec![$(self.$idx.to_any()),+]
            }
        }
    };
}

impl_tuple_record!((0, "_1", C1));
impl_tuple_record!((0, "_1", C1), (1, "_2", C2));
impl_tuple_record!((0, "_1", C1), (1, "_2", C2), (2, "_3", C3));
impl_tuple_record!((0, "_1", C1), (1, "_2", C2), (2, "_3", C3), (3, "_4", C4));
impl_tuple_record!(
    (0, "_1", C1),
    (1, "_2", C2),
    (2, "_3", C3),
    (3, "_4", C4),
    (4, "_5", C5)
);
impl_tuple_record!(
    (0, "_1", C1),
    (1, "_2", C2),
    (2, "_3", C3),
    (3, "_4", C4),
    (4, "_5", C5),
    (5, "_6", C6)
);
impl_tuple_record!(
    (0, "_1", C1),
    (1, "_2", C2),
    (2, "_3", C3),
    (3, "_4", C4),
    (4, "_5", C5),
    (5, "_6", C6),
    (6, "_7", C7)
);
impl_tuple_record!(
    (0, "_1", C1),
    (1, "_2", C2),
    (2, "_3", C3),
    (3, "_4", C4),
    (4, "_5", C5),
    (5, "_6", C6),
    (6, "_7", C7),
    (7, "_8", C8)
);

/// Declare a named record type with a derived, cached schema.
///
/// Generates the struct (with `Debug`, `Clone`, `PartialEq`) and a [`Record`]
/// impl whose schema is computed from the field declarations on first use and
/// cached for the lifetime of the program. Field order in the declaration is
/// column order in the frame.
///
/// ```
/// use typedframe::typed_record;
///
/// typed_record! {
///     pub struct Person {
///         pub id: i64,
///         pub name: String,
///         pub age: Option<i64>,
///     }
/// }
/// ```
#[macro_export]
macro_rules! typed_record {
    (
        $(#[$meta:meta])*
        $vis:vis struct $name:ident {
            $($(#[$fmeta:meta])* $fvis:vis $field:ident : $ty:ty),+ $(,)?
        }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq)]
        $vis struct $name {
            $($(#[$fmeta])* $fvis $field: $ty,)+
        }

        impl $crate::record::Record for $name {
            const ARITY: usize = <[&str]>::len(&[$(stringify!($field)),+]);

            fn schema() -> $crate::schema::Schema {
                static SCHEMA: ::std::sync::OnceLock<$crate::schema::Schema> =
                    ::std::sync::OnceLock::new();
                SCHEMA
                    .get_or_init(|| {
                        $crate::schema::Schema::new(vec![
                            $($crate::schema::Field::new(
                                stringify!($field),
                                <$ty as $crate::row::Cell>::dtype(),
                                <$ty as $crate::row::Cell>::NULLABLE,
                            )),+
                        ])
                    })
                    .clone()
            }

            fn from_cells(
                cells: &[$crate::polars::prelude::AnyValue<'static>],
            ) -> ::std::result::Result<Self, $crate::error::FrameError> {
                $crate::row::check_arity(Self::ARITY, cells.len())?;
                let mut idx = 0usize;
                let record = Self {
                    $($field: {
                        let value =
                            $crate::row::cell_at::<$ty>(cells, idx, stringify!($field))?;
                        idx += 1;
                        value
                    },)+
                };
                let _ = idx;
                ::std::result::Result::Ok(record)
            }

            fn to_cells(&self) -> ::std::vec::Vec<$crate::polars::prelude::AnyValue<'static>> {
                vec![$($crate::row::Cell::to_any(&self.$field)),+]
            }
        }
    };
}
