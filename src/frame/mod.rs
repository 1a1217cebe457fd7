//! TypedFrame module: the typed facade and submodules for transformations,
//! joins, combinators, and writing.
//!
//! Every public operation mirrors one Polars operation 1:1. Operations that
//! preserve column composition return the same record type; the only
//! schema-transforming operation is join, whose result schema is the
//! positional concatenation of both sides. Materializing operations retrieve
//! type-erased rows from the engine and run the row converter per row,
//! preserving engine row order.

mod combinators;
mod joins;
mod transformations;
mod write;

pub use joins::JoinType;
pub use write::{TypedWriter, WriteFormat, WriteMode};

use crate::error::FrameError;
use crate::record::{Joined, Record};
use crate::row::Row;
use crate::schema::Schema;
use polars::prelude::{AnyValue, Column, DataFrame as PlDataFrame, Expr, IntoColumn, Series};
use serde_json::Value as JsonValue;
use std::marker::PhantomData;
use std::sync::Arc;

/// Typed facade over an eager Polars `DataFrame`.
///
/// The record type `R` carries the column schema at compile time; no runtime
/// schema value is stored alongside the engine handle. All state
/// (materialization, memory) lives in the engine; this layer holds a single
/// shared handle and is itself stateless.
#[derive(Debug)]
pub struct TypedFrame<R> {
    pub(crate) df: Arc<PlDataFrame>,
    _record: PhantomData<fn() -> R>,
}

impl<R: Record> TypedFrame<R> {
    /// Wrap an engine frame whose shape is already known to match `R`.
    pub(crate) fn from_polars_unchecked(df: PlDataFrame) -> Self {
        TypedFrame {
            df: Arc::new(df),
            _record: PhantomData,
        }
    }

    /// Adopt an engine-built frame, validating column count and positional
    /// dtypes against `R`'s schema. Matching is positional: the frame's own
    /// column names are ignored and replaced by the record's field names, so
    /// adopted frames interoperate with constructed ones in name-delegating
    /// operations (union, set operations, join keys).
    ///
    /// Nullability cannot be validated here (the engine does not expose it);
    /// a null in a non-`Option` field surfaces later as a conversion error.
    pub fn from_polars(df: PlDataFrame) -> Result<Self, FrameError> {
        let schema = R::schema();
        let cols = df.get_columns();
        if cols.len() != schema.len() {
            return Err(FrameError::Schema(format!(
                "expected {} columns, engine frame has {}",
                schema.len(),
                cols.len()
            )));
        }
        for (i, (field, col)) in schema.fields().iter().zip(cols).enumerate() {
            if !field.data_type.admits(col.dtype()) {
                let actual = crate::schema::DataType::from_polars(col.dtype())
                    .map(|t| t.to_string())
                    .unwrap_or_else(|| format!("{:?}", col.dtype()));
                return Err(FrameError::Schema(format!(
                    "column {i} ('{}'): expected {}, engine frame has {actual}",
                    field.name, field.data_type
                )));
            }
        }
        // Joined shapes can carry duplicate logical names, which the engine
        // rejects as physical names; those keep the engine's own names.
        let unique: std::collections::HashSet<&str> =
            schema.fields().iter().map(|f| f.name.as_str()).collect();
        let df = if unique.len() == schema.len() {
            let renamed: Vec<Column> = cols
                .iter()
                .zip(schema.fields())
                .map(|(col, field)| {
                    let mut col = col.clone();
                    col.rename(field.name.as_str().into());
                    col
                })
                .collect();
            PlDataFrame::new(renamed)?
        } else {
            df
        };
        Ok(Self::from_polars_unchecked(df))
    }

    /// Build a frame from typed records. The column layout is derived from
    /// `R`'s schema, so the positional invariant holds by construction.
    pub fn from_records(records: Vec<R>) -> Result<Self, FrameError> {
        let schema = R::schema();
        if records.is_empty() {
            return Ok(Self::from_polars_unchecked(PlDataFrame::empty_with_schema(
                &schema.to_polars_schema(),
            )));
        }
        let mut columns: Vec<Vec<AnyValue<'static>>> = (0..schema.len())
            .map(|_| Vec::with_capacity(records.len()))
            .collect();
        for record in &records {
            for (i, cell) in record.to_cells().into_iter().enumerate() {
                columns[i].push(cell);
            }
        }
        let mut out = Vec::with_capacity(schema.len());
        for (field, values) in schema.fields().iter().zip(columns) {
            let series = Series::from_any_values_and_dtype(
                field.name.as_str().into(),
                &values,
                &field.data_type.to_polars(),
                true,
            )?;
            out.push(series.into_column());
        }
        Ok(Self::from_polars_unchecked(PlDataFrame::new(out)?))
    }

    /// Escape hatch: the underlying engine handle.
    pub fn to_polars(&self) -> Arc<PlDataFrame> {
        self.df.clone()
    }

    /// Column schema, as carried by the record type.
    pub fn schema(&self) -> Schema {
        R::schema()
    }

    /// Column names in order.
    pub fn columns(&self) -> Vec<String> {
        R::schema()
            .fields()
            .iter()
            .map(|f| f.name.clone())
            .collect()
    }

    /// Column names and dtype strings, PySpark `dtypes` style.
    pub fn dtypes(&self) -> Vec<(String, String)> {
        R::schema()
            .fields()
            .iter()
            .map(|f| (f.name.clone(), f.data_type.to_string()))
            .collect()
    }

    /// Count the number of rows (action - triggers execution).
    pub fn count(&self) -> usize {
        self.df.height()
    }

    /// True if the frame has zero rows.
    pub fn is_empty(&self) -> bool {
        self.df.height() == 0
    }

    /// Returns true (eager single-node backend). PySpark isLocal.
    pub fn is_local(&self) -> bool {
        true
    }

    /// Show the first n rows using the engine's display.
    pub fn show(&self, n: Option<usize>) {
        let n = n.unwrap_or(20);
        println!("{}", self.df.head(Some(n)));
    }

    /// Schema as tree string. PySpark printSchema.
    pub fn print_schema(&self) -> String {
        R::schema().tree_string()
    }

    /// Execution plan description. The backend is eager, so there is no
    /// deferred plan to render; reports the in-memory scan shape.
    pub fn explain(&self) -> String {
        format!(
            "== Physical Plan ==\nInMemoryScan {} (rows={}, eager polars backend)",
            R::schema(),
            self.df.height()
        )
    }

    /// Materialize every row as a type-erased [`Row`], in engine order.
    pub(crate) fn rows(&self) -> Result<Vec<Row>, FrameError> {
        let df = self.df.as_ref();
        let cols = df.get_columns();
        let mut rows = Vec::with_capacity(df.height());
        for i in 0..df.height() {
            let mut cells = Vec::with_capacity(cols.len());
            for col in cols {
                cells.push(col.get(i)?.into_static());
            }
            rows.push(Row::new(cells));
        }
        Ok(rows)
    }

    /// Materialize all rows as typed records (action - triggers execution).
    pub fn collect(&self) -> Result<Vec<R>, FrameError> {
        self.rows()?.iter().map(Row::decode).collect()
    }

    /// First n rows as typed records. PySpark take(n).
    pub fn take(&self, n: usize) -> Result<Vec<R>, FrameError> {
        Self::from_polars_unchecked(self.df.head(Some(n))).collect()
    }

    /// First row as a typed record, if any. PySpark first / head.
    pub fn first(&self) -> Result<Option<R>, FrameError> {
        Ok(self.take(1)?.pop())
    }

    /// Filter rows using a Polars expression. Delegated; schema-preserving.
    pub fn filter(&self, condition: Expr) -> Result<TypedFrame<R>, FrameError> {
        transformations::filter(self, condition)
    }

    /// Drop duplicate rows. PySpark distinct.
    pub fn distinct(&self) -> Result<TypedFrame<R>, FrameError> {
        transformations::distinct(self)
    }

    /// Return first n rows. PySpark limit.
    pub fn limit(&self, n: usize) -> Result<TypedFrame<R>, FrameError> {
        transformations::limit(self, n)
    }

    /// First n rows as a frame. PySpark head(n).
    pub fn head(&self, n: usize) -> Result<TypedFrame<R>, FrameError> {
        transformations::limit(self, n)
    }

    /// Last n rows. PySpark tail(n).
    pub fn tail(&self, n: usize) -> Result<TypedFrame<R>, FrameError> {
        transformations::tail(self, n)
    }

    /// Skip first n rows. PySpark offset(n).
    pub fn offset(&self, n: usize) -> Result<TypedFrame<R>, FrameError> {
        transformations::offset(self, n)
    }

    /// Union (unionAll): stack another frame of the same record type
    /// vertically. Schemas match by construction.
    pub fn union(&self, other: &TypedFrame<R>) -> Result<TypedFrame<R>, FrameError> {
        transformations::union(self, other)
    }

    /// Set intersection: distinct rows in both self and other. PySpark intersect.
    pub fn intersect(&self, other: &TypedFrame<R>) -> Result<TypedFrame<R>, FrameError> {
        transformations::intersect(self, other)
    }

    /// Set difference: distinct rows in self not in other. PySpark subtract / except.
    pub fn subtract(&self, other: &TypedFrame<R>) -> Result<TypedFrame<R>, FrameError> {
        transformations::subtract(self, other)
    }

    /// Sample a fraction of rows. PySpark sample(withReplacement, fraction, seed).
    pub fn sample(
        &self,
        with_replacement: bool,
        fraction: f64,
        seed: Option<u64>,
    ) -> Result<TypedFrame<R>, FrameError> {
        transformations::sample(self, with_replacement, fraction, seed)
    }

    /// Join with another typed frame on the given key columns.
    ///
    /// The result schema is the positional concatenation: left columns then
    /// right columns, both key copies included. Duplicate field names are
    /// permitted at this layer (the engine suffixes the physical duplicates;
    /// typed access stays positional). For Left/Right/Outer, fields on the
    /// side that may not match must be `Option` in their record type.
    pub fn join<R2: Record>(
        &self,
        other: &TypedFrame<R2>,
        on: Vec<&str>,
        how: JoinType,
    ) -> Result<TypedFrame<Joined<R, R2>>, FrameError> {
        joins::join(self, other, on, how)
    }

    /// Rows from self that have a match in other; only self's columns.
    /// PySpark left_semi join; schema-preserving.
    pub fn semi_join<R2: Record>(
        &self,
        other: &TypedFrame<R2>,
        on: Vec<&str>,
    ) -> Result<TypedFrame<R>, FrameError> {
        joins::semi_join(self, other, on)
    }

    /// Rows from self that have no match in other; only self's columns.
    /// PySpark left_anti join; schema-preserving.
    pub fn anti_join<R2: Record>(
        &self,
        other: &TypedFrame<R2>,
        on: Vec<&str>,
    ) -> Result<TypedFrame<R>, FrameError> {
        joins::anti_join(self, other, on)
    }

    /// Element-wise transform: convert each row to `R`, apply `f`, rebuild a
    /// frame of the output record type. Iteration is delegated to the engine's
    /// materialization order.
    pub fn map<R2, F>(&self, f: F) -> Result<TypedFrame<R2>, FrameError>
    where
        R2: Record,
        F: FnMut(R) -> R2,
    {
        combinators::map(self, f)
    }

    /// Element-wise transform producing zero or more outputs per row.
    pub fn flat_map<R2, I, F>(&self, f: F) -> Result<TypedFrame<R2>, FrameError>
    where
        R2: Record,
        I: IntoIterator<Item = R2>,
        F: FnMut(R) -> I,
    {
        combinators::flat_map(self, f)
    }

    /// Partition-wise transform. The eager backend holds a single partition,
    /// so `f` sees all rows at once.
    pub fn map_partitions<R2, F>(&self, f: F) -> Result<TypedFrame<R2>, FrameError>
    where
        R2: Record,
        F: FnOnce(Vec<R>) -> Vec<R2>,
    {
        combinators::map_partitions(self, f)
    }

    /// Per-element side-effecting traversal, in engine row order.
    pub fn foreach<F>(&self, f: F) -> Result<(), FrameError>
    where
        F: FnMut(R),
    {
        combinators::foreach(self, f)
    }

    /// No-op: execution is eager. PySpark cache.
    pub fn cache(&self) -> TypedFrame<R> {
        self.clone()
    }

    /// No-op: execution is eager. PySpark persist.
    pub fn persist(&self) -> TypedFrame<R> {
        self.clone()
    }

    /// No-op. PySpark unpersist.
    pub fn unpersist(&self) -> TypedFrame<R> {
        self.clone()
    }

    /// No-op: single partition backend. PySpark repartition(n).
    pub fn repartition(&self, _num_partitions: usize) -> TypedFrame<R> {
        self.clone()
    }

    /// No-op: single partition backend. PySpark coalesce(n).
    pub fn coalesce(&self, _num_partitions: usize) -> TypedFrame<R> {
        self.clone()
    }

    /// No-op: no expression resolver at this layer. PySpark as / alias.
    pub fn alias(&self, _name: &str) -> TypedFrame<R> {
        self.clone()
    }

    /// Collect rows as JSON objects keyed by the engine's column names, one
    /// per row. For use by language bindings. After a join the engine
    /// disambiguates duplicate names with a suffix, so no key is lost.
    pub fn to_json(&self) -> Result<Vec<String>, FrameError> {
        let names = self.df.get_column_names();
        let mut out = Vec::with_capacity(self.df.height());
        for row in self.rows()? {
            let mut obj = serde_json::Map::with_capacity(names.len());
            for (name, cell) in names.iter().zip(row.cells()) {
                obj.insert(name.to_string(), any_value_to_json(cell));
            }
            out.push(serde_json::to_string(&JsonValue::Object(obj))?);
        }
        Ok(out)
    }

    /// Return a writer for generic format (parquet, csv, json). PySpark-style
    /// write API.
    pub fn write(&self) -> TypedWriter<'_, R> {
        TypedWriter::new(self)
    }
}

impl<R: Record> Clone for TypedFrame<R> {
    fn clone(&self) -> Self {
        TypedFrame {
            df: self.df.clone(),
            _record: PhantomData,
        }
    }
}

impl<R: Record> std::fmt::Display for TypedFrame<R> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.df)
    }
}

/// Convert a Polars AnyValue to serde_json::Value for language bindings.
fn any_value_to_json(av: &AnyValue<'_>) -> JsonValue {
    match av {
        AnyValue::Null => JsonValue::Null,
        AnyValue::Boolean(b) => JsonValue::Bool(*b),
        AnyValue::Int32(i) => JsonValue::Number(serde_json::Number::from(*i)),
        AnyValue::Int64(i) => JsonValue::Number(serde_json::Number::from(*i)),
        AnyValue::UInt32(u) => JsonValue::Number(serde_json::Number::from(*u)),
        AnyValue::UInt64(u) => JsonValue::Number(serde_json::Number::from(*u)),
        AnyValue::Float32(fl) => serde_json::Number::from_f64(f64::from(*fl))
            .map(JsonValue::Number)
            .unwrap_or(JsonValue::Null),
        AnyValue::Float64(fl) => serde_json::Number::from_f64(*fl)
            .map(JsonValue::Number)
            .unwrap_or(JsonValue::Null),
        AnyValue::String(s) => JsonValue::String((*s).to_string()),
        AnyValue::StringOwned(s) => JsonValue::String(s.to_string()),
        // Dates and timestamps use the engine's display rendering.
        AnyValue::Date(_) => JsonValue::String(format!("{av}")),
        AnyValue::Datetime(..) | AnyValue::DatetimeOwned(..) => {
            JsonValue::String(format!("{av}"))
        }
        _ => JsonValue::Null,
    }
}
