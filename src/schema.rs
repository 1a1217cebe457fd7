//! Runtime schema descriptor and the schema algebra.
//!
//! A [`Schema`] is an ordered list of [`Field`]s. Field order always matches
//! the ordinal positions of the columns in the wrapped Polars frame: it is
//! established once when a frame is constructed from a record type (or
//! validated when adopting a foreign frame) and transformed algebraically by
//! table operations, never re-derived from the engine's own metadata.
//!
//! The algebra is two operations: [`Schema::prepend`] (concatenation, used by
//! join) and [`Schema::values`] (strip field names, keep ordered value types).

use crate::error::FrameError;
use polars::prelude::{DataType as PlDataType, TimeUnit};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Column value type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DataType {
    Boolean,
    Integer,
    Long,
    Double,
    String,
    Date,
    Timestamp,
}

impl DataType {
    /// Corresponding Polars dtype.
    pub fn to_polars(&self) -> PlDataType {
        match self {
            DataType::Boolean => PlDataType::Boolean,
            DataType::Integer => PlDataType::Int32,
            DataType::Long => PlDataType::Int64,
            DataType::Double => PlDataType::Float64,
            DataType::String => PlDataType::String,
            DataType::Date => PlDataType::Date,
            DataType::Timestamp => PlDataType::Datetime(TimeUnit::Microseconds, None),
        }
    }

    /// Map a Polars dtype back to a descriptor type, if representable.
    pub fn from_polars(dtype: &PlDataType) -> Option<DataType> {
        match dtype {
            PlDataType::Boolean => Some(DataType::Boolean),
            PlDataType::Int32 => Some(DataType::Integer),
            PlDataType::Int64 => Some(DataType::Long),
            PlDataType::Float32 | PlDataType::Float64 => Some(DataType::Double),
            PlDataType::String => Some(DataType::String),
            PlDataType::Date => Some(DataType::Date),
            PlDataType::Datetime(_, None) => Some(DataType::Timestamp),
            _ => None,
        }
    }

    /// Whether an engine column of `dtype` can back a field of this type.
    ///
    /// Exact matches plus lossless numeric widening (Int32 into Long,
    /// Float32 into Double). Nothing else; in particular integral columns
    /// never back Double fields.
    pub fn admits(&self, dtype: &PlDataType) -> bool {
        match self {
            DataType::Long => matches!(dtype, PlDataType::Int64 | PlDataType::Int32),
            DataType::Double => matches!(dtype, PlDataType::Float64 | PlDataType::Float32),
            DataType::Timestamp => matches!(dtype, PlDataType::Datetime(_, None)),
            other => other.to_polars() == *dtype,
        }
    }
}

impl fmt::Display for DataType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            DataType::Boolean => "boolean",
            DataType::Integer => "integer",
            DataType::Long => "long",
            DataType::Double => "double",
            DataType::String => "string",
            DataType::Date => "date",
            DataType::Timestamp => "timestamp",
        };
        f.write_str(name)
    }
}

/// A named column: name, value type, nullability.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Field {
    pub name: String,
    pub data_type: DataType,
    pub nullable: bool,
}

impl Field {
    pub fn new(name: impl Into<String>, data_type: DataType, nullable: bool) -> Self {
        Field {
            name: name.into(),
            data_type,
            nullable,
        }
    }
}

/// Ordered list of fields describing a frame's columns.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Schema {
    fields: Vec<Field>,
}

impl Schema {
    pub fn new(fields: Vec<Field>) -> Self {
        Schema { fields }
    }

    pub fn fields(&self) -> &[Field] {
        &self.fields
    }

    /// Number of columns.
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Column names in order.
    pub fn names(&self) -> Vec<&str> {
        self.fields.iter().map(|f| f.name.as_str()).collect()
    }

    /// Concatenate: columns of `self` followed by columns of `other`.
    ///
    /// This is the join result layout. Duplicate field names across the two
    /// sides are permitted and not an error at this layer; disambiguation is
    /// deferred to the consumer.
    pub fn prepend(&self, other: &Schema) -> Schema {
        let mut fields = Vec::with_capacity(self.fields.len() + other.fields.len());
        fields.extend(self.fields.iter().cloned());
        fields.extend(other.fields.iter().cloned());
        Schema { fields }
    }

    /// Drop field names and nullability, keeping the ordered value types.
    pub fn values(&self) -> Vec<DataType> {
        self.fields.iter().map(|f| f.data_type).collect()
    }

    /// Corresponding Polars schema.
    pub fn to_polars_schema(&self) -> polars::prelude::Schema {
        use polars::prelude::Field as PlField;
        let fields: Vec<PlField> = self
            .fields
            .iter()
            .map(|f| PlField::new(f.name.as_str().into(), f.data_type.to_polars()))
            .collect();
        polars::prelude::Schema::from_iter(fields)
    }

    /// Build a descriptor from a Polars schema. The engine does not expose
    /// nullability, so every field comes back nullable. Fails on dtypes this
    /// layer has no counterpart for.
    pub fn from_polars_schema(schema: &polars::prelude::Schema) -> Result<Schema, FrameError> {
        let mut fields = Vec::with_capacity(schema.len());
        for (name, dtype) in schema.iter() {
            let data_type = DataType::from_polars(dtype).ok_or_else(|| {
                FrameError::Schema(format!(
                    "unsupported engine dtype {dtype:?} for column '{name}'"
                ))
            })?;
            fields.push(Field::new(name.as_str(), data_type, true));
        }
        Ok(Schema { fields })
    }

    /// Spark-style `printSchema` rendering.
    pub fn tree_string(&self) -> String {
        let mut out = String::from("root\n");
        for f in &self.fields {
            out.push_str(&format!(
                " |-- {}: {} (nullable = {})\n",
                f.name, f.data_type, f.nullable
            ));
        }
        out
    }

    /// Serialize the descriptor as JSON (for bindings and tooling).
    pub fn to_json_string(&self) -> Result<String, FrameError> {
        Ok(serde_json::to_string(self)?)
    }
}

impl fmt::Display for Schema {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let cols: Vec<String> = self
            .fields
            .iter()
            .map(|fld| format!("{}: {}", fld.name, fld.data_type))
            .collect();
        write!(f, "[{}]", cols.join(", "))
    }
}
