//! PySpark-style write API: format, mode, free-form options, save to path or
//! warehouse table.

use super::TypedFrame;
use crate::error::FrameError;
use crate::record::Record;
use polars::prelude::{
    concat, CsvWriter, DataFrame as PlDataFrame, IntoLazy, JsonWriter, LazyCsvReader,
    LazyFileListReader, LazyFrame, LazyJsonLineReader, ParquetWriter, ScanArgsParquet, SerWriter,
    UnionArgs,
};
use std::collections::HashMap;
use std::path::{Path, PathBuf};

/// Write mode: overwrite or append (PySpark DataFrameWriter.mode).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WriteMode {
    Overwrite,
    Append,
}

/// Output format for generic write (PySpark DataFrameWriter.format).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WriteFormat {
    Parquet,
    Csv,
    Json,
}

impl WriteFormat {
    fn extension(&self) -> &'static str {
        match self {
            WriteFormat::Parquet => "parquet",
            WriteFormat::Csv => "csv",
            WriteFormat::Json => "json",
        }
    }
}

/// Default warehouse directory for [`TypedWriter::save_as_table`].
const DEFAULT_WAREHOUSE: &str = "spark-warehouse";

/// Builder for writing a typed frame (PySpark DataFrameWriter).
///
/// Carries a free-form string-to-string options map. Recognized options are
/// applied (`header` and `delimiter` for CSV, `warehouse` for
/// [`save_as_table`](Self::save_as_table)); unrecognized options are ignored,
/// matching a pass-through options contract.
pub struct TypedWriter<'a, R> {
    frame: &'a TypedFrame<R>,
    mode: WriteMode,
    format: WriteFormat,
    options: HashMap<String, String>,
}

impl<'a, R: Record> TypedWriter<'a, R> {
    pub(crate) fn new(frame: &'a TypedFrame<R>) -> Self {
        TypedWriter {
            frame,
            mode: WriteMode::Overwrite,
            format: WriteFormat::Parquet,
            options: HashMap::new(),
        }
    }

    pub fn mode(mut self, mode: WriteMode) -> Self {
        self.mode = mode;
        self
    }

    pub fn format(mut self, format: WriteFormat) -> Self {
        self.format = format;
        self
    }

    /// Set one option (e.g. `option("header", "false")`).
    pub fn option(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.options.insert(key.into(), value.into());
        self
    }

    /// Merge a set of options.
    pub fn options<I, K, V>(mut self, options: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        for (k, v) in options {
            self.options.insert(k.into(), v.into());
        }
        self
    }

    /// Write to path. Overwrite replaces; append reads existing (if any) and
    /// concatenates then writes.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<(), FrameError> {
        let path = path.as_ref();
        let header = self.bool_option("header", true)?;
        let delimiter = self.delimiter_option()?;
        let to_write: PlDataFrame = match self.mode {
            WriteMode::Overwrite => self.frame.df.as_ref().clone(),
            WriteMode::Append => {
                let existing: Option<PlDataFrame> = if path.exists() {
                    match self.format {
                        WriteFormat::Parquet => {
                            LazyFrame::scan_parquet(path, ScanArgsParquet::default())
                                .and_then(|lf| lf.collect())
                                .ok()
                        }
                        WriteFormat::Csv => LazyCsvReader::new(path)
                            .with_has_header(header)
                            .with_separator(delimiter)
                            .finish()
                            .and_then(|lf| lf.collect())
                            .ok(),
                        WriteFormat::Json => LazyJsonLineReader::new(path)
                            .finish()
                            .and_then(|lf| lf.collect())
                            .ok(),
                    }
                } else {
                    None
                };
                match existing {
                    Some(existing) => {
                        let lfs: [LazyFrame; 2] =
                            [existing.lazy(), self.frame.df.as_ref().clone().lazy()];
                        concat(lfs, UnionArgs::default())?.collect()?
                    }
                    None => self.frame.df.as_ref().clone(),
                }
            }
        };
        match self.format {
            WriteFormat::Parquet => {
                let mut file = std::fs::File::create(path)?;
                let mut df_mut = to_write;
                ParquetWriter::new(&mut file).finish(&mut df_mut)?;
            }
            WriteFormat::Csv => {
                let mut file = std::fs::File::create(path)?;
                CsvWriter::new(&mut file)
                    .include_header(header)
                    .with_separator(delimiter)
                    .finish(&mut to_write.clone())?;
            }
            WriteFormat::Json => {
                let mut file = std::fs::File::create(path)?;
                JsonWriter::new(&mut file).finish(&mut to_write.clone())?;
            }
        }
        Ok(())
    }

    /// Write under the warehouse directory as `<warehouse>/<name>.<ext>`.
    /// The warehouse location comes from the `warehouse` option, defaulting
    /// to `spark-warehouse`. PySpark saveAsTable.
    pub fn save_as_table(&self, name: &str) -> Result<(), FrameError> {
        let warehouse = self
            .options
            .get("warehouse")
            .map(String::as_str)
            .unwrap_or(DEFAULT_WAREHOUSE);
        std::fs::create_dir_all(warehouse)?;
        let mut path = PathBuf::from(warehouse);
        path.push(format!("{}.{}", name, self.format.extension()));
        self.save(path)
    }

    fn bool_option(&self, key: &str, default: bool) -> Result<bool, FrameError> {
        match self.options.get(key) {
            None => Ok(default),
            Some(v) => match v.as_str() {
                "true" | "True" | "1" => Ok(true),
                "false" | "False" | "0" => Ok(false),
                other => Err(FrameError::User(format!(
                    "invalid value for option '{key}': '{other}' (expected true/false)"
                ))),
            },
        }
    }

    fn delimiter_option(&self) -> Result<u8, FrameError> {
        match self.options.get("delimiter") {
            None => Ok(b','),
            Some(v) if v.len() == 1 => Ok(v.as_bytes()[0]),
            Some(v) => Err(FrameError::User(format!(
                "invalid value for option 'delimiter': '{v}' (expected a single byte)"
            ))),
        }
    }
}
