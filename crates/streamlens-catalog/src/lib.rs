//! Filesystem-backed table catalog standing in for the shared table store
//! that supplies the pipeline input and receives its output.

use std::fmt;
use std::fs::{self, File};
use std::path::{Path, PathBuf};
use std::str::FromStr;

use chrono::Utc;
use polars::io::parquet::write::{ParquetCompression, ParquetWriter, StatisticsOptions};
use polars::prelude::*;
use serde::Serialize;
use thiserror::Error;
use tracing::info;

#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("invalid table name {0:?}: expected namespace.schema.table")]
    InvalidTableName(String),

    #[error("table not found: {0}")]
    TableNotFound(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Polars operation failed: {0}")]
    Polars(#[from] polars::error::PolarsError),

    #[error("manifest serialization failed: {0}")]
    Manifest(#[from] serde_json::Error),
}

/// Fully-qualified three-part table address, `namespace.schema.table`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableName {
    pub namespace: String,
    pub schema: String,
    pub table: String,
}

impl FromStr for TableName {
    type Err = CatalogError;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        let parts: Vec<&str> = raw.split('.').collect();
        match parts.as_slice() {
            [namespace, schema, table]
                if !namespace.is_empty() && !schema.is_empty() && !table.is_empty() =>
            {
                Ok(Self {
                    namespace: namespace.to_string(),
                    schema: schema.to_string(),
                    table: table.to_string(),
                })
            }
            _ => Err(CatalogError::InvalidTableName(raw.to_string())),
        }
    }
}

impl fmt::Display for TableName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}.{}", self.namespace, self.schema, self.table)
    }
}

#[derive(Debug, Serialize)]
struct TableManifest {
    written_at: String,
    rows: usize,
    columns: Vec<ColumnManifest>,
}

#[derive(Debug, Serialize)]
struct ColumnManifest {
    name: String,
    dtype: String,
}

/// One Parquet file per table, laid out as `root/namespace/schema/table.parquet`
/// with a small JSON manifest sidecar per written table.
#[derive(Debug, Clone)]
pub struct Catalog {
    root: PathBuf,
}

impl Catalog {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    fn table_path(&self, name: &TableName) -> PathBuf {
        self.root
            .join(&name.namespace)
            .join(&name.schema)
            .join(format!("{}.parquet", name.table))
    }

    fn manifest_path(&self, name: &TableName) -> PathBuf {
        self.root
            .join(&name.namespace)
            .join(&name.schema)
            .join(format!("{}.meta.json", name.table))
    }

    pub fn table_exists(&self, name: &TableName) -> bool {
        self.table_path(name).is_file()
    }

    pub fn read_table(&self, name: &TableName) -> Result<DataFrame, CatalogError> {
        let path = self.table_path(name);
        if !path.is_file() {
            return Err(CatalogError::TableNotFound(name.to_string()));
        }
        let file = File::open(&path)?;
        Ok(ParquetReader::new(file).finish()?)
    }

    /// Persists the frame with overwrite + schema-merge semantics: rows come
    /// entirely from `df`, while columns that only exist in a previously
    /// persisted version are appended as full-null columns of their old
    /// dtype. The file is written to a temporary sibling and renamed into
    /// place so readers never observe a mixed old/new state.
    pub fn write_table(&self, name: &TableName, df: &DataFrame) -> Result<(), CatalogError> {
        let path = self.table_path(name);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }

        let mut merged = df.clone();
        if path.is_file() {
            let existing = ParquetReader::new(File::open(&path)?).finish()?;
            for column in existing.get_columns() {
                if merged.column(column.name().as_str()).is_err() {
                    merged.with_column(Series::full_null(
                        column.name().clone(),
                        merged.height(),
                        column.dtype(),
                    ))?;
                }
            }
        }

        let tmp_path = path.with_extension("parquet.tmp");
        {
            let mut file = File::create(&tmp_path)?;
            ParquetWriter::new(&mut file)
                .with_compression(ParquetCompression::Zstd(None))
                .with_statistics(StatisticsOptions::default())
                .finish(&mut merged)?;
        }
        fs::rename(&tmp_path, &path)?;

        self.write_manifest(name, &merged)?;
        info!(table = %name, rows = merged.height(), "table written");
        Ok(())
    }

    /// Imports a headered CSV file as a named table, inferring the schema.
    pub fn import_csv(&self, name: &TableName, csv_path: &Path) -> Result<DataFrame, CatalogError> {
        let df = CsvReadOptions::default()
            .with_has_header(true)
            .with_infer_schema_length(Some(1000))
            .try_into_reader_with_file_path(Some(csv_path.to_path_buf()))?
            .finish()?;
        self.write_table(name, &df)?;
        Ok(df)
    }

    fn write_manifest(&self, name: &TableName, df: &DataFrame) -> Result<(), CatalogError> {
        let manifest = TableManifest {
            written_at: Utc::now().to_rfc3339(),
            rows: df.height(),
            columns: df
                .get_columns()
                .iter()
                .map(|column| ColumnManifest {
                    name: column.name().as_str().to_string(),
                    dtype: format!("{}", column.dtype()),
                })
                .collect(),
        };
        let bytes = serde_json::to_vec_pretty(&manifest)?;
        fs::write(self.manifest_path(name), bytes)?;
        Ok(())
    }
}
