//! Reading the orders and discounts JSON sources.
//!
//! Any failure here is fatal to the batch: it happens before a single record
//! is processed, and nothing is written.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use serde_json::Value;
use tracing::info;

use oi_core::DiscountTable;

use crate::RawRecord;

#[derive(thiserror::Error, Debug)]
pub enum SourceError {
    #[error("file not found: {}", path.display())]
    NotFound { path: PathBuf },

    #[error("failed to read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("invalid JSON format in {}: {source}", path.display())]
    Malformed {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("unexpected content in {}: expected {expected}", path.display())]
    Shape { path: PathBuf, expected: &'static str },
}

/// Load the order records. The top level must be a JSON array.
pub fn load_orders(path: &Path) -> Result<Vec<RawRecord>, SourceError> {
    match read_json(path)? {
        Value::Array(records) => {
            info!(path = %path.display(), records = records.len(), "loaded order records");
            Ok(records)
        }
        _ => Err(SourceError::Shape {
            path: path.to_path_buf(),
            expected: "an array of order records",
        }),
    }
}

/// Load the discount table. A top-level `null` yields an empty table.
pub fn load_discounts(path: &Path) -> Result<DiscountTable, SourceError> {
    let table = match read_json(path)? {
        Value::Null => DiscountTable::new(),
        value => serde_json::from_value(value).map_err(|source| SourceError::Malformed {
            path: path.to_path_buf(),
            source,
        })?,
    };
    info!(path = %path.display(), codes = table.len(), "loaded discount table");
    Ok(table)
}

fn read_json(path: &Path) -> Result<Value, SourceError> {
    let text = fs::read_to_string(path).map_err(|source| match source.kind() {
        io::ErrorKind::NotFound => SourceError::NotFound { path: path.to_path_buf() },
        _ => SourceError::Io { path: path.to_path_buf(), source },
    })?;
    serde_json::from_str(&text).map_err(|source| SourceError::Malformed {
        path: path.to_path_buf(),
        source,
    })
}
