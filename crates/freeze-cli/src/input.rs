//! Reading JSON documents from files or stdin.

use std::io::{self, Read};

use freeze_canonical::Value;
use thiserror::Error;
use tracing::debug;

/// Failure to obtain an input document.
#[derive(Error, Debug)]
pub enum InputError {
    /// The file or stdin could not be read.
    #[error("failed to read {source_name}: {source}")]
    Read {
        /// File path or `stdin`.
        source_name: String,
        /// Underlying I/O error.
        source: io::Error,
    },
    /// The text is not JSON.
    #[error("invalid JSON in {source_name}: {source}")]
    Json {
        /// File path or `stdin`.
        source_name: String,
        /// Underlying parse error.
        source: serde_json::Error,
    },
}

/// Reads a JSON document from `path`, or from stdin when `path` is `None`,
/// and adapts it into a traversal value.
pub fn read_value(path: Option<&str>) -> Result<Value, InputError> {
    let source_name = path.unwrap_or("stdin").to_string();
    let text = match path {
        Some(path) => std::fs::read_to_string(path),
        None => {
            let mut buffer = String::new();
            io::stdin().read_to_string(&mut buffer).map(|_| buffer)
        }
    }
    .map_err(|source| InputError::Read {
        source_name: source_name.clone(),
        source,
    })?;

    let json: serde_json::Value =
        serde_json::from_str(&text).map_err(|source| InputError::Json {
            source_name: source_name.clone(),
            source,
        })?;
    debug!(source = %source_name, bytes = text.len(), "read input document");
    Ok(Value::from(&json))
}
