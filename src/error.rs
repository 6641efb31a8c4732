use std::path::PathBuf;

use thiserror::Error;

/// Every way a run of the pipeline can fail.
///
/// All of these are fatal: the pipeline never skips a row or writes a
/// partial table to recover from one.
#[derive(Debug, Error)]
pub enum EtlError {
    #[error("failed to fetch markup from '{location}': {reason}")]
    Fetch { location: String, reason: String },

    #[error("markup contains no table body")]
    MissingTable,

    #[error("table row {row}: {reason}")]
    Parse { row: usize, reason: String },

    #[error("no exchange rate for '{0}'")]
    MissingRate(String),

    #[error("failed to read exchange rates from '{}': {reason}", path.display())]
    RateSource { path: PathBuf, reason: String },

    #[error("failed to write {target}: {reason}")]
    SinkWrite { target: String, reason: String },

    #[error("query '{statement}' failed: {reason}")]
    Query { statement: String, reason: String },

    #[error("invalid configuration: {0}")]
    Config(String),

    #[error("failed to append to progress log: {0}")]
    Log(#[from] std::io::Error),
}
