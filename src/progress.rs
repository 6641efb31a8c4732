use std::{
    fs::OpenOptions,
    io::Write,
    path::{Path, PathBuf},
};

use chrono::{Local, NaiveDateTime};

use crate::error::EtlError;

/// Year-MonthName-Day-Hour:Minute:Second, e.g. `2024-Oct-16-14:03:59`.
pub const TIMESTAMP_FORMAT: &str = "%Y-%b-%d-%H:%M:%S";

/// Append-only log of pipeline stages, one `<timestamp>:<message>` line each.
pub struct ProgressLog {
    path: PathBuf,
}

impl ProgressLog {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn log(&self, message: &str) -> Result<(), EtlError> {
        tracing::info!(target: "progress", "{}", message);

        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)?;
        file.write_all(format_line(Local::now().naive_local(), message).as_bytes())?;
        Ok(())
    }
}

pub fn format_line(at: NaiveDateTime, message: &str) -> String {
    format!("{}:{}\n", at.format(TIMESTAMP_FORMAT), message)
}
