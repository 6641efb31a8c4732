//! Extract, transform and load, in that order, with a progress line logged
//! before each stage.
//!
//! A failure at any stage is logged as its own progress line and returned;
//! nothing is written to either sink unless extraction and normalization both
//! succeed.

use rusqlite::Connection;

use crate::{
    config::EtlConfig,
    error::EtlError,
    extract::extract,
    normalize::normalize,
    progress::ProgressLog,
    query::{run_queries, QueryResult},
    rates::read_rates,
    records::NormalizedRecord,
    sink::{load_to_db, write_csv},
    source::MarkupSource,
};

#[derive(Debug)]
pub struct RunSummary {
    pub records: Vec<NormalizedRecord>,
    pub query_results: Vec<QueryResult>,
}

pub fn run(
    config: &EtlConfig,
    source: &dyn MarkupSource,
    log: &ProgressLog,
) -> Result<RunSummary, EtlError> {
    match run_stages(config, source, log) {
        Ok(summary) => Ok(summary),
        Err(error) => {
            tracing::error!(%error, "pipeline failed");
            // best effort; the caller still gets `error`
            let _ = log.log(&format!("Error: {}", error));
            Err(error)
        }
    }
}

fn run_stages(
    config: &EtlConfig,
    source: &dyn MarkupSource,
    log: &ProgressLog,
) -> Result<RunSummary, EtlError> {
    config.validate()?;

    log.log("Preliminaries complete. Initiating ETL process")?;
    let markup = source.fetch()?;
    let records = extract(&markup)?;
    tracing::info!(rows = records.len(), source = %source.location(), "extracted bank table");

    log.log("Data extraction complete. Initiating Transformation process")?;
    let rates = read_rates(&config.rates_path)?;
    tracing::debug!(currencies = rates.len(), "read exchange rates");
    let normalized = normalize(&records, &rates)?;

    log.log("Data transformation complete. Initiating Loading process")?;
    write_csv(&config.csv_path, &normalized)?;
    log.log("Data saved to CSV file")?;

    let mut conn = Connection::open(&config.db_path).map_err(|e| EtlError::SinkWrite {
        target: config.db_path.display().to_string(),
        reason: e.to_string(),
    })?;
    log.log("SQL Connection initiated.")?;

    load_to_db(&mut conn, &config.table_name, &normalized)?;
    let query_results = if config.run_queries {
        log.log("Data loaded to Database as table. Running the query")?;
        run_queries(&conn, &config.query_statements())?
    } else {
        log.log("Data loaded to Database as table.")?;
        Vec::new()
    };

    log.log("Process Complete.")?;
    conn.close().map_err(|(_, e)| EtlError::SinkWrite {
        target: config.db_path.display().to_string(),
        reason: e.to_string(),
    })?;
    log.log("Server Connection closed")?;

    Ok(RunSummary {
        records: normalized,
        query_results,
    })
}
