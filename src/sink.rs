use std::path::Path;

use rusqlite::{params, Connection};

use crate::{
    error::EtlError,
    records::{NormalizedRecord, COLUMNS},
};

/// Writes the table as CSV with a header row, replacing any existing file.
pub fn write_csv(path: &Path, records: &[NormalizedRecord]) -> Result<(), EtlError> {
    let sink_error = |reason: String| EtlError::SinkWrite {
        target: path.display().to_string(),
        reason,
    };

    let mut writer = csv::WriterBuilder::new()
        .has_headers(false)
        .from_path(path)
        .map_err(|e| sink_error(e.to_string()))?;
    writer
        .write_record(COLUMNS)
        .map_err(|e| sink_error(e.to_string()))?;
    for record in records {
        writer
            .serialize(record)
            .map_err(|e| sink_error(e.to_string()))?;
    }
    writer.flush().map_err(|e| sink_error(e.to_string()))
}

/// Table names are spliced into SQL, so only plain identifiers are accepted.
pub fn validate_table_name(table: &str) -> Result<(), EtlError> {
    let mut chars = table.chars();
    let valid = matches!(chars.next(), Some(c) if c.is_ascii_alphabetic() || c == '_')
        && chars.all(|c| c.is_ascii_alphanumeric() || c == '_');

    if valid {
        Ok(())
    } else {
        Err(EtlError::Config(format!(
            "table name '{}' is not a plain SQL identifier",
            table
        )))
    }
}

/// Replaces `table` with the given records inside a single transaction.
pub fn load_to_db(
    conn: &mut Connection,
    table: &str,
    records: &[NormalizedRecord],
) -> Result<(), EtlError> {
    validate_table_name(table)?;
    let sink_error = |e: rusqlite::Error| EtlError::SinkWrite {
        target: format!("table {}", table),
        reason: e.to_string(),
    };

    let tx = conn.transaction().map_err(sink_error)?;
    tx.execute_batch(&format!(
        "DROP TABLE IF EXISTS {table};
         CREATE TABLE {table} (
             Name TEXT,
             MC_USD_Billion REAL,
             MC_GBP_Billion REAL,
             MC_INR_Billion REAL,
             MC_EUR_Billion REAL
         );"
    ))
    .map_err(sink_error)?;

    {
        let mut insert = tx
            .prepare(&format!(
                "INSERT INTO {table} \
                 (Name, MC_USD_Billion, MC_GBP_Billion, MC_INR_Billion, MC_EUR_Billion) \
                 VALUES (?1, ?2, ?3, ?4, ?5)"
            ))
            .map_err(sink_error)?;
        for record in records {
            insert
                .execute(params![
                    record.name,
                    record.market_cap_usd,
                    record.market_cap_gbp,
                    record.market_cap_inr,
                    record.market_cap_eur,
                ])
                .map_err(sink_error)?;
        }
    }
    tx.commit().map_err(sink_error)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(name: &str, usd: f64) -> NormalizedRecord {
        NormalizedRecord {
            name: name.to_string(),
            market_cap_usd: usd,
            market_cap_gbp: usd * 0.5,
            market_cap_inr: usd * 80.0,
            market_cap_eur: usd * 0.75,
        }
    }

    mod csv_sink {
        use super::*;

        #[test]
        fn header_and_rows_without_index() {
            let dir = tempfile::tempdir().unwrap();
            let path = dir.path().join("banks.csv");
            write_csv(&path, &[record("Example Bank", 100.5)]).unwrap();

            let written = std::fs::read_to_string(&path).unwrap();
            assert_eq!(
                written,
                "Name,MC_USD_Billion,MC_GBP_Billion,MC_INR_Billion,MC_EUR_Billion\n\
                 Example Bank,100.5,50.25,8040.0,75.375\n"
            );
        }

        #[test]
        fn empty_table_still_has_header() {
            let dir = tempfile::tempdir().unwrap();
            let path = dir.path().join("banks.csv");
            write_csv(&path, &[]).unwrap();

            assert_eq!(
                std::fs::read_to_string(&path).unwrap(),
                "Name,MC_USD_Billion,MC_GBP_Billion,MC_INR_Billion,MC_EUR_Billion\n"
            );
        }

        #[test]
        fn existing_file_is_replaced() {
            let dir = tempfile::tempdir().unwrap();
            let path = dir.path().join("banks.csv");
            write_csv(&path, &[record("A", 1.0), record("B", 2.0)]).unwrap();
            write_csv(&path, &[record("C", 3.0)]).unwrap();

            let written = std::fs::read_to_string(&path).unwrap();
            assert_eq!(written.lines().count(), 2);
            assert!(written.contains("C,3.0"));
        }

        #[test]
        fn unwritable_path_is_sink_error() {
            let dir = tempfile::tempdir().unwrap();
            let path = dir.path().join("missing_dir").join("banks.csv");
            assert!(matches!(
                write_csv(&path, &[]),
                Err(EtlError::SinkWrite { .. })
            ));
        }
    }

    mod db_sink {
        use super::*;

        fn names(conn: &Connection, table: &str) -> Vec<String> {
            let mut stmt = conn
                .prepare(&format!("SELECT Name FROM {table} ORDER BY rowid"))
                .unwrap();
            let names = stmt
                .query_map([], |row| row.get(0))
                .unwrap()
                .collect::<Result<Vec<String>, _>>()
                .unwrap();
            names
        }

        #[test]
        fn rows_are_inserted_in_order() {
            let mut conn = Connection::open_in_memory().unwrap();
            load_to_db(&mut conn, "Largest_banks", &[record("B", 2.0), record("A", 1.0)]).unwrap();

            assert_eq!(names(&conn, "Largest_banks"), vec!["B", "A"]);
        }

        #[test]
        fn existing_table_is_replaced() {
            let mut conn = Connection::open_in_memory().unwrap();
            conn.execute_batch("CREATE TABLE Largest_banks (Old TEXT); INSERT INTO Largest_banks VALUES ('x');")
                .unwrap();
            load_to_db(&mut conn, "Largest_banks", &[record("New", 1.0)]).unwrap();

            assert_eq!(names(&conn, "Largest_banks"), vec!["New"]);
        }

        #[test]
        fn values_round_trip_as_reals() {
            let mut conn = Connection::open_in_memory().unwrap();
            load_to_db(&mut conn, "banks", &[record("Example Bank", 100.5)]).unwrap();

            let inr: f64 = conn
                .query_row("SELECT MC_INR_Billion FROM banks", [], |row| row.get(0))
                .unwrap();
            assert_eq!(inr, 8040.0);
        }

        #[test]
        fn injected_table_name_is_rejected() {
            let mut conn = Connection::open_in_memory().unwrap();
            assert!(matches!(
                load_to_db(&mut conn, "banks; DROP TABLE x", &[]),
                Err(EtlError::Config(_))
            ));
        }
    }

    mod table_names {
        use super::*;

        #[test]
        fn plain_identifiers() {
            assert!(validate_table_name("Largest_banks").is_ok());
            assert!(validate_table_name("_t2").is_ok());
        }

        #[test]
        fn rejected_identifiers() {
            assert!(validate_table_name("").is_err());
            assert!(validate_table_name("2banks").is_err());
            assert!(validate_table_name("large banks").is_err());
        }
    }
}
