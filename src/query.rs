use std::fmt::Display;

use rusqlite::{types::ValueRef, Connection};

use crate::error::EtlError;

/// A finished read query: its column names and every value rendered as text.
#[derive(Debug, Clone, PartialEq)]
pub struct QueryResult {
    pub statement: String,
    pub columns: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

pub fn default_statements(table: &str) -> Vec<String> {
    vec![
        format!("SELECT * FROM {table}"),
        format!("SELECT AVG(MC_GBP_Billion) FROM {table}"),
        format!("SELECT Name from {table} LIMIT 5"),
    ]
}

pub fn run_queries(
    conn: &Connection,
    statements: &[String],
) -> Result<Vec<QueryResult>, EtlError> {
    statements
        .iter()
        .map(|statement| run_query(conn, statement))
        .collect()
}

fn run_query(conn: &Connection, statement: &str) -> Result<QueryResult, EtlError> {
    let query_error = |e: rusqlite::Error| EtlError::Query {
        statement: statement.to_string(),
        reason: e.to_string(),
    };

    let mut prepared = conn.prepare(statement).map_err(query_error)?;
    let columns: Vec<String> = prepared
        .column_names()
        .into_iter()
        .map(String::from)
        .collect();
    let width = columns.len();

    let mut rows = Vec::new();
    let mut cursor = prepared.query([]).map_err(query_error)?;
    while let Some(row) = cursor.next().map_err(query_error)? {
        let mut rendered = Vec::with_capacity(width);
        for index in 0..width {
            rendered.push(render_value(row.get_ref(index).map_err(query_error)?));
        }
        rows.push(rendered);
    }

    Ok(QueryResult {
        statement: statement.to_string(),
        columns,
        rows,
    })
}

fn render_value(value: ValueRef) -> String {
    match value {
        ValueRef::Null => "NULL".to_string(),
        ValueRef::Integer(i) => i.to_string(),
        ValueRef::Real(f) => format!("{:?}", f),
        ValueRef::Text(bytes) => String::from_utf8_lossy(bytes).into_owned(),
        ValueRef::Blob(bytes) => format!("<{} bytes>", bytes.len()),
    }
}

impl Display for QueryResult {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "{}", self.statement)?;

        let widths: Vec<usize> = self
            .columns
            .iter()
            .enumerate()
            .map(|(i, column)| {
                self.rows
                    .iter()
                    .map(|row| row[i].chars().count())
                    .chain(std::iter::once(column.chars().count()))
                    .max()
                    .unwrap_or_default()
            })
            .collect();

        write_aligned(f, &self.columns, &widths)?;
        for row in &self.rows {
            write_aligned(f, row, &widths)?;
        }
        Ok(())
    }
}

fn write_aligned(
    f: &mut std::fmt::Formatter<'_>,
    cells: &[String],
    widths: &[usize],
) -> std::fmt::Result {
    let padded: Vec<String> = cells
        .iter()
        .zip(widths)
        .map(|(cell, width)| format!("{:<width$}", cell, width = *width))
        .collect();
    writeln!(f, "{}", padded.join("  ").trim_end())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn loaded_connection() -> Connection {
        let conn = Connection::open_in_memory().unwrap();
        conn.execute_batch(
            "CREATE TABLE Largest_banks (Name TEXT, MC_USD_Billion REAL, MC_GBP_Billion REAL);
             INSERT INTO Largest_banks VALUES ('A', 10.0, 8.0);
             INSERT INTO Largest_banks VALUES ('B', 20.0, 16.0);
             INSERT INTO Largest_banks VALUES ('C', 30.0, NULL);",
        )
        .unwrap();
        conn
    }

    #[test]
    fn default_statements_name_the_table() {
        let statements = default_statements("Largest_banks");
        assert_eq!(statements.len(), 3);
        assert!(statements
            .iter()
            .all(|statement| statement.contains("Largest_banks")));
    }

    #[test]
    fn select_all_returns_columns_and_rows() {
        let conn = loaded_connection();
        let results = run_queries(&conn, &["SELECT * FROM Largest_banks".to_string()]).unwrap();

        assert_eq!(
            results[0].columns,
            vec!["Name", "MC_USD_Billion", "MC_GBP_Billion"]
        );
        assert_eq!(results[0].rows.len(), 3);
        assert_eq!(results[0].rows[0], vec!["A", "10.0", "8.0"]);
        assert_eq!(results[0].rows[2][2], "NULL");
    }

    #[test]
    fn aggregate_query() {
        let conn = loaded_connection();
        let results = run_queries(
            &conn,
            &["SELECT AVG(MC_GBP_Billion) FROM Largest_banks".to_string()],
        )
        .unwrap();

        assert_eq!(results[0].rows, vec![vec!["12.0".to_string()]]);
    }

    #[test]
    fn bad_statement_is_query_error() {
        let conn = loaded_connection();
        match run_queries(&conn, &["SELECT nope FROM Largest_banks".to_string()]) {
            Err(EtlError::Query { statement, .. }) => {
                assert_eq!(statement, "SELECT nope FROM Largest_banks")
            }
            other => panic!("expected query error, got {:?}", other),
        }
    }

    #[test]
    fn display_aligns_columns() {
        let result = QueryResult {
            statement: "SELECT Name from Largest_banks LIMIT 5".to_string(),
            columns: vec!["Name".to_string()],
            rows: vec![vec!["Bank of America".to_string()], vec!["HSBC".to_string()]],
        };

        assert_eq!(
            result.to_string(),
            "SELECT Name from Largest_banks LIMIT 5\nName\nBank of America\nHSBC\n"
        );
    }
}
