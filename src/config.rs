//! Run configuration for the ETL job.
//!
//! Every field has a default matching the archived-page job, so a TOML file
//! only needs to name what it changes.

use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::{error::EtlError, query::default_statements, sink::validate_table_name};

pub const DEFAULT_SOURCE: &str =
    "https://web.archive.org/web/20230908091635/https://en.wikipedia.org/wiki/List_of_largest_banks";

#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct EtlConfig {
    /// URL or local file path of the page markup.
    pub source: String,
    /// `Currency,Rate` CSV of USD conversion rates.
    pub rates_path: PathBuf,
    pub csv_path: PathBuf,
    pub db_path: PathBuf,
    pub table_name: String,
    pub log_path: PathBuf,
    /// Run the inspection queries after loading.
    pub run_queries: bool,
    /// Overrides the default inspection queries.
    pub queries: Option<Vec<String>>,
}

impl Default for EtlConfig {
    fn default() -> Self {
        Self {
            source: DEFAULT_SOURCE.to_string(),
            rates_path: PathBuf::from("exchange_rate.csv"),
            csv_path: PathBuf::from("Largest_banks_data.csv"),
            db_path: PathBuf::from("Banks.db"),
            table_name: "Largest_banks".to_string(),
            log_path: PathBuf::from("code_log.txt"),
            run_queries: true,
            queries: None,
        }
    }
}

impl EtlConfig {
    pub fn from_toml_str(contents: &str) -> Result<Self, EtlError> {
        let config: EtlConfig =
            toml::from_str(contents).map_err(|e| EtlError::Config(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    pub fn load(path: &Path) -> Result<Self, EtlError> {
        let contents = std::fs::read_to_string(path)
            .map_err(|e| EtlError::Config(format!("{}: {}", path.display(), e)))?;
        Self::from_toml_str(&contents)
    }

    pub fn validate(&self) -> Result<(), EtlError> {
        validate_table_name(&self.table_name)?;
        if self.source.trim().is_empty() {
            return Err(EtlError::Config("source must not be empty".to_string()));
        }
        Ok(())
    }

    pub fn query_statements(&self) -> Vec<String> {
        self.queries
            .clone()
            .unwrap_or_else(|| default_statements(&self.table_name))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_file_is_default() {
        assert_eq!(EtlConfig::from_toml_str("").unwrap(), EtlConfig::default());
    }

    #[test]
    fn partial_override() {
        let config = EtlConfig::from_toml_str(
            r#"
            source = "saved/banks.html"
            table_name = "Banks_2023"
            run_queries = false
            "#,
        )
        .unwrap();

        assert_eq!(config.source, "saved/banks.html");
        assert_eq!(config.table_name, "Banks_2023");
        assert!(!config.run_queries);
        assert_eq!(config.csv_path, PathBuf::from("Largest_banks_data.csv"));
    }

    #[test]
    fn default_queries_follow_table_name() {
        let config = EtlConfig {
            table_name: "Banks_2023".to_string(),
            ..EtlConfig::default()
        };
        assert_eq!(
            config.query_statements()[0],
            "SELECT * FROM Banks_2023".to_string()
        );
    }

    #[test]
    fn explicit_queries_replace_defaults() {
        let config =
            EtlConfig::from_toml_str(r#"queries = ["SELECT COUNT(*) FROM Largest_banks"]"#)
                .unwrap();
        assert_eq!(
            config.query_statements(),
            vec!["SELECT COUNT(*) FROM Largest_banks".to_string()]
        );
    }

    #[test]
    fn invalid_table_name_is_rejected() {
        assert!(matches!(
            EtlConfig::from_toml_str(r#"table_name = "banks; DROP TABLE x""#),
            Err(EtlError::Config(_))
        ));
    }

    #[test]
    fn unknown_key_is_rejected() {
        assert!(matches!(
            EtlConfig::from_toml_str(r#"output = "x.csv""#),
            Err(EtlError::Config(_))
        ));
    }

    #[test]
    fn missing_file_is_config_error() {
        let dir = tempfile::tempdir().unwrap();
        assert!(matches!(
            EtlConfig::load(&dir.path().join("absent.toml")),
            Err(EtlError::Config(_))
        ));
    }
}
