use std::{collections::HashMap, path::Path};

use serde::Deserialize;

use crate::{error::EtlError, records::Currency};

#[derive(Debug, Deserialize)]
struct DeserializedRate {
    #[serde(rename = "Currency")]
    currency: String,
    #[serde(rename = "Rate")]
    rate: f64,
}

/// Conversion multipliers relative to USD, keyed by upper-cased currency code.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RateTable {
    rates: HashMap<String, f64>,
}

impl RateTable {
    pub fn insert(&mut self, code: &str, rate: f64) {
        self.rates.insert(code.trim().to_uppercase(), rate);
    }

    pub fn get(&self, code: &str) -> Option<f64> {
        self.rates.get(&code.trim().to_uppercase()).copied()
    }

    pub fn rate_for(&self, currency: Currency) -> Result<f64, EtlError> {
        self.get(currency.code())
            .ok_or_else(|| EtlError::MissingRate(currency.code().to_string()))
    }

    pub fn len(&self) -> usize {
        self.rates.len()
    }
}

impl<'a> FromIterator<(&'a str, f64)> for RateTable {
    fn from_iter<I: IntoIterator<Item = (&'a str, f64)>>(iter: I) -> Self {
        let mut table = RateTable::default();
        for (code, rate) in iter {
            table.insert(code, rate);
        }
        table
    }
}

/**
 * Reads a `Currency,Rate` CSV. Any bad row fails the whole read.
 */
pub fn read_rates(path: &Path) -> Result<RateTable, EtlError> {
    let rate_source_error = |reason: String| EtlError::RateSource {
        path: path.to_path_buf(),
        reason,
    };

    let reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .trim(csv::Trim::All)
        .from_path(path)
        .map_err(|e| rate_source_error(e.to_string()))?;

    let mut table = RateTable::default();
    for row in reader.into_deserialize::<DeserializedRate>() {
        let row = row.map_err(|e| rate_source_error(e.to_string()))?;
        if !row.rate.is_finite() || row.rate < 0.0 {
            return Err(rate_source_error(format!(
                "rate for '{}' must be a finite non-negative number, got {}",
                row.currency, row.rate
            )));
        }
        table.insert(&row.currency, row.rate);
    }
    Ok(table)
}
