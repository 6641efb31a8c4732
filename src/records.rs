use std::fmt::Display;

use serde::Serialize;

/// One row of the source table, as extracted.
#[derive(Debug, Clone, PartialEq)]
pub struct BankRecord {
    pub name: String,
    pub market_cap_usd: f64,
}

/// Target currencies the normalizer derives columns for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Currency {
    GBP,
    INR,
    EUR,
}

impl Currency {
    pub fn code(self) -> &'static str {
        match self {
            Currency::GBP => "GBP",
            Currency::INR => "INR",
            Currency::EUR => "EUR",
        }
    }
}

/// A bank record with its market cap re-expressed in every target currency.
/// Field order and names match the output table's columns.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NormalizedRecord {
    #[serde(rename = "Name")]
    pub name: String,
    #[serde(rename = "MC_USD_Billion")]
    pub market_cap_usd: f64,
    #[serde(rename = "MC_GBP_Billion")]
    pub market_cap_gbp: f64,
    #[serde(rename = "MC_INR_Billion")]
    pub market_cap_inr: f64,
    #[serde(rename = "MC_EUR_Billion")]
    pub market_cap_eur: f64,
}

pub const COLUMNS: [&str; 5] = [
    "Name",
    "MC_USD_Billion",
    "MC_GBP_Billion",
    "MC_INR_Billion",
    "MC_EUR_Billion",
];

/// Renders normalized records as an aligned text table for the terminal.
pub struct TableView<'a>(pub &'a [NormalizedRecord]);

impl Display for TableView<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name_width = self
            .0
            .iter()
            .map(|record| record.name.chars().count())
            .chain(std::iter::once(COLUMNS[0].len()))
            .max()
            .unwrap_or_default();

        write!(f, "{:<width$}", COLUMNS[0], width = name_width)?;
        for column in &COLUMNS[1..] {
            write!(f, "  {:>16}", column)?;
        }
        writeln!(f)?;

        for record in self.0 {
            writeln!(
                f,
                "{:<width$}  {:>16.2}  {:>16.2}  {:>16.2}  {:>16.2}",
                record.name,
                record.market_cap_usd,
                record.market_cap_gbp,
                record.market_cap_inr,
                record.market_cap_eur,
                width = name_width
            )?;
        }
        Ok(())
    }
}
