use crate::{
    amount::round_to_hundredths,
    error::EtlError,
    rates::RateTable,
    records::{BankRecord, Currency, NormalizedRecord},
};

/// Re-expresses every record's USD market cap in GBP, INR and EUR.
///
/// All three rates are resolved before any record is touched, so a missing
/// rate yields no output at all.
pub fn normalize(
    records: &[BankRecord],
    rates: &RateTable,
) -> Result<Vec<NormalizedRecord>, EtlError> {
    let gbp = rates.rate_for(Currency::GBP)?;
    let inr = rates.rate_for(Currency::INR)?;
    let eur = rates.rate_for(Currency::EUR)?;

    Ok(records
        .iter()
        .map(|record| NormalizedRecord {
            name: record.name.clone(),
            market_cap_usd: record.market_cap_usd,
            market_cap_gbp: round_to_hundredths(record.market_cap_usd * gbp),
            market_cap_inr: round_to_hundredths(record.market_cap_usd * inr),
            market_cap_eur: round_to_hundredths(record.market_cap_usd * eur),
        })
        .collect())
}
