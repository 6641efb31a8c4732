use thiserror::Error;

/**
 * Parsing and rounding of market cap figures.
 *
 * The archived page renders caps as e.g. "432.92\n" or "100.5†", so the
 * parse is tolerant of any run of trailing footnote junk rather than
 * assuming exactly one marker character.
 */
const HUNDREDTHS: f64 = 100.0;

#[derive(Debug, Error, PartialEq)]
pub enum AmountError {
    #[error("market cap cell has no numeric text")]
    Empty,
    #[error("market cap '{0}' is not a number")]
    NotANumber(String),
    #[error("market cap '{0}' is negative")]
    Negative(String),
}

/**
 * Drops trailing footnote markers: `[...]` groups and any other characters
 * that cannot end a number.
 */
fn strip_footnotes(text: &str) -> &str {
    let mut rest = text.trim();
    loop {
        let before = rest.len();
        rest = rest.trim_end_matches(|c: char| !(c.is_ascii_digit() || c == '.' || c == ']'));
        if rest.ends_with(']') {
            rest = match rest.rfind('[') {
                Some(open) => &rest[..open],
                None => &rest[..rest.len() - 1],
            };
        }
        if rest.len() == before {
            return rest;
        }
    }
}

pub fn parse_market_cap(text: &str) -> Result<f64, AmountError> {
    let original = text.trim();
    let numeric = strip_footnotes(text);

    if numeric.is_empty() {
        return Err(AmountError::Empty);
    }

    let without_separators: String = numeric.chars().filter(|c| *c != ',').collect();
    let value: f64 = without_separators
        .parse()
        .map_err(|_| AmountError::NotANumber(original.to_string()))?;

    if !value.is_finite() {
        return Err(AmountError::NotANumber(original.to_string()));
    }
    if value < 0.0 {
        return Err(AmountError::Negative(original.to_string()));
    }
    Ok(value)
}

/**
 * Rounds half away from zero at the second decimal place.
 */
pub fn round_to_hundredths(value: f64) -> f64 {
    (value * HUNDREDTHS).round() / HUNDREDTHS
}
