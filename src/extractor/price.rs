use thiserror::Error;
use tracing::warn;

#[derive(Error, Debug, PartialEq)]
pub enum PriceError {
    #[error("no digits in price text")]
    Empty,

    #[error("malformed number '{0}'")]
    Malformed(String),

    #[error("number out of range '{0}'")]
    OutOfRange(String),
}

/// Parse a price cell such as `"12 345,67 руб"` into rubles.
///
/// Never fails: any text that cannot be read as a price yields `0.0`, which the
/// extractor treats as "no usable price". The reason is logged.
pub fn normalize(raw: &str) -> f64 {
    if raw.is_empty() {
        return 0.0;
    }

    match parse_price(raw) {
        Ok(value) => value,
        Err(e) => {
            warn!(price_text = raw, error = %e, "Unparseable price");
            0.0
        }
    }
}

/// Fallible counterpart of [`normalize`].
///
/// Commas become decimal points, everything except digits and dots is dropped,
/// and only the first dot separates the fraction: `"1.5.25"` reads as `1.525`.
/// When every segment after the first has exactly three digits the dots are
/// thousands grouping instead, so `"1.234.567"` reads as `1234567`. Trailing
/// dots, as left behind by a `"руб."` suffix, are ignored.
pub fn parse_price(raw: &str) -> Result<f64, PriceError> {
    let cleaned: String = raw
        .chars()
        .map(|c| if c == ',' { '.' } else { c })
        .filter(|c| c.is_ascii_digit() || *c == '.')
        .collect();

    if cleaned.is_empty() {
        return Err(PriceError::Empty);
    }

    let canonical = collapse_dots(cleaned.trim_end_matches('.'));

    let value: f64 = canonical
        .parse()
        .map_err(|_| PriceError::Malformed(canonical.clone()))?;

    if !value.is_finite() {
        return Err(PriceError::OutOfRange(canonical));
    }

    Ok(value)
}

fn collapse_dots(cleaned: &str) -> String {
    let segments: Vec<&str> = cleaned.split('.').collect();
    if segments.len() <= 2 {
        return cleaned.to_string();
    }

    let (integer, rest) = segments.split_at(1);
    if !integer[0].is_empty() && rest.iter().all(|s| s.len() == 3) {
        return segments.concat();
    }

    format!("{}.{}", integer[0], rest.concat())
}
