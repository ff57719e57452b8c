use log::debug;
use serde::Serialize;

use crate::error::{ConvertError, Result};
use crate::rates::{RateSource, RateTable};

/// Convert `amount` of `from` into `to` using the unit rates in `table`.
///
/// Both rates are quoted against the same home currency, so it cancels out.
/// No rounding is applied. Equal codes are not rejected here and return
/// `amount` exactly.
pub fn convert(amount: f64, from: &str, to: &str, table: &RateTable) -> Result<f64> {
    let from_rate = table.rate(from)?;
    let to_rate = table.rate(to)?;
    if from == to {
        return Ok(amount);
    }
    Ok(amount * from_rate / to_rate)
}

/// Outcome of a single conversion request
#[derive(Debug, Clone, Serialize)]
pub struct Conversion {
    pub amount: i64,
    pub from: String,
    pub to: String,
    /// Units of `to` per one unit of `from`
    pub rate: f64,
    pub converted: f64,
    /// Publication date of the rates used, when the feed states one
    pub date: Option<String>,
}

/// Fetch a fresh table from `source` and convert `amount` between two codes.
///
/// Codes are matched case-insensitively. Equal codes are rejected with
/// `SameCurrency` before anything is fetched.
pub fn convert_with(
    source: &dyn RateSource,
    amount: i64,
    from: &str,
    to: &str,
) -> Result<Conversion> {
    let from = from.trim().to_uppercase();
    let to = to.trim().to_uppercase();

    if from == to {
        return Err(ConvertError::SameCurrency(from));
    }

    let table = source.fetch()?;
    let rate = convert(1.0, &from, &to, &table)?;
    let converted = convert(amount as f64, &from, &to, &table)?;
    debug!("{amount} {from} -> {converted} {to} via {}", source.describe());

    Ok(Conversion {
        amount,
        from,
        to,
        rate,
        converted,
        date: table.date().map(str::to_string),
    })
}
