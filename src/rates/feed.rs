//! Decoding of the daily `ValCurs` XML document.

use encoding_rs::{Encoding, UTF_8};
use log::debug;
use quick_xml::events::Event;
use quick_xml::Reader;
use serde::Deserialize;
use std::borrow::Cow;

use super::table::{RateEntry, RateTable};
use crate::error::{ConvertError, Result};

#[derive(Debug, Deserialize)]
struct ValCurs {
    #[serde(rename = "@Date", default)]
    date: Option<String>,
    #[serde(rename = "Valute", default)]
    valute: Vec<Valute>,
}

#[derive(Debug, Deserialize)]
struct Valute {
    #[serde(rename = "@ID", default)]
    id: Option<String>,
    #[serde(rename = "CharCode", default)]
    char_code: Option<String>,
    #[serde(rename = "Nominal", default)]
    nominal: Option<String>,
    #[serde(rename = "Name", default)]
    name: Option<String>,
    #[serde(rename = "Value", default)]
    value: Option<String>,
}

/// Parse a raw feed document into a rate table.
///
/// The document may be in any encoding named by its XML declaration.
/// Any record missing `CharCode`, `Name`, `Nominal` or `Value` fails the
/// whole document.
pub fn parse_rates(bytes: &[u8]) -> Result<RateTable> {
    let text = decode_document(bytes)?;
    let doc: ValCurs =
        quick_xml::de::from_str(&text).map_err(|e| ConvertError::Parse(e.to_string()))?;

    if doc.valute.is_empty() {
        return Err(ConvertError::Parse(
            "document contains no currency records".to_string(),
        ));
    }

    let mut table = RateTable::new(doc.date);
    for (idx, valute) in doc.valute.into_iter().enumerate() {
        table.insert(valute.into_entry(idx + 1)?)?;
    }

    debug!(
        "parsed {} rates (date: {})",
        table.len(),
        table.date().unwrap_or("unknown")
    );
    Ok(table)
}

impl Valute {
    fn into_entry(self, position: usize) -> Result<RateEntry> {
        let label = match (&self.char_code, &self.id) {
            (Some(code), _) if !code.trim().is_empty() => code.trim().to_string(),
            (_, Some(id)) => format!("ID {id}"),
            _ => format!("#{position}"),
        };

        let code = required(self.char_code, "CharCode", &label)?.to_uppercase();
        let name = required(self.name, "Name", &label)?;
        let nominal = required(self.nominal, "Nominal", &label)?;
        let value = required(self.value, "Value", &label)?;

        let nominal: u32 = nominal.parse().map_err(|_| {
            ConvertError::Parse(format!("record {label}: invalid Nominal '{nominal}'"))
        })?;
        if nominal == 0 {
            return Err(ConvertError::Parse(format!(
                "record {label}: Nominal must be greater than 0"
            )));
        }

        let value = parse_decimal(&value).ok_or_else(|| {
            ConvertError::Parse(format!("record {label}: invalid Value '{value}'"))
        })?;

        Ok(RateEntry {
            code,
            name,
            unit_rate: value / f64::from(nominal),
        })
    }
}

fn required(field: Option<String>, field_name: &str, label: &str) -> Result<String> {
    match field.map(|s| s.trim().to_string()) {
        Some(s) if !s.is_empty() => Ok(s),
        _ => Err(ConvertError::Parse(format!(
            "record {label}: missing {field_name}"
        ))),
    }
}

/// Parse a decimal that uses a comma separator ("60,50")
fn parse_decimal(raw: &str) -> Option<f64> {
    let value: f64 = raw.replace(',', ".").parse().ok()?;
    (value.is_finite() && value > 0.0).then_some(value)
}

fn decode_document(bytes: &[u8]) -> Result<Cow<'_, str>> {
    let encoding = declared_encoding(bytes).unwrap_or(UTF_8);
    let (text, used, had_errors) = encoding.decode(bytes);
    if had_errors {
        return Err(ConvertError::Parse(format!(
            "document is not valid {}",
            used.name()
        )));
    }
    Ok(text)
}

/// Encoding named in the `<?xml ... encoding="..."?>` prolog, if any
fn declared_encoding(bytes: &[u8]) -> Option<&'static Encoding> {
    let mut reader = Reader::from_reader(bytes);
    let mut buf = Vec::new();
    match reader.read_event_into(&mut buf) {
        Ok(Event::Decl(decl)) => {
            let label = decl.encoding()?.ok()?;
            Encoding::for_label(label.as_ref())
        }
        _ => None,
    }
}
