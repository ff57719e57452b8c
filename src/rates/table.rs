use serde::Serialize;
use std::collections::BTreeMap;

use crate::error::{ConvertError, Result};

/// A single currency quote, normalized to one unit of the foreign currency
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RateEntry {
    pub code: String,
    pub name: String,
    /// Home-currency amount for a single unit of `code`
    pub unit_rate: f64,
}

/// Rates published for one day, keyed by currency code
#[derive(Debug, Default, Clone)]
pub struct RateTable {
    date: Option<String>,
    entries: BTreeMap<String, RateEntry>,
}

impl RateTable {
    pub fn new(date: Option<String>) -> Self {
        Self {
            date,
            entries: BTreeMap::new(),
        }
    }

    /// Add an entry. Codes are unique within a table.
    pub fn insert(&mut self, entry: RateEntry) -> Result<()> {
        if self.entries.contains_key(&entry.code) {
            return Err(ConvertError::Parse(format!(
                "currency '{}' appears more than once",
                entry.code
            )));
        }
        self.entries.insert(entry.code.clone(), entry);
        Ok(())
    }

    pub fn get(&self, code: &str) -> Option<&RateEntry> {
        self.entries.get(code)
    }

    /// Unit rate for `code`
    pub fn rate(&self, code: &str) -> Result<f64> {
        self.get(code)
            .map(|e| e.unit_rate)
            .ok_or_else(|| ConvertError::UnknownCurrency(code.to_string()))
    }

    /// Publication date announced by the feed, as written there (DD.MM.YYYY)
    pub fn date(&self) -> Option<&str> {
        self.date.as_deref()
    }

    /// Selectable currencies as (code, "CODE - Name") pairs, ordered by code
    pub fn choices(&self) -> Vec<(String, String)> {
        self.entries
            .values()
            .map(|e| (e.code.clone(), format!("{} - {}", e.code, e.name)))
            .collect()
    }

    pub fn iter(&self) -> impl Iterator<Item = &RateEntry> {
        self.entries.values()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl FromIterator<RateEntry> for RateTable {
    /// Later duplicates replace earlier ones; use `insert` when uniqueness must be checked.
    fn from_iter<I: IntoIterator<Item = RateEntry>>(iter: I) -> Self {
        let entries = iter.into_iter().map(|e| (e.code.clone(), e)).collect();
        Self {
            date: None,
            entries,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(code: &str, name: &str, unit_rate: f64) -> RateEntry {
        RateEntry {
            code: code.to_string(),
            name: name.to_string(),
            unit_rate,
        }
    }

    #[test]
    fn rejects_duplicate_codes() {
        let mut table = RateTable::new(None);
        table.insert(entry("USD", "US Dollar", 90.0)).unwrap();
        let err = table.insert(entry("USD", "US Dollar", 91.0)).unwrap_err();
        assert!(matches!(err, ConvertError::Parse(msg) if msg.contains("USD")));
        assert_eq!(table.rate("USD").unwrap(), 90.0);
    }

    #[test]
    fn unknown_code_is_reported() {
        let table: RateTable = vec![entry("USD", "US Dollar", 90.0)].into_iter().collect();
        match table.rate("XYZ") {
            Err(ConvertError::UnknownCurrency(code)) => assert_eq!(code, "XYZ"),
            other => panic!("expected UnknownCurrency, got {other:?}"),
        }
    }

    #[test]
    fn choices_are_sorted_by_code() {
        let table: RateTable = vec![
            entry("USD", "US Dollar", 90.0),
            entry("EUR", "Euro", 100.0),
        ]
        .into_iter()
        .collect();

        assert_eq!(
            table.choices(),
            vec![
                ("EUR".to_string(), "EUR - Euro".to_string()),
                ("USD".to_string(), "USD - US Dollar".to_string()),
            ]
        );
    }
}
