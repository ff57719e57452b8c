use chrono::{Local, NaiveDate};
use log::{debug, info};
use std::fs;
use std::path::PathBuf;
use std::time::Duration;
use ureq::Agent;

use super::feed::parse_rates;
use super::table::RateTable;
use crate::error::{ConvertError, Result};

/// Default host of the daily rate feed
pub const DEFAULT_HOST: &str = "www.cbr.ru";

/// Default local feed file
pub const DEFAULT_FILE: &str = "currencies.xml";

/// Somewhere the daily rate document can be obtained from
pub trait RateSource {
    /// Human-readable location, used in messages
    fn describe(&self) -> String;

    /// Retrieve and parse a fresh rate table
    fn fetch(&self) -> Result<RateTable>;
}

/// Rates read from an XML file on disk
#[derive(Debug, Clone)]
pub struct FileSource {
    path: PathBuf,
}

impl FileSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl RateSource for FileSource {
    fn describe(&self) -> String {
        self.path.display().to_string()
    }

    fn fetch(&self) -> Result<RateTable> {
        debug!("reading rates from {}", self.path.display());
        let bytes = fs::read(&self.path).map_err(|e| ConvertError::SourceUnavailable {
            location: self.describe(),
            reason: e.to_string(),
        })?;
        parse_rates(&bytes)
    }
}

/// Rates downloaded from the bank's daily feed endpoint
#[derive(Debug, Clone)]
pub struct LiveSource {
    host: String,
    date: NaiveDate,
    timeout: Duration,
}

impl LiveSource {
    /// Live source for today's rates
    pub fn new(host: impl Into<String>, timeout: Duration) -> Self {
        Self {
            host: host.into(),
            date: Local::now().date_naive(),
            timeout,
        }
    }

    /// Request the rates published for `date` instead of today
    pub fn with_date(mut self, date: NaiveDate) -> Self {
        self.date = date;
        self
    }

    pub fn url(&self) -> String {
        format!(
            "https://{}/scripts/XML_daily.asp?date_req={}",
            self.host,
            self.date.format("%d/%m/%Y")
        )
    }
}

impl RateSource for LiveSource {
    fn describe(&self) -> String {
        self.url()
    }

    fn fetch(&self) -> Result<RateTable> {
        let url = self.url();
        info!("fetching rates from {url}");

        let agent: Agent = Agent::config_builder()
            .timeout_global(Some(self.timeout))
            .build()
            .into();

        let unavailable = |e: ureq::Error| ConvertError::SourceUnavailable {
            location: url.clone(),
            reason: e.to_string(),
        };

        let bytes = agent
            .get(&url)
            .call()
            .map_err(unavailable)?
            .body_mut()
            .read_to_vec()
            .map_err(unavailable)?;

        debug!("received {} bytes", bytes.len());
        parse_rates(&bytes)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn live_url_embeds_date() {
        let source = LiveSource::new("bank.example", Duration::from_secs(1))
            .with_date(NaiveDate::from_ymd_opt(2024, 3, 5).unwrap());
        assert_eq!(
            source.url(),
            "https://bank.example/scripts/XML_daily.asp?date_req=05/03/2024"
        );
    }

    #[test]
    fn refused_connection_is_unavailable() {
        // Port 1 on loopback has no listener, so the request fails before any TLS or HTTP.
        let source = LiveSource::new("127.0.0.1:1", Duration::from_secs(2))
            .with_date(NaiveDate::from_ymd_opt(2024, 3, 5).unwrap());
        match source.fetch() {
            Err(ConvertError::SourceUnavailable { location, reason }) => {
                assert_eq!(location, source.url());
                assert!(!reason.is_empty());
            }
            other => panic!("expected SourceUnavailable, got {other:?}"),
        }
    }

    #[test]
    fn missing_file_is_unavailable() {
        let dir = tempfile::tempdir().unwrap();
        let source = FileSource::new(dir.path().join("nope.xml"));
        match source.fetch() {
            Err(ConvertError::SourceUnavailable { location, .. }) => {
                assert!(location.ends_with("nope.xml"))
            }
            other => panic!("expected SourceUnavailable, got {other:?}"),
        }
    }

    #[test]
    fn file_source_parses_document() {
        let mut file = NamedTempFile::new().unwrap();
        write!(
            file,
            "<ValCurs><Valute><CharCode>USD</CharCode><Nominal>1</Nominal>\
             <Name>US Dollar</Name><Value>90,0</Value></Valute></ValCurs>"
        )
        .unwrap();

        let table = FileSource::new(file.path()).fetch().unwrap();
        assert_eq!(table.len(), 1);
        assert_eq!(table.rate("USD").unwrap(), 90.0);
    }
}
