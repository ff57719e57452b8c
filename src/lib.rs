pub mod config;
pub mod convert;
pub mod error;
pub mod rates;

pub use config::{Config, SourceKind};
pub use convert::{convert, convert_with, Conversion};
pub use error::{ConvertError, Result};
pub use rates::{parse_rates, FileSource, LiveSource, RateEntry, RateSource, RateTable};
