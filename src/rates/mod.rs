mod feed;
mod source;
mod table;

pub use feed::parse_rates;
pub use source::{FileSource, LiveSource, RateSource, DEFAULT_FILE, DEFAULT_HOST};
pub use table::{RateEntry, RateTable};
