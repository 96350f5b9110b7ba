pub mod error;
pub mod fetch;
pub mod fields;
pub mod listing;
pub mod monitor;
pub mod parse;
pub mod record;
pub mod selectors;
pub mod stats;
pub mod table;

pub use error::{ErrorKind, HeatwatchError, Result};
#[cfg(feature = "fetch")]
pub use fetch::{HttpSource, fetch_url};
pub use fetch::{FetchConfig, FileSource, PageSource, StaticSource, fetch_file};
pub use listing::{
    FragmentError, ListingAssembler, ListingConfig, PageReport, SkippedFragment, assemble_page, extract_listings,
};
pub use monitor::{
    Monitor, MonitorConfig, MonitorConfigBuilder, default_table_path, fetch_current_listings, fetch_page_report,
    summarize,
};
pub use parse::Document;
pub use record::ProductRecord;
#[doc(hidden)]
pub use selectors::CompiledSelectors;
pub use selectors::ListingSelectors;
pub use stats::{FeatureFrequency, SummaryStatistics, parse_price, summarize_records};
pub use table::{WriteMode, decode_features, encode_features, read_table, write_table};
