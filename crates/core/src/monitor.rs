//! Entry points for the listing monitor.
//!
//! The two operations callers need are "fetch current listings" and
//! "summarize historical listings". [`Monitor`] bundles both around a
//! [`MonitorConfig`]; the free functions [`fetch_current_listings`] and
//! [`summarize`] are there for callers that keep their own configuration.
//!
//! # Example
//!
//! ```rust,no_run
//! use heatwatch_core::{FileSource, Monitor, MonitorConfig};
//!
//! # #[tokio::main]
//! # async fn main() -> heatwatch_core::Result<()> {
//! let config = MonitorConfig::builder().table_path("heat_pumps.csv").top_features(3).build();
//! let monitor = Monitor::with_config(config);
//!
//! let report = monitor.fetch_and_store_from(&FileSource::new("saved_listing.html")).await?;
//! println!("stored {} listings", report.records.len());
//!
//! let summary = monitor.summarize()?;
//! println!("average price: {}", summary.average_price);
//! # Ok(())
//! # }
//! ```

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::debug;

#[cfg(feature = "fetch")]
use crate::fetch::HttpSource;
use crate::fetch::{FetchConfig, PageSource};
use crate::listing::{DEFAULT_MANUFACTURER, ListingAssembler, ListingConfig, PageReport};
use crate::parse::Document;
use crate::record::ProductRecord;
use crate::selectors::ListingSelectors;
use crate::stats::{DEFAULT_TOP_FEATURES, SummaryStatistics, summarize_records};
use crate::table::{self, WriteMode};
use crate::{HeatwatchError, Result};

/// Listing page monitored by default.
pub const DEFAULT_SOURCE_URL: &str =
    "https://www.screwfix.com/c/heating-plumbing/air-sourced-heat-pumps/cat14210002?brand=samsung";

/// File name of the table inside the default data directory.
pub const DEFAULT_TABLE_FILE: &str = "heat_pumps.csv";

/// Configuration for the monitor.
///
/// Deserializes from JSON with every field optional, so a config file only
/// needs to name what it changes.
///
/// # Example
///
/// ```rust
/// use heatwatch_core::MonitorConfig;
///
/// let config = MonitorConfig::builder()
///     .source_url("https://example.com/heat-pumps")
///     .timeout(10)
///     .write_mode(heatwatch_core::WriteMode::Append)
///     .build();
/// assert_eq!(config.timeout, 10);
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct MonitorConfig {
    /// Listing page to fetch.
    pub source_url: String,

    /// Table file that fetches write to and summaries read from.
    pub table_path: PathBuf,

    /// HTTP timeout in seconds (default: 30).
    pub timeout: u64,

    pub user_agent: String,

    /// Manufacturer recorded for every listing (default: Samsung).
    pub manufacturer: String,

    /// Number of features kept in summaries (default: 5).
    pub top_features: usize,

    /// How fetched records are persisted (default: overwrite).
    #[serde(with = "write_mode_name")]
    pub write_mode: WriteMode,

    pub selectors: ListingSelectors,
}

impl Default for MonitorConfig {
    fn default() -> Self {
        let fetch = FetchConfig::default();
        Self {
            source_url: DEFAULT_SOURCE_URL.to_string(),
            table_path: default_table_path(),
            timeout: fetch.timeout,
            user_agent: fetch.user_agent,
            manufacturer: DEFAULT_MANUFACTURER.to_string(),
            top_features: DEFAULT_TOP_FEATURES,
            write_mode: WriteMode::Overwrite,
            selectors: ListingSelectors::default(),
        }
    }
}

impl MonitorConfig {
    /// Creates a new builder for MonitorConfig.
    pub fn builder() -> MonitorConfigBuilder {
        MonitorConfigBuilder::new()
    }

    /// Loads a JSON config file. Missing keys keep their defaults.
    ///
    /// # Errors
    ///
    /// Returns [`HeatwatchError::FileNotFound`] for a missing file and
    /// [`HeatwatchError::ConfigError`] for malformed JSON.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        if !path.exists() {
            return Err(HeatwatchError::FileNotFound(path.to_path_buf()));
        }

        let content = fs::read_to_string(path)?;
        serde_json::from_str(&content)
            .map_err(|e| HeatwatchError::ConfigError(format!("{}: {}", path.display(), e)))
    }

    pub fn fetch_config(&self) -> FetchConfig {
        FetchConfig { timeout: self.timeout, user_agent: self.user_agent.clone() }
    }

    pub fn listing_config(&self) -> ListingConfig {
        ListingConfig { manufacturer: self.manufacturer.clone(), selectors: self.selectors.clone() }
    }
}

/// `<data dir>/heatwatch/heat_pumps.csv`, or the bare file name when the
/// platform has no data directory.
pub fn default_table_path() -> PathBuf {
    dirs::data_dir()
        .map(|dir| dir.join("heatwatch").join(DEFAULT_TABLE_FILE))
        .unwrap_or_else(|| PathBuf::from(DEFAULT_TABLE_FILE))
}

mod write_mode_name {
    use serde::{Deserialize, Deserializer, Serializer};

    use crate::table::WriteMode;

    pub fn serialize<S: Serializer>(mode: &WriteMode, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(match mode {
            WriteMode::Overwrite => "overwrite",
            WriteMode::Append => "append",
        })
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<WriteMode, D::Error> {
        let name = String::deserialize(deserializer)?;
        match name.to_lowercase().as_str() {
            "overwrite" => Ok(WriteMode::Overwrite),
            "append" => Ok(WriteMode::Append),
            _ => Err(serde::de::Error::unknown_variant(&name, &["overwrite", "append"])),
        }
    }
}

/// Builder for MonitorConfig.
pub struct MonitorConfigBuilder {
    config: MonitorConfig,
}

impl MonitorConfigBuilder {
    /// Creates a new builder with default values.
    pub fn new() -> Self {
        Self { config: MonitorConfig::default() }
    }

    pub fn source_url(mut self, value: impl Into<String>) -> Self {
        self.config.source_url = value.into();
        self
    }

    pub fn table_path(mut self, value: impl Into<PathBuf>) -> Self {
        self.config.table_path = value.into();
        self
    }

    /// Sets the HTTP timeout in seconds.
    pub fn timeout(mut self, value: u64) -> Self {
        self.config.timeout = value;
        self
    }

    pub fn user_agent(mut self, value: impl Into<String>) -> Self {
        self.config.user_agent = value.into();
        self
    }

    pub fn manufacturer(mut self, value: impl Into<String>) -> Self {
        self.config.manufacturer = value.into();
        self
    }

    /// Sets how many features summaries keep.
    pub fn top_features(mut self, value: usize) -> Self {
        self.config.top_features = value;
        self
    }

    pub fn write_mode(mut self, value: WriteMode) -> Self {
        self.config.write_mode = value;
        self
    }

    pub fn selectors(mut self, value: ListingSelectors) -> Self {
        self.config.selectors = value;
        self
    }

    /// Builds the config.
    pub fn build(self) -> MonitorConfig {
        self.config
    }
}

impl Default for MonitorConfigBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// Fetches one page from `source` and assembles its listings.
///
/// Page-level faults from the source are returned unchanged. Fragments that
/// cannot be assembled are skipped and logged.
pub async fn fetch_current_listings<S: PageSource>(source: &S, config: &ListingConfig) -> Result<Vec<ProductRecord>> {
    fetch_page_report(source, config).await.map(|report| report.records)
}

/// Like [`fetch_current_listings`], but keeps the skipped fragments.
pub async fn fetch_page_report<S: PageSource>(source: &S, config: &ListingConfig) -> Result<PageReport> {
    let assembler = ListingAssembler::new(config)?;
    let html = source.fetch_page().await?;
    debug!(bytes = html.len(), "fetched listing page");

    Ok(assembler.assemble(&Document::parse(&html)))
}

/// Decodes the table at `table_path` and computes its summary.
///
/// # Errors
///
/// Missing or unreadable tables and undecodable rows are returned unchanged;
/// the statistics themselves never fail.
pub fn summarize(table_path: impl AsRef<Path>, top_feature_limit: usize) -> Result<SummaryStatistics> {
    let records = table::read_table(table_path)?;
    Ok(summarize_records(&records, top_feature_limit))
}

/// The listing monitor.
///
/// # Example
///
/// ```rust,no_run
/// use heatwatch_core::{FileSource, Monitor};
///
/// # #[tokio::main]
/// # async fn main() -> heatwatch_core::Result<()> {
/// let monitor = Monitor::new();
/// let records = monitor.fetch_from(&FileSource::new("saved_listing.html")).await?;
/// monitor.store(&records)?;
/// # Ok(())
/// # }
/// ```
pub struct Monitor {
    config: MonitorConfig,
}

impl Monitor {
    /// Creates a monitor with the default configuration.
    pub fn new() -> Self {
        Self { config: MonitorConfig::default() }
    }

    pub fn with_config(config: MonitorConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &MonitorConfig {
        &self.config
    }

    /// Fetches the configured listing page over HTTP and assembles it.
    #[cfg(feature = "fetch")]
    pub async fn fetch_listings(&self) -> Result<Vec<ProductRecord>> {
        let source = HttpSource::new(&self.config.source_url, self.config.fetch_config())?;
        self.fetch_from(&source).await
    }

    /// Fetches the configured listing page and persists the records to the
    /// table before returning them.
    #[cfg(feature = "fetch")]
    pub async fn fetch_and_store(&self) -> Result<Vec<ProductRecord>> {
        let source = HttpSource::new(&self.config.source_url, self.config.fetch_config())?;
        self.fetch_and_store_from(&source).await.map(|report| report.records)
    }

    /// Assembles listings from any page source.
    pub async fn fetch_from<S: PageSource>(&self, source: &S) -> Result<Vec<ProductRecord>> {
        fetch_current_listings(source, &self.config.listing_config()).await
    }

    /// Assembles one page from `source`, keeping skipped fragments.
    pub async fn fetch_report_from<S: PageSource>(&self, source: &S) -> Result<PageReport> {
        fetch_page_report(source, &self.config.listing_config()).await
    }

    /// Assembles one page from `source` and persists its records.
    ///
    /// Nothing is written when the source or the selectors fail. An empty
    /// page still writes the table, so overwrite mode leaves a header-only
    /// file.
    pub async fn fetch_and_store_from<S: PageSource>(&self, source: &S) -> Result<PageReport> {
        let report = self.fetch_report_from(source).await?;
        self.store(&report.records)?;
        Ok(report)
    }

    /// Writes records to the configured table using the configured write mode.
    pub fn store(&self, records: &[ProductRecord]) -> Result<()> {
        table::write_table(&self.config.table_path, records, self.config.write_mode)
    }

    /// Summarizes the configured table.
    pub fn summarize(&self) -> Result<SummaryStatistics> {
        summarize(&self.config.table_path, self.config.top_features)
    }
}

impl Default for Monitor {
    fn default() -> Self {
        Self::new()
    }
}
