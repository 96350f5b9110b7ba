//! Record assembly for a whole listing page.
//!
//! A page is split into product fragments with the container selector and each
//! fragment becomes one [`ProductRecord`]. Fragments are independent units of
//! work: one that cannot be assembled is reported and skipped, never allowed
//! to abort the page.
//!
//! # Example
//!
//! ```rust
//! use heatwatch_core::listing::{ListingConfig, extract_listings};
//!
//! let html = r#"<div class="x1__pJ"><h3><span>Model A</span></h3></div>"#;
//! let records = extract_listings(html, &ListingConfig::default()).unwrap();
//!
//! assert_eq!(records.len(), 1);
//! assert_eq!(records[0].model, "Model A");
//! assert_eq!(records[0].manufacturer, "Samsung");
//! ```

use std::fmt;

use tracing::{debug, warn};

use crate::Result;
use crate::fields;
use crate::parse::{Document, Element};
use crate::record::ProductRecord;
use crate::selectors::{CompiledSelectors, ListingSelectors};

/// Manufacturer recorded for the default page family.
pub const DEFAULT_MANUFACTURER: &str = "Samsung";

/// What the assembler needs to know about a page family.
#[derive(Debug, Clone)]
pub struct ListingConfig {
    /// Fixed manufacturer for every record on the page; not read from markup.
    pub manufacturer: String,
    pub selectors: ListingSelectors,
}

impl Default for ListingConfig {
    fn default() -> Self {
        Self { manufacturer: DEFAULT_MANUFACTURER.to_string(), selectors: ListingSelectors::default() }
    }
}

/// Why a single fragment was skipped.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FragmentError {
    /// The fragment contains another product container, so its field
    /// boundaries cannot be told apart from the nested product's. Typical of
    /// unclosed markup; the nested fragment is still assembled on its own.
    NestedFragment { nested: usize },
}

impl fmt::Display for FragmentError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FragmentError::NestedFragment { nested } => {
                write!(f, "fragment wraps {} other product fragment(s)", nested)
            }
        }
    }
}

impl std::error::Error for FragmentError {}

/// A fragment the assembler gave up on.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SkippedFragment {
    /// Position of the fragment among all matched fragments.
    pub index: usize,
    pub error: FragmentError,
}

/// Outcome of assembling one page.
#[derive(Debug, Clone, Default)]
pub struct PageReport {
    /// Records in document order of their fragments.
    pub records: Vec<ProductRecord>,
    pub skipped: Vec<SkippedFragment>,
}

impl PageReport {
    /// Number of fragments the container selector matched.
    pub fn fragment_count(&self) -> usize {
        self.records.len() + self.skipped.len()
    }
}

/// Assembles records from listing pages.
#[derive(Debug, Clone)]
pub struct ListingAssembler {
    manufacturer: String,
    selectors: CompiledSelectors,
}

impl ListingAssembler {
    /// Compiles the configured selectors.
    ///
    /// # Errors
    ///
    /// Returns [`crate::HeatwatchError::InvalidSelector`] for the first selector
    /// that is not valid CSS.
    pub fn new(config: &ListingConfig) -> Result<Self> {
        Ok(Self { manufacturer: config.manufacturer.clone(), selectors: config.selectors.compile()? })
    }

    /// Assembles every fragment on the page, recording skipped ones.
    ///
    /// A page with no matching fragments yields an empty report.
    pub fn assemble(&self, doc: &Document) -> PageReport {
        let fragments = doc.select_all(&self.selectors.product_container);
        let mut report = PageReport::default();

        for (index, fragment) in fragments.iter().enumerate() {
            match self.assemble_fragment(fragment) {
                Ok(record) => report.records.push(record),
                Err(error) => {
                    warn!(index, %error, "skipping product fragment");
                    report.skipped.push(SkippedFragment { index, error });
                }
            }
        }

        debug!(
            fragments = fragments.len(),
            records = report.records.len(),
            skipped = report.skipped.len(),
            "assembled listing page"
        );

        report
    }

    /// Builds one record, delegating every field to [`fields`].
    pub fn assemble_fragment(&self, fragment: &Element<'_>) -> std::result::Result<ProductRecord, FragmentError> {
        let nested = fragment.select_all(&self.selectors.product_container).len();
        if nested > 0 {
            return Err(FragmentError::NestedFragment { nested });
        }

        let sel = &self.selectors;
        let features = fields::features(fragment, &sel.features);
        let guarantee = fields::guarantee(&features);

        Ok(ProductRecord {
            model: fields::text(fragment, &sel.model),
            product_code: fields::product_code(fragment, &sel.product_code),
            manufacturer: self.manufacturer.clone(),
            price: fields::price(fragment, &sel.price),
            rating: fields::rating(fragment, &sel.rating, &sel.rating_attribute),
            review_count: fields::review_count(fragment, &sel.review_count),
            features,
            is_energy_efficient: fields::is_energy_efficient(fragment, &sel.energy_marker),
            guarantee,
        })
    }
}

/// Parses `html` and assembles its listing page into a [`PageReport`].
pub fn assemble_page(html: &str, config: &ListingConfig) -> Result<PageReport> {
    let assembler = ListingAssembler::new(config)?;
    Ok(assembler.assemble(&Document::parse(html)))
}

/// Parses `html` and returns the records of every assemblable fragment.
pub fn extract_listings(html: &str, config: &ListingConfig) -> Result<Vec<ProductRecord>> {
    assemble_page(html, config).map(|report| report.records)
}
